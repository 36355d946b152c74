//! Constituent annotations drawn over a finished layout: highlight boxes,
//! underlines, and movement arrows.
//!
//! Annotations never move placed nodes. Anything drawn below the tree grows
//! the canvas through the layout's bottom slack instead.

use lingtree_svg::{Element, Length, fmt_num};

use crate::error::LayoutError;
use crate::layout::TreeLayout;

// ---------------------------------------------------------------------------
// Annotation styles
// ---------------------------------------------------------------------------

/// Style of a constituent highlight box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStyle {
    pub stroke: String,
    pub rounding: f64,
    pub stroke_width: f64,
    pub fill: String,
    pub fill_opacity: f64,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            stroke: "none".to_string(),
            rounding: 8.0,
            stroke_width: 1.0,
            fill: "gray".to_string(),
            fill_opacity: 0.15,
        }
    }
}

impl BoxStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stroke(mut self, v: impl Into<String>) -> Self {
        self.stroke = v.into();
        self
    }

    #[must_use]
    pub fn with_rounding(mut self, v: f64) -> Self {
        self.rounding = v;
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, v: f64) -> Self {
        self.stroke_width = v;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, v: impl Into<String>) -> Self {
        self.fill = v.into();
        self
    }

    #[must_use]
    pub fn with_fill_opacity(mut self, v: f64) -> Self {
        self.fill_opacity = v;
        self
    }
}

/// Style of a constituent underline.
#[derive(Debug, Clone, PartialEq)]
pub struct UnderlineStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
}

impl Default for UnderlineStyle {
    fn default() -> Self {
        Self {
            stroke: "black".to_string(),
            stroke_width: 1.0,
            stroke_opacity: 1.0,
        }
    }
}

impl UnderlineStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stroke(mut self, v: impl Into<String>) -> Self {
        self.stroke = v.into();
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, v: f64) -> Self {
        self.stroke_width = v;
        self
    }

    #[must_use]
    pub fn with_stroke_opacity(mut self, v: f64) -> Self {
        self.stroke_opacity = v;
        self
    }
}

/// Style of a movement arrow. `stroke_width: None` leaves the attribute off
/// entirely so CSS can set it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowStyle {
    pub stroke: String,
    pub stroke_width: Option<f64>,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            stroke: "black".to_string(),
            stroke_width: Some(1.0),
        }
    }
}

impl ArrowStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stroke(mut self, v: impl Into<String>) -> Self {
        self.stroke = v.into();
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, v: Option<f64>) -> Self {
        self.stroke_width = v;
        self
    }
}

// ---------------------------------------------------------------------------
// Annotation operations
// ---------------------------------------------------------------------------

impl TreeLayout {
    /// Draw a rounded highlight box behind the subtree at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] for an invalid path.
    pub fn box_constituent(&mut self, path: &[isize], style: &BoxStyle) -> Result<(), LayoutError> {
        let (x, y, width, height) = self.subtree_bounds(path)?;
        let rect = Element::rect(
            Length::Percent(x),
            self.options.em_length(y),
            Length::Percent(width),
            self.options.em_length(height),
        )
        .attr("stroke", style.stroke.clone())
        .attr("fill", style.fill.clone())
        .attr("fill-opacity", fmt_num(style.fill_opacity))
        .attr("rx", fmt_num(style.rounding))
        .attr("ry", fmt_num(style.rounding))
        .attr("stroke-width", fmt_num(style.stroke_width));
        self.annotations.push(rect);
        Ok(())
    }

    /// Underline the subtree at `path`, at its bottom margin. Grows the
    /// canvas if the line would fall below it.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] for an invalid path.
    pub fn underline_constituent(
        &mut self,
        path: &[isize],
        style: &UnderlineStyle,
    ) -> Result<(), LayoutError> {
        let (x, y, width, height) = self.subtree_bounds(path)?;
        let mut line = Element::line(
            Length::Percent(x),
            self.options.em_length(y + height),
            Length::Percent(x + width),
            self.options.em_length(y + height),
        )
        .attr("stroke", style.stroke.clone())
        .attr("stroke-width", fmt_num(style.stroke_width))
        .attr("stroke-opacity", fmt_num(style.stroke_opacity));
        if self.options.crisp_perpendiculars {
            line.set_attr("shape-rendering", "crispEdges");
        }
        let content_height = self.em_height() - self.extra_y;
        self.extra_y = self.extra_y.max(y + height + 0.5 - content_height);
        self.annotations.push(line);
        Ok(())
    }

    /// Draw a movement arrow from under the subtree at `path1` to under the
    /// subtree at `path2`, routing the horizontal run below every leaf in
    /// between. Arrows at the same height shift down by half-em steps until
    /// their horizontal runs no longer overlap.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] when either path is invalid.
    pub fn movement_arrow(
        &mut self,
        path1: &[isize],
        path2: &[isize],
        style: &ArrowStyle,
    ) -> Result<(), LayoutError> {
        let n1 = self.subtree_bounds_user(path1)?;
        let n2 = self.subtree_bounds_user(path2)?;
        let n1_x = n1.0 + n1.2 / 2.0;
        let n1_y = n1.1 + n1.3;
        let n2_x = n2.0 + n2.2 / 2.0;
        let n2_y = n2.1 + n2.3;

        // route below the deepest leaf anywhere in the spanned range, which
        // may be deeper than either endpoint
        let y_depth = self.deepest_intervening_leaf(path1, path2)?;
        let y_target_base = self.y_distance(0, y_depth) + self.level_heights[y_depth];
        let y_target = self.movement_find_y(n1_x.min(n2_x), n1_x.max(n2_x), y_target_base + 1.5);
        self.extra_y = self.extra_y.max(y_target - y_target_base + 0.5);

        let y_target = self.options.em_to_px(y_target);
        let arrow_y_delta = self.options.em_to_px(0.45);

        let mut line = Element::polyline(&[
            (n1_x, n1_y),
            (n1_x, y_target),
            (n2_x, y_target),
            (n2_x, n2_y + arrow_y_delta),
        ])
        .attr("stroke", style.stroke.clone())
        .attr("fill", "none");
        if let Some(w) = style.stroke_width {
            line.set_attr("stroke-width", fmt_num(w));
        }
        if self.options.crisp_perpendiculars {
            line.set_attr("shape-rendering", "crispEdges");
        }
        self.annotations.push(line);

        let head = Element::polyline(&[
            (n2_x + 3.0, n2_y + arrow_y_delta),
            (n2_x, n2_y),
            (n2_x - 3.0, n2_y + arrow_y_delta),
        ])
        .attr("fill", style.stroke.clone())
        .attr("stroke", "none");
        self.annotations.push(head);
        Ok(())
    }

    /// Lowest free half-em slot at or below `y` for a horizontal run
    /// spanning `[x1, x2]` in user units. Runs that merely touch at the same
    /// height do not collide.
    fn movement_find_y(&mut self, x1: f64, x2: f64, y: f64) -> f64 {
        let mut y = y;
        'probe: loop {
            for &(ex1, ex2, ey) in &self.movement_arrows {
                if (y - ey).abs() < 1e-9 && x1 < ex2 && x2 > ex1 {
                    y += 0.5;
                    continue 'probe;
                }
            }
            self.movement_arrows.push((x1, x2, y));
            return y;
        }
    }

    /// All annotation elements placed so far, in insertion order.
    #[must_use]
    pub fn annotations(&self) -> &[Element] {
        &self.annotations
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
