//! Edge styles: how a parent node connects to each daughter.

use lingtree_svg::{Element, Length, fmt_num};

use crate::layout::TreeLayout;
use crate::node::NodeBox;

/// The shape of an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeKind {
    /// One straight line from parent to daughter.
    Direct,
    /// For multi-level descents, a diagonal to the skipped level followed by
    /// a vertical drop. Draws like `Direct` when no level is skipped.
    Indirect,
    /// A triangle over the daughter, for collapsed constituents.
    Triangle,
    /// No line. `distance` is the em gap left between parent and daughter;
    /// `None` keeps the regular level distance instead.
    Empty { distance: Option<f64> },
}

/// An edge's style: shape, stroke color, and optional stroke width.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub kind: EdgeKind,
    pub stroke: String,
    pub stroke_width: Option<f64>,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self::direct()
    }
}

impl EdgeStyle {
    #[must_use]
    pub fn direct() -> Self {
        Self {
            kind: EdgeKind::Direct,
            stroke: "black".into(),
            stroke_width: None,
        }
    }

    #[must_use]
    pub fn indirect() -> Self {
        Self {
            kind: EdgeKind::Indirect,
            ..Self::direct()
        }
    }

    #[must_use]
    pub fn triangle() -> Self {
        Self {
            kind: EdgeKind::Triangle,
            ..Self::direct()
        }
    }

    /// No line and no gap: the daughter sits directly under the parent.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kind: EdgeKind::Empty {
                distance: Some(0.0),
            },
            ..Self::direct()
        }
    }

    /// No line, with an explicit em gap between parent and daughter.
    #[must_use]
    pub fn empty_at(distance: f64) -> Self {
        Self {
            kind: EdgeKind::Empty {
                distance: Some(distance),
            },
            ..Self::direct()
        }
    }

    /// No line, keeping the regular level distance.
    #[must_use]
    pub fn empty_auto() -> Self {
        Self {
            kind: EdgeKind::Empty { distance: None },
            ..Self::direct()
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = stroke.into();
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    fn apply_stroke(&self, mut line: Element) -> Element {
        line.set_attr("stroke", self.stroke.clone());
        if let Some(w) = self.stroke_width {
            if w != 0.0 {
                line.set_attr("stroke-width", fmt_num(w));
            }
        }
        line
    }

    /// Draw this edge into the parent's container. Coordinates mix
    /// percentages (x, relative to the container) and em-derived lengths (y).
    pub(crate) fn draw(
        &self,
        svg_parent: &mut Element,
        layout: &TreeLayout,
        parent: &NodeBox,
        child: &NodeBox,
    ) {
        match self.kind {
            EdgeKind::Empty { .. } => {}
            EdgeKind::Direct => self.draw_direct(svg_parent, layout, parent, child),
            EdgeKind::Indirect => {
                if child.depth > parent.depth + 1 {
                    self.draw_indirect(svg_parent, layout, parent, child);
                } else {
                    self.draw_direct(svg_parent, layout, parent, child);
                }
            }
            EdgeKind::Triangle => self.draw_triangle(svg_parent, layout, parent, child),
        }
    }

    fn draw_direct(
        &self,
        svg_parent: &mut Element,
        layout: &TreeLayout,
        parent: &NodeBox,
        child: &NodeBox,
    ) {
        let opts = layout.options();
        let line_start = parent.y + parent.em_height_with_margin();
        let box_y = layout.y_distance(parent.depth, child.depth);
        let line = Element::line(
            Length::Percent(50.0),
            opts.em_length(line_start),
            Length::Percent(child.x + child.width / 2.0),
            opts.em_length(box_y + child.y),
        );
        svg_parent.push(self.apply_stroke(line));
    }

    fn draw_indirect(
        &self,
        svg_parent: &mut Element,
        layout: &TreeLayout,
        parent: &NodeBox,
        child: &NodeBox,
    ) {
        let opts = layout.options();
        let line_start = parent.y + parent.em_height_with_margin();
        let box_y = layout.y_distance(parent.depth, child.depth);
        let x_target = Length::Percent(child.x + child.width / 2.0);
        let y_target = opts.em_length(box_y + child.y);
        // a level is being skipped; aim for the y position an empty node on
        // the next level down would have
        let intermediate_y = opts.em_length(
            layout.level_y_dodge(parent.depth + 1, 0.0).0
                + layout.y_distance(parent.depth, parent.depth + 1),
        );
        let drop = Element::line(
            Length::Percent(50.0),
            opts.em_length(line_start),
            x_target,
            intermediate_y,
        );
        svg_parent.push(self.apply_stroke(drop));
        let descent = Element::line(x_target, intermediate_y, x_target, y_target);
        svg_parent.push(self.apply_stroke(descent));
    }

    fn draw_triangle(
        &self,
        svg_parent: &mut Element,
        layout: &TreeLayout,
        parent: &NodeBox,
        child: &NodeBox,
    ) {
        let opts = layout.options();
        let line_start = opts.em_length(parent.y + parent.em_height_with_margin());
        let box_y = layout.y_distance(parent.depth, child.depth);
        let y_target = opts.em_length(box_y + child.y);
        // 0.8 accounts for leaf padding; looks fine up to roughly 60 glyphs
        let width_dodge = 0.8 * child.inner_width / 2.0;
        let mid = child.x + child.width / 2.0;
        let x_left = Length::Percent(mid - width_dodge);
        let x_right = Length::Percent(mid + width_dodge);
        let left = Element::line(Length::Percent(50.0), line_start, x_left, y_target);
        svg_parent.push(self.apply_stroke(left));
        let right = Element::line(Length::Percent(50.0), line_start, x_right, y_target);
        svg_parent.push(self.apply_stroke(right));
        let base = Element::line(x_left, y_target, x_right, y_target);
        svg_parent.push(self.apply_stroke(base));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::TreeValue;
    use crate::layout::TreeLayout;
    use crate::options::LayoutOptions;

    fn unary_layout() -> TreeLayout {
        let tree = TreeValue::branch("A", vec!["b".into()]);
        TreeLayout::new(tree, LayoutOptions::default())
    }

    #[test]
    fn direct_edge_runs_from_parent_baseline_to_child_center() {
        let layout = unary_layout();
        let parent = layout.node_at(&[]).unwrap().clone();
        let child = layout.node_at(&[0]).unwrap().clone();
        let mut container = Element::new("svg");
        EdgeStyle::direct().draw(&mut container, &layout, &parent, &child);
        let line = &container.children()[0];
        assert_eq!(line.tag(), "line");
        assert_eq!(line.get_attr("x1"), Some("50%"));
        // parent baseline: y 0 + height 1 + descender margin 0.25, at 16px/em
        assert_eq!(line.get_attr("y1"), Some("20px"));
        assert_eq!(line.get_attr("x2"), Some("50%"));
        // one level down: 2em distance + 1em row height
        assert_eq!(line.get_attr("y2"), Some("48px"));
        assert_eq!(line.get_attr("stroke"), Some("black"));
        assert_eq!(line.get_attr("stroke-width"), None);
    }

    #[test]
    fn stroke_width_is_emitted_when_set() {
        let layout = unary_layout();
        let parent = layout.node_at(&[]).unwrap().clone();
        let child = layout.node_at(&[0]).unwrap().clone();
        let mut container = Element::new("svg");
        EdgeStyle::direct()
            .with_stroke("gray")
            .with_stroke_width(2.0)
            .draw(&mut container, &layout, &parent, &child);
        let line = &container.children()[0];
        assert_eq!(line.get_attr("stroke"), Some("gray"));
        assert_eq!(line.get_attr("stroke-width"), Some("2"));
    }

    #[test]
    fn empty_edge_draws_nothing() {
        let layout = unary_layout();
        let parent = layout.node_at(&[]).unwrap().clone();
        let child = layout.node_at(&[0]).unwrap().clone();
        let mut container = Element::new("svg");
        EdgeStyle::empty().draw(&mut container, &layout, &parent, &child);
        EdgeStyle::empty_auto().draw(&mut container, &layout, &parent, &child);
        assert!(container.children().is_empty());
    }

    #[test]
    fn triangle_edge_draws_three_lines() {
        let layout = unary_layout();
        let parent = layout.node_at(&[]).unwrap().clone();
        let child = layout.node_at(&[0]).unwrap().clone();
        let mut container = Element::new("svg");
        EdgeStyle::triangle().draw(&mut container, &layout, &parent, &child);
        assert_eq!(container.children().len(), 3);
        assert!(container.children().iter().all(|c| c.tag() == "line"));
    }

    #[test]
    fn indirect_edge_without_skipped_level_is_direct() {
        let layout = unary_layout();
        let parent = layout.node_at(&[]).unwrap().clone();
        let child = layout.node_at(&[0]).unwrap().clone();
        let mut direct = Element::new("svg");
        EdgeStyle::direct().draw(&mut direct, &layout, &parent, &child);
        let mut indirect = Element::new("svg");
        EdgeStyle::indirect().draw(&mut indirect, &layout, &parent, &child);
        assert_eq!(direct, indirect);
    }

    #[test]
    fn indirect_edge_with_skipped_level_draws_two_segments() {
        let tree = TreeValue::branch(
            "S",
            vec![
                TreeValue::branch("NP", vec![TreeValue::branch("N", vec!["cats".into()])]),
                "sleep".into(),
            ],
        );
        let options = LayoutOptions::default()
            .with_leaf_nodes_align(true)
            .with_descend_direct(false);
        let layout = TreeLayout::new(tree, options);
        let parent = layout.node_at(&[]).unwrap().clone();
        // "sleep" is a leaf pulled down to depth 2 by leaf alignment
        let child = layout.node_at(&[1]).unwrap().clone();
        assert_eq!(child.depth, 2);
        let mut container = Element::new("svg");
        EdgeStyle::indirect().draw(&mut container, &layout, &parent, &child);
        assert_eq!(container.children().len(), 2);
    }
}
