//! Figure composition: arrange rendered trees (or anything renderable)
//! side by side, row by row, or under a caption.
//!
//! Composition works by embedding each item's `<svg>` element inside a
//! positioned container. The embedded element keeps its own style
//! attribute, so em-denominated coordinates inside it keep resolving
//! against its own font size rather than the outer figure's.

use lingtree_core::TreeLayout;
use lingtree_svg::{Document, Element, Length, fmt_num};

/// Default gap between figure items, in px.
pub const FIGURE_PADDING: f64 = 16.0;

/// Anything that can report a pixel canvas size and produce an embeddable
/// SVG element.
pub trait Renderable {
    fn width_px(&self) -> f64;
    fn height_px(&self) -> f64;
    fn to_document(&self) -> Document;

    /// The embeddable form: a nested `<svg>` carrying its own size and style.
    fn to_element(&self) -> Element {
        self.to_document().into_element()
    }
}

impl Renderable for TreeLayout {
    fn width_px(&self) -> f64 {
        TreeLayout::width_px(self)
    }

    fn height_px(&self) -> f64 {
        TreeLayout::height_px(self)
    }

    fn to_document(&self) -> Document {
        self.render()
    }
}

// ---------------------------------------------------------------------------
// SideBySide
// ---------------------------------------------------------------------------

/// A horizontal strip of items with uniform padding between and around them.
///
/// Column widths start as the items' own widths; [`RowByRow`] may widen them
/// to align columns across rows.
pub struct SideBySide {
    items: Vec<Box<dyn Renderable>>,
    widths: Vec<f64>,
    padding: f64,
}

impl SideBySide {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            widths: Vec::new(),
            padding: FIGURE_PADDING,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn push(mut self, item: impl Renderable + 'static) -> Self {
        self.widths.push(item.width_px());
        self.items.push(Box::new(item));
        self
    }
}

impl Default for SideBySide {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderable for SideBySide {
    fn width_px(&self) -> f64 {
        let columns: f64 = self.widths.iter().sum();
        columns + self.padding * (self.items.len() + 1) as f64
    }

    fn height_px(&self) -> f64 {
        self.items.iter().map(|e| e.height_px()).fold(0.0, f64::max)
    }

    fn to_document(&self) -> Document {
        let width = self.width_px();
        let height = self.height_px();
        let mut doc = Document::new(Length::Px(width), Length::Px(height));
        doc.set_viewbox(width, height);
        let mut x_pos = self.padding;
        for (item, w) in self.items.iter().zip(&self.widths) {
            let mut cell = Element::group(
                Length::Raw(x_pos),
                Length::Raw(0.0),
                Length::Raw(*w),
                Some(Length::Raw(item.height_px())),
            );
            cell.push(item.to_element());
            doc.push(cell);
            x_pos += w + self.padding;
        }
        doc
    }
}

// ---------------------------------------------------------------------------
// RowByRow
// ---------------------------------------------------------------------------

enum RowItem {
    Strip(SideBySide),
    Single(Box<dyn Renderable>),
}

impl RowItem {
    fn width_px(&self) -> f64 {
        match self {
            Self::Strip(s) => s.width_px(),
            Self::Single(e) => e.width_px(),
        }
    }

    fn height_px(&self) -> f64 {
        match self {
            Self::Strip(s) => s.height_px(),
            Self::Single(e) => e.height_px(),
        }
    }

    fn to_element(&self) -> Element {
        match self {
            Self::Strip(s) => s.to_element(),
            Self::Single(e) => e.to_element(),
        }
    }
}

/// A vertical stack of rows with uniform padding.
///
/// By default, [`SideBySide`] rows are aligned into a grid: each column
/// takes the widest item in that column across all rows, and every row
/// takes the largest row padding.
pub struct RowByRow {
    rows: Vec<RowItem>,
    padding: f64,
    gridify: bool,
}

impl RowByRow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            padding: FIGURE_PADDING,
            gridify: true,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Keep each row at its natural column widths.
    #[must_use]
    pub fn without_gridify(mut self) -> Self {
        self.gridify = false;
        self
    }

    #[must_use]
    pub fn push(mut self, item: impl Renderable + 'static) -> Self {
        self.rows.push(RowItem::Single(Box::new(item)));
        if self.gridify {
            self.align_columns();
        }
        self
    }

    #[must_use]
    pub fn push_strip(mut self, strip: SideBySide) -> Self {
        self.rows.push(RowItem::Strip(strip));
        if self.gridify {
            self.align_columns();
        }
        self
    }

    /// Widen strip columns to the per-column max across all rows, and level
    /// every strip's padding to the largest. Single items count toward the
    /// first column.
    fn align_columns(&mut self) {
        let mut max_widths: Vec<f64> = Vec::new();
        let mut max_padding = 0.0f64;
        for row in &self.rows {
            match row {
                RowItem::Strip(s) => {
                    max_padding = max_padding.max(s.padding);
                    for (j, item) in s.items.iter().enumerate() {
                        if j >= max_widths.len() {
                            max_widths.push(0.0);
                        }
                        max_widths[j] = max_widths[j].max(item.width_px());
                    }
                }
                RowItem::Single(e) => {
                    if max_widths.is_empty() {
                        max_widths.push(0.0);
                    }
                    max_widths[0] = max_widths[0].max(e.width_px());
                }
            }
        }
        for row in &mut self.rows {
            if let RowItem::Strip(s) = row {
                s.padding = max_padding;
                for (j, w) in s.widths.iter_mut().enumerate() {
                    *w = max_widths[j];
                }
            }
        }
    }
}

impl Default for RowByRow {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderable for RowByRow {
    fn width_px(&self) -> f64 {
        self.rows.iter().map(RowItem::width_px).fold(0.0, f64::max)
    }

    fn height_px(&self) -> f64 {
        let rows: f64 = self.rows.iter().map(RowItem::height_px).sum();
        rows + self.padding * (self.rows.len() + 1) as f64
    }

    fn to_document(&self) -> Document {
        let width = self.width_px();
        let height = self.height_px();
        let mut doc = Document::new(Length::Px(width), Length::Px(height));
        doc.set_viewbox(width, height);
        let mut y_pos = self.padding;
        for row in &self.rows {
            let row_el = row.to_element();
            let mut cell = Element::group(
                Length::Raw(0.0),
                Length::Raw(y_pos),
                Length::Raw(row.width_px()),
                Some(Length::Raw(row.height_px())),
            );
            // ems inside the row resolve against the row's own font style
            let style = row_el.get_attr("style").map(str::to_string);
            if let Some(style) = style {
                if !style.is_empty() {
                    cell.set_attr("style", style);
                }
            }
            cell.push(row_el);
            doc.push(cell);
            y_pos += row.height_px() + self.padding;
        }
        doc
    }
}

// ---------------------------------------------------------------------------
// Caption
// ---------------------------------------------------------------------------

const CAPTION_FONT: &str = "font-family: times, serif; font-weight:normal; font-style: italic;";

/// A figure with an italic caption line centered under it. The figure is
/// re-centered when the caption comes out wider.
pub struct Caption {
    fig: Box<dyn Renderable>,
    caption: String,
    font_size: f64,
}

impl Caption {
    #[must_use]
    pub fn new(fig: impl Renderable + 'static, caption: impl Into<String>) -> Self {
        Self {
            fig: Box::new(fig),
            caption: caption.into(),
            font_size: 13.0,
        }
    }

    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Width heuristic: captions have no layout pass, so assume an average
    /// glyph takes half the font size.
    fn caption_width(&self) -> f64 {
        self.font_size * self.caption.chars().count() as f64 / 2.0
    }

    fn style_str(&self) -> String {
        format!("{CAPTION_FONT} font-size: {}px;", fmt_num(self.font_size))
    }
}

impl Renderable for Caption {
    fn width_px(&self) -> f64 {
        self.fig.width_px().max(self.caption_width())
    }

    fn height_px(&self) -> f64 {
        self.fig.height_px() + 2.5 * self.font_size
    }

    fn to_document(&self) -> Document {
        let width = self.width_px();
        let height = self.height_px();
        let fig_width = self.fig.width_px();
        let caption_width = self.caption_width();
        let mut doc = Document::new(Length::Px(width), Length::Px(height));
        doc.set_viewbox(width, height);

        let fig_x = if fig_width > caption_width {
            0.0
        } else {
            (caption_width - fig_width) / 2.0
        };
        let mut fig_box = Element::group(
            Length::Raw(fig_x),
            Length::Raw(0.0),
            Length::Raw(fig_width),
            Some(Length::Raw(self.fig.height_px())),
        );
        fig_box.push(self.fig.to_element());
        doc.push(fig_box);

        // the caption sits in its own container so its font style cannot
        // shift the em interpretation of the box position
        let y_pos = self.fig.height_px() + 0.5 * self.font_size;
        let mut caption_box = Element::group(
            Length::Raw(0.0),
            Length::Raw(y_pos),
            Length::Percent(100.0),
            Some(Length::Percent(100.0)),
        );
        caption_box.push(
            Element::text(&self.caption, Length::Percent(50.0), Length::Em(1.0))
                .attr("text-anchor", "middle")
                .attr("style", self.style_str()),
        );
        doc.push(caption_box);
        doc
    }
}
