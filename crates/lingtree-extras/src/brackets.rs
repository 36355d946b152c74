//! Denotation brackets: wrap a renderable in double square brackets, the
//! `⟦ ... ⟧` of semantic interpretation, drawn as SVG strokes so they scale
//! with the figure instead of with any font.

use lingtree_svg::{Document, Element, Length};

use crate::figure::Renderable;

/// Draw one double bracket into `parent`: an outer square bracket plus the
/// inner doubling stroke. A negative `width` mirrors it for the closing side.
pub fn push_double_bracket(
    parent: &mut Element,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    crisp: bool,
) {
    let x2 = x + width;
    let y2 = y + height;
    let x_double = x + width / 2.0;
    let mut outer = Element::polyline(&[(x2, y), (x, y), (x, y2), (x2, y2)])
        .attr("stroke-width", "1")
        .attr("stroke", "black")
        .attr("fill", "none");
    let mut inner = Element::line(
        Length::Raw(x_double),
        Length::Raw(y),
        Length::Raw(x_double),
        Length::Raw(y2),
    )
    .attr("stroke-width", "1")
    .attr("stroke", "black")
    .attr("fill", "none");
    if crisp {
        outer.set_attr("shape-rendering", "crispEdges");
        inner.set_attr("shape-rendering", "crispEdges");
    }
    parent.push(outer);
    parent.push(inner);
}

/// A figure flanked by double brackets on both sides.
pub struct DoubleBrackets {
    content: Box<dyn Renderable>,
    padding: f64,
    bracket_width: f64,
    crisp_perpendiculars: bool,
}

impl DoubleBrackets {
    #[must_use]
    pub fn new(content: impl Renderable + 'static) -> Self {
        Self {
            content: Box::new(content),
            padding: 0.0,
            bracket_width: 6.0,
            crisp_perpendiculars: true,
        }
    }

    /// Extra px between each bracket and the content.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_bracket_width(mut self, width: f64) -> Self {
        self.bracket_width = width;
        self
    }

    #[must_use]
    pub fn with_crisp_perpendiculars(mut self, v: bool) -> Self {
        self.crisp_perpendiculars = v;
        self
    }

    fn inset(&self) -> f64 {
        self.bracket_width + self.padding + 1.0
    }
}

impl Renderable for DoubleBrackets {
    fn width_px(&self) -> f64 {
        self.content.width_px() + self.inset() * 2.0
    }

    fn height_px(&self) -> f64 {
        self.content.height_px() + 4.0
    }

    fn to_document(&self) -> Document {
        let width = self.width_px();
        let height = self.height_px();
        let mut doc = Document::new(Length::Px(width), Length::Px(height));
        doc.set_viewbox(width, height);

        let mut fig_box = Element::group(
            Length::Raw(self.inset()),
            Length::Raw(2.0),
            Length::Raw(self.content.width_px()),
            Some(Length::Raw(self.content.height_px())),
        );
        fig_box.push(self.content.to_element());
        doc.push(fig_box);

        let crisp = self.crisp_perpendiculars;
        push_double_bracket(doc.body_mut(), 1.0, 1.0, self.bracket_width, height - 2.0, crisp);
        push_double_bracket(
            doc.body_mut(),
            width - 1.0,
            1.0,
            -self.bracket_width,
            height - 2.0,
            crisp,
        );
        doc
    }
}
