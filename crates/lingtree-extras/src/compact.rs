//! Compact HTML rendering: a constituent tree as nested CSS grid `<div>`s
//! with stretchable SVG edges, for hosts where a fixed-size SVG canvas is
//! too rigid (text that reflows, zoomed notebooks).
//!
//! The output reuses the [`Element`] model and serializes as XML. Layout is
//! delegated to the browser, which caps what can be expressed: at most two
//! daughters per node, and no leaf-proportional spacing. Per-node style
//! wrappers become inline CSS on the label; other overrides do not carry
//! into HTML output.

use lingtree_core::{HorizSpacing, LayoutOptions, NodeSpec, TreeValue, split_in};
use lingtree_svg::Element;

const DEBUG_BORDER: &str = "border: 1px solid #848482;";

/// Trees the compact renderer cannot express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactError {
    /// A node with more daughters than a two-column grid can hold.
    UnsupportedArity { count: usize },
    /// Leaf-proportional spacing has no CSS grid equivalent.
    UnsupportedSpacing,
}

impl std::fmt::Display for CompactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedArity { count } => {
                write!(
                    f,
                    "compact layout supports at most two daughters per node, found {count}"
                )
            }
            Self::UnsupportedSpacing => {
                write!(f, "compact layout does not support leaf-proportional spacing")
            }
        }
    }
}

impl std::error::Error for CompactError {}

/// Where a node's parent sits, for slanting the incoming edge.
#[derive(Clone, Copy)]
enum ParentSide {
    Left,
    Above,
    Right,
}

/// A tree prepared for compact HTML rendering.
pub struct CompactTree {
    tree: TreeValue,
    options: LayoutOptions,
}

impl CompactTree {
    #[must_use]
    pub fn new(tree: impl Into<TreeValue>, options: LayoutOptions) -> Self {
        Self {
            tree: tree.into(),
            options,
        }
    }

    /// Render to an element tree rooted at a `<div>`.
    ///
    /// The root carries the tree's font style inline, like the SVG
    /// renderer's document style.
    pub fn render(&self) -> Result<Element, CompactError> {
        if self.options.horiz_spacing == HorizSpacing::Leaves {
            return Err(CompactError::UnsupportedSpacing);
        }
        let mut root = self.render_node(&self.tree, None)?;
        style_append(&mut root, &self.options.style_str());
        Ok(root)
    }

    /// Shorthand for `render()` serialized to a string.
    pub fn html_string(&self) -> Result<String, CompactError> {
        Ok(self.render()?.to_svg_string())
    }

    fn render_node(
        &self,
        t: &TreeValue,
        parent: Option<ParentSide>,
    ) -> Result<Element, CompactError> {
        let (label, children) = split_in(&self.options, t);
        let even = self.options.horiz_spacing == HorizSpacing::Even;
        match children.len() {
            0 => Ok(if even {
                self.label_html(&label)
            } else {
                self.unary_text(&label, None, parent)
            }),
            1 => {
                let d = self.render_node(&children[0], Some(ParentSide::Above))?;
                Ok(if even {
                    self.unary_grid(&label, d)
                } else {
                    self.unary_text(&label, Some(d), parent)
                })
            }
            2 => {
                let d1 = self.render_node(&children[0], Some(ParentSide::Right))?;
                let d2 = self.render_node(&children[1], Some(ParentSide::Left))?;
                Ok(if even {
                    self.binary_even(&label, d1, d2)
                } else {
                    self.binary_text(&label, d1, d2, parent)
                })
            }
            count => Err(CompactError::UnsupportedArity { count }),
        }
    }

    // --- Label wrapping ----------------------------------------------------

    /// Wrap a label for HTML output. The inline-block padding keeps hosts
    /// from line-breaking inside the label.
    fn label_html(&self, spec: &NodeSpec) -> Element {
        match spec {
            NodeSpec::Text(s) => {
                let rows: Vec<&str> = s.split('\n').collect();
                if rows.len() > 1 {
                    self.multiline_text(&rows)
                } else {
                    self.wrap_text_run(Element::with_text("span", s).attr(
                        "style",
                        "text-align:center;",
                    ))
                }
            }
            NodeSpec::Subscript { text, sub, scale } => {
                let mut span =
                    Element::with_text("span", text).attr("style", "text-align:center;");
                span.push(
                    Element::with_text("sub", sub)
                        .attr("style", self.options.font_size_style(*scale)),
                );
                self.wrap_text_run(span)
            }
            NodeSpec::Styled { inner, style } => {
                let mut el = self.label_html(inner);
                let mut merged = self.options.clone();
                merged.merge_explicit(style);
                style_append(&mut el, &merged.style_str());
                el
            }
        }
    }

    fn wrap_text_run(&self, span: Element) -> Element {
        let border = if self.options.debug { DEBUG_BORDER } else { "" };
        Element::new("div")
            .attr(
                "style",
                format!(
                    "display:inline-block;padding-left:0.75em;\
                     padding-right:0.75em;text-align:center;{border}"
                ),
            )
            .child(span)
    }

    fn multiline_text(&self, rows: &[&str]) -> Element {
        let mut e =
            Element::new("div").attr("style", "display:grid;grid-template-columns:auto;");
        for row in rows {
            e.push(
                Element::new("div")
                    .attr(
                        "style",
                        "padding-left:0.75em;padding-right:0.75em;text-align:center;",
                    )
                    .child(Element::with_text("span", row)),
            );
        }
        e
    }

    // --- Node layouts --------------------------------------------------------

    fn border_style(&self) -> &'static str {
        if self.options.debug {
            DEBUG_BORDER
        } else {
            "border:none;"
        }
    }

    fn line_height(&self) -> String {
        lingtree_svg::Length::Px(self.options.em_to_px(self.options.distance_to_daughter))
            .to_string()
    }

    fn unary_grid(&self, label: &NodeSpec, daughter: Element) -> Element {
        let lh = self.line_height();
        Element::new("div")
            .attr("align", "center")
            .attr(
                "style",
                format!(
                    "display:inline-grid;grid-template-columns: 1fr;align-items:start;{}",
                    self.border_style()
                ),
            )
            .child(
                Element::new("div")
                    .attr("style", "grid-column:1;grid-row:1;")
                    .attr("align", "center")
                    .child(self.label_html(label)),
            )
            .child(
                Element::new("div")
                    .attr("align", "center")
                    .attr("style", format!("grid-column:1;grid-row:2;border:0;height:{lh};"))
                    .child(line_svg(0, 0)),
            )
            .child(
                Element::new("div")
                    .attr("style", "grid-column:1;grid-row:3;")
                    .child(daughter),
            )
    }

    fn binary_even(&self, label: &NodeSpec, d1: Element, d2: Element) -> Element {
        let lh = self.line_height();
        Element::new("div")
            .attr(
                "style",
                format!(
                    "display:inline-grid;grid-template-columns: repeat(2, 1fr);\
                     align-items:start;{}",
                    self.border_style()
                ),
            )
            .attr("align", "center")
            .child(
                Element::new("div")
                    .attr("style", "grid-column:1/3;grid-row:1;grid-gap:0px")
                    .attr("align", "center")
                    .child(self.label_html(label)),
            )
            .child(
                Element::new("div")
                    .attr("align", "center")
                    .attr("style", format!("grid-column:1;grid-row:2;height:{lh};"))
                    .child(line_svg(1, 0)),
            )
            .child(
                Element::new("div")
                    .attr("align", "center")
                    .attr("style", format!("grid-column:2;grid-row:2;height:{lh};"))
                    .child(line_svg(-1, 0)),
            )
            .child(
                Element::new("div")
                    .attr("style", "grid-column:1;grid-row:3;")
                    .child(d1),
            )
            .child(
                Element::new("div")
                    .attr("style", "grid-column:2;grid-row:3;")
                    .child(d2),
            )
    }

    fn binary_text(
        &self,
        label: &NodeSpec,
        d1: Element,
        d2: Element,
        parent: Option<ParentSide>,
    ) -> Element {
        let lh = self.line_height();
        let mut e = Element::new("div").attr(
            "style",
            format!(
                "display:inline-grid;grid-template-columns: repeat(2, auto);\
                 align-items:start;{}",
                self.border_style()
            ),
        );
        let mut row = 1;
        if let Some(side) = parent {
            let (line, col) = match side {
                ParentSide::Left => (line_svg(-1, 1), "grid-column:1;"),
                ParentSide::Right => (line_svg(1, -1), "grid-column:2;"),
                ParentSide::Above => (line_svg(0, 0), "grid-column:1/3;"),
            };
            e.push(
                Element::new("div")
                    .attr("style", format!("{col}grid-row:1;height:{lh};"))
                    .child(line),
            );
            row += 1;
        }
        // A non-leaf label has to straddle the grid line between the two
        // daughter columns without inflating the first column. The visible
        // copy floats in a zero-width cell and is transformed to center on
        // the grid line; a hidden zero-height duplicate spans both columns
        // so the label still contributes to the grid's width.
        let mut visible = self.label_html(label);
        let hidden = visible.clone();
        style_append(
            &mut visible,
            "float:right;transform:translate(50%);white-space:nowrap;",
        );
        e.push(
            Element::new("div")
                .attr(
                    "style",
                    format!("grid-row:{row};grid-column:1;justify-self:right;width:0;"),
                )
                .child(visible),
        );
        e.push(
            Element::new("div")
                .attr(
                    "style",
                    format!(
                        "grid-row:{row};grid-column:1/3;justify-self:center;height:0;\
                         overflow:hidden;padding-right:1em;padding-left:1em;"
                    ),
                )
                .child(hidden),
        );
        row += 1;
        e.push(
            Element::new("div")
                .attr(
                    "style",
                    format!("grid-column:1;grid-row:{row};justify-self:right;"),
                )
                .child(d1),
        );
        e.push(
            Element::new("div")
                .attr("style", format!("grid-column:2;grid-row:{row};"))
                .child(d2),
        );
        e
    }

    fn unary_text(
        &self,
        label: &NodeSpec,
        daughter: Option<Element>,
        parent: Option<ParentSide>,
    ) -> Element {
        let lh = self.line_height();
        let mut e = Element::new("div").attr(
            "style",
            format!(
                "display:inline-grid;grid-template-columns: 1fr;align-items:start;{}",
                self.border_style()
            ),
        );
        let mut row = 1;
        if let Some(side) = parent {
            let line = match side {
                ParentSide::Left => line_svg(-1, 0),
                ParentSide::Right => line_svg(1, 0),
                ParentSide::Above => line_svg(0, 0),
            };
            e.push(
                Element::new("div")
                    .attr("style", format!("grid-column:1;grid-row:1;height:{lh};"))
                    .attr("align", "center")
                    .child(line),
            );
            row += 1;
        }
        e.push(
            Element::new("div")
                .attr(
                    "style",
                    format!("grid-column:1;grid-row:{row};justify-self:center;"),
                )
                .child(self.label_html(label)),
        );
        row += 1;
        if let Some(d) = daughter {
            e.push(
                Element::new("div")
                    .attr(
                        "style",
                        format!("grid-column:1;grid-row:{row};justify-self:center;"),
                    )
                    .child(d),
            );
        }
        e
    }
}

/// Append declarations to an element's style attribute, inserting the
/// separating `;` if the current value lacks one.
fn style_append(el: &mut Element, style: &str) {
    let mut current = el.get_attr("style").unwrap_or("").trim().to_string();
    if !current.is_empty() && !current.ends_with(';') {
        current.push(';');
    }
    current.push_str(style);
    el.set_attr("style", current);
}

/// A stretchable edge: a zero-size `<svg>` that scales to its CSS box, with
/// a non-scaling 1px stroke. Endpoints anchor to the left edge, center, or
/// right edge of the box for `-1`, `0`, `1`.
fn line_svg(top: i8, bottom: i8) -> Element {
    fn edge_x(pos: i8) -> &'static str {
        match pos.signum() {
            -1 => "0",
            1 => "100",
            _ => "50",
        }
    }
    // stay off the top/bottom edges so line ends survive stretching
    let line = Element::new("line")
        .attr("stroke", "black")
        .attr("x1", edge_x(top))
        .attr("x2", edge_x(bottom))
        .attr("y1", "2")
        .attr("y2", "98")
        .attr("stroke-width", "1px")
        .attr("vector-effect", "non-scaling-stroke");
    Element::new("svg")
        .attr("baseProfile", "tiny")
        .attr("height", "0")
        .attr("width", "0")
        .attr("preserveAspectRatio", "none")
        .attr("version", "1.2")
        .attr("viewBox", "0,0,100,100")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("style", "height:100%;width:100%;display:block;")
        .attr("xmlns:ev", "http://www.w3.org/2001/xml-events")
        .attr("xmlns:xlink", "http://www.w3.org/1999/xlink")
        .child(Element::new("defs"))
        .child(line)
}
