#![forbid(unsafe_code)]

//! Minimal SVG document model for lingtree.
//!
//! The layout engine positions tree nodes with a mix of percentage and
//! font-relative coordinates, and it appends into containers out of document
//! order, so emission goes through a small owned element tree rather than a
//! linear writer. [`Element`] is a tag plus ordered attributes, optional text,
//! and children; [`Document`] wraps a root `<svg>` with canvas size, viewBox,
//! and an optional style attribute.
//!
//! Coordinates are carried as [`Length`] values (`px`, `em`, `%`, or raw user
//! units) and formatted with trailing zeros trimmed, matching how hand-written
//! SVG usually reads.

use std::fmt::{self, Write as _};

// ---------------------------------------------------------------------------
// Lengths and number formatting
// ---------------------------------------------------------------------------

/// A CSS/SVG length value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Font-relative units (1em = current font size).
    Em(f64),
    /// Percentage of the enclosing viewport.
    Percent(f64),
    /// Unitless user units.
    Raw(f64),
}

impl Length {
    fn write_into(self, out: &mut String) {
        match self {
            Length::Px(n) => {
                write_num(out, n);
                out.push_str("px");
            }
            Length::Em(n) => {
                write_num(out, n);
                out.push_str("em");
            }
            Length::Percent(n) => {
                write_num(out, n);
                out.push('%');
            }
            Length::Raw(n) => write_num(out, n),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_into(&mut s);
        f.write_str(&s)
    }
}

/// Write a float without trailing zeros: `16` not `16.0`, `1.5` not `1.50`.
///
/// Values are rounded to six decimal places, which is below the resolution of
/// any SVG renderer while keeping percentage strings short.
pub fn write_num(out: &mut String, n: f64) {
    if n == n.trunc() && n.abs() < 1e15 {
        let _ = write!(out, "{}", n as i64);
    } else {
        let start = out.len();
        let _ = write!(out, "{n:.6}");
        while out.len() > start && out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
}

/// [`write_num`] into a fresh string.
#[must_use]
pub fn fmt_num(n: f64) -> String {
    let mut s = String::new();
    write_num(&mut s, n);
    s
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape text content for XML: `&`, `<`, `>`.
pub fn text_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Escape an attribute value: text escapes plus `"`.
pub fn attr_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// One SVG element: tag, ordered attributes, optional text content, children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// A `<rect>` at the given position and size.
    #[must_use]
    pub fn rect(x: Length, y: Length, width: Length, height: Length) -> Self {
        Self::new("rect")
            .length_attr("x", x)
            .length_attr("y", y)
            .length_attr("width", width)
            .length_attr("height", height)
    }

    /// A `<line>` between two points.
    #[must_use]
    pub fn line(x1: Length, y1: Length, x2: Length, y2: Length) -> Self {
        Self::new("line")
            .length_attr("x1", x1)
            .length_attr("y1", y1)
            .length_attr("x2", x2)
            .length_attr("y2", y2)
    }

    /// A `<polyline>` through the given points, in user units.
    #[must_use]
    pub fn polyline(points: &[(f64, f64)]) -> Self {
        let mut buf = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            write_num(&mut buf, *x);
            buf.push(',');
            write_num(&mut buf, *y);
        }
        Self::new("polyline").attr("points", buf)
    }

    /// A `<text>` element anchored at the given position.
    #[must_use]
    pub fn text(content: &str, x: Length, y: Length) -> Self {
        let mut el = Self::new("text").length_attr("x", x).length_attr("y", y);
        el.text = Some(content.to_string());
        el
    }

    /// A `<tspan>` carrying a run of text inside a `<text>` element.
    #[must_use]
    pub fn tspan(content: &str) -> Self {
        Self::with_text("tspan", content)
    }

    /// An arbitrary element around a run of text. Tag names are not checked,
    /// so this also serves XML-serialized HTML output.
    #[must_use]
    pub fn with_text(tag: &'static str, content: &str) -> Self {
        let mut el = Self::new(tag);
        el.text = Some(content.to_string());
        el
    }

    /// A nested `<svg>` container, the positioning primitive for subtrees.
    ///
    /// Percentage coordinates of children resolve against the nearest such
    /// container, which is what makes subtree-relative layout possible.
    #[must_use]
    pub fn group(x: Length, y: Length, width: Length, height: Option<Length>) -> Self {
        let mut el = Self::new("svg")
            .length_attr("x", x)
            .length_attr("y", y)
            .length_attr("width", width);
        if let Some(h) = height {
            el = el.length_attr("height", h);
        }
        el
    }

    /// Set an attribute, replacing any prior value (builder form).
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute from a [`Length`] (builder form).
    #[must_use]
    pub fn length_attr(self, name: &'static str, value: Length) -> Self {
        let mut s = String::new();
        value.write_into(&mut s);
        self.attr(name, s)
    }

    /// Set an attribute, replacing any prior value in place.
    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        for pair in &mut self.attrs {
            if pair.0 == name {
                pair.1 = value;
                return;
            }
        }
        self.attrs.push((name, value));
    }

    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a child element (builder form).
    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        self.tag
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            attr_escape_into(out, value);
            out.push('"');
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            text_escape_into(out, text);
        }
        for c in &self.children {
            c.write_into(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }

    /// Serialize this element (and its subtree) to a string.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A standalone SVG document: canvas size, viewBox, style, and a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    width: Length,
    height: Length,
    viewbox: Option<(f64, f64, f64, f64)>,
    style: Option<String>,
    body: Element,
}

impl Document {
    #[must_use]
    pub fn new(width: Length, height: Length) -> Self {
        Self {
            width,
            height,
            viewbox: None,
            style: None,
            body: Element::new("svg"),
        }
    }

    /// Set the viewBox to `0 0 width height`.
    pub fn set_viewbox(&mut self, width: f64, height: f64) {
        self.viewbox = Some((0.0, 0.0, width, height));
    }

    /// Set the root style attribute (font family/size for the whole canvas).
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = Some(style.into());
    }

    /// Append a top-level element.
    pub fn push(&mut self, el: Element) {
        self.body.push(el);
    }

    /// Mutable access to the root element, for walks that nest containers.
    pub fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    #[must_use]
    pub fn width(&self) -> Length {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> Length {
        self.height
    }

    fn materialize(&self) -> Element {
        let mut root = self.body.clone();
        root.set_attr("xmlns", "http://www.w3.org/2000/svg");
        root.set_attr("version", "1.1");
        root.set_attr("baseProfile", "full");
        let mut w = String::new();
        self.width.write_into(&mut w);
        root.set_attr("width", w);
        let mut h = String::new();
        self.height.write_into(&mut h);
        root.set_attr("height", h);
        if let Some((minx, miny, vw, vh)) = self.viewbox {
            let mut vb = String::new();
            write_num(&mut vb, minx);
            vb.push(' ');
            write_num(&mut vb, miny);
            vb.push(' ');
            write_num(&mut vb, vw);
            vb.push(' ');
            write_num(&mut vb, vh);
            root.set_attr("viewBox", vb);
        }
        if let Some(style) = &self.style {
            root.set_attr("style", style.clone());
        }
        root
    }

    /// Serialize to a standalone SVG document with an XML declaration.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\" ?>");
        self.materialize().write_into(&mut out);
        out
    }

    /// Convert into an embeddable `<svg>` element, keeping size and style.
    ///
    /// Figure composition positions whole documents inside other documents;
    /// the nested `<svg>` keeps its own style so ems inside it resolve
    /// against its own font size.
    #[must_use]
    pub fn into_element(self) -> Element {
        self.materialize()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
