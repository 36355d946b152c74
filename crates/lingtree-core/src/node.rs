//! Node descriptors and measured node boxes.
//!
//! A [`NodeSpec`] is an unmeasured label: plain text, text with a subscript,
//! or either of those wrapped with style overrides. Descriptors carry no
//! geometry, so the same tree can be laid out repeatedly under different
//! options. Resolving a descriptor against the options in effect produces a
//! [`NodeBox`], the mutable per-node record the layout passes work on.

use std::collections::BTreeMap;

use crate::edge::EdgeStyle;
use crate::options::LayoutOptions;

/// Tree-internal bottom margin for descenders, in ems.
pub(crate) const DESCENDER_MARGIN: f64 = 0.25;
/// Extra margin at the lower edge used for annotation positioning, in ems.
pub(crate) const ANNOTATION_MARGIN: f64 = 0.25;

// ---------------------------------------------------------------------------
// NodeSpec
// ---------------------------------------------------------------------------

/// An unmeasured node label.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    /// Plain text. Newlines split it into centered rows.
    Text(String),
    /// A text run followed by a scaled subscript run.
    Subscript {
        text: String,
        sub: String,
        scale: f64,
    },
    /// A descriptor whose explicit style overrides are merged onto the
    /// tree context when the node is resolved.
    Styled {
        inner: Box<NodeSpec>,
        style: Box<LayoutOptions>,
    },
}

impl NodeSpec {
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// A label with a subscript at the default 0.75 scale.
    #[must_use]
    pub fn subscript(text: impl Into<String>, sub: impl Into<String>) -> Self {
        Self::Subscript {
            text: text.into(),
            sub: sub.into(),
            scale: 0.75,
        }
    }

    /// A label with a subscript at a custom scale. Scales outside
    /// `[0.1, 2.0]` render poorly and are clamped at resolution; a zero
    /// scale falls back to 1.0.
    #[must_use]
    pub fn subscript_scaled(text: impl Into<String>, sub: impl Into<String>, scale: f64) -> Self {
        Self::Subscript {
            text: text.into(),
            sub: sub.into(),
            scale,
        }
    }

    /// Wrap a descriptor with style overrides. Only options explicitly set
    /// on `style` take effect; everything else inherits from the tree.
    #[must_use]
    pub fn styled(inner: NodeSpec, style: LayoutOptions) -> Self {
        Self::Styled {
            inner: Box::new(inner),
            style: Box::new(style),
        }
    }

    /// The plain-text form of the label, for stringified trees.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Subscript { text, sub, .. } => format!("{text}_{{{sub}}}"),
            Self::Styled { inner, .. } => inner.display_text(),
        }
    }

    /// Measure this descriptor against `options`, producing a node box at
    /// the given depth.
    #[must_use]
    pub fn resolve(&self, options: &LayoutOptions, depth: usize) -> NodeBox {
        match self {
            Self::Text(text) => resolve_text(text, options, depth),
            Self::Subscript { text, sub, scale } => {
                resolve_subscript(text, sub, *scale, options, depth)
            }
            Self::Styled { inner, style } => {
                let mut merged = options.clone();
                merged.merge_explicit(style);
                inner.resolve(&merged, depth)
            }
        }
    }
}

impl From<&str> for NodeSpec {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for NodeSpec {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

fn resolve_text(text: &str, options: &LayoutOptions, depth: usize) -> NodeBox {
    if text.is_empty() {
        // an empty label contributes no height and no descender margin
        return NodeBox::new(
            LabelBlock::Rows(Vec::new()),
            options.label_width(""),
            0.0,
            DESCENDER_MARGIN,
            options.clone(),
            depth,
        );
    }
    let rows: Vec<String> = text.split('\n').map(str::to_string).collect();
    let width = rows
        .iter()
        .map(|r| options.label_width(r))
        .fold(0.0_f64, f64::max);
    let height = rows.len() as f64;
    NodeBox::new(
        LabelBlock::Rows(rows),
        width,
        height,
        DESCENDER_MARGIN,
        options.clone(),
        depth,
    )
}

fn resolve_subscript(
    text: &str,
    sub: &str,
    scale: f64,
    options: &LayoutOptions,
    depth: usize,
) -> NodeBox {
    let scale = if scale == 0.0 || !scale.is_finite() {
        1.0
    } else {
        scale.clamp(0.1, 2.0)
    };
    let text_width = options.label_width(text);
    let width = text_width + options.label_width(sub) * scale;
    // A constant 1em height; the node margin already leaves room for a
    // descender. If the node midpoint falls inside the subscript, grow the
    // margin so the edge does not start on top of the subscript. 0.2em puts
    // a subscript descender just above the lower edge of the node.
    let mut descender_margin = DESCENDER_MARGIN;
    if width / 2.0 > text_width - 0.05 {
        descender_margin += 0.2;
    }
    NodeBox::new(
        LabelBlock::Subscript {
            text: text.to_string(),
            sub: sub.to_string(),
            scale,
        },
        width,
        1.0,
        descender_margin,
        options.clone(),
        depth,
    )
}

// ---------------------------------------------------------------------------
// LabelBlock and NodeBox
// ---------------------------------------------------------------------------

/// Measured label content, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelBlock {
    /// Zero or more centered rows of text.
    Rows(Vec<String>),
    /// A base run and a scaled subscript run.
    Subscript {
        text: String,
        sub: String,
        scale: f64,
    },
}

/// One node's geometry, mutated across the layout passes.
///
/// `width` and `x` are in ems after initial sizing and become percentages
/// of the parent container after width normalization. `y` is the em offset
/// within the node's row, and `height` is in tree-level ems.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    /// Horizontal position, percent of parent after normalization.
    pub x: f64,
    /// Vertical dodge within the row, in ems.
    pub y: f64,
    /// Box width: ems after sizing, percent of parent after normalization.
    pub width: f64,
    /// Width of the label alone, ignoring descendant overflow. Used for
    /// triangle-edge dodges and the parent-wider-than-children rule.
    pub inner_width: f64,
    /// Label height in ems (row count; 0 for an empty label).
    pub height: f64,
    /// Row index; 0 is the root.
    pub depth: usize,
    /// Bottom margin reserved for descenders, in ems.
    pub descender_margin: f64,
    pub label: LabelBlock,
    /// Per-node options; a copy of the tree options unless overridden.
    pub options: LayoutOptions,
    /// Edge style overrides keyed by daughter index.
    pub edge_styles: BTreeMap<usize, EdgeStyle>,
}

impl NodeBox {
    pub(crate) fn new(
        label: LabelBlock,
        width: f64,
        height: f64,
        descender_margin: f64,
        options: LayoutOptions,
        depth: usize,
    ) -> Self {
        // clamp to 1em so later width divisions stay well-defined
        let width = width.max(1.0);
        Self {
            x: 0.0,
            y: 0.0,
            width,
            inner_width: width,
            height,
            depth,
            descender_margin,
            label,
            options,
            edge_styles: BTreeMap::new(),
        }
    }

    /// Bottom margin in ems. Empty labels have no height and get no margin.
    #[must_use]
    pub fn margin(&self) -> f64 {
        if self.height > 0.0 {
            self.descender_margin
        } else {
            0.0
        }
    }

    /// Label height plus the descender margin; edges start here.
    #[must_use]
    pub fn em_height_with_margin(&self) -> f64 {
        self.height + self.margin()
    }
}
