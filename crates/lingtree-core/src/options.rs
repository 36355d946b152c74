//! Layout configuration: spacing policies, alignment, fonts, and the
//! string-keyed option surface used by embedders.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use lingtree_svg::{Length, fmt_num};

use crate::adapter::TreeValue;
use crate::error::LayoutError;
use crate::node::NodeSpec;

// ---------------------------------------------------------------------------
// Spacing and alignment policies
// ---------------------------------------------------------------------------

/// Horizontal spacing policy for the daughters of a node.
///
/// `Even` or `Leaves` usually looks best for abstract trees; `Text` looks
/// best for trees with real node labels, so it is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizSpacing {
    /// Space daughters proportional to their label widths.
    Text,
    /// Space daughters evenly.
    Even,
    /// Space daughters by the number of leaves under each.
    Leaves,
}

impl HorizSpacing {
    /// Parse a spacing name as used in option strings and CLI flags.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "even" => Some(Self::Even),
            "leaves" => Some(Self::Leaves),
            _ => None,
        }
    }
}

/// Vertical node alignment within a level. Every node is aligned to its
/// level's row, whose height is the tallest node on that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertAlign {
    /// Align nodes at the top of the level's height.
    Top,
    /// Center nodes within the level's height.
    Center,
    /// Align nodes with the bottom of the level's height.
    Bottom,
    /// Nodes take the full level height, with text anchored at the top.
    Full,
}

impl VertAlign {
    /// Parse an alignment name as used in option strings and CLI flags.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top" => Some(Self::Top),
            "center" => Some(Self::Center),
            "bottom" => Some(Self::Bottom),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// A size-less CSS font description. Size is handled separately so that
/// per-node font scaling can reuse the same family/weight/style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub weight: String,
    pub style: String,
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: "normal".into(),
            style: "normal".into(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = weight.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    #[must_use]
    pub fn serif() -> Self {
        Self::new("times, serif")
    }

    #[must_use]
    pub fn sans() -> Self {
        Self::new("Arial, Helvetica, sans-serif")
    }

    // n.b. Lucida Console is more like 1.5 average glyph width
    #[must_use]
    pub fn mono() -> Self {
        Self::new("\"Lucida Console\", Monaco, monospace")
    }

    /// The CSS declaration list for this font, without a size.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "font-family: {}; font-weight: {}; font-style: {};",
            self.family, self.weight, self.style
        )
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::serif()
    }
}

// ---------------------------------------------------------------------------
// Tree adapters
// ---------------------------------------------------------------------------

/// Hook for splitting arbitrary tree data into a label and daughters.
///
/// Returning `None` falls back to the built-in structural split, so an
/// adapter only needs to handle the shapes it recognizes.
pub type TreeAdapterFn =
    Arc<dyn Fn(&TreeValue) -> Option<(NodeSpec, Vec<TreeValue>)> + Send + Sync>;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

bitflags! {
    /// Which options were set explicitly rather than defaulted. Subtree
    /// style overrides copy only explicit values onto the target node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct OptMask: u16 {
        const HORIZ_SPACING        = 1 << 0;
        const VERT_ALIGN           = 1 << 1;
        const LEAF_PADDING         = 1 << 2;
        const DISTANCE_TO_DAUGHTER = 1 << 3;
        const DEBUG                = 1 << 4;
        const LEAF_EDGES           = 1 << 5;
        const LEAF_NODES_ALIGN     = 1 << 6;
        const FONT_STYLE           = 1 << 7;
        const AVERAGE_GLYPH_WIDTH  = 1 << 8;
        const DESCEND_DIRECT       = 1 << 9;
        const RELATIVE_UNITS       = 1 << 10;
        const FONT_SIZE            = 1 << 11;
        const TEXT_COLOR           = 1 << 12;
        const TEXT_STROKE          = 1 << 13;
        const CRISP_PERPENDICULARS = 1 << 14;
        const ADAPTER              = 1 << 15;
    }
}

/// Rendering and layout options for a tree.
///
/// All options always have a value; defaults fill anything not set. Fields
/// may be assigned directly, but the `with_*` builders and [`set`] also
/// record that the option was set explicitly, which is what subtree style
/// overrides propagate.
///
/// [`set`]: LayoutOptions::set
#[derive(Clone)]
pub struct LayoutOptions {
    /// Horizontal spacing policy. Whole-tree only.
    pub horiz_spacing: HorizSpacing,
    /// Vertical alignment within a level. Whole-tree only.
    pub vert_align: VertAlign,
    /// Extra x padding around labels, in glyphs (relative to
    /// `average_glyph_width`).
    pub leaf_padding: f64,
    /// Distance between levels, in ems.
    pub distance_to_daughter: f64,
    /// Render a measurement grid and node outlines.
    pub debug: bool,
    /// Whether edges are drawn down to leaf nodes.
    pub leaf_edges: bool,
    /// Align all leaves at the lowest level of the tree.
    pub leaf_nodes_align: bool,
    /// Size-less font for labels.
    pub font: FontSpec,
    /// Heuristic glyph density, in characters per em. Calibrated for the
    /// default serif and sans fonts; lower it for wide fonts.
    pub average_glyph_width: f64,
    /// For multi-level descents, connect parent and daughter with one
    /// straight line instead of a segmented one.
    pub descend_direct: bool,
    /// Emit em units instead of converting to px. Absolute units are better
    /// for compatibility; this is a legacy escape hatch.
    pub relative_units: bool,
    /// Font size in px; determines how many px are in 1em.
    pub font_size: f64,
    /// CSS text color, empty to inherit.
    pub text_color: String,
    /// CSS text stroke, empty to inherit.
    pub text_stroke: String,
    /// Render horizontal and vertical annotation strokes with crisp edges.
    pub crisp_perpendiculars: bool,
    /// Custom tree split hook.
    pub adapter: Option<TreeAdapterFn>,
    explicit: OptMask,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            horiz_spacing: HorizSpacing::Text,
            vert_align: VertAlign::Center,
            leaf_padding: 2.0,
            distance_to_daughter: 2.0,
            debug: false,
            leaf_edges: true,
            leaf_nodes_align: false,
            font: FontSpec::serif(),
            // 2.0 is a heuristic: roughly 2 chars per em
            average_glyph_width: 2.0,
            descend_direct: true,
            relative_units: false,
            font_size: 16.0,
            text_color: String::new(),
            text_stroke: String::new(),
            crisp_perpendiculars: true,
            adapter: None,
            explicit: OptMask::empty(),
        }
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Builders ---------------------------------------------------------

    #[must_use]
    pub fn with_horiz_spacing(mut self, v: HorizSpacing) -> Self {
        self.horiz_spacing = v;
        self.explicit |= OptMask::HORIZ_SPACING;
        self
    }

    #[must_use]
    pub fn with_vert_align(mut self, v: VertAlign) -> Self {
        self.vert_align = v;
        self.explicit |= OptMask::VERT_ALIGN;
        self
    }

    #[must_use]
    pub fn with_leaf_padding(mut self, v: f64) -> Self {
        self.leaf_padding = v;
        self.explicit |= OptMask::LEAF_PADDING;
        self
    }

    #[must_use]
    pub fn with_distance_to_daughter(mut self, v: f64) -> Self {
        self.distance_to_daughter = v;
        self.explicit |= OptMask::DISTANCE_TO_DAUGHTER;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, v: bool) -> Self {
        self.debug = v;
        self.explicit |= OptMask::DEBUG;
        self
    }

    #[must_use]
    pub fn with_leaf_edges(mut self, v: bool) -> Self {
        self.leaf_edges = v;
        self.explicit |= OptMask::LEAF_EDGES;
        self
    }

    #[must_use]
    pub fn with_leaf_nodes_align(mut self, v: bool) -> Self {
        self.leaf_nodes_align = v;
        self.explicit |= OptMask::LEAF_NODES_ALIGN;
        self
    }

    #[must_use]
    pub fn with_font(mut self, v: FontSpec) -> Self {
        self.font = v;
        self.explicit |= OptMask::FONT_STYLE;
        self
    }

    #[must_use]
    pub fn with_average_glyph_width(mut self, v: f64) -> Self {
        self.average_glyph_width = v;
        self.explicit |= OptMask::AVERAGE_GLYPH_WIDTH;
        self
    }

    #[must_use]
    pub fn with_descend_direct(mut self, v: bool) -> Self {
        self.descend_direct = v;
        self.explicit |= OptMask::DESCEND_DIRECT;
        self
    }

    #[must_use]
    pub fn with_relative_units(mut self, v: bool) -> Self {
        self.relative_units = v;
        self.explicit |= OptMask::RELATIVE_UNITS;
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, v: f64) -> Self {
        self.font_size = v;
        self.explicit |= OptMask::FONT_SIZE;
        self
    }

    #[must_use]
    pub fn with_text_color(mut self, v: impl Into<String>) -> Self {
        self.text_color = v.into();
        self.explicit |= OptMask::TEXT_COLOR;
        self
    }

    #[must_use]
    pub fn with_text_stroke(mut self, v: impl Into<String>) -> Self {
        self.text_stroke = v.into();
        self.explicit |= OptMask::TEXT_STROKE;
        self
    }

    #[must_use]
    pub fn with_crisp_perpendiculars(mut self, v: bool) -> Self {
        self.crisp_perpendiculars = v;
        self.explicit |= OptMask::CRISP_PERPENDICULARS;
        self
    }

    #[must_use]
    pub fn with_adapter(mut self, f: TreeAdapterFn) -> Self {
        self.adapter = Some(f);
        self.explicit |= OptMask::ADAPTER;
        self
    }

    // --- Explicitness and merging ------------------------------------------

    pub(crate) fn is_explicit(&self, mask: OptMask) -> bool {
        self.explicit.contains(mask)
    }

    pub(crate) fn mark_explicit(&mut self, mask: OptMask) {
        self.explicit |= mask;
    }

    /// Copy onto `self` only the values explicitly set in `other`.
    pub fn merge_explicit(&mut self, other: &LayoutOptions) {
        if other.explicit.contains(OptMask::HORIZ_SPACING) {
            self.horiz_spacing = other.horiz_spacing;
        }
        if other.explicit.contains(OptMask::VERT_ALIGN) {
            self.vert_align = other.vert_align;
        }
        if other.explicit.contains(OptMask::LEAF_PADDING) {
            self.leaf_padding = other.leaf_padding;
        }
        if other.explicit.contains(OptMask::DISTANCE_TO_DAUGHTER) {
            self.distance_to_daughter = other.distance_to_daughter;
        }
        if other.explicit.contains(OptMask::DEBUG) {
            self.debug = other.debug;
        }
        if other.explicit.contains(OptMask::LEAF_EDGES) {
            self.leaf_edges = other.leaf_edges;
        }
        if other.explicit.contains(OptMask::LEAF_NODES_ALIGN) {
            self.leaf_nodes_align = other.leaf_nodes_align;
        }
        if other.explicit.contains(OptMask::FONT_STYLE) {
            self.font = other.font.clone();
        }
        if other.explicit.contains(OptMask::AVERAGE_GLYPH_WIDTH) {
            self.average_glyph_width = other.average_glyph_width;
        }
        if other.explicit.contains(OptMask::DESCEND_DIRECT) {
            self.descend_direct = other.descend_direct;
        }
        if other.explicit.contains(OptMask::RELATIVE_UNITS) {
            self.relative_units = other.relative_units;
        }
        if other.explicit.contains(OptMask::FONT_SIZE) {
            self.font_size = other.font_size;
        }
        if other.explicit.contains(OptMask::TEXT_COLOR) {
            self.text_color = other.text_color.clone();
        }
        if other.explicit.contains(OptMask::TEXT_STROKE) {
            self.text_stroke = other.text_stroke.clone();
        }
        if other.explicit.contains(OptMask::CRISP_PERPENDICULARS) {
            self.crisp_perpendiculars = other.crisp_perpendiculars;
        }
        if other.explicit.contains(OptMask::ADAPTER) {
            self.adapter = other.adapter.clone();
        }
        self.explicit |= other.explicit;
    }

    // --- String-keyed option surface ----------------------------------------

    /// Set one option from a string key and value.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownOptions`] for an unrecognized key and
    /// [`LayoutError::InvalidOptionValue`] when the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LayoutError> {
        let invalid = || LayoutError::InvalidOptionValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "horiz_spacing" => {
                self.horiz_spacing = HorizSpacing::parse(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::HORIZ_SPACING;
            }
            "vert_align" => {
                self.vert_align = VertAlign::parse(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::VERT_ALIGN;
            }
            "leaf_padding" => {
                self.leaf_padding = parse_f64(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::LEAF_PADDING;
            }
            "distance_to_daughter" => {
                self.distance_to_daughter = parse_f64(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::DISTANCE_TO_DAUGHTER;
            }
            "debug" => {
                self.debug = parse_bool(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::DEBUG;
            }
            "leaf_edges" => {
                self.leaf_edges = parse_bool(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::LEAF_EDGES;
            }
            "leaf_nodes_align" => {
                self.leaf_nodes_align = parse_bool(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::LEAF_NODES_ALIGN;
            }
            "font_style" => {
                self.font = match value {
                    "serif" => FontSpec::serif(),
                    "sans" => FontSpec::sans(),
                    "mono" => FontSpec::mono(),
                    family => FontSpec::new(family),
                };
                self.explicit |= OptMask::FONT_STYLE;
            }
            "average_glyph_width" => {
                self.average_glyph_width = parse_f64(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::AVERAGE_GLYPH_WIDTH;
            }
            "descend_direct" => {
                self.descend_direct = parse_bool(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::DESCEND_DIRECT;
            }
            "relative_units" => {
                self.relative_units = parse_bool(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::RELATIVE_UNITS;
            }
            "font_size" => {
                self.font_size = parse_f64(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::FONT_SIZE;
            }
            "text_color" => {
                self.text_color = value.to_string();
                self.explicit |= OptMask::TEXT_COLOR;
            }
            "text_stroke" => {
                self.text_stroke = value.to_string();
                self.explicit |= OptMask::TEXT_STROKE;
            }
            "crisp_perpendiculars" => {
                self.crisp_perpendiculars = parse_bool(value).ok_or_else(invalid)?;
                self.explicit |= OptMask::CRISP_PERPENDICULARS;
            }
            _ => {
                return Err(LayoutError::UnknownOptions {
                    keys: vec![key.to_string()],
                });
            }
        }
        Ok(())
    }

    /// Build options from string key/value pairs, collecting every unknown
    /// key before reporting so callers see the full mismatch at once.
    ///
    /// # Errors
    ///
    /// See [`LayoutOptions::set`].
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
        let unknown: Vec<String> = pairs
            .iter()
            .filter(|(k, _)| !KNOWN_KEYS.contains(k))
            .map(|(k, _)| (*k).to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(LayoutError::UnknownOptions { keys: unknown });
        }
        let mut opts = Self::default();
        for (k, v) in pairs {
            opts.set(k, v)?;
        }
        Ok(opts)
    }

    // --- Measurement helpers -------------------------------------------------

    /// Label width in ems: glyph count plus leaf padding, over the average
    /// glyph width heuristic. Wide glyphs (CJK) count double.
    #[must_use]
    pub fn label_width(&self, label: &str) -> f64 {
        let glyphs: usize = label.graphemes(true).map(|g| g.width().max(1)).sum();
        (glyphs as f64 + self.leaf_padding) / self.average_glyph_width
    }

    /// The full CSS style string for labels, including the font size.
    #[must_use]
    pub fn style_str(&self) -> String {
        format!("{} font-size: {}px", self.font.css(), fmt_num(self.font_size))
    }

    /// A size-only style string with the font size scaled, truncated to an
    /// integer px value.
    #[must_use]
    pub fn font_size_style(&self, scale: f64) -> String {
        format!("font-size: {}px", (self.font_size * scale) as i64)
    }

    /// Convert ems to px at the current font size.
    #[must_use]
    pub fn em_to_px(&self, n: f64) -> f64 {
        n * self.font_size
    }

    /// An em-denominated length in the configured output units.
    #[must_use]
    pub fn em_length(&self, n: f64) -> Length {
        if self.relative_units {
            Length::Em(n)
        } else {
            Length::Px(self.em_to_px(n))
        }
    }
}

impl fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("horiz_spacing", &self.horiz_spacing)
            .field("vert_align", &self.vert_align)
            .field("leaf_padding", &self.leaf_padding)
            .field("distance_to_daughter", &self.distance_to_daughter)
            .field("debug", &self.debug)
            .field("leaf_edges", &self.leaf_edges)
            .field("leaf_nodes_align", &self.leaf_nodes_align)
            .field("font", &self.font)
            .field("average_glyph_width", &self.average_glyph_width)
            .field("descend_direct", &self.descend_direct)
            .field("relative_units", &self.relative_units)
            .field("font_size", &self.font_size)
            .field("text_color", &self.text_color)
            .field("text_stroke", &self.text_stroke)
            .field("crisp_perpendiculars", &self.crisp_perpendiculars)
            .field("adapter", &self.adapter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl PartialEq for LayoutOptions {
    fn eq(&self, other: &Self) -> bool {
        self.horiz_spacing == other.horiz_spacing
            && self.vert_align == other.vert_align
            && self.leaf_padding == other.leaf_padding
            && self.distance_to_daughter == other.distance_to_daughter
            && self.debug == other.debug
            && self.leaf_edges == other.leaf_edges
            && self.leaf_nodes_align == other.leaf_nodes_align
            && self.font == other.font
            && self.average_glyph_width == other.average_glyph_width
            && self.descend_direct == other.descend_direct
            && self.relative_units == other.relative_units
            && self.font_size == other.font_size
            && self.text_color == other.text_color
            && self.text_stroke == other.text_stroke
            && self.crisp_perpendiculars == other.crisp_perpendiculars
            && self.adapter.is_some() == other.adapter.is_some()
    }
}

const KNOWN_KEYS: &[&str] = &[
    "horiz_spacing",
    "vert_align",
    "leaf_padding",
    "distance_to_daughter",
    "debug",
    "leaf_edges",
    "leaf_nodes_align",
    "font_style",
    "average_glyph_width",
    "descend_direct",
    "relative_units",
    "font_size",
    "text_color",
    "text_stroke",
    "crisp_perpendiculars",
];

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = LayoutOptions::default();
        assert_eq!(opts.horiz_spacing, HorizSpacing::Text);
        assert_eq!(opts.vert_align, VertAlign::Center);
        assert_eq!(opts.leaf_padding, 2.0);
        assert_eq!(opts.distance_to_daughter, 2.0);
        assert!(opts.leaf_edges);
        assert!(!opts.leaf_nodes_align);
        assert!(opts.descend_direct);
        assert!(!opts.relative_units);
        assert_eq!(opts.font_size, 16.0);
        assert!(opts.crisp_perpendiculars);
        assert!(opts.adapter.is_none());
    }

    #[test]
    fn style_str_combines_font_and_size() {
        let opts = LayoutOptions::default();
        assert_eq!(
            opts.style_str(),
            "font-family: times, serif; font-weight: normal; font-style: normal; font-size: 16px"
        );
    }

    #[test]
    fn font_size_style_truncates_scaled_size() {
        let opts = LayoutOptions::default();
        assert_eq!(opts.font_size_style(0.75), "font-size: 12px");
        assert_eq!(opts.font_size_style(0.7), "font-size: 11px");
    }

    #[test]
    fn label_width_uses_glyph_heuristic() {
        let opts = LayoutOptions::default();
        // (2 glyphs + 2 padding) / 2.0 per em
        assert_eq!(opts.label_width("NP"), 2.0);
        assert_eq!(opts.label_width(""), 1.0);
    }

    #[test]
    fn label_width_counts_wide_glyphs_double() {
        let opts = LayoutOptions::default();
        // one CJK glyph has display width 2
        assert_eq!(opts.label_width("木"), opts.label_width("ab"));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut opts = LayoutOptions::default();
        let err = opts.set("horiz_spaceing", "even").unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownOptions {
                keys: vec!["horiz_spaceing".into()]
            }
        );
    }

    #[test]
    fn set_rejects_bad_value() {
        let mut opts = LayoutOptions::default();
        let err = opts.set("font_size", "big").unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidOptionValue {
                key: "font_size".into(),
                value: "big".into()
            }
        );
    }

    #[test]
    fn from_pairs_collects_all_unknown_keys() {
        let err = LayoutOptions::from_pairs(vec![("a", "1"), ("font_size", "12"), ("b", "2")])
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownOptions {
                keys: vec!["a".into(), "b".into()]
            }
        );
    }

    #[test]
    fn from_pairs_applies_values() {
        let opts = LayoutOptions::from_pairs(vec![
            ("horiz_spacing", "even"),
            ("vert_align", "full"),
            ("font_size", "12"),
            ("leaf_edges", "false"),
        ])
        .unwrap();
        assert_eq!(opts.horiz_spacing, HorizSpacing::Even);
        assert_eq!(opts.vert_align, VertAlign::Full);
        assert_eq!(opts.font_size, 12.0);
        assert!(!opts.leaf_edges);
    }

    #[test]
    fn merge_explicit_copies_only_explicit_values() {
        let mut base = LayoutOptions::default().with_font_size(20.0);
        let overlay = LayoutOptions::default()
            .with_text_color("red")
            .with_debug(true);
        base.merge_explicit(&overlay);
        assert_eq!(base.text_color, "red");
        assert!(base.debug);
        // not explicit in overlay, so the base value survives
        assert_eq!(base.font_size, 20.0);
    }

    #[test]
    fn direct_field_writes_are_not_explicit() {
        let mut overlay = LayoutOptions::default();
        overlay.font_size = 32.0;
        let mut base = LayoutOptions::default();
        base.merge_explicit(&overlay);
        assert_eq!(base.font_size, 16.0);
    }

    #[test]
    fn em_length_respects_unit_mode() {
        let abs = LayoutOptions::default();
        assert_eq!(abs.em_length(2.0), Length::Px(32.0));
        let rel = LayoutOptions::default().with_relative_units(true);
        assert_eq!(rel.em_length(2.0), Length::Em(2.0));
    }

    #[test]
    fn spacing_and_align_parse_known_names() {
        assert_eq!(HorizSpacing::parse("text"), Some(HorizSpacing::Text));
        assert_eq!(HorizSpacing::parse("leaves"), Some(HorizSpacing::Leaves));
        assert_eq!(HorizSpacing::parse("grid"), None);
        assert_eq!(VertAlign::parse("bottom"), Some(VertAlign::Bottom));
        assert_eq!(VertAlign::parse("middle"), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn set_never_panics(key in ".{0,20}", value in ".{0,20}") {
                let mut opts = LayoutOptions::default();
                let _ = opts.set(&key, &value);
            }

            #[test]
            fn label_width_is_finite_and_nonnegative(label in ".{0,64}") {
                let opts = LayoutOptions::default();
                let w = opts.label_width(&label);
                prop_assert!(w.is_finite());
                prop_assert!(w >= 0.0);
            }
        }
    }
}
