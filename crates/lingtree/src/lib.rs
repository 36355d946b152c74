#![forbid(unsafe_code)]

//! Lingtree public facade crate.
//!
//! Re-exports the tree model, layout engine, renderers, and figure tools
//! from the internal crates, and offers a lightweight prelude for
//! day-to-day usage.
//!
//! ```
//! use lingtree::prelude::*;
//!
//! let layout = draw_tree("(S (NP I) (VP (V saw) (NP it)))", LayoutOptions::default())?;
//! assert!(layout.svg_string().starts_with("<?xml"));
//! # Ok::<(), lingtree::ParseError>(())
//! ```

// --- Tree model re-exports ---------------------------------------------------

pub use lingtree_core::{
    LayoutError, NodeSpec, ParseError, TreeValue, common_prefix, is_leaf, leaf_labels,
    leaf_nodecount, parse_tree, split, tree_depth,
};

// --- Layout re-exports -------------------------------------------------------

pub use lingtree_core::{
    FontSpec, HorizSpacing, LayoutNode, LayoutOptions, StyleOverrides, TreeAdapterFn, TreeLayout,
    VertAlign,
};

// --- Edge and annotation re-exports ------------------------------------------

pub use lingtree_core::{ArrowStyle, BoxStyle, EdgeKind, EdgeStyle, UnderlineStyle};

// --- Document re-exports -----------------------------------------------------

pub use lingtree_svg::{Document, Element, Length};

// --- Extras re-exports -------------------------------------------------------

#[cfg(feature = "extras")]
pub use lingtree_extras::{
    Caption, CompactError, CompactTree, DoubleBrackets, Renderable, RowByRow, SideBySide,
};

/// Parse a bracket expression and lay it out in one call.
///
/// # Errors
///
/// Returns the parse error for malformed bracket notation.
pub fn draw_tree(source: &str, options: LayoutOptions) -> Result<TreeLayout, ParseError> {
    Ok(TreeLayout::new(parse_tree(source)?, options))
}

// --- Prelude -------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        EdgeStyle, HorizSpacing, LayoutError, LayoutOptions, NodeSpec, ParseError, TreeLayout,
        TreeValue, VertAlign, draw_tree, parse_tree,
    };

    #[cfg(feature = "extras")]
    pub use crate::{Caption, CompactTree, DoubleBrackets, Renderable, RowByRow, SideBySide};

    pub use crate::{core, svg};
    #[cfg(feature = "extras")]
    pub use crate::extras;
}

pub use lingtree_core as core;
#[cfg(feature = "extras")]
pub use lingtree_extras as extras;
pub use lingtree_svg as svg;
