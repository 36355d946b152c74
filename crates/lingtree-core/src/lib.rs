#![forbid(unsafe_code)]

//! Core: constituent tree layout and SVG rendering.
//!
//! The heart of the crate is [`TreeLayout`]: feed it a [`TreeValue`] plus
//! [`LayoutOptions`] and it runs the sizing passes, answers geometry
//! queries, carries annotations, and renders to an SVG [`Document`].
//!
//! ```
//! use lingtree_core::{LayoutOptions, TreeLayout, parse_tree};
//!
//! let tree = parse_tree("(S (NP I) (VP (V saw) (NP it)))")?;
//! let layout = TreeLayout::new(tree, LayoutOptions::default());
//! let svg = layout.svg_string();
//! assert!(svg.starts_with("<?xml"));
//! # Ok::<(), lingtree_core::ParseError>(())
//! ```
//!
//! [`Document`]: lingtree_svg::Document

pub mod adapter;
pub mod annotate;
pub mod edge;
pub mod error;
pub mod layout;
pub mod node;
pub mod options;
pub mod parse;
pub mod render;

pub use adapter::{
    TreeValue, common_prefix, is_leaf, leaf_labels, leaf_nodecount, split, split_in, tree_depth,
};
pub use annotate::{ArrowStyle, BoxStyle, UnderlineStyle};
pub use edge::{EdgeKind, EdgeStyle};
pub use error::LayoutError;
pub use layout::{LayoutNode, StyleOverrides, TreeLayout};
pub use node::{LabelBlock, NodeBox, NodeSpec};
pub use options::{FontSpec, HorizSpacing, LayoutOptions, TreeAdapterFn, VertAlign};
pub use parse::{ParseError, parse_tree};
