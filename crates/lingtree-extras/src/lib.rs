#![forbid(unsafe_code)]

//! Extras: figure composition, semantic brackets, and a compact HTML
//! renderer built on top of the core layout engine.

pub mod brackets;
pub mod compact;
pub mod figure;

pub use brackets::DoubleBrackets;
pub use compact::{CompactError, CompactTree};
pub use figure::{Caption, Renderable, RowByRow, SideBySide};
