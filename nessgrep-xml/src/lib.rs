//! Minimal owned XML tree for reading scan reports.
//!
//! Built from `quick-xml` events. The tree keeps text, CDATA and comments in
//! document order so that [`Element::to_xml`] reproduces a faithful textual
//! form of any subtree.

pub mod error;
pub mod escape;
pub mod tree;

pub use error::ParseError;
pub use tree::{Document, Element, ElementsByTag, Node};
