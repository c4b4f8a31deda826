//! HTML fragment trees.
//!
//! Rendered markdown is parsed into a kuchiki DOM that can be walked,
//! edited in place, and serialized back to HTML with html5ever's serializer.
//! Parsing sits behind the [`FragmentParser`] trait so malformed input is
//! repaired the way browsers repair it, and tests can inject their own
//! parser.

mod blocks;
mod node;
mod parser;

pub use blocks::BlockTable;
pub use kuchiki::NodeRef;
pub use node::{Fragment, NodeExt, element};
pub use parser::{FragmentParser, Html5Parser};
