//! Minimal HTML tree used to edit templates.
//!
//! Templates are parsed with html5ever into an arena, edited in place and
//! written back with [`serialize_document`].

mod arena;
mod scan;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, HtmlDom, Node, NodeData, NodeId};
pub use scan::has_root_element;
pub use serialize::{serialize_document, serialize_node};
pub use tree_sink::{parse_html, DomSink};
