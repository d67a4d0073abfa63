#![warn(clippy::all)]
#[macro_use]
extern crate html5ever;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate maplit;

pub mod arena_dom;
mod cleaner;
pub mod config;
mod error;
mod normalize;
mod protocol;
mod transformer;
mod whitelist;

pub use crate::arena_dom::{
    parse_document, parse_fragment, to_html, Arena, Node, NodeArena, NodeData, NodeKind, Ref,
};
pub use crate::cleaner::Cleaner;
pub use crate::config::Preset;
pub use crate::error::Error;
pub use crate::normalize::{normalize_key, normalize_scheme};
pub use crate::protocol::{enforce_protocol, ProtocolError};
pub use crate::transformer::{NodeView, PostCleanFn, Transform, TransformFn};
pub use crate::whitelist::{Tagdef, Whitelist};
