//! Raw tree → normalized model.
//!
//! [`pass`] walks the tree and owns traversal concerns (visibility, unrenderable kinds, repeated
//! ids, depth). [`mapper`] turns one raw node into its layout and style, driven by the lookup
//! tables in [`tables`].

pub(crate) mod mapper;
pub mod pass;
pub(crate) mod tables;

pub use pass::{MAX_DEPTH, NormalizedTree, SourceInfo, normalize};
