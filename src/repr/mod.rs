//! Model representations.

mod tree;

pub(crate) use tree::Node;
pub use tree::{NodeId, Tree, TreeValidationError, ROOT};
