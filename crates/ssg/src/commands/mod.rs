//! CLI command implementations.

pub(crate) mod graph;
mod site_args;
pub(crate) mod tree;

pub(crate) use graph::GraphArgs;
pub(crate) use tree::TreeArgs;
