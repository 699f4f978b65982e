//! Genealogy data structures and hierarchy construction.
//!
//! Person records come in flat. The kinship index resolves their references
//! on petgraph's StableGraph, and the builder turns them into the rooted
//! [`TreeNode`] forest the layout engine positions.

mod builder;
mod kinship;
mod node;
mod person;

pub use builder::{BuildOutcome, build};
pub use kinship::KinshipIndex;
pub use node::{NodeRole, ROOT_ID, TreeNode};
pub use person::{Person, PersonId, Relation, parse_people};
