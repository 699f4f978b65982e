//! Error and data-quality warning types.
//!
//! Errors abort an operation and propagate to the caller. Warnings describe
//! person records that were degraded gracefully (a reference dropped, a
//! duplicate ignored) and are collected alongside a successful build.

use std::fmt;

use serde::Serialize;

use crate::graph::{PersonId, Relation};

/// Errors surfaced by the chart core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Non-empty input in which every person is somebody's child.
    #[error("no forest root among {people} people: the parent links form a cycle")]
    MalformedGraph { people: usize },

    /// A layout parameter that cannot produce a valid chart.
    #[error("invalid layout parameter `{name}`: {reason}")]
    InvalidLayoutParams { name: &'static str, reason: String },

    /// Person records that are not JSON-array shaped.
    #[error("failed to parse person records: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation that needs a hierarchy was called before any load.
    #[error("no hierarchy has been built yet")]
    NotBuilt,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal data-integrity finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataWarning {
    /// `from` references `missing`, which is not in the input.
    DanglingReference {
        from: PersonId,
        missing: PersonId,
        relation: Relation,
    },
    /// A second record with an id that was already seen; the first one wins.
    DuplicatePerson { id: PersonId },
    /// A person listing themselves as their own child or partner.
    SelfReference { id: PersonId, relation: Relation },
    /// `child.parentsIds` names `parent`, but `parent.childrenIds` does not
    /// name `child`.
    ParentMismatch { child: PersonId, parent: PersonId },
    /// The parent links contain at least one cycle.
    CycleDetected,
    /// A person that could not be placed anywhere in the forest.
    Unreachable { id: PersonId },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference {
                from,
                missing,
                relation,
            } => write!(f, "{from} references unknown {relation} {missing}"),
            Self::DuplicatePerson { id } => write!(f, "duplicate person record {id} ignored"),
            Self::SelfReference { id, relation } => {
                write!(f, "{id} lists themselves as {relation}")
            }
            Self::ParentMismatch { child, parent } => {
                write!(f, "{child} names parent {parent}, who does not list them as a child")
            }
            Self::CycleDetected => f.write_str("parent links contain a cycle"),
            Self::Unreachable { id } => write!(f, "{id} is unreachable from every forest root"),
        }
    }
}
