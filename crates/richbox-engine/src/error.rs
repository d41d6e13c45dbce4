use thiserror::Error;

use crate::tree::{NodeId, TreeError};

/// Why a formatting command did not run.
///
/// Every variant is handled inside the command invocation that produced it:
/// the content is left exactly as it was before the attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("this command needs selected text")]
    NoSelection,
    #[error("input was cancelled")]
    CancelledInput,
    #[error("the saved selection points at removed content ({0:?})")]
    StaleRange(NodeId),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Failure to parse a command argument from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}
