use std::io;
use std::num::ParseIntError;

/// Everything that can go wrong while building a volcano or searching it. None of these are
/// expected with well-formed puzzle input, so callers usually just propagate them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tunnel leads to a valve that was never declared.
    #[error("valve {from} has a tunnel to undeclared valve {to}")]
    MissingNode { from: String, to: String },
    #[error("valve {0} is declared more than once")]
    DuplicateValve(String),
    #[error("{0} valves declared, at most 128 are supported")]
    TooManyValves(usize),
    #[error("unknown valve {0}")]
    UnknownValve(String),
    /// A valve set refers to a handle that doesn't exist in this volcano.
    #[error("valve handle {0} is out of range")]
    ValveOutOfRange(usize),
    #[error("no path from {from} to {to}")]
    UnreachableNode { from: String, to: String },
    #[error("invalid time budget: {0} minutes")]
    InvalidBudget(i64),
    #[error("search gave up after {0} state expansions")]
    BudgetExhausted(u64),
    #[error("unexpected line format: {0}")]
    Format(String),
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    #[error("io error {0}")]
    Io(#[from] io::Error),
}
