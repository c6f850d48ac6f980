pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Input collection is empty")]
    EmptyInput,

    #[error("Row {row} has no {key}")]
    UnaddressableRow { row: usize, key: &'static str },

    #[error("Multiple roots: {first} and {second}")]
    MultipleRoots { first: String, second: String },

    #[error("No root: every row references a parent")]
    NoRoot,

    #[error("Missing parent: {parent_id} (referenced by {child})")]
    MissingParent { child: String, parent_id: String },

    #[error("Ambiguous parent: {parent_id} matches more than one row")]
    AmbiguousParent { parent_id: String },

    #[error("Cycle detected: {} row(s) unreachable from the root ({})", ids.len(), ids.join(", "))]
    Cycle { ids: Vec<String> },
}

/// Coarse classification used by callers that only care about the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No addressing mode is satisfiable, or an option value is invalid.
    Configuration,
    /// Cyclic, multi-root, or dangling-reference tabular input.
    Structural,
    /// Nothing to draw.
    DegenerateInput,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } => ErrorKind::Configuration,
            Error::EmptyInput => ErrorKind::DegenerateInput,
            Error::UnaddressableRow { .. }
            | Error::MultipleRoots { .. }
            | Error::NoRoot
            | Error::MissingParent { .. }
            | Error::AmbiguousParent { .. }
            | Error::Cycle { .. } => ErrorKind::Structural,
        }
    }
}
