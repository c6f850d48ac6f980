use arbor_core::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Hierarchy(#[from] arbor_core::Error),

    #[error(transparent)]
    Layout(#[from] arbor_layout::Error),

    #[error("Invalid option `{name}`: {message}")]
    InvalidOption { name: &'static str, message: String },

    #[error("Unknown curve: {name}")]
    UnknownCurve { name: String },

    #[error("Style config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            message: message.into(),
        }
    }

    /// Failure class; everything that is not a hierarchy error is a configuration problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Hierarchy(e) => e.kind(),
            Error::Layout(_)
            | Error::InvalidOption { .. }
            | Error::UnknownCurve { .. }
            | Error::Json(_) => ErrorKind::Configuration,
        }
    }
}
