#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid node size [{dx}, {dy}]: both components must be finite and positive")]
    InvalidNodeSize { dx: f64, dy: f64 },
    #[error("unknown layout algorithm: {name}")]
    UnknownAlgorithm { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
