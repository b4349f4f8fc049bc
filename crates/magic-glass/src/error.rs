use magic_glass_image::ImageError;
use magic_glass_io::IoError;

/// Error type for the viewer session and its configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse the configuration. {0}")]
    ConfigParseError(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("Failed to read the configuration file. {0}")]
    FileError(#[from] std::io::Error),

    /// The session was handed an image without pixels.
    #[error("Cannot open an empty image of size {0}x{1}")]
    EmptyImage(usize, usize),

    /// A processing step failed.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Reading or writing a file failed.
    #[error(transparent)]
    IoError(#[from] IoError),
}
