use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Designspace document could not be read.
    #[error("cannot load Designspace {}: {message}", path.display())]
    LoadDesignspace { path: PathBuf, message: String },

    /// A UFO could not be read.
    #[error("cannot load UFO {}: {message}", path.display())]
    LoadUfo { path: PathBuf, message: String },

    /// A UFO could not be written back.
    #[error("cannot save UFO {}: {message}", path.display())]
    SaveUfo { path: PathBuf, message: String },

    /// Two master sources share a name, so their kerning cannot be told apart.
    #[error("Designspace sources must have unique names, '{0}' is repeated")]
    DuplicateSource(String),

    /// A pass or command was given an option it cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
