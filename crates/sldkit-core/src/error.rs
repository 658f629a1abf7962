pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed SLD XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// One link of the `StyledLayerDescriptor/NamedLayer/UserStyle/FeatureTypeStyle` chain is
    /// missing.
    #[error("Not an editable SLD document: missing <{element}>")]
    MissingElement { element: &'static str },

    #[error("Invalid style model: {message}")]
    InvalidModel { message: String },
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidModel {
            message: value.to_string(),
        }
    }
}
