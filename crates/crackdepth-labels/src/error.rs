use std::path::PathBuf;

/// An error type for the labels module.
#[derive(thiserror::Error, Debug)]
pub enum LabelError {
    /// The annotation directory does not exist.
    #[error("Annotation directory does not exist: {path}", path = .0.display())]
    DirectoryDoesNotExist(PathBuf),

    /// Error reading or writing a file.
    #[error("Failed to access {path}. {err}", path = .0.display(), err = .1)]
    Io(PathBuf, #[source] std::io::Error),

    /// The document is not well formed XML.
    #[error("Malformed XML. {0}")]
    Xml(#[from] quick_xml::Error),

    /// A label text holds an invalid escape sequence.
    #[error("Invalid escape sequence in label. {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// The document ends with open elements.
    #[error("Element <{0}> is never closed")]
    UnclosedElement(String),

    /// A document could not be rewritten.
    #[error("Failed to rewrite {}. {}", .path.display(), .source)]
    Document {
        /// Path of the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<LabelError>,
    },
}
