use thiserror::Error;

#[derive(Debug, Error)]
pub enum GirError {
    #[error("the document has no <repository> root element")]
    MissingRepository,
    #[error("the repository contains no <namespace> element")]
    MissingNamespace,
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse GIR document")]
    Xml(#[from] roxmltree::Error),
}
