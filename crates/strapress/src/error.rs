#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Strapi API error: {status} {status_text}")]
    Transport { status: u16, status_text: String },

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode Strapi response: {0}")]
    Decode(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to load {what}: {source}")]
    Load {
        what: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// HTTP status of the underlying transport failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => Some(*status),
            Error::Load { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Load { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
