pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum Error {
    /// Rejected before any network call was made.
    #[display(fmt = "invalid input: {}", _0)]
    InvalidInput(String),
    #[display(fmt = "transport fault: {}", _0)]
    Transport(String),
    #[display(fmt = "provider error ({}): {}", status, body)]
    Provider { status: u16, body: String },
    /// Caller bug; fatal for the whole run.
    #[display(fmt = "configuration error: {}", _0)]
    Config(String),
    #[display(fmt = "no embedding available for text {}", index)]
    MissingEmbedding { index: usize },
    #[display(fmt = "zero-norm embedding for text {}", index)]
    DegenerateVector { index: usize },
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
