use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Jira request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Jira returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("result set exceeded the safety cap of {max_pages} pages")]
    TooManyPages { max_pages: u32 },

    #[error("unknown stream: {0}")]
    UnknownStream(String),

    #[error("invalid date: {0}")]
    DateParse(String),

    #[error("holiday calendar error: {0}")]
    Holiday(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl Error {
    /// True when the failure was caused by the caller's input rather than
    /// this service or its upstreams.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::UnknownStream(_) | Error::DateParse(_))
    }

    /// True when the issue tracker itself failed or misbehaved.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Upstream { .. } | Error::TooManyPages { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
