//! Per-record lookup errors

use citegraph_core::http::HttpError;

/// Why one record produced no citation/reference data.
///
/// None of these stop the run: the record is skipped and the loop moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Neither DOI nor PubMed ID; no request was made
    NoIdentifier,
    /// The service answered with a non-success status
    FetchFailed { status: u16 },
    /// Transport failure or unreadable response body
    RequestError { detail: String },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoIdentifier => write!(f, "No DOI or PubMed ID available"),
            Self::FetchFailed { status } => {
                write!(f, "Failed to fetch data: status code {status}")
            }
            Self::RequestError { detail } => write!(f, "Request failed: {detail}"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<HttpError> for ResolveError {
    fn from(e: HttpError) -> Self {
        match e.status {
            Some(status) => Self::FetchFailed { status },
            None => Self::RequestError { detail: e.message },
        }
    }
}

impl ResolveError {
    /// Whether re-running cannot help: the service does not know the work.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::FetchFailed { status: 404 })
    }

    /// Recognize a persisted permanent failure from its error message.
    pub fn is_permanent_message(message: &str) -> bool {
        message.trim() == Self::FetchFailed { status: 404 }.to_string()
    }
}
