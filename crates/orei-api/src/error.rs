use thiserror::Error;

/// Boxed underlying cause of a connectivity failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for the `orei-api` crate.
///
/// Every failure to get a usable answer out of the device (refused
/// connection, timeout, non-2xx status, malformed body) is reported as
/// [`Error::Connectivity`] so callers can treat transport trouble uniformly.
/// The remaining variants only occur while *building* a client.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The device could not be reached or did not answer with a JSON object.
    #[error("Cannot connect to {host}: {source}")]
    Connectivity {
        host: String,
        #[source]
        source: Cause,
    },

    // ── Construction ────────────────────────────────────────────────
    /// The host/port pair does not form a valid URL.
    #[error("Invalid device address: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn connectivity(host: &str, source: impl Into<Cause>) -> Self {
        Self::Connectivity {
            host: host.to_owned(),
            source: source.into(),
        }
    }

    /// Host named in a connectivity error.
    pub fn host(&self) -> Option<&str> {
        match self {
            Self::Connectivity { host, .. } => Some(host),
            _ => None,
        }
    }

    /// Returns `true` if the request was abandoned because it timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Connectivity { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }

    /// HTTP status returned by the device, when the failure was a non-2xx reply.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Connectivity { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .and_then(reqwest::Error::status)
                .map(|s| s.as_u16()),
            _ => None,
        }
    }
}
