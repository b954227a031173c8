use std::time::Duration;

/// A scripted outcome for one generation request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PresetOutcome {
    /// The request succeeds with this reply text.
    Reply(String),
    /// The request fails with a rate-limit error.
    RateLimited {
        /// The raw error text.
        message: String,
        /// The wait hint carried by the error, if any.
        retry_after: Option<Duration>,
    },
    /// The request fails with a permanent error.
    Failure(String),
}

impl PresetOutcome {
    /// Creates a successful reply outcome.
    #[inline]
    pub fn reply<S: Into<String>>(text: S) -> Self {
        Self::Reply(text.into())
    }

    /// Creates a rate-limited outcome with an optional wait hint.
    #[inline]
    pub fn rate_limited<S: Into<String>>(
        message: S,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a permanent failure outcome.
    #[inline]
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self::Failure(message.into())
    }
}
