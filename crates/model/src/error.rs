use std::time::Duration;

/// The kind of error that occurred.
///
/// The kind is decided once, at the boundary where the raw provider
/// error is received. Downstream code matches on the kind and never
/// inspects the error text again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The provider is rate limited or the quota is exhausted.
    RateLimited {
        /// The wait duration suggested by the provider, if it sent one.
        retry_after: Option<Duration>,
    },
    /// Any other errors.
    Other,
}

impl ErrorKind {
    /// Returns `true` if this error may succeed when retried later.
    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ErrorKind::RateLimited { .. })
    }
}
