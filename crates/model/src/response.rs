use serde::{Deserialize, Serialize};

/// A response from the model provider.
///
/// Providers that stream internally should assemble the full text
/// before returning it; callers only ever see the complete reply.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated reply text.
    pub text: String,
}

impl GenerationResponse {
    /// Creates a response with the given reply text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
