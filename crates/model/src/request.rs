use serde::{Deserialize, Serialize};

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The full prompt text, including any prior conversation context
    /// the caller wants the model to see.
    pub prompt: String,
}

impl GenerationRequest {
    /// Creates a request from the given prompt text.
    #[inline]
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
