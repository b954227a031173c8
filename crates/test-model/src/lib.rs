//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::sync::{Arc, Mutex};

use classmate_model::{
    ErrorKind, GenerationRequest, GenerationResponse, ModelProvider,
    ModelProviderError,
};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how
/// the model should respond to each request in order. Every request
/// consumes one scripted outcome; running past the end of the script
/// is an error. Received prompts are recorded and can be inspected
/// with [`TestModelProvider::seen_prompts`].
///
/// # Note
///
/// This type is not optimized for production use. You should only use
/// it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<VecDeque<PresetOutcome>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl TestModelProvider {
    /// Appends an outcome to the script.
    pub fn push_outcome(&self, outcome: PresetOutcome) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(outcome);
    }

    /// Returns the prompts received so far, in order.
    pub fn seen_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .clone()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = Error;

    fn generate(
        &self,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationResponse, Self::Error>> + Send + 'static
    {
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(req.prompt.clone());

        let outcome = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();
        let result = match outcome {
            Some(PresetOutcome::Reply(text)) => {
                Ok(GenerationResponse::new(text))
            }
            Some(PresetOutcome::RateLimited {
                message,
                retry_after,
            }) => Err(Error {
                message,
                kind: ErrorKind::RateLimited { retry_after },
            }),
            Some(PresetOutcome::Failure(message)) => Err(Error {
                message,
                kind: ErrorKind::Other,
            }),
            None => Err(Error {
                message: "no more scripted outcomes".to_string(),
                kind: ErrorKind::Other,
            }),
        };
        ready(result)
    }
}
