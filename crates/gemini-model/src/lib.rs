//! A model provider for the Gemini `generateContent` API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use classmate_model::{
    ErrorKind, GenerationRequest, GenerationResponse, ModelProvider,
    ModelProviderError,
};
use regex::Regex;
use reqwest::{Client, StatusCode};

pub use config::{GeminiConfig, GeminiConfigBuilder};

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

/// Gemini model provider.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for GeminiProvider {
    type Error = Error;

    fn generate(
        &self,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationResponse, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(req);
        let resp_fut = self
            .client
            .post(format!(
                "{}/{}:generateContent",
                self.config.base_url, self.config.model
            ))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&gemini_req)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    let message = format!("{err}");
                    let kind = classify_error(err.status(), &message);
                    return Err(Error::new(message, kind));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let message = match serde_json::from_str::<proto::ErrorResponse>(&body)
                {
                    Ok(parsed) => format!("{}: {}", status, parsed.error.message),
                    Err(_) => format!("{}: {}", status, body),
                };
                warn!("request failed: {message}");
                return Err(Error::new(
                    message.clone(),
                    classify_error(Some(status), &message),
                ));
            }

            // Here we got a successful response.
            let resp: proto::GenerateContentResponse =
                match resp.json().await {
                    Ok(resp) => resp,
                    Err(err) => {
                        return Err(Error::new(
                            format!("{err}"),
                            ErrorKind::Other,
                        ));
                    }
                };
            let Some(text) = resp.first_candidate_text() else {
                return Err(Error::new(
                    "response contained no generated text",
                    ErrorKind::Other,
                ));
            };
            trace!("got a reply of {} bytes", text.len());
            Ok(GenerationResponse::new(text))
        }
    }
}

/// Decides the error kind from the raw provider error, once.
///
/// A failure is rate-limited when the HTTP status is 429, or the error
/// text mentions "429" or (case-insensitively) "quota". Rate-limited
/// errors also carry the provider-suggested wait duration when the text
/// includes a `retry in <N>s` hint.
fn classify_error(status: Option<StatusCode>, text: &str) -> ErrorKind {
    let rate_limited = status
        .is_some_and(|s| s == StatusCode::TOO_MANY_REQUESTS)
        || text.contains("429")
        || text.to_lowercase().contains("quota");
    if rate_limited {
        ErrorKind::RateLimited {
            retry_after: parse_retry_hint(text),
        }
    } else {
        ErrorKind::Other
    }
}

fn parse_retry_hint(text: &str) -> Option<Duration> {
    static RETRY_HINT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"retry in (\d+\.?\d*)s").expect("hard-coded pattern")
    });
    let captures = RETRY_HINT.captures(text)?;
    let secs: f64 = captures[1].parse().ok()?;
    Some(Duration::from_secs_f64(secs))
}
