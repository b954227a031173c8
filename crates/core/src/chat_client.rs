use std::time::Duration;

use classmate_model::{
    ErrorKind, GenerationRequest, ModelProvider, ModelProviderError,
};
use tokio::time::sleep;

use crate::conversation::{Role, Transcript};

const DEFAULT_MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(5);
const ERROR_PREFIX: &str = "An error occurred: ";
const EXHAUSTED_MESSAGE: &str = "Sorry, I can't respond right now because \
the usage limit was exceeded. Please try again in a few minutes.";

/// A progress notice emitted before every retry attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RetryNotice {
    /// The delay the client is about to wait.
    pub delay: Duration,
    /// The attempt number this notice belongs to, starting at 1.
    pub attempt: u32,
    /// The attempt bound for this call.
    pub max_retries: u32,
}

type RetryCallback = Box<dyn Fn(&RetryNotice) + Send + Sync>;

/// [`ChatClient`] builder.
pub struct ChatClientBuilder<P> {
    provider: P,
    max_retries: u32,
    on_retry: Option<RetryCallback>,
}

impl<P: ModelProvider> ChatClientBuilder<P> {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider(provider: P) -> Self {
        Self {
            provider,
            max_retries: DEFAULT_MAX_RETRIES,
            on_retry: None,
        }
    }

    /// Sets the attempt bound for rate-limited calls.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Attaches a callback to be invoked before every retry attempt.
    #[inline]
    pub fn on_retry(
        mut self,
        on_retry: impl Fn(&RetryNotice) + Send + Sync + 'static,
    ) -> Self {
        self.on_retry = Some(Box::new(on_retry));
        self
    }

    /// Builds the client with an empty transcript.
    #[inline]
    pub fn build(self) -> ChatClient<P> {
        ChatClient {
            provider: self.provider,
            transcript: Transcript::default(),
            max_retries: self.max_retries,
            on_retry: self.on_retry,
        }
    }
}

/// A chat client that sends the whole conversation as context with
/// every message and retries rate-limited calls a bounded number of
/// times.
///
/// The client owns its [`Transcript`]. The transcript is only mutated
/// after a confirmed success: a failed call leaves it exactly as it
/// was, so a retried prompt renders identically to the first attempt.
pub struct ChatClient<P> {
    provider: P,
    transcript: Transcript,
    max_retries: u32,
    on_retry: Option<RetryCallback>,
}

impl<P: ModelProvider> ChatClient<P> {
    /// Returns the transcript accumulated so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// All failure modes resolve to a returned string: a permanent
    /// error returns immediately with a prefixed description, and a
    /// call that stays rate limited through every attempt returns a
    /// fixed unavailability message. `send` never surfaces an error
    /// type to the caller.
    pub async fn send(&mut self, message: &str) -> String {
        self.send_with_max_retries(message, self.max_retries).await
    }

    /// Like [`ChatClient::send`], with an explicit attempt bound for
    /// this call only.
    pub async fn send_with_max_retries(
        &mut self,
        message: &str,
        max_retries: u32,
    ) -> String {
        let mut attempts = 0;
        let mut last_delay = INITIAL_RETRY_DELAY;

        // The initial send consumes an attempt slot, matching a
        // `while attempts < max_retries` bound.
        while attempts < max_retries {
            let prompt = self.transcript.render_prompt(message);
            let result =
                self.provider.generate(&GenerationRequest::new(prompt)).await;

            let err = match result {
                Ok(resp) => {
                    self.transcript.push(Role::User, message.to_string());
                    self.transcript
                        .push(Role::Assistant, resp.text.clone());
                    return resp.text;
                }
                Err(err) => err,
            };

            match err.kind() {
                ErrorKind::RateLimited { retry_after } => {
                    attempts += 1;

                    // An explicit hint becomes the new carried default;
                    // without one we reuse the previous delay.
                    let delay = match retry_after {
                        Some(suggested) => {
                            last_delay = suggested;
                            suggested
                        }
                        None => last_delay,
                    };

                    warn!(
                        "rate limited, retrying in {:.1}s (attempt {}/{})",
                        delay.as_secs_f64(),
                        attempts,
                        max_retries
                    );
                    if let Some(on_retry) = &self.on_retry {
                        on_retry(&RetryNotice {
                            delay,
                            attempt: attempts,
                            max_retries,
                        });
                    }
                    sleep(delay).await;
                }
                ErrorKind::Other => {
                    error!("permanent error from provider: {err}");
                    return format!("{ERROR_PREFIX}{err}");
                }
            }
        }

        EXHAUSTED_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use classmate_test_model::{PresetOutcome, TestModelProvider};

    use super::*;
    use crate::conversation::Role;

    fn client_for(
        provider: &TestModelProvider,
    ) -> ChatClient<TestModelProvider> {
        ChatClientBuilder::with_model_provider(provider.clone()).build()
    }

    #[tokio::test]
    async fn test_transcript_grows_two_entries_per_exchange() {
        let provider = TestModelProvider::default();
        provider.push_outcome(PresetOutcome::reply("Hello!"));
        provider.push_outcome(PresetOutcome::reply("Fine, thanks."));

        let mut client = client_for(&provider);
        assert_eq!(client.send("Hi").await, "Hello!");
        assert_eq!(client.send("How are you?").await, "Fine, thanks.");

        let entries = client.transcript().entries();
        assert_eq!(entries.len(), 4);
        let roles: Vec<Role> = entries.iter().map(|e| e.role()).collect();
        assert_eq!(
            roles,
            [Role::User, Role::Assistant, Role::User, Role::Assistant]
        );

        // The second prompt carries the first exchange as context, with
        // the empty assistant label.
        assert_eq!(
            provider.seen_prompts()[1],
            "User: Hi\n: Hello!\nUser: How are you?"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_call_is_retried() {
        let provider = TestModelProvider::default();
        provider.push_outcome(PresetOutcome::rate_limited(
            "429 quota exceeded",
            None,
        ));
        provider.push_outcome(PresetOutcome::reply("Recovered."));

        let mut client = client_for(&provider);
        assert_eq!(client.send("Hi").await, "Recovered.");
        assert_eq!(provider.seen_prompts().len(), 2);
        assert_eq!(client.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let provider = TestModelProvider::default();
        provider.push_outcome(PresetOutcome::failure("invalid argument"));

        let mut client = client_for(&provider);
        let reply = client.send("Hi").await;
        assert_eq!(reply, "An error occurred: invalid argument");
        assert_eq!(provider.seen_prompts().len(), 1);
        assert!(client.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_hint_is_carried_over() {
        let provider = TestModelProvider::default();
        provider.push_outcome(PresetOutcome::rate_limited(
            "quota exceeded, retry in 12.5s",
            Some(Duration::from_secs_f64(12.5)),
        ));
        provider.push_outcome(PresetOutcome::rate_limited(
            "quota exceeded",
            None,
        ));
        provider.push_outcome(PresetOutcome::reply("Recovered."));

        let notices = Arc::new(Mutex::new(Vec::new()));
        let mut client = ChatClientBuilder::with_model_provider(
            provider.clone(),
        )
        .on_retry({
            let notices = Arc::clone(&notices);
            move |notice: &RetryNotice| {
                notices.lock().unwrap().push(*notice);
            }
        })
        .build();

        assert_eq!(client.send("Hi").await, "Recovered.");

        let notices = notices.lock().unwrap();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].delay, Duration::from_secs_f64(12.5));
        assert_eq!(notices[0].attempt, 1);
        // The hint-less second failure reuses the carried delay.
        assert_eq!(notices[1].delay, Duration::from_secs_f64(12.5));
        assert_eq!(notices[1].attempt, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_delay_without_hint() {
        let provider = TestModelProvider::default();
        provider.push_outcome(PresetOutcome::rate_limited(
            "quota exceeded",
            None,
        ));
        provider.push_outcome(PresetOutcome::reply("Recovered."));

        let notices = Arc::new(Mutex::new(Vec::new()));
        let mut client = ChatClientBuilder::with_model_provider(
            provider.clone(),
        )
        .on_retry({
            let notices = Arc::clone(&notices);
            move |notice: &RetryNotice| {
                notices.lock().unwrap().push(*notice);
            }
        })
        .build();

        client.send("Hi").await;
        assert_eq!(
            notices.lock().unwrap()[0].delay,
            Duration::from_secs(5)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_leave_transcript_unchanged() {
        let provider = TestModelProvider::default();
        for _ in 0..3 {
            provider.push_outcome(PresetOutcome::rate_limited(
                "429 quota exceeded",
                None,
            ));
        }

        let mut client = client_for(&provider);
        let reply = client.send("Hi").await;
        assert_eq!(reply, EXHAUSTED_MESSAGE);
        assert_eq!(provider.seen_prompts().len(), 3);
        assert!(client.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_max_retries_bound() {
        let provider = TestModelProvider::default();
        provider.push_outcome(PresetOutcome::rate_limited(
            "quota exceeded",
            None,
        ));
        // One more scripted success that must never be reached.
        provider.push_outcome(PresetOutcome::reply("Too late."));

        let mut client = client_for(&provider);
        let reply = client.send_with_max_retries("Hi", 1).await;
        assert_eq!(reply, EXHAUSTED_MESSAGE);
        assert_eq!(provider.seen_prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_prompt_renders_identically_on_retry() {
        let provider = TestModelProvider::default();
        provider.push_outcome(PresetOutcome::reply("Hello!"));
        provider.push_outcome(PresetOutcome::rate_limited(
            "quota",
            Some(Duration::from_millis(1)),
        ));
        provider.push_outcome(PresetOutcome::reply("Recovered."));

        let mut client = client_for(&provider);
        client.send("Hi").await;
        client.send("Again").await;

        let prompts = provider.seen_prompts();
        // The transcript was not mutated by the failed attempt, so the
        // re-rendered prompt is identical.
        assert_eq!(prompts[1], prompts[2]);
    }
}
