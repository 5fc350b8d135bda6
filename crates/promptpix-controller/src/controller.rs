use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use promptpix_config::ImageGenConfig;
use promptpix_imagegen::{GenerationRequest, GenerationResult, ImageGenError, ImageGenProvider, OpenAiImageGenProvider};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::SubmitError;
use crate::state::{Failure, RequestId, Snapshot, Status};

/// Single-flight controller for generate-image requests
///
/// Cloning is cheap; clones share the same state and in-flight slot.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    provider: Arc<dyn ImageGenProvider>,
    state: watch::Sender<Snapshot>,
    in_flight: Mutex<Option<InFlight>>,
    next_id: AtomicU64,
}

/// The request currently allowed to publish its outcome
struct InFlight {
    id: RequestId,
    cancel: CancellationToken,
}

impl Controller {
    /// Create a controller that sends requests through `provider`
    pub fn new(provider: Arc<dyn ImageGenProvider>) -> Self {
        let (state, _) = watch::channel(Snapshot::default());

        Self {
            inner: Arc::new(ControllerInner {
                provider,
                state,
                in_flight: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Create a controller backed by the configured `OpenAI`-style endpoint
    ///
    /// Fails with [`ImageGenError::ConfigError`] when the settings cannot
    /// drive a request.
    pub fn from_config(config: &ImageGenConfig) -> Result<Self, ImageGenError> {
        let provider = OpenAiImageGenProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider)))
    }

    /// Submit a prompt for generation
    ///
    /// The controller is `Loading` by the time this returns; the request
    /// itself runs on a spawned task. Empty prompts and submissions made
    /// while another request is in flight are refused without contacting
    /// the upstream.
    pub fn submit(&self, prompt: &str) -> Result<RequestId, SubmitError> {
        if prompt.trim().is_empty() {
            return Err(SubmitError::EmptyPrompt);
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SubmitError::NoRuntime)?;

        let mut in_flight = self.inner.lock_in_flight();

        if let Some(current) = in_flight.as_ref() {
            tracing::debug!(request_id = %current.id, "submission refused while a request is in flight");
            return Err(SubmitError::Busy(current.id));
        }

        let id = RequestId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();

        *in_flight = Some(InFlight {
            id,
            cancel: cancel.clone(),
        });
        self.inner.state.send_modify(|snapshot| snapshot.status = Status::Loading(id));
        drop(in_flight);

        tracing::info!(
            request_id = %id,
            provider = %self.inner.provider.name(),
            prompt_len = prompt.len(),
            "image generation submitted"
        );

        let request = GenerationRequest::new(prompt);
        runtime.spawn(Arc::clone(&self.inner).run(id, request, cancel));

        Ok(id)
    }

    /// Abandon the in-flight request, if any
    ///
    /// Returns to `Idle` with the displayed image untouched. A response
    /// that arrives afterwards is discarded.
    pub fn cancel(&self) -> bool {
        let mut in_flight = self.inner.lock_in_flight();

        let Some(current) = in_flight.take() else {
            return false;
        };

        current.cancel.cancel();
        self.inner.state.send_modify(|snapshot| snapshot.status = Status::Idle);

        tracing::info!(request_id = %current.id, "image generation cancelled");
        true
    }

    /// Current state
    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.borrow().clone()
    }

    /// URL of the most recently generated image
    pub fn image_url(&self) -> Option<String> {
        self.inner.state.borrow().image_url.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn status(&self) -> Status {
        self.inner.state.borrow().status.clone()
    }

    /// Watch every state change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.state.subscribe()
    }

    /// Wait until nothing is in flight and return that state
    ///
    /// There is no timeout: an upstream that never answers keeps this
    /// pending until [`Controller::cancel`] is called.
    pub async fn settled(&self) -> Snapshot {
        let mut receiver = self.subscribe();

        // The sender lives as long as `self`, so the channel cannot close here
        match receiver.wait_for(|snapshot| !snapshot.is_loading()).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

impl ControllerInner {
    fn lock_in_flight(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(self: Arc<Self>, id: RequestId, request: GenerationRequest, cancel: CancellationToken) {
        let guard = CompletionGuard {
            inner: Arc::clone(&self),
            id,
            done: false,
        };

        let outcome = tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!(request_id = %id, "dropping cancelled image generation request");
                return;
            }
            outcome = self.provider.generate(&request) => outcome,
        };

        guard.complete(outcome);
    }

    /// Publish the outcome of `id` unless it has been cancelled or superseded
    fn complete(&self, id: RequestId, outcome: Result<GenerationResult, ImageGenError>) {
        let mut in_flight = self.lock_in_flight();

        if in_flight.as_ref().map(|current| current.id) != Some(id) {
            tracing::debug!(request_id = %id, "discarding stale image generation outcome");
            return;
        }

        *in_flight = None;

        match outcome {
            Ok(result) => {
                tracing::info!(request_id = %id, "image generated");

                self.state.send_modify(|snapshot| {
                    snapshot.image_url = Some(result.image_url);
                    snapshot.status = Status::Idle;
                });
            }
            Err(error) => {
                tracing::warn!(
                    request_id = %id,
                    status = ?error.upstream_status(),
                    error = %error,
                    "image generation failed"
                );

                self.state.send_modify(|snapshot| {
                    snapshot.status = Status::Failed(Failure { request: id, error });
                });
            }
        }
    }
}

/// Publishes a failure for a request task that ends without an outcome
///
/// Covers a provider that panics and a task dropped by runtime shutdown.
/// After a cancellation the slot no longer holds `id`, so the failure is
/// discarded like any other stale outcome.
struct CompletionGuard {
    inner: Arc<ControllerInner>,
    id: RequestId,
    done: bool,
}

impl CompletionGuard {
    fn complete(mut self, outcome: Result<GenerationResult, ImageGenError>) {
        self.done = true;
        self.inner.complete(self.id, outcome);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if !self.done {
            self.inner.complete(
                self.id,
                Err(ImageGenError::Internal(
                    "request task ended before the provider answered".to_string(),
                )),
            );
        }
    }
}
