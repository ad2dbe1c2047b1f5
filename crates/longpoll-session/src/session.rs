use std::sync::Arc;

use chrono::Utc;
use longpoll_frame::{decode_frame, frames, Deduplicator, MessageFrame};
use longpoll_transport::{HttpResponse, HttpTransport, PollRequest, TransportError};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::channel::is_valid_channel;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::gate::{AlwaysReconnect, ReconnectGate};
use crate::handler::{MessageHandler, PollFailure};
use crate::poll_loop::poll_loop;
use crate::validators::ConditionalCacheState;

/// A long-poll subscription to one channel.
///
/// While armed, exactly one `GET <base_url><channel>` is in flight. Every
/// completion, successful or not, updates the conditional validators and
/// issues the next request unless the reconnect gate vetoes it. Dropping the
/// session disconnects it.
pub struct Session<T: HttpTransport> {
    shared: Arc<Shared<T>>,
}

/// Configures a [`Session`] before it is built.
pub struct SessionBuilder {
    base_url: String,
    channel: String,
    gate: Arc<dyn ReconnectGate>,
    config: SessionConfig,
}

impl SessionBuilder {
    /// Start configuring a session for `channel` under `base_url`.
    ///
    /// The request URL is the plain concatenation, so `base_url` normally
    /// ends with `/` (e.g. `http://example.com/lp/`).
    pub fn new(base_url: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            channel: channel.into(),
            gate: Arc::new(AlwaysReconnect),
            config: SessionConfig::default(),
        }
    }

    /// Override the reconnect gate. Default: [`AlwaysReconnect`].
    pub fn with_gate(mut self, gate: impl ReconnectGate) -> Self {
        self.gate = Arc::new(gate);
        self
    }

    /// Override session config.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Finish the session with its transport and message handler.
    pub fn build<T: HttpTransport>(self, transport: T, handler: impl MessageHandler) -> Session<T> {
        let dedup = match self.config.max_fingerprints {
            Some(limit) => Deduplicator::with_limit(limit),
            None => Deduplicator::new(),
        };
        let state = SessionState {
            armed: false,
            validators: ConditionalCacheState::new(self.config.clock_skew_guard),
            dedup,
            poller: None,
            next_generation: 0,
            requests_issued: 0,
            resume_pending: false,
        };

        Session {
            shared: Arc::new(Shared {
                url: format!("{}{}", self.base_url, self.channel),
                channel: self.channel,
                transport,
                handler: Box::new(handler),
                gate: self.gate,
                config: self.config,
                state: Mutex::new(state),
            }),
        }
    }
}

impl<T: HttpTransport> Session<T> {
    /// Arm the loop and issue the first request.
    ///
    /// Does nothing when already armed or when the channel id is invalid.
    /// Validators are seeded on the first call only; reconnecting reuses
    /// whatever the last response recorded.
    pub fn connect(&self) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let mut state = self.shared.state.lock();

        if state.armed {
            tracing::debug!(channel = %self.shared.channel, "connect ignored: already listening");
            return Ok(());
        }
        if !is_valid_channel(&self.shared.channel) {
            tracing::warn!(channel = %self.shared.channel, "connect ignored: invalid channel id");
            return Ok(());
        }

        state.validators.seed(Utc::now());
        state.armed = true;
        tracing::info!(url = %self.shared.url, "long-poll session connected");
        Shared::spawn_poller(&self.shared, &mut state, &runtime);
        Ok(())
    }

    /// Disarm the loop and cancel the in-flight request.
    ///
    /// A completion of the cancelled request is discarded: nothing is
    /// delivered and nothing is re-issued. Called from a handler, it also
    /// stops delivery of the remaining messages of the current response.
    pub fn disconnect(&self) {
        let mut state = self.shared.state.lock();
        if !state.armed {
            return;
        }
        state.armed = false;
        if let Some(poller) = state.poller.take() {
            poller.cancel.cancel();
        }
        tracing::info!(url = %self.shared.url, "long-poll session disconnected");
    }

    /// Re-query the gate after it vetoed a poll.
    ///
    /// Returns true if a request was issued. Does nothing unless the session
    /// is armed. If the polling task is still running when the gate allows
    /// the resume, its next veto is re-queried instead of idling.
    pub fn resume(&self) -> Result<bool> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        if !self.shared.state.lock().armed {
            return Ok(false);
        }

        // The gate runs unlocked; it may inspect the session.
        if !self.shared.gate.should_reconnect() {
            tracing::debug!(channel = %self.shared.channel, "resume vetoed by reconnect gate");
            return Ok(false);
        }

        let mut state = self.shared.state.lock();
        if !state.armed {
            return Ok(false);
        }
        if state.poller.is_some() {
            state.resume_pending = true;
            return Ok(false);
        }
        tracing::info!(url = %self.shared.url, "long-poll session resumed");
        Shared::spawn_poller(&self.shared, &mut state, &runtime);
        Ok(true)
    }

    /// Whether the loop is armed (polling or idle behind the gate).
    pub fn is_listening(&self) -> bool {
        self.shared.state.lock().armed
    }

    /// True while a request is in flight or about to be issued.
    pub fn is_polling(&self) -> bool {
        self.shared.state.lock().poller.is_some()
    }

    /// Full request URL.
    pub fn url(&self) -> &str {
        &self.shared.url
    }

    /// Channel id.
    pub fn channel(&self) -> &str {
        &self.shared.channel
    }

    /// Snapshot of the current validators.
    pub fn validators(&self) -> ConditionalCacheState {
        self.shared.state.lock().validators.clone()
    }

    /// Number of requests issued over the session's lifetime.
    pub fn requests_issued(&self) -> u64 {
        self.shared.state.lock().requests_issued
    }

    /// Number of frame fingerprints remembered.
    pub fn fingerprints_seen(&self) -> usize {
        self.shared.state.lock().dedup.len()
    }
}

impl<T: HttpTransport> Drop for Session<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<T: HttpTransport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.shared.url)
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

pub(crate) struct Shared<T> {
    pub(crate) url: String,
    pub(crate) channel: String,
    pub(crate) transport: T,
    pub(crate) handler: Box<dyn MessageHandler>,
    pub(crate) gate: Arc<dyn ReconnectGate>,
    pub(crate) config: SessionConfig,
    pub(crate) state: Mutex<SessionState>,
}

impl<T: HttpTransport> Shared<T> {
    fn spawn_poller(this: &Arc<Self>, state: &mut SessionState, runtime: &Handle) {
        let generation = state.next_generation;
        state.next_generation += 1;
        let cancel = CancellationToken::new();
        state.poller = Some(Poller {
            generation,
            cancel: cancel.clone(),
        });
        runtime.spawn(poll_loop(Arc::clone(this), generation, cancel));
    }

    /// Hand a completion's messages or failure to the handler.
    ///
    /// Stops early once `cancel` fires, so a handler that disconnects sees
    /// nothing further.
    pub(crate) fn deliver(&self, completion: Completion, cancel: &CancellationToken) {
        match completion {
            Completion::Delivered(messages) => {
                for message in messages {
                    if cancel.is_cancelled() {
                        tracing::debug!(channel = %self.channel, "disconnected during delivery");
                        return;
                    }
                    self.handler.on_message(message);
                }
            }
            Completion::Failed(failure) => self.handler.on_failure(&failure),
        }
    }
}

pub(crate) struct Poller {
    generation: u64,
    cancel: CancellationToken,
}

pub(crate) struct SessionState {
    armed: bool,
    validators: ConditionalCacheState,
    dedup: Deduplicator,
    poller: Option<Poller>,
    next_generation: u64,
    requests_issued: u64,
    resume_pending: bool,
}

/// Outcome of one request, ready for delivery.
pub(crate) enum Completion {
    Delivered(Vec<MessageFrame>),
    Failed(PollFailure),
}

impl SessionState {
    /// Whether the poller identified by `generation` may keep going.
    pub(crate) fn is_current(&self, generation: u64, cancel: &CancellationToken) -> bool {
        self.armed
            && !cancel.is_cancelled()
            && self
                .poller
                .as_ref()
                .is_some_and(|poller| poller.generation == generation)
    }

    /// Build the next request from the current validators.
    pub(crate) fn next_request(&mut self, url: &str, config: &SessionConfig) -> PollRequest {
        self.requests_issued += 1;
        self.resume_pending = false;
        let mut request = PollRequest::new(url, config.poll_timeout);
        request.headers = self.validators.request_headers();
        request
    }

    /// The gate vetoed; leave the session armed but idle.
    ///
    /// Returns false without parking when a resume arrived after the veto,
    /// in which case the caller should ask the gate again.
    pub(crate) fn park(&mut self, generation: u64) -> bool {
        if std::mem::take(&mut self.resume_pending) {
            return false;
        }
        if self
            .poller
            .as_ref()
            .is_some_and(|poller| poller.generation == generation)
        {
            self.poller = None;
        }
        true
    }

    /// Fold a request outcome into the state.
    pub(crate) fn absorb(
        &mut self,
        outcome: std::result::Result<HttpResponse, TransportError>,
        config: &SessionConfig,
    ) -> Completion {
        let response = match outcome {
            Ok(response) => response,
            Err(err) => return Completion::Failed(PollFailure::Transport(err)),
        };

        self.validators.update_from_headers(&response.headers);
        if !response.is_success() {
            return Completion::Failed(PollFailure::Status(response.status));
        }

        let body = response.text();
        let mut messages = Vec::new();
        for raw in frames(&body) {
            if !self.dedup.should_deliver(raw) {
                continue;
            }
            match decode_frame(raw) {
                Ok(frame) if frame.is_structured() || config.deliver_raw_frames => {
                    messages.push(frame)
                }
                Ok(_) => {}
                Err(err) => tracing::debug!(error = %err, "dropping undecodable frame"),
            }
        }
        messages.push(MessageFrame::Raw(body.into_owned()));
        Completion::Delivered(messages)
    }
}
