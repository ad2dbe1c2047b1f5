//! Background task driving one armed period of a session.

use std::sync::Arc;

use longpoll_transport::HttpTransport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::handler::PollFailure;
use crate::session::{Completion, Shared};

/// Issue requests back to back until disarmed, cancelled, or vetoed.
///
/// Armed state, token and generation are re-checked under the session lock
/// before every request and after every completion, so a request that was
/// cancelled (or superseded by a reconnect) never delivers or re-issues.
pub(crate) async fn poll_loop<T: HttpTransport>(
    shared: Arc<Shared<T>>,
    generation: u64,
    cancel: CancellationToken,
) {
    debug!(url = %shared.url, generation, "starting poll loop");

    loop {
        let request = {
            let mut state = shared.state.lock();
            if !state.is_current(generation, &cancel) {
                break;
            }
            state.next_request(&shared.url, &shared.config)
        };
        debug!(
            url = %request.url,
            etag = request.header("If-None-Match").unwrap_or_default(),
            "issuing poll request"
        );

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            outcome = shared.transport.get(request) => outcome,
        };

        let completion = {
            let mut state = shared.state.lock();
            if !state.is_current(generation, &cancel) {
                debug!("discarding completion of cancelled request");
                break;
            }
            state.absorb(outcome, &shared.config)
        };

        match &completion {
            Completion::Delivered(messages) => debug!(count = messages.len(), "poll delivered"),
            Completion::Failed(failure) => log_failure(failure),
        }
        shared.deliver(completion, &cancel);

        if !gate_allows_next(&shared, generation, &cancel) {
            break;
        }
    }

    debug!(generation, "poll loop exited");
}

/// Query the gate; on a veto, park unless a resume raced in.
///
/// Returns true if the loop should issue another request.
fn gate_allows_next<T: HttpTransport>(
    shared: &Shared<T>,
    generation: u64,
    cancel: &CancellationToken,
) -> bool {
    loop {
        if shared.gate.should_reconnect() {
            return true;
        }
        let mut state = shared.state.lock();
        if !state.is_current(generation, cancel) {
            return false;
        }
        if state.park(generation) {
            info!(channel = %shared.channel, "reconnect gate vetoed next poll; idling");
            return false;
        }
        debug!(channel = %shared.channel, "resume raced a gate veto; asking again");
    }
}

fn log_failure(failure: &PollFailure) {
    match failure {
        PollFailure::Status(304) => debug!("not modified"),
        PollFailure::Status(status) => warn!(status, "poll returned error status"),
        PollFailure::Transport(err) if err.is_timeout() => debug!(error = %err, "poll timed out"),
        PollFailure::Transport(err) => warn!(error = %err, "poll failed"),
    }
}
