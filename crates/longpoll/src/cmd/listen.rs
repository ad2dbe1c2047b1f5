use longpoll_session::{
    is_valid_channel, MessageFrame, MessageHandler, PollFailure, SessionBuilder, SessionConfig,
};
use longpoll_transport::ReqwestTransport;
use tokio::sync::mpsc;

use crate::cmd::ListenArgs;
use crate::exit::{poll_error, session_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_message, OutputFormat};

/// What the session reported, in delivery order.
enum Event {
    Message(MessageFrame),
    NotModified,
    Failed(CliError),
}

/// Hands session callbacks to the printing loop.
struct Forwarder {
    tx: mpsc::UnboundedSender<Event>,
}

impl MessageHandler for Forwarder {
    fn on_message(&self, message: MessageFrame) {
        let _ = self.tx.send(Event::Message(message));
    }

    fn on_failure(&self, failure: &PollFailure) {
        if failure.is_not_modified() {
            tracing::trace!("poll completed without news");
            let _ = self.tx.send(Event::NotModified);
            return;
        }
        tracing::info!(%failure, "poll failed; retrying");
        let _ = self.tx.send(Event::Failed(poll_error("poll failed", failure)));
    }
}

/// Counts consecutive failed polls against `--max-failures`.
#[derive(Debug)]
struct FailureBudget {
    limit: Option<usize>,
    consecutive: usize,
}

impl FailureBudget {
    fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            consecutive: 0,
        }
    }

    fn reset(&mut self) {
        self.consecutive = 0;
    }

    /// Record a failure; returns true once the budget is spent.
    fn exhausted_by_failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.limit.is_some_and(|limit| self.consecutive >= limit)
    }
}

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    if !is_valid_channel(&args.channel) {
        return Err(CliError::new(
            USAGE,
            format!("invalid channel id: {:?}", args.channel),
        ));
    }
    if args.max_failures == Some(0) {
        return Err(CliError::new(USAGE, "--max-failures must be at least 1"));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("runtime setup failed: {err}")))?;

    runtime.block_on(listen(args, format))
}

async fn listen(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let config = SessionConfig {
        poll_timeout: args.poll_timeout,
        max_fingerprints: args.max_fingerprints,
        deliver_raw_frames: args.raw_frames,
        ..SessionConfig::default()
    };

    let session = SessionBuilder::new(&args.base_url, &args.channel)
        .with_config(config)
        .build(ReqwestTransport::new(), Forwarder { tx });
    session
        .connect()
        .map_err(|err| session_error("connect failed", err))?;
    tracing::info!(url = session.url(), "listening");

    let mut budget = FailureBudget::new(args.max_failures);
    let mut printed = 0usize;
    let outcome = loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(Event::Message(message)) => {
                    budget.reset();
                    printed = printed.saturating_add(1);
                    print_message(&message, session.channel(), printed, format);

                    if args.count.is_some_and(|count| printed >= count) {
                        break Ok(SUCCESS);
                    }
                }
                Some(Event::NotModified) => budget.reset(),
                Some(Event::Failed(err)) => {
                    if budget.exhausted_by_failure() {
                        break Err(err);
                    }
                }
                None => break Ok(SUCCESS),
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break Ok(SUCCESS);
            }
        }
    };

    session.disconnect();
    tracing::debug!(
        requests = session.requests_issued(),
        printed,
        "listen finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_counts_only_consecutive_failures() {
        let mut budget = FailureBudget::new(Some(2));
        assert!(!budget.exhausted_by_failure());
        budget.reset();
        assert!(!budget.exhausted_by_failure());
        assert!(budget.exhausted_by_failure());
    }

    #[test]
    fn unlimited_budget_never_runs_out() {
        let mut budget = FailureBudget::new(None);
        for _ in 0..1000 {
            assert!(!budget.exhausted_by_failure());
        }
    }
}
