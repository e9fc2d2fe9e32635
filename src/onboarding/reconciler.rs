use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::debug_log::{DebugEntry, DebugLog};
use super::probe::{ProbeOutcome, ProfileProbe};
use super::state::{OnboardingEvent, OnboardingState, RedirectReason};
use crate::SwiftError;
use crate::config::OnboardingConfig;
use crate::events::{AppEvent, dispatch};

/// How an onboarding run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Continue to the application.
    Dashboard(RedirectReason),
    /// Nobody is signed in; continue to the login page.
    Login,
    /// Cancelled before a decision was reached.
    Cancelled,
}

impl Completion {
    fn outcome(&self) -> &'static str {
        match self {
            Self::Dashboard(RedirectReason::ManualOverride) => "manual_override",
            Self::Dashboard(_) => "dashboard",
            Self::Login => "login",
            Self::Cancelled => "cancelled",
        }
    }
}

enum Command {
    ManualOverride(oneshot::Sender<bool>),
    Cancel,
}

struct Shared {
    attempts: AtomicU32,
    state: Mutex<OnboardingState>,
    debug_log: DebugLog,
    override_threshold: u32,
}

impl Shared {
    fn state(&self) -> OnboardingState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, event: OnboardingEvent) -> OnboardingState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = state.next(event) {
            *state = next;
        }
        *state
    }

    fn override_available(&self) -> bool {
        self.attempts.load(Ordering::SeqCst) >= self.override_threshold
    }
}

/// Waits for a freshly registered identity's profile to become visible.
///
/// Checks run immediately and then every `poll_interval`, with at most one
/// check in flight. Once enough checks have come back empty the user may
/// continue anyway through [`ReconcilerHandle::request_manual_override`].
pub struct Reconciler;

impl Reconciler {
    pub fn spawn<P>(probe: P, config: OnboardingConfig) -> ReconcilerHandle
    where
        P: ProfileProbe + 'static,
    {
        let shared = Arc::new(Shared {
            attempts: AtomicU32::new(0),
            state: Mutex::new(OnboardingState::Checking),
            debug_log: DebugLog::new(config.debug_log_capacity),
            override_threshold: config.override_threshold,
        });
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = watch::channel(None);

        let task = tokio::spawn(run(
            probe,
            config,
            Arc::clone(&shared),
            commands_rx,
            completion_tx,
        ));

        ReconcilerHandle {
            shared,
            commands: commands_tx,
            completion: completion_rx,
            task,
        }
    }
}

type CheckFuture<'a> = Pin<Box<dyn Future<Output = Result<ProbeOutcome, SwiftError>> + Send + 'a>>;

async fn in_flight(check: &mut Option<CheckFuture<'_>>) -> Result<ProbeOutcome, SwiftError> {
    match check {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

async fn run<P: ProfileProbe>(
    probe: P,
    config: OnboardingConfig,
    shared: Arc<Shared>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    completion: watch::Sender<Option<Completion>>,
) {
    let debug = &shared.debug_log;
    debug.push("onboarding started");

    let mut ticker = time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut check: Option<CheckFuture<'_>> = None;

    let result = loop {
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Command::ManualOverride(reply)) => {
                    let allowed = shared.override_available()
                        && shared.state() == OnboardingState::Checking;
                    let _ = reply.send(allowed);
                    if allowed {
                        debug.push("manual override accepted");
                        shared.apply(OnboardingEvent::ManualOverride);
                        break Completion::Dashboard(RedirectReason::ManualOverride);
                    }
                    debug.push("manual override refused: not enough attempts");
                }
                Some(Command::Cancel) | None => {
                    debug.push("onboarding cancelled");
                    break Completion::Cancelled;
                }
            },

            outcome = in_flight(&mut check) => {
                check = None;
                let attempt = shared.attempts.fetch_add(1, Ordering::SeqCst) + 1;

                match outcome {
                    Ok(ProbeOutcome::Found(profile)) => {
                        debug.push(format!(
                            "attempt {attempt}: profile found, account_type={}",
                            profile.account_type.as_str()
                        ));
                        shared.apply(OnboardingEvent::ProfileFound);
                        break Completion::Dashboard(RedirectReason::ProfileFound);
                    }
                    Ok(ProbeOutcome::Pending) => {
                        debug.push(format!("attempt {attempt}: profile not visible yet"));
                    }
                    Ok(ProbeOutcome::NoIdentity) => {
                        debug.push(format!("attempt {attempt}: no authenticated identity"));
                        shared.apply(OnboardingEvent::NoIdentity);
                        break Completion::Login;
                    }
                    Err(err) => {
                        debug.push(format!("attempt {attempt}: check failed: {err}"));
                        shared.apply(OnboardingEvent::ErrorObserved);
                    }
                }
            }

            _ = ticker.tick(), if check.is_none() => {
                check = Some(probe.check());
            }
        }
    };

    // the pending check, if any, is dropped here; no probe call follows
    drop(check);

    if result == Completion::Cancelled {
        *shared.state.lock().unwrap_or_else(PoisonError::into_inner) = OnboardingState::Done;
    } else {
        shared.apply(OnboardingEvent::Navigated);
    }

    let attempts = shared.attempts.load(Ordering::SeqCst);
    log::info!(
        target: "swifttasks::onboarding",
        "msg=\"onboarding finished\", outcome=\"{}\", attempts={attempts}",
        result.outcome()
    );

    dispatch(AppEvent::OnboardingCompleted {
        outcome: result.outcome(),
        attempts,
        at: Utc::now(),
    })
    .await;

    let _ = completion.send(Some(result));
}

/// Control surface for a running [`Reconciler`]. Dropping it stops the task.
pub struct ReconcilerHandle {
    shared: Arc<Shared>,
    commands: mpsc::UnboundedSender<Command>,
    completion: watch::Receiver<Option<Completion>>,
    task: JoinHandle<()>,
}

impl ReconcilerHandle {
    /// Checks completed so far.
    pub fn attempts(&self) -> u32 {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> OnboardingState {
        self.shared.state()
    }

    pub fn override_available(&self) -> bool {
        self.shared.override_available()
    }

    /// Asks to continue without a profile. Returns whether the request was
    /// accepted; it is refused until enough attempts have failed.
    pub async fn request_manual_override(&self) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.commands.send(Command::ManualOverride(reply_tx)).is_err() {
            return false;
        }
        reply_rx.await.unwrap_or(false)
    }

    pub fn debug_log(&self) -> Vec<DebugEntry> {
        self.shared.debug_log.snapshot()
    }

    pub fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }

    /// Resolves once the run has ended.
    pub async fn completion(&self) -> Completion {
        let mut completion = self.completion.clone();
        match completion.wait_for(Option::is_some).await {
            Ok(value) => (*value).unwrap_or(Completion::Cancelled),
            Err(_) => Completion::Cancelled,
        }
    }
}

impl Drop for ReconcilerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
