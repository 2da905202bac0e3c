//! Retry-while-false polling loop

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::PollConfig;
use crate::error::{PollError, PollResult};

const DEFAULT_FAIL_REASON: &str = "the expectation was not met";

/// Result of a single predicate attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The awaited condition holds; stop polling.
    Stop,
    /// Not there yet; sleep, run the retry action, try again.
    Continue,
    /// Retrying cannot help; fail immediately with this message.
    Abort(String),
}

impl From<bool> for Outcome {
    fn from(met: bool) -> Self {
        if met {
            Outcome::Stop
        } else {
            Outcome::Continue
        }
    }
}

type Predicate<'a> = Box<dyn FnMut() -> PollResult<Outcome> + 'a>;
type RetryAction<'a> = Box<dyn FnMut() -> PollResult<()> + 'a>;

/// Caller-facing knobs shared by every polling helper
#[derive(Debug, Clone, Default)]
pub struct PollOptions {
    /// Total wait budget; falls back to the poller's configured default
    pub timeout: Option<Duration>,
    /// Sleep between attempts; falls back to the poller's configured interval
    pub interval: Option<Duration>,
    /// Replaces the helper's generated failure message
    pub fail_reason: Option<String>,
}

impl PollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn fail_reason(mut self, reason: impl Into<String>) -> Self {
        self.fail_reason = Some(reason.into());
        self
    }
}

/// One polling operation: what to check, what to do between checks, and for how long
pub struct PollSpec<'a> {
    predicate: Predicate<'a>,
    on_retry: Option<RetryAction<'a>>,
    timeout: Option<Duration>,
    interval: Option<Duration>,
    fail_reason: Option<String>,
}

impl<'a> PollSpec<'a> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: FnMut() -> PollResult<Outcome> + 'a,
    {
        Self {
            predicate: Box::new(predicate),
            on_retry: None,
            timeout: None,
            interval: None,
            fail_reason: None,
        }
    }

    /// Poll a plain boolean check
    pub fn from_bool<F>(mut check: F) -> Self
    where
        F: FnMut() -> bool + 'a,
    {
        Self::new(move || Ok(check().into()))
    }

    pub fn on_retry<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> PollResult<()> + 'a,
    {
        self.on_retry = Some(Box::new(action));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn fail_reason(mut self, reason: impl Into<String>) -> Self {
        self.fail_reason = Some(reason.into());
        self
    }

    /// Apply caller options, keeping `default_reason` when none was given
    pub fn with_options(mut self, options: &PollOptions, default_reason: impl Into<String>) -> Self {
        self.timeout = options.timeout.or(self.timeout);
        self.interval = options.interval.or(self.interval);
        self.fail_reason = Some(
            options
                .fail_reason
                .clone()
                .unwrap_or_else(|| default_reason.into()),
        );
        self
    }
}

/// Summary of a successful poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    /// Predicate invocations, including the successful one
    pub attempts: usize,
    pub elapsed: Duration,
}

/// Re-evaluates a predicate on a fixed cadence until it holds or the budget runs out.
///
/// The first attempt always runs. After each failed attempt the elapsed time is
/// compared against the timeout; only when it has been exceeded does the poll give
/// up, so the total run time may overshoot the timeout by one interval plus the
/// predicate's own latency.
#[derive(Debug, Clone)]
pub struct Poller<C = SystemClock> {
    default_timeout: Duration,
    default_interval: Duration,
    clock: C,
}

impl Poller<SystemClock> {
    pub fn new(config: &PollConfig) -> PollResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Poller<C> {
    pub fn with_clock(config: &PollConfig, clock: C) -> PollResult<Self> {
        Ok(Self {
            default_timeout: config.default_wait()?,
            default_interval: config.interval()?,
            clock,
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn default_interval(&self) -> Duration {
        self.default_interval
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run a poll to completion
    pub fn run(&self, spec: PollSpec<'_>) -> PollResult<PollSummary> {
        let PollSpec {
            mut predicate,
            mut on_retry,
            timeout,
            interval,
            fail_reason,
        } = spec;

        let timeout = timeout.unwrap_or(self.default_timeout);
        let interval = interval.unwrap_or(self.default_interval);
        if interval.is_zero() {
            return Err(PollError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        let start = self.clock.now();
        let mut attempts = 0;

        loop {
            attempts += 1;

            match predicate()? {
                Outcome::Stop => {
                    let elapsed = self.clock.now().saturating_duration_since(start);
                    if attempts > 1 {
                        info!(attempts, elapsed_ms = elapsed.as_millis() as u64, "Condition met");
                    }
                    return Ok(PollSummary { attempts, elapsed });
                }
                Outcome::Abort(reason) => {
                    warn!(attempts, "{}", reason);
                    return Err(PollError::Unrecoverable(reason));
                }
                Outcome::Continue => {}
            }

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed > timeout {
                break;
            }

            debug!(
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "Condition not met, retrying in {:?}",
                interval
            );
            self.clock.sleep(interval);

            if let Some(retry) = on_retry.as_mut() {
                retry()?;
            }
        }

        let elapsed = self.clock.now().saturating_duration_since(start);
        let reason = fail_reason.unwrap_or_else(|| DEFAULT_FAIL_REASON.to_string());
        warn!(attempts, elapsed_ms = elapsed.as_millis() as u64, "Gave up: {}", reason);

        Err(PollError::Timeout {
            timeout,
            elapsed,
            attempts,
            reason,
        })
    }
}
