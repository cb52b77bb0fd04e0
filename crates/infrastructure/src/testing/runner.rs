//! Test runner implementation.
//!
//! Collects suites, cases and hooks through the `SuiteRegistry` port, then executes the
//! cases in declaration order and produces a [`RunReport`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use docspec_application::ports::{CaseFn, CaseFuture, HookFn, SuiteBody, SuiteRegistry};
use docspec_domain::RunnerSettings;
use serde::Serialize;
use tracing::{error, info, warn};

const ROOT: usize = 0;

/// A registered suite. Index `0` is the implicit root suite.
#[derive(Default)]
struct Suite {
    name: String,
    parent: Option<usize>,
    before_all: Vec<HookFn>,
    after_all: Vec<HookFn>,
    before_each: Vec<HookFn>,
    after_each: Vec<HookFn>,
}

struct Case {
    suite: usize,
    name: String,
    body: CaseFn,
}

/// Result of a single case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    /// Enclosing suite names, outermost first, joined with `" > "`.
    pub suite: String,
    /// Case name.
    pub name: String,
    /// Whether the case and its hooks succeeded.
    pub passed: bool,
    /// Failure message, if any.
    pub error: Option<String>,
    /// Execution time in milliseconds, hooks included.
    pub duration_ms: u64,
}

/// Results of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Outcomes in execution order.
    pub cases: Vec<CaseOutcome>,
    /// Number of executed cases.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Wall time of the whole run in milliseconds.
    pub duration_ms: u64,
    /// When the run started.
    pub started_at: DateTime<Utc>,
}

impl RunReport {
    fn new(cases: Vec<CaseOutcome>, duration_ms: u64, started_at: DateTime<Utc>) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|c| c.passed).count();
        Self {
            cases,
            total,
            passed,
            failed: total - passed,
            duration_ms,
            started_at,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Returns the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.cases.iter().filter(|c| !c.passed)
    }
}

/// In-process test runner.
///
/// Register suites with [`SuiteRegistry`] calls (usually through `describe_api` and
/// `it_doc`), then call [`run`](Self::run).
pub struct TestRunner {
    suites: Vec<Suite>,
    cases: Vec<Case>,
    current: usize,
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            suites: vec![Suite::default()],
            cases: Vec::new(),
            current: ROOT,
            stop_on_failure: false,
        }
    }

    /// Create a runner configured from settings.
    #[must_use]
    pub fn from_settings(settings: &RunnerSettings) -> Self {
        Self::new().with_stop_on_failure(settings.stop_on_failure)
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Number of registered cases.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Runs every registered case in declaration order.
    ///
    /// `before_all` hooks run once before the first case of their suite, `after_all`
    /// hooks once after its last. Each case is wrapped in the `before_each` and
    /// `after_each` hooks of every enclosing suite, outermost first on the way in.
    pub async fn run(self) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let Self {
            suites,
            cases,
            stop_on_failure,
            ..
        } = self;

        let last_case = last_case_per_suite(&suites, &cases);
        let mut state = vec![SetupState::Pending; suites.len()];
        let mut outcomes = Vec::with_capacity(cases.len());
        let mut stopped = false;

        for (index, case) in cases.into_iter().enumerate() {
            let chain = ancestry(&suites, case.suite);
            let case_start = Instant::now();
            let suite_name = suite_path(&suites, &chain);
            let name = case.name.clone();

            let mut failure = None;
            for &suite in &chain {
                if state[suite] == SetupState::Pending {
                    state[suite] = match run_hooks(&suites[suite].before_all).await {
                        Ok(()) => SetupState::Ready,
                        Err(message) => SetupState::Failed(message),
                    };
                }
                if let SetupState::Failed(message) = &state[suite] {
                    failure = Some(format!("\"before all\" hook failed: {message}"));
                    break;
                }
            }

            if failure.is_none() {
                failure = run_case(&suites, &chain, case).await.err();
            }

            for &suite in chain.iter().rev() {
                if last_case[suite] == Some(index)
                    && let Err(message) = finish_suite(&suites, suite, &mut state).await
                {
                    failure.get_or_insert(message);
                }
            }

            let outcome = CaseOutcome {
                suite: suite_name,
                name,
                passed: failure.is_none(),
                error: failure,
                duration_ms: millis(case_start),
            };
            log_outcome(&outcome);
            let failed = !outcome.passed;
            outcomes.push(outcome);

            if failed && stop_on_failure {
                stopped = true;
                break;
            }
        }

        if stopped {
            warn!("stopping after first failure");
            for suite in (0..suites.len()).rev() {
                if let Err(message) = finish_suite(&suites, suite, &mut state).await {
                    error!(suite = %suites[suite].name, error = %message, "\"after all\" hook failed");
                }
            }
        }

        let report = RunReport::new(outcomes, millis(start), started_at);
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "run finished"
        );
        report
    }
}

impl SuiteRegistry for TestRunner {
    fn describe(&mut self, name: &str, body: SuiteBody<'_>) {
        let parent = self.current;
        self.suites.push(Suite {
            name: name.to_string(),
            parent: Some(parent),
            ..Suite::default()
        });
        self.current = self.suites.len() - 1;
        body(self);
        self.current = parent;
    }

    fn it(&mut self, name: &str, case: CaseFn) {
        self.cases.push(Case {
            suite: self.current,
            name: name.to_string(),
            body: case,
        });
    }

    fn before_all(&mut self, hook: HookFn) {
        self.suites[self.current].before_all.push(hook);
    }

    fn after_all(&mut self, hook: HookFn) {
        self.suites[self.current].after_all.push(hook);
    }

    fn before_each(&mut self, hook: HookFn) {
        self.suites[self.current].before_each.push(hook);
    }

    fn after_each(&mut self, hook: HookFn) {
        self.suites[self.current].after_each.push(hook);
    }
}

impl std::fmt::Debug for TestRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRunner")
            .field("suites", &self.suites.len())
            .field("cases", &self.cases.len())
            .field("stop_on_failure", &self.stop_on_failure)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SetupState {
    Pending,
    Ready,
    Failed(String),
    Finished,
}

/// Suite indices from the root down to `suite`.
fn ancestry(suites: &[Suite], suite: usize) -> Vec<usize> {
    let mut chain = vec![suite];
    let mut current = suite;
    while let Some(parent) = suites[current].parent {
        chain.push(parent);
        current = parent;
    }
    chain.reverse();
    chain
}

/// For each suite, the index of the last case declared in it or any nested suite.
fn last_case_per_suite(suites: &[Suite], cases: &[Case]) -> Vec<Option<usize>> {
    let mut last = vec![None; suites.len()];
    for (index, case) in cases.iter().enumerate() {
        for suite in ancestry(suites, case.suite) {
            last[suite] = Some(index);
        }
    }
    last
}

fn suite_path(suites: &[Suite], chain: &[usize]) -> String {
    chain
        .iter()
        .filter(|&&suite| suite != ROOT)
        .map(|&suite| suites[suite].name.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

async fn run_case(suites: &[Suite], chain: &[usize], case: Case) -> Result<(), String> {
    for &suite in chain {
        run_hooks(&suites[suite].before_each)
            .await
            .map_err(|message| format!("\"before each\" hook failed: {message}"))?;
    }

    let result = guarded((case.body)()).await;

    for &suite in chain.iter().rev() {
        if let Err(message) = run_hooks(&suites[suite].after_each).await {
            return result.and(Err(format!("\"after each\" hook failed: {message}")));
        }
    }
    result
}

async fn finish_suite(
    suites: &[Suite],
    suite: usize,
    state: &mut [SetupState],
) -> Result<(), String> {
    let started = matches!(state[suite], SetupState::Ready | SetupState::Failed(_));
    state[suite] = SetupState::Finished;
    if !started {
        return Ok(());
    }
    run_hooks(&suites[suite].after_all)
        .await
        .map_err(|message| format!("\"after all\" hook failed: {message}"))
}

async fn run_hooks(hooks: &[HookFn]) -> Result<(), String> {
    for hook in hooks {
        guarded(hook()).await?;
    }
    Ok(())
}

/// Runs a case or hook on its own task so a panic fails only that unit.
async fn guarded(future: CaseFuture) -> Result<(), String> {
    match tokio::spawn(future).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => Err(error.to_string()),
        Err(join_error) => Err(match join_error.try_into_panic() {
            Ok(payload) => payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .map_or_else(|| "panicked".to_string(), |message| format!("panicked: {message}")),
            Err(join_error) => join_error.to_string(),
        }),
    }
}

fn log_outcome(outcome: &CaseOutcome) {
    match &outcome.error {
        None => info!(
            suite = %outcome.suite,
            case = %outcome.name,
            duration_ms = outcome.duration_ms,
            "case passed"
        ),
        Some(message) => error!(
            suite = %outcome.suite,
            case = %outcome.name,
            duration_ms = outcome.duration_ms,
            error = %message,
            "case failed"
        ),
    }
}

fn millis(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use docspec_application::ports::{case, hook};
    use pretty_assertions::assert_eq;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording_case(log: &Log, entry: &'static str) -> CaseFn {
        let log = log.clone();
        case(move || async move {
            log.lock().unwrap().push(entry.to_string());
            anyhow::Ok(())
        })
    }

    fn recording_hook(log: &Log, entry: &'static str) -> HookFn {
        let log = log.clone();
        hook(move || {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(entry.to_string());
                anyhow::Ok(())
            }
        })
    }

    fn failing_case(message: &'static str) -> CaseFn {
        case(move || async move { Err::<(), _>(anyhow::anyhow!(message)) })
    }

    #[tokio::test]
    async fn test_hook_and_case_order() {
        let log = Log::default();
        let mut runner = TestRunner::new();

        runner.describe(
            "outer",
            Box::new(|r: &mut dyn SuiteRegistry| {
                r.before_all(recording_hook(&log, "before all outer"));
                r.before_each(recording_hook(&log, "before each outer"));
                r.after_each(recording_hook(&log, "after each outer"));
                r.after_all(recording_hook(&log, "after all outer"));
                r.it("first", recording_case(&log, "first"));
                r.describe(
                    "inner",
                    Box::new(|r: &mut dyn SuiteRegistry| {
                        r.before_each(recording_hook(&log, "before each inner"));
                        r.it("second", recording_case(&log, "second"));
                    }),
                );
            }),
        );

        let report = runner.run().await;
        assert!(report.all_passed());
        assert_eq!(report.total, 2);
        assert_eq!(report.cases[1].suite, "outer > inner");
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "before all outer",
                "before each outer",
                "first",
                "after each outer",
                "before each outer",
                "before each inner",
                "second",
                "after each outer",
                "after all outer",
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_are_reported() {
        let mut runner = TestRunner::new();
        runner.describe(
            "suite",
            Box::new(|r: &mut dyn SuiteRegistry| {
                r.it("fails", failing_case("expected status 200 OK but got 404 Not Found"));
                r.it("passes", case(|| async { anyhow::Ok(()) }));
            }),
        );

        let report = runner.run().await;
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.name, "fails");
        assert_eq!(
            failure.error.as_deref(),
            Some("expected status 200 OK but got 404 Not Found")
        );
    }

    #[tokio::test]
    async fn test_stop_on_failure() {
        let log = Log::default();
        let mut runner = TestRunner::new().with_stop_on_failure(true);
        runner.describe(
            "suite",
            Box::new(|r: &mut dyn SuiteRegistry| {
                r.after_all(recording_hook(&log, "after all"));
                r.it("fails", failing_case("boom"));
                r.it("never runs", recording_case(&log, "never runs"));
            }),
        );

        let report = runner.run().await;
        assert_eq!(report.cases.len(), 1); // Stopped after first failure
        assert_eq!(*log.lock().unwrap(), vec!["after all"]);
    }

    #[tokio::test]
    async fn test_before_all_failure_fails_every_case() {
        let mut runner = TestRunner::new();
        runner.describe(
            "suite",
            Box::new(|r: &mut dyn SuiteRegistry| {
                r.before_all(hook(|| async { Err::<(), _>(anyhow::anyhow!("database down")) }));
                r.it("a", case(|| async { anyhow::Ok(()) }));
                r.it("b", case(|| async { anyhow::Ok(()) }));
            }),
        );

        let report = runner.run().await;
        assert_eq!(report.failed, 2);
        assert!(report.cases.iter().all(|c| {
            c.error.as_deref() == Some("\"before all\" hook failed: database down")
        }));
    }

    #[tokio::test]
    async fn test_panicking_case_fails_only_itself() {
        let mut runner = TestRunner::new();
        runner.it(
            "panics",
            case(|| async {
                let values: Vec<u8> = Vec::new();
                assert!(!values.is_empty(), "no values");
                anyhow::Ok(())
            }),
        );
        runner.it("passes", case(|| async { anyhow::Ok(()) }));

        let report = runner.run().await;
        assert_eq!(report.cases[0].error.as_deref(), Some("panicked: no values"));
        assert!(report.cases[1].passed);
        assert_eq!(report.cases[1].suite, "");
    }

    #[test]
    fn test_from_settings() {
        let settings = RunnerSettings {
            stop_on_failure: true,
            ..RunnerSettings::default()
        };
        let runner = TestRunner::from_settings(&settings);
        assert!(runner.stop_on_failure);
        assert_eq!(runner.case_count(), 0);
    }
}
