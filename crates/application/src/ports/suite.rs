//! Suite registration port
//!
//! The test-runner integration: named suites, named cases and lifecycle hooks. The
//! registry is passed explicitly to every declaration; there is no process-wide instance.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future produced by a case body or hook.
pub type CaseFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A test case body. Runs at most once.
pub type CaseFn = Box<dyn FnOnce() -> CaseFuture + Send>;

/// A lifecycle hook. May run once per case.
pub type HookFn = Arc<dyn Fn() -> CaseFuture + Send + Sync>;

/// Body of a suite; declares the suite's cases and hooks against the given registry.
pub type SuiteBody<'a> = Box<dyn FnOnce(&mut dyn SuiteRegistry) + 'a>;

/// Port for registering suites, cases and hooks with a test runner.
pub trait SuiteRegistry {
    /// Registers a named suite. `body` runs immediately to declare its contents.
    fn describe(&mut self, name: &str, body: SuiteBody<'_>);

    /// Registers a named case in the current suite.
    fn it(&mut self, name: &str, case: CaseFn);

    /// Registers a hook run once before the first case of the current suite.
    fn before_all(&mut self, hook: HookFn);

    /// Registers a hook run once after the last case of the current suite.
    fn after_all(&mut self, hook: HookFn);

    /// Registers a hook run before every case of the current suite.
    fn before_each(&mut self, hook: HookFn);

    /// Registers a hook run after every case of the current suite.
    fn after_each(&mut self, hook: HookFn);
}

/// Boxes an async closure as a case body.
pub fn case<F, Fut>(body: F) -> CaseFn
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(move || -> CaseFuture { Box::pin(body()) })
}

/// Boxes an async closure as a lifecycle hook.
pub fn hook<F, Fut>(body: F) -> HookFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move || -> CaseFuture { Box::pin(body()) })
}
