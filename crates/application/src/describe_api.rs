//! API and case declaration
//!
//! [`describe_api`] registers one suite per endpoint and hands the caller an [`ApiDoc`]
//! from which every case builds its requests. [`it_doc`] registers a single case.
//! Both validate their input eagerly and fail at declaration time.

use std::fmt;

use docspec_domain::ApiDocOptions;

use crate::api_test::ApiTestBuilder;
use crate::error::DeclarationError;
use crate::ports::{CaseFn, ServiceHandle, SuiteRegistry};

/// Callback declaring the cases of one API.
pub type ApiCallback<'a> = Box<dyn FnOnce(&mut dyn SuiteRegistry, ApiDoc) + 'a>;

/// Handle to a declared API, used inside its suite to create test builders.
#[derive(Clone)]
pub struct ApiDoc {
    method: String,
    url: String,
    options: ApiDocOptions,
    service: ServiceHandle,
}

impl ApiDoc {
    /// Returns the declared method, as written.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the URL template.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the declaration options.
    #[must_use]
    pub const fn options(&self) -> &ApiDocOptions {
        &self.options
    }

    /// Returns the service under test.
    #[must_use]
    pub const fn service(&self) -> &ServiceHandle {
        &self.service
    }

    /// Creates a fresh test builder seeded from the API's default configuration.
    #[must_use]
    pub fn test(&self) -> ApiTestBuilder {
        ApiTestBuilder::new(
            self.options.defaults.clone().unwrap_or_default(),
            &self.method,
            self.url.clone(),
            self.service.clone(),
        )
    }
}

impl fmt::Debug for ApiDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiDoc")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Step-by-step declaration of an API suite.
///
/// Service and callback may be left out; [`register`](Self::register) reports what is
/// missing.
pub struct ApiDeclaration<'a> {
    method: String,
    url: String,
    options: ApiDocOptions,
    service: Option<ServiceHandle>,
    callback: Option<ApiCallback<'a>>,
}

impl<'a> ApiDeclaration<'a> {
    /// Starts declaring `method` on the URL template `url`.
    #[must_use]
    pub fn new(method: impl fmt::Display, url: impl Into<String>, options: ApiDocOptions) -> Self {
        Self {
            method: method.to_string(),
            url: url.into(),
            options,
            service: None,
            callback: None,
        }
    }

    /// Sets the service under test.
    #[must_use]
    pub fn with_service(mut self, service: ServiceHandle) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the callback declaring the API's cases.
    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut dyn SuiteRegistry, ApiDoc) + 'a,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Validates the declaration and registers its suite as
    /// `"<name> | [<METHOD>] <url>"`, running the callback inside it.
    ///
    /// # Errors
    ///
    /// Returns a [`DeclarationError`] for a missing name, a URL not starting with `/`,
    /// a missing service or a missing callback, checked in that order. Nothing is
    /// registered on error.
    pub fn register(self, registry: &mut dyn SuiteRegistry) -> Result<(), DeclarationError> {
        let name = self
            .options
            .name()
            .ok_or(DeclarationError::MissingName)?
            .to_string();
        if !self.url.starts_with('/') {
            return Err(DeclarationError::InvalidUrl(self.url));
        }
        let service = self.service.ok_or(DeclarationError::MissingService)?;
        let callback = self.callback.ok_or(DeclarationError::MissingCallback)?;

        let suite = format!("{name} | [{}] {}", self.method, self.url);
        let api = ApiDoc {
            method: self.method,
            url: self.url,
            options: self.options,
            service,
        };
        registry.describe(
            &suite,
            Box::new(move |registry: &mut dyn SuiteRegistry| callback(registry, api)),
        );
        Ok(())
    }
}

impl fmt::Debug for ApiDeclaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiDeclaration")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("options", &self.options)
            .field("has_service", &self.service.is_some())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Declares an API suite for `method` on `url`.
///
/// # Errors
///
/// See [`ApiDeclaration::register`].
pub fn describe_api<'a, F>(
    registry: &mut dyn SuiteRegistry,
    method: impl fmt::Display,
    url: impl Into<String>,
    options: ApiDocOptions,
    service: ServiceHandle,
    callback: F,
) -> Result<(), DeclarationError>
where
    F: FnOnce(&mut dyn SuiteRegistry, ApiDoc) + 'a,
{
    ApiDeclaration::new(method, url, options)
        .with_service(service)
        .with_callback(callback)
        .register(registry)
}

/// Declares a single test case. A failing body fails the case in the runner.
///
/// # Errors
///
/// Returns [`DeclarationError::MissingDescription`] for a blank description.
pub fn it_doc(
    registry: &mut dyn SuiteRegistry,
    description: &str,
    body: CaseFn,
) -> Result<(), DeclarationError> {
    if description.trim().is_empty() {
        return Err(DeclarationError::MissingDescription);
    }
    registry.it(description, body);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use docspec_domain::{RequestConfig, header};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::ports::{
        HookFn, SuiteBody, Transport, TransportError, TransportRequest, TransportResponse, case,
    };

    struct NoContent;

    #[async_trait]
    impl Transport for NoContent {
        async fn send(
            &self,
            _request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(204, json!({})))
        }
    }

    /// Registry that records the names it was given and runs suite bodies inline.
    #[derive(Default)]
    struct Recorder {
        suites: Vec<String>,
        cases: Vec<(String, CaseFn)>,
    }

    impl SuiteRegistry for Recorder {
        fn describe(&mut self, name: &str, body: SuiteBody<'_>) {
            self.suites.push(name.to_string());
            body(self);
        }

        fn it(&mut self, name: &str, case: CaseFn) {
            self.cases.push((name.to_string(), case));
        }

        fn before_all(&mut self, _hook: HookFn) {}
        fn after_all(&mut self, _hook: HookFn) {}
        fn before_each(&mut self, _hook: HookFn) {}
        fn after_each(&mut self, _hook: HookFn) {}
    }

    fn service() -> ServiceHandle {
        Arc::new(NoContent)
    }

    #[test]
    fn test_suite_name_format() {
        let mut recorder = Recorder::default();
        describe_api(
            &mut recorder,
            "GET",
            "/users/{id}",
            ApiDocOptions::named("User detail"),
            service(),
            |_, _| {},
        )
        .unwrap();
        assert_eq!(recorder.suites, vec!["User detail | [GET] /users/{id}"]);
    }

    #[test]
    fn test_declaration_errors_in_order() {
        let mut recorder = Recorder::default();

        let err = describe_api(
            &mut recorder,
            "GET",
            "users",
            ApiDocOptions::default(),
            service(),
            |_, _| {},
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "API name is required");

        let err = describe_api(
            &mut recorder,
            "GET",
            "users",
            ApiDocOptions::named("Users"),
            service(),
            |_, _| {},
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "API URL must start with /");

        let err = ApiDeclaration::new("GET", "/users", ApiDocOptions::named("Users"))
            .with_callback(|_, _| {})
            .register(&mut recorder)
            .unwrap_err();
        assert_eq!(err, DeclarationError::MissingService);

        let err = ApiDeclaration::new("GET", "/users", ApiDocOptions::named("Users"))
            .with_service(service())
            .register(&mut recorder)
            .unwrap_err();
        assert_eq!(err.to_string(), "API test callback is required");

        assert!(recorder.suites.is_empty());
    }

    #[test]
    fn test_it_doc_requires_description() {
        let mut recorder = Recorder::default();
        let err = it_doc(&mut recorder, " ", case(|| async { anyhow::Ok(()) })).unwrap_err();
        assert_eq!(err.to_string(), "Test description is required");
        assert!(recorder.cases.is_empty());
    }

    #[test]
    fn test_api_doc_seeds_builders_from_defaults() {
        let defaults = RequestConfig {
            request_headers: [("Accept".to_string(), header("accept", "application/json"))]
                .into_iter()
                .collect(),
            ..RequestConfig::default()
        };
        let mut recorder = Recorder::default();
        let mut captured = None;
        describe_api(
            &mut recorder,
            "DELETE",
            "/users/{id}",
            ApiDocOptions::named("Delete user").with_defaults(defaults),
            service(),
            |_, api| captured = Some(api),
        )
        .unwrap();

        let api = captured.unwrap();
        assert_eq!(api.method(), "DELETE");
        let builder = api.test();
        assert_eq!(builder.url(), "/users/{id}");
        assert_eq!(builder.config().request_headers.len(), 1);
        assert!(builder.config().expected_status.is_none());
    }

    #[tokio::test]
    async fn test_registered_case_runs_the_builder() {
        let mut recorder = Recorder::default();
        describe_api(
            &mut recorder,
            "DELETE",
            "/users/{id}",
            ApiDocOptions::named("Delete user"),
            service(),
            |registry, api| {
                it_doc(
                    registry,
                    "deletes the user",
                    case(move || async move {
                        api.test().expect_status(204).await?;
                        anyhow::Ok(())
                    }),
                )
                .unwrap();
            },
        )
        .unwrap();

        let (name, body) = recorder.cases.pop().unwrap();
        assert_eq!(name, "deletes the user");
        assert!(body().await.is_ok());
    }
}
