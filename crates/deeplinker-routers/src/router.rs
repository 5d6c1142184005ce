//! Ordered route table with first-match dispatch.
//!
//! Routes are tried strictly in registration order. There is no specificity
//! scoring: a broad template registered before a narrow one shadows it.
//!
//! ```text
//! "/items/:id"   registered first
//! "/items/new"   registered second, never reached for "/items/new"
//! ```
//!
//! `bind` takes `&mut self` and `match_url` takes `&self`; the router does no
//! locking of its own. Share it behind a lock if it is used from more than
//! one thread.

use crate::error::{PatternError, PatternResult};
use crate::request::{Request, RequestContext};
use crate::route::Route;
use crate::uri::decompose;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback invoked synchronously with the request when its route matches.
pub type RouteHandler = Arc<dyn Fn(&Request) + Send + Sync>;

/// An ordered collection of compiled routes and their optional handlers.
pub struct Router {
	/// Registered routes, in registration order.
	routes: Vec<Arc<Route>>,
	/// Handlers keyed by route identity.
	handlers: HashMap<Arc<Route>, RouteHandler>,
	/// Treat duplicate parameters as fatal instead of skipping the route.
	strict_templates: bool,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field(
				"routes",
				&self.routes.iter().map(|r| r.template()).collect::<Vec<_>>(),
			)
			.field("handlers_count", &self.handlers.len())
			.field("strict_templates", &self.strict_templates)
			.finish()
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

impl Router {
	/// Creates an empty router.
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			handlers: HashMap::new(),
			strict_templates: false,
		}
	}

	/// Sets whether a duplicate parameter aborts registration.
	///
	/// Off by default: duplicate parameters are logged and the route skipped.
	pub fn with_strict_templates(mut self, strict: bool) -> Self {
		self.strict_templates = strict;
		self
	}

	/// Returns whether duplicate parameters abort registration.
	pub fn strict_templates(&self) -> bool {
		self.strict_templates
	}

	/// Registers a template with a handler.
	///
	/// A template with a repeated parameter name is logged and skipped.
	///
	/// # Panics
	///
	/// Panics on any other compilation failure, and on duplicate parameters
	/// when strict templates are enabled.
	pub fn bind<F>(&mut self, template: &str, handler: F) -> &mut Self
	where
		F: Fn(&Request) + Send + Sync + 'static,
	{
		self.bind_inner(template, Some(Arc::new(handler)))
	}

	/// Registers a template without a handler.
	///
	/// Matching still reports the route; nothing is invoked.
	///
	/// # Panics
	///
	/// See [`Router::bind`].
	pub fn bind_route(&mut self, template: &str) -> &mut Self {
		self.bind_inner(template, None)
	}

	fn bind_inner(&mut self, template: &str, handler: Option<RouteHandler>) -> &mut Self {
		match self.try_bind(template, handler) {
			Ok(_) => {}
			Err(PatternError::DuplicateParam { route, name }) if !self.strict_templates => {
				tracing::error!(
					template = %route,
					param = %name,
					"duplicate route parameter, route not registered"
				);
			}
			Err(e) => panic!("Invalid route template '{}': {}", template, e),
		}
		self
	}

	/// Registers a template, surfacing every compilation failure.
	///
	/// # Errors
	///
	/// Returns the [`PatternError`] from compilation; the router is unchanged.
	pub fn try_bind(
		&mut self,
		template: &str,
		handler: Option<RouteHandler>,
	) -> PatternResult<Arc<Route>> {
		let route = Arc::new(Route::new(template)?);
		if let Some(handler) = handler {
			self.handlers.insert(Arc::clone(&route), handler);
		}
		self.routes.push(Arc::clone(&route));
		tracing::debug!(template = %template, "route registered");
		Ok(route)
	}

	/// Matches a URL, invoking the bound handler of the first matching route.
	pub fn match_url(&self, url: &str) -> Option<Arc<Route>> {
		self.match_with_context(url, None)
	}

	/// Matches a URL with an opaque context passed through to the handler.
	pub fn match_with_context(&self, url: &str, context: Option<RequestContext>) -> Option<Arc<Route>> {
		let request = self.resolve(url, context)?;
		if let Some(handler) = self.handlers.get(request.route()) {
			handler(&request);
		}
		Some(Arc::clone(request.route()))
	}

	/// Finds the first matching route and builds its request without invoking
	/// any handler.
	pub fn resolve(&self, url: &str, context: Option<RequestContext>) -> Option<Request> {
		let parts = match decompose(url) {
			Ok(parts) => parts,
			Err(e) => {
				tracing::debug!(url = %url, error = %e, "url not routable");
				return None;
			}
		};

		for route in &self.routes {
			let pattern = route.pattern();
			if !pattern.accepts_scheme(parts.scheme.as_deref()) {
				continue;
			}
			if let Some(path_params) = pattern.captures(&parts.host_path) {
				tracing::debug!(template = %route.template(), url = %url, "route matched");
				return Some(Request::new(
					Arc::clone(route),
					url,
					path_params,
					parts.query,
					context,
				));
			}
		}

		tracing::trace!(url = %url, "no route matched");
		None
	}

	/// Returns the registered routes in registration order.
	pub fn routes(&self) -> &[Arc<Route>] {
		&self.routes
	}

	/// Returns the number of registered routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether no routes are registered.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Returns the number of routes with a bound handler.
	pub fn handler_count(&self) -> usize {
		self.handlers.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parking_lot::Mutex;
	use rstest::rstest;

	fn recorder() -> (Arc<Mutex<Vec<Request>>>, impl Fn(&Request) + Send + Sync + 'static) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		(seen, move |req: &Request| sink.lock().push(req.clone()))
	}

	#[rstest]
	fn test_match_invokes_handler_with_params() {
		// Arrange
		let (seen, handler) = recorder();
		let mut router = Router::new();
		router.bind("/users/:user/posts/:post", handler);

		// Act
		let matched = router.match_url("/users/42/posts/7?sort=new");

		// Assert
		assert_eq!(matched.unwrap().template(), "/users/:user/posts/:post");
		let seen = seen.lock();
		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].path_param("user"), Some("42"));
		assert_eq!(seen[0].path_param("post"), Some("7"));
		assert_eq!(seen[0].query_param("sort"), Some("new"));
	}

	#[rstest]
	fn test_no_match_returns_none() {
		let mut router = Router::new();
		router.bind_route("/home");
		assert!(router.match_url("/away").is_none());
		assert!(router.match_url("").is_none());
	}

	#[rstest]
	fn test_first_registered_wins() {
		let mut router = Router::new();
		router.bind_route("/items/:id").bind_route("/items/new");

		let matched = router.match_url("/items/new").unwrap();
		assert_eq!(matched.template(), "/items/:id");
	}

	#[rstest]
	fn test_duplicate_param_skipped() {
		let mut router = Router::new();
		router.bind_route("/:id/:id").bind_route("/ok/:id");

		assert_eq!(router.len(), 1);
		assert_eq!(router.routes()[0].template(), "/ok/:id");
	}

	#[rstest]
	#[should_panic(expected = "Invalid route template")]
	fn test_duplicate_param_fatal_when_strict() {
		let mut router = Router::new().with_strict_templates(true);
		router.bind_route("/:id/:id");
	}

	#[rstest]
	#[should_panic(expected = "Invalid route template")]
	fn test_other_compile_failure_is_fatal() {
		let mut router = Router::new();
		router.bind_route(&format!("/{}", "a".repeat(2000)));
	}

	#[rstest]
	fn test_try_bind_reports_duplicate() {
		let mut router = Router::new();
		let err = router.try_bind("/:a/:a", None).unwrap_err();
		assert!(err.is_duplicate_param());
		assert!(router.is_empty());
	}

	#[rstest]
	fn test_route_without_handler_still_matches() {
		let mut router = Router::new();
		router.bind_route("/home");
		assert_eq!(router.handler_count(), 0);
		assert!(router.match_url("/home").is_some());
	}

	#[rstest]
	fn test_context_reaches_handler() {
		let (seen, handler) = recorder();
		let mut router = Router::new();
		router.bind("/home", handler);

		router.match_with_context("/home", Some(Arc::new("push".to_string())));

		let seen = seen.lock();
		assert_eq!(seen[0].context_as::<String>().map(String::as_str), Some("push"));
	}

	#[rstest]
	fn test_resolve_does_not_invoke_handler() {
		let (seen, handler) = recorder();
		let mut router = Router::new();
		router.bind("/home", handler);

		let request = router.resolve("/home", None).unwrap();

		assert_eq!(request.route().template(), "/home");
		assert!(seen.lock().is_empty());
	}

	#[rstest]
	fn test_scheme_template_matches_host_form() {
		let mut router = Router::new();
		router.bind_route("myapp://home").bind_route("myapp://orders/:id");

		assert_eq!(router.match_url("myapp://home").unwrap().template(), "myapp://home");
		let request = router.resolve("myapp://orders/9", None).unwrap();
		assert_eq!(request.path_param("id"), Some("9"));
		assert!(router.match_url("otherapp://home").is_none());
	}
}
