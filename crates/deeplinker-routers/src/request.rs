//! Per-match request payload.

use crate::route::Route;
use indexmap::IndexMap;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque value threaded from the caller of a match through to handlers.
pub type RequestContext = Arc<dyn Any + Send + Sync>;

/// The result of a successful match.
///
/// Path parameters keep the order in which the template declares them.
#[derive(Clone)]
pub struct Request {
	route: Arc<Route>,
	url: String,
	path_params: IndexMap<String, String>,
	query_params: HashMap<String, String>,
	context: Option<RequestContext>,
}

impl Request {
	/// Creates a request for a matched route.
	pub fn new(
		route: Arc<Route>,
		url: impl Into<String>,
		path_params: IndexMap<String, String>,
		query_params: HashMap<String, String>,
		context: Option<RequestContext>,
	) -> Self {
		Self {
			route,
			url: url.into(),
			path_params,
			query_params,
			context,
		}
	}

	/// Returns the matched route.
	pub fn route(&self) -> &Arc<Route> {
		&self.route
	}

	/// Returns the raw URL that was matched.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Returns path parameters in template order.
	pub fn path_params(&self) -> &IndexMap<String, String> {
		&self.path_params
	}

	/// Returns the query parameters.
	pub fn query_params(&self) -> &HashMap<String, String> {
		&self.query_params
	}

	/// Returns a single path parameter.
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Returns a single query parameter.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Returns the opaque context, if one was supplied.
	pub fn context(&self) -> Option<&RequestContext> {
		self.context.as_ref()
	}

	/// Returns the context downcast to `T`.
	pub fn context_as<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.context.as_deref().and_then(|c| c.downcast_ref::<T>())
	}
}

impl std::fmt::Debug for Request {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Request")
			.field("route", &self.route.template())
			.field("url", &self.url)
			.field("path_params", &self.path_params)
			.field("query_params", &self.query_params)
			.field("has_context", &self.context.is_some())
			.finish()
	}
}
