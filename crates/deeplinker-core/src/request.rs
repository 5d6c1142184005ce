//! Mailbox payload for a matched deep link.

use crate::link::{DeepLink, LinkRoute};
use deeplinker_routers::{Request, RequestContext};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// A matched deep link waiting to be serviced.
#[derive(Clone)]
pub struct DeepLinkRequest<R> {
	link: DeepLink<R>,
	url: String,
	path_params: IndexMap<String, String>,
	query_params: HashMap<String, String>,
	context: Option<RequestContext>,
}

impl<R: LinkRoute> DeepLinkRequest<R> {
	/// Builds the payload from the deep link that matched and the router request.
	pub fn from_match(link: DeepLink<R>, request: &Request) -> Self {
		Self {
			link,
			url: request.url().to_string(),
			path_params: request.path_params().clone(),
			query_params: request.query_params().clone(),
			context: request.context().cloned(),
		}
	}

	/// Returns the matched deep link.
	pub fn link(&self) -> &DeepLink<R> {
		&self.link
	}

	/// Returns the matched route case.
	pub fn route(&self) -> R {
		self.link.route()
	}

	/// Returns the raw URL string that was routed.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Returns path parameters in template order.
	pub fn path_params(&self) -> &IndexMap<String, String> {
		&self.path_params
	}

	/// Returns a single path parameter.
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Returns the query parameters.
	pub fn query_params(&self) -> &HashMap<String, String> {
		&self.query_params
	}

	/// Returns a single query parameter.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Returns the opaque context passed to the router, if any.
	pub fn context(&self) -> Option<&RequestContext> {
		self.context.as_ref()
	}

	/// Re-evaluates the link's authorization predicate.
	pub fn is_actionable(&self) -> bool {
		self.link.is_actionable()
	}
}

impl<R: fmt::Debug> fmt::Debug for DeepLinkRequest<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DeepLinkRequest")
			.field("link", &self.link)
			.field("url", &self.url)
			.field("path_params", &self.path_params)
			.field("query_params", &self.query_params)
			.field("has_context", &self.context.is_some())
			.finish()
	}
}
