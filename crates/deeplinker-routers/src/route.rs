//! Compiled route identity.

use crate::error::PatternResult;
use crate::pattern::CompiledPattern;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A registered route: its template and the pattern compiled from it.
///
/// Two routes are equal when their templates are equal.
#[derive(Debug, Clone)]
pub struct Route {
	pattern: CompiledPattern,
}

impl Route {
	/// Compiles a template into a route.
	///
	/// # Errors
	///
	/// Returns the [`PatternError`](crate::PatternError) produced by
	/// [`CompiledPattern::compile`].
	pub fn new(template: &str) -> PatternResult<Self> {
		Ok(Self {
			pattern: CompiledPattern::compile(template)?,
		})
	}

	/// Returns the original template string.
	pub fn template(&self) -> &str {
		self.pattern.template()
	}

	/// Returns the compiled pattern.
	pub fn pattern(&self) -> &CompiledPattern {
		&self.pattern
	}

	/// Returns the parameter names in capture order.
	pub fn param_keys(&self) -> &[String] {
		self.pattern.param_keys()
	}

	/// Builds a concrete URL for this route.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		self.pattern.reverse(params)
	}
}

impl PartialEq for Route {
	fn eq(&self, other: &Self) -> bool {
		self.template() == other.template()
	}
}

impl Eq for Route {}

impl Hash for Route {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.template().hash(state);
	}
}

impl std::fmt::Display for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.template())
	}
}
