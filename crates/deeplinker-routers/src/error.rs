//! Error types for template compilation and URL decomposition.

use thiserror::Error;

/// Errors produced while compiling a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	/// The same `:name` token appears more than once in one template.
	#[error("duplicate parameter '{name}' in route template '{route}'")]
	DuplicateParam {
		/// The offending template.
		route: String,
		/// The repeated parameter name.
		name: String,
	},

	/// Template exceeds the maximum accepted length.
	#[error("route template length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Maximum allowed length in bytes.
		max: usize,
	},

	/// Template has more `/` separated segments than allowed.
	#[error("route template has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Maximum allowed segment count.
		max: usize,
	},

	/// The generated regex failed to build.
	#[error("failed to compile route template regex: {0}")]
	InvalidRegex(String),
}

impl PatternError {
	/// Returns `true` for the only failure the router tolerates at registration.
	pub fn is_duplicate_param(&self) -> bool {
		matches!(self, Self::DuplicateParam { .. })
	}
}

/// Errors produced while splitting an incoming URL into host+path and query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
	/// Nothing to match against.
	#[error("empty url")]
	Empty,

	/// The string has a scheme but is not a valid URL.
	#[error("invalid url: {0}")]
	Parse(#[from] url::ParseError),
}

/// Result type for template compilation.
pub type PatternResult<T> = Result<T, PatternError>;
