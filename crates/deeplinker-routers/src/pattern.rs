//! Route template compilation.
//!
//! A route template is a string of literal segments and `:name` tokens:
//!
//! - `/home` - Exact match
//! - `/users/:id` - Single path parameter
//! - `/users/:user_id/posts/:post_id` - Multiple parameters
//! - `myapp://orders/:id` - Scheme-qualified template
//!
//! Each token captures exactly one path segment (`[^/]+`). The compiled
//! pattern is anchored at both ends, so it only matches a whole candidate.
//!
//! Scheme-qualified templates are compiled against the same host+path form
//! that [`crate::uri::decompose`] produces for incoming URLs: the host
//! becomes the first segment. `myapp://orders/:id` therefore compiles to the
//! same regex as `/orders/:id`, plus a scheme requirement.

use crate::error::{PatternError, PatternResult};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::{Regex, RegexBuilder};
use std::collections::{HashMap, HashSet};

/// Matches a single `:name` parameter token.
static PARAM_TOKEN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r":[A-Za-z0-9_-]+").expect("parameter token regex is valid"));

/// Regex fragment substituted for every parameter token.
const SEGMENT_CAPTURE: &str = "([^/]+)";

/// Maximum allowed length for a route template in bytes.
const MAX_TEMPLATE_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route template.
const MAX_TEMPLATE_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled template regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// The compiled, matchable form of a route template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	/// The original template string.
	template: String,
	/// Scheme required of matching URLs, lowercased.
	scheme: Option<String>,
	/// Anchored regex over the host+path form.
	regex: Regex,
	/// Parameter names in capture order.
	param_keys: Vec<String>,
}

impl CompiledPattern {
	/// Compiles a route template.
	///
	/// # Errors
	///
	/// - [`PatternError::DuplicateParam`] if a parameter name repeats
	/// - [`PatternError::TooLong`] if the template exceeds 1024 bytes
	/// - [`PatternError::TooManySegments`] if the template has more than 32 segments
	/// - [`PatternError::InvalidRegex`] if the generated regex cannot be built
	pub fn compile(template: &str) -> PatternResult<Self> {
		if template.len() > MAX_TEMPLATE_LENGTH {
			return Err(PatternError::TooLong {
				length: template.len(),
				max: MAX_TEMPLATE_LENGTH,
			});
		}

		let (scheme, path) = split_scheme(template);

		let segment_count = path.split('/').count();
		if segment_count > MAX_TEMPLATE_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segment_count,
				max: MAX_TEMPLATE_SEGMENTS,
			});
		}

		let (regex_str, param_keys) = Self::translate(template, &path)?;

		let regex = RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::InvalidRegex(e.to_string()))?;

		Ok(Self {
			template: template.to_string(),
			scheme: scheme.map(|s| s.to_ascii_lowercase()),
			regex,
			param_keys,
		})
	}

	/// Turns the host+path form of a template into an anchored regex.
	///
	/// Literal spans between tokens are escaped and copied through; each token
	/// is replaced by [`SEGMENT_CAPTURE`]. Rebuilding from spans keeps every
	/// token offset relative to the untouched template.
	fn translate(template: &str, path: &str) -> PatternResult<(String, Vec<String>)> {
		let mut regex_str = String::with_capacity(path.len() + 2);
		let mut param_keys = Vec::new();
		let mut seen = HashSet::new();
		let mut cursor = 0;

		regex_str.push('^');
		for token in PARAM_TOKEN.find_iter(path) {
			let name = &token.as_str()[1..];
			if !seen.insert(name) {
				return Err(PatternError::DuplicateParam {
					route: template.to_string(),
					name: name.to_string(),
				});
			}

			regex_str.push_str(&regex::escape(&path[cursor..token.start()]));
			regex_str.push_str(SEGMENT_CAPTURE);
			param_keys.push(name.to_string());
			cursor = token.end();
		}
		regex_str.push_str(&regex::escape(&path[cursor..]));
		regex_str.push('$');

		Ok((regex_str, param_keys))
	}

	/// Returns the original template string.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the lowercased scheme this template requires, if any.
	pub fn scheme(&self) -> Option<&str> {
		self.scheme.as_deref()
	}

	/// Returns the parameter names in capture order.
	pub fn param_keys(&self) -> &[String] {
		&self.param_keys
	}

	/// Returns the generated regex source.
	pub fn as_regex_str(&self) -> &str {
		self.regex.as_str()
	}

	/// Returns whether this template has no parameters.
	pub fn is_exact(&self) -> bool {
		self.param_keys.is_empty()
	}

	/// Checks the scheme requirement against a URL scheme.
	///
	/// Scheme-less templates accept any scheme, including none.
	pub fn accepts_scheme(&self, scheme: Option<&str>) -> bool {
		match (&self.scheme, scheme) {
			(None, _) => true,
			(Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
			(Some(_), None) => false,
		}
	}

	/// Checks if the host+path string matches this pattern in full.
	pub fn is_match(&self, host_path: &str) -> bool {
		self.regex.is_match(host_path)
	}

	/// Matches a host+path string and extracts parameters in capture order.
	///
	/// Values are percent-decoded, so `John%20Doe` and `John Doe` yield the
	/// same parameter.
	pub fn captures(&self, host_path: &str) -> Option<IndexMap<String, String>> {
		let caps = self.regex.captures(host_path)?;
		let mut params = IndexMap::with_capacity(self.param_keys.len());
		for (key, value) in self.param_keys.iter().zip(caps.iter().skip(1)) {
			if let Some(value) = value {
				params.insert(key.clone(), decode_segment(value.as_str()));
			}
		}
		Some(params)
	}

	/// Generates a concrete URL from this template with the given parameters.
	///
	/// Returns `None` if any parameter is missing.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut result = String::with_capacity(self.template.len());
		let mut cursor = 0;

		for token in PARAM_TOKEN.find_iter(&self.template) {
			// The `://` separator is never a token: a token needs a name character after `:`.
			let value = params.get(&token.as_str()[1..])?;
			result.push_str(&self.template[cursor..token.start()]);
			result.push_str(value);
			cursor = token.end();
		}
		result.push_str(&self.template[cursor..]);

		Some(result)
	}
}

impl PartialEq for CompiledPattern {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
	}
}

impl Eq for CompiledPattern {}

impl std::fmt::Display for CompiledPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.template)
	}
}

fn decode_segment(raw: &str) -> String {
	percent_decode_str(raw).decode_utf8_lossy().to_string()
}

/// Splits `scheme://rest` into the scheme and the host+path form of `rest`.
///
/// Templates without `://` are taken as host+path already.
fn split_scheme(template: &str) -> (Option<&str>, String) {
	match template.split_once("://") {
		Some((scheme, rest)) if !scheme.is_empty() && !scheme.contains('/') => {
			let path = if rest.starts_with('/') {
				rest.to_string()
			} else {
				format!("/{}", rest)
			};
			(Some(scheme), path)
		}
		_ => (None, template.to_string()),
	}
}
