//! URL decomposition for matching.
//!
//! Incoming links are reduced to the string a compiled pattern is matched
//! against plus a separate query map:
//!
//! ```text
//! myapp://orders/42?tab=items   →  scheme "myapp", host+path "/orders/42", {tab: items}
//! /orders/42?tab=items          →  no scheme,      host+path "/orders/42", {tab: items}
//! ```
//!
//! The host, when present, becomes the first path segment. Path text stays
//! percent-encoded here so that `%2F` cannot split a segment; captured
//! parameter values are decoded by the pattern. Query pairs are decoded.

use crate::error::UrlError;
use std::collections::HashMap;
use url::{Url, form_urlencoded};

/// An incoming URL split into the parts the router works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedUrl {
	/// Lowercased scheme, if the input had one.
	pub scheme: Option<String>,
	/// Host (prefixed with `/`) followed by the path.
	pub host_path: String,
	/// Decoded query pairs. Later duplicates win.
	pub query: HashMap<String, String>,
}

/// Splits a raw URL string into scheme, host+path and query pairs.
///
/// # Errors
///
/// Returns [`UrlError::Empty`] for blank input and [`UrlError::Parse`] when a
/// scheme-qualified string is not a valid URL.
pub fn decompose(raw: &str) -> Result<DecomposedUrl, UrlError> {
	let raw = raw.trim();
	if raw.is_empty() {
		return Err(UrlError::Empty);
	}

	if raw.contains("://") {
		let url = Url::parse(raw)?;
		let mut host_path = String::new();
		if let Some(host) = url.host_str()
			&& !host.is_empty()
		{
			host_path.push('/');
			host_path.push_str(host);
		}
		host_path.push_str(url.path());

		return Ok(DecomposedUrl {
			scheme: Some(url.scheme().to_string()),
			host_path: normalize_root(host_path),
			query: url.query_pairs().into_owned().collect(),
		});
	}

	let without_fragment = raw.split_once('#').map_or(raw, |(before, _)| before);
	let (path, query) = match without_fragment.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (without_fragment, None),
	};

	let host_path = if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	};

	Ok(DecomposedUrl {
		scheme: None,
		host_path: normalize_root(host_path),
		query: query
			.map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
			.unwrap_or_default(),
	})
}

fn normalize_root(host_path: String) -> String {
	if host_path.is_empty() {
		"/".to_string()
	} else {
		host_path
	}
}
