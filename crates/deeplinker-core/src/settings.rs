//! Deep linker settings.
//!
//! Settings are plain data, loadable from TOML:
//!
//! ```toml
//! invalid_link_notice = "This link is not valid."
//! strict_templates = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("failed to read settings file: {0}")]
	Io(#[from] std::io::Error),

	/// The settings file is not valid TOML for [`LinkerSettings`].
	#[error("failed to parse settings: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value is present but unusable.
	#[error("invalid setting: {0}")]
	Invalid(String),
}

/// Result type for settings loading.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Behavior knobs for a [`DeepLinker`](crate::DeepLinker).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkerSettings {
	/// Message handed to the notice presenter when a link matches nothing.
	#[serde(default = "default_invalid_link_notice")]
	pub invalid_link_notice: String,

	/// Abort registration on duplicate template parameters instead of
	/// logging and skipping the route.
	#[serde(default)]
	pub strict_templates: bool,
}

fn default_invalid_link_notice() -> String {
	"This link is not valid.".to_string()
}

impl Default for LinkerSettings {
	fn default() -> Self {
		Self {
			invalid_link_notice: default_invalid_link_notice(),
			strict_templates: false,
		}
	}
}

impl LinkerSettings {
	/// Parses and validates settings from a TOML string.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Toml`] on malformed input and
	/// [`SettingsError::Invalid`] if validation fails.
	pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Io`] if the file cannot be read, otherwise as
	/// [`LinkerSettings::from_toml_str`].
	pub fn from_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
		let content = fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Sets the invalid-link notice text.
	pub fn with_invalid_link_notice(mut self, notice: impl Into<String>) -> Self {
		self.invalid_link_notice = notice.into();
		self
	}

	/// Sets strict template handling.
	pub fn with_strict_templates(mut self, strict: bool) -> Self {
		self.strict_templates = strict;
		self
	}

	/// Checks values that deserialize fine but cannot be used.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Invalid`] for a blank notice.
	pub fn validate(&self) -> SettingsResult<()> {
		if self.invalid_link_notice.trim().is_empty() {
			return Err(SettingsError::Invalid(
				"invalid_link_notice must not be empty".to_string(),
			));
		}
		Ok(())
	}
}
