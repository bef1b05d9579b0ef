//! Page wiring configuration.
//!
//! All fields have defaults matching the review site's markup, so an empty JSON object (or no configuration at all) is valid.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
	/// Path of the search endpoint, without query string.
	pub search_endpoint: String,
	/// Name of the query parameter carrying the search text.
	pub search_parameter: String,
	/// Path prefix of title detail pages. Result links point to `{origin}{titles_path}/{movie_or_tv}/{id}`.
	pub titles_path: String,
	pub search_input_selector: String,
	pub search_list_selector: String,
	/// Whether to attach `input`/`change` listeners during installation.
	///
	/// Off by default since the page usually calls the exported functions from inline handlers,
	/// and binding both would toggle twice per event.
	pub bind_listeners: bool,
	/// Whether to install a [`tracing_wasm`] console subscriber.
	pub console_log: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			search_endpoint: "/search-result/".to_owned(),
			search_parameter: "search-input".to_owned(),
			titles_path: "/titles".to_owned(),
			search_input_selector: ".search-input".to_owned(),
			search_list_selector: ".search-list".to_owned(),
			bind_listeners: false,
			console_log: true,
		}
	}
}

impl Config {
	/// Parses a (partial) configuration from JSON.
	///
	/// # Errors
	///
	/// Iff `json` is not a JSON object of known configuration keys.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		serde_json::from_str(json).map_err(ConfigError::Json)
	}
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid page configuration: {0}")]
	Json(#[source] serde_json::Error),
}
