//! Search endpoint access and its response model.
//!
//! The endpoint answers `GET {endpoint}?{parameter}={query}` with a JSON object mapping title ids to hits:
//!
//! ```json
//! { "42": { "title": "Batman", "img_url": "/x.jpg", "movie_or_tv": "movie" } }
//! ```

use core::fmt::{self, Display, Formatter};
use js_sys::Promise;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{
	de::{MapAccess, Visitor},
	Deserialize, Deserializer,
};
use thiserror::Error;
use tracing::{instrument, trace};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

/// The characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'!').remove(b'~').remove(b'*').remove(b'\'').remove(b'(').remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
	Movie,
	Tv,
}

impl MediaType {
	/// The lowercase wire name, which is also the path segment of title pages.
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			MediaType::Movie => "movie",
			MediaType::Tv => "tv",
		}
	}
}

impl Display for MediaType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultEntry {
	pub id: String,
	pub title: String,
	pub image_url: String,
	pub media_type: MediaType,
}

/// Search hits in the order the endpoint listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults(pub Vec<SearchResultEntry>);

impl SearchResults {
	/// # Errors
	///
	/// Iff `json` isn't an object of well-formed hits.
	pub fn from_json(json: &str) -> Result<Self, SearchError> {
		serde_json::from_str(json).map_err(SearchError::Body)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> core::slice::Iter<'_, SearchResultEntry> {
		self.0.iter()
	}
}

impl<'a> IntoIterator for &'a SearchResults {
	type Item = &'a SearchResultEntry;
	type IntoIter = core::slice::Iter<'a, SearchResultEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[derive(Deserialize)]
struct Hit {
	title: String,
	img_url: String,
	movie_or_tv: MediaType,
}

impl<'de> Deserialize<'de> for SearchResults {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct ResultsVisitor;
		impl<'de> Visitor<'de> for ResultsVisitor {
			type Value = SearchResults;

			fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
				formatter.write_str("a map from title ids to search hits")
			}

			// Walking the map directly keeps the order of the response body.
			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
				let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
				while let Some((id, hit)) = map.next_entry::<String, Hit>()? {
					entries.push(SearchResultEntry {
						id,
						title: hit.title,
						image_url: hit.img_url,
						media_type: hit.movie_or_tv,
					});
				}
				Ok(SearchResults(entries))
			}
		}

		deserializer.deserialize_map(ResultsVisitor)
	}
}

#[derive(Debug, Error)]
pub enum SearchError {
	#[error("search request failed: {0:?}")]
	Network(JsValue),
	#[error("search endpoint answered with HTTP status {0}")]
	Status(u16),
	#[error("search response body could not be read as text")]
	Decode,
	#[error("malformed search response: {0}")]
	Body(#[source] serde_json::Error),
}

/// Builds the request URL for `query`, percent-encoding it the same way as `encodeURIComponent`.
#[must_use]
pub fn search_url(endpoint: &str, parameter: &str, query: &str) -> String {
	format!("{}?{}={}", endpoint, parameter, utf8_percent_encode(query, URI_COMPONENT))
}

/// Where [`SearchSuggest`](`crate::search_suggest::SearchSuggest`) gets its results from.
#[allow(async_fn_in_trait)] // Only used from single-threaded wasm, where `Send` futures don't matter.
pub trait SearchBackend {
	/// # Errors
	///
	/// Iff the results can't be retrieved or decoded.
	async fn search(&self, query: &str) -> Result<SearchResults, SearchError>;
}

/// Queries the search endpoint through `window.fetch`.
#[derive(Debug, Clone)]
pub struct FetchBackend {
	window: Window,
	endpoint: String,
	parameter: String,
}

impl FetchBackend {
	#[must_use]
	pub fn new(window: Window, endpoint: impl Into<String>, parameter: impl Into<String>) -> Self {
		Self {
			window,
			endpoint: endpoint.into(),
			parameter: parameter.into(),
		}
	}
}

impl SearchBackend for FetchBackend {
	#[instrument(skip(self, query), fields(query.len = query.len()))]
	async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
		let url = search_url(&self.endpoint, &self.parameter, query);
		if cfg!(feature = "dangerous-logging") {
			trace!("Fetching {:?}.", url);
		}

		let response = JsFuture::from(self.window.fetch_with_str(&url)).await.map_err(SearchError::Network)?;
		let response: Response = response.dyn_into().map_err(SearchError::Network)?;
		if !response.ok() {
			return Err(SearchError::Status(response.status()));
		}

		let text: Promise = response.text().map_err(SearchError::Network)?;
		let text = JsFuture::from(text).await.map_err(SearchError::Network)?.as_string().ok_or(SearchError::Decode)?;
		trace!("Received {} byte(s) of search results.", text.len());
		SearchResults::from_json(&text)
	}
}
