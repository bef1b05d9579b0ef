//! Live search suggestions below the page's search box.

use crate::{
	search::{SearchBackend, SearchResultEntry, SearchResults},
	title_case::title_case,
};
use core::{cell::Cell, future::Future};
use std::rc::Rc;
use tracing::{debug, error, trace, trace_span, Instrument};
use wasm_bindgen::{JsValue, UnwrapThrowExt};
use web_sys::{Document, Element};

pub const NO_RESULTS: &str = "No results found";

/// Renders search results into a list container, one request per input change.
///
/// Each call to [`refresh`](`SearchSuggest::refresh`) supersedes all earlier ones:
/// responses to outdated requests are dropped instead of being rendered.
#[derive(Debug)]
pub struct SearchSuggest<B> {
	shared: Rc<Shared<B>>,
}

#[derive(Debug)]
struct Shared<B> {
	list: Element,
	document: Document,
	titles_base: String,
	backend: B,
	generation: Cell<u64>,
}

impl<B: SearchBackend + 'static> SearchSuggest<B> {
	/// Result entries link to `{origin}{titles_path}/{movie_or_tv}/{id}`.
	#[must_use]
	pub fn new(list: Element, origin: &str, titles_path: &str, backend: B) -> Self {
		let document = list.owner_document().expect_throw("cinereview-dom: No owner document found for search list.");
		Self {
			shared: Rc::new(Shared {
				list,
				document,
				titles_base: format!("{}{}", origin, titles_path),
				backend,
				generation: Cell::new(0),
			}),
		}
	}

	#[must_use]
	pub fn list(&self) -> &Element {
		&self.shared.list
	}

	/// Clears the list and, for non-empty `search_input`, populates it in the background once results arrive.
	pub fn toggle(&self, search_input: &str) {
		wasm_bindgen_futures::spawn_local(self.refresh(search_input));
	}

	/// Clears the list immediately and returns the continuation that fetches and renders results.
	///
	/// The list is cleared and earlier requests are invalidated before this function returns,
	/// even if the returned future is never polled. For empty `search_input`, no request is made.
	pub fn refresh(&self, search_input: &str) -> impl Future<Output = ()> + 'static {
		let span = trace_span!("refresh", search_input.len = search_input.len());
		let _enter = span.enter();

		self.shared.list.set_inner_html("");
		let generation = self.shared.generation.get().wrapping_add(1);
		self.shared.generation.set(generation);

		let query = if search_input.is_empty() {
			trace!("Empty search input. Leaving the list empty.");
			None
		} else {
			if cfg!(feature = "dangerous-logging") {
				debug!("Searching for {:?}.", search_input);
			}
			Some(search_input.to_owned())
		};

		let shared = Rc::clone(&self.shared);
		async move {
			let query = match query {
				Some(query) => query,
				None => return,
			};

			let results = shared.backend.search(&query).await;
			if shared.generation.get() != generation {
				trace!("Discarding stale search response (generation {} superseded by {}).", generation, shared.generation.get());
				return;
			}

			match results {
				Ok(results) => {
					debug!("Rendering {} search result(s).", results.len());
					if let Err(error) = shared.render(&results) {
						error!("Failed to render search results: {:?}", error);
					}
				}
				Err(error) => error!("{}", error),
			}
		}
		.instrument(span.clone())
	}

	/// Drops the response to any pending request without touching the list.
	pub fn invalidate(&self) {
		self.shared.generation.set(self.shared.generation.get().wrapping_add(1));
	}
}

impl<B> Shared<B> {
	fn render(&self, results: &SearchResults) -> Result<(), JsValue> {
		for entry in results {
			let link = self.render_entry(entry)?;
			self.list.append_with_node_1(&link)?;
		}

		if results.is_empty() {
			let placeholder = self.document.create_element("label")?;
			placeholder.set_class_name("list-group-item");
			placeholder.set_text_content(Some(NO_RESULTS));
			self.list.append_with_node_1(&placeholder)?;
		}
		Ok(())
	}

	fn render_entry(&self, entry: &SearchResultEntry) -> Result<Element, JsValue> {
		let link = self.document.create_element("a")?;
		link.set_attribute("type", "button")?;
		link.set_class_name("list-group-item list-group-item-action");
		link.set_attribute("href", &format!("{}/{}/{}", self.titles_base, entry.media_type, entry.id))?;

		let swatch = self.document.create_element("div")?;
		swatch.set_class_name("list-group-item-img");
		swatch.set_attribute("style", &format!("background-image: url('{}')", entry.image_url.replace('\'', "%27")))?;
		swatch.set_text_content(Some(&title_case(entry.media_type.as_str())));

		link.append_with_node_1(&swatch)?;
		link.append_with_str_1(&entry.title)?;
		Ok(link)
	}
}
