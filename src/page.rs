//! Installation into the review page and the functions the page calls into.
//!
//! The page's inline handlers call [`toggle_edit_review`] and [`toggle_search_list`] (exported as
//! `toggleEditReview` and `toggleSearchList`). Both install a default [`ReviewPage`] on first use,
//! so calling [`install_review_page`] up front is only needed for non-default configuration.

use crate::{
	config::Config,
	edit_toggle::{EditToggleError, ReviewEditor, ReviewElementIds},
	search::FetchBackend,
	search_suggest::SearchSuggest,
};
use core::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement, Window};

thread_local! {
	static PAGE: RefCell<Option<ReviewPage>> = RefCell::new(None);
}

#[derive(Debug, Error)]
pub enum PageError {
	#[error("no document is associated with the window")]
	NoDocument,
	#[error("DOM operation failed during installation: {0:?}")]
	Dom(JsValue),
}

type Listener = Closure<dyn Fn(Event)>;

/// One review editor and (if the page has a search list) one search suggestion widget,
/// plus any event listeners bound for them.
///
/// Bound listeners are removed again when the [`ReviewPage`] is dropped.
#[derive(Debug)]
pub struct ReviewPage {
	editor: Rc<RefCell<ReviewEditor>>,
	search: Option<Rc<SearchSuggest<FetchBackend>>>,
	listeners: Vec<(EventTarget, &'static str, Listener)>,
}

impl ReviewPage {
	/// # Errors
	///
	/// Iff `window` has no document or a configured selector is invalid.
	pub fn install(window: &Window, config: &Config) -> Result<Self, PageError> {
		Self::assemble(window, config, None)
	}

	/// Like [`install`](`ReviewPage::install`), but shares `previous`'s [`ReviewEditor`],
	/// so reviews still in edit mode can be toggled back through the new page.
	///
	/// `previous` should be dropped afterwards, which unbinds its listeners and discards its pending search.
	///
	/// # Errors
	///
	/// Iff `window` has no document or a configured selector is invalid.
	pub fn install_replacing(window: &Window, config: &Config, previous: &ReviewPage) -> Result<Self, PageError> {
		Self::assemble(window, config, Some(Rc::clone(&previous.editor)))
	}

	#[instrument(skip(window, editor))]
	fn assemble(window: &Window, config: &Config, editor: Option<Rc<RefCell<ReviewEditor>>>) -> Result<Self, PageError> {
		let document = window.document().ok_or(PageError::NoDocument)?;
		let editor = editor.unwrap_or_else(|| Rc::new(RefCell::new(ReviewEditor::new(document.clone()))));

		let search = match document.query_selector(&config.search_list_selector).map_err(PageError::Dom)? {
			Some(list) => {
				let origin = window.location().origin().map_err(PageError::Dom)?;
				let backend = FetchBackend::new(window.clone(), config.search_endpoint.as_str(), config.search_parameter.as_str());
				Some(Rc::new(SearchSuggest::new(list, &origin, &config.titles_path, backend)))
			}
			None => {
				debug!("No search list matching {:?} on this page.", config.search_list_selector);
				None
			}
		};

		let mut page = Self {
			editor,
			search,
			listeners: Vec::new(),
		};
		if config.bind_listeners {
			page.bind_listeners(&document, config)?;
		}
		info!("Installed review page with {} event listener(s).", page.listeners.len());
		Ok(page)
	}

	#[must_use]
	pub fn editor(&self) -> &Rc<RefCell<ReviewEditor>> {
		&self.editor
	}

	#[must_use]
	pub fn search(&self) -> Option<&Rc<SearchSuggest<FetchBackend>>> {
		self.search.as_ref()
	}

	pub fn toggle_edit_review(&self, review_id: &str) {
		toggle_review(&self.editor, review_id);
	}

	pub fn toggle_search_list(&self, search_input: &str) {
		match &self.search {
			Some(search) => search.toggle(search_input),
			None => debug!("Ignoring search input: This page has no search list."),
		}
	}

	fn bind_listeners(&mut self, document: &Document, config: &Config) -> Result<(), PageError> {
		if let Some(search) = &self.search {
			match document.query_selector(&config.search_input_selector).map_err(PageError::Dom)? {
				Some(input) => {
					let search = Rc::clone(search);
					let listener = Closure::wrap(Box::new(move |event: Event| {
						match event.current_target().and_then(|target| target.dyn_into::<HtmlInputElement>().ok()) {
							Some(input) => search.toggle(&input.value()),
							None => warn!("Search input event didn't come from an `<input>`."),
						}
					}) as Box<dyn Fn(Event)>);
					self.listen(input.into(), "input", listener)?;
				}
				None => warn!("No search input matching {:?} on this page.", config.search_input_selector),
			}
		}

		let toggles = document
			.query_selector_all(&format!("input[id^=\"{}\"]", ReviewElementIds::TOGGLE_PREFIX))
			.map_err(PageError::Dom)?;
		for toggle in (0..toggles.length()).filter_map(|i| toggles.item(i)) {
			let editor = Rc::clone(&self.editor);
			let listener = Closure::wrap(Box::new(move |event: Event| {
				let review_id = event
					.current_target()
					.and_then(|target| target.dyn_into::<Element>().ok())
					.and_then(|toggle| toggle.id().strip_prefix(ReviewElementIds::TOGGLE_PREFIX).map(str::to_owned));
				match review_id {
					Some(review_id) => toggle_review(&editor, &review_id),
					None => warn!("Edit toggle event without review id."),
				}
			}) as Box<dyn Fn(Event)>);
			self.listen(toggle.into(), "change", listener)?;
		}
		Ok(())
	}

	fn listen(&mut self, target: EventTarget, event_name: &'static str, listener: Listener) -> Result<(), PageError> {
		target
			.add_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref())
			.map_err(PageError::Dom)?;
		self.listeners.push((target, event_name, listener));
		Ok(())
	}
}

impl Drop for ReviewPage {
	fn drop(&mut self) {
		for (target, event_name, listener) in self.listeners.drain(..) {
			if let Err(error) = target.remove_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref()) {
				error!("Failed to remove {} listener: {:?}", event_name, error);
			}
		}
		if let Some(search) = &self.search {
			search.invalidate();
		}
		trace!("Dropped review page.");
	}
}

fn toggle_review(editor: &RefCell<ReviewEditor>, review_id: &str) {
	match editor.borrow_mut().toggle(review_id) {
		Ok(mode) => trace!("Review {} is now in {:?} mode.", review_id, mode),
		// Pages render toggles only for some reviews, so this is expected.
		Err(error @ EditToggleError::MissingElement { .. }) => debug!("{}", error),
		Err(error) => error!("{}", error),
	}
}

fn init_console_log() {
	if !tracing::dispatcher::has_been_set() {
		tracing_wasm::set_as_global_default();
	}
}

/// Installs the page's [`ReviewPage`], replacing (and unbinding) a previously installed one.
///
/// Edit sessions of the previous page carry over. Its pending search response, if any, is discarded.
/// If installation fails, the previous page stays installed.
pub fn install(config: &Config) {
	if config.console_log {
		init_console_log();
	}

	let window = match web_sys::window() {
		Some(window) => window,
		None => {
			error!("cinereview-dom: No `window` available.");
			return;
		}
	};
	let previous = PAGE.with(|installed| installed.borrow_mut().take());
	let page = match &previous {
		Some(previous) => ReviewPage::install_replacing(&window, config, previous),
		None => ReviewPage::install(&window, config),
	};
	let installed_page = match page {
		Ok(page) => {
			drop(previous);
			Some(page)
		}
		Err(error) => {
			error!("{}", error);
			previous
		}
	};
	PAGE.with(|installed| *installed.borrow_mut() = installed_page);
}

/// Installs the review page, optionally configured by a JSON object (see [`Config`]).
///
/// Invalid configuration is logged and nothing is installed.
#[wasm_bindgen(js_name = installReviewPage)]
pub fn install_review_page(config_json: Option<String>) {
	match config_json.as_deref().map(Config::from_json).transpose() {
		Ok(config) => install(&config.unwrap_or_default()),
		Err(error) => {
			init_console_log();
			error!("{}", error);
		}
	}
}

fn with_page(f: impl FnOnce(&ReviewPage)) {
	if !PAGE.with(|installed| installed.borrow().is_some()) {
		install(&Config::default());
	}
	PAGE.with(|installed| {
		if let Some(page) = &*installed.borrow() {
			f(page);
		}
	});
}

/// Switches review `review_id` between display and edit mode, following its toggle's ***checked*** state.
#[wasm_bindgen(js_name = toggleEditReview)]
pub fn toggle_edit_review(review_id: &str) {
	with_page(|page| page.toggle_edit_review(review_id));
}

/// Refreshes the search suggestions for `search_input`.
#[wasm_bindgen(js_name = toggleSearchList)]
pub fn toggle_search_list(search_input: &str) {
	with_page(|page| page.toggle_search_list(search_input));
}
