//! Swaps a review's rating and comment display for editable form controls, and back.
//!
//! A review with id `{id}` is made up of three elements the page renders with conventional ids:
//!
//! - `review-rating-{id}`, whose text is the numeric rating,
//! - `review-comment-{id}`, whose text is the comment,
//! - `edit-review-btn-{id}`, a checkbox-like `<input>` whose ***checked*** state selects the mode.
//!
//! While in edit mode, the first two are replaced by a number input and a textarea with the same ids,
//! followed by an "Update Review" submit button. Saving is left to the surrounding form.

use hashbrown::HashMap;
use thiserror::Error;
use tracing::{debug, error, instrument, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, HtmlTextAreaElement};

/// The element ids belonging to one review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewElementIds {
	pub rating: String,
	pub comment: String,
	pub toggle: String,
}

impl ReviewElementIds {
	pub const TOGGLE_PREFIX: &'static str = "edit-review-btn-";

	#[must_use]
	pub fn for_review(review_id: &str) -> Self {
		Self {
			rating: format!("review-rating-{}", review_id),
			comment: format!("review-comment-{}", review_id),
			toggle: format!("{}{}", Self::TOGGLE_PREFIX, review_id),
		}
	}
}

/// Which shape a review's part of the page is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
	Display,
	Edit,
}

#[derive(Debug, Error)]
pub enum EditToggleError {
	#[error("review element #{id} not found")]
	MissingElement { id: String },
	#[error("DOM operation failed: {0:?}")]
	Dom(JsValue),
}

/// What's needed to leave edit mode again.
#[derive(Debug)]
pub struct EditSession {
	rating_markup: String,
	comment_markup: String,
	submit_button: HtmlButtonElement,
}

/// Tracks one [`EditSession`] per review that is currently in edit mode.
#[derive(Debug)]
pub struct ReviewEditor {
	document: Document,
	sessions: HashMap<String, EditSession>,
}

impl ReviewEditor {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self {
			document,
			sessions: HashMap::new(),
		}
	}

	#[must_use]
	pub fn is_editing(&self, review_id: &str) -> bool {
		self.sessions.contains_key(review_id)
	}

	#[must_use]
	pub fn session_count(&self) -> usize {
		self.sessions.len()
	}

	/// Brings the review into the mode selected by its toggle's ***checked*** state.
	///
	/// Entering edit mode for a review that is already being edited, or leaving it for one that isn't, changes nothing.
	///
	/// # Errors
	///
	/// [`EditToggleError::MissingElement`] iff any of the review's elements is absent (or the toggle isn't an `<input>`).
	/// The DOM is left unchanged in that case.
	#[instrument(skip(self))]
	pub fn toggle(&mut self, review_id: &str) -> Result<ReviewMode, EditToggleError> {
		let ids = ReviewElementIds::for_review(review_id);
		let rating = self.element(&ids.rating)?;
		let comment = self.element(&ids.comment)?;
		let toggle = self
			.element(&ids.toggle)?
			.dyn_into::<HtmlInputElement>()
			.map_err(|_| EditToggleError::MissingElement { id: ids.toggle.clone() })?;

		if toggle.checked() {
			self.enter(review_id, &ids, &rating, &comment)
		} else {
			self.exit(review_id, &rating, &comment)
		}
	}

	fn element(&self, id: &str) -> Result<Element, EditToggleError> {
		self.document.get_element_by_id(id).ok_or_else(|| EditToggleError::MissingElement { id: id.to_owned() })
	}

	fn create<T: JsCast>(&self, tag: &str) -> Result<T, EditToggleError> {
		self.document
			.create_element(tag)
			.map_err(EditToggleError::Dom)?
			.dyn_into::<T>()
			.map_err(|element| EditToggleError::Dom(element.into()))
	}

	fn enter(&mut self, review_id: &str, ids: &ReviewElementIds, rating: &Element, comment: &Element) -> Result<ReviewMode, EditToggleError> {
		if self.sessions.contains_key(review_id) {
			warn!("Review is already in edit mode. Keeping the current edit session.");
			return Ok(ReviewMode::Edit);
		}

		let rating_value = rating.inner_html();
		let comment_value = comment.inner_html();
		let comment_value = comment_value.trim();
		if cfg!(feature = "dangerous-logging") {
			debug!("Editing rating {:?} with comment {:?}.", rating_value, comment_value);
		} else {
			debug!("Editing rating with {}-byte comment.", comment_value.len());
		}

		// Elements are built before anything is replaced; a failed swap below is rolled back.
		let rating_input: HtmlInputElement = self.create("input")?;
		rating_input.set_type("number");
		rating_input.set_class_name("form-control review-rating");
		rating_input.set_id(&ids.rating);
		rating_input.set_name("new-rating");
		rating_input.set_min("1");
		rating_input.set_max("10");
		rating_input.set_step("0.1");
		rating_input.set_value(&rating_value);
		rating_input.set_required(true);

		let comment_input: HtmlTextAreaElement = self.create("textarea")?;
		comment_input.set_class_name("form-control comment-text");
		comment_input.set_id(&ids.comment);
		comment_input.set_name("new-comment-text");
		comment_input.set_rows(3);
		comment_input.set_required(true);
		comment_input.set_inner_html(comment_value);

		let submit_button: HtmlButtonElement = self.create("button")?;
		submit_button.set_name("update-submit");
		submit_button.set_type("submit");
		submit_button.set_class_name("btn btn-primary");
		submit_button.set_value(review_id);
		submit_button.set_inner_html("Update Review");

		let session = EditSession {
			rating_markup: rating.outer_html(),
			comment_markup: comment.outer_html(),
			submit_button,
		};

		let rating_input: &Element = &rating_input;
		let comment_input: &Element = &comment_input;
		rating.replace_with_with_node_1(rating_input).map_err(EditToggleError::Dom)?;
		if let Err(error) = comment.replace_with_with_node_1(comment_input) {
			roll_back(&[(rating_input, rating)]);
			return Err(EditToggleError::Dom(error));
		}
		if let Err(error) = comment_input.after_with_node_1(&session.submit_button) {
			roll_back(&[(rating_input, rating), (comment_input, comment)]);
			return Err(EditToggleError::Dom(error));
		}

		self.sessions.insert(review_id.to_owned(), session);
		trace!("{} review(s) in edit mode.", self.sessions.len());
		Ok(ReviewMode::Edit)
	}

	fn exit(&mut self, review_id: &str, rating: &Element, comment: &Element) -> Result<ReviewMode, EditToggleError> {
		let session = match self.sessions.remove(review_id) {
			Some(session) => session,
			None => {
				warn!("Review isn't in edit mode. Nothing to restore.");
				return Ok(ReviewMode::Display);
			}
		};

		rating.set_outer_html(&session.rating_markup);
		comment.set_outer_html(&session.comment_markup);
		session.submit_button.remove();

		trace!("{} review(s) in edit mode.", self.sessions.len());
		Ok(ReviewMode::Display)
	}
}

/// Puts each original element back in place of its replacement, latest swap first.
fn roll_back(swaps: &[(&Element, &Element)]) {
	for (replacement, original) in swaps.iter().rev() {
		if let Err(error) = replacement.replace_with_with_node_1(original) {
			error!("Failed to restore review element after an aborted edit: {:?}", error);
		}
	}
	warn!("Aborted entering edit mode.");
}

#[cfg(test)]
mod tests {
	use super::ReviewElementIds;

	#[test]
	fn element_ids() {
		assert_eq!(
			ReviewElementIds::for_review("17"),
			ReviewElementIds {
				rating: "review-rating-17".to_owned(),
				comment: "review-comment-17".to_owned(),
				toggle: "edit-review-btn-17".to_owned(),
			}
		);
	}
}
