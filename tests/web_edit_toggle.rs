use cinereview_dom::edit_toggle::{EditToggleError, ReviewEditor, ReviewMode};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, HtmlButtonElement, HtmlInputElement, HtmlTextAreaElement};

wasm_bindgen_test_configure!(run_in_browser);

use web_fixture_::{by_id, document, init_log, mount, review_markup, set_checked};

fn submit_buttons(container: &Element) -> u32 {
	container.query_selector_all("button[name=update-submit]").unwrap().length()
}

#[wasm_bindgen_test]
fn round_trip() {
	init_log();
	let container = mount(&review_markup("101", "8.5", "Loved every minute &amp; the score."));
	let before = container.inner_html();
	let mut editor = ReviewEditor::new(document());

	set_checked("edit-review-btn-101", true);
	assert_eq!(editor.toggle("101").unwrap(), ReviewMode::Edit);
	assert_ne!(container.inner_html(), before);
	assert_eq!(submit_buttons(&container), 1);

	set_checked("edit-review-btn-101", false);
	assert_eq!(editor.toggle("101").unwrap(), ReviewMode::Display);
	assert_eq!(container.inner_html(), before);
	assert_eq!(submit_buttons(&container), 0);
	assert!(!editor.is_editing("101"));

	container.remove();
}

#[wasm_bindgen_test]
fn edit_controls() {
	init_log();
	let container = mount(&review_markup("102", "7.5", "Solid."));
	let mut editor = ReviewEditor::new(document());

	set_checked("edit-review-btn-102", true);
	editor.toggle("102").unwrap();

	let rating: HtmlInputElement = by_id("review-rating-102");
	assert_eq!(rating.type_(), "number");
	assert_eq!(rating.name(), "new-rating");
	assert_eq!(rating.min(), "1");
	assert_eq!(rating.max(), "10");
	assert_eq!(rating.step(), "0.1");
	assert!(rating.required());
	assert_eq!(rating.value(), "7.5");

	let comment: HtmlTextAreaElement = by_id("review-comment-102");
	assert_eq!(comment.name(), "new-comment-text");
	assert_eq!(comment.rows(), 3);
	assert!(comment.required());
	assert_eq!(comment.value(), "Solid.");

	let submit: HtmlButtonElement = comment.next_element_sibling().unwrap().dyn_into().unwrap();
	assert_eq!(submit.name(), "update-submit");
	assert_eq!(submit.type_(), "submit");
	assert_eq!(submit.value(), "102");
	assert_eq!(submit.text_content().unwrap(), "Update Review");

	set_checked("edit-review-btn-102", false);
	editor.toggle("102").unwrap();
	container.remove();
}

#[wasm_bindgen_test]
fn missing_element_changes_nothing() {
	init_log();
	let container = mount(r#"<h5 id="review-rating-103">6</h5><input type="checkbox" id="edit-review-btn-103" checked>"#);
	let before = container.inner_html();
	let mut editor = ReviewEditor::new(document());

	match editor.toggle("103") {
		Err(EditToggleError::MissingElement { id }) => assert_eq!(id, "review-comment-103"),
		other => panic!("Expected missing comment element but got {:?}", other),
	}
	assert_eq!(container.inner_html(), before);
	assert_eq!(editor.session_count(), 0);

	container.remove();
}

#[wasm_bindgen_test]
fn entering_twice_keeps_one_session() {
	init_log();
	let container = mount(&review_markup("104", "9", "Twice."));
	let before = container.inner_html();
	let mut editor = ReviewEditor::new(document());

	set_checked("edit-review-btn-104", true);
	editor.toggle("104").unwrap();
	assert_eq!(editor.toggle("104").unwrap(), ReviewMode::Edit);
	assert_eq!(submit_buttons(&container), 1);
	assert_eq!(editor.session_count(), 1);

	set_checked("edit-review-btn-104", false);
	editor.toggle("104").unwrap();
	assert_eq!(container.inner_html(), before);
	assert_eq!(submit_buttons(&container), 0);

	container.remove();
}

#[wasm_bindgen_test]
fn independent_sessions() {
	init_log();
	let first = mount(&review_markup("105", "3.2", "Meh."));
	let second = mount(&review_markup("106", "10", "Masterpiece."));
	let (first_before, second_before) = (first.inner_html(), second.inner_html());
	let mut editor = ReviewEditor::new(document());

	set_checked("edit-review-btn-105", true);
	editor.toggle("105").unwrap();
	set_checked("edit-review-btn-106", true);
	editor.toggle("106").unwrap();
	assert_eq!(editor.session_count(), 2);

	set_checked("edit-review-btn-105", false);
	editor.toggle("105").unwrap();
	assert_eq!(first.inner_html(), first_before);
	assert_eq!(submit_buttons(&first), 0);
	assert!(editor.is_editing("106"));
	assert_eq!(submit_buttons(&second), 1);
	assert_eq!(by_id::<HtmlInputElement>("review-rating-106").value(), "10");

	set_checked("edit-review-btn-106", false);
	editor.toggle("106").unwrap();
	assert_eq!(second.inner_html(), second_before);

	first.remove();
	second.remove();
}

#[wasm_bindgen_test]
fn leaving_without_session() {
	init_log();
	let container = mount(&review_markup("107", "5", "Unchanged."));
	let before = container.inner_html();
	let mut editor = ReviewEditor::new(document());

	assert_eq!(editor.toggle("107").unwrap(), ReviewMode::Display);
	assert_eq!(container.inner_html(), before);

	container.remove();
}

#[wasm_bindgen_test]
fn failed_swap_is_rolled_back() {
	init_log();
	// With the comment as document element, nothing can be inserted after its replacement.
	let detached = document().implementation().unwrap().create_html_document().unwrap();
	detached.document_element().unwrap().remove();
	let comment = detached.create_element("p").unwrap();
	comment.set_id("review-comment-108");
	comment.set_inner_html(r#"<span id="review-rating-108">5</span><input type="checkbox" id="edit-review-btn-108" checked>"#);
	detached.append_child(&comment).unwrap();
	let before = comment.outer_html();
	let mut editor = ReviewEditor::new(detached.clone());

	assert!(matches!(editor.toggle("108"), Err(EditToggleError::Dom(_))));
	assert_eq!(detached.document_element().unwrap().outer_html(), before);
	assert_eq!(detached.get_element_by_id("review-rating-108").unwrap().tag_name(), "SPAN");
	assert_eq!(editor.session_count(), 0);
}
