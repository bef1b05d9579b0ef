#![doc(html_root_url = "https://docs.rs/cinereview-dom/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod config;
pub mod edit_toggle;
pub mod page;
pub mod search;
pub mod search_suggest;
pub mod title_case;

pub use page::{install_review_page, toggle_edit_review, toggle_search_list};
