/// Lowercases `text`, then uppercases the first character of each whitespace-delimited run.
///
/// ```
/// use cinereview_dom::title_case::title_case;
///
/// assert_eq!(title_case("movie"), "Movie");
/// assert_eq!(title_case("the TV show"), "The Tv Show");
/// ```
#[must_use]
pub fn title_case(text: &str) -> String {
	let mut titled = String::with_capacity(text.len());
	let mut at_word_start = true;
	for c in text.chars().flat_map(char::to_lowercase) {
		if at_word_start {
			titled.extend(c.to_uppercase());
		} else {
			titled.push(c);
		}
		at_word_start = c.is_whitespace();
	}
	titled
}
