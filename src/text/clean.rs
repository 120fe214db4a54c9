use scraper::Html;

/// Strips all markup and returns the visible text
///
/// Comment bodies arrive as HTML fragments (links, emoticon images, line
/// breaks). Only text nodes survive; entities are decoded. Cleaning text that
/// carries no markup returns it unchanged.
///
/// # Example
///
/// ```
/// use weibo_comments::text::clean_html;
///
/// assert_eq!(clean_html("<p>Hello<br/>World</p>"), "HelloWorld");
/// assert_eq!(clean_html("plain words"), "plain words");
/// ```
pub fn clean_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect()
}

/// Removes zero-width spaces the search page sprinkles through post bodies
pub fn strip_zero_width(text: &str) -> String {
    text.replace('\u{200b}', "")
}
