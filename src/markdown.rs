//! Converts post text from markdown to HTML for the post page, and escapes
//! plain text before it's handed to templates.

use pulldown_cmark::{escape, html, Event, Options, Parser, Tag};

/// Converts markdown to HTML, appending the result to `out`.
///
/// Headings in the post body are demoted one level so they stay subordinate
/// to the post title (h1): `#` becomes h2, `##` becomes h3, and so on.
pub fn to_html(out: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    html::push_html(out, Parser::new_ext(markdown, options).map(demote_heading));
}

fn demote_heading(ev: Event) -> Event {
    match ev {
        Event::Start(Tag::Heading(level)) => Event::Start(Tag::Heading((level + 1).min(6))),
        Event::End(Tag::Heading(level)) => Event::End(Tag::Heading((level + 1).min(6))),
        _ => ev,
    }
}

/// Escapes `text` so it can be inserted verbatim into HTML markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape::escape_html(&mut out, text).expect("writing to a String");
    out
}
