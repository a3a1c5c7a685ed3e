//! Story notes to HTML.
//!
//! # Invariants
//! - User text is escaped before any markup is introduced.
//! - The only markup emitted is `<br>` and `<a href="...">`.
//! - Link text is the escaped match; scheme-less links get an `http://`
//!   prefix in `href` only.

use crate::render::escape_html;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

// Runs over the raw notes; matched and unmatched pieces are escaped separately
// so a link never ends inside an entity.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:[a-z][a-z0-9+.\-]*://[^\s<>"]*[^\s<>".,;:!?)\]']|(?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?\.)+[a-z]{2,63}(?::[0-9]{1,5})?\b(?:[/?#](?:[^\s<>"]*[^\s<>".,;:!?)\]'])?)?)"#,
    )
    .expect("valid url regex")
});

/// Renders notes as HTML: escape, newline to `<br>`, wrap URLs in links.
pub fn notes_html(notes: &str) -> String {
    let mut html = String::with_capacity(notes.len());
    let mut last = 0;
    for found in URL_RE.find_iter(notes) {
        push_text(&mut html, &notes[last..found.start()]);
        let text = escape_html(found.as_str());
        let scheme = if found.as_str().contains("://") { "" } else { "http://" };
        let _ = write!(html, r#"<a href="{scheme}{text}">{text}</a>"#);
        last = found.end();
    }
    push_text(&mut html, &notes[last..]);
    html
}

fn push_text(html: &mut String, text: &str) {
    let escaped = escape_html(text);
    html.push_str(&escaped.replace("\r\n", "\n").replace('\n', "<br>"));
}
