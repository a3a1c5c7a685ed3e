//! Slug generation for episode titles.
//!
//! # Invariants
//! - Output length in chars equals the lowercased title's length in chars.
//! - Every char is a letter (`L*`), a number (`N*`) or `-`.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Derives a URL-safe slug from an episode title.
///
/// Lowercases the title, keeps letters and numbers, maps everything else to
/// `-`. Runs of dashes are not collapsed and nothing is trimmed.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|ch| if is_letter_or_number(ch) { ch } else { '-' })
        .collect()
}

// General Category, not the wider Alphabetic property: combining vowel signs
// and enclosed letters like Ⓐ are marks or symbols here.
fn is_letter_or_number(ch: char) -> bool {
    use GeneralCategory::*;
    matches!(
        get_general_category(ch),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | DecimalNumber
            | LetterNumber
            | OtherNumber
    )
}
