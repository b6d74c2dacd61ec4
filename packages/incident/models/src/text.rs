//! Presentation casing for cause, detail, and city labels.
//!
//! PHMSA stores these fields in upper case. Labels are lower-cased first and
//! then re-capitalized, either per word or for the first letter only.

/// Capitalizes the first letter of every word and lower-cases the rest.
///
/// A word starts at any letter not preceded by another letter, so
/// `"CONTROL/RELIEF"` becomes `"Control/Relief"`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;

    for c in s.chars() {
        if prev_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_letter = c.is_alphabetic();
    }

    out
}

/// Capitalizes the first character and lower-cases everything else.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
