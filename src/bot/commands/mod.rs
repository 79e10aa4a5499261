//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Browsing commands: categories, companies, cars, search
pub mod catalog;

/// General utility commands
pub mod general;

/// Rating and booking commands
pub mod rental;

// Export commands
pub use catalog::*;
pub use general::*;
pub use rental::*;

/// Discord rejects messages longer than this.
pub(crate) const MAX_MESSAGE_LEN: usize = 2000;

/// Cuts `text` to fit in one Discord message.
pub(crate) fn fit_message(mut text: String) -> String {
    const ELLIPSIS: &str = "\n…";
    if text.chars().count() <= MAX_MESSAGE_LEN {
        return text;
    }
    let keep = MAX_MESSAGE_LEN - ELLIPSIS.chars().count();
    let cut = text
        .char_indices()
        .nth(keep)
        .map_or(text.len(), |(idx, _)| idx);
    text.truncate(cut);
    text.push_str(ELLIPSIS);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_message_keeps_short_text() {
        assert_eq!(fit_message("hello".to_string()), "hello");
    }

    #[test]
    fn test_fit_message_truncates_long_text() {
        let long = "é".repeat(MAX_MESSAGE_LEN + 50);
        let fitted = fit_message(long);
        assert_eq!(fitted.chars().count(), MAX_MESSAGE_LEN);
        assert!(fitted.ends_with('…'));
    }
}
