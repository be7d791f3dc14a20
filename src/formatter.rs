use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_BREAK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[.!?]\s+").ok());

/// Split a reply into sentences and separate them with blank lines.
///
/// A sentence ends after `.`, `!` or `?` when followed by whitespace. The
/// whole whitespace run is dropped at the break.
pub fn format_message(raw: &str) -> String {
    split_sentences(raw.trim())
        .into_iter()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn split_sentences(text: &str) -> Vec<&str> {
    let Some(breaks) = SENTENCE_BREAK.as_ref() else {
        return vec![text];
    };

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in breaks.find_iter(text) {
        // Terminators are ASCII, so the sentence ends one byte into the match.
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_each_terminator() {
        assert_eq!(format_message("A. B! C?"), "A.\n\nB!\n\nC?");
    }

    #[test]
    fn test_single_sentence_unchanged() {
        assert_eq!(format_message("Be still."), "Be still.");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(
            format_message("\n  Be still.   Know peace.  \n"),
            "Be still.\n\nKnow peace."
        );
    }

    #[test]
    fn test_terminator_without_whitespace_does_not_split() {
        assert_eq!(format_message("Version 2.0 is here. Rejoice"), "Version 2.0 is here.\n\nRejoice");
        assert_eq!(format_message("Wait...what? Yes."), "Wait...what?\n\nYes.");
    }

    #[test]
    fn test_newline_counts_as_whitespace() {
        assert_eq!(format_message("Love.\nHope!\r\n\tFaith"), "Love.\n\nHope!\n\nFaith");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_message(""), "");
        assert_eq!(format_message("   "), "");
    }

    #[test]
    fn test_unicode_whitespace_breaks() {
        assert_eq!(format_message("Rest.\u{a0}Rise!\u{2003}Go"), "Rest.\n\nRise!\n\nGo");
    }

    #[test]
    fn test_sentence_break_pattern_compiles() {
        assert!(SENTENCE_BREAK.is_some());
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(format_message("Grâce soit. Paix ✝! Amen"), "Grâce soit.\n\nPaix ✝!\n\nAmen");
    }
}
