// src/process/sanitize.rs

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\S\n]+").expect("whitespace regex should compile"));
static SPACE_AROUND_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?\n ?").expect("newline regex should compile"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Keep `\n` inside values instead of folding it into a space.
    pub keep_newlines: bool,
}

/// Make a text value safe for a one-row-per-line CSV: fold line breaks to
/// spaces, strip control and format characters, NFC-normalize, collapse
/// whitespace runs and trim. `None` stays `None`.
pub fn sanitize(value: Option<&str>, opts: SanitizeOptions) -> Option<String> {
    value.map(|v| clean_text(v, opts))
}

pub fn clean_text(raw: &str, opts: SanitizeOptions) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' if opts.keep_newlines => out.push('\n'),
            '\r' | '\n' | '\u{2028}' | '\u{2029}' => out.push(' '),
            c if c.is_whitespace() => out.push(' '),
            c if is_invisible(c) => {}
            c => out.push(c),
        }
    }

    // after stripping, so removed characters can't block composition
    let composed: String = out.nfc().collect();
    let collapsed = HORIZONTAL_WS.replace_all(&composed, " ");
    if opts.keep_newlines {
        SPACE_AROUND_NEWLINE
            .replace_all(&collapsed, "\n")
            .trim()
            .to_string()
    } else {
        collapsed.trim().to_string()
    }
}

// Control characters plus the zero-width/format characters that render as nothing.
fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{00AD}'
                | '\u{200B}'..='\u{200F}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2060}'..='\u{2064}'
                | '\u{2066}'..='\u{2069}'
                | '\u{FEFF}'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLD: SanitizeOptions = SanitizeOptions {
        keep_newlines: false,
    };
    const KEEP: SanitizeOptions = SanitizeOptions {
        keep_newlines: true,
    };

    #[test]
    fn absent_passes_through() {
        assert_eq!(sanitize(None, FOLD), None);
    }

    #[test]
    fn folds_line_breaks_and_collapses() {
        assert_eq!(
            sanitize(Some("  Jan\r\nvan\u{2028}der \t\t Heyden\u{2029} "), FOLD).as_deref(),
            Some("Jan van der Heyden")
        );
    }

    #[test]
    fn strips_control_and_format_characters() {
        assert_eq!(clean_text("a\u{0000}b\u{0007}c\u{200B}d\u{FEFF}", FOLD), "abcd");
        assert_eq!(clean_text("\u{001B}[31mred", FOLD), "[31mred");
    }

    #[test]
    fn non_breaking_space_becomes_plain_space() {
        assert_eq!(clean_text("Den\u{00A0}Haag", FOLD), "Den Haag");
    }

    #[test]
    fn normalizes_to_composed_form() {
        // "e" + combining acute → "é"
        let decomposed = "Cafe\u{0301}";
        let cleaned = clean_text(decomposed, FOLD);
        assert_eq!(cleaned, "Caf\u{00E9}");
        assert_eq!(cleaned.chars().count(), 4);
    }

    #[test]
    fn composes_across_stripped_characters() {
        assert_eq!(clean_text("e\u{200B}\u{0301}", FOLD), "\u{00E9}");
        assert_eq!(clean_text("Cafe\u{0007}\u{0301}", FOLD), "Caf\u{00E9}");
    }

    #[test]
    fn keeps_newlines_when_asked() {
        assert_eq!(clean_text(" regel een \r\n  regel twee \n", KEEP), "regel een\nregel twee");
        assert_eq!(clean_text("a\r\nb", FOLD), "a b");
    }

    #[test]
    fn quotes_and_commas_survive() {
        assert_eq!(clean_text(r#"  "Schilder, etser"  "#, FOLD), r#""Schilder, etser""#);
    }

    #[test]
    fn idempotent() {
        let once = clean_text(" x \u{2028}\t y\u{0301} ", FOLD);
        assert_eq!(clean_text(&once, FOLD), once);
    }
}
