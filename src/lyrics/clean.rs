use regex::Regex;
use std::sync::OnceLock;

/// Lazy-initialized regex patterns for lyric and query cleaning
static BRACKET_LINE_REGEX: OnceLock<Regex> = OnceLock::new();
static PAREN_LINE_REGEX: OnceLock<Regex> = OnceLock::new();
static BRACKET_SPAN_REGEX: OnceLock<Regex> = OnceLock::new();
static PAREN_SPAN_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static PUNCTUATION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Bracketed annotation filling whole lines, including the newline before it.
/// The body may span several lines (`[re\nmove]`).
fn get_bracket_line_regex() -> &'static Regex {
    BRACKET_LINE_REGEX.get_or_init(|| Regex::new(r"\n[ \t\r]*\[[^\]]*\][ \t\r]*\n").unwrap())
}

fn get_paren_line_regex() -> &'static Regex {
    PAREN_LINE_REGEX.get_or_init(|| Regex::new(r"\n[ \t\r]*\([^)]*\)[ \t\r]*\n").unwrap())
}

fn get_bracket_span_regex() -> &'static Regex {
    BRACKET_SPAN_REGEX.get_or_init(|| Regex::new(r"\[[^\]]*\]").unwrap())
}

fn get_paren_span_regex() -> &'static Regex {
    PAREN_SPAN_REGEX.get_or_init(|| Regex::new(r"\([^)]*\)").unwrap())
}

fn get_whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn get_punctuation_regex() -> &'static Regex {
    PUNCTUATION_REGEX.get_or_init(|| Regex::new(r"[^\w\s]|_").unwrap())
}

/// Remove bracketed annotations (`[Chorus]`) and parenthetical asides from raw lyrics.
///
/// Annotations that fill whole lines disappear together with their line, so they
/// never leave a blank line behind. Annotations inside a line are cut out and the
/// rest of the line is kept. The result is trimmed as a whole, not per line.
///
/// Cleaning is idempotent: cleaning already-clean text returns it unchanged.
pub fn clean(raw: &str) -> String {
    let mut current = clean_pass(raw);

    // A pass can expose new removable spans (e.g. nested brackets), so run to a fixpoint.
    // Every pass that changes the text makes it shorter, so this terminates.
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(raw: &str) -> String {
    // Pad so the first and last lines look like every other line
    let mut result = format!("\n{}\n", raw);

    // Whole-line annotations
    result = remove_whole_lines(result, get_bracket_line_regex());
    result = remove_whole_lines(result, get_paren_line_regex());

    // Annotations sharing a line with lyrics
    result = get_bracket_span_regex().replace_all(&result, "").into_owned();
    result = get_paren_span_regex().replace_all(&result, "").into_owned();

    result.trim().to_string()
}

/// Replace whole-line matches with the single newline they sat between.
/// Matches consume both surrounding newlines, so adjacent annotation lines
/// need more than one sweep.
fn remove_whole_lines(mut text: String, pattern: &Regex) -> String {
    while pattern.is_match(&text) {
        text = pattern.replace_all(&text, "\n").into_owned();
    }
    text
}

/// Normalize a title or artist for use as a lookup key.
///
/// Lower-cases, drops apostrophes, turns other punctuation into spaces and
/// collapses runs of whitespace, so `"Don't Stop Me-Now!"` and
/// `"dont stop me now"` share a key.
pub fn normalize_query(input: &str) -> String {
    let mut result = input.replace(['\'', '\u{2019}'], "");

    // Replace punctuation with spaces
    result = get_punctuation_regex()
        .replace_all(&result, " ")
        .to_string();

    // Normalize whitespace
    result = get_whitespace_regex().replace_all(&result, " ").to_string();

    // Trim and convert to lowercase
    result.trim().to_lowercase()
}
