use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that are unsafe in file names on at least one common filesystem.
static UNSAFE_FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("unsafe filename regex is valid"));

/// Removes filesystem-unsafe characters from a display string.
///
/// Every character of `\ / * ? : " < > |` is dropped; nothing else changes
/// (no length capping, no Unicode normalization).
///
/// # Example
///
/// ```
/// use lyrics_seeker::core::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("AC/DC - T.N.T?"), "ACDC - T.N.T");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_RE.replace_all(name, "").into_owned()
}

/// Splits text into consecutive pieces of at most `max_chars` characters.
///
/// Splitting counts `char`s, so multi-byte text is never cut inside a code
/// point. Concatenating the pieces yields the input unchanged. Empty input
/// yields no pieces.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for c in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(c);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Truncates to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
