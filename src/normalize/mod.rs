//! Deterministic post-text normalization
//!
//! Model output arrives with markdown artifacts and unbounded emoji use.
//! This module turns raw completions into stable, comparable post text:
//! markdown stripped, emoji count capped. Every function here is pure and
//! total over strings, and the whole pipeline is idempotent.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of pictographic symbols kept in a post
pub const MAX_EMOJI_COUNT: usize = 3;

// Pre-compiled regex patterns for performance
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

static HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());

static BLOCKQUOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^>\s?").unwrap());

static LIST_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:[-*+]|\d+\.)\s+").unwrap());

static INLINE_MARKUP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[`*_~]").unwrap());

static TRAILING_WS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());

static EMOJI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Extended_Pictographic}").unwrap());

static HASHTAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// Normalize raw model output into post content
///
/// Fixed order: markdown stripping first, then the emoji cap. Dropping an
/// over-cap emoji at the end of a line can expose trailing whitespace, so
/// the whitespace strip runs once more after the cap; the whole pipeline is
/// idempotent. Hashtag extraction and character counts are derived from the
/// result afterward, never from the raw text.
///
/// # Examples
///
/// ```
/// use remixer::normalize::normalize_post_content;
///
/// let raw = "## Launch\n**We** [shipped](https://example.com) it";
/// assert_eq!(normalize_post_content(raw), "Launch\nWe shipped it");
/// ```
pub fn normalize_post_content(raw: &str) -> String {
    let stripped = strip_markdown(raw);
    let capped = limit_emojis(&stripped, MAX_EMOJI_COUNT);
    let cleaned = TRAILING_WS_REGEX.replace_all(&capped, "");
    cleaned.trim().to_string()
}

/// Strip markdown artifacts from generated text
///
/// Applied per rule, in order:
/// 1. `[text](url)` links become bare `text`
/// 2. Leading heading markers (`#`–`######` + space) at line start
/// 3. Leading blockquote markers (`>` with optional space) at line start
/// 4. Leading list markers (`-`, `*`, `+`, or `N.` + space) at line start
/// 5. Literal backtick, asterisk, underscore, tilde anywhere
/// 6. Trailing whitespace per line, then overall trim
///
/// # Examples
///
/// ```
/// use remixer::normalize::strip_markdown;
///
/// assert_eq!(strip_markdown("- item one"), "item one");
/// assert_eq!(strip_markdown("> quoted"), "quoted");
/// assert_eq!(strip_markdown("some `code` here"), "some code here");
/// ```
pub fn strip_markdown(text: &str) -> String {
    let mut result = LINK_REGEX.replace_all(text, "$1").to_string();
    result = HEADING_REGEX.replace_all(&result, "").to_string();
    result = BLOCKQUOTE_REGEX.replace_all(&result, "").to_string();
    result = LIST_MARKER_REGEX.replace_all(&result, "").to_string();
    result = INLINE_MARKUP_REGEX.replace_all(&result, "").to_string();
    result = TRAILING_WS_REGEX.replace_all(&result, "").to_string();
    result.trim().to_string()
}

/// Cap the number of pictographic symbols, preserving order
///
/// The first `max_count` emoji occurrences are kept verbatim; every
/// occurrence beyond that is removed. Non-emoji text is untouched.
///
/// # Examples
///
/// ```
/// use remixer::normalize::limit_emojis;
///
/// assert_eq!(limit_emojis("a🎉b🎉c🎉d🎉", 3), "a🎉b🎉c🎉d");
/// assert_eq!(limit_emojis("no emoji", 3), "no emoji");
/// ```
pub fn limit_emojis(text: &str, max_count: usize) -> String {
    if EMOJI_REGEX.find_iter(text).count() <= max_count {
        return text.to_string();
    }

    let mut remaining = max_count;
    EMOJI_REGEX
        .replace_all(text, |caps: &regex::Captures<'_>| {
            if remaining > 0 {
                remaining -= 1;
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .to_string()
}

/// Extract inline hashtag tokens (`#` followed by word characters)
///
/// # Examples
///
/// ```
/// use remixer::normalize::extract_hashtags;
///
/// let tags = extract_hashtags("Shipping day #rustlang #caching");
/// assert_eq!(tags, vec!["#rustlang", "#caching"]);
/// ```
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Check if text contains meaningful content
///
/// Returns false if text is empty or only whitespace
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
