//! Post text normalization.
//!
//! Strips everything that is neither a word character nor whitespace,
//! drops trailing link remnants and splits the rest into tokens.

use regex::Regex;
use std::sync::LazyLock;
use whale_core::TokenSequence;

/// Anything that is neither a word character nor whitespace.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("literal pattern"));

/// A link appended after a blank line, once punctuation is gone.
static LINK_REMNANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\nhttp\S+").expect("literal pattern"));

/// Split a post into word tokens.
///
/// Never fails and never yields empty tokens; a post made only of
/// symbols produces an empty sequence.
pub fn tokenize(text: &str) -> TokenSequence {
    let words = NON_WORD.replace_all(text, "");
    LINK_REMNANT
        .replace_all(&words, "")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
