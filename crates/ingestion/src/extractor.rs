//! Marker-based field extraction.
//!
//! Announcements name their entities after literal marker words
//! ("from Coinbase to unknown wallet", "burned at Tether Treasury").
//! Each [`MarkerRule`] collapses the multi-word span behind its markers
//! into a single field so that fields line up positionally.

use whale_core::{ParsedFields, TokenSequence};

/// A single collapsing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRule {
    /// `open A.. close B..` becomes `"A.."`, `"B.."`.
    ///
    /// Applies only when both markers are present.
    Span {
        /// Marker opening the first span (e.g. "from").
        open: &'static str,
        /// Marker opening the second span (e.g. "to").
        close: &'static str,
    },
    /// `marker A..` becomes `"A.."`.
    Tail {
        /// Marker opening the span (e.g. "at").
        marker: &'static str,
    },
}

impl MarkerRule {
    /// Apply the rule, using the first occurrence of each marker.
    ///
    /// Returns the input unchanged when the markers are absent.
    pub fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        match *self {
            MarkerRule::Span { open, close } => {
                let (Some(open_idx), Some(close_idx)) =
                    (find_first(&tokens, open), find_first(&tokens, close))
                else {
                    return tokens;
                };
                // An inverted pair yields an empty first span.
                let first = join_range(&tokens, open_idx + 1, close_idx);
                let second = join_range(&tokens, close_idx + 1, tokens.len());

                let mut fields: Vec<String> = tokens.into_iter().take(open_idx).collect();
                fields.push(first);
                fields.push(second);
                fields
            }
            MarkerRule::Tail { marker } => {
                let Some(idx) = find_first(&tokens, marker) else {
                    return tokens;
                };
                let tail = join_range(&tokens, idx + 1, tokens.len());

                let mut fields: Vec<String> = tokens.into_iter().take(idx).collect();
                fields.push(tail);
                fields
            }
        }
    }
}

fn find_first(tokens: &[String], marker: &str) -> Option<usize> {
    tokens.iter().position(|t| t == marker)
}

fn join_range(tokens: &[String], start: usize, end: usize) -> String {
    tokens
        .get(start..end)
        .map(|span| span.join(" "))
        .unwrap_or_default()
}

/// Ordered list of marker rules.
#[derive(Debug, Clone)]
pub struct MarkerExtractor {
    rules: Vec<MarkerRule>,
}

impl MarkerExtractor {
    /// Create an extractor applying `rules` in order.
    pub fn new(rules: Vec<MarkerRule>) -> Self {
        Self { rules }
    }

    /// The configured rules.
    pub fn rules(&self) -> &[MarkerRule] {
        &self.rules
    }

    /// Collapse marker spans of a token sequence into fields.
    pub fn extract(&self, tokens: &TokenSequence) -> ParsedFields {
        self.rules
            .iter()
            .fold(tokens.clone(), |fields, rule| rule.apply(fields))
    }
}

impl Default for MarkerExtractor {
    /// "from"/"to" first, then "at".
    fn default() -> Self {
        Self::new(vec![
            MarkerRule::Span {
                open: "from",
                close: "to",
            },
            MarkerRule::Tail { marker: "at" },
        ])
    }
}
