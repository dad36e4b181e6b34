//! Structural validation of parsed posts.

use whale_core::config::ParserConfig;
use whale_core::{Classification, JunkReason, MAX_RECORD_FIELDS, MIN_RECORD_FIELDS};

/// Position of the unit quantity.
const QUANTITY_FIELD: usize = 0;
/// Position of the USD amount.
const USD_AMOUNT_FIELD: usize = 2;

/// Classifies parsed posts as clean or junk.
#[derive(Debug, Clone, Copy)]
pub struct RecordValidator {
    min_fields: usize,
    max_fields: usize,
}

impl RecordValidator {
    /// Create a validator accepting `min_fields..=max_fields` fields.
    ///
    /// Bounds are narrowed to the record shape (6 or 7 fields), so a clean
    /// post can always be assembled.
    pub fn new(min_fields: usize, max_fields: usize) -> Self {
        Self {
            min_fields: min_fields.max(MIN_RECORD_FIELDS),
            max_fields: max_fields.min(MAX_RECORD_FIELDS),
        }
    }

    /// Create a validator from parser configuration.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.min_fields, config.max_fields)
    }

    /// Classify one parsed post.
    ///
    /// Rules are checked in order and the first failure is reported:
    /// numeric quantity, numeric USD amount, then field count.
    pub fn classify<S: AsRef<str>>(&self, fields: &[S]) -> Classification {
        if !is_integer_field(fields, QUANTITY_FIELD) {
            return Classification::Junk(JunkReason::NonNumericQuantity);
        }
        if !is_integer_field(fields, USD_AMOUNT_FIELD) {
            return Classification::Junk(JunkReason::NonNumericUsdAmount);
        }
        if !(self.min_fields..=self.max_fields).contains(&fields.len()) {
            return Classification::Junk(JunkReason::FieldCount(fields.len()));
        }
        Classification::Clean
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

/// A field is an integer when it is a non-empty run of decimal digits.
///
/// Tokens never carry signs (the tokenizer strips them), and the value
/// may exceed any fixed-width integer, so digits are checked directly.
fn is_integer_field<S: AsRef<str>>(fields: &[S], idx: usize) -> bool {
    fields.get(idx).map_or(false, |f| is_integer(f.as_ref()))
}

/// Does `s` read as a plain decimal integer?
///
/// ASCII digits only: `1_000` and non-ASCII decimal digits such as `١٢`
/// are not integers here, unlike a lenient numeric parse.
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
