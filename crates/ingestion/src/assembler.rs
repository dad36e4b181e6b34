//! Mapping of clean parsed fields onto named record columns.

use whale_core::{
    Error, JunkEntry, ParsedFields, Result, Timestamp, TransactionRecord, MAX_RECORD_FIELDS,
    MIN_RECORD_FIELDS,
};

use crate::partitioner::Rejected;

/// Build a transaction record from clean fields.
///
/// Expects `[units, asset, usd, currency, action, from]` with an optional
/// trailing `to`.
pub fn assemble_record(fields: ParsedFields, timestamp: Timestamp) -> Result<TransactionRecord> {
    let len = fields.len();
    if !(MIN_RECORD_FIELDS..=MAX_RECORD_FIELDS).contains(&len) {
        return Err(Error::data(format!(
            "cannot assemble a record from {len} fields"
        )));
    }

    let mut it = fields.into_iter();
    let mut next = || it.next().unwrap_or_default();

    Ok(TransactionRecord {
        timestamp,
        amount_units: next(),
        asset: next(),
        amount_usd: next(),
        currency: next(),
        action: next(),
        from: next(),
        to: (len == MAX_RECORD_FIELDS).then(next),
    })
}

/// Attach a timestamp to a rejected post.
pub fn assemble_junk(rejected: Rejected, timestamp: Timestamp) -> JunkEntry {
    JunkEntry {
        timestamp,
        text: rejected.text,
        reason: rejected.reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use whale_core::JunkReason;

    fn fields(items: &[&str]) -> ParsedFields {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ts() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_seven_fields() {
        let record = assemble_record(
            fields(&["1000", "BTC", "27000000", "USD", "transferred", "unknown wallet", "Binance"]),
            ts(),
        )
        .unwrap();

        assert_eq!(record.timestamp, ts());
        assert_eq!(record.amount_units, "1000");
        assert_eq!(record.asset, "BTC");
        assert_eq!(record.amount_usd, "27000000");
        assert_eq!(record.currency, "USD");
        assert_eq!(record.action, "transferred");
        assert_eq!(record.from, "unknown wallet");
        assert_eq!(record.to.as_deref(), Some("Binance"));
    }

    #[test]
    fn test_six_fields_has_no_recipient() {
        let record = assemble_record(
            fields(&["40000000", "USDC", "40000000", "USD", "burned", "USDC Treasury"]),
            ts(),
        )
        .unwrap();

        assert_eq!(record.from, "USDC Treasury");
        assert_eq!(record.to, None);
    }

    #[test]
    fn test_wrong_length_is_error() {
        assert!(assemble_record(fields(&["1", "BTC", "2"]), ts()).is_err());
        assert!(assemble_record(fields(&["1"; 8]), ts()).is_err());
    }

    #[test]
    fn test_assemble_junk() {
        let entry = assemble_junk(
            Rejected {
                text: "no numbers".to_string(),
                reason: JunkReason::NonNumericQuantity,
            },
            ts(),
        );
        assert_eq!(entry.timestamp, ts());
        assert_eq!(entry.text, "no numbers");
    }
}
