//! Upstream lookup payload, decoded once at the client boundary.
//!
//! The upstream API is duck-typed: a response body may be a JSON list of
//! records, a single JSON object, a "No records found" sentinel, or plain
//! text. The shape is sniffed exactly once, here, into a tagged variant so
//! nothing downstream re-inspects raw bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The sentinel the upstream API uses for an empty result.
const NO_RECORDS_SENTINEL: &str = "No records found";

/// Decoded upstream response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupPayload {
    /// Explicit empty result. The query completed; the debit stands.
    NoRecords,
    /// A single record object.
    SingleRecord(Value),
    /// A list of record objects.
    RecordList(Vec<Value>),
    /// Non-JSON body returned verbatim.
    RawText(String),
}

impl LookupPayload {
    /// Decodes a raw response body into its tagged variant.
    pub fn decode(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.eq_ignore_ascii_case(NO_RECORDS_SENTINEL) {
            return LookupPayload::NoRecords;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => {
                if items.is_empty() {
                    LookupPayload::NoRecords
                } else {
                    LookupPayload::RecordList(items)
                }
            }
            Ok(Value::Object(map)) => {
                let is_sentinel = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(|m| m.eq_ignore_ascii_case(NO_RECORDS_SENTINEL))
                    .unwrap_or(false);
                if is_sentinel {
                    LookupPayload::NoRecords
                } else {
                    LookupPayload::SingleRecord(Value::Object(map))
                }
            }
            Ok(Value::String(s)) if s.trim().eq_ignore_ascii_case(NO_RECORDS_SENTINEL) => {
                LookupPayload::NoRecords
            }
            Ok(other) => LookupPayload::SingleRecord(other),
            Err(_) => LookupPayload::RawText(trimmed.to_string()),
        }
    }

    /// True when the upstream reported an empty result.
    pub fn is_empty(&self) -> bool {
        matches!(self, LookupPayload::NoRecords)
    }

    /// Number of records carried by this payload.
    pub fn record_count(&self) -> usize {
        match self {
            LookupPayload::NoRecords => 0,
            LookupPayload::SingleRecord(_) | LookupPayload::RawText(_) => 1,
            LookupPayload::RecordList(items) => items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_bare_sentinel_as_no_records() {
        assert_eq!(LookupPayload::decode("No records found"), LookupPayload::NoRecords);
        assert_eq!(LookupPayload::decode("  no records found  "), LookupPayload::NoRecords);
    }

    #[test]
    fn decodes_sentinel_object_as_no_records() {
        let body = r#"{"message": "No records found"}"#;
        assert_eq!(LookupPayload::decode(body), LookupPayload::NoRecords);
    }

    #[test]
    fn decodes_empty_array_as_no_records() {
        assert_eq!(LookupPayload::decode("[]"), LookupPayload::NoRecords);
    }

    #[test]
    fn decodes_array_as_record_list() {
        let body = r#"[{"name": "A"}, {"name": "B"}]"#;
        match LookupPayload::decode(body) {
            LookupPayload::RecordList(items) => assert_eq!(items.len(), 2),
            other => panic!("expected record list, got {:?}", other),
        }
    }

    #[test]
    fn decodes_object_as_single_record() {
        let body = r#"{"name": "A", "address": "B"}"#;
        assert_eq!(
            LookupPayload::decode(body),
            LookupPayload::SingleRecord(json!({"name": "A", "address": "B"}))
        );
    }

    #[test]
    fn decodes_non_json_as_raw_text() {
        assert_eq!(
            LookupPayload::decode("upstream said something odd"),
            LookupPayload::RawText("upstream said something odd".to_string())
        );
    }

    #[test]
    fn record_counts_match_shapes() {
        assert_eq!(LookupPayload::NoRecords.record_count(), 0);
        assert_eq!(LookupPayload::decode(r#"[{"a":1},{"a":2},{"a":3}]"#).record_count(), 3);
        assert_eq!(LookupPayload::decode(r#"{"a":1}"#).record_count(), 1);
    }
}
