//! Success envelope for handler responses.
//!
//! The project-wide wire contract: failures are
//! `{ "error": ..., "code": ... }` (see the domain error type), successes
//! are `{ "data": ... }`. Handlers wrap their payloads here so no endpoint
//! invents its own shape.

use serde::Serialize;

/// Success wrapper producing the `{ "data": ... }` wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataEnvelope<T> {
    /// The handler's payload.
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// Wrap a payload.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_nests_payload_under_data() {
        let value = serde_json::to_value(DataEnvelope::new(json!({ "id": 1 }))).expect("json");
        assert_eq!(value, json!({ "data": { "id": 1 } }));
    }
}
