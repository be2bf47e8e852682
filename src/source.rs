use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SourceSettings;
use crate::error::{CarteraError, Result};
use crate::report::Row;

/// Load report rows from a file path or an `http(s)://` URL. The payload is
/// either a bare JSON array of row objects or wrapped as `{ "data": [...] }`.
pub fn load_rows(source: &str, settings: &SourceSettings) -> Result<Vec<Row>> {
    let payload = if source.starts_with("http://") || source.starts_with("https://") {
        fetch(source, settings.timeout_secs)?
    } else {
        let path = PathBuf::from(source);
        if !path.exists() {
            return Err(CarteraError::SourceNotFound(path));
        }
        fs::read_to_string(&path)?
    };

    decode_rows(&payload, source)
}

fn fetch(url: &str, timeout_secs: u64) -> Result<String> {
    use ureq::Agent;

    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build()
        .into();

    agent
        .get(url)
        .call()
        .map_err(|e| CarteraError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .body_mut()
        .read_to_string()
        .map_err(|e| CarteraError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

/// Decode a JSON payload into rows. `source_name` only feeds error messages.
pub fn decode_rows(payload: &str, source_name: &str) -> Result<Vec<Row>> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| CarteraError::PayloadParse {
            source_name: source_name.to_string(),
            source: e,
        })?;

    let items = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => match map.get("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err(CarteraError::BadPayload(source_name.to_string())),
        },
        _ => return Err(CarteraError::BadPayload(source_name.to_string())),
    };

    items
        .iter()
        .map(|item| match item {
            serde_json::Value::Object(map) => Ok(Row::from_json_object(map)),
            _ => Err(CarteraError::BadPayload(source_name.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bare_arrays_and_data_envelopes() {
        let bare = r#"[{"ter_nit":"900","sal_can":100}]"#;
        let wrapped = r#"{"data":[{"ter_nit":"900","sal_can":100}]}"#;

        for payload in [bare, wrapped] {
            let rows = decode_rows(payload, "test").unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].text("ter_nit"), "900");
            assert_eq!(rows[0].number("sal_can"), 100.0);
        }
    }

    #[test]
    fn row_key_order_follows_the_payload() {
        let rows = decode_rows(r#"[{"z":"1","a":"2","m":"3"}]"#, "test").unwrap();
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(matches!(
            decode_rows(r#"{"rows":[]}"#, "test"),
            Err(CarteraError::BadPayload(_))
        ));
        assert!(matches!(
            decode_rows("42", "test"),
            Err(CarteraError::BadPayload(_))
        ));
        assert!(matches!(
            decode_rows(r#"[1,2,3]"#, "test"),
            Err(CarteraError::BadPayload(_))
        ));
        assert!(matches!(
            decode_rows("not json", "test"),
            Err(CarteraError::PayloadParse { .. })
        ));
    }
}
