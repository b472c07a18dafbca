//! Parse completion text into an inventory record

use crate::error::CaptureError;
use serde_json::Value;
use stocktake_domain::record::{CATEGORY, ITEM_NAME, LOCATION, QUANTITY};
use stocktake_domain::InventoryRecord;
use tracing::debug;

/// Remove Markdown code-fence delimiters and surrounding whitespace
///
/// Text without fences only loses its surrounding whitespace.
pub fn strip_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse completion text into a record
///
/// Fences are stripped first. If the remainder is not JSON, the outermost
/// `{...}` span is tried, which covers completions that wrap the object in
/// a sentence.
pub fn parse_completion(completion: &str) -> Result<InventoryRecord, CaptureError> {
    let malformed = |reason: String| CaptureError::MalformedExtraction {
        reason,
        completion: completion.to_string(),
    };

    let json_str = strip_fences(completion);
    if json_str.is_empty() {
        return Err(malformed("completion is empty".to_string()));
    }

    let value: Value = match serde_json::from_str(&json_str) {
        Ok(value) => value,
        Err(first_error) => {
            let embedded = outermost_object(&json_str)
                .filter(|span| span.len() < json_str.len())
                .ok_or_else(|| malformed(format!("not valid JSON: {}", first_error)))?;
            debug!("Completion is not bare JSON, retrying with embedded object");
            serde_json::from_str(embedded)
                .map_err(|_| malformed(format!("not valid JSON: {}", first_error)))?
        }
    };

    record_from_value(value).map_err(malformed)
}

/// Build a record from parsed JSON, naming the field that is wrong
fn record_from_value(value: Value) -> Result<InventoryRecord, String> {
    let object = match value {
        Value::Object(map) => map,
        // A lone object wrapped in an array
        Value::Array(mut items) if items.len() == 1 => match items.pop() {
            Some(Value::Object(map)) => map,
            Some(other) => return Err(format!("expected a JSON object, got {}", kind(&other))),
            None => return Err("expected a JSON object".to_string()),
        },
        other => return Err(format!("expected a JSON object, got {}", kind(&other))),
    };

    let text = |names: &[&'static str]| -> Result<String, String> {
        let Some((name, value)) = names
            .iter()
            .find_map(|name| object.get(*name).map(|value| (*name, value)))
        else {
            return Ok(String::new());
        };
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            other => Err(format!("field '{}' must be a string, got {}", name, kind(other))),
        }
    };

    let item_name = text(&[ITEM_NAME, "item_name"])?;
    let category = text(&[CATEGORY])?;
    let location = text(&[LOCATION])?;

    let quantity = match object.get(QUANTITY) {
        Some(Value::Number(n)) => n.as_f64(),
        // Models often quote numbers
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Null) | None => return Err(format!("missing field '{}'", QUANTITY)),
        Some(_) => None,
    }
    .ok_or_else(|| "quantity is not numeric".to_string())?;

    InventoryRecord::new(item_name, category, quantity, location).map_err(|e| e.to_string())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Slice from the first `{` to the last `}`, if both exist in that order
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hammers() -> InventoryRecord {
        InventoryRecord::new("hammers", "tools", 5.0, "garage").unwrap()
    }

    const HAMMERS_JSON: &str =
        r#"{"itemName":"hammers","category":"tools","quantity":5,"location":"garage"}"#;

    #[test]
    fn test_strip_fences_json_block() {
        let fenced = format!("```json\n{}\n```", HAMMERS_JSON);
        assert_eq!(strip_fences(&fenced), HAMMERS_JSON);
    }

    #[test]
    fn test_strip_fences_bare_block() {
        let fenced = format!("```\n{}\n```\n", HAMMERS_JSON);
        assert_eq!(strip_fences(&fenced), HAMMERS_JSON);
    }

    #[test]
    fn test_strip_fences_plain_text_only_trims() {
        assert_eq!(strip_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_plain_json() {
        assert_eq!(parse_completion(HAMMERS_JSON).unwrap(), hammers());
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", HAMMERS_JSON);
        assert_eq!(parse_completion(&fenced).unwrap(), hammers());
    }

    #[test]
    fn test_parse_quoted_quantity() {
        let text = r#"{"itemName":"flour","category":"baking","quantity":" 2.5 ","location":"pantry"}"#;
        let record = parse_completion(text).unwrap();
        assert_eq!(record.quantity, 2.5);
    }

    #[test]
    fn test_parse_snake_case_item_name() {
        let text = r#"{"item_name":"hammers","category":"tools","quantity":5,"location":"garage"}"#;
        assert_eq!(parse_completion(text).unwrap(), hammers());
    }

    #[test]
    fn test_parse_object_inside_sentence() {
        let text = format!("Sure! Here is the data: {} Let me know.", HAMMERS_JSON);
        assert_eq!(parse_completion(&text).unwrap(), hammers());
    }

    #[test]
    fn test_parse_prose_is_malformed() {
        let result = parse_completion("I could not find any inventory in that sentence.");
        match result {
            Err(CaptureError::MalformedExtraction { reason, completion }) => {
                assert!(reason.contains("not valid JSON"));
                assert_eq!(completion, "I could not find any inventory in that sentence.");
            }
            other => panic!("Expected MalformedExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_is_malformed() {
        assert!(matches!(
            parse_completion(""),
            Err(CaptureError::MalformedExtraction { .. })
        ));
        assert!(matches!(
            parse_completion("```json\n```"),
            Err(CaptureError::MalformedExtraction { .. })
        ));
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        let text = r#"{"itemName":"hammers","category":"tools","quantity":5}"#;
        match parse_completion(text) {
            Err(CaptureError::MalformedExtraction { reason, .. }) => {
                assert!(reason.contains("location"), "{}", reason);
            }
            other => panic!("Expected MalformedExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_numeric_quantity_is_malformed() {
        let text = r#"{"itemName":"hammers","category":"tools","quantity":"a few","location":"garage"}"#;
        match parse_completion(text) {
            Err(CaptureError::MalformedExtraction { reason, .. }) => {
                assert_eq!(reason, "quantity is not numeric");
            }
            other => panic!("Expected MalformedExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_null_quantity_is_missing() {
        let text = r#"{"itemName":"hammers","category":"tools","quantity":null,"location":"garage"}"#;
        match parse_completion(text) {
            Err(CaptureError::MalformedExtraction { reason, .. }) => {
                assert!(reason.contains("quantity"));
            }
            other => panic!("Expected MalformedExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrong_field_type_names_field() {
        let text = r#"{"itemName":"hammers","category":3,"quantity":5,"location":"garage"}"#;
        match parse_completion(text) {
            Err(CaptureError::MalformedExtraction { reason, .. }) => {
                assert_eq!(reason, "field 'category' must be a string, got a number");
            }
            other => panic!("Expected MalformedExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_scalar_is_malformed() {
        match parse_completion("42") {
            Err(CaptureError::MalformedExtraction { reason, .. }) => {
                assert_eq!(reason, "expected a JSON object, got a number");
            }
            other => panic!("Expected MalformedExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_single_element_array() {
        let text = format!("[{}]", HAMMERS_JSON);
        assert_eq!(parse_completion(&text).unwrap(), hammers());
    }

    #[test]
    fn test_parse_two_element_array_is_malformed() {
        let text = format!("[{}, {}]", HAMMERS_JSON, HAMMERS_JSON);
        assert!(matches!(
            parse_completion(&text),
            Err(CaptureError::MalformedExtraction { .. })
        ));
    }

    #[test]
    fn test_outermost_object() {
        assert_eq!(outermost_object("x {\"a\": {}} y"), Some("{\"a\": {}}"));
        assert_eq!(outermost_object("} backwards {"), None);
        assert_eq!(outermost_object("no braces"), None);
    }
}
