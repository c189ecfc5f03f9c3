use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*").expect("fence pattern is valid"));

/// Outcome of pulling JSON out of free-form model output
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Json(Value),
    Unparseable,
}

impl Extracted {
    /// The value if it is a non-empty JSON object
    pub fn into_object(self) -> Option<Value> {
        match self {
            Extracted::Json(value) if value.as_object().is_some_and(|o| !o.is_empty()) => {
                Some(value)
            }
            _ => None,
        }
    }
}

/// Strip code fences and parse; fall back to the outermost `{...}` span
pub fn extract_json(text: &str) -> Extracted {
    let without_open = JSON_FENCE.replace_all(text, "");
    let cleaned = without_open.replace("```", "");
    let cleaned = cleaned.trim();

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Extracted::Json(value);
    }

    let braced = cleaned
        .find('{')
        .zip(cleaned.rfind('}'))
        .filter(|(start, end)| start < end)
        .and_then(|(start, end)| serde_json::from_str::<Value>(&cleaned[start..=end]).ok());

    match braced {
        Some(value) => Extracted::Json(value),
        None => Extracted::Unparseable,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const BODY: &str = r#"{"sentiment": {"overall": "positive", "polarity": 0.8}, "advertisement": {"is_ad": "No"}}"#;

    #[test]
    fn bare_json_parses() {
        assert_eq!(
            extract_json(BODY),
            Extracted::Json(json!({
                "sentiment": {"overall": "positive", "polarity": 0.8},
                "advertisement": {"is_ad": "No"}
            }))
        );
    }

    #[test]
    fn fenced_json_matches_bare_json() {
        let fenced = format!("```json\n{}\n```", BODY);
        assert_eq!(extract_json(&fenced), extract_json(BODY));

        let plain_fence = format!("```\n{}\n```", BODY);
        assert_eq!(extract_json(&plain_fence), extract_json(BODY));
    }

    #[test]
    fn prose_around_object_is_ignored() {
        let chatty = format!(
            "Sure! Here is the analysis you asked for:\n{}\nLet me know if you need more.",
            BODY
        );
        assert_eq!(extract_json(&chatty), extract_json(BODY));
    }

    #[test]
    fn no_json_is_unparseable() {
        assert_eq!(extract_json("I cannot analyze this video."), Extracted::Unparseable);
        assert_eq!(extract_json(""), Extracted::Unparseable);
        assert_eq!(extract_json("} backwards {"), Extracted::Unparseable);
        assert_eq!(extract_json("{\"truncated\": "), Extracted::Unparseable);
    }

    #[test]
    fn only_objects_survive_into_object() {
        assert!(extract_json(BODY).into_object().is_some());
        assert!(extract_json("[1, 2]").into_object().is_none());
        assert!(extract_json("nope").into_object().is_none());
        assert!(extract_json("{}").into_object().is_none());
        assert!(extract_json("```json\n{ }\n```").into_object().is_none());
    }
}
