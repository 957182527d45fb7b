/*!
 * Serde helpers for configuration values that arrive either as numbers or as
 * strings (environment variables are always strings).
 */

use serde::{Deserialize, Deserializer};

/// Deserialize an optional millisecond count given as a number or a string.
///
/// ```rust
/// use serde::Deserialize;
/// use salticidae::utils::serde::deserialize_optional_millis;
///
/// #[derive(Deserialize)]
/// struct Config {
///     #[serde(default, deserialize_with = "deserialize_optional_millis")]
///     timeout_ms: Option<u64>,
/// }
///
/// let config: Config = serde_json::from_str(r#"{"timeout_ms": "250"}"#).unwrap();
/// assert_eq!(config.timeout_ms, Some(250));
/// ```
pub fn deserialize_optional_millis<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("Expected a non-negative integer, found: {n}"))),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("Cannot parse '{s}' as milliseconds")))
        }
        Some(other) => Err(D::Error::custom(format!(
            "Expected numeric value, found: {other:?}"
        ))),
    }
}
