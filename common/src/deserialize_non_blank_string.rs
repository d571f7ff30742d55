use serde::{Deserialize, Deserializer, de::Error};

/// Rejects missing, empty and whitespace-only strings, trims the rest
pub fn non_blank_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let input_string: Option<String> = Option::deserialize(deserializer)?;

    let Some(value) = input_string else {
        return Err(Error::custom("field is not a string"));
    };

    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(Error::custom("field is blank"));
    }

    Ok(trimmed.to_string())
}
