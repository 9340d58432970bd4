// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Turns the required-tools list into a non-empty collection.

use nonempty::NonEmpty;
use serde::Deserialize;

pub fn deserialize_tools<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    let tools: Vec<String> = values
        .into_iter()
        .map(|tool| tool.trim().to_string())
        .collect();

    if let Some(blank) = tools.iter().position(|t| t.is_empty()) {
        return Err(serde::de::Error::custom(format!(
            "tools[{blank}] cannot be blank"
        )));
    }

    NonEmpty::from_vec(tools)
        .ok_or_else(|| serde::de::Error::custom("at least one required tool must be listed"))
}
