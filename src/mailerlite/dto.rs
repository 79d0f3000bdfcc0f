use serde::Deserialize;

/// Subset of `GET /groups/{id}` that we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupInfo {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub active: u64,
}

/// A `null` count reads as 0. Anything that is not a non-negative integer
/// fails the whole body.
fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}
