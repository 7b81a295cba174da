use serde_json::{Map, Value};

/// An owned list as returned by `lists/list.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TwitterList {
    pub id: u64,
    pub id_str: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
