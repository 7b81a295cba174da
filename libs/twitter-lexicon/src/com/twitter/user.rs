use serde_json::{Map, Value};

use super::WEB_HOST;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn profile_url(&self) -> String {
        format!("{}/{}", WEB_HOST, self.screen_name)
    }
}
