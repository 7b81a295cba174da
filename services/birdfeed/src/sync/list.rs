use crate::error::Result;
use crate::model::{CursorValue, LIST_ID};
use crate::storage::CursorStore;
use crate::upstream::Source;

/// Cache-aside lookup of the tracked list's upstream id. The name is only
/// resolved upstream while the `listId` cursor is absent.
pub async fn resolve_list_id(cursors: &dyn CursorStore, source: &dyn Source, name: &str) -> Result<String> {
    if let Some(list_id) = cursors.get(LIST_ID).await? {
        return Ok(list_id.to_string());
    }

    let list_id = source.resolve_list_id(name).await?;
    cursors.put(LIST_ID, CursorValue::Text(list_id.clone())).await?;
    tracing::info!(name, %list_id, "cached list id");
    Ok(list_id)
}
