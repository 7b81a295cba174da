use async_trait::async_trait;
use deadpool_surrealdb::{Connection, Pool};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use super::{CursorStore, RecordStore};
use crate::error::{Result, SyndicatorError};
use crate::model::{AuthorId, CursorValue, PostId, PostRecord};

const SCHEMA: &str = include_str!("../../db/schema.surql");
const CHUNK_SIZE: usize = 50;

#[derive(Debug, Serialize, Deserialize)]
struct CursorRow {
    /// JSON-encoded [`CursorValue`].
    value: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct PostRow {
    author_id: i64,
    post_id: i64,
    payload: String,
}

fn to_db_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| SyndicatorError::StoreWriteFailure(format!("id {id} exceeds the integer range")))
}

fn from_db_id(id: i64) -> Result<u64> {
    u64::try_from(id).map_err(|_| SyndicatorError::StoreReadFailure(format!("negative id {id} in store")))
}

impl TryFrom<PostRow> for PostRecord {
    type Error = SyndicatorError;

    fn try_from(row: PostRow) -> Result<Self> {
        Ok(PostRecord {
            author_id: AuthorId(from_db_id(row.author_id)?),
            post_id: PostId(from_db_id(row.post_id)?),
            payload: row.payload,
        })
    }
}

/// Both tables on one SurrealDB database. A post's record id is
/// `post:[author_id, post_id]`, so `UPSERT` on it overwrites in place.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct SurrealStore {
    pool: Pool,
}

impl SurrealStore {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self, on_error: fn(String) -> SyndicatorError) -> Result<Connection> {
        self.pool.get().await.map_err(|e| on_error(e.to_string()))
    }

    /// Applies the table and index definitions. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        let conn = self.connection(SyndicatorError::StoreWriteFailure).await?;
        conn.query(SCHEMA)
            .await
            .and_then(|res| res.check())
            .map_err(|e| SyndicatorError::StoreWriteFailure(e.to_string()))?;
        Ok(())
    }

    async fn upsert_one(conn: &Connection, record: &PostRecord) -> Result<()> {
        let author_id = to_db_id(record.author_id.0)?;
        let post_id = to_db_id(record.post_id.0)?;
        conn.query("UPSERT type::thing('post', [$author_id, $post_id]) CONTENT { author_id: $author_id, post_id: $post_id, payload: $payload } RETURN NONE")
            .bind(("author_id", author_id))
            .bind(("post_id", post_id))
            .bind(("payload", record.payload.clone()))
            .await
            .and_then(|res| res.check())
            .map_err(|e| SyndicatorError::StoreWriteFailure(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CursorStore for SurrealStore {
    async fn get(&self, name: &str) -> Result<Option<CursorValue>> {
        let conn = self.connection(SyndicatorError::StoreReadFailure).await?;
        let row: Option<CursorRow> = conn
            .select(("cursor", name))
            .await
            .map_err(|e| SyndicatorError::StoreReadFailure(e.to_string()))?;
        match row {
            Some(row) => Ok(Some(serde_json::from_str(&row.value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, name: &str, value: CursorValue) -> Result<()> {
        let conn = self.connection(SyndicatorError::StoreWriteFailure).await?;
        let row = CursorRow {
            value: serde_json::to_string(&value)?,
        };
        let _: Option<CursorRow> = conn
            .upsert(("cursor", name))
            .content(row)
            .await
            .map_err(|e| SyndicatorError::StoreWriteFailure(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SurrealStore {
    async fn upsert_batch(&self, records: &[PostRecord]) -> Result<()> {
        let conn = self.connection(SyndicatorError::StoreWriteFailure).await?;
        for chunk in records.chunks(CHUNK_SIZE) {
            try_join_all(chunk.iter().map(|record| Self::upsert_one(&conn, record))).await?;
        }
        Ok(())
    }

    async fn query_by_author(&self, author_id: AuthorId, limit: usize) -> Result<Vec<PostRecord>> {
        let conn = self.connection(SyndicatorError::StoreReadFailure).await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<PostRow> = conn
            .query("SELECT author_id, post_id, payload FROM post WHERE author_id = $author_id ORDER BY post_id DESC LIMIT $limit")
            .bind(("author_id", to_db_id(author_id.0)?))
            .bind(("limit", limit))
            .await
            .and_then(|mut res| res.take(0))
            .map_err(|e| SyndicatorError::StoreReadFailure(e.to_string()))?;
        rows.into_iter().map(PostRecord::try_from).collect()
    }
}
