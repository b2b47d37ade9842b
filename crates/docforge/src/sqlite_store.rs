//! SQLite-backed document and chunk stores.
//!
//! Maps each [`DocumentStore`]/[`ChunkStore`] operation to SQL against
//! the schema in [`crate::migrate`]. Chunk batches are inserted inside a
//! single transaction so a failed batch leaves no rows behind, and the
//! status transitions are guarded with `WHERE status = 'processing'` so a
//! terminal status never reverts.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use docforge_core::embed::{blob_to_vec, vec_to_blob};
use docforge_core::models::{ChunkRecord, Document, DocumentStatus, NewDocument};
use docforge_core::store::{ChunkStore, DocumentStore};

/// SQLite implementation of both store traits.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_document(row: &SqliteRow) -> Result<Document> {
    let status: String = row.try_get("status")?;
    Ok(Document {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        file_path: row.try_get("file_path")?,
        file_size: row.try_get("file_size")?,
        page_count: row.try_get("page_count")?,
        status: status.parse()?,
        error_message: row.try_get("error_message")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_chunk(row: &SqliteRow) -> Result<ChunkRecord> {
    let blob: Vec<u8> = row.try_get("embedding")?;
    Ok(ChunkRecord {
        document_id: row.try_get("document_id")?,
        owner_id: row.try_get("owner_id")?,
        content: row.try_get("content")?,
        page_number: row.try_get("page_number")?,
        chunk_index: row.try_get("chunk_index")?,
        embedding: blob_to_vec(&blob),
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create_document(&self, doc: &NewDocument) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO documents (id, owner_id, name, file_path, file_size,
                                   page_count, status, error_message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, 'processing', NULL, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&doc.owner_id)
        .bind(&doc.name)
        .bind(&doc.file_path)
        .bind(doc.file_size)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let row = sqlx::query("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn list_documents(&self, owner_id: &str) -> Result<Vec<Document>> {
        let rows =
            sqlx::query("SELECT * FROM documents WHERE owner_id = ? ORDER BY created_at DESC")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_document).collect()
    }

    async fn mark_ready(&self, id: &str, page_count: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE documents
            SET status = 'ready', page_count = ?, updated_at = ?
            WHERE id = ? AND status = 'processing'
            "#,
        )
        .bind(page_count)
        .bind(chrono::Utc::now().timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_error(&self, id: &str, message: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE documents
            SET status = 'error', error_message = ?, updated_at = ?
            WHERE id = ? AND status = 'processing'
            "#,
        )
        .bind(message)
        .bind(chrono::Utc::now().timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn rename_document(&self, id: &str, name: &str) -> Result<()> {
        sqlx::query("UPDATE documents SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(chrono::Utc::now().timestamp())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM document_chunks WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for SqliteStore {
    async fn insert_chunks(&self, records: &[ChunkRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO document_chunks (document_id, owner_id, content,
                                             page_number, chunk_index, embedding)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.document_id)
            .bind(&record.owner_id)
            .bind(&record.content)
            .bind(record.page_number)
            .bind(record.chunk_index)
            .bind(vec_to_blob(&record.embedding))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_document(&self, document_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM document_chunks WHERE document_id = ?")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<ChunkRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM document_chunks WHERE document_id = ? ORDER BY chunk_index",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_chunk).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_store() -> SqliteStore {
        // One connection: every handle sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::migrate::run_migrations(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    fn new_doc(owner: &str) -> NewDocument {
        NewDocument {
            owner_id: owner.to_string(),
            name: "tax-report".to_string(),
            file_path: "/uploads/tax-report.pdf".to_string(),
            file_size: 4096,
        }
    }

    fn chunk(doc_id: &str, index: i64) -> ChunkRecord {
        ChunkRecord {
            document_id: doc_id.to_string(),
            owner_id: "owner-1".to_string(),
            content: format!("chunk {}", index),
            page_number: 1,
            chunk_index: index,
            embedding: vec![index as f32, 0.5],
        }
    }

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let store = test_store().await;
        let id = store.create_document(&new_doc("owner-1")).await.unwrap();

        let doc = store.get_document(&id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(doc.name, "tax-report");
        assert_eq!(doc.page_count, 0);
        assert!(doc.error_message.is_none());
    }

    #[tokio::test]
    async fn mark_ready_then_error_keeps_ready() {
        let store = test_store().await;
        let id = store.create_document(&new_doc("owner-1")).await.unwrap();

        store.mark_ready(&id, 12).await.unwrap();
        store.mark_error(&id, "should be ignored").await.unwrap();

        let doc = store.get_document(&id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Ready);
        assert_eq!(doc.page_count, 12);
        assert!(doc.error_message.is_none());
    }

    #[tokio::test]
    async fn mark_error_records_message() {
        let store = test_store().await;
        let id = store.create_document(&new_doc("owner-1")).await.unwrap();

        store.mark_error(&id, "malformed document").await.unwrap();

        let doc = store.get_document(&id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Error);
        assert_eq!(doc.error_message.as_deref(), Some("malformed document"));
    }

    #[tokio::test]
    async fn chunks_roundtrip_in_index_order() {
        let store = test_store().await;
        let id = store.create_document(&new_doc("owner-1")).await.unwrap();

        // Insert out of order; reads must come back ordered by index.
        store
            .insert_chunks(&[chunk(&id, 2), chunk(&id, 0), chunk(&id, 1)])
            .await
            .unwrap();

        let chunks = store.chunks_for_document(&id).await.unwrap();
        let indices: Vec<i64> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(chunks[1].embedding, vec![1.0, 0.5]);
    }

    #[tokio::test]
    async fn failed_batch_leaves_no_rows() {
        let store = test_store().await;
        let id = store.create_document(&new_doc("owner-1")).await.unwrap();

        // Duplicate index violates the primary key mid-batch.
        let result = store
            .insert_chunks(&[chunk(&id, 0), chunk(&id, 1), chunk(&id, 1)])
            .await;
        assert!(result.is_err());

        assert!(store.chunks_for_document(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_document_cascades_chunks() {
        let store = test_store().await;
        let id = store.create_document(&new_doc("owner-1")).await.unwrap();
        store
            .insert_chunks(&[chunk(&id, 0), chunk(&id, 1)])
            .await
            .unwrap();

        store.delete_document(&id).await.unwrap();

        assert!(store.get_document(&id).await.unwrap().is_none());
        assert!(store.chunks_for_document(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner() {
        let store = test_store().await;
        store.create_document(&new_doc("owner-1")).await.unwrap();
        store.create_document(&new_doc("owner-1")).await.unwrap();
        store.create_document(&new_doc("owner-2")).await.unwrap();

        assert_eq!(store.list_documents("owner-1").await.unwrap().len(), 2);
        assert_eq!(store.list_documents("owner-2").await.unwrap().len(), 1);
        assert!(store.list_documents("owner-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_updates_name() {
        let store = test_store().await;
        let id = store.create_document(&new_doc("owner-1")).await.unwrap();

        store.rename_document(&id, "renamed").await.unwrap();

        let doc = store.get_document(&id).await.unwrap().unwrap();
        assert_eq!(doc.name, "renamed");
    }
}
