//! In-memory store implementation for testing.
//!
//! `HashMap` and `Vec` behind `std::sync::RwLock`; every operation
//! returns an immediately-ready future.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ChunkRecord, Document, DocumentStatus, NewDocument};

use super::{ChunkStore, DocumentStore};

/// In-memory [`DocumentStore`] + [`ChunkStore`].
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<String, Document>>,
    chunks: RwLock<Vec<ChunkRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_document(&self, doc: &NewDocument) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        let mut documents = self.documents.write().unwrap();
        documents.insert(
            id.clone(),
            Document {
                id: id.clone(),
                owner_id: doc.owner_id.clone(),
                name: doc.name.clone(),
                file_path: doc.file_path.clone(),
                file_size: doc.file_size,
                page_count: 0,
                status: DocumentStatus::Processing,
                error_message: None,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.documents.read().unwrap().get(id).cloned())
    }

    async fn list_documents(&self, owner_id: &str) -> Result<Vec<Document>> {
        let documents = self.documents.read().unwrap();
        let mut docs: Vec<Document> = documents
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        docs.sort_by_key(|d| std::cmp::Reverse(d.created_at));
        Ok(docs)
    }

    async fn mark_ready(&self, id: &str, page_count: i64) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        if let Some(doc) = documents.get_mut(id) {
            if doc.status == DocumentStatus::Processing {
                doc.status = DocumentStatus::Ready;
                doc.page_count = page_count;
                doc.updated_at = chrono::Utc::now().timestamp();
            }
        }
        Ok(())
    }

    async fn mark_error(&self, id: &str, message: &str) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        if let Some(doc) = documents.get_mut(id) {
            if doc.status == DocumentStatus::Processing {
                doc.status = DocumentStatus::Error;
                doc.error_message = Some(message.to_string());
                doc.updated_at = chrono::Utc::now().timestamp();
            }
        }
        Ok(())
    }

    async fn rename_document(&self, id: &str, name: &str) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        if let Some(doc) = documents.get_mut(id) {
            doc.name = name.to_string();
            doc.updated_at = chrono::Utc::now().timestamp();
        }
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.documents.write().unwrap().remove(id);
        self.chunks
            .write()
            .unwrap()
            .retain(|c| c.document_id != id);
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for InMemoryStore {
    async fn insert_chunks(&self, records: &[ChunkRecord]) -> Result<()> {
        self.chunks.write().unwrap().extend_from_slice(records);
        Ok(())
    }

    async fn delete_by_document(&self, document_id: &str) -> Result<()> {
        self.chunks
            .write()
            .unwrap()
            .retain(|c| c.document_id != document_id);
        Ok(())
    }

    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<ChunkRecord>> {
        let mut records: Vec<ChunkRecord> = self
            .chunks
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.document_id == document_id)
            .cloned()
            .collect();
        records.sort_by_key(|c| c.chunk_index);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_doc() -> NewDocument {
        NewDocument {
            owner_id: "owner-1".to_string(),
            name: "statement".to_string(),
            file_path: "/tmp/statement.pdf".to_string(),
            file_size: 1024,
        }
    }

    #[tokio::test]
    async fn created_documents_start_processing() {
        let store = InMemoryStore::new();
        let id = store.create_document(&new_doc()).await.unwrap();
        let doc = store.get_document(&id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(doc.page_count, 0);
        assert!(doc.error_message.is_none());
    }

    #[tokio::test]
    async fn terminal_status_never_reverts() {
        let store = InMemoryStore::new();
        let id = store.create_document(&new_doc()).await.unwrap();

        store.mark_ready(&id, 4).await.unwrap();
        store.mark_error(&id, "too late").await.unwrap();

        let doc = store.get_document(&id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Ready);
        assert_eq!(doc.page_count, 4);
        assert!(doc.error_message.is_none());
    }

    #[tokio::test]
    async fn delete_cascades_chunks() {
        let store = InMemoryStore::new();
        let id = store.create_document(&new_doc()).await.unwrap();
        store
            .insert_chunks(&[ChunkRecord {
                document_id: id.clone(),
                owner_id: "owner-1".to_string(),
                content: "hello".to_string(),
                page_number: 1,
                chunk_index: 0,
                embedding: vec![0.1, 0.2],
            }])
            .await
            .unwrap();

        store.delete_document(&id).await.unwrap();

        assert!(store.get_document(&id).await.unwrap().is_none());
        assert!(store.chunks_for_document(&id).await.unwrap().is_empty());
    }
}
