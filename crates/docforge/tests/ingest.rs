//! End-to-end ingestion tests: real PDF extraction and SQLite storage,
//! with a stub embedder standing in for the remote provider. Jobs go
//! through the worker queue so the test observes completion the same way
//! any client does: by polling the document record.

mod support;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use docforge::extract::PdfExtractor;
use docforge::sqlite_store::SqliteStore;
use docforge::worker::{spawn_workers, IngestJob};
use docforge::{db, migrate};

use docforge_core::embed::{EmbedError, Embedder};
use docforge_core::models::{DocumentStatus, NewDocument};
use docforge_core::pipeline::{IngestPipeline, PipelineConfig};
use docforge_core::store::{ChunkStore, DocumentStore};

struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    fn model_name(&self) -> &str {
        "stub"
    }

    fn dims(&self) -> usize {
        4
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(vec![0.25, 0.5, 0.75, 1.0])
    }
}

use support::minimal_pdf;

async fn setup() -> (TempDir, Arc<SqliteStore>, Arc<IngestPipeline>) {
    let tmp = TempDir::new().unwrap();
    let pool = db::connect(&tmp.path().join("docforge.sqlite"))
        .await
        .unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    let store = Arc::new(SqliteStore::new(pool));

    let pipeline = Arc::new(IngestPipeline::new(
        Arc::new(PdfExtractor),
        Arc::new(StubEmbedder),
        store.clone(),
        store.clone(),
        PipelineConfig::default(),
    ));

    (tmp, store, pipeline)
}

async fn create_document(store: &SqliteStore, size: i64) -> String {
    store
        .create_document(&NewDocument {
            owner_id: "owner-1".to_string(),
            name: "statement".to_string(),
            file_path: "/uploads/statement.pdf".to_string(),
            file_size: size,
        })
        .await
        .unwrap()
}

/// Poll the document record until it leaves `processing`.
async fn wait_for_terminal(store: &SqliteStore, id: &str) -> docforge_core::models::Document {
    for _ in 0..200 {
        let document = store.get_document(id).await.unwrap().unwrap();
        if document.status.is_terminal() {
            return document;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("document {} stuck in processing", id);
}

#[tokio::test]
async fn pdf_ingestion_through_worker_queue_marks_ready() {
    let (_tmp, store, pipeline) = setup().await;
    let (queue, workers) = spawn_workers(pipeline, 2, 8);

    let bytes = minimal_pdf("quarterly savings report with totals");
    let id = create_document(&store, bytes.len() as i64).await;

    // The submit returns before the pipeline runs; completion is only
    // visible through the document record.
    queue
        .submit(IngestJob {
            document_id: id.clone(),
            owner_id: "owner-1".to_string(),
            bytes,
        })
        .await
        .unwrap();

    let document = wait_for_terminal(&store, &id).await;
    assert_eq!(document.status, DocumentStatus::Ready);
    assert_eq!(document.page_count, 1);
    assert!(document.error_message.is_none());

    let chunks = store.chunks_for_document(&id).await.unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_index, 0);
    assert!(chunks[0].content.contains("quarterly savings report"));
    assert_eq!(chunks[0].embedding, vec![0.25, 0.5, 0.75, 1.0]);

    drop(queue);
    workers.join().await;
}

#[tokio::test]
async fn malformed_pdf_marks_error_with_no_chunks() {
    let (_tmp, store, pipeline) = setup().await;
    let (queue, workers) = spawn_workers(pipeline, 1, 8);

    let id = create_document(&store, 10).await;
    queue
        .submit(IngestJob {
            document_id: id.clone(),
            owner_id: "owner-1".to_string(),
            bytes: b"not a pdf at all".to_vec(),
        })
        .await
        .unwrap();

    let document = wait_for_terminal(&store, &id).await;
    assert_eq!(document.status, DocumentStatus::Error);
    assert!(document.error_message.is_some());
    assert!(store.chunks_for_document(&id).await.unwrap().is_empty());

    drop(queue);
    workers.join().await;
}

#[tokio::test]
async fn concurrent_documents_do_not_interfere() {
    let (_tmp, store, pipeline) = setup().await;
    let (queue, workers) = spawn_workers(pipeline, 2, 8);

    let good = minimal_pdf("household budget overview for the year");
    let good_id = create_document(&store, good.len() as i64).await;
    let bad_id = create_document(&store, 10).await;

    queue
        .submit(IngestJob {
            document_id: good_id.clone(),
            owner_id: "owner-1".to_string(),
            bytes: good,
        })
        .await
        .unwrap();
    queue
        .submit(IngestJob {
            document_id: bad_id.clone(),
            owner_id: "owner-1".to_string(),
            bytes: b"garbage".to_vec(),
        })
        .await
        .unwrap();

    let good_doc = wait_for_terminal(&store, &good_id).await;
    let bad_doc = wait_for_terminal(&store, &bad_id).await;

    assert_eq!(good_doc.status, DocumentStatus::Ready);
    assert_eq!(bad_doc.status, DocumentStatus::Error);
    assert_eq!(store.chunks_for_document(&good_id).await.unwrap().len(), 1);
    assert!(store.chunks_for_document(&bad_id).await.unwrap().is_empty());

    drop(queue);
    workers.join().await;
}
