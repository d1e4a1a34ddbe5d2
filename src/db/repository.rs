use async_trait::async_trait;

use crate::error::AppError;
use crate::models::document::{Document, DocumentId};

/// Repository trait for note operations.
///
/// This trait allows mocking the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Create a new note or replace an existing one (matched by id).
    async fn create_or_update(&self, doc: Document) -> Result<(), AppError>;

    /// Find a note by its id.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, AppError>;

    /// List all notes, most recently updated first.
    async fn list(&self) -> Result<Vec<Document>, AppError>;

    /// Durably set the publish flag of a note.
    ///
    /// Fails with [`AppError::NotFound`] when no note has the given id.
    async fn set_published(&self, id: &DocumentId, is_published: bool) -> Result<(), AppError>;
}

/// MongoDB implementation of the DocumentRepository.
///
/// Only available when the `ssr` feature is enabled (i.e., server-side).
#[cfg(feature = "ssr")]
pub struct MongoDocumentRepository {
    collection: mongodb::Collection<Document>,
}

#[cfg(feature = "ssr")]
impl MongoDocumentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("documents"),
        }
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn create_or_update(&self, doc: Document) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::ReplaceOptions;

        let filter = doc! { "_id": doc.id.as_str() };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &doc)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": id.as_str() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<Document>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "last_updated": -1 })
            .build();

        let mut cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut documents = Vec::new();
        use futures::TryStreamExt;
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            documents.push(doc);
        }

        Ok(documents)
    }

    async fn set_published(&self, id: &DocumentId, is_published: bool) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .update_one(
                doc! { "_id": id.as_str() },
                doc! { "$set": { "is_published": is_published } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("note {id}")));
        }

        Ok(())
    }
}

/// [`DocumentMutator`] backed by a repository, for server-side callers of the
/// publish controller.
///
/// [`DocumentMutator`]: crate::publish::controller::DocumentMutator
pub struct RepositoryMutator {
    repo: std::sync::Arc<dyn DocumentRepository>,
}

impl RepositoryMutator {
    pub fn new(repo: std::sync::Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl crate::publish::controller::DocumentMutator for RepositoryMutator {
    async fn set_published(&self, id: &DocumentId, is_published: bool) -> Result<(), AppError> {
        self.repo.set_published(id, is_published).await
    }
}
