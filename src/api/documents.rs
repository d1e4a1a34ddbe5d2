use leptos::prelude::*;

use crate::models::document::Document;

/// Server function to create a new note with the given title.
#[server(CreateDocument, "/api")]
pub async fn create_document(title: String) -> Result<Document, ServerFnError> {
    use crate::db::repository::DocumentRepository;

    let state = expect_context::<crate::app::AppState>();

    let title = if title.trim().is_empty() {
        "Untitled".to_string()
    } else {
        title
    };

    let doc = Document::new(title);
    state
        .document_repo
        .create_or_update(doc.clone())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    tracing::info!(id = %doc.id, "created note");
    Ok(doc)
}

/// Server function to fetch a note by id, published or not.
#[server(GetDocument, "/api")]
pub async fn get_document(id: String) -> Result<Option<Document>, ServerFnError> {
    use crate::db::repository::DocumentRepository;
    use crate::models::document::DocumentId;

    let state = expect_context::<crate::app::AppState>();

    state
        .document_repo
        .find_by_id(&DocumentId::from(id))
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

/// Server function to fetch a note for the public preview page.
///
/// Returns `None` for unknown ids and for notes that are not published, so
/// the preview route leaks nothing about unpublished content.
#[server(GetPublishedDocument, "/api")]
pub async fn get_published_document(id: String) -> Result<Option<Document>, ServerFnError> {
    use crate::db::repository::DocumentRepository;
    use crate::models::document::DocumentId;

    let state = expect_context::<crate::app::AppState>();

    let doc = state
        .document_repo
        .find_by_id(&DocumentId::from(id))
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(doc.filter(|d| d.is_published))
}

/// Server function to list all notes, most recently updated first.
#[server(ListDocuments, "/api")]
pub async fn list_documents() -> Result<Vec<Document>, ServerFnError> {
    use crate::db::repository::DocumentRepository;

    let state = expect_context::<crate::app::AppState>();

    state
        .document_repo
        .list()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

/// Server function to save a note's title and content.
#[server(SaveDocument, "/api")]
pub async fn save_document(
    id: String,
    title: String,
    content: String,
) -> Result<(), ServerFnError> {
    use chrono::Utc;

    use crate::db::repository::DocumentRepository;
    use crate::models::document::DocumentId;

    let state = expect_context::<crate::app::AppState>();
    let id = DocumentId::from(id);

    let Some(mut doc) = state
        .document_repo
        .find_by_id(&id)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?
    else {
        return Err(ServerFnError::new(format!("note {id} not found")));
    };

    doc.title = title;
    doc.content = content;
    doc.last_updated = Utc::now();

    state
        .document_repo
        .create_or_update(doc)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

/// Server function behind the publish toggle: the backend mutation that
/// durably persists the publish flag.
#[server(SetDocumentPublished, "/api")]
pub async fn set_document_published(id: String, is_published: bool) -> Result<(), ServerFnError> {
    use crate::db::repository::DocumentRepository;
    use crate::models::document::DocumentId;

    let state = expect_context::<crate::app::AppState>();
    let id = DocumentId::from(id);

    state
        .document_repo
        .set_published(&id, is_published)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    tracing::info!(%id, is_published, "publish flag updated");
    Ok(())
}
