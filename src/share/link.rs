use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::models::document::DocumentId;

/// How long the "copied" indicator stays on after a successful copy.
pub const ACK_WINDOW: Duration = Duration::from_millis(1000);

/// Build the public preview URL for a note.
///
/// Pure concatenation; the origin is taken as an opaque, already-resolved
/// value and is not validated.
pub fn preview_url(origin: &str, id: &DocumentId) -> String {
    format!("{origin}/preview/{id}")
}

/// Write access to the platform clipboard.
///
/// Injected so the share link works against `navigator.clipboard` in the
/// browser and against fakes in tests.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), AppError>;
}

/// Token identifying one armed acknowledgment window.
///
/// Expiry is only honored for the latest token, which gives repeated copies
/// cancel-and-restart semantics: a stale timer from an earlier copy can never
/// end the current window early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyToken(u64);

#[derive(Debug, Default)]
struct AckState {
    copied: AtomicBool,
    generation: AtomicU64,
}

/// Derives the shareable URL for a note and manages the transient "copied"
/// acknowledgment around clipboard writes.
///
/// The struct owns no timer itself: [`ShareLink::copy`] arms the window and
/// hands back a [`CopyToken`]; the owning session schedules the delay (a
/// one-shot browser timeout, a tokio sleep in tests) and calls
/// [`ShareLink::expire`] when it fires. A timer dropped with its session
/// simply never expires anything.
#[derive(Clone)]
pub struct ShareLink {
    origin: String,
    document_id: DocumentId,
    clipboard: Arc<dyn Clipboard>,
    ack: Arc<AckState>,
}

impl ShareLink {
    pub fn new(
        origin: impl Into<String>,
        document_id: DocumentId,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            origin: origin.into(),
            document_id,
            clipboard,
            ack: Arc::new(AckState::default()),
        }
    }

    /// The shareable URL. Stable for a given (origin, id) pair.
    pub fn url(&self) -> String {
        preview_url(&self.origin, &self.document_id)
    }

    /// True while an acknowledgment window is open.
    pub fn copied(&self) -> bool {
        self.ack.copied.load(Ordering::Acquire)
    }

    /// Write the URL to the clipboard and arm the acknowledgment window.
    ///
    /// On clipboard failure the window is left untouched and the error is
    /// returned for the caller to surface.
    pub async fn copy(&self) -> Result<CopyToken, AppError> {
        self.clipboard.write_text(&self.url()).await?;
        let generation = self.ack.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.ack.copied.store(true, Ordering::Release);
        Ok(CopyToken(generation))
    }

    /// Close the acknowledgment window armed by `token`.
    ///
    /// Returns true if the indicator was cleared; a stale token (a newer copy
    /// re-armed the window in the meantime) is a no-op.
    pub fn expire(&self, token: CopyToken) -> bool {
        if self.ack.generation.load(Ordering::Acquire) == token.0 {
            self.ack.copied.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct FakeClipboard {
        written: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeClipboard {
        fn working() -> Arc<Self> {
            Arc::new(Self {
                written: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                written: Mutex::new(Vec::new()),
                fail: true,
            })
        }
    }

    #[async_trait::async_trait]
    impl Clipboard for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Clipboard("denied".into()));
            }
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn doc_id(raw: &str) -> DocumentId {
        DocumentId::from(raw.to_string())
    }

    #[test]
    fn preview_url_concatenates_origin_path_and_id() {
        let url = preview_url("https://example.com", &doc_id("doc_123"));
        assert_eq!(url, "https://example.com/preview/doc_123");
    }

    #[test]
    fn preview_url_is_pure_and_origin_sensitive() {
        let id = doc_id("doc_123");
        assert_eq!(
            preview_url("https://example.com", &id),
            preview_url("https://example.com", &id),
        );
        assert_ne!(
            preview_url("https://example.com", &id),
            preview_url("https://other.example", &id),
        );
        // Malformed origins pass through unchanged.
        assert_eq!(preview_url("not a url", &id), "not a url/preview/doc_123");
    }

    #[tokio::test]
    async fn copy_writes_the_url_and_arms_the_indicator() {
        let clipboard = FakeClipboard::working();
        let link = ShareLink::new("https://example.com", doc_id("doc_123"), clipboard.clone());

        assert!(!link.copied());
        let token = link.copy().await.unwrap();
        assert!(link.copied());
        assert_eq!(
            clipboard.written.lock().unwrap().as_slice(),
            ["https://example.com/preview/doc_123"]
        );

        assert!(link.expire(token));
        assert!(!link.copied());
    }

    #[tokio::test]
    async fn failed_copy_leaves_indicator_off_and_surfaces_the_error() {
        let link = ShareLink::new("https://example.com", doc_id("doc_123"), FakeClipboard::broken());

        let err = link.copy().await.unwrap_err();
        assert!(matches!(err, AppError::Clipboard(_)));
        assert!(!link.copied());
    }

    #[tokio::test(start_paused = true)]
    async fn second_copy_restarts_the_window() {
        let link = ShareLink::new("https://example.com", doc_id("doc_1"), FakeClipboard::working());

        let first = link.copy().await.unwrap();
        tokio::time::sleep(ACK_WINDOW / 2).await;
        let second = link.copy().await.unwrap();

        // The first window elapses, but its token is stale: still copied.
        tokio::time::sleep(ACK_WINDOW / 2).await;
        assert!(!link.expire(first));
        assert!(link.copied());

        // The second window elapses and clears the indicator.
        tokio::time::sleep(ACK_WINDOW / 2).await;
        assert!(link.expire(second));
        assert!(!link.copied());
    }
}
