use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::document::DocumentId;
use crate::notify::toast::{NotificationSink, Toast, ToastMessages};

/// The backend write that durably persists a note's publish flag.
///
/// Injected into [`PublishController`] so the controller stays independent of
/// how the mutation travels (server function from the browser, repository
/// call on the server, mock in tests).
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait DocumentMutator: Send + Sync {
    async fn set_published(&self, id: &DocumentId, is_published: bool) -> Result<(), AppError>;
}

/// Outcome of one publish/unpublish invocation.
///
/// Failures never escape as errors; they have already been surfaced through
/// the notification sink by the time the caller sees the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The mutation settled successfully; the stored flag now matches the
    /// requested value.
    Applied,
    /// The mutation rejected; the stored flag is unchanged.
    Failed,
    /// Another submission was already in flight, nothing was done.
    AlreadySubmitting,
}

/// Drives a note's publish flag through the injected mutation and tracks the
/// in-flight submission.
///
/// State machine per transition: Idle -> Submitting -> Idle. Submitting is
/// entered only from Idle; both outcomes return to Idle, so there is no stuck
/// state. The local document snapshot is never flipped optimistically: the
/// caller reconciles its view only from an [`Transition::Applied`] outcome.
#[derive(Clone)]
pub struct PublishController {
    mutator: Arc<dyn DocumentMutator>,
    notifier: Arc<dyn NotificationSink>,
    submitting: Arc<AtomicBool>,
}

impl PublishController {
    pub fn new(mutator: Arc<dyn DocumentMutator>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            mutator,
            notifier,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a submission is in flight.
    ///
    /// The interaction surface reads this to disable the triggering
    /// affordance; nothing else may write the flag.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Publish the note: mutation with `is_published = true`.
    pub async fn publish(&self, id: &DocumentId) -> Transition {
        self.transition(id, true, ToastMessages::PUBLISH).await
    }

    /// Unpublish the note: mutation with `is_published = false`.
    pub async fn unpublish(&self, id: &DocumentId) -> Transition {
        self.transition(id, false, ToastMessages::UNPUBLISH).await
    }

    async fn transition(
        &self,
        id: &DocumentId,
        is_published: bool,
        messages: ToastMessages,
    ) -> Transition {
        // Enter Submitting only from Idle. The affordance is disabled while
        // submitting, so this rejection only fires if the gate was bypassed.
        let Some(_guard) = SubmissionGuard::acquire(&self.submitting) else {
            tracing::debug!(%id, "transition rejected, submission already in flight");
            return Transition::AlreadySubmitting;
        };

        self.notifier.notify(Toast::loading(messages.loading));

        // _guard drops after this block settles: the flag resets only once
        // the outcome notification has been emitted.
        match self.mutator.set_published(id, is_published).await {
            Ok(()) => {
                self.notifier.notify(Toast::success(messages.success));
                Transition::Applied
            }
            Err(err) => {
                tracing::warn!(%id, %err, is_published, "publish mutation failed");
                self.notifier.notify(Toast::error(messages.error));
                Transition::Failed
            }
        }
    }
}

/// Holds the submission flag for the duration of one transition.
///
/// Resetting on drop keeps `is_submitting` honest on every exit path,
/// including cancellation of the transition future.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::notify::toast::{ToastLevel, ToastLog};

    /// Mutator that records every call and settles with a configurable
    /// outcome after an optional pause.
    struct FakeMutator {
        calls: Mutex<Vec<(DocumentId, bool)>>,
        fail: bool,
        pause: Option<Duration>,
    }

    impl FakeMutator {
        fn succeeding() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
                pause: None,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
                pause: None,
            }
        }

        fn slow(pause: Duration) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
                pause: Some(pause),
            }
        }

        fn calls(&self) -> Vec<(DocumentId, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl DocumentMutator for FakeMutator {
        async fn set_published(&self, id: &DocumentId, is_published: bool) -> Result<(), AppError> {
            self.calls.lock().unwrap().push((id.clone(), is_published));
            if let Some(pause) = self.pause {
                tokio::time::sleep(pause).await;
            }
            if self.fail {
                Err(AppError::Database("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    fn controller(mutator: Arc<FakeMutator>) -> (PublishController, Arc<ToastLog>) {
        let log = Arc::new(ToastLog::new());
        let ctrl = PublishController::new(mutator, log.clone());
        (ctrl, log)
    }

    #[tokio::test]
    async fn publish_calls_mutation_exactly_once_with_true() {
        let mutator = Arc::new(FakeMutator::succeeding());
        let (ctrl, _) = controller(mutator.clone());
        let id = DocumentId::from("doc_123".to_string());

        assert_eq!(ctrl.publish(&id).await, Transition::Applied);
        assert_eq!(mutator.calls(), vec![(id, true)]);
    }

    #[tokio::test]
    async fn publish_success_emits_loading_then_success() {
        let mutator = Arc::new(FakeMutator::succeeding());
        let (ctrl, log) = controller(mutator);
        let id = DocumentId::generate();

        ctrl.publish(&id).await;

        assert_eq!(
            log.entries(),
            vec![
                Toast::loading("Publishing..."),
                Toast::success("Note published!"),
            ]
        );
        assert!(!ctrl.is_submitting());
    }

    #[tokio::test]
    async fn unpublish_failure_emits_loading_then_error_and_resets_flag() {
        let mutator = Arc::new(FakeMutator::failing());
        let (ctrl, log) = controller(mutator.clone());
        let id = DocumentId::generate();

        assert_eq!(ctrl.unpublish(&id).await, Transition::Failed);

        assert_eq!(
            log.entries(),
            vec![
                Toast::loading("Unpublishing..."),
                Toast::error("Failed to unpublish note."),
            ]
        );
        // The mutation was attempted with false, once, and the flag is back.
        assert_eq!(mutator.calls(), vec![(id, false)]);
        assert!(!ctrl.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn submitting_is_true_strictly_during_the_mutation() {
        let mutator = Arc::new(FakeMutator::slow(Duration::from_millis(50)));
        let (ctrl, _) = controller(mutator);
        let id = DocumentId::generate();

        assert!(!ctrl.is_submitting());

        let pending = {
            let ctrl = ctrl.clone();
            let id = id.clone();
            tokio::spawn(async move { ctrl.publish(&id).await })
        };
        // Let the transition reach its suspension point.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(ctrl.is_submitting());

        assert_eq!(pending.await.unwrap(), Transition::Applied);
        assert!(!ctrl.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_transition_is_rejected_without_side_effects() {
        let mutator = Arc::new(FakeMutator::slow(Duration::from_millis(50)));
        let (ctrl, log) = controller(mutator.clone());
        let id = DocumentId::generate();

        let first = {
            let ctrl = ctrl.clone();
            let id = id.clone();
            tokio::spawn(async move { ctrl.publish(&id).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Second request while the first is in flight: no mutation, no toast.
        assert_eq!(ctrl.unpublish(&id).await, Transition::AlreadySubmitting);
        assert_eq!(mutator.calls().len(), 1);

        assert_eq!(first.await.unwrap(), Transition::Applied);
        let levels: Vec<ToastLevel> = log.entries().iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![ToastLevel::Loading, ToastLevel::Success]);

        // Back to Idle, a new transition is accepted again.
        assert_eq!(ctrl.unpublish(&id).await, Transition::Applied);
    }

    #[tokio::test]
    async fn failure_does_not_prevent_later_transitions() {
        struct FlakyMutator {
            attempts: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl DocumentMutator for FlakyMutator {
            async fn set_published(&self, _: &DocumentId, _: bool) -> Result<(), AppError> {
                if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AppError::Database("timeout".into()))
                } else {
                    Ok(())
                }
            }
        }

        let log = Arc::new(ToastLog::new());
        let ctrl = PublishController::new(
            Arc::new(FlakyMutator {
                attempts: AtomicUsize::new(0),
            }),
            log.clone(),
        );
        let id = DocumentId::generate();

        assert_eq!(ctrl.publish(&id).await, Transition::Failed);
        assert_eq!(ctrl.publish(&id).await, Transition::Applied);

        let levels: Vec<ToastLevel> = log.entries().iter().map(|t| t.level).collect();
        assert_eq!(
            levels,
            vec![
                ToastLevel::Loading,
                ToastLevel::Error,
                ToastLevel::Loading,
                ToastLevel::Success,
            ]
        );
    }
}
