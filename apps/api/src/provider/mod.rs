//! Resume Data Provider: resolves the aggregate the page renders from.
//!
//! One fetch per `resolve()`. A failed or empty fetch is masked by the
//! injected fallback dataset so the page always has something to render;
//! real data, even with empty sections, is never replaced by the fallback.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::resume::ResumeData;

pub mod http;

pub use http::{FetchPolicy, HttpResumeSource};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resume API returned status {status}")]
    Status { status: u16 },
}

/// Where the aggregate comes from.
///
/// `Ok(None)` means the source answered but has nothing to give (e.g. the
/// request was unauthorized), which is not an error.
#[async_trait]
pub trait ResumeSource: Send + Sync {
    async fn fetch(&self) -> Result<Option<ResumeData>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// Fetch in flight; there is no data yet.
    Loading,
    /// Live data from the source.
    Ready,
    /// The source had no data; showing the fallback.
    Fallback,
    /// The fetch failed; showing the fallback when one is configured.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub data: Option<Arc<ResumeData>>,
    pub status: ResolveStatus,
}

impl Resolution {
    pub fn loading() -> Self {
        Resolution {
            data: None,
            status: ResolveStatus::Loading,
        }
    }
}

pub struct ResumeProvider {
    source: Arc<dyn ResumeSource>,
    fallback: Option<Arc<ResumeData>>,
    state: watch::Sender<Resolution>,
}

impl ResumeProvider {
    pub fn new(source: Arc<dyn ResumeSource>, fallback: Option<Arc<ResumeData>>) -> Self {
        let (state, _) = watch::channel(Resolution::loading());
        Self {
            source,
            fallback,
            state,
        }
    }

    /// Observe status transitions, starting from `Loading`.
    pub fn subscribe(&self) -> watch::Receiver<Resolution> {
        self.state.subscribe()
    }

    pub async fn resolve(&self) -> Resolution {
        self.state.send_replace(Resolution::loading());

        let resolution = match self.source.fetch().await {
            Ok(Some(data)) => Resolution {
                data: Some(Arc::new(data.sorted())),
                status: ResolveStatus::Ready,
            },
            Ok(None) => {
                info!("Resume source returned no data, using fallback");
                self.with_fallback(ResolveStatus::Fallback)
            }
            Err(e) => {
                warn!("Resume fetch failed, using fallback: {e}");
                self.with_fallback(ResolveStatus::Error)
            }
        };

        self.state.send_replace(resolution.clone());
        resolution
    }

    fn with_fallback(&self, status: ResolveStatus) -> Resolution {
        match &self.fallback {
            Some(fallback) => Resolution {
                data: Some(Arc::clone(fallback)),
                status,
            },
            None => Resolution {
                data: None,
                status: ResolveStatus::Error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use super::*;
    use crate::dataset::resume_dataset;

    enum Reply {
        Data(ResumeData),
        NoData,
        Fail(u16),
    }

    struct StubSource {
        reply: Reply,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubSource {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl ResumeSource for StubSource {
        async fn fetch(&self) -> Result<Option<ResumeData>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.reply {
                Reply::Data(data) => Ok(Some(data.clone())),
                Reply::NoData => Ok(None),
                Reply::Fail(status) => Err(FetchError::Status { status: *status }),
            }
        }
    }

    fn remote_resume() -> ResumeData {
        let mut data = resume_dataset();
        data.personal_info.name = "Remote Person".to_string();
        data
    }

    #[tokio::test]
    async fn test_failed_fetch_resolves_to_fallback_exactly() {
        let fallback = Arc::new(resume_dataset());
        let provider = ResumeProvider::new(
            Arc::new(StubSource::new(Reply::Fail(503))),
            Some(Arc::clone(&fallback)),
        );

        let resolution = provider.resolve().await;
        assert_eq!(resolution.status, ResolveStatus::Error);
        assert_eq!(*resolution.data.unwrap(), *fallback);
    }

    #[tokio::test]
    async fn test_no_data_uses_fallback_without_error() {
        let provider = ResumeProvider::new(
            Arc::new(StubSource::new(Reply::NoData)),
            Some(Arc::new(resume_dataset())),
        );

        let resolution = provider.resolve().await;
        assert_eq!(resolution.status, ResolveStatus::Fallback);
        assert_eq!(*resolution.data.unwrap(), resume_dataset());
    }

    #[tokio::test]
    async fn test_empty_remote_section_is_not_backfilled() {
        let mut remote = remote_resume();
        remote.certifications.clear();
        let provider = ResumeProvider::new(
            Arc::new(StubSource::new(Reply::Data(remote))),
            Some(Arc::new(resume_dataset())),
        );

        let resolution = provider.resolve().await;
        assert_eq!(resolution.status, ResolveStatus::Ready);
        let data = resolution.data.unwrap();
        assert_eq!(data.personal_info.name, "Remote Person");
        assert!(data.certifications.is_empty());
    }

    #[tokio::test]
    async fn test_remote_lists_are_emitted_in_order() {
        let mut remote = remote_resume();
        remote.experience.swap(0, 1);
        remote.projects.reverse();
        let provider = ResumeProvider::new(Arc::new(StubSource::new(Reply::Data(remote))), None);

        let data = provider.resolve().await.data.unwrap();
        let exp: Vec<i32> = data.experience.iter().map(|e| e.order).collect();
        let projects: Vec<i32> = data.projects.iter().map(|p| p.order).collect();
        assert_eq!(exp, vec![1, 2, 3]);
        assert_eq!(projects, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_failure_without_fallback_has_no_data() {
        let provider = ResumeProvider::new(Arc::new(StubSource::new(Reply::NoData)), None);

        let resolution = provider.resolve().await;
        assert_eq!(resolution.status, ResolveStatus::Error);
        assert!(resolution.data.is_none());
    }

    #[tokio::test]
    async fn test_resolve_issues_exactly_one_fetch() {
        let source = Arc::new(StubSource::new(Reply::Fail(500)));
        let provider = ResumeProvider::new(source.clone(), Some(Arc::new(resume_dataset())));

        provider.resolve().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_is_loading_while_fetch_is_pending() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(StubSource {
            gate: Some(Arc::clone(&gate)),
            ..StubSource::new(Reply::Data(remote_resume()))
        });
        let provider = Arc::new(ResumeProvider::new(source.clone(), None));
        let mut updates = provider.subscribe();

        let task = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.resolve().await }
        });

        while source.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        let pending = updates.borrow().clone();
        assert_eq!(pending.status, ResolveStatus::Loading);
        assert!(pending.data.is_none());

        gate.notify_one();
        let resolution = task.await.unwrap();
        assert_eq!(resolution.status, ResolveStatus::Ready);

        updates
            .wait_for(|r| r.status == ResolveStatus::Ready)
            .await
            .unwrap();
        assert!(updates.borrow().data.is_some());
    }
}
