//! Single-flight coordination of session refreshes.
//!
//! When several requests fail with 401 at once, only one of them performs the
//! refresh call. The others wait for that call to settle and share its
//! outcome.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::clients::errors::HttpError;

/// Shared outcome of one refresh attempt.
pub type RefreshOutcome = Result<(), Arc<HttpError>>;

type Slot = Option<watch::Receiver<Option<RefreshOutcome>>>;

/// Which role a caller took for the current refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshRole {
    /// The caller started the refresh call.
    Owner,
    /// The caller joined a refresh already in flight.
    Waiter,
}

/// Coordinates refresh calls so at most one is in flight at any time.
///
/// The in-flight slot is cleared as soon as the owned refresh settles (or its
/// future is dropped), so a later 401 starts a fresh cycle.
///
/// # Example
///
/// ```rust
/// use banthing_client::clients::RefreshCoordinator;
///
/// # tokio_test::block_on(async {
/// let coordinator = RefreshCoordinator::new();
/// let (outcome, _role) = coordinator.run(|| async { Ok(()) }).await;
/// assert!(outcome.is_ok());
/// assert!(!coordinator.in_flight());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    slot: Mutex<Slot>,
}

impl RefreshCoordinator {
    /// Creates a coordinator with no refresh in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a refresh is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.lock().is_some()
    }

    /// Joins the refresh in flight, or starts one with `refresh`.
    ///
    /// `refresh` is only invoked when no refresh is in flight. Every caller
    /// resumes only after the shared refresh has settled and receives its
    /// outcome along with the role it played.
    pub async fn run<F, Fut>(&self, refresh: F) -> (RefreshOutcome, RefreshRole)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), HttpError>>,
    {
        let joined = {
            let mut slot = self.lock();
            match slot.as_ref() {
                Some(receiver) => Err(receiver.clone()),
                None => {
                    let (sender, receiver) = watch::channel(None);
                    *slot = Some(receiver);
                    Ok(sender)
                }
            }
        };

        match joined {
            Ok(sender) => {
                let guard = SlotGuard { coordinator: self };
                let outcome = refresh().await.map_err(Arc::new);
                drop(guard);
                sender.send_replace(Some(outcome.clone()));
                (outcome, RefreshRole::Owner)
            }
            Err(mut receiver) => {
                let outcome = match receiver.wait_for(Option::is_some).await {
                    Ok(settled) => (*settled).clone().unwrap_or_else(|| Err(abandoned())),
                    Err(_) => Err(abandoned()),
                };
                (outcome, RefreshRole::Waiter)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight slot when the owning refresh settles or is dropped.
struct SlotGuard<'a> {
    coordinator: &'a RefreshCoordinator,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        *self.coordinator.lock() = None;
    }
}

fn abandoned() -> Arc<HttpError> {
    Arc::new(HttpError::RefreshAbandoned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn unauthorized() -> HttpError {
        HttpError::Response(HttpResponseError {
            code: 401,
            message: "expired".to_string(),
            error_reference: None,
            body: serde_json::json!({}),
        })
    }

    #[tokio::test]
    async fn test_single_caller_owns_refresh() {
        let coordinator = RefreshCoordinator::new();
        let (outcome, role) = coordinator.run(|| async { Ok(()) }).await;

        assert!(outcome.is_ok());
        assert_eq!(role, RefreshRole::Owner);
        assert!(!coordinator.in_flight());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                coordinator
                    .run(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(())
                    })
                    .await
            }));
        }

        let mut owners = 0;
        for handle in handles {
            let (outcome, role) = handle.await.unwrap();
            assert!(outcome.is_ok());
            if role == RefreshRole::Owner {
                owners += 1;
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(owners, 1);
        assert!(!coordinator.in_flight());
    }

    #[tokio::test]
    async fn test_waiters_receive_owner_failure() {
        let coordinator = Arc::new(RefreshCoordinator::new());

        let owner = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .run(|| async {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Err(unauthorized())
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(coordinator.in_flight());

        let (outcome, role) = coordinator.run(|| async { Ok(()) }).await;
        assert_eq!(role, RefreshRole::Waiter);
        assert_eq!(outcome.unwrap_err().status(), Some(401));

        let (owner_outcome, owner_role) = owner.await.unwrap();
        assert_eq!(owner_role, RefreshRole::Owner);
        assert!(owner_outcome.is_err());
    }

    #[tokio::test]
    async fn test_slot_is_released_for_next_cycle() {
        let coordinator = RefreshCoordinator::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let (_, role) = coordinator
                .run(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .await;
            assert_eq!(role, RefreshRole::Owner);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_dropped_owner_releases_slot_and_fails_waiters() {
        let coordinator = Arc::new(RefreshCoordinator::new());

        let owner = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .run(|| async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok(())
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let waiter = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.run(|| async { Ok(()) }).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        owner.abort();
        let (outcome, role) = waiter.await.unwrap();

        assert_eq!(role, RefreshRole::Waiter);
        assert!(outcome.is_err());
        assert!(!coordinator.in_flight());
    }
}
