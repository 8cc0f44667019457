//! Single-flight coordination of access token refreshes.

use std::collections::VecDeque;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::{oneshot, Mutex};
use tracing::debug;

use crate::error::{session_error, Error, SessionErrorKind};

/// Result every waiter receives when a refresh settles: the new access token,
/// or the error shared by all of them.
pub type RefreshOutcome = Result<SecretString, Arc<Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// This caller must start the refresh.
    Leader,
    /// A refresh is already in flight; this caller only waits.
    Follower,
}

/// A caller's place in the refresh queue.
#[derive(Debug)]
pub struct Ticket {
    role: Role,
    receiver: oneshot::Receiver<RefreshOutcome>,
}

impl Ticket {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }

    /// Waits until the refresh this ticket belongs to settles.
    pub async fn outcome(self) -> RefreshOutcome {
        self.receiver.await.unwrap_or_else(|_| {
            Err(Arc::new(session_error(
                SessionErrorKind::RefreshFailed,
                "Token refresh was abandoned before it settled",
            )))
        })
    }
}

#[derive(Debug, Default)]
struct State {
    refreshing: bool,
    queue: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Refresh-in-progress flag plus the ordered queue of callers waiting on it.
///
/// At most one refresh is outstanding per coordinator. The queue is only
/// non-empty while a refresh is outstanding, and it is drained in arrival
/// order exactly once when that refresh settles. Gateways sharing one
/// credential store must share one coordinator.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<State>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the caller and reports whether it has to lead the refresh.
    ///
    /// Checking and setting the flag happen under one lock, so two callers
    /// can never both become leader of the same refresh.
    pub async fn join(&self) -> Ticket {
        let (sender, receiver) = oneshot::channel();
        let mut state = self.state.lock().await;
        state.queue.push_back(sender);

        let role = if state.refreshing {
            Role::Follower
        } else {
            state.refreshing = true;
            Role::Leader
        };
        debug!(
            "Joined token refresh as {:?} ({} waiting)",
            role,
            state.queue.len()
        );

        Ticket { role, receiver }
    }

    /// Delivers `outcome` to every queued caller in arrival order, then clears
    /// the flag. Returns how many callers were waiting.
    ///
    /// Delivery happens while the lock is held, so no new refresh can start
    /// until every waiter of this one has its result.
    pub async fn settle(&self, outcome: RefreshOutcome) -> usize {
        let mut state = self.state.lock().await;
        let waiters = state.queue.len();

        while let Some(waiter) = state.queue.pop_front() {
            // A waiter whose caller went away has dropped its receiver.
            let _ = waiter.send(outcome.clone());
        }
        state.refreshing = false;

        waiters
    }

    pub async fn is_refreshing(&self) -> bool {
        self.state.lock().await.refreshing
    }

    /// Number of callers waiting on the current refresh.
    pub async fn pending(&self) -> usize {
        self.state.lock().await.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{http_error, ErrorKind, HttpErrorKind};
    use secrecy::ExposeSecret;

    #[tokio::test]
    async fn test_first_caller_leads_others_follow() {
        let coordinator = RefreshCoordinator::new();

        let first = coordinator.join().await;
        let second = coordinator.join().await;
        let third = coordinator.join().await;

        assert_eq!(first.role(), Role::Leader);
        assert_eq!(second.role(), Role::Follower);
        assert_eq!(third.role(), Role::Follower);
        assert!(coordinator.is_refreshing().await);
        assert_eq!(coordinator.pending().await, 3);
    }

    #[tokio::test]
    async fn test_settle_delivers_token_to_all_and_resets() {
        let coordinator = RefreshCoordinator::new();
        let tickets = vec![
            coordinator.join().await,
            coordinator.join().await,
            coordinator.join().await,
        ];

        let woken = coordinator
            .settle(Ok(SecretString::from("t2".to_string())))
            .await;

        assert_eq!(woken, 3);
        assert!(!coordinator.is_refreshing().await);
        assert_eq!(coordinator.pending().await, 0);
        for ticket in tickets {
            let token = ticket.outcome().await.unwrap();
            assert_eq!(token.expose_secret(), "t2");
        }
    }

    #[tokio::test]
    async fn test_settle_shares_one_error() {
        let coordinator = RefreshCoordinator::new();
        let first = coordinator.join().await;
        let second = coordinator.join().await;

        let error = Arc::new(http_error(HttpErrorKind::Timeout, "refresh timed out"));
        coordinator.settle(Err(error.clone())).await;

        let first = first.outcome().await.unwrap_err();
        let second = second.outcome().await.unwrap_err();
        assert!(Arc::ptr_eq(&first, &error));
        assert!(Arc::ptr_eq(&second, &error));
        assert_eq!(first.error_kind, ErrorKind::Http(HttpErrorKind::Timeout));
    }

    #[tokio::test]
    async fn test_next_refresh_gets_a_new_leader() {
        let coordinator = RefreshCoordinator::new();
        let first = coordinator.join().await;
        coordinator
            .settle(Ok(SecretString::from("t2".to_string())))
            .await;
        assert!(first.outcome().await.is_ok());

        let next = coordinator.join().await;
        assert!(next.is_leader());
    }

    #[tokio::test]
    async fn test_settle_skips_departed_waiters() {
        let coordinator = RefreshCoordinator::new();
        let leader = coordinator.join().await;
        drop(coordinator.join().await);

        let woken = coordinator
            .settle(Ok(SecretString::from("t2".to_string())))
            .await;

        assert_eq!(woken, 2);
        assert!(leader.outcome().await.is_ok());
    }

    #[tokio::test]
    async fn test_abandoned_refresh_fails_waiters() {
        let coordinator = RefreshCoordinator::new();
        let ticket = coordinator.join().await;

        // Dropping the coordinator drops every queued sender.
        drop(coordinator);

        let err = ticket.outcome().await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Session(SessionErrorKind::RefreshFailed)
        );
    }
}
