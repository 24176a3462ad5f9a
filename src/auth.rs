use tokio::sync::watch;
use uuid::Uuid;

/// An authenticated session. The identity behind it owns every remote row
/// this client reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
}

/// Point-in-time view of the auth state machine.
///
/// `loading` is true until the initial session check resolves; the sync
/// layer stays inert while it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub loading: bool,
    pub session: Option<Session>,
    pub demo_mode: bool,
}

impl AuthSnapshot {
    /// True when no remote calls may be issued for this state.
    pub fn local_only(&self) -> bool {
        self.demo_mode || self.session.is_none()
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            session: None,
            demo_mode: false,
        }
    }
}

/// Auth state handle consumed by the sync layer.
///
/// The application drives this from its auth provider callbacks; the sync
/// coordinator and the stores only ever observe it. State changes are
/// published over a watch channel so the context driver can react to them.
pub struct AuthState {
    tx: watch::Sender<AuthSnapshot>,
}

impl AuthState {
    /// Starts in the loading state, before the initial session check.
    pub fn new() -> Self {
        Self {
            tx: watch::channel(AuthSnapshot::default()).0,
        }
    }

    /// Resolved state with demo mode active.
    pub fn demo() -> Self {
        let state = Self::new();
        state.set_demo_mode(true);
        state
    }

    /// Resolved state with an active session.
    pub fn signed_in(user_id: Uuid) -> Self {
        let state = Self::new();
        state.sign_in(user_id);
        state
    }

    /// Resolved state with no session and no demo mode (logged-out preview).
    pub fn anonymous() -> Self {
        let state = Self::new();
        state.sign_out();
        state
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        *self.tx.borrow()
    }

    /// Signing in always disables demo mode and resolves the loading flag.
    pub fn sign_in(&self, user_id: Uuid) {
        self.tx.send_modify(|snap| {
            snap.session = Some(Session { user_id });
            snap.demo_mode = false;
            snap.loading = false;
        });
    }

    pub fn sign_out(&self) {
        self.tx.send_modify(|snap| {
            snap.session = None;
            snap.loading = false;
        });
    }

    pub fn set_demo_mode(&self, on: bool) {
        self.tx.send_modify(|snap| {
            snap.demo_mode = on;
            snap.loading = false;
        });
    }

    /// Per-call identity lookup used by every mutation.
    ///
    /// Async because the backing provider may have to refresh a token to
    /// answer; here it reduces to reading the current snapshot.
    pub async fn current_identity(&self) -> Option<Uuid> {
        self.tx.borrow().session.map(|s| s.user_id)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading() {
        let auth = AuthState::new();
        let snap = auth.snapshot();
        assert!(snap.loading);
        assert!(snap.session.is_none());
        assert!(!snap.demo_mode);
    }

    #[test]
    fn test_sign_in_disables_demo_mode() {
        let auth = AuthState::demo();
        assert!(auth.snapshot().demo_mode);

        let user = Uuid::new_v4();
        auth.sign_in(user);

        let snap = auth.snapshot();
        assert!(!snap.demo_mode);
        assert!(!snap.loading);
        assert_eq!(snap.session, Some(Session { user_id: user }));
    }

    #[test]
    fn test_local_only_modes() {
        assert!(AuthState::demo().snapshot().local_only());
        assert!(AuthState::anonymous().snapshot().local_only());
        assert!(!AuthState::signed_in(Uuid::new_v4()).snapshot().local_only());
    }

    #[tokio::test]
    async fn test_current_identity() {
        let auth = AuthState::anonymous();
        assert!(auth.current_identity().await.is_none());

        let user = Uuid::new_v4();
        auth.sign_in(user);
        assert_eq!(auth.current_identity().await, Some(user));

        auth.sign_out();
        assert!(auth.current_identity().await.is_none());
    }

    #[test]
    fn test_subscribe_sees_changes() {
        let auth = AuthState::new();
        let rx = auth.subscribe();
        auth.sign_in(Uuid::new_v4());
        assert!(rx.has_changed().unwrap());
    }
}
