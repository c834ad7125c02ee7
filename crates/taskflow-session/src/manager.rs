//! The session manager: the client's login state machine.
//!
//! Responsibilities:
//! - Restoring a persisted session on startup, re-validated against the
//!   directory (or trusted as-is when the directory is unreachable)
//! - Logging in with email and password against the directory
//! - Logging out and clearing persisted entries
//! - Throttled persistence of user activity
//! - Expiring idle sessions when polled
//!
//! # Concurrency note
//!
//! `SessionManager` is not thread-safe by itself. The client facade owns
//! it behind a mutex and the background monitor goes through the same
//! mutex, so the state machine never sees concurrent calls.

use taskflow_directory::{Directory, find_by_email, find_by_id};
use taskflow_protocol::{Codec, JsonCodec, Member};

use crate::{
    ACTIVITY_KEY, ActivityKind, ActivityTracker, Clock, SessionConfig, SessionError,
    SessionState, SessionStore, SystemClock, USER_KEY,
};

/// Owns the current session and its persisted entries.
///
/// ## Lifecycle
///
/// ```text
/// restore() ──→ [Restoring] ──→ [Authenticated] ←── login()
///                    │                │  │
///                    ▼                │  └── record_activity()  (throttled write)
///             [Unauthenticated] ←─────┤
///                    ↑                └── check_expiry() ──→ [Expired]
///                    └──────── logout() ─────────────────────────┘
/// ```
pub struct SessionManager<D, S, C = SystemClock> {
    directory: D,
    store: S,
    clock: C,
    codec: JsonCodec,
    config: SessionConfig,
    state: SessionState,
    user: Option<Member>,
    /// Present only while authenticated.
    tracker: Option<ActivityTracker>,
}

impl<D, S> SessionManager<D, S, SystemClock>
where
    D: Directory,
    S: SessionStore,
{
    /// Creates a manager that reads the real system clock.
    pub fn with_system_clock(directory: D, store: S, config: SessionConfig) -> Self {
        Self::new(directory, store, SystemClock, config)
    }
}

impl<D, S, C> SessionManager<D, S, C>
where
    D: Directory,
    S: SessionStore,
    C: Clock,
{
    /// Creates a manager in the `Unauthenticated` state.
    ///
    /// Nothing is read from the store until [`restore`](Self::restore).
    pub fn new(directory: D, store: S, clock: C, config: SessionConfig) -> Self {
        Self {
            directory,
            store,
            clock,
            codec: JsonCodec,
            config: config.validated(),
            state: SessionState::Unauthenticated,
            user: None,
            tracker: None,
        }
    }

    // =====================================================================
    // Transitions
    // =====================================================================

    /// Restores a persisted session, if there is one worth keeping.
    ///
    /// - nothing persisted → `Unauthenticated`
    /// - idle longer than the timeout → entries cleared, `Unauthenticated`
    /// - otherwise the cached id is looked up in the directory:
    ///   found → `Authenticated` with the directory's record; missing →
    ///   cleared, `Unauthenticated`; directory unreachable →
    ///   `Authenticated` with the cached record (fail open)
    ///
    /// A session with no persisted timestamp skips the idle check.
    /// Returns the state the manager settled in.
    pub async fn restore(&mut self) -> SessionState {
        self.state = SessionState::Restoring;
        self.user = None;
        self.tracker = None;

        let raw_user = match self.store.get(USER_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session");
                None
            }
        };
        let Some(raw_user) = raw_user else {
            tracing::debug!("no stored session");
            return self.settle_unauthenticated();
        };

        let cached = match self.decode_member(&raw_user) {
            Ok(member) => member,
            Err(e) => {
                tracing::warn!(error = %e, "stored session is malformed, discarding");
                self.clear_persisted();
                return self.settle_unauthenticated();
            }
        };

        let now = self.clock.now_ms();
        if let Some(last_activity) = self.read_activity() {
            let idle_ms = now.saturating_sub(last_activity);
            if idle_ms > self.config.timeout_ms() {
                tracing::info!(
                    member_id = %cached.id,
                    idle_ms,
                    timeout_ms = self.config.timeout_ms(),
                    "stored session expired"
                );
                return self.expire();
            }
        }

        match self.directory.get_members().await {
            Ok(members) => match find_by_id(&members, &cached.id) {
                Some(fresh) => {
                    let fresh = fresh.clone();
                    if let Err(e) = self.persist_user(&fresh) {
                        tracing::warn!(error = %e, "could not refresh cached member");
                    }
                    tracing::info!(member_id = %fresh.id, "session restored");
                    self.enter_authenticated(fresh, now);
                }
                None => {
                    tracing::info!(
                        member_id = %cached.id,
                        "stored member no longer in directory, logging out"
                    );
                    self.clear_persisted();
                    self.settle_unauthenticated();
                }
            },
            Err(e) => {
                tracing::warn!(
                    member_id = %cached.id,
                    error = %e,
                    "directory unavailable, restoring cached session"
                );
                self.enter_authenticated(cached, now);
            }
        }

        self.state
    }

    /// Attempts to log in with an email and plaintext password.
    ///
    /// The email must match exactly (case-sensitive, no trimming) and the
    /// password must equal the directory's stored value. On success the
    /// member and the current time are persisted.
    ///
    /// Returns `false` for an unknown email, a wrong password, an
    /// unreachable directory, or a store that refuses the write; the
    /// caller can't tell these apart. On `false` the state and the
    /// persisted entries are left as they were, unless a partial write
    /// could not be rolled back; then the session is cleared entirely.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let members = match self.directory.get_members().await {
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(error = %e, "login failed: directory unavailable");
                return false;
            }
        };

        let member = match find_by_email(&members, email) {
            Some(found) if found.password == password => found.clone(),
            _ => {
                tracing::info!("login rejected: invalid credentials");
                return false;
            }
        };

        let now = self.clock.now_ms();
        if let Err(e) = self.persist_session(&member, now) {
            tracing::warn!(member_id = %member.id, error = %e, "login failed: could not persist session");
            return false;
        }

        tracing::info!(member_id = %member.id, "session created");
        self.enter_authenticated(member, now);
        true
    }

    /// Logs out: clears both persisted entries and forgets the member.
    ///
    /// Idempotent; logging out twice leaves the same state as once.
    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            tracing::info!(member_id = %user.id, "logged out");
        }
        self.clear_persisted();
        self.settle_unauthenticated();
    }

    /// Records a user-activity signal.
    ///
    /// Ignored unless authenticated. The persisted timestamp is rewritten
    /// (with the current time) at most once per write interval.
    /// Returns `true` if this call wrote the timestamp.
    pub fn record_activity(&mut self, kind: ActivityKind) -> bool {
        if !self.state.is_authenticated() {
            tracing::trace!(%kind, "activity ignored while logged out");
            return false;
        }
        let now = self.clock.now_ms();
        let Some(tracker) = self.tracker.as_mut() else {
            return false;
        };
        if !tracker.observe(now) {
            return false;
        }

        match self.write_activity(now) {
            Ok(()) => {
                tracing::debug!(%kind, at = now, "activity timestamp persisted");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not persist activity timestamp");
                false
            }
        }
    }

    /// The background poll body: expires the session if the persisted
    /// timestamp is older than the inactivity timeout.
    ///
    /// A missing timestamp is not treated as expiry. Returns `true` if
    /// this call logged the user out.
    pub fn check_expiry(&mut self) -> bool {
        if !self.state.is_authenticated() {
            return false;
        }
        let Some(last_activity) = self.read_activity() else {
            return false;
        };

        let idle_ms = self.clock.now_ms().saturating_sub(last_activity);
        if idle_ms <= self.config.timeout_ms() {
            tracing::trace!(idle_ms, "session still fresh");
            return false;
        }

        tracing::info!(
            member_id = ?self.user.as_ref().map(|u| &u.id),
            idle_ms,
            "session expired after inactivity"
        );
        self.expire();
        true
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// Current state of the machine.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `true` only while `Authenticated`.
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// The logged-in member, if any.
    pub fn current_user(&self) -> Option<&Member> {
        self.user.as_ref()
    }

    /// When activity was last observed in memory (epoch ms), while
    /// authenticated. May be newer than the persisted timestamp.
    pub fn last_seen(&self) -> Option<u64> {
        self.tracker.as_ref().map(ActivityTracker::last_seen_ms)
    }

    /// The persisted last-activity timestamp, if readable.
    pub fn persisted_activity(&self) -> Option<u64> {
        self.read_activity()
    }

    /// The effective (validated) configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The directory this manager checks identities against.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    // =====================================================================
    // Internals
    // =====================================================================

    fn enter_authenticated(&mut self, member: Member, now: u64) {
        if let Err(e) = self.write_activity(now) {
            tracing::warn!(error = %e, "could not persist activity timestamp");
        }
        self.user = Some(member);
        self.tracker = Some(ActivityTracker::new(self.config.activity_write_interval, now));
        self.state = SessionState::Authenticated;
    }

    fn settle_unauthenticated(&mut self) -> SessionState {
        self.user = None;
        self.tracker = None;
        self.state = SessionState::Unauthenticated;
        self.state
    }

    fn expire(&mut self) -> SessionState {
        self.state = SessionState::Expired;
        self.clear_persisted();
        self.settle_unauthenticated()
    }

    fn decode_member(&self, raw: &str) -> Result<Member, SessionError> {
        let member: Member = self.codec.decode(raw)?;
        member.validate()?;
        Ok(member)
    }

    fn persist_user(&mut self, member: &Member) -> Result<(), SessionError> {
        let encoded = self.codec.encode(member)?;
        self.store.set(USER_KEY, &encoded)?;
        Ok(())
    }

    /// Writes both entries, or rolls back to what was stored before.
    ///
    /// If the rollback itself fails, the stored session is unusable: both
    /// entries are cleared and the manager drops to `Unauthenticated`, so
    /// memory never claims a session that storage can't expire.
    fn persist_session(&mut self, member: &Member, now: u64) -> Result<(), SessionError> {
        let previous = [USER_KEY, ACTIVITY_KEY].map(|key| (key, self.store.get(key).ok().flatten()));
        let result = self
            .persist_user(member)
            .and_then(|()| self.write_activity(now));
        if result.is_err() && !self.restore_entries(&previous) {
            tracing::warn!("could not roll back session entries, clearing session");
            self.clear_persisted();
            self.settle_unauthenticated();
        }
        result
    }

    /// Puts each key back to its previous value. Returns `false` if any
    /// key could not be restored.
    fn restore_entries(&mut self, previous: &[(&str, Option<String>)]) -> bool {
        let mut restored = true;
        for (key, value) in previous {
            if self.store.get(key).ok().flatten() == *value {
                continue;
            }
            let result = match value {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(e) = result {
                tracing::warn!(key = *key, error = %e, "could not restore session entry");
                restored = false;
            }
        }
        restored
    }

    fn write_activity(&mut self, now: u64) -> Result<(), SessionError> {
        self.store.set(ACTIVITY_KEY, &now.to_string())?;
        Ok(())
    }

    fn read_activity(&self) -> Option<u64> {
        let raw = match self.store.get(ACTIVITY_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read activity timestamp");
                return None;
            }
        };
        match parse_timestamp(&raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable activity timestamp");
                None
            }
        }
    }

    fn clear_persisted(&mut self) {
        for key in [USER_KEY, ACTIVITY_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "could not clear session entry");
            }
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<u64, SessionError> {
    raw.trim()
        .parse()
        .map_err(|_| SessionError::InvalidTimestamp(raw.to_string()))
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`.
    //!
    //! Naming: `test_{function}_{scenario}_{expected}`.
    //!
    //! Time never passes on its own here: every manager reads a
    //! `ManualClock` that the test advances explicitly.

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use taskflow_directory::DirectoryError;
    use taskflow_protocol::MemberId;

    use super::*;
    use crate::{ManualClock, MemoryStore, StoreError};

    const T0: u64 = 1_700_000_000_000;
    const HOUR: u64 = 3_600_000;

    // -- Helpers ----------------------------------------------------------

    /// A directory whose availability can be toggled and whose calls are
    /// counted.
    #[derive(Clone, Default)]
    struct FakeDirectory {
        members: Arc<Vec<Member>>,
        offline: Arc<AtomicBool>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeDirectory {
        fn with(members: Vec<Member>) -> Self {
            Self {
                members: Arc::new(members),
                ..Self::default()
            }
        }

        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Directory for FakeDirectory {
        async fn get_members(&self) -> Result<Vec<Member>, DirectoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(DirectoryError::Unreachable("connection refused".into()));
            }
            Ok(self.members.as_ref().clone())
        }
    }

    /// A store that counts writes and can be told to fail them.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: usize,
        fail_writes: bool,
        /// Refuse every write once this many have succeeded.
        fail_after: Option<usize>,
    }

    impl SessionStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes || self.fail_after.is_some_and(|n| self.writes >= n) {
                return Err(StoreError::Io {
                    path: "quota".into(),
                    source: std::io::Error::other("quota exceeded"),
                });
            }
            self.writes += 1;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn ada() -> Member {
        Member {
            id: MemberId::from("1"),
            email: "a@x.com".into(),
            password: "p".into(),
            name: "Ada".into(),
            avatar_url: String::new(),
            role: "admin".into(),
        }
    }

    fn manager(
        directory: FakeDirectory,
        store: CountingStore,
    ) -> (SessionManager<FakeDirectory, CountingStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new(T0);
        let mgr = SessionManager::new(directory, store, clock.clone(), SessionConfig::default());
        (mgr, clock)
    }

    /// A store that already holds a session for `member`, last active at `ts`.
    fn persisted(member: &Member, ts: Option<u64>) -> CountingStore {
        let mut store = CountingStore::default();
        store
            .inner
            .set(USER_KEY, &JsonCodec.encode(member).unwrap())
            .unwrap();
        if let Some(ts) = ts {
            store.inner.set(ACTIVITY_KEY, &ts.to_string()).unwrap();
        }
        store
    }

    fn stored(mgr: &SessionManager<FakeDirectory, CountingStore, ManualClock>, key: &str) -> Option<String> {
        mgr.store().get(key).unwrap()
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[tokio::test]
    async fn test_login_valid_credentials_authenticates_and_persists() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());

        assert!(mgr.login("a@x.com", "p").await);

        assert_eq!(mgr.state(), SessionState::Authenticated);
        assert_eq!(mgr.current_user().unwrap().id, MemberId::from("1"));
        let user: Member = JsonCodec.decode(&stored(&mgr, USER_KEY).unwrap()).unwrap();
        assert_eq!(user.id, MemberId::from("1"));
        assert_eq!(stored(&mgr, ACTIVITY_KEY).as_deref(), Some(T0.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_login_wrong_password_returns_false_and_writes_nothing() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());

        assert!(!mgr.login("a@x.com", "wrong").await);

        assert_eq!(mgr.state(), SessionState::Unauthenticated);
        assert!(mgr.current_user().is_none());
        assert_eq!(mgr.store().writes, 0);
    }

    #[tokio::test]
    async fn test_login_unknown_email_returns_false() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        assert!(!mgr.login("nobody@x.com", "p").await);
        assert!(!mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_email_differs_in_case_returns_false() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        assert!(!mgr.login("A@X.COM", "p").await);
        assert!(!mgr.login("a@x.com ", "p").await);
    }

    #[tokio::test]
    async fn test_login_directory_offline_returns_false() {
        let directory = FakeDirectory::with(vec![ada()]);
        directory.go_offline();
        let (mut mgr, _clock) = manager(directory, CountingStore::default());

        assert!(!mgr.login("a@x.com", "p").await);
        assert_eq!(mgr.state(), SessionState::Unauthenticated);
        assert_eq!(mgr.store().writes, 0);
    }

    #[tokio::test]
    async fn test_login_store_refuses_write_returns_false_and_leaves_no_half_session() {
        let store = CountingStore {
            fail_writes: true,
            ..CountingStore::default()
        };
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), store);

        assert!(!mgr.login("a@x.com", "p").await);

        assert!(!mgr.is_authenticated());
        assert!(stored(&mgr, USER_KEY).is_none());
        assert!(stored(&mgr, ACTIVITY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_login_while_authenticated_store_fails_keeps_consistent_session() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        assert!(mgr.login("a@x.com", "p").await);
        let user_before = stored(&mgr, USER_KEY);

        clock.advance(Duration::from_secs(5 * 60));
        mgr.store.fail_writes = true;
        assert!(!mgr.login("a@x.com", "p").await);

        // Still logged in, with the entries of the first login intact.
        assert!(mgr.is_authenticated());
        assert_eq!(stored(&mgr, USER_KEY), user_before);
        assert_eq!(mgr.persisted_activity(), Some(T0));

        // The session still expires on schedule.
        clock.advance(Duration::from_secs(10 * 3600));
        assert!(mgr.check_expiry());
        assert_eq!(mgr.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_login_failed_rollback_drops_session() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        assert!(mgr.login("a@x.com", "p").await);
        let older = Member {
            name: "Ada (cached)".into(),
            ..ada()
        };
        mgr.store
            .inner
            .set(USER_KEY, &JsonCodec.encode(&older).unwrap())
            .unwrap();
        // The user write lands; the activity write and the rollback don't.
        mgr.store.fail_after = Some(mgr.store.writes + 1);

        assert!(!mgr.login("a@x.com", "p").await);

        assert!(!mgr.is_authenticated());
        assert!(mgr.current_user().is_none());
        assert!(stored(&mgr, USER_KEY).is_none());
        assert!(stored(&mgr, ACTIVITY_KEY).is_none());
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[tokio::test]
    async fn test_logout_clears_entries_and_user() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;

        mgr.logout();

        assert_eq!(mgr.state(), SessionState::Unauthenticated);
        assert!(mgr.current_user().is_none());
        assert!(mgr.last_seen().is_none());
        assert!(stored(&mgr, USER_KEY).is_none());
        assert!(stored(&mgr, ACTIVITY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_logout_twice_equals_once() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;

        mgr.logout();
        let after_one = (mgr.state(), mgr.store().inner.len());
        mgr.logout();
        let after_two = (mgr.state(), mgr.store().inner.len());

        assert_eq!(after_one, after_two);
        assert_eq!(after_two, (SessionState::Unauthenticated, 0));
    }

    // =====================================================================
    // restore()
    // =====================================================================

    #[tokio::test]
    async fn test_restore_nothing_stored_is_unauthenticated() {
        let directory = FakeDirectory::with(vec![ada()]);
        let (mut mgr, _clock) = manager(directory.clone(), CountingStore::default());

        assert_eq!(mgr.restore().await, SessionState::Unauthenticated);
        assert_eq!(directory.calls(), 0, "no need to ask the directory");
    }

    #[tokio::test]
    async fn test_restore_recent_session_revalidates_and_refreshes_timestamp() {
        let directory = FakeDirectory::with(vec![ada()]);
        let (mut mgr, clock) = manager(directory.clone(), persisted(&ada(), Some(T0 - 1_000)));
        clock.advance(Duration::from_millis(10));

        assert_eq!(mgr.restore().await, SessionState::Authenticated);

        assert_eq!(directory.calls(), 1);
        assert_eq!(mgr.persisted_activity(), Some(T0 + 10));
    }

    #[tokio::test]
    async fn test_restore_adopts_directory_record_over_cache() {
        let mut stale = ada();
        stale.name = "Old Name".into();
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), persisted(&stale, Some(T0)));

        mgr.restore().await;

        assert_eq!(mgr.current_user().unwrap().name, "Ada");
        let cached: Member = JsonCodec.decode(&stored(&mgr, USER_KEY).unwrap()).unwrap();
        assert_eq!(cached.name, "Ada");
    }

    #[tokio::test]
    async fn test_restore_expired_session_clears_and_skips_directory() {
        let directory = FakeDirectory::with(vec![ada()]);
        let (mut mgr, _clock) = manager(directory.clone(), persisted(&ada(), Some(T0 - 2 * HOUR)));

        assert_eq!(mgr.restore().await, SessionState::Unauthenticated);

        assert_eq!(directory.calls(), 0);
        assert!(stored(&mgr, USER_KEY).is_none());
        assert!(stored(&mgr, ACTIVITY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_restore_exactly_at_timeout_is_still_valid() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), persisted(&ada(), Some(T0 - HOUR)));
        assert_eq!(mgr.restore().await, SessionState::Authenticated);
    }

    #[tokio::test]
    async fn test_restore_one_ms_past_timeout_expires() {
        let (mut mgr, _clock) =
            manager(FakeDirectory::with(vec![ada()]), persisted(&ada(), Some(T0 - HOUR - 1)));
        assert_eq!(mgr.restore().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_restore_expired_session_with_directory_offline_is_unauthenticated() {
        let directory = FakeDirectory::with(vec![ada()]);
        directory.go_offline();
        let (mut mgr, _clock) = manager(directory, persisted(&ada(), Some(T0 - 2 * HOUR)));

        assert_eq!(mgr.restore().await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_restore_member_removed_from_directory_logs_out() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![]), persisted(&ada(), Some(T0)));

        assert_eq!(mgr.restore().await, SessionState::Unauthenticated);
        assert!(stored(&mgr, USER_KEY).is_none());
        assert!(stored(&mgr, ACTIVITY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_restore_directory_offline_fails_open_with_cached_member() {
        let directory = FakeDirectory::with(vec![]);
        directory.go_offline();
        let (mut mgr, _clock) = manager(directory, persisted(&ada(), Some(T0 - 1_000)));

        assert_eq!(mgr.restore().await, SessionState::Authenticated);

        assert_eq!(mgr.current_user().unwrap().email, "a@x.com");
        assert_eq!(mgr.persisted_activity(), Some(T0));
    }

    #[tokio::test]
    async fn test_restore_without_timestamp_takes_legacy_path() {
        let directory = FakeDirectory::with(vec![ada()]);
        let (mut mgr, _clock) = manager(directory.clone(), persisted(&ada(), None));

        assert_eq!(mgr.restore().await, SessionState::Authenticated);

        assert_eq!(directory.calls(), 1);
        assert_eq!(mgr.persisted_activity(), Some(T0));
    }

    #[tokio::test]
    async fn test_restore_malformed_user_is_discarded() {
        let mut store = CountingStore::default();
        store.inner.set(USER_KEY, "{definitely not json").unwrap();
        store.inner.set(ACTIVITY_KEY, &T0.to_string()).unwrap();
        let directory = FakeDirectory::with(vec![ada()]);
        let (mut mgr, _clock) = manager(directory.clone(), store);

        assert_eq!(mgr.restore().await, SessionState::Unauthenticated);

        assert_eq!(directory.calls(), 0);
        assert!(stored(&mgr, USER_KEY).is_none());
        assert!(stored(&mgr, ACTIVITY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_restore_unparsable_timestamp_is_treated_as_absent() {
        let mut store = persisted(&ada(), None);
        store.inner.set(ACTIVITY_KEY, "yesterday").unwrap();
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), store);

        assert_eq!(mgr.restore().await, SessionState::Authenticated);
        assert_eq!(mgr.persisted_activity(), Some(T0));
    }

    // =====================================================================
    // record_activity()
    // =====================================================================

    #[tokio::test]
    async fn test_record_activity_logged_out_is_ignored() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        clock.advance(Duration::from_secs(3600));

        assert!(!mgr.record_activity(ActivityKind::Click));
        assert_eq!(mgr.store().writes, 0);
    }

    #[tokio::test]
    async fn test_record_activity_burst_writes_at_most_once_per_interval() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;
        let writes_after_login = mgr.store().writes;

        for kind in ActivityKind::ALL.iter().cycle().take(400) {
            clock.advance(Duration::from_millis(149));
            mgr.record_activity(*kind);
        }
        // 400 × 149 ms = 59.6 s: still inside the first window.
        assert_eq!(mgr.store().writes, writes_after_login);

        clock.advance(Duration::from_millis(400));
        assert!(mgr.record_activity(ActivityKind::PointerMove));
        assert!(!mgr.record_activity(ActivityKind::PointerMove));
        assert_eq!(mgr.store().writes, writes_after_login + 1);
    }

    #[tokio::test]
    async fn test_record_activity_writes_current_time() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;

        clock.advance(Duration::from_secs(90));
        assert!(mgr.record_activity(ActivityKind::KeyPress));

        assert_eq!(mgr.persisted_activity(), Some(T0 + 90_000));
        assert_eq!(mgr.last_seen(), Some(T0 + 90_000));
    }

    #[tokio::test]
    async fn test_record_activity_updates_last_seen_without_writing() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;

        clock.advance(Duration::from_secs(5));
        assert!(!mgr.record_activity(ActivityKind::Scroll));

        assert_eq!(mgr.last_seen(), Some(T0 + 5_000));
        assert_eq!(mgr.persisted_activity(), Some(T0));
    }

    // =====================================================================
    // check_expiry()
    // =====================================================================

    #[tokio::test]
    async fn test_check_expiry_fresh_session_stays() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;

        clock.advance(Duration::from_secs(59 * 60));

        assert!(!mgr.check_expiry());
        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_check_expiry_idle_past_timeout_logs_out() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;

        clock.advance(Duration::from_millis(HOUR + 1));

        assert!(mgr.check_expiry());
        assert_eq!(mgr.state(), SessionState::Unauthenticated);
        assert!(stored(&mgr, USER_KEY).is_none());
        assert!(stored(&mgr, ACTIVITY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_check_expiry_activity_keeps_session_alive() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;

        // Active every 30 minutes for three hours.
        for _ in 0..6 {
            clock.advance(Duration::from_secs(30 * 60));
            mgr.record_activity(ActivityKind::Click);
            assert!(!mgr.check_expiry());
        }
        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_check_expiry_missing_timestamp_is_not_expiry() {
        let (mut mgr, clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        mgr.login("a@x.com", "p").await;
        // Another writer cleared the timestamp.
        let _ = mgr.store.remove(ACTIVITY_KEY);

        clock.advance(Duration::from_millis(3 * HOUR));

        assert!(!mgr.check_expiry());
        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_check_expiry_logged_out_is_noop() {
        let (mut mgr, _clock) = manager(FakeDirectory::with(vec![ada()]), CountingStore::default());
        assert!(!mgr.check_expiry());
    }

    // =====================================================================
    // Full lifecycle
    // =====================================================================

    #[tokio::test]
    async fn test_full_lifecycle_login_restart_restore_expire() {
        let directory = FakeDirectory::with(vec![ada()]);
        let (mut first, clock) = manager(directory.clone(), CountingStore::default());
        assert!(first.login("a@x.com", "p").await);

        // "Restart": a new manager over the same persisted entries.
        let mut store = CountingStore::default();
        for key in [USER_KEY, ACTIVITY_KEY] {
            store.inner.set(key, &stored(&first, key).unwrap()).unwrap();
        }
        let mut second = SessionManager::new(directory, store, clock.clone(), SessionConfig::default());
        clock.advance(Duration::from_secs(10 * 60));
        assert_eq!(second.restore().await, SessionState::Authenticated);

        clock.advance(Duration::from_millis(HOUR + 1));
        assert!(second.check_expiry());
        assert!(!second.is_authenticated());
    }
}
