use super::storage::{KeyValueStore, MemoryStore};
use super::tokens::{self, TokenPair};
use crate::events::SessionEvent;
use parking_lot::RwLock;
use shared::Result;
use shared_http::api::{RefreshResponse, User};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct SessionState {
    tokens: Option<TokenPair>,
    user: Option<User>,
    /// Bumped whenever a session starts or ends; a token rotation keeps it.
    generation: u64,
}

/// A point-in-time view of the session used for compare-and-set updates
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub tokens: Option<TokenPair>,
}

/// Shared authentication state: the token pair, the resolved user, and
/// the store the pair is written through to.
///
/// Constructed once per process and handed to the HTTP client, the session
/// store and the router as an `Arc`.
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    /// Open a context over `store`, picking up any persisted token pair.
    /// No user is resolved until the session store validates the pair.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let tokens = TokenPair::load(store.as_ref())?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            store,
            state: RwLock::new(SessionState {
                tokens,
                ..Default::default()
            }),
            events,
        })
    }

    /// Context over a fresh in-memory store
    pub fn in_memory() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: Arc::new(MemoryStore::new()),
            state: RwLock::new(SessionState::default()),
            events,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.read().tokens.as_ref().map(|t| t.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state.read().tokens.as_ref().map(|t| t.refresh.clone())
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        self.state.read().tokens.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state.read();
        state.tokens.is_some() && state.user.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            generation: state.generation,
            tokens: state.tokens.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Replace the whole session after a successful login.
    pub(crate) fn start(&self, tokens: TokenPair, user: User) -> Result<()> {
        {
            let mut state = self.state.write();
            tokens.replace(self.store.as_ref(), state.tokens.as_ref())?;
            state.tokens = Some(tokens);
            state.user = Some(user.clone());
            state.generation += 1;
        }
        self.publish(SessionEvent::LoggedIn(user));
        Ok(())
    }

    /// Attach the user resolved by startup validation, unless the session
    /// changed while the validation was in flight.
    pub(crate) fn restore(&self, generation: u64, user: User) -> bool {
        {
            let mut state = self.state.write();
            if state.generation != generation || state.tokens.is_none() {
                debug!("Discarding stale session validation");
                return false;
            }
            state.user = Some(user.clone());
        }
        self.publish(SessionEvent::Restored(user));
        true
    }

    /// Store a renewed access token (and rotated refresh token, if any) for
    /// the session identified by `generation`. Returns `false` when that
    /// session is gone, in which case nothing is written.
    pub(crate) fn rotate(&self, generation: u64, refreshed: &RefreshResponse) -> Result<bool> {
        {
            let mut state = self.state.write();
            let Some(current) = state.tokens.as_ref() else {
                return Ok(false);
            };
            if state.generation != generation {
                return Ok(false);
            }

            let next = TokenPair {
                access: refreshed.access.clone(),
                refresh: refreshed
                    .refresh
                    .clone()
                    .unwrap_or_else(|| current.refresh.clone()),
            };
            next.replace(self.store.as_ref(), state.tokens.as_ref())?;
            state.tokens = Some(next);
        }
        self.publish(SessionEvent::Refreshed);
        Ok(true)
    }

    /// Tear down the session identified by `generation` after an
    /// unrecoverable refresh failure. Returns whether anything was cleared.
    pub(crate) fn expire(&self, generation: u64) -> bool {
        let cleared = self.clear_where(|state| state.generation == generation);
        if cleared {
            self.publish(SessionEvent::Expired);
        }
        cleared
    }

    /// Drop a persisted pair that failed startup validation.
    pub(crate) fn invalidate(&self, generation: u64) -> bool {
        self.clear_where(|state| state.generation == generation)
    }

    /// Unconditional teardown. Idempotent; storage failures are logged.
    pub(crate) fn end(&self) {
        if self.clear_where(|_| true) {
            self.publish(SessionEvent::LoggedOut);
        }
    }

    fn clear_where(&self, matches: impl FnOnce(&SessionState) -> bool) -> bool {
        let mut state = self.state.write();
        if !matches(&*state) {
            return false;
        }

        let had_session = state.tokens.is_some() || state.user.is_some();

        // Memory is cleared even if the store refuses
        if let Err(e) = tokens::erase(self.store.as_ref()) {
            warn!("Failed to erase stored tokens: {}", e);
        }
        state.tokens = None;
        state.user = None;
        state.generation += 1;

        had_session
    }

    fn publish(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::testing::FlakyStore;
    use crate::auth::tokens::REFRESH_KEY;
    use shared_http::api::Role;

    fn user(role: Role) -> User {
        User {
            id: 1,
            name: "Asha".to_string(),
            email: "a@b.com".to_string(),
            role,
            phone: String::new(),
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_open_reads_persisted_pair_without_user() {
        let store = Arc::new(MemoryStore::new());
        TokenPair::new("a", "r").persist(store.as_ref()).unwrap();

        let context = SessionContext::open(store).unwrap();
        assert_eq!(context.access_token().as_deref(), Some("a"));
        assert_eq!(context.refresh_token().as_deref(), Some("r"));
        assert!(context.current_user().is_none());
        assert!(!context.is_authenticated());
    }

    #[test]
    fn test_start_writes_through_and_notifies() {
        let store = Arc::new(MemoryStore::new());
        let context = SessionContext::open(store.clone()).unwrap();
        let mut events = context.subscribe();

        context
            .start(TokenPair::new("a", "r"), user(Role::User))
            .unwrap();

        assert!(context.is_authenticated());
        assert_eq!(
            TokenPair::load(store.as_ref()).unwrap(),
            Some(TokenPair::new("a", "r"))
        );
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::LoggedIn(user(Role::User))
        );
    }

    #[test]
    fn test_rotate_keeps_refresh_unless_rotated() {
        let store = Arc::new(MemoryStore::new());
        let context = SessionContext::open(store.clone()).unwrap();
        context.start(TokenPair::new("a1", "r1"), user(Role::Owner)).unwrap();
        let generation = context.snapshot().generation;

        let applied = context
            .rotate(
                generation,
                &RefreshResponse {
                    access: "a2".to_string(),
                    refresh: None,
                },
            )
            .unwrap();
        assert!(applied);
        assert_eq!(context.tokens(), Some(TokenPair::new("a2", "r1")));

        context
            .rotate(
                generation,
                &RefreshResponse {
                    access: "a3".to_string(),
                    refresh: Some("r2".to_string()),
                },
            )
            .unwrap();
        assert_eq!(
            TokenPair::load(store.as_ref()).unwrap(),
            Some(TokenPair::new("a3", "r2"))
        );
        // Rotation is not a new session
        assert_eq!(context.snapshot().generation, generation);
        assert!(context.current_user().is_some());
    }

    #[test]
    fn test_failed_write_keeps_memory_and_storage_on_one_pair() {
        let store = Arc::new(FlakyStore::failing(REFRESH_KEY, 0));
        let context = SessionContext::open(store.clone()).unwrap();
        context.start(TokenPair::new("a1", "r1"), user(Role::User)).unwrap();
        let generation = context.snapshot().generation;

        store.fail_next(1);
        assert!(context.start(TokenPair::new("a2", "r2"), user(Role::Admin)).is_err());
        assert_eq!(context.tokens(), Some(TokenPair::new("a1", "r1")));
        assert_eq!(context.current_user().unwrap().role, Role::User);
        assert_eq!(context.snapshot().generation, generation);
        assert_eq!(
            TokenPair::load(store.as_ref()).unwrap(),
            Some(TokenPair::new("a1", "r1"))
        );

        store.fail_next(1);
        let rotated = context.rotate(
            generation,
            &RefreshResponse {
                access: "a3".to_string(),
                refresh: Some("r3".to_string()),
            },
        );
        assert!(rotated.is_err());
        assert_eq!(context.tokens(), Some(TokenPair::new("a1", "r1")));
        assert_eq!(
            TokenPair::load(store.as_ref()).unwrap(),
            Some(TokenPair::new("a1", "r1"))
        );
    }

    #[test]
    fn test_rotate_after_logout_does_not_resurrect_session() {
        let context = SessionContext::in_memory();
        context.start(TokenPair::new("a1", "r1"), user(Role::User)).unwrap();
        let generation = context.snapshot().generation;

        context.end();

        let applied = context
            .rotate(
                generation,
                &RefreshResponse {
                    access: "a2".to_string(),
                    refresh: None,
                },
            )
            .unwrap();
        assert!(!applied);
        assert!(context.tokens().is_none());
    }

    #[test]
    fn test_restore_discards_stale_generation() {
        let store = Arc::new(MemoryStore::new());
        TokenPair::new("old", "old-r").persist(store.as_ref()).unwrap();
        let context = SessionContext::open(store).unwrap();
        let stale = context.snapshot().generation;

        context.start(TokenPair::new("new", "new-r"), user(Role::Admin)).unwrap();

        assert!(!context.restore(stale, user(Role::User)));
        assert_eq!(context.current_user().unwrap().role, Role::Admin);
        assert!(!context.invalidate(stale));
        assert!(context.tokens().is_some());
    }

    #[test]
    fn test_end_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let context = SessionContext::open(store.clone()).unwrap();
        context.start(TokenPair::new("a", "r"), user(Role::User)).unwrap();
        let mut events = context.subscribe();

        context.end();
        context.end();

        assert!(context.tokens().is_none());
        assert!(context.current_user().is_none());
        assert!(store.is_empty());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_expire_only_matching_generation() {
        let context = SessionContext::in_memory();
        context.start(TokenPair::new("a", "r"), user(Role::User)).unwrap();
        let generation = context.snapshot().generation;

        assert!(!context.expire(generation + 1));
        assert!(context.tokens().is_some());

        assert!(context.expire(generation));
        assert!(context.tokens().is_none());
        assert!(context.current_user().is_none());
    }
}
