//! Visitor sessions and their storage.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::toast::Toast;
use crate::api::ApiError;
use crate::domain::{Role, User};
use crate::store::{Resource, Slice, Store};

/// Signed-in user and the backend tokens issued at login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub access: String,
    pub refresh: String,
}

/// A single visitor session.
///
/// Cheap to clone; all clones share the same state.
#[derive(Debug)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier, also the cookie value.
    id: String,
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
    auth: RwLock<Option<AuthSession>>,
    /// Pending flash messages.
    toasts: RwLock<Vec<Toast>>,
    store: RwLock<Store>,
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Session {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(SessionInner {
                id,
                created_at: now,
                last_activity: RwLock::new(now),
                auth: RwLock::new(None),
                toasts: RwLock::new(Vec::new()),
                store: RwLock::new(Store::default()),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn auth(&self) -> Option<AuthSession> {
        read(&self.inner.auth).clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        read(&self.inner.auth).as_ref().map(|auth| auth.user.clone())
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        read(&self.inner.auth).as_ref().map(|auth| auth.user.role)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        read(&self.inner.auth)
            .as_ref()
            .map(|auth| auth.access.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        read(&self.inner.auth).is_some()
    }

    /// Stores the login result. Cached lists belong to the previous identity
    /// and are dropped.
    pub fn sign_in(&self, auth: AuthSession) {
        *write(&self.inner.auth) = Some(auth);
        *write(&self.inner.store) = Store::default();
        self.touch();
    }

    /// Clears auth and cached data. Pending toasts survive so the next page
    /// can explain why.
    pub fn sign_out(&self) {
        *write(&self.inner.auth) = None;
        *write(&self.inner.store) = Store::default();
    }

    /// Replaces the cached user after a profile update.
    pub fn set_user(&self, user: User) {
        if let Some(auth) = write(&self.inner.auth).as_mut() {
            auth.user = user;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toasts
    // ─────────────────────────────────────────────────────────────────────────

    pub fn push_toast(&self, toast: Toast) {
        write(&self.inner.toasts).push(toast);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push_toast(Toast::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push_toast(Toast::error(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push_toast(Toast::info(message));
    }

    /// Whether a later request needs this session: a sign-in or toasts not
    /// yet shown.
    #[must_use]
    pub fn needs_persisting(&self) -> bool {
        self.is_authenticated() || !read(&self.inner.toasts).is_empty()
    }

    /// Drains pending toasts; each is shown once.
    #[must_use]
    pub fn take_toasts(&self) -> Vec<Toast> {
        std::mem::take(&mut *write(&self.inner.toasts))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Store
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs `f` against a read view of the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        f(&read(&self.inner.store))
    }

    pub fn update_store<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        f(&mut write(&self.inner.store))
    }

    /// Fetches into a list slice: marks it pending, awaits `fetch`, then
    /// applies `fulfilled` or `rejected`. The lock is never held across the
    /// await.
    pub async fn load<T, F, Fut>(&self, select: F, fetch: Fut) -> Result<(), ApiError>
    where
        F: Fn(&mut Store) -> &mut Slice<T>,
        Fut: Future<Output = Result<(Vec<T>, u64), ApiError>>,
    {
        self.update_store(|store| select(store).pending());
        match fetch.await {
            Ok((items, total)) => {
                self.update_store(|store| select(store).fulfilled(items, total));
                Ok(())
            }
            Err(err) => {
                let message = err.user_message();
                self.update_store(|store| select(store).rejected(message));
                Err(err)
            }
        }
    }

    /// [`Session::load`] for endpoints that return a bare list.
    pub async fn load_list<T, F, Fut>(&self, select: F, fetch: Fut) -> Result<(), ApiError>
    where
        F: Fn(&mut Store) -> &mut Slice<T>,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        self.load(select, async move {
            let items = fetch.await?;
            let total = items.len() as u64;
            Ok((items, total))
        })
        .await
    }

    /// Single-record counterpart of [`Session::load`].
    pub async fn load_one<T, F, Fut>(&self, select: F, fetch: Fut) -> Result<(), ApiError>
    where
        F: Fn(&mut Store) -> &mut Resource<T>,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.update_store(|store| select(store).pending());
        match fetch.await {
            Ok(value) => {
                self.update_store(|store| select(store).fulfilled(value));
                Ok(())
            }
            Err(err) => {
                let message = err.user_message();
                self.update_store(|store| select(store).rejected(message));
                Err(err)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expiry
    // ─────────────────────────────────────────────────────────────────────────

    /// Update the last activity timestamp.
    fn touch(&self) {
        *write(&self.inner.last_activity) = Utc::now();
    }

    /// Check if the session has been idle longer than `ttl`.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let last = *read(&self.inner.last_activity);
        // A negative span means clock skew; treat as fresh.
        (Utc::now() - last).to_std().is_ok_and(|idle| idle > ttl)
    }
}

/// Thread-safe store for sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Create and store a new session with a random ID.
    #[must_use]
    pub fn create(&self) -> Session {
        let session = Session::new(Uuid::new_v4().to_string());
        self.insert(&session);
        session
    }

    /// Stores a session handed out unstored by [`Self::get_or_create`].
    pub fn insert(&self, session: &Session) {
        write(&self.inner.sessions).insert(session.id().to_string(), session.clone());
        tracing::debug!(name: "session.created", session_id = %session.id(), "Session created");
    }

    /// Get a session by ID, refreshing its activity time.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        let session = read(&self.inner.sessions).get(id).cloned()?;
        session.touch();
        Some(session)
    }

    /// Existing session for `id`, else a fresh one that is not stored until
    /// [`Self::insert`]. Unknown ids are never adopted, so a client cannot
    /// choose its own session id.
    #[must_use]
    pub fn get_or_create(&self, id: Option<&str>) -> (Session, bool) {
        match id.and_then(|id| self.get(id)) {
            Some(session) => (session, false),
            None => (Session::new(Uuid::new_v4().to_string()), true),
        }
    }

    /// Remove a session by ID.
    pub fn remove(&self, id: &str) -> Option<Session> {
        write(&self.inner.sessions).remove(id)
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.inner.sessions).len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions idle longer than `ttl`. Returns the number removed.
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        let mut guard = write(&self.inner.sessions);
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired(ttl));
        let removed = before - guard.len();
        if removed > 0 {
            tracing::info!(name: "session.expired", removed, remaining = guard.len(), "Expired sessions purged");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::Category;
    use crate::session::ToastKind;

    fn staff_user() -> User {
        User {
            username: "sita".into(),
            role: Role::Staff,
            ..User::default()
        }
    }

    #[test]
    fn test_session_store() {
        let store = SessionStore::new();
        assert!(store.is_empty());

        let session = store.create();
        assert_eq!(store.len(), 1);

        let retrieved = store.get(session.id()).unwrap();
        assert_eq!(retrieved.id(), session.id());

        store.remove(session.id());
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_ids_get_a_fresh_session() {
        let store = SessionStore::new();
        let (session, created) = store.get_or_create(Some("forged"));
        assert!(created);
        assert_ne!(session.id(), "forged");
        store.insert(&session);

        let (again, created) = store.get_or_create(Some(session.id()));
        assert!(!created);
        assert_eq!(again.id(), session.id());
    }

    #[test]
    fn fresh_sessions_are_stored_only_with_state() {
        let store = SessionStore::new();
        let (session, created) = store.get_or_create(None);
        assert!(created);
        assert!(store.is_empty());
        assert!(!session.needs_persisting());

        session.info("Please log in to continue");
        assert!(session.needs_persisting());
        let _ = session.take_toasts();
        assert!(!session.needs_persisting());

        session.sign_in(AuthSession {
            user: staff_user(),
            access: "a".into(),
            refresh: "r".into(),
        });
        assert!(session.needs_persisting());
    }

    #[test]
    fn toasts_are_drained_once() {
        let session = Session::new("t".into());
        session.success("Saved");
        session.error("Nope");

        let toasts = session.take_toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert!(session.take_toasts().is_empty());
    }

    #[test]
    fn sign_in_and_out() {
        let session = Session::new("s".into());
        session.update_store(|store| store.categories.fulfilled(Vec::new(), 0));

        session.sign_in(AuthSession {
            user: staff_user(),
            access: "a".into(),
            refresh: "r".into(),
        });
        assert_eq!(session.role(), Some(Role::Staff));
        assert_eq!(session.access_token().as_deref(), Some("a"));
        assert!(!session.with_store(|store| store.categories.loaded));

        session.error("Session expired");
        session.sign_out();
        assert!(!session.is_authenticated());
        assert_eq!(session.take_toasts().len(), 1);
    }

    #[test]
    fn purge_keeps_active_sessions() {
        let store = SessionStore::new();
        let _session = store.create();
        assert_eq!(store.purge_expired(Duration::from_secs(60)), 0);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.purge_expired(Duration::ZERO), 1);
    }

    #[tokio::test]
    async fn load_applies_reducers() {
        let session = Session::new("l".into());

        session
            .load_list(|s| &mut s.categories, async {
                Ok(vec![Category {
                    id: 1,
                    name: "Gates".into(),
                    slug: "gates".into(),
                    description: None,
                    image: None,
                    is_active: true,
                    product_count: 0,
                    created_at: None,
                }])
            })
            .await
            .unwrap();
        session.with_store(|store| {
            assert_eq!(store.categories.total, 1);
            assert!(!store.categories.loading);
        });

        let err = session
            .load_list(|s| &mut s.categories, async {
                Err::<Vec<Category>, _>(ApiError::Api {
                    status: 500,
                    message: "Failed to fetch categories".into(),
                })
            })
            .await
            .unwrap_err();
        assert!(!err.is_unauthorized());
        session.with_store(|store| {
            assert_eq!(
                store.categories.error.as_deref(),
                Some("Failed to fetch categories")
            );
            assert_eq!(store.categories.items.len(), 1);
        });
    }
}
