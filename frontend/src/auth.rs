//! Session state, backed by browser local storage.
//!
//! The original app scattered `localStorage` reads across every screen; here
//! the session is one explicit object injected through context, with a typed
//! accessor per stored field. Presence of the admin key alone gates the
//! admin UI, which is a convenience and not a security boundary: the server
//! re-validates every call, and the expiry recorded next to the user token
//! is advisory only.

use std::sync::Arc;

use leptos::prelude::{RwSignal, Update, provide_context, use_context};
use myflood_shared::{
    KEY_ADMIN_KEY, KEY_ADMIN_NAME, KEY_AUTH_TOKEN, KEY_TOKEN_EXPIRATION, KEY_USER_EMAIL,
    KEY_USER_FULL_NAME, KEY_USER_ID, KEY_USER_IMG, HEADER_ADMIN_KEY, Role,
    protocol::LoginResponse,
};

// =========================================================
// Storage and clock seams
// =========================================================

/// Flat string key/value store. The browser implementation is local
/// storage; tests substitute an in-memory map.
///
/// `Send + Sync` so the session can live in Leptos context; the browser
/// build is single-threaded and only ever touches it from the main thread.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub struct LocalSession;

impl SessionStore for LocalSession {
    fn get(&self, key: &str) -> Option<String> {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::get::<String>(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        use gloo_storage::Storage;
        let _ = gloo_storage::LocalStorage::set(key, value.to_string());
    }

    fn remove(&self, key: &str) {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::delete(key);
    }
}

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64;
}

pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

// =========================================================
// Session accessors
// =========================================================

const ALL_KEYS: [&str; 8] = [
    KEY_AUTH_TOKEN,
    KEY_TOKEN_EXPIRATION,
    KEY_ADMIN_KEY,
    KEY_ADMIN_NAME,
    KEY_USER_EMAIL,
    KEY_USER_FULL_NAME,
    KEY_USER_IMG,
    KEY_USER_ID,
];

pub struct Session {
    store: Box<dyn SessionStore>,
    clock: Box<dyn Clock>,
}

impl Session {
    pub fn new(store: impl SessionStore + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            store: Box::new(store),
            clock: Box::new(clock),
        }
    }

    pub fn browser() -> Self {
        Self::new(LocalSession, JsClock)
    }

    // ---- user token ----

    pub fn save_token(&self, token: &str, expires_in_secs: f64) {
        self.store.set(KEY_AUTH_TOKEN, token);
        let expires_at = self.clock.now_ms() + expires_in_secs * 1000.0;
        self.store.set(KEY_TOKEN_EXPIRATION, &expires_at.to_string());
    }

    /// Returns the stored token, clearing all auth state first when the
    /// locally recorded expiration has passed.
    pub fn token(&self) -> Option<String> {
        let token = self.store.get(KEY_AUTH_TOKEN)?;
        if let Some(expiration) = self.store.get(KEY_TOKEN_EXPIRATION) {
            if let Ok(expires_at) = expiration.parse::<f64>() {
                if self.clock.now_ms() > expires_at {
                    self.clear_auth();
                    return None;
                }
            }
        }
        Some(token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn auth_header(&self) -> Option<(String, String)> {
        self.token()
            .map(|token| ("Authorization".to_string(), format!("Bearer {}", token)))
    }

    // ---- admin session ----

    pub fn save_admin_info(&self, admin_key: &str, admin_name: &str) {
        self.store.set(KEY_ADMIN_KEY, admin_key);
        self.store.set(KEY_ADMIN_NAME, admin_name);
    }

    pub fn admin_key(&self) -> Option<String> {
        self.store.get(KEY_ADMIN_KEY)
    }

    pub fn admin_name(&self) -> Option<String> {
        self.store.get(KEY_ADMIN_NAME)
    }

    pub fn admin_header(&self) -> Option<(String, String)> {
        self.admin_key()
            .map(|key| (HEADER_ADMIN_KEY.to_string(), key))
    }

    // ---- user profile ----

    pub fn save_user_profile(
        &self,
        email: &str,
        full_name: Option<&str>,
        img: Option<&str>,
        user_id: Option<&str>,
    ) {
        self.store.set(KEY_USER_EMAIL, email);
        if let Some(full_name) = full_name {
            self.store.set(KEY_USER_FULL_NAME, full_name);
        }
        if let Some(img) = img {
            self.store.set(KEY_USER_IMG, img);
        }
        if let Some(user_id) = user_id {
            self.store.set(KEY_USER_ID, user_id);
        }
    }

    pub fn user_email(&self) -> Option<String> {
        self.store.get(KEY_USER_EMAIL)
    }

    pub fn user_full_name(&self) -> Option<String> {
        self.store.get(KEY_USER_FULL_NAME)
    }

    pub fn user_img(&self) -> Option<String> {
        self.store.get(KEY_USER_IMG)
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.get(KEY_USER_ID)
    }

    pub fn clear_auth(&self) {
        for key in ALL_KEYS {
            self.store.remove(key);
        }
    }
}

/// Applies a successful login response to the session.
///
/// A response carrying a role the client does not recognize is rejected
/// before anything is written, so a garbled login leaves no session state
/// behind.
pub fn apply_login_success(session: &Session, resp: &LoginResponse) -> Result<Role, String> {
    let role = Role::from_wire(&resp.role)
        .ok_or_else(|| format!("Login returned an unrecognized role \"{}\".", resp.role))?;
    if let Some(token) = &resp.token {
        session.save_token(token, resp.expires_in.unwrap_or(3600.0));
    }
    session.save_user_profile(
        &resp.email,
        resp.full_name.as_deref(),
        resp.img.as_deref(),
        resp.user_id.as_deref(),
    );
    Ok(role)
}

// =========================================================
// Leptos context plumbing
// =========================================================

#[derive(Clone)]
pub struct SessionCtx(pub Arc<Session>);

pub fn provide_session(session: Arc<Session>) {
    provide_context(SessionCtx(session));
}

pub fn use_session() -> Arc<Session> {
    use_context::<SessionCtx>()
        .expect("SessionCtx should be provided at the app root")
        .0
}

/// Storage itself is not reactive, so views that depend on login state read
/// this version signal and anything that changes the session bumps it.
#[derive(Clone, Copy)]
pub struct SessionVersion(pub RwSignal<u32>);

impl SessionVersion {
    pub fn bump(&self) {
        self.0.update(|v| *v = v.wrapping_add(1));
    }
}

pub fn provide_session_version() -> SessionVersion {
    let version = SessionVersion(RwSignal::new(0));
    provide_context(version);
    version
}

pub fn use_session_version() -> SessionVersion {
    use_context::<SessionVersion>().expect("SessionVersion should be provided at the app root")
}

// =========================================================
// Test doubles
// =========================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store; clones share the same map so tests can inspect
    /// what the session wrote.
    #[derive(Clone, Default)]
    pub struct MemorySession {
        map: Arc<Mutex<HashMap<String, String>>>,
    }

    impl MemorySession {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.map.lock().unwrap().len()
        }

        pub fn raw_get(&self, key: &str) -> Option<String> {
            self.map.lock().unwrap().get(key).cloned()
        }
    }

    impl SessionStore for MemorySession {
        fn get(&self, key: &str) -> Option<String> {
            self.map.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.map
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.map.lock().unwrap().remove(key);
        }
    }

    #[derive(Clone, Default)]
    pub struct FixedClock(pub Arc<Mutex<f64>>);

    impl FixedClock {
        pub fn at(now_ms: f64) -> Self {
            Self(Arc::new(Mutex::new(now_ms)))
        }

        pub fn advance_secs(&self, secs: f64) {
            *self.0.lock().unwrap() += secs * 1000.0;
        }
    }

    impl Clock for FixedClock {
        fn now_ms(&self) -> f64 {
            *self.0.lock().unwrap()
        }
    }

    pub fn test_session() -> (MemorySession, FixedClock, Arc<Session>) {
        let store = MemorySession::new();
        let clock = FixedClock::at(1_700_000_000_000.0);
        let session = Arc::new(Session::new(store.clone(), clock.clone()));
        (store, clock, session)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::test_session;
    use super::*;

    #[test]
    fn token_survives_until_expiry_then_clears() {
        let (store, clock, session) = test_session();
        session.save_token("tok-1", 60.0);
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert!(session.is_authenticated());

        clock.advance_secs(61.0);
        assert_eq!(session.token(), None);
        // Expiry clears storage, not just the return value.
        assert_eq!(store.raw_get(KEY_AUTH_TOKEN), None);
        assert_eq!(store.raw_get(KEY_TOKEN_EXPIRATION), None);
    }

    #[test]
    fn auth_header_is_bearer() {
        let (_, _, session) = test_session();
        assert_eq!(session.auth_header(), None);
        session.save_token("tok-2", 60.0);
        assert_eq!(
            session.auth_header(),
            Some(("Authorization".to_string(), "Bearer tok-2".to_string()))
        );
    }

    #[test]
    fn admin_header_uses_admin_key() {
        let (_, _, session) = test_session();
        session.save_admin_info("key-9", "nadia");
        assert_eq!(
            session.admin_header(),
            Some((HEADER_ADMIN_KEY.to_string(), "key-9".to_string()))
        );
        assert_eq!(session.admin_name().as_deref(), Some("nadia"));
    }

    #[test]
    fn clear_auth_wipes_every_key() {
        let (store, _, session) = test_session();
        session.save_token("tok", 60.0);
        session.save_admin_info("key", "name");
        session.save_user_profile("a@b.co", Some("Aminah"), None, Some("U1"));
        assert!(store.len() > 0);
        session.clear_auth();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn unrecognized_login_role_writes_nothing() {
        let (store, _, session) = test_session();
        let resp = LoginResponse {
            email: "a@b.co".into(),
            role: "superhero".into(),
            full_name: Some("Aminah".into()),
            img: None,
            user_id: Some("U1".into()),
            token: Some("tok".into()),
            expires_in: Some(3600.0),
        };
        assert!(apply_login_success(&session, &resp).is_err());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn login_success_stores_profile_and_token() {
        let (store, _, session) = test_session();
        let resp = LoginResponse {
            email: "a@b.co".into(),
            role: "expert".into(),
            full_name: Some("Dr. Lim".into()),
            img: None,
            user_id: None,
            token: Some("tok".into()),
            expires_in: Some(60.0),
        };
        assert_eq!(apply_login_success(&session, &resp), Ok(Role::Expert));
        assert_eq!(store.raw_get(KEY_USER_EMAIL).as_deref(), Some("a@b.co"));
        assert_eq!(store.raw_get(KEY_USER_FULL_NAME).as_deref(), Some("Dr. Lim"));
        assert_eq!(session.token().as_deref(), Some("tok"));
    }
}
