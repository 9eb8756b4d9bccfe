use crate::session::Credentials;
use std::sync::Mutex;

/// Storage for the accounts a collection run iterates over
///
/// Implementations must be shareable across the server and collector tasks.
pub trait SessionStore: Send + Sync {
    /// Looks up an account by its local identifier
    fn get(&self, user_id: &str) -> Option<Credentials>;

    /// Adds or replaces an account's credentials
    fn add(&self, creds: Credentials);

    /// Snapshot of every known account, in insertion order
    fn list(&self) -> Vec<Credentials>;
}

/// In-memory account store
///
/// Holds whatever the process was seeded with plus accounts added through
/// the OAuth redirect while it runs. Contents do not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    accounts: Mutex<Vec<Credentials>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with a single password-grant master account
    pub fn with_master(username: &str, password: &str) -> Self {
        let store = Self::new();
        store.add(Credentials::with_password(username, username, password));
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, user_id: &str) -> Option<Credentials> {
        let accounts = self.accounts.lock().unwrap();
        accounts.iter().find(|c| c.user_id == user_id).cloned()
    }

    fn add(&self, creds: Credentials) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(existing) = accounts.iter_mut().find(|c| c.user_id == creds.user_id) {
            *existing = creds;
        } else {
            accounts.push(creds);
        }
    }

    fn list(&self) -> Vec<Credentials> {
        self.accounts.lock().unwrap().clone()
    }
}
