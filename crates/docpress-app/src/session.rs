/*
[INPUT]:  Email/password credentials and the persisted session record
[OUTPUT]: Active mock session, login/register/logout with notifications
[POS]:    Auth layer - mock email/password identity flow
[UPDATE]: When seeded accounts or session persistence change
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use docpress_adapter::{Notification, Notifier};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::KeyValueStore;

/// Key the active profile is mirrored under
pub const SESSION_KEY: &str = "docpress_user";

const DEFAULT_LATENCY: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

/// Session profile as stored in local state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
}

#[derive(Debug, Clone)]
struct UserRecord {
    password: String,
    user: User,
}

fn seed_users() -> HashMap<String, UserRecord> {
    let seeds = [
        ("1", "admin@docpress.com", "Admin User", Role::Admin, "2023-01-01"),
        ("2", "user@docpress.com", "Regular User", Role::User, "2023-02-15"),
    ];
    seeds
        .into_iter()
        .map(|(id, email, name, role, created_at)| {
            let record = UserRecord {
                password: "password123".to_string(),
                user: User {
                    id: id.to_string(),
                    email: email.to_string(),
                    name: name.to_string(),
                    role,
                    created_at: created_at.to_string(),
                },
            };
            (email.to_string(), record)
        })
        .collect()
}

/// Mock email/password session store.
///
/// Passwords are compared in plain text; this is a demo identity flow.
pub struct SessionStore {
    users: Mutex<HashMap<String, UserRecord>>,
    current: RwLock<Option<User>>,
    loading: AtomicBool,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    latency: Duration,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            users: Mutex::new(seed_users()),
            current: RwLock::new(None),
            loading: AtomicBool::new(true),
            storage,
            notifier,
            latency: DEFAULT_LATENCY,
        }
    }

    /// Override the artificial delay applied to login/register
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Restore the persisted profile; an unreadable record is discarded
    pub fn hydrate(&self) {
        match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!(email = %user.email, "session restored");
                    self.set_current(Some(user));
                }
                Err(err) => {
                    warn!(error = %err, "failed to parse stored user");
                    if let Err(err) = self.storage.remove(SESSION_KEY) {
                        warn!(error = %err, "failed to remove corrupt session record");
                    }
                }
            },
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to read stored session"),
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Look up a registered profile by email
    pub fn find_user(&self, email: &str) -> Option<User> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.get(&email.to_lowercase()).map(|r| r.user.clone())
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        tokio::time::sleep(self.latency).await;

        let user = {
            let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
            users
                .get(&email.to_lowercase())
                .filter(|record| record.password == password)
                .map(|record| record.user.clone())
        };

        let Some(user) = user else {
            info!(email, "login rejected");
            self.notifier.notify(Notification::destructive(
                "Login Failed",
                "Invalid email or password",
            ));
            return false;
        };

        let welcome = format!("Welcome back, {}!", user.name);
        self.start_session(user);
        self.notifier
            .notify(Notification::info("Login Successful", welcome));
        true
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> bool {
        tokio::time::sleep(self.latency).await;

        let email = email.to_lowercase();
        let user = {
            let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
            if users.contains_key(&email) {
                None
            } else {
                let user = User {
                    id: format!("user_{}", Uuid::new_v4().simple()),
                    email: email.clone(),
                    name: name.to_string(),
                    role: Role::User,
                    created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                };
                users.insert(
                    email.clone(),
                    UserRecord {
                        password: password.to_string(),
                        user: user.clone(),
                    },
                );
                Some(user)
            }
        };

        let Some(user) = user else {
            info!(email = %email, "registration rejected: email taken");
            self.notifier.notify(Notification::destructive(
                "Registration Failed",
                "An account with this email already exists",
            ));
            return false;
        };

        self.start_session(user);
        self.notifier.notify(Notification::info(
            "Registration Successful",
            format!("Welcome to DocPress, {name}!"),
        ));
        true
    }

    pub fn logout(&self) {
        self.set_current(None);
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            warn!(error = %err, "failed to clear stored session");
        }
        info!("session ended");
        self.notifier.notify(Notification::info(
            "Logged Out",
            "You have been successfully logged out",
        ));
    }

    fn start_session(&self, user: User) {
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(err) = self.storage.set(SESSION_KEY, &raw) {
                    warn!(error = %err, "failed to persist session");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize session"),
        }
        info!(email = %user.email, role = user.role.label(), "session started");
        self.set_current(Some(user));
    }

    fn set_current(&self, user: Option<User>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = user;
    }
}
