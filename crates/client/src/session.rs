use super::*;
use tokio::sync::watch;
use turnstile_auth::Role;
use turnstile_auth::UserInfo;

/// Last token and user handed out by the server. A cache, never a source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub token: String,
    pub user: UserInfo,
}

/// Observable session cell.
///
/// Reads are synchronous. Every write goes to [`Storage`] first and then
/// notifies subscribers. Nothing is restored until [`Session::hydrate`] runs.
pub struct Session {
    cell: watch::Sender<Option<Snapshot>>,
    storage: Box<dyn Storage>,
}

impl Session {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            cell: watch::channel(None).0,
            storage: Box::new(storage),
        }
    }

    /// Restore the persisted snapshot. Corrupt data signs the session out.
    pub fn hydrate(&self) {
        let token = self.storage.get(TOKEN_KEY);
        let user = self.storage.get(USER_KEY);
        if let (Some(token), Some(user)) = (token, user) {
            match serde_json::from_str::<UserInfo>(&user) {
                Ok(user) => {
                    log::debug!("restored session for {}", user.email);
                    self.cell.send_replace(Some(Snapshot { token, user }));
                }
                Err(e) => {
                    log::warn!("discarding corrupt session: {}", e);
                    self.logout();
                }
            }
        }
    }

    pub fn get(&self) -> Option<Snapshot> {
        self.cell.borrow().clone()
    }

    pub fn set(&self, snapshot: Option<Snapshot>) {
        self.persist(snapshot.as_ref())
            .unwrap_or_else(|e| log::warn!("session not persisted: {}", e));
        self.cell.send_replace(snapshot);
    }

    /// Receiver that sees every later write. Starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.cell.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.cell.borrow().as_ref().map(|s| s.token.clone())
    }
    pub fn user(&self) -> Option<UserInfo> {
        self.cell.borrow().as_ref().map(|s| s.user.clone())
    }
    /// Role of the signed-in user, or the default role when signed out.
    pub fn role(&self) -> Role {
        self.user().map(|u| u.role).unwrap_or_default()
    }
    pub fn is_logged_in(&self) -> bool {
        self.cell.borrow().is_some()
    }

    /// Swap the cached user, keeping the token.
    pub fn replace_user(&self, user: UserInfo) {
        if let Some(token) = self.token() {
            self.set(Some(Snapshot { token, user }));
        }
    }

    pub fn logout(&self) {
        self.set(None);
    }

    fn persist(&self, snapshot: Option<&Snapshot>) -> std::io::Result<()> {
        match snapshot {
            Some(snapshot) => {
                let user = serde_json::to_string(&snapshot.user).map_err(std::io::Error::other)?;
                self.storage.set(TOKEN_KEY, &snapshot.token)?;
                self.storage.set(USER_KEY, &user)
            }
            None => {
                self.storage.remove(TOKEN_KEY)?;
                self.storage.remove(USER_KEY)
            }
        }
    }
}
