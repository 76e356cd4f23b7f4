// src/store.rs
use crate::config::Config;
use crate::error::GameError;
use crate::game::GameSession;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct Store {
    sessions: Arc<RwLock<HashMap<String, GameSession>>>,
    config: Arc<Config>,
}

impl Store {
    pub fn new(config: Config) -> Self {
        Store {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn new_session(&self) -> GameSession {
        GameSession::new(self.config.starting_capital, self.config.thresholds, self.config.seed)
    }

    /// Run `f` on the user's session, creating one first if needed.
    pub async fn open<T, F>(&self, user: &str, f: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, GameError>,
    {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(user) {
            debug!("Creating session for {}", user);
            sessions.insert(user.to_string(), self.new_session());
        }
        match sessions.get_mut(user) {
            Some(session) => f(session),
            None => Err(GameError::SessionNotFound(user.to_string())),
        }
    }

    pub async fn with_session<T, F>(&self, user: &str, f: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, GameError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(user)
            .ok_or_else(|| GameError::SessionNotFound(user.to_string()))?;
        f(session)
    }

    pub async fn read<T, F>(&self, user: &str, f: F) -> Result<T, GameError>
    where
        F: FnOnce(&GameSession) -> T,
    {
        let sessions = self.sessions.read().await;
        sessions
            .get(user)
            .map(f)
            .ok_or_else(|| GameError::SessionNotFound(user.to_string()))
    }

    pub async fn remove(&self, user: &str) -> bool {
        self.sessions.write().await.remove(user).is_some()
    }
}
