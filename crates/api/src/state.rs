//! Shared application state

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::email::Mailer;
use crate::repository::UserRepository;

/// State handed to every handler and middleware layer
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repo: Arc<dyn UserRepository>,
    pub tokens: TokenService,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(config: Config, repo: Arc<dyn UserRepository>, mailer: Mailer) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.access_token_expiry_hours);
        Self {
            config: Arc::new(config),
            repo,
            tokens,
            mailer,
        }
    }
}
