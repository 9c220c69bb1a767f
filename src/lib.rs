use std::sync::Arc;

use config::Config;
use service::UserService;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod result;
pub mod routes;
pub mod service;

#[cfg(test)]
pub mod testing;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<UserService>,
}
