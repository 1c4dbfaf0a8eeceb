//! Application state shared across handlers

use common::jwt::JwtService;
use kitchen::Kitchen;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub kitchen: Kitchen,
    pub jwt_service: JwtService,
}
