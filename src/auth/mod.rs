use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod claims;
pub(crate) mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod repo;
pub mod repo_types;
pub(crate) mod services;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let private = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::get_me))
        .route_layer(from_fn_with_state(state, middleware::authenticate));

    Router::new().nest("/auth", public.merge(private))
}
