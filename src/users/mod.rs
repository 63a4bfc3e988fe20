use axum::{
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};

use crate::auth::middleware::{authenticate, authorize, AllowedRoles};
use crate::state::AppState;

mod dto;
pub mod handlers;

/// Profile and password for any signed-in user; everything else is admin-only.
pub fn router(state: AppState) -> Router<AppState> {
    let self_service = Router::new()
        .route("/profile", put(handlers::update_profile))
        .route("/password", put(handlers::update_password));

    let admin = Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(from_fn_with_state(AllowedRoles::ADMIN, authorize));

    Router::new().nest(
        "/users",
        self_service
            .merge(admin)
            .route_layer(from_fn_with_state(state, authenticate)),
    )
}
