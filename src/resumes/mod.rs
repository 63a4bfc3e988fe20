use async_trait::async_trait;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::auth::{middleware::authenticate, ownership::OwnedResource};
use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use repo_types::Resume;

#[async_trait]
impl OwnedResource for Resume {
    const KIND: &'static str = "Resume";

    fn owner_id(&self) -> Uuid {
        self.owner
    }

    async fn load(state: &AppState, id: Uuid) -> anyhow::Result<Option<Self>> {
        state.resumes.find_by_id(id).await
    }
}

/// Every résumé route requires a signed-in caller; `:id` routes also pass the
/// ownership gate through the `Owned<Resume>` extractor.
pub fn router(state: AppState) -> Router<AppState> {
    let routes = Router::new()
        .route(
            "/",
            get(handlers::list_resumes).post(handlers::create_resume),
        )
        .route(
            "/:id",
            get(handlers::get_resume)
                .put(handlers::update_resume)
                .delete(handlers::delete_resume),
        )
        .route("/:id/analyze-ats", post(handlers::analyze_ats))
        .route("/:id/duplicate", post(handlers::duplicate_resume))
        .route_layer(from_fn_with_state(state, authenticate));

    Router::new().nest("/resumes", routes)
}
