use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use userhub_models::{CreateUserRequest, UpdateUserRequest};

use crate::middleware::auth::require_auth;
use crate::state::AppState;
use crate::validator::validate_body;

use super::controller::{create_user, delete_user, get_user, get_users, update_user};

/// Every route requires a token. Body routes validate before they
/// authenticate, so the validation layer is added last (outermost).
pub fn init_users_router(state: &AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/", get(get_users).route_layer(auth.clone()))
        .route(
            "/",
            post(create_user)
                .route_layer(auth.clone())
                .route_layer(middleware::from_fn(validate_body::<CreateUserRequest>)),
        )
        .route("/{id}", get(get_user).route_layer(auth.clone()))
        .route(
            "/{id}",
            put(update_user)
                .route_layer(auth.clone())
                .route_layer(middleware::from_fn(validate_body::<UpdateUserRequest>)),
        )
        .route("/{id}", delete(delete_user).route_layer(auth))
}
