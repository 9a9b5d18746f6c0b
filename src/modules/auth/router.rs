use axum::{Router, middleware, routing::post};

use userhub_models::{LoginRequest, RegisterRequest};

use crate::state::AppState;
use crate::validator::validate_body;

use super::controller::{login_user, register_user};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            post(register_user)
                .route_layer(middleware::from_fn(validate_body::<RegisterRequest>)),
        )
        .route(
            "/login",
            post(login_user).route_layer(middleware::from_fn(validate_body::<LoginRequest>)),
        )
}
