use anyhow::Context;
use chrono::Utc;
use tracing::{info, instrument, warn};

use userhub_core::AppError;
use userhub_db::RepositoryError;
use userhub_models::{LoginRequest, LoginResponse, RegisterRequest, User};

use crate::metrics::{track_jwt_issued, track_login, track_user_registered};
use crate::modules::users::service::UserService;
use crate::state::AppState;

/// Same message for an unknown username and a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

pub struct AuthService;

impl AuthService {
    /// Self-service sign-up. Only these count toward `users_registered_total`;
    /// users created through `POST /api/users` do not.
    pub async fn register_user(state: &AppState, request: RegisterRequest) -> Result<User, AppError> {
        let user = UserService::create_user(state, request).await?;
        track_user_registered();
        Ok(user)
    }

    #[instrument(skip(state, request), fields(username = %request.username))]
    pub async fn login_user(
        state: &AppState,
        request: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let credentials = state
            .users
            .find_credentials_by_username(&request.username)
            .await
            .map_err(RepositoryError::into_app_error)?;

        let Some(credentials) = credentials else {
            warn!("Login failed: unknown username");
            track_login(false);
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS_MESSAGE));
        };

        let password_matches = state
            .passwords
            .verify_blocking(request.password, credentials.password_hash.clone())
            .await
            .context("Failed to verify password")?;

        if !password_matches {
            warn!(user_id = %credentials.id, "Login failed: wrong password");
            track_login(false);
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS_MESSAGE));
        }

        let user = credentials.into_user();
        let token = state
            .tokens
            .issue(user.id, &user.username, Utc::now())
            .context("Failed to sign access token")?;

        track_login(true);
        track_jwt_issued();
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse { user, token })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metrics_exporter_prometheus::PrometheusBuilder;
    use userhub_config::{
        AppConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
        PasswordConfig, ServerConfig,
    };
    use userhub_db::InMemoryUserRepository;
    use userhub_models::CreateUserRequest;

    use super::*;

    fn test_state() -> AppState {
        let config = AppConfig {
            environment: Environment::Test,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig::default(),
            password: PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
        };
        AppState::new(&config, Arc::new(InMemoryUserRepository::new())).unwrap()
    }

    fn create_request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Test User".to_string(),
            username: username.to_string(),
            email: format!("{username}@x.io"),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_admin_created_users_are_not_counted_as_registered() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let state = test_state();

        metrics::with_local_recorder(&recorder, || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(async {
                    AuthService::register_user(&state, create_request("self_signup"))
                        .await
                        .unwrap();
                    UserService::create_user(&state, create_request("admin_made"))
                        .await
                        .unwrap();
                })
        });

        let rendered = handle.render();
        assert!(rendered.contains("users_registered_total 1"), "{rendered}");
        assert!(!rendered.contains("users_registered_total 2"), "{rendered}");
    }
}
