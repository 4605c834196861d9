use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{AuditService, ScopeResolver, TaskService};
use domain::store::{OrganizationStore, Stores};
use shared::jwt::{JwtConfig, JwtError};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, JwtAuthConfig};
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware, trace_id,
};
use crate::routes::{audit_logs, auth, health, tasks};
use crate::services::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: AuthService,
    pub tasks: TaskService,
    pub audit: AuditService,
    pub organizations: Arc<dyn OrganizationStore>,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Result<Self, JwtError> {
        let jwt = Arc::new(build_jwt_config(&config.jwt)?);
        tracing::info!(algorithm = ?jwt.algorithm(), "Token signing configured");
        let scopes = ScopeResolver::new(stores.organizations.clone());

        Ok(Self {
            config: Arc::new(config),
            auth: AuthService::new(stores.users, jwt),
            tasks: TaskService::new(stores.tasks, scopes.clone()),
            audit: AuditService::new(stores.audit_logs, scopes),
            organizations: stores.organizations,
        })
    }
}

fn build_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, JwtError> {
    if config.uses_rsa() {
        JwtConfig::with_rsa_keys(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.leeway_secs,
        )
    } else {
        JwtConfig::with_secret(
            &config.secret,
            config.access_token_expiry_secs,
            config.leeway_secs,
        )
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        // Development: any origin
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_app(config: Config, stores: Stores) -> Result<Router, JwtError> {
    let state = AppState::new(config, stores)?;
    let config = state.config.clone();

    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::liveness))
        .route("/api/health/ready", get(health::readiness))
        .route("/metrics", get(metrics_handler));

    // Bearer token required
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/audit-log", get(audit_logs::list_audit_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state);

    Ok(router)
}
