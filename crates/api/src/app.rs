use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::notification::Notifier;
use domain::services::quota::DailyQuota;
use domain::services::settings::SettingsStore;
use persistence::repositories::{
    EventRepository, OtpRepository, RegistrationRepository, StudentRepository,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, trace_id, BurstLimiter,
};
use crate::routes::{admin, events, health, register, settings, view};
use crate::services::{EmailService, OtpService, RegistrationService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub settings: SettingsStore,
    pub otp: OtpService,
    pub registration: RegistrationService,
    pub view_quota: Arc<DailyQuota>,
}

impl AppState {
    /// Wire repositories, services, and shared stores from config + pool.
    pub fn build(config: Config, pool: PgPool) -> Self {
        Self::build_with_notifier(
            config.clone(),
            pool,
            Arc::new(EmailService::new(config.email)),
        )
    }

    /// Same wiring with an injected notifier; tests pass a mock here.
    pub fn build_with_notifier(
        config: Config,
        pool: PgPool,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let config = Arc::new(config);
        let settings = SettingsStore::new(config.registration.initial_settings());
        let view_quota = Arc::new(DailyQuota::new(config.registration.view_otp_daily_limit));

        let burst_limiter = if config.security.otp_requests_per_minute > 0 {
            Some(Arc::new(BurstLimiter::new(
                config.security.otp_requests_per_minute,
            )))
        } else {
            None
        };

        let otp = OtpService::new(
            OtpRepository::new(pool.clone()),
            Arc::clone(&notifier),
            Arc::clone(&view_quota),
            burst_limiter,
        );

        let registration = RegistrationService::new(
            EventRepository::new(pool.clone()),
            StudentRepository::new(pool.clone()),
            RegistrationRepository::new(pool.clone()),
            settings.clone(),
            notifier,
        );

        Self {
            pool,
            config,
            settings,
            otp,
            registration,
            view_quota,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/events", get(events::list_events))
        .route(
            "/api/v1/events/:event_id/token-status",
            get(events::token_status),
        )
        .route("/api/v1/register/send-otp", post(register::send_otp))
        .route("/api/v1/register/verify-otp", post(register::verify_otp))
        .route("/api/v1/register", post(register::register))
        .route("/api/v1/view/send-otp", post(view::send_otp))
        .route("/api/v1/view/verify-otp", post(view::verify_otp))
        .route("/api/v1/registrations/:reg_no", get(view::get_registration))
        .route("/api/v1/settings", get(settings::get_settings));

    let admin_routes = Router::new()
        .route("/api/v1/admin/events", post(admin::create_event))
        .route("/api/v1/admin/events/:event_id", put(admin::update_event))
        .route(
            "/api/v1/admin/events/:event_id/registrants",
            get(admin::list_registrants),
        )
        .route("/api/v1/admin/settings", put(admin::update_settings))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
