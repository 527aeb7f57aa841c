//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingAdmissionService, QueryFacade, SpotRegistryService};
use crate::domain::repositories::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::interfaces::http::modules::metrics::http_metrics_middleware;
use crate::interfaces::http::modules::{admin, auth, bookings, dashboard, health, metrics};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        // Bookings
        bookings::create_booking,
        bookings::list_my_bookings,
        bookings::cancel_booking,
        // Dashboard
        dashboard::list_lots,
        dashboard::get_user_dashboard,
        // Admin
        admin::get_dashboard_stats,
        admin::get_all_bookings,
        admin::cancel_any_booking,
        admin::create_lot,
        admin::get_lot_for_management,
        admin::create_spot,
        admin::update_spot,
        admin::delete_spot,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            // Bookings
            bookings::CreateBookingRequest,
            bookings::BookingDto,
            bookings::BookingWithSpotDto,
            // Dashboard
            dashboard::LotDto,
            dashboard::SpotDto,
            dashboard::UserDashboardResponse,
            // Admin
            admin::DashboardStatsDto,
            admin::BookingRecordDto,
            admin::CreateLotRequest,
            admin::CreateSpotRequest,
            admin::UpdateSpotRequest,
            admin::LotWithSpotsDto,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: registration, login (JWT), password change"),
        (name = "Bookings", description = "Create, list and cancel parking spot bookings"),
        (name = "Dashboard", description = "Parking lot grid and the caller's upcoming bookings"),
        (name = "Admin", description = "Admin-only: stats, booking records, lot and spot management"),
    ),
    info(
        title = "Aura Parking API",
        version = "1.0.0",
        description = "REST API for the parking-lot reservation service",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
#[allow(clippy::too_many_arguments)]
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    admission: Arc<BookingAdmissionService>,
    registry: Arc<SpotRegistryService>,
    queries: Arc<QueryFacade>,
    admin_signup_key: String,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // ── Per-module states ───────────────────────────────────────

    let auth_state = auth::AuthHandlerState {
        repos: repos.clone(),
        jwt_config,
        admin_signup_key,
    };

    let booking_state = bookings::BookingAppState {
        admission: admission.clone(),
        queries: queries.clone(),
    };

    let dashboard_state = dashboard::DashboardAppState {
        queries: queries.clone(),
    };

    let admin_state = admin::AdminAppState {
        admission,
        registry,
        queries,
    };

    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let metrics_state = metrics::MetricsState {
        handle: prometheus_handle,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Booking routes (protected)
    let booking_routes = Router::new()
        .route(
            "/",
            get(bookings::list_my_bookings).post(bookings::create_booking),
        )
        .route("/{booking_id}", delete(bookings::cancel_booking))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(booking_state);

    // Dashboard routes (protected)
    let dashboard_routes = Router::new()
        .route("/lots", get(dashboard::list_lots))
        .route("/lots/{lot_id}", get(dashboard::get_user_dashboard))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(dashboard_state);

    // Admin routes (protected + admin role).
    // Layers run outermost first, so auth (added last) runs before the
    // admin gate.
    let admin_routes = Router::new()
        .route("/stats", get(admin::get_dashboard_stats))
        .route("/bookings", get(admin::get_all_bookings))
        .route("/bookings/{booking_id}", delete(admin::cancel_any_booking))
        .route("/lots", post(admin::create_lot))
        .route("/lots/{lot_id}", get(admin::get_lot_for_management))
        .route("/spots", post(admin::create_spot))
        .route(
            "/spots/{spot_id}",
            put(admin::update_spot).delete(admin::delete_spot),
        )
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(admin_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check).with_state(health_state))
        // Prometheus scrape endpoint
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics_state),
        )
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Bookings
        .nest("/api/v1/bookings", booking_routes)
        // Dashboard
        .nest("/api/v1/dashboard", dashboard_routes)
        // Admin
        .nest("/api/v1/admin", admin_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
