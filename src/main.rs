//!
//! Parking-lot reservation HTTP server.
//! Reads configuration from TOML file (~/.config/parking-service/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use aura_parking::application::{BookingAdmissionService, QueryFacade, SpotRegistryService};
use aura_parking::domain::identity::Role;
use aura_parking::domain::repositories::RepositoryProvider;
use aura_parking::infrastructure::crypto::jwt::JwtConfig;
use aura_parking::infrastructure::database::migrator::Migrator;
use aura_parking::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Aura Parking service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Repository provider over the shared pool
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Create default admin user if no users exist
    create_default_admin(repos.as_ref(), &app_cfg).await;

    // ── Services ───────────────────────────────────────────────
    let admission = Arc::new(BookingAdmissionService::new(repos.clone()));
    let registry = Arc::new(SpotRegistryService::new(repos.clone()));
    let queries = Arc::new(QueryFacade::new(repos.clone()));

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "parking-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        repos,
        db.clone(),
        jwt_config,
        admission,
        registry,
        queries,
        app_cfg.security.admin_signup_key.clone(),
        prometheus_handle,
    );

    let api_addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Aura Parking service shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(repos: &dyn RepositoryProvider, app_cfg: &AppConfig) {
    use aura_parking::domain::user::User;
    use aura_parking::infrastructure::crypto::password::hash_password;

    let users_count = repos.users().count().await.unwrap_or(0);

    if users_count == 0 {
        info!("Creating default admin user...");

        let password_hash = match hash_password(&app_cfg.admin.password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash admin password: {}", e);
                return;
            }
        };

        let now = chrono::Utc::now();
        let admin = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: app_cfg.admin.name.clone(),
            email: app_cfg.admin.email.clone(),
            password_hash,
            role: Role::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };

        match repos.users().create(admin).await {
            Ok(()) => {
                info!("Default admin created: {}", app_cfg.admin.email);
                warn!("Please change the admin password immediately!");
            }
            Err(e) => {
                error!("Failed to create admin user: {}", e);
            }
        }
    }
}
