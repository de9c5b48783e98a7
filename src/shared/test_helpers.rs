//! Fixtures shared by unit and router tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::core::config::{
    AppConfig, Config, DatabaseConfig, DetectorConfig, GeocoderConfig, SessionConfig,
    SwaggerConfig,
};
use crate::core::database::run_migrations;
use crate::core::router::{build_router, AppServices};
use crate::features::auth::{AuthService, SessionService};
use crate::features::hazards::clients::detector_client::{DetectorError, HazardDetector};
use crate::features::hazards::models::{BoundingBox, Detection};
use crate::features::hazards::HazardClassifier;
use crate::features::reports::services::geocoding_service::{
    GeocodedAddress, GeocodingError, ReverseGeocoder,
};
use crate::features::reports::{ReportService, SubmissionService};
use crate::features::users::UserService;
use crate::modules::storage::UploadStore;
use crate::shared::templates::PageRenderer;

/// Fresh in-memory database with the real migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: "test-session-secret-that-is-long-enough".to_string(),
        ttl: Duration::from_secs(3600),
        cookie_secure: false,
    }
}

pub fn test_config(static_dir: &Path) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 16 * 1024 * 1024,
            static_dir: static_dir.to_path_buf(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        },
        session: test_session_config(),
        detector: DetectorConfig {
            url: "http://127.0.0.1:9/detect".to_string(),
            model: "best.pt".to_string(),
            timeout: Duration::from_secs(1),
        },
        geocoder: GeocoderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            user_agent: "smart_city_app_test".to_string(),
            timeout: Duration::from_secs(1),
        },
        swagger: SwaggerConfig {
            username: None,
            password: None,
            title: "Smart City Hazard API".to_string(),
            version: "test".to_string(),
            description: "test".to_string(),
        },
    }
}

/// Small opaque PNG
pub fn test_png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(32, 24, image::Rgb([90, 90, 90]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, image::ImageOutputFormat::Png)
        .unwrap();
    bytes.into_inner()
}

pub fn write_test_png(path: &Path) {
    std::fs::write(path, test_png_bytes()).unwrap();
}

/// Detector returning fixed detections, or failing every call
pub struct StubDetector {
    result: Result<Vec<Detection>, String>,
}

impl StubDetector {
    /// One detection per label, in order
    pub fn labels(labels: &[&str]) -> Self {
        let detections = labels
            .iter()
            .enumerate()
            .map(|(i, name)| Detection {
                name: name.to_string(),
                class_id: i as i64,
                confidence: 0.9,
                bbox: BoundingBox {
                    x1: 2.0,
                    y1: 2.0,
                    x2: 20.0,
                    y2: 16.0,
                },
            })
            .collect();
        Self {
            result: Ok(detections),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err("model unavailable".to_string()),
        }
    }
}

#[async_trait]
impl HazardDetector for StubDetector {
    async fn detect(&self, _image_path: &Path) -> Result<Vec<Detection>, DetectorError> {
        self.result
            .clone()
            .map_err(DetectorError::Request)
    }
}

/// Geocoder returning a fixed location, or failing every call
pub struct StubGeocoder {
    result: Result<GeocodedAddress, String>,
}

impl StubGeocoder {
    pub fn returning(address: &str, city: &str) -> Self {
        Self {
            result: Ok(GeocodedAddress {
                address: address.to_string(),
                city: city.to_string(),
            }),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err("connection refused".to_string()),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn reverse(&self, _lat: &str, _lon: &str) -> Result<GeocodedAddress, GeocodingError> {
        self.result.clone().map_err(GeocodingError::Request)
    }
}

/// Full application router over an in-memory database and a temporary static dir
pub struct TestApp {
    pub server: TestServer,
    pub reports: Arc<ReportService>,
    pub pool: SqlitePool,
    static_dir: TempDir,
}

impl TestApp {
    pub async fn new(detector: StubDetector, geocoder: StubGeocoder) -> Self {
        let static_dir = tempfile::tempdir().unwrap();
        let config = test_config(static_dir.path());
        let pool = test_pool().await;

        let users = Arc::new(UserService::new(pool.clone()));
        let session_service = Arc::new(SessionService::new(&config.session, Arc::clone(&users)));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::clone(&session_service),
        ));
        let reports = Arc::new(ReportService::new(pool.clone()));
        let submission_service = Arc::new(SubmissionService::new(
            Arc::new(UploadStore::new(config.app.upload_dir())),
            Arc::new(HazardClassifier::new(Arc::new(detector))),
            Arc::new(geocoder),
            Arc::clone(&reports),
        ));

        let router = build_router(
            &config,
            AppServices {
                auth_service,
                session_service,
                report_service: Arc::clone(&reports),
                submission_service,
                renderer: Arc::new(PageRenderer::new().unwrap()),
            },
        );

        Self {
            server: TestServer::new(router).unwrap(),
            reports,
            pool,
            static_dir,
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.path().join("uploads")
    }

    /// Register through the JSON API and return a bearer token for the account
    pub async fn register_and_login(&self, username: &str, role: &str, region: &str) -> String {
        self.server
            .post("/api/register")
            .json(&serde_json::json!({
                "username": username,
                "password": "pa55word",
                "role": role,
                "region": region,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let body: serde_json::Value = self
            .server
            .post("/api/login")
            .json(&serde_json::json!({ "username": username, "password": "pa55word" }))
            .await
            .json();

        body["access_token"].as_str().unwrap().to_string()
    }
}
