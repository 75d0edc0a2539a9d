use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /health -- liveness only; the database is checked once at startup.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "IRAS GST API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub base_path: &'static str,
    pub schemes: [&'static str; 1],
    pub host: &'static str,
    pub consumes: [&'static str; 1],
    pub produces: [&'static str; 1],
    pub endpoints: InfoEndpoints,
}

#[derive(Serialize)]
pub struct InfoEndpoints {
    pub main: &'static str,
    pub admin: AdminEndpoints,
}

#[derive(Serialize)]
pub struct AdminEndpoints {
    pub create: &'static str,
    pub list: &'static str,
    pub get: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

/// GET /api/info -- static metadata for the GST register listing.
async fn api_info() -> Json<ApiInfo> {
    const COLLECTION: &str = "/admin/gst-registrations";
    const ITEM: &str = "/admin/gst-registrations/{id}";

    Json(ApiInfo {
        title: "Check GST Register",
        description: "The Check GST Register API enables you to check whether businesses \
                      are GST-registered based on their GST registration number, UEN or NRIC.",
        version: env!("CARGO_PKG_VERSION"),
        base_path: "/iras/prod/GSTListing",
        schemes: ["https"],
        host: "apiservices.iras.gov.sg",
        consumes: ["application/json"],
        produces: ["application/json"],
        endpoints: InfoEndpoints {
            main: "/iras/prod/GSTListing/SearchGSTRegistered",
            admin: AdminEndpoints {
                create: COLLECTION,
                list: COLLECTION,
                get: ITEM,
                update: ITEM,
                delete: ITEM,
            },
        },
    })
}

/// Mount the health and metadata routes at the root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/info", get(api_info))
}
