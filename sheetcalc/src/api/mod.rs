//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! - `GET /` - upload page (embedded static HTML)
//! - `POST /run` - upload an `.xlsx`, receive the calculated workbook
//! - `GET /healthz` - liveness
//! - `GET /openapi.json`, `GET /docs` - API description
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.

pub mod handlers;
pub mod models;
