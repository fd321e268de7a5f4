//! OpenAPI documentation.
//!
//! The document is served at `/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sheetcalc API",
        description = "Upload a workbook, get the calculated workbook back."
    ),
    paths(api::handlers::run::run),
    components(schemas(api::models::run::ErrorResponse, api::models::run::RunUpload)),
    tags(
        (name = "calculation", description = "Spreadsheet calculation")
    )
)]
pub struct ApiDoc;
