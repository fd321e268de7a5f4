use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-200 response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable failure description
    #[schema(example = "Cell A1 is empty. Please enter a number in A1.")]
    pub detail: String,
}

/// Multipart form accepted by `POST /run` (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct RunUpload {
    /// The `.xlsx` workbook whose active sheet holds a number in A1
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
