use crate::AppState;
use crate::engine;
use crate::errors::{Error, Result};
use crate::types::JobId;
use axum::{
    body::Body,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::{info, instrument, warn};

/// MIME type of the returned workbook
pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Filename the client is told to save the result as
pub const OUTPUT_FILENAME: &str = "output.xlsx";

/// Headroom above the upload ceiling for multipart boundaries and part headers. The per-route
/// body limit uses this so oversized files are caught by the chunk counter with a precise message.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

const FILE_FIELD: &str = "file";

/// Raw bytes of the accepted `file` field
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

fn has_xlsx_extension(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".xlsx")
}

fn multipart_error(max_bytes: u64) -> impl Fn(MultipartError) -> Error {
    move |e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge { max_bytes }
        } else {
            Error::BadRequest {
                message: format!("Failed to parse multipart data: {}", e.body_text()),
            }
        }
    }
}

/// Find the `file` field, check its name, and buffer its contents up to `max_bytes`.
///
/// The filename is checked before any of the field's content is read.
async fn read_upload(multipart: &mut Multipart, max_bytes: u64) -> Result<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error(max_bytes))? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if has_xlsx_extension(name) => name.to_string(),
            other => {
                info!(filename = ?other, "Rejected upload with unsupported filename");
                return Err(Error::BadRequest {
                    message: "Only .xlsx files allowed".to_string(),
                });
            }
        };

        let bytes = read_field(field, max_bytes).await?;
        return Ok(Upload { filename, bytes });
    }

    Err(Error::BadRequest {
        message: format!("No file uploaded. Send the spreadsheet in a multipart field named '{FILE_FIELD}'"),
    })
}

async fn read_field(mut field: Field<'_>, max_bytes: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error(max_bytes))? {
        let total_size = (bytes.len() + chunk.len()) as u64;
        if total_size > max_bytes {
            warn!(
                total_size = total_size,
                max_bytes = max_bytes,
                "File size limit exceeded, aborting upload"
            );
            return Err(Error::PayloadTooLarge { max_bytes });
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

async fn open_output(path: &Path) -> Result<tokio::fs::File> {
    tokio::fs::File::open(path).await.map_err(Error::OutputRead)
}

#[utoipa::path(
    post,
    path = "/run",
    tag = "calculation",
    summary = "Run calculation",
    description = "Upload an .xlsx workbook. The number in cell A1 of its active sheet is doubled and \
    a new workbook is returned with a single `Output` sheet: A1=`Input A1`, B1=input, A2=`Doubled`, B2=result. \
    Integer inputs produce integer results; fractional inputs produce fractional results.",
    request_body(
        content = crate::api::models::run::RunUpload,
        content_type = "multipart/form-data",
        description = "Workbook upload in the `file` field"
    ),
    responses(
        (status = 200, description = "Calculated workbook, served as `output.xlsx`", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", body = String),
        (status = 400, description = "Not an .xlsx upload, or A1 is empty or not a number", body = crate::api::models::run::ErrorResponse),
        (status = 413, description = "Upload exceeds the configured size ceiling", body = crate::api::models::run::ErrorResponse),
        (status = 500, description = "Unexpected failure, reported by category", body = crate::api::models::run::ErrorResponse)
    )
)]
#[instrument(skip_all, fields(job_id))]
pub async fn run(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response> {
    let max_bytes = state.config.limits.max_upload_bytes;
    let upload = read_upload(&mut multipart, max_bytes).await?;

    let job = JobId::new();
    tracing::Span::current().record("job_id", tracing::field::display(job));
    info!(
        filename = %upload.filename,
        bytes = upload.bytes.len(),
        "Accepted upload"
    );

    let input_path = state.storage.write_upload(job, &upload.bytes).await?;
    let output_path = state.storage.output_path(job);

    // Workbook load/compute/save is blocking work
    let calculation = {
        let output_path = output_path.clone();
        tokio::task::spawn_blocking(move || engine::run_calculation(&input_path, &output_path))
            .await
            .map_err(|e| anyhow::anyhow!("Calculation task failed: {e}"))??
    };

    info!(
        input = %calculation.input,
        doubled = %calculation.doubled,
        output = %output_path.display(),
        "Returning calculated workbook"
    );

    let body = Body::from_stream(ReaderStream::new(open_output(&output_path).await?));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{OUTPUT_FILENAME}\"")),
        ],
        body,
    )
        .into_response())
}
