//! Request handlers for the upload form, batch processing and export.

use super::{render, AppState, MB};
use crate::error::Img2XlsxError;
use crate::export::{to_xlsx_bytes, EXPORT_FILE_NAME, XLSX_MIME};
use crate::extract::Extractor;
use crate::output::ResultSet;
use crate::pipeline::decode::Upload;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, warn};

/// Form field holding the API key.
pub const FIELD_API_KEY: &str = "api_key";

/// Form field holding the image files (repeated).
pub const FIELD_FILES: &str = "files";

/// Parsed multipart upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub api_key: Option<String>,
    pub uploads: Vec<Upload>,
}

impl UploadForm {
    /// Read every field of the form.
    ///
    /// File parts without a file name (an empty file input) are skipped.
    /// Unknown fields are ignored. A file over `max_file_mb` is drained and
    /// kept as a rejected [`Upload`], so it still gets its own row.
    pub async fn read(mut multipart: Multipart, max_file_mb: usize) -> Result<Self, Img2XlsxError> {
        let limit = max_file_mb.saturating_mul(MB);
        let mut form = UploadForm::default();

        while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                FIELD_API_KEY => {
                    let text = field.text().await.map_err(multipart_error)?;
                    form.api_key = Some(text);
                }
                FIELD_FILES => {
                    let file_name = match field.file_name() {
                        Some(f) if !f.is_empty() => f.to_string(),
                        _ => {
                            debug!("Skipping file field without filename");
                            continue;
                        }
                    };

                    let mut data = Vec::new();
                    let mut oversize = false;
                    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                        if oversize {
                            continue;
                        }
                        if data.len() + chunk.len() > limit {
                            oversize = true;
                            data = Vec::new();
                            continue;
                        }
                        data.extend_from_slice(&chunk);
                    }

                    if oversize {
                        warn!("'{}' exceeds {} MB, skipping", file_name, max_file_mb);
                        form.uploads.push(Upload::rejected(
                            file_name,
                            format!("exceeds the maximum upload size of {max_file_mb} MB"),
                        ));
                    } else {
                        debug!("Received '{}' ({} bytes)", file_name, data.len());
                        form.uploads.push(Upload::new(file_name, data));
                    }
                }
                other => debug!("Ignoring form field '{}'", other),
            }
        }

        Ok(form)
    }
}

/// Keep the body-limit case apart from a malformed form.
fn multipart_error(e: MultipartError) -> Img2XlsxError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Img2XlsxError::RequestTooLarge(e.body_text())
    } else {
        Img2XlsxError::InvalidUpload(e.body_text())
    }
}

impl IntoResponse for Img2XlsxError {
    fn into_response(self) -> Response {
        let status = match &self {
            Img2XlsxError::MissingCredential
            | Img2XlsxError::InvalidConfig(_)
            | Img2XlsxError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Img2XlsxError::RequestTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Html(render::warning_page(&self.to_string()))).into_response()
    }
}

pub(super) async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::index_page(state.settings()))
}

pub(super) async fn health() -> &'static str {
    "ok"
}

/// Run the batch and render the result table.
pub(super) async fn process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, Img2XlsxError> {
    let results = run_batch(&state, multipart).await?;
    let xlsx = to_xlsx_bytes(&results)?;
    Ok(Html(render::results_page(state.settings(), &results, &xlsx)))
}

/// Run the batch and answer with the workbook as an attachment.
pub(super) async fn export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, Img2XlsxError> {
    let results = run_batch(&state, multipart).await?;
    let xlsx = to_xlsx_bytes(&results)?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        xlsx,
    )
        .into_response())
}

async fn run_batch(state: &AppState, multipart: Multipart) -> Result<ResultSet, Img2XlsxError> {
    let settings = state.settings();
    let form = UploadForm::read(multipart, settings.max_file_mb).await?;
    let config = settings.session_config(form.api_key.as_deref())?;
    let extractor = Extractor::new(config)?;
    Ok(extractor.process_batch(&form.uploads).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_map_to_status() {
        let cases = [
            (Img2XlsxError::MissingCredential, StatusCode::BAD_REQUEST),
            (Img2XlsxError::InvalidUpload("bad boundary".into()), StatusCode::BAD_REQUEST),
            (
                Img2XlsxError::RequestTooLarge("length limit exceeded".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (Img2XlsxError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
