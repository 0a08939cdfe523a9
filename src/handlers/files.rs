use super::common::success_response;
use crate::dto::{ProductCsvUpload, ProductImportSummary};
use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Multipart, Query, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

fn default_has_header() -> bool {
    true
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadCsvParams {
    /// Whether the first row is a header to skip (default true)
    #[serde(rename = "hasHeader", default = "default_has_header")]
    pub has_header: bool,
}

/// Import products from a CSV file
#[utoipa::path(
    post,
    path = "/api/v1/files/upload-csv",
    params(UploadCsvParams),
    request_body(content = ProductCsvUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import finished", body = ProductImportSummary),
        (status = 400, description = "Missing or unreadable file part", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn upload_products_csv(
    State(state): State<AppState>,
    Query(params): Query<UploadCsvParams>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let bad_body = |e: axum::extract::multipart::MultipartError| {
        ServiceError::ValidationError(format!("invalid multipart body: {e}"))
    };

    let mut data = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_body)? {
        if field.name() == Some("file") {
            data = Some(field.bytes().await.map_err(bad_body)?);
        }
    }
    let data =
        data.ok_or_else(|| ServiceError::ValidationError("missing `file` part".to_string()))?;

    let summary = state
        .services
        .csv_import
        .import_products(&data, params.has_header)
        .await?;
    Ok(success_response(summary))
}

pub fn file_routes() -> Router<AppState> {
    Router::new().route("/upload-csv", post(upload_products_csv))
}
