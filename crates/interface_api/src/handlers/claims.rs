//! Claims handlers

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};
use validator::Validate;

use domain_claims::{ClaimRecord, DocumentHandle};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Triages FNOL text posted as JSON
#[instrument(skip_all)]
pub async fn submit_fnol(
    State(state): State<AppState>,
    Query(query): Query<TriageQuery>,
    Json(request): Json<SubmitFnolRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let record = state.pipeline.process_text(&request.text).await;
    info!(claim_id = %record.id, route = %record.route(), "FNOL text triaged");
    respond(&record, query.audit)
}

/// Triages an uploaded document sent as the raw request body
#[instrument(skip_all, fields(size = body.len()))]
pub async fn submit_document(
    State(state): State<AppState>,
    Query(query): Query<TriageQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("document body is empty".to_string()));
    }

    let document = DocumentHandle::bytes(document_name(&headers), body.to_vec());
    let record = state
        .pipeline
        .process_document(state.text_source.as_ref(), &document)
        .await;
    info!(claim_id = %record.id, route = %record.route(), "FNOL document triaged");
    respond(&record, query.audit)
}

fn respond(record: &ClaimRecord, audit: bool) -> Result<Response, ApiError> {
    let body = if audit {
        serde_json::to_value(record)?
    } else {
        serde_json::to_value(record.output())?
    };

    let claim_id = HeaderValue::from_str(&record.id.to_string())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut response = Json(body).into_response();
    response.headers_mut().insert(CLAIM_ID_HEADER, claim_id);
    Ok(response)
}

/// Upload name from the header, with `.pdf` appended for PDF content types
fn document_name(headers: &HeaderMap) -> String {
    let name = headers
        .get(DOCUMENT_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("upload")
        .to_string();

    let pdf_content = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.trim().starts_with("application/pdf"));

    if pdf_content && !name.to_ascii_lowercase().ends_with(".pdf") {
        format!("{}.pdf", name)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_name_defaults() {
        assert_eq!(document_name(&HeaderMap::new()), "upload");
    }

    #[test]
    fn test_pdf_content_type_marks_name() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        headers.insert(DOCUMENT_NAME_HEADER, HeaderValue::from_static("acord-form"));
        assert_eq!(document_name(&headers), "acord-form.pdf");

        headers.insert(DOCUMENT_NAME_HEADER, HeaderValue::from_static("ACORD.PDF"));
        assert_eq!(document_name(&headers), "ACORD.PDF");
    }
}
