// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record upload and retrieval endpoints.
//!
//! Both endpoints require the wallet signing headers. Body parsing problems
//! are held back until the signature has been checked, so an unauthenticated
//! caller always gets a 401 regardless of what it sent.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    auth::{Action, Signed},
    error::ExchangeError,
    exchange::{RetrieveInput, UploadInput},
    models::{RetrieveRequest, UploadForm, UploadReceipt},
    state::AppState,
};

/// Upload and encrypt a record for a patient.
///
/// The caller must be a verified issuer. The response carries the only copy
/// of the decryption key.
#[utoipa::path(
    post,
    path = "/v1/records",
    tag = "Records",
    params(
        ("x-wallet-address" = String, Header, description = "Signer wallet address"),
        ("x-signature" = String, Header, description = "EIP-191 signature of `RecordExchange:upload:<timestamp>`"),
        ("x-timestamp" = i64, Header, description = "Unix seconds used in the signed message"),
        ("x-action" = String, Header, description = "Must be `upload`")
    ),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Record stored", body = UploadReceipt),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 401, description = "Signature rejected"),
        (status = 403, description = "Caller is not a verified issuer"),
        (status = 503, description = "Registry or content store unavailable")
    )
)]
pub async fn upload_record(
    Signed(request): Signed,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // The form is only drained once the signature checks out.
    let identity = match state.exchange.authenticate(&request, Action::Upload) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };

    let (input, form_error) = match multipart {
        Ok(multipart) => read_upload_form(multipart).await,
        Err(rejection) => (UploadInput::default(), Some(rejection.into_response())),
    };

    match state.exchange.upload_as(identity, input).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => error_response(err, form_error),
    }
}

/// Fetch and decrypt a record.
///
/// Allowed for the patient and for anyone the patient has granted access to
/// in the registry. The body is the original file.
#[utoipa::path(
    post,
    path = "/v1/records/retrieve",
    tag = "Records",
    params(
        ("x-wallet-address" = String, Header, description = "Signer wallet address"),
        ("x-signature" = String, Header, description = "EIP-191 signature of `RecordExchange:retrieve:<timestamp>`"),
        ("x-timestamp" = i64, Header, description = "Unix seconds used in the signed message"),
        ("x-action" = String, Header, description = "Must be `retrieve`")
    ),
    request_body = RetrieveRequest,
    responses(
        (status = 200, description = "Decrypted record bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 401, description = "Signature rejected"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "No record at this address"),
        (status = 422, description = "Record could not be decrypted"),
        (status = 503, description = "Registry or content store unavailable")
    )
)]
pub async fn retrieve_record(
    Signed(request): Signed,
    State(state): State<AppState>,
    body: Result<Json<RetrieveRequest>, JsonRejection>,
) -> Response {
    let (body, body_error) = match body {
        Ok(Json(body)) => (body, None),
        Err(rejection) => (RetrieveRequest::default(), Some(rejection.into_response())),
    };
    let input = RetrieveInput {
        storage_address: body.storage_address,
        key: body.key,
        patient_address: body.patient_address,
    };

    let record = match state.exchange.retrieve(&request, input).await {
        Ok(record) => record,
        Err(err) => return error_response(err, body_error),
    };

    let requested_name = body
        .file_name
        .as_deref()
        .map(sanitize_file_name)
        .filter(|name| !name.is_empty());
    let content_type = content_type_for(requested_name.as_deref(), &record.bytes);
    let file_name = requested_name
        .unwrap_or_else(|| sanitize_file_name(&format!("record-{}", record.storage_address)));

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        record.bytes,
    )
        .into_response()
}

/// Collect the upload form fields.
///
/// Returns whatever was read before an error, plus the error response to
/// surface if validation then finds the form incomplete.
async fn read_upload_form(mut multipart: Multipart) -> (UploadInput, Option<Response>) {
    let mut input = UploadInput::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return (input, None),
            Err(e) => return (input, Some(e.into_response())),
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                input.file_name = field.file_name().map(str::to_string);
                input.content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => input.file = Some(bytes.to_vec()),
                    Err(e) => return (input, Some(e.into_response())),
                }
            }
            Some("patientAddress") => match field.text().await {
                Ok(text) => input.patient_address = Some(text),
                Err(e) => return (input, Some(e.into_response())),
            },
            _ => {}
        }
    }
}

/// Prefer the body rejection over a generic "missing parameter" error.
fn error_response(err: ExchangeError, body_error: Option<Response>) -> Response {
    match (err, body_error) {
        (ExchangeError::ParamsMissing(_), Some(rejection)) => rejection,
        (err, _) => err.into_response(),
    }
}

/// Content type for a retrieved record.
///
/// The file name extension wins. Without a usable name, a few common
/// document and image signatures are recognized; anything else is binary.
pub fn content_type_for(file_name: Option<&str>, bytes: &[u8]) -> String {
    if let Some(mime) = file_name.and_then(|name| mime_guess::from_path(name).first()) {
        return mime.to_string();
    }

    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"%PDF-", "application/pdf"),
        (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
        (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
    ];
    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| mime.to_string())
        .unwrap_or_else(|| mime_guess::mime::APPLICATION_OCTET_STREAM.to_string())
}

/// Keep a file name safe for a quoted `Content-Disposition` value.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.trim()
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
