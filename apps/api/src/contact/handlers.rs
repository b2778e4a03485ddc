use axum::{extract::rejection::JsonRejection, Json};
use serde::Serialize;

use crate::contact::{deliver, ContactRequest};
use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

/// POST /api/contact
pub async fn handle_contact(
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, AppError> {
    let Json(request) = payload?;
    let message = request.validate()?;

    deliver(&message);

    Ok(Json(ContactResponse {
        message: "Message sent successfully".to_string(),
    }))
}
