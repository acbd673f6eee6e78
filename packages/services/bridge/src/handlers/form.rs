//! /submit-form 핸들러
//!
//! `submit_form` 액션 게이트 뒤에서만 호출됩니다.

use axum::Json;
use gk_core::policy::Subject;
use serde::Serialize;
use serde_json::Value;

use crate::middleware::current_subject;

#[derive(Debug, Serialize)]
pub struct SubmitFormResponse {
    pub message: String,
}

pub async fn submit_form() -> Json<SubmitFormResponse> {
    let name = current_subject()
        .map(|subject| subject.attribute("name"))
        .and_then(|name| match name {
            Value::String(s) => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(submitted_by = %name, "form submitted");

    Json(SubmitFormResponse {
        message: format!("Form submitted by {}", name),
    })
}
