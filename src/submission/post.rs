use actix_web::{post, web, HttpResponse, Responder};
use serde_json::{json, Value};

use super::candidate::validate_batch;
use crate::{db::SampleStore, error::ApiError};

pub const MISSING_PARAMETERS: &str = "Required parameters have not been supplied";

#[post("/post")]
pub async fn service(
    data: web::Json<Value>,
    store: web::Data<dyn SampleStore>,
) -> Result<impl Responder, ApiError> {
    let Value::Array(candidates) = data.into_inner() else {
        return Err(ApiError::Parameters(MISSING_PARAMETERS));
    };

    let samples = validate_batch(&candidates);
    tracing::debug!(
        accepted = samples.len(),
        dropped = candidates.len() - samples.len(),
        "validated submission"
    );
    if samples.is_empty() {
        return Err(ApiError::Parameters(
            "All objects in supplied array are invalid",
        ));
    }

    store.insert(&samples).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
