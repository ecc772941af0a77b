use actix_web::{get, web, HttpResponse};

use crate::{db::SampleStore, error::ApiError, model::CarrierFilter, number, query};

const INVALID_POSITION: &str = "`latitude` and `longitude` parameters must be supplied!";

#[get("/get/{latitude}/{longitude}/{provider}")]
pub async fn service(
    path: web::Path<(String, String, String)>,
    store: web::Data<dyn SampleStore>,
) -> Result<HttpResponse, ApiError> {
    let (latitude, longitude, provider) = path.into_inner();
    let (latitude, longitude, filter) = parse(&latitude, &longitude, &provider)
        .ok_or(ApiError::Parameters(INVALID_POSITION))?;

    let summary = query::query(&**store, latitude, longitude, filter).await?;
    Ok(HttpResponse::Ok().json(summary))
}

fn parse(latitude: &str, longitude: &str, provider: &str) -> Option<(f64, f64, CarrierFilter)> {
    let latitude = number::parse(latitude)?;
    let longitude = number::parse(longitude)?;
    let filter = provider.parse().ok()?;
    if latitude < 0.0 && longitude < 0.0 {
        return None;
    }
    Some((latitude, longitude, filter))
}
