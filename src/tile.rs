use std::path::PathBuf;

use actix_web::{get, http::header::ContentType, web, HttpResponse};

use crate::{
    error::ApiError,
    model::{Carrier, CarrierFilter},
    number,
};

const MIN_ZOOM: i64 = 12;
const MAX_ZOOM: i64 = 17;
// the single tile covering the service area at MIN_ZOOM
const BASE_X: i64 = 2280;
const BASE_Y: i64 = 1476;

/// Directory holding the rendered `{zoom}-{x}-{y}-{gen}-{provider}.png` tiles.
#[derive(Debug, Clone)]
pub struct TileRoot(pub PathBuf);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileKey {
    pub zoom: i64,
    pub x: i64,
    pub y: i64,
    pub generation: i64,
    pub carrier: Carrier,
}

impl TileKey {
    pub fn parse(zoom: &str, x: &str, y: &str, generation: &str, provider: &str) -> Option<Self> {
        let whole = |s: &str| number::parse(s).map(|x| number::round(x) as i64);
        let key = Self {
            zoom: whole(zoom)?,
            x: whole(x)?,
            y: whole(y)?,
            generation: whole(generation)?,
            carrier: provider.parse::<CarrierFilter>().ok()?.carrier()?,
        };
        key.in_bounds().then_some(key)
    }

    /// Whether the tile lies over the service area.
    fn in_bounds(&self) -> bool {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return false;
        }
        let scale = 1 << (self.zoom - MIN_ZOOM);
        (BASE_X * scale..(BASE_X + 1) * scale).contains(&self.x)
            && (BASE_Y * scale..(BASE_Y + 1) * scale).contains(&self.y)
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}.png",
            self.zoom,
            self.x,
            self.y,
            self.generation,
            self.carrier.index()
        )
    }
}

#[get("/tile/{zoom}/{x}/{y}/{gen}/{provider}")]
pub async fn service(
    path: web::Path<(String, String, String, String, String)>,
    root: web::Data<TileRoot>,
) -> Result<HttpResponse, ApiError> {
    let (zoom, x, y, generation, provider) = path.into_inner();
    let key = TileKey::parse(&zoom, &x, &y, &generation, &provider)
        .ok_or(ApiError::Parameters("Parameters must be supplied and valid!"))?;

    let path = root.0.join(key.file_name());
    match tokio::fs::read(&path).await {
        Ok(data) => Ok(HttpResponse::Ok().content_type(ContentType::png()).body(data)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "tile unavailable");
            Err(ApiError::Parameters("Unknown filename"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use actix_web::{
        http::StatusCode,
        test::{call_service, init_service, read_body, TestRequest},
        App,
    };

    use super::*;

    fn key(zoom: &str, x: &str, y: &str) -> Option<TileKey> {
        TileKey::parse(zoom, x, y, "4", "22001")
    }

    #[test]
    fn base_tile() {
        let key = key("12", "2280", "1476").unwrap();
        assert_eq!(key.file_name(), "12-2280-1476-4-1.png");
        assert!(TileKey::parse("12", "2281", "1476", "4", "22001").is_none());
        assert!(TileKey::parse("12", "2280", "1475", "4", "22001").is_none());
    }

    #[test]
    fn scaled_window() {
        // 2^(15-12) = 8 tiles per base tile side
        assert!(key("15", "18240", "11808").is_some());
        assert!(key("15", "18247", "11815").is_some());
        assert!(key("15", "18248", "11808").is_none());
        assert!(key("15", "18239", "11808").is_none());
        assert!(key("15", "18240", "11816").is_none());
    }

    #[test]
    fn zoom_range() {
        assert!(key("11", "1140", "738").is_none());
        assert!(key("18", "583680", "377856").is_none());
        assert!(key("17", "72960", "47232").is_some());
        assert!(key("12.4", "2280.2", "1475.5").is_some());
    }

    #[test]
    fn provider_must_be_concrete() {
        assert!(TileKey::parse("12", "2280", "1476", "4", "all").is_none());
        assert!(TileKey::parse("12", "2280", "1476", "4", "22006").is_none());
        assert!(TileKey::parse("12", "2280", "1476", "four", "22005").is_none());
    }

    #[actix_web::test]
    async fn serves_rendered_tiles() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("13-4560-2952-3-2.png"), b"\x89PNG").unwrap();

        let app = init_service(
            App::new()
                .app_data(web::Data::new(TileRoot(dir.path().to_path_buf())))
                .service(service),
        )
        .await;

        let request = TestRequest::get().uri("/tile/13/4560/2952/3/22002").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await.as_ref(), b"\x89PNG");

        let request = TestRequest::get().uri("/tile/13/4561/2952/3/22002").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = TestRequest::get().uri("/tile/13/4560/2952/1/all").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
