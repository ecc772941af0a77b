use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use crate::{
    db::SampleStore,
    error::ApiError,
    lookup,
    submission::{self, post::MISSING_PARAMETERS},
    tile::{self, TileRoot},
};

// large offline batches are submitted from phones catching up after a trip
const JSON_LIMIT: usize = 50 * 1024 * 1024;

/// Static information served from `/`.
#[derive(Debug, Clone)]
pub struct Motd(pub String);

#[derive(Serialize)]
struct Info<'a> {
    version: &'static str,
    motd: &'a str,
}

#[get("/")]
pub async fn index(motd: web::Data<Motd>) -> impl Responder {
    HttpResponse::Ok().json(Info {
        version: env!("CARGO_PKG_VERSION"),
        motd: &motd.0,
    })
}

/// JSON extractor settings; undecodable bodies count as missing parameters.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "rejecting request body");
            ApiError::Parameters(MISSING_PARAMETERS).into()
        })
}

/// Shared state handed to every worker.
#[derive(Clone)]
pub struct State {
    pub store: Arc<dyn SampleStore>,
    pub tiles: TileRoot,
    pub motd: Motd,
}

impl State {
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.store.clone()))
            .app_data(web::Data::new(self.tiles.clone()))
            .app_data(web::Data::new(self.motd.clone()))
            .app_data(json_config())
            .service(index)
            .service(lookup::service)
            .service(tile::service)
            .service(submission::post::service);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use actix_web::{
        http::StatusCode,
        test::{call_service, init_service, read_body_json, TestRequest},
        App,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::db::memory::MemoryStore;

    fn state() -> State {
        State {
            store: Arc::new(MemoryStore::default()),
            tiles: TileRoot(PathBuf::from("does-not-exist")),
            motd: Motd("hello".to_owned()),
        }
    }

    #[actix_web::test]
    async fn info() {
        let state = state();
        let app = init_service(App::new().configure(|cfg| state.configure(cfg))).await;
        let response = call_service(&app, TestRequest::get().uri("/").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = read_body_json(response).await;
        assert_eq!(
            body,
            json!({ "version": env!("CARGO_PKG_VERSION"), "motd": "hello" })
        );
    }

    #[actix_web::test]
    async fn routes_every_endpoint() {
        let state = state();
        let app = init_service(App::new().configure(|cfg| state.configure(cfg))).await;

        let request = TestRequest::post()
            .uri("/post")
            .set_json(json!([{
                "latitude": 44.8125,
                "longitude": 20.4612,
                "dbm": -101,
                "type": 1,
                "provider": 22005
            }]))
            .to_request();
        assert_eq!(call_service(&app, request).await.status(), StatusCode::OK);

        let request = TestRequest::get().uri("/get/44.8125/20.4612/all").to_request();
        let body: Value = read_body_json(call_service(&app, request).await).await;
        assert_eq!(body[4][1], json!({ "min": -101, "max": -101, "avg": -101.0 }));
        assert_eq!(body[0][1], json!(-1));

        let request = TestRequest::get().uri("/tile/12/2280/1476/2/22005").to_request();
        let response = call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(response).await;
        assert_eq!(body["reason"], "Unknown filename");
    }
}
