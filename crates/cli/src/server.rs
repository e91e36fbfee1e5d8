//! HTTP dashboard: the default dataset on `/`, uploads on `/upload`, and a
//! small JSON sort endpoint.

use actix_web::{get, post, web, App, HttpResponse, HttpResponseBuilder, HttpServer};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::DashboardCfg;
use crate::loader::Dataset;
use crate::render::{dashboard_page, View};
use crate::sorted::sorted_points;

/// Read-only after start-up; shared by all workers.
pub struct AppState {
    pub title: String,
    pub default: Option<Dataset>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(upload)
        .service(sort_points)
        .service(healthz);
}

pub async fn run(cfg: DashboardCfg, default: Option<Dataset>) -> std::io::Result<()> {
    let state = web::Data::new(AppState {
        title: cfg.title.clone(),
        default,
    });
    let limit = cfg.max_upload_bytes;
    tracing::info!(address = %cfg.address, port = cfg.port, limit, "serve");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(limit))
            .app_data(web::JsonConfig::default().limit(limit))
            .configure(config)
    })
    .bind((cfg.address.as_str(), cfg.port))?
    .run()
    .await
}

fn page(mut builder: HttpResponseBuilder, title: &str, view: View<'_>) -> HttpResponse {
    match dashboard_page(title, view, true) {
        Ok(html) => builder.content_type("text/html; charset=utf-8").body(html),
        Err(e) => {
            tracing::error!(error = %e, "render_failed");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

#[get("/")]
async fn index(state: web::Data<AppState>) -> HttpResponse {
    let view = match &state.default {
        Some(ds) => View::Loaded(ds),
        None => View::Empty,
    };
    page(HttpResponse::Ok(), &state.title, view)
}

#[derive(Deserialize)]
struct UploadQuery {
    filename: String,
    /// Milliseconds since the Unix epoch, as reported by the browser.
    last_modified: Option<i64>,
}

#[post("/upload")]
async fn upload(
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> HttpResponse {
    let name = query.filename.as_str();
    let modified = query.last_modified.and_then(DateTime::<Utc>::from_timestamp_millis);
    match Dataset::from_bytes(name, &body) {
        Ok(ds) => {
            let ds = ds.with_modified(modified);
            tracing::info!(file = name, bytes = body.len(), points = ds.points.len(), "upload");
            page(HttpResponse::Ok(), &state.title, View::Loaded(&ds))
        }
        Err(e) => {
            tracing::warn!(file = name, error = %e, "upload_parse_failed");
            page(
                HttpResponse::UnprocessableEntity(),
                &state.title,
                View::Failed {
                    name,
                    message: e.to_string(),
                },
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct SortRequest {
    points: Vec<[f64; 2]>,
}

#[post("/api/sort")]
async fn sort_points(req: web::Json<SortRequest>) -> HttpResponse {
    let pairs: Vec<(f64, f64)> = req.points.iter().map(|&[x, y]| (x, y)).collect();
    match sorted_points(&pairs) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[get("/healthz")]
async fn healthz() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorted::SortedPoints;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    fn state(default: Option<Dataset>) -> web::Data<AppState> {
        web::Data::new(AppState {
            title: "Point polygons".to_string(),
            default,
        })
    }

    async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
        let bytes = test::read_body(resp).await;
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn index_without_default_invites_upload() {
        let app = test::init_service(App::new().app_data(state(None)).configure(config)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("No dataset loaded yet"));
        assert!(html.contains("upload-data"));
    }

    #[actix_web::test]
    async fn index_renders_default_dataset() {
        let ds = Dataset::from_bytes("dataset1.json", b"[[0,0],[2,0],[2,2],[0,2]]").unwrap();
        let app = test::init_service(App::new().app_data(state(Some(ds))).configure(config)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let html = body_text(resp).await;
        assert!(html.contains("dataset1.json"));
        assert!(html.contains("sorted-polygon-graph"));
    }

    #[actix_web::test]
    async fn csv_upload_renders_plots() {
        let app = test::init_service(App::new().app_data(state(None)).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/upload?filename=pts.csv")
            .set_payload("x,y\n1,1\n-1,-1\n-1,1\n1,-1\n")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("pts.csv"));
        assert!(html.contains("points: 4"));
    }

    #[actix_web::test]
    async fn upload_shows_browser_last_modified() {
        let app = test::init_service(App::new().app_data(state(None)).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/upload?filename=tri.json&last_modified=1700000000000")
            .set_payload("[[0, 0], [4, 0], [0, 3]]")
            .to_request();
        let html = body_text(test::call_service(&app, req).await).await;
        assert!(html.contains("<h6>2023-11-14 22:13:20 UTC</h6>"));
    }

    #[actix_web::test]
    async fn bad_upload_is_reported_not_sorted() {
        let app = test::init_service(App::new().app_data(state(None)).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/upload?filename=notes.txt")
            .set_payload("hello")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(resp).await;
        assert!(html.contains(crate::render::PARSE_FAILURE));
        assert!(!html.contains("<svg"));
    }

    #[actix_web::test]
    async fn sort_endpoint_orders_square() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/sort")
            .set_json(json!({"points": [[-1.0, -1.0], [1.0, 1.0], [-1.0, 1.0], [1.0, -1.0]]}))
            .to_request();
        let resp: SortedPoints = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.centroid, [0.0, 0.0]);
        assert_eq!(
            resp.sorted,
            vec![[1.0, 1.0], [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]]
        );
    }

    #[actix_web::test]
    async fn sort_endpoint_rejects_empty() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/sort")
            .set_json(json!({"points": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[actix_web::test]
    async fn healthz_is_ok() {
        let app = test::init_service(App::new().configure(config)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/healthz").to_request()).await;
        assert!(resp.status().is_success());
    }
}
