#![allow(dead_code)]

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use csv_relay_lib::infrastructure::config::RelayConfig;
use futures::StreamExt;
use std::sync::{Arc, Mutex};

pub const BOUNDARY: &str = "----csvrelaytestboundary";

/// Builds the relay app around `$config` and initialises it as a test service.
macro_rules! relay_service {
    ($config:expr) => {{
        let config: &csv_relay_lib::infrastructure::config::RelayConfig = $config;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(csv_relay_lib::interfaces::http::build_cors(
                    &config.allowed_origin,
                ))
                .app_data(actix_web::web::Data::new(
                    csv_relay_lib::interfaces::http::RelayState::new(config),
                ))
                .configure(csv_relay_lib::interfaces::http::configure_routes),
        )
        .await
    }};
}

#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

struct DownstreamState {
    status: u16,
    body: String,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
}

/// An in-process stand-in for the analysis service's `/upload-dataset` route.
pub struct FakeDownstream {
    pub base_url: String,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
}

impl FakeDownstream {
    pub fn received(&self) -> Vec<ReceivedPart> {
        self.received.lock().unwrap().clone()
    }
}

async fn upload_dataset(mut payload: Multipart, state: web::Data<DownstreamState>) -> HttpResponse {
    while let Some(Ok(mut field)) = payload.next().await {
        let part_name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(|name| name.to_string());
        let content_type = field.content_type().map(|mime| mime.to_string());
        let mut bytes = Vec::new();
        while let Some(Ok(chunk)) = field.next().await {
            bytes.extend_from_slice(&chunk);
        }
        state.received.lock().unwrap().push(ReceivedPart {
            field: part_name,
            file_name,
            content_type,
            bytes,
        });
    }

    HttpResponse::build(StatusCode::from_u16(state.status).unwrap())
        .content_type("application/json")
        .body(state.body.clone())
}

/// Starts a fake analysis service answering every upload with `status` and `body`.
pub fn spawn_downstream(status: u16, body: &str) -> FakeDownstream {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = web::Data::new(DownstreamState {
        status,
        body: body.to_string(),
        received: received.clone(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/upload-dataset", web::post().to(upload_dataset))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    FakeDownstream {
        base_url: format!("http://{}", addr),
        received,
    }
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn relay_config(downstream_base_url: &str) -> RelayConfig {
    RelayConfig {
        port: 0,
        downstream_base_url: downstream_base_url.to_string(),
        ..RelayConfig::default()
    }
}

pub fn file_part(field: &str, file_name: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        BOUNDARY, field, file_name, content_type
    )
    .into_bytes();
    part.extend_from_slice(content);
    part.extend_from_slice(b"\r\n");
    part
}

pub fn text_part(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, field, value
    )
    .into_bytes()
}

pub fn multipart_body(parts: &[Vec<u8>]) -> Vec<u8> {
    let mut body = parts.concat();
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
