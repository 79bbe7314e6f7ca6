pub mod problem;

use crate::domain::error::RelayError;
use crate::domain::upload::FILE_FIELD;
use crate::infrastructure::clients::AnalysisServiceClient;
use crate::infrastructure::config::RelayConfig;
use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{dev::Server, post, web, App, HttpRequest, HttpResponse, HttpServer};
use futures::StreamExt;
use std::net::SocketAddr;
use tracing::{debug, error, info, warn};

pub struct RelayState {
    pub analysis_client: AnalysisServiceClient,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            analysis_client: AnalysisServiceClient::new(config),
        }
    }
}

/// The uploaded file as read off the inbound request.
struct InboundFile {
    file_name: String,
    bytes: Vec<u8>,
}

#[post("/analyze")]
async fn analyze(
    req: HttpRequest,
    payload: Multipart,
    data: web::Data<RelayState>,
) -> Result<HttpResponse, RelayError> {
    let result = relay_upload(&req, payload, &data).await;
    match &result {
        Ok(_) => info!("Analysis relayed successfully"),
        Err(RelayError::NoFileUploaded) => warn!("Rejected analyze request without a file"),
        Err(RelayError::Downstream) => warn!("Analysis service returned an error"),
        Err(RelayError::Transport(message)) => error!(error = %message, "Relay failed"),
    }
    result
}

async fn relay_upload(
    req: &HttpRequest,
    payload: Multipart,
    data: &RelayState,
) -> Result<HttpResponse, RelayError> {
    if !is_multipart(req) {
        return Err(RelayError::NoFileUploaded);
    }

    let file = read_file_field(payload)
        .await?
        .filter(|file| !file.bytes.is_empty())
        .ok_or(RelayError::NoFileUploaded)?;

    info!(
        file_name = %file.file_name,
        size = file.bytes.len(),
        "Relaying upload to analysis service"
    );

    let analysis = data
        .analysis_client
        .upload_dataset(&file.file_name, file.bytes)
        .await?;
    Ok(HttpResponse::Ok().json(analysis))
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

/// Finds the `file` part and buffers it. Other parts are skipped.
///
/// A body that fails to parse before its first part (no boundary, garbage
/// instead of a form) carries no file and is reported as such.
async fn read_file_field(mut payload: Multipart) -> Result<Option<InboundFile>, RelayError> {
    let mut seen_part = false;
    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(err) if !seen_part => {
                debug!(error = %err, "Multipart body has no readable parts");
                return Ok(None);
            }
            Err(err) => return Err(RelayError::Transport(err.to_string())),
        };
        seen_part = true;

        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(|name| name.to_string());
        let is_file_field = field.name() == Some(FILE_FIELD);

        match file_name {
            Some(file_name) if is_file_field => {
                debug!(
                    file_name = %file_name,
                    declared_type = ?field.content_type(),
                    "Reading uploaded file"
                );
                let bytes = read_field_bytes(&mut field).await?;
                return Ok(Some(InboundFile { file_name, bytes }));
            }
            _ => {
                read_field_bytes(&mut field).await?;
            }
        }
    }
    Ok(None)
}

async fn read_field_bytes(field: &mut Field) -> Result<Vec<u8>, RelayError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| RelayError::Transport(e.to_string()))?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Browser requests are only accepted from the configured origin.
pub fn build_cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allow_any_method()
        .allow_any_header()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").service(analyze));
}

pub struct RunningRelay {
    pub server: Server,
    pub local_addr: SocketAddr,
}

pub fn start_server(config: &RelayConfig) -> std::io::Result<RunningRelay> {
    let state = web::Data::new(RelayState::new(config));
    let allowed_origin = config.allowed_origin.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&allowed_origin))
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?;

    let local_addr = server.addrs().first().copied().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "relay bound no address")
    })?;

    info!(
        addr = %local_addr,
        downstream = %config.downstream_upload_url(),
        allowed_origin = %config.allowed_origin,
        "Relay endpoint listening"
    );

    Ok(RunningRelay {
        server: server.run(),
        local_addr,
    })
}
