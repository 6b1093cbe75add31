#![allow(dead_code)]

use std::{
    collections::HashMap,
    io::Cursor,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use actix_http::Request;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test,
};
use api_users::mail::Mailer;
use async_trait::async_trait;
use common::{
    env_config::Config,
    error::{AppError, Res},
};
use db::memory::MemoryStore;
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::{Value, json};
use server::AppState;
use tempfile::TempDir;

pub const PASSWORD: &str = "hunter2hunter2";
const BOUNDARY: &str = "----contacts-test-boundary";

/// Records every verification mail instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Background sends land on the test runtime; give them a moment.
    pub async fn wait_for(&self, count: usize) -> Vec<(String, String)> {
        for _ in 0..100 {
            if self.sent().len() >= count {
                break;
            }
            actix_web::rt::time::sleep(Duration::from_millis(5)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, email: &str, verification_token: &str) -> Res<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), verification_token.to_string()));
        if self.fail {
            return Err(AppError::Internal("mail provider unavailable".to_string()));
        }
        Ok(())
    }
}

pub struct TestEnv {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
    pub uploads: TempDir,
    pub avatars: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let avatars = tempfile::tempdir().unwrap();
        let vars: HashMap<&str, String> = HashMap::from([
            ("DATABASE_URL", "memory://".to_string()),
            ("JWT_SECRET", "integration-secret".to_string()),
            ("UPLOAD_DIR", uploads.path().display().to_string()),
            ("AVATARS_DIR", avatars.path().display().to_string()),
        ]);
        let config = Config::from_vars(|k| vars.get(k).cloned()).unwrap();
        let mailer = Arc::new(mailer);

        Self {
            state: AppState {
                config: Arc::new(config),
                store: Arc::new(MemoryStore::new()),
                mailer: mailer.clone(),
            },
            mailer,
            uploads,
            avatars,
        }
    }
}

/// The application as `main` assembles it, minus CORS.
pub async fn init_app(
    env: &TestEnv,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = env.state.clone();
    test::init_service(
        App::new()
            .wrap(logger::middleware(false))
            .wrap(extractor::middleware())
            .configure(move |cfg| server::configure(cfg, &state)),
    )
    .await
}

pub async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn signup<S>(app: &S, email: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/users/signup")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    send(app, req).await
}

pub async fn login<S>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

/// Registers the account and returns a current bearer token for it.
pub async fn signup_and_login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, _) = signup(app, email).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = login(app, email, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgb([30u8, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Single-part `multipart/form-data` body; returns the content type and the
/// encoded body.
pub fn multipart(field: &str, filename: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
