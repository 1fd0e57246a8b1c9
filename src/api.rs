use crate::classifier::{self, Classifier, ClassifierError, Label};
use crate::statistics::{Aggregator, Summary};
use actix_files as fs;
use actix_web::error::{BlockingError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpResponse, ResponseError, get, post, web};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Choose Tool</title>
    <style>
        body { display:flex; flex-direction:column; align-items:center; justify-content:center; height:100vh; font-family:system-ui; }
        button { padding:20px 40px; margin:20px; font-size:20px; cursor:pointer; border-radius:8px; border:none; background:#3498db; color:white; }
        button:hover { background:#2980b9; }
    </style>
</head>
<body>
    <h1>Select a Tool</h1>
    <button onclick="location.href='/sentiment'">Sentiment Analyzer</button>
    <button onclick="location.href='/clock'">Circular Clock</button>
</body>
</html>
"#;

/// Largest `/analyze` body accepted by default. Long text is truncated by the
/// classifier, not rejected here.
pub const DEFAULT_MAX_BODY: usize = 16 * 1024 * 1024;

/// Directory holding the page markup.
#[derive(Debug, Clone)]
pub struct Templates(pub PathBuf);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No text provided")]
    NoText,

    #[error("Text too large")]
    TooLarge,

    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("blocking pool failed: {0}")]
    Blocking(#[from] BlockingError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoText => StatusCode::BAD_REQUEST,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Classifier(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::NoText => "No text provided",
            ApiError::TooLarge => "Text too large",
            _ => {
                log::error!("Analysis failed: err={}", self);
                "Internal server error"
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    score: i64,
    label: Label,
    emoji: &'static str,
    positive: i64,
    negative: i64,
    #[serde(flatten)]
    summary: Summary,
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LANDING_PAGE)
}

#[get("/sentiment")]
async fn sentiment(templates: web::Data<Templates>) -> Result<fs::NamedFile, Error> {
    Ok(fs::NamedFile::open(templates.0.join("sentiment.html"))?)
}

#[get("/clock")]
async fn clock(templates: web::Data<Templates>) -> Result<fs::NamedFile, Error> {
    Ok(fs::NamedFile::open(templates.0.join("clock.html"))?)
}

#[post("/analyze")]
async fn analyze(
    body: Result<web::Json<AnalyzeRequest>, Error>,
    classifier: web::Data<dyn Classifier>,
    aggregator: web::Data<Aggregator>,
) -> Result<HttpResponse, ApiError> {
    let body = match body {
        Ok(body) => Some(body.into_inner()),
        Err(err) => match err.as_error::<JsonPayloadError>() {
            Some(JsonPayloadError::Overflow { limit })
            | Some(JsonPayloadError::OverflowKnownLength { limit, .. }) => {
                log::warn!("Rejected body over limit: limit={}", limit);
                return Err(ApiError::TooLarge);
            }
            // An unparsable body counts as missing text.
            _ => {
                log::debug!("Unreadable body: err={}", err);
                None
            }
        },
    };
    let text = body
        .and_then(|b| b.text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            log::debug!("Rejected request without text");
            ApiError::NoText
        })?;

    let classifier = classifier.into_inner();
    let probs = web::block(move || classifier.classify(&text)).await??;

    let label = Label::decide(&probs);
    let summary = aggregator.record_and_summarize(probs.observation());
    let score = classifier::score(&probs);
    log::debug!(
        "Analyzed: label={:?}, score={}, neutral={:.3}, history={}",
        label,
        score,
        probs.neutral,
        aggregator.len()
    );

    Ok(HttpResponse::Ok().json(AnalyzeResponse {
        score,
        label,
        emoji: label.emoji(),
        positive: classifier::percent(probs.positive),
        negative: classifier::percent(probs.negative),
        summary,
    }))
}

/// Registers the routes. The body limit comes from a `web::JsonConfig` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(sentiment)
        .service(clock)
        .service(analyze);
}
