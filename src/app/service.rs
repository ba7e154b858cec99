// NerView - app/service.rs
//
// Client side of the external prediction service.
//
// The service owns tagging, statistics and PDF rendering; this module only
// moves bytes. Calls are blocking, one request at a time, with no retry: a
// failure is returned to the caller, who may simply call again.

use crate::core::model::{AnalysisResult, Entity, Statistics, TypeCount};
use crate::util::constants::{
    EXPORT_PDF_PATH, MAX_ERROR_BODY_CHARS, PREDICT_FILE_PATH, PREDICT_TEXT_PATH,
    UPLOAD_FIELD_NAME,
};
use crate::util::error::ServiceError;
use reqwest::blocking::{multipart, Client, Response};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Operations the client needs from a prediction service.
pub trait PredictionService {
    /// Tag free text.
    fn analyze_text(&self, text: &str) -> Result<AnalysisResult, ServiceError>;

    /// Upload a document (PDF, DOCX, ...) for server-side parsing and tagging.
    fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, ServiceError>;

    /// Render a PDF report. Returns the PDF bytes untouched.
    fn export_pdf(&self, request: &PdfReportRequest<'_>) -> Result<Vec<u8>, ServiceError>;
}

/// Body of the PDF report request.
#[derive(Debug, Serialize)]
pub struct PdfReportRequest<'a> {
    pub text: &'a str,
    pub entities: &'a [Entity],
    pub statistics: Option<&'a Statistics>,
    pub entities_by_type: &'a [TypeCount],
}

impl<'a> PdfReportRequest<'a> {
    pub fn new(text: &'a str, result: &'a AnalysisResult) -> Self {
        let statistics = result.statistics.as_ref();
        Self {
            text,
            entities: result.entities(),
            statistics,
            entities_by_type: statistics.map_or(&[][..], |s| s.by_type.as_slice()),
        }
    }
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

/// [`PredictionService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    http: Client,
    base_url: String,
}

impl HttpPredictionService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Client { source: e })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn parse_result(url: &str, response: Response) -> Result<AnalysisResult, ServiceError> {
        let response = check_status(url, response)?;
        response.json().map_err(|e| ServiceError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

impl PredictionService for HttpPredictionService {
    fn analyze_text(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
        let url = self.url(PREDICT_TEXT_PATH);
        tracing::debug!(url = %url, chars = text.chars().count(), "Sending text for analysis");

        let response = self
            .http
            .post(&url)
            .json(&TextRequest { text })
            .send()
            .map_err(|e| ServiceError::Request {
                url: url.clone(),
                source: e,
            })?;

        Self::parse_result(&url, response)
    }

    fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, ServiceError> {
        let url = self.url(PREDICT_FILE_PATH);
        tracing::debug!(url = %url, path = %path.display(), "Uploading document for analysis");

        let form = multipart::Form::new()
            .file(UPLOAD_FIELD_NAME, path)
            .map_err(|e| ServiceError::Upload {
                path: path.to_path_buf(),
                source: e,
            })?;

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| ServiceError::Request {
                url: url.clone(),
                source: e,
            })?;

        Self::parse_result(&url, response)
    }

    fn export_pdf(&self, request: &PdfReportRequest<'_>) -> Result<Vec<u8>, ServiceError> {
        let url = self.url(EXPORT_PDF_PATH);
        tracing::debug!(url = %url, entities = request.entities.len(), "Requesting PDF report");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| ServiceError::Request {
                url: url.clone(),
                source: e,
            })?;

        let response = check_status(&url, response)?;
        let bytes = response.bytes().map_err(|e| ServiceError::Decode {
            url: url.clone(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}

/// Turn a non-2xx response into `ServiceError::Status`.
fn check_status(url: &str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    tracing::warn!(url, status = status.as_u16(), "Prediction service returned an error");
    Err(ServiceError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: truncate_body(&body),
    })
}

fn truncate_body(body: &str) -> String {
    body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
}
