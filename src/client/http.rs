//! `reqwest` implementation of [`PrinterService`].

use std::time::Duration;

use async_trait::async_trait;
use printdeck_shared::{endpoints, Envelope, ErrorBody, LoadFileRequest, PrinterInfo, SessionCommandRequest};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::PrinterService;
use crate::command::Command;
use crate::error::ControlError;
use crate::model::{FileEntry, PrinterStatus, SessionId};

pub struct HttpPrinterService {
    http: Client,
    base_url: String,
}

impl HttpPrinterService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ControlError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ControlError> {
        let res = self.http.get(self.url(path)).send().await?;
        decode_envelope(res).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<Option<T>, ControlError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.http.post(self.url(path)).json(body).send().await?;
        decode_envelope(res).await
    }
}

/// Turn a response into the envelope payload, classifying failures.
async fn decode_envelope<T: DeserializeOwned>(res: Response) -> Result<Option<T>, ControlError> {
    let status = res.status();
    let bytes = res.bytes().await?;
    if !status.is_success() {
        return Err(rejection(status, &bytes));
    }
    parse_envelope(&bytes)
}

/// An empty success body carries no payload, same as `{}`.
fn parse_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, ControlError> {
    if body.trim_ascii().is_empty() {
        return Ok(None);
    }
    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.payload)
}

fn rejection(status: reqwest::StatusCode, body: &[u8]) -> ControlError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error }) => error,
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request rejected").to_string()
            } else {
                text
            }
        }
    };
    ControlError::RemoteRejection {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl PrinterService for HttpPrinterService {
    async fn printer_info(&self) -> Result<PrinterStatus, ControlError> {
        let info: Option<PrinterInfo> = self.get(endpoints::PRINTER_INFO).await?;
        info.map(PrinterStatus::from)
            .ok_or_else(|| ControlError::MalformedResponse("status response has no payload".to_string()))
    }

    async fn list_sessions(&self) -> Result<Option<Vec<SessionId>>, ControlError> {
        let ids: Option<Vec<String>> = self.get(endpoints::SESSIONS).await?;
        Ok(ids.map(|ids| ids.into_iter().map(SessionId::from).collect()))
    }

    async fn list_files(&self) -> Result<Option<Vec<FileEntry>>, ControlError> {
        self.get(endpoints::GCODES).await
    }

    async fn send_command(&self, session: &SessionId, command: &Command) -> Result<Option<String>, ControlError> {
        let path = command.kind().endpoint();
        match command {
            Command::Load { file_id } => {
                let body = LoadFileRequest {
                    session_id: session.as_str().to_string(),
                    file_id: file_id.clone(),
                };
                self.post(path, &body).await
            }
            _ => {
                let body = SessionCommandRequest {
                    session_id: session.as_str().to_string(),
                };
                self.post(path, &body).await
            }
        }
    }
}
