use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::{DialogueService, SynthesisService, TranscriptionService};
use crate::error::ClientError;
use crate::types::{
    DialogueRequest, DialogueResponse, LeadRequest, MeetingRequest, MessageRecord,
    SynthesisRequest, TranscriptionResponse,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the widget backend.
    pub base_url: String,
    /// Per-request timeout. The source widget had none; a hung backend call
    /// would stall a turn forever, so one is enforced here.
    pub request_timeout_secs: u64,
    /// Voice name passed to the synthesis endpoint.
    pub voice: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            request_timeout_secs: 30,
            voice: "alloy".into(),
        }
    }
}

/// Reqwest-backed implementation of the three round-trip services plus the
/// one-shot lead/meeting endpoints.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check_status(status: reqwest::StatusCode) -> Result<(), ClientError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
            })
        }
    }

    pub async fn submit_lead(&self, lead: &LeadRequest) -> Result<(), ClientError> {
        let resp = self.http.post(self.url("/api/leads")).json(lead).send().await?;
        Self::check_status(resp.status())?;
        tracing::info!("Lead submitted");
        Ok(())
    }

    pub async fn create_meeting(&self, meeting: &MeetingRequest) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/zoom/create_meeting"))
            .json(meeting)
            .send()
            .await?;
        Self::check_status(resp.status())?;
        tracing::info!(start_time = %meeting.start_time, "Meeting scheduled");
        Ok(())
    }
}

#[async_trait]
impl DialogueService for HttpApiClient {
    async fn complete(
        &self,
        prompt: &str,
        history: &[MessageRecord],
    ) -> Result<Vec<MessageRecord>, ClientError> {
        let body = DialogueRequest {
            prompt: prompt.to_string(),
            conversation_history: history.to_vec(),
        };
        let resp = self
            .http
            .post(self.url("/api/message"))
            .json(&body)
            .send()
            .await?;
        Self::check_status(resp.status())?;
        let parsed: DialogueResponse = resp.json().await?;
        Ok(parsed.conversation_history)
    }
}

#[async_trait]
impl TranscriptionService for HttpApiClient {
    async fn transcribe(&self, audio: Vec<u8>, mime: &str) -> Result<String, ClientError> {
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name("utterance.wav")
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(self.url("/transcribe/"))
            .multipart(form)
            .send()
            .await?;
        Self::check_status(resp.status())?;
        let parsed: TranscriptionResponse = resp.json().await?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl SynthesisService for HttpApiClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, ClientError> {
        let body = SynthesisRequest {
            text: text.to_string(),
            voice: voice.to_string(),
        };
        let resp = self.http.post(self.url("/tts/")).json(&body).send().await?;
        Self::check_status(resp.status())?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}
