//! AssemblyAI speech-to-text client
//!
//! Three steps against `{base_url}/v2`: upload the audio bytes, request a
//! diarized transcript for the returned URL, then poll until the job is
//! `completed` or `error`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use call_eval_config::TranscriptionConfig;
use call_eval_core::{RawTranscript, RawUtterance, Result, Transcriber};

use crate::LlmError;

const SERVICE: &str = "assemblyai";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct SpeakerOptions {
    min_speakers_expected: u32,
    max_speakers_expected: u32,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    speaker_labels: bool,
    speaker_options: SpeakerOptions,
}

#[derive(Debug, Deserialize)]
struct TranscriptStatus {
    id: String,
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    utterances: Option<Vec<RawUtterance>>,
}

/// Transcriber backed by the AssemblyAI REST API
#[derive(Debug, Clone)]
pub struct AssemblyAiTranscriber {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    timeout: Duration,
    min_speakers: u32,
    max_speakers: u32,
}

impl AssemblyAiTranscriber {
    pub fn new(config: &TranscriptionConfig, api_key: impl Into<String>) -> std::result::Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/v2", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            timeout: Duration::from_secs(config.timeout_secs),
            min_speakers: config.min_speakers,
            max_speakers: config.max_speakers,
        })
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> std::result::Result<T, LlmError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::request(SERVICE, e))?;

        if !status.is_success() {
            return Err(LlmError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| LlmError::Malformed {
            service: SERVICE,
            message: e.to_string(),
        })
    }

    async fn upload(&self, audio: Vec<u8>) -> std::result::Result<String, LlmError> {
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(audio)
            .send()
            .await
            .map_err(|e| LlmError::request(SERVICE, e))?;

        let uploaded: UploadResponse = Self::read_json(response).await?;
        Ok(uploaded.upload_url)
    }

    async fn request_transcript(&self, audio_url: &str) -> std::result::Result<String, LlmError> {
        let request = TranscriptRequest {
            audio_url,
            speaker_labels: true,
            speaker_options: SpeakerOptions {
                min_speakers_expected: self.min_speakers,
                max_speakers_expected: self.max_speakers,
            },
        };

        let response = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::request(SERVICE, e))?;

        let job: TranscriptStatus = Self::read_json(response).await?;
        Ok(job.id)
    }

    async fn poll(&self, id: &str) -> std::result::Result<RawTranscript, LlmError> {
        let url = format!("{}/transcript/{}", self.base_url, id);
        let started = Instant::now();

        loop {
            let response = self
                .client
                .get(&url)
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| LlmError::request(SERVICE, e))?;

            let job: TranscriptStatus = Self::read_json(response).await?;
            match job.status.as_str() {
                "completed" => {
                    let utterances = job.utterances.unwrap_or_default();
                    tracing::info!(id, utterances = utterances.len(), "Transcription completed");
                    return Ok(RawTranscript::new(utterances));
                }
                "error" => {
                    return Err(LlmError::Request {
                        service: SERVICE,
                        message: job
                            .error
                            .unwrap_or_else(|| "transcription failed".to_string()),
                    });
                }
                status => {
                    tracing::debug!(id, status, "Transcription pending");
                }
            }

            if started.elapsed() >= self.timeout {
                return Err(LlmError::Timeout {
                    service: SERVICE,
                    seconds: self.timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl Transcriber for AssemblyAiTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<RawTranscript> {
        tracing::info!(file_name, bytes = audio.len(), "Uploading audio for transcription");
        let audio_url = self.upload(audio).await?;
        let id = self.request_transcript(&audio_url).await?;
        tracing::debug!(id = %id, "Transcription requested");
        Ok(self.poll(&id).await?)
    }

    fn name(&self) -> &str {
        SERVICE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_with_null_utterances() {
        let job: TranscriptStatus =
            serde_json::from_str(r#"{"id": "t1", "status": "completed", "utterances": null}"#).unwrap();
        assert_eq!(job.id, "t1");
        assert!(job.utterances.is_none());
    }

    #[test]
    fn test_status_with_utterances() {
        let body = r#"{
            "id": "t2",
            "status": "completed",
            "utterances": [
                {"speaker": "A", "text": "Hello", "start": 0, "end": 900, "confidence": 0.93, "words": []},
                {"speaker": "B", "text": "Hi there", "start": 1000, "end": 1800, "confidence": 0.88, "words": []}
            ]
        }"#;
        let job: TranscriptStatus = serde_json::from_str(body).unwrap();
        let utterances = job.utterances.unwrap();
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[1].speaker, "B");
    }

    #[test]
    fn test_request_body_shape() {
        let request = TranscriptRequest {
            audio_url: "https://cdn.example/upload/1",
            speaker_labels: true,
            speaker_options: SpeakerOptions {
                min_speakers_expected: 2,
                max_speakers_expected: 5,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["speaker_labels"], true);
        assert_eq!(value["speaker_options"]["max_speakers_expected"], 5);
    }

    #[test]
    fn test_base_url_normalized() {
        let config = TranscriptionConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..TranscriptionConfig::default()
        };
        let transcriber = AssemblyAiTranscriber::new(&config, "key").unwrap();
        assert_eq!(transcriber.base_url, "http://localhost:9000/v2");
    }
}
