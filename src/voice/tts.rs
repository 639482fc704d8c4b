//! `ElevenLabs` text-to-speech client

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{Error, Result};

/// A voice available to the account
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<Voice>,
}

/// Synthesizes speech with `ElevenLabs`
#[derive(Clone)]
pub struct ElevenLabs {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl ElevenLabs {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: &str, model: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: SecretString::from(api_key.to_string()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Voices available to the account
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn voices(&self) -> Result<Vec<Voice>> {
        let response = self
            .client
            .get(format!("{}/v1/voices", self.base_url))
            .header("xi-api-key", self.api_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs voices error {status}: {body}")));
        }

        let voices: VoicesResponse = response.json().await?;
        Ok(voices.voices)
    }

    /// Id of the voice called `name`
    ///
    /// # Errors
    ///
    /// Returns error if the voice list cannot be fetched
    pub async fn find_voice_id(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .voices()
            .await?
            .into_iter()
            .find(|v| v.name == name)
            .map(|v| v.voice_id))
    }

    /// Synthesize text to speech
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!("{}/v1/text-to-speech/{voice_id}", self.base_url);

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(Error::Tts("ElevenLabs returned no audio".to_string()));
        }
        Ok(audio.to_vec())
    }
}
