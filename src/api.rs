use reqwest::{
    blocking::{Client, Response},
    header::CONTENT_TYPE,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::{Device, ModelType, Settings},
    error::ApiError,
    types::{
        ErrorBody, InitRequest, InitResponse, PredictRequest, PredictResponse, StatusResponse,
        ValidateRequest, ValidateResponse,
    },
};

/// The four operations offered by the remote Maia2 service.
///
/// Each call is one request/response pair. Implementations must not retry
/// or cache.
pub trait PredictionApi {
    fn status(&self) -> Result<StatusResponse, ApiError>;

    fn initialize(&self, model_type: ModelType, device: Device) -> Result<InitResponse, ApiError>;

    fn predict(
        &self,
        fen: &str,
        elo_self: u32,
        elo_opponent: u32,
        top_k: u32,
    ) -> Result<PredictResponse, ApiError>;

    fn validate_fen(&self, fen: &str) -> Result<ValidateResponse, ApiError>;
}

/// Blocking HTTP/JSON client for the service under `Settings::api_url`.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(method = "GET", %url, "api request");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        read_json(response, &url)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = self.url(path);
        let body = serde_json::to_vec(body)?;
        tracing::debug!(method = "POST", %url, body = %String::from_utf8_lossy(&body), "api request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        read_json(response, &url)
    }
}

fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| ApiError::Unreachable(e.to_string()))?;
    tracing::debug!(%url, status = status.as_u16(), body = %text, "api response");

    if !status.is_success() {
        // Error bodies are not guaranteed to be JSON.
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(%url, status = status.as_u16(), ?message, "api request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&text)?)
}

impl PredictionApi for HttpClient {
    fn status(&self) -> Result<StatusResponse, ApiError> {
        self.get("status")
    }

    fn initialize(&self, model_type: ModelType, device: Device) -> Result<InitResponse, ApiError> {
        self.post("init", &InitRequest { model_type, device })
    }

    fn predict(
        &self,
        fen: &str,
        elo_self: u32,
        elo_opponent: u32,
        top_k: u32,
    ) -> Result<PredictResponse, ApiError> {
        self.post(
            "predict",
            &PredictRequest {
                fen,
                elo_self,
                elo_opponent,
                top_k,
            },
        )
    }

    fn validate_fen(&self, fen: &str) -> Result<ValidateResponse, ApiError> {
        self.post("validate_fen", &ValidateRequest { fen })
    }
}

impl<T: PredictionApi + ?Sized> PredictionApi for &T {
    fn status(&self) -> Result<StatusResponse, ApiError> {
        (**self).status()
    }

    fn initialize(&self, model_type: ModelType, device: Device) -> Result<InitResponse, ApiError> {
        (**self).initialize(model_type, device)
    }

    fn predict(
        &self,
        fen: &str,
        elo_self: u32,
        elo_opponent: u32,
        top_k: u32,
    ) -> Result<PredictResponse, ApiError> {
        (**self).predict(fen, elo_self, elo_opponent, top_k)
    }

    fn validate_fen(&self, fen: &str) -> Result<ValidateResponse, ApiError> {
        (**self).validate_fen(fen)
    }
}
