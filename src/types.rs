use serde::{Deserialize, Serialize};

use crate::config::{Device, ModelType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveProbability {
    /// Move as sent by the server, usually UCI.
    #[serde(rename = "move")]
    pub mv: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Win probability for the side to move, as returned by the server
    pub win_probability: f64,
    /// Suggested moves in server order
    pub top_moves: Vec<MoveProbability>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitRequest {
    pub model_type: ModelType,
    pub device: Device,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub fen: &'a str,
    pub elo_self: u32,
    pub elo_opponent: u32,
    pub top_k: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateRequest<'a> {
    pub fen: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub initialized: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub win_probability: Option<f64>,
    #[serde(default)]
    pub top_moves: Option<Vec<MoveProbability>>,
}

impl PredictResponse {
    /// The prediction carried by a successful response, if complete.
    pub fn into_result(self) -> Option<PredictionResult> {
        if !self.success {
            return None;
        }
        Some(PredictionResult {
            win_probability: self.win_probability?,
            top_moves: self.top_moves?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of an error response; only the message is of interest.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
