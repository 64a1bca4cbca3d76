//! Client-side interface to a remote Maia2 move-prediction service.
//!
//! This crate holds everything a front end needs besides the model itself:
//! a FEN codec that turns a position string into an 8×8 board and side to
//! move, a blocking HTTP client for the service's four endpoints, a single
//! application state object that sequences initialization, prediction and
//! position loading, and two renderers (terminal text and HTML).
//!
//! The principal type is [`App`], which owns the current position, the
//! user [`Configuration`] and the last [`PredictionResult`]. It is generic
//! over [`PredictionApi`] so that the network can be swapped out.
//!
//! The library re‑exports `shakmaty` for its piece and colour types.

pub mod api;
pub mod app;
pub mod board;
pub mod config;
mod error;
pub mod render;
mod types;

/// Application state holder.
pub use app::{App, Notice, Phase, Severity};

/// FEN codec.
pub use board::{BoardState, Fen, START_FEN, decode, encode};

/// Remote service client.
pub use api::{HttpClient, PredictionApi};

pub use config::{Configuration, Device, ModelType, Settings};

/// Error types produced by library operations.
pub use error::{ApiError, ConfigError, ErrorKind, FenError};

/// Request and response data structures.
pub use types::{
    InitResponse, MoveProbability, PredictResponse, PredictionResult, StatusResponse,
    ValidateResponse,
};

/// Re-export of `shakmaty` for the piece and colour types.
pub use shakmaty;
