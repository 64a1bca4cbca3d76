//! Application state: the one owned object the UI reads from and acts on.
//!
//! [`App`] holds the current position, the user configuration, the model
//! readiness flag, the busy label, the last error and the last prediction.
//! Every user action is a method on it; every outcome is reported as a
//! [`Notice`] for the front end to display.

use std::fmt;

use crate::{
    api::PredictionApi,
    board::{Fen, START_FEN},
    config::Configuration,
    error::{ApiError, ErrorKind},
    types::PredictionResult,
};

/// Localized user-facing messages.
pub mod messages {
    pub const ALREADY_INITIALIZED: &str = "Modèle déjà initialisé";
    pub const INITIALIZING: &str = "Initialisation du modèle...";
    pub const INIT_FAILED: &str = "Erreur lors de l'initialisation du modèle";
    pub const UNREACHABLE: &str =
        "Impossible de se connecter au serveur. Assurez-vous que le serveur est démarré.";
    pub const NOT_INITIALIZED: &str = "Veuillez d'abord initialiser le modèle";
    pub const PREDICTING: &str = "Prédiction en cours...";
    pub const PREDICT_OK: &str = "Prédiction réussie";
    pub const PREDICT_FAILED: &str = "Erreur lors de la prédiction";
    pub const PREDICT_INCOMPLETE: &str = "Réponse de prédiction incomplète";
    pub const RESET: &str = "Échiquier réinitialisé";
    pub const EMPTY_FEN: &str = "Veuillez entrer une position FEN";
    pub const VALIDATING: &str = "Validation de la position...";
    pub const FEN_LOADED: &str = "Position chargée avec succès";
    pub const FEN_INVALID: &str = "FEN invalide";
    pub const VALIDATE_FAILED: &str = "Erreur lors de la validation du FEN";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Ready,
    Predicting,
    Error(ErrorKind),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Uninitialized => f.write_str("Non initialisé"),
            Phase::Initializing => f.write_str("Chargement..."),
            Phase::Ready => f.write_str("Modèle prêt"),
            Phase::Predicting => f.write_str("Prédiction..."),
            Phase::Error(kind) => write!(f, "Erreur ({kind})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Initializing,
    Predicting,
}

/// Called with the loading label when a request starts and with `None`
/// when it finishes.
pub type BusyObserver = Box<dyn FnMut(Option<&'static str>)>;

pub struct App<C> {
    client: C,
    on_busy: Option<BusyObserver>,
    config: Configuration,
    fen_text: String,
    position: Fen,
    initialized: bool,
    busy: Option<Busy>,
    loading: Option<&'static str>,
    error: Option<ErrorKind>,
    prediction: Option<PredictionResult>,
    notices: Vec<Notice>,
}

impl<C: PredictionApi> App<C> {
    pub fn new(client: C, config: Configuration) -> Self {
        Self {
            client,
            on_busy: None,
            config,
            fen_text: START_FEN.to_string(),
            position: Fen::start(),
            initialized: false,
            busy: None,
            loading: None,
            error: None,
            prediction: None,
            notices: Vec::new(),
        }
    }

    /// Install a callback that mirrors the loading label, so a blocking
    /// front end can show it while the request is in flight.
    pub fn set_busy_observer(&mut self, observer: impl FnMut(Option<&'static str>) + 'static) {
        self.on_busy = Some(Box::new(observer));
    }

    pub fn phase(&self) -> Phase {
        match (self.busy, self.error) {
            (Some(Busy::Initializing), _) => Phase::Initializing,
            (Some(Busy::Predicting), _) => Phase::Predicting,
            (None, Some(kind)) => Phase::Error(kind),
            (None, None) if self.initialized => Phase::Ready,
            (None, None) => Phase::Uninitialized,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Label of the request in flight, if any.
    pub fn loading(&self) -> Option<&'static str> {
        self.loading
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Current FEN, exactly as it was loaded.
    pub fn fen(&self) -> &str {
        &self.fen_text
    }

    pub fn position(&self) -> &Fen {
        &self.position
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Error => tracing::warn!(%message, "notice"),
            _ => tracing::info!(%message, "notice"),
        }
        self.notices.push(Notice { severity, message });
    }

    /// Run `call` with the loading label set. The label is cleared on every
    /// outcome.
    fn request<T>(&mut self, label: &'static str, call: impl FnOnce(&C) -> T) -> T {
        self.set_loading(Some(label));
        let out = call(&self.client);
        self.set_loading(None);
        out
    }

    fn set_loading(&mut self, label: Option<&'static str>) {
        self.loading = label;
        if let Some(observer) = self.on_busy.as_mut() {
            observer(label);
        }
    }

    /// Ask the server whether a model is already loaded. Failures are only
    /// logged; the server may simply not be started yet.
    pub fn check_status(&mut self) {
        match self.client.status() {
            Ok(status) if status.success && status.initialized => {
                tracing::info!("server reports model already initialized");
                self.initialized = true;
                self.error = None;
                self.notify(Severity::Success, messages::ALREADY_INITIALIZED);
            }
            Ok(_) => tracing::info!("server is up, model not initialized"),
            Err(e) => tracing::warn!(error = %e, "server not ready"),
        }
    }

    pub fn initialize(&mut self) {
        let (model_type, device) = (self.config.model_type(), self.config.device());
        tracing::info!(%model_type, %device, "initializing model");

        self.busy = Some(Busy::Initializing);
        let outcome = self.request(messages::INITIALIZING, |c| c.initialize(model_type, device));
        self.busy = None;

        match outcome {
            Ok(response) if response.success => {
                self.initialized = true;
                self.error = None;
                self.notify(Severity::Success, response.message);
            }
            Ok(response) => {
                self.error = Some(ErrorKind::InitFailed);
                let message = non_empty(Some(response.message))
                    .unwrap_or_else(|| messages::INIT_FAILED.to_string());
                self.notify(Severity::Error, message);
            }
            Err(e) => {
                self.error = Some(ErrorKind::InitFailed);
                self.notify(Severity::Error, failure_message(&e, messages::INIT_FAILED));
            }
        }
    }

    pub fn predict(&mut self) {
        if !self.initialized {
            self.error = Some(ErrorKind::NotInitialized);
            self.notify(Severity::Warning, messages::NOT_INITIALIZED);
            return;
        }

        let fen = self.fen_text.clone();
        let (elo_self, elo_opponent, top_k) = (
            self.config.elo_self(),
            self.config.elo_opponent(),
            self.config.top_k(),
        );
        tracing::info!(%fen, elo_self, elo_opponent, top_k, "requesting prediction");

        self.busy = Some(Busy::Predicting);
        let outcome = self.request(messages::PREDICTING, |c| {
            c.predict(&fen, elo_self, elo_opponent, top_k)
        });
        self.busy = None;

        match outcome {
            Ok(response) if response.success => {
                let message = response.message.clone();
                match response.into_result() {
                    Some(result) => {
                        tracing::info!(
                            win_probability = result.win_probability,
                            moves = result.top_moves.len(),
                            "prediction received"
                        );
                        self.prediction = Some(result);
                        self.error = None;
                        self.notify(Severity::Success, messages::PREDICT_OK);
                    }
                    None => {
                        self.error = Some(ErrorKind::PredictFailed);
                        let message = non_empty(message)
                            .unwrap_or_else(|| messages::PREDICT_INCOMPLETE.to_string());
                        self.notify(Severity::Error, message);
                    }
                }
            }
            Ok(response) => {
                self.error = Some(ErrorKind::PredictFailed);
                let message = non_empty(response.message)
                    .unwrap_or_else(|| messages::PREDICT_FAILED.to_string());
                self.notify(Severity::Error, message);
            }
            Err(e) => {
                self.error = Some(ErrorKind::PredictFailed);
                self.notify(Severity::Error, failure_message(&e, messages::PREDICT_FAILED));
            }
        }
    }

    /// Validate `input` with the server and make it the current position.
    ///
    /// Input the local codec rejects never reaches the server.
    pub fn load_fen(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            self.notify(Severity::Warning, messages::EMPTY_FEN);
            return;
        }

        let position = match input.parse::<Fen>() {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!(fen = input, error = %e, "rejected FEN locally");
                self.error = Some(ErrorKind::InvalidFen);
                self.notify(Severity::Error, format!("{}: {e}", messages::FEN_INVALID));
                return;
            }
        };

        let outcome = self.request(messages::VALIDATING, |c| c.validate_fen(input));
        match outcome {
            Ok(response) if response.valid => {
                self.fen_text = input.to_string();
                self.position = position;
                self.error = None;
                self.notify(Severity::Success, messages::FEN_LOADED);
            }
            Ok(response) => {
                self.error = Some(ErrorKind::InvalidFen);
                let message = non_empty(response.message)
                    .unwrap_or_else(|| messages::FEN_INVALID.to_string());
                self.notify(Severity::Error, message);
            }
            Err(e) => {
                self.error = Some(match &e {
                    ApiError::Unreachable(_) => ErrorKind::Unreachable,
                    _ => ErrorKind::InvalidFen,
                });
                self.notify(Severity::Error, failure_message(&e, messages::VALIDATE_FAILED));
            }
        }
    }

    /// Back to the starting position, dropping any prediction.
    pub fn reset(&mut self) {
        self.fen_text = START_FEN.to_string();
        self.position = Fen::start();
        self.prediction = None;
        self.notify(Severity::Info, messages::RESET);
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Server-supplied text when there is one, otherwise a generic message.
fn failure_message(error: &ApiError, fallback: &str) -> String {
    match error {
        ApiError::Unreachable(_) => messages::UNREACHABLE.to_string(),
        _ => error
            .server_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string(),
    }
}
