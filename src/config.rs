//! User-facing prediction parameters and environment-driven client settings.

use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ELO_MIN: u32 = 800;
pub const ELO_MAX: u32 = 2800;
pub const TOP_K_MIN: u32 = 1;
pub const TOP_K_MAX: u32 = 10;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Which Maia2 checkpoint the server should load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Rapid,
    Blitz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Gpu,
}

impl ModelType {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelType::Rapid => "rapid",
            ModelType::Blitz => "blitz",
        }
    }
}

impl Device {
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Gpu => "gpu",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rapid" => Ok(ModelType::Rapid),
            "blitz" => Ok(ModelType::Blitz),
            _ => Err(ConfigError::UnknownModelType(s.to_string())),
        }
    }
}

impl FromStr for Device {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" => Ok(Device::Gpu),
            _ => Err(ConfigError::UnknownDevice(s.to_string())),
        }
    }
}

/// Prediction parameters chosen by the user.
///
/// Fields are private so that every change goes through a range check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    model_type: ModelType,
    device: Device,
    elo_self: u32,
    elo_opponent: u32,
    top_k: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            model_type: ModelType::Rapid,
            device: Device::Cpu,
            elo_self: 1500,
            elo_opponent: 1500,
            top_k: 5,
        }
    }
}

impl Configuration {
    pub fn new(
        model_type: ModelType,
        device: Device,
        elo_self: u32,
        elo_opponent: u32,
        top_k: u32,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            model_type,
            device,
            elo_self: check_elo(elo_self)?,
            elo_opponent: check_elo(elo_opponent)?,
            top_k: check_top_k(top_k)?,
        })
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn elo_self(&self) -> u32 {
        self.elo_self
    }

    pub fn elo_opponent(&self) -> u32 {
        self.elo_opponent
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn set_model_type(&mut self, model_type: ModelType) {
        self.model_type = model_type;
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn set_elo_self(&mut self, elo: u32) -> Result<(), ConfigError> {
        self.elo_self = check_elo(elo)?;
        Ok(())
    }

    pub fn set_elo_opponent(&mut self, elo: u32) -> Result<(), ConfigError> {
        self.elo_opponent = check_elo(elo)?;
        Ok(())
    }

    pub fn set_top_k(&mut self, top_k: u32) -> Result<(), ConfigError> {
        self.top_k = check_top_k(top_k)?;
        Ok(())
    }
}

fn check_elo(elo: u32) -> Result<u32, ConfigError> {
    if (ELO_MIN..=ELO_MAX).contains(&elo) {
        Ok(elo)
    } else {
        Err(ConfigError::EloOutOfRange(elo))
    }
}

fn check_top_k(top_k: u32) -> Result<u32, ConfigError> {
    if (TOP_K_MIN..=TOP_K_MAX).contains(&top_k) {
        Ok(top_k)
    } else {
        Err(ConfigError::TopKOutOfRange(top_k))
    }
}

/// Where and how to reach the prediction service.
#[derive(Clone, Debug)]
pub struct Settings {
    pub api_url: String,
    pub user_agent: String,
}

impl Settings {
    /// Read `MAIA_API_URL` and `MAIA_USER_AGENT` from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("MAIA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let user_agent = lookup("MAIA_USER_AGENT")
            .unwrap_or_else(|| concat!("maia-board/", env!("CARGO_PKG_VERSION")).to_string());
        Self::new(api_url, user_agent)
    }

    pub fn new(api_url: impl Into<String>, user_agent: impl Into<String>) -> Result<Self, ConfigError> {
        let api_url = normalize_url(api_url.into())?;
        Ok(Self {
            api_url,
            user_agent: user_agent.into(),
        })
    }

    pub fn with_api_url(self, api_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(api_url, self.user_agent)
    }
}

fn normalize_url(url: String) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(url));
    }
    Ok(trimmed.to_string())
}
