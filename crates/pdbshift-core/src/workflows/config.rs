use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// The naming convention a structure is converted between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionDirection {
    CampariToGromacs,
    GromacsToCampari,
}

impl ConversionDirection {
    /// Whether terminal caps are rewritten when the caller does not say otherwise.
    pub fn default_cap_change(self) -> bool {
        match self {
            ConversionDirection::CampariToGromacs => true,
            ConversionDirection::GromacsToCampari => false,
        }
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionDirection::CampariToGromacs => write!(f, "CAMPARI -> GROMACS"),
            ConversionDirection::GromacsToCampari => write!(f, "GROMACS -> CAMPARI"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionConfig {
    pub direction: ConversionDirection,
    pub cap_change: bool,
}

impl ConversionConfig {
    pub fn new(direction: ConversionDirection) -> Self {
        Self {
            direction,
            cap_change: direction.default_cap_change(),
        }
    }
}

#[derive(Default)]
pub struct ConversionConfigBuilder {
    direction: Option<ConversionDirection>,
    cap_change: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(mut self, direction: ConversionDirection) -> Self {
        self.direction = Some(direction);
        self
    }
    pub fn cap_change(mut self, enabled: bool) -> Self {
        self.cap_change = Some(enabled);
        self
    }

    pub fn build(self) -> Result<ConversionConfig, ConfigError> {
        let direction = self
            .direction
            .ok_or(ConfigError::MissingParameter("direction"))?;
        Ok(ConversionConfig {
            direction,
            cap_change: self
                .cap_change
                .unwrap_or_else(|| direction.default_cap_change()),
        })
    }
}
