use std::path::Path;

use serde::Deserialize;
use tenbit_dsa::{Detector, Disparity};

use crate::error::{LineCodeError, Result};

/// Which validator findings fail the `check` operation.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FailPolicy {
    /// Only contradictions: one bit pattern decoding to two symbols.
    #[default]
    DifferentDecode,
    /// Every reported anomaly.
    Any,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Entering disparity for `encode` when none is given (0 or 1).
    pub default_disparity: u8,
    pub detector: Detector,
    /// Columns per line of text bit-plane output.
    pub lut_chunk: usize,
    pub fail_on: FailPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_disparity: 0,
            detector: Detector::Strict,
            lut_chunk: 64,
            fail_on: FailPolicy::DifferentDecode,
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| LineCodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded codec config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_disparity > 1 {
            return Err(LineCodeError::Config(format!(
                "default_disparity must be 0 or 1, got {}",
                self.default_disparity
            )));
        }
        if self.lut_chunk == 0 {
            return Err(LineCodeError::Config("lut_chunk must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn disparity(&self) -> Disparity {
        Disparity::from_bit(self.default_disparity == 1)
    }
}
