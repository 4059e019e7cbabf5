//! # Quote Configuration
//!
//! Caller-tunable quoting parameters. Hosts usually keep these in a TOML
//! section next to their own settings:
//!
//! ```toml
//! max_tick_array_crossings = 2
//! partial_fill = "allow"
//!
//! [slippage]
//! numerator = 1
//! denominator = 1000
//! ```

use crate::constants::DEFAULT_MAX_TICK_ARRAY_CROSSINGS;
use crate::errors::{CoreError, CoreResult};
use crate::types::quotes::SlippageTolerance;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// What a swap does when it runs out of tick array budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum PartialFillPolicy {
    /// Return the partial quote with `is_partial_fill` set
    #[default]
    Allow,
    /// Fail with `TickArrayBudgetExceeded`
    Reject,
}

/// Quote configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(default))]
pub struct QuoteConfig {
    /// Slippage applied to quoted thresholds
    pub slippage: SlippageTolerance,

    /// Tick arrays a swap may move into beyond the starting one
    pub max_tick_array_crossings: u8,

    pub partial_fill: PartialFillPolicy,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            slippage: SlippageTolerance::default(),
            max_tick_array_crossings: DEFAULT_MAX_TICK_ARRAY_CROSSINGS,
            partial_fill: PartialFillPolicy::default(),
        }
    }
}

impl QuoteConfig {
    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        self.slippage
            .validate()
            .map_err(|e| CoreError::invalid_config(format!("slippage: {}", e)))?;

        Ok(())
    }

    pub fn with_slippage(mut self, slippage: SlippageTolerance) -> Self {
        self.slippage = slippage;
        self
    }

    pub fn with_max_tick_array_crossings(mut self, max_tick_array_crossings: u8) -> Self {
        self.max_tick_array_crossings = max_tick_array_crossings;
        self
    }

    pub fn with_partial_fill(mut self, partial_fill: PartialFillPolicy) -> Self {
        self.partial_fill = partial_fill;
        self
    }
}

#[cfg(feature = "client")]
impl QuoteConfig {
    /// Parse and validate configuration from TOML
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: QuoteConfig = toml::from_str(content)
            .map_err(|e| CoreError::invalid_config(format!("failed to parse quote config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::invalid_config(format!("failed to serialize quote config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuoteConfig::default();
        assert_eq!(config.slippage, SlippageTolerance::new(1, 1000));
        assert_eq!(config.max_tick_array_crossings, 2);
        assert_eq!(config.partial_fill, PartialFillPolicy::Allow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_slippage_rejected() {
        let config = QuoteConfig::default().with_slippage(SlippageTolerance::new(5, 0));
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_toml_round_trip() {
        let config = QuoteConfig::default()
            .with_slippage(SlippageTolerance::from_bps(50))
            .with_max_tick_array_crossings(5)
            .with_partial_fill(PartialFillPolicy::Reject);

        let content = config.to_toml_string().unwrap();
        assert!(content.contains("partial_fill = \"reject\""));
        assert_eq!(QuoteConfig::from_toml_str(&content).unwrap(), config);
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_toml_partial_and_invalid() {
        let config = QuoteConfig::from_toml_str("max_tick_array_crossings = 0").unwrap();
        assert_eq!(config.max_tick_array_crossings, 0);
        assert_eq!(config.slippage, SlippageTolerance::default());

        let invalid = "[slippage]\nnumerator = 3\ndenominator = 2\n";
        assert!(matches!(
            QuoteConfig::from_toml_str(invalid),
            Err(CoreError::InvalidConfig(_))
        ));

        assert!(matches!(
            QuoteConfig::from_toml_str("partial_fill = \"sometimes\""),
            Err(CoreError::InvalidConfig(_))
        ));
    }
}
