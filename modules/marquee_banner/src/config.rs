//! Configuration for the marquee banner module

use crate::contract::model::Breakpoints;
use crate::domain::render::DEFAULT_Z_INDEX;
use crate::domain::validation::DEFAULT_MAX_MESSAGE_LENGTH;
use crate::domain::{DecisionEngine, Renderer, Scheduler, Validator};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides, e.g. `MARQUEE_BANNER_Z_INDEX`
pub const ENV_PREFIX: &str = "MARQUEE_BANNER_";

/// Marquee banner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Message length bound in characters, applied before sanitizing
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Widest viewport (px) still classed as mobile
    #[serde(default = "default_mobile_max_width")]
    pub mobile_max_width_px: u32,

    /// Widest viewport (px) still classed as tablet
    #[serde(default = "default_tablet_max_width")]
    pub tablet_max_width_px: u32,

    /// Site timezone for naive schedule dates, minutes east of UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Stacking order of the banner container
    #[serde(default = "default_z_index")]
    pub z_index: i32,

    /// JSON file holding the settings document; in-memory when unset
    #[serde(default)]
    pub settings_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
            mobile_max_width_px: default_mobile_max_width(),
            tablet_max_width_px: default_tablet_max_width(),
            utc_offset_minutes: 0,
            z_index: default_z_index(),
            settings_file: None,
        }
    }
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

fn default_mobile_max_width() -> u32 {
    768
}

fn default_tablet_max_width() -> u32 {
    1024
}

fn default_z_index() -> i32 {
    DEFAULT_Z_INDEX
}

impl Config {
    /// Defaults, then the optional YAML file, then `MARQUEE_BANNER_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("invalid marquee banner configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.mobile_max_width_px >= self.tablet_max_width_px {
            bail!(
                "mobile_max_width_px ({}) must be below tablet_max_width_px ({})",
                self.mobile_max_width_px,
                self.tablet_max_width_px
            );
        }
        if self.max_message_length == 0 {
            bail!("max_message_length must be positive");
        }
        Ok(())
    }

    pub fn breakpoints(&self) -> Breakpoints {
        Breakpoints {
            mobile_max_width_px: self.mobile_max_width_px,
            tablet_max_width_px: self.tablet_max_width_px,
        }
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.max_message_length)
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.utc_offset_minutes)
    }

    pub fn decision_engine(&self) -> DecisionEngine {
        DecisionEngine::new(self.validator(), self.scheduler())
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.breakpoints(), self.z_index)
    }
}
