//! Tunable constants for the proposal card, the ambient layer and logging.
//!
//! Everything a host page may want to tweak lives in [`AppConfig`]. The
//! defaults reproduce the shipped greeting; `start_app_with_config` accepts a
//! JSON object with any subset of the fields (feature `serde_json`).

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::AppError;

/// Runtime configuration for a mounted app.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct AppConfig {
    /// Footprint of the floating rejection control, in CSS pixels.
    pub control_width: f64,
    pub control_height: f64,
    /// Margin kept between the floating control and the viewport edges.
    pub padding: f64,
    /// Growth of the acceptance control per rejection.
    pub scale_step: f64,
    pub scale_cap: f64,
    /// Nag message appears once the count exceeds this.
    pub nag_after: u32,
    /// Beyond this count the nag turns frantic and the control starts running.
    pub frantic_after: u32,
    /// Recipient used when the `name` query parameter is absent or blank.
    pub default_name: String,
    pub max_ambient_particles: usize,
    /// One ambient particle per this many pixels of viewport width.
    pub ambient_particle_spacing: f64,
    /// Base path the image assets are served from (`./assets/` by default).
    pub asset_base: String,
    /// `tracing` level filter: "error", "warn", "info", "debug" or "trace".
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            control_width: 160.0,
            control_height: 60.0,
            padding: 20.0,
            scale_step: 0.05,
            scale_cap: 1.15,
            nag_after: 2,
            frantic_after: 5,
            default_name: "Minakshi".to_string(),
            max_ambient_particles: 15,
            ambient_particle_spacing: 100.0,
            asset_base: "./assets/".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a (possibly partial) JSON configuration. Missing fields keep
    /// their defaults; the result is validated before it is returned.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let cfg: AppConfig =
            serde_json::from_str(json).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make the derived geometry meaningless.
    pub fn validate(&self) -> Result<(), AppError> {
        let finite_non_negative = [
            ("control_width", self.control_width),
            ("control_height", self.control_height),
            ("padding", self.padding),
            ("scale_step", self.scale_step),
        ];
        for (field, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Config(format!(
                    "{field} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        if !self.scale_cap.is_finite() || self.scale_cap < 1.0 {
            return Err(AppError::Config(format!(
                "scale_cap must be at least 1.0 (got {})",
                self.scale_cap
            )));
        }
        if !self.ambient_particle_spacing.is_finite() || self.ambient_particle_spacing <= 0.0 {
            return Err(AppError::Config(
                "ambient_particle_spacing must be positive".to_string(),
            ));
        }
        if self.frantic_after < self.nag_after {
            return Err(AppError::Config(format!(
                "frantic_after ({}) must not be below nag_after ({})",
                self.frantic_after, self.nag_after
            )));
        }
        self.tracing_level()?;
        Ok(())
    }

    pub fn tracing_level(&self) -> Result<tracing::Level, AppError> {
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| AppError::Config(format!("unknown log level '{}'", self.log_level)))
    }

    /// Resolve an asset file name against [`AppConfig::asset_base`].
    pub fn asset(&self, file: &str) -> String {
        if self.asset_base.is_empty() || self.asset_base.ends_with('/') {
            format!("{}{}", self.asset_base, file)
        } else {
            format!("{}/{}", self.asset_base, file)
        }
    }
}
