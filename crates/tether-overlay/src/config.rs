#![forbid(unsafe_code)]

//! Coordinator configuration.

use std::env;

use web_time::Duration;

/// Environment variable overriding [`OverlayConfig::base_z_index`].
pub const Z_INDEX_ENV: &str = "TETHER_Z_INDEX";

/// Largest stacking index a host accepts (CSS `z-index` is a signed 32-bit integer).
pub const MAX_Z_INDEX: u32 = i32::MAX as u32;

/// Class names applied to the shared backdrop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackdropClasses {
    /// Always present while the backdrop is shown.
    pub base: String,
    /// Present for one transition after a fresh backdrop appears.
    pub enter: String,
    /// Present for one transition after the last overlay closes.
    pub leave: String,
}

impl Default for BackdropClasses {
    fn default() -> Self {
        Self {
            base: "v-modal".to_owned(),
            enter: "v-modal-enter".to_owned(),
            leave: "v-modal-leave".to_owned(),
        }
    }
}

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayConfig {
    /// First value returned by `next_z_index`, at most [`MAX_Z_INDEX`].
    pub base_z_index: u32,
    /// Duration of the enter/leave class transitions.
    pub transition: Duration,
    pub classes: BackdropClasses,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            base_z_index: 2000,
            transition: Duration::from_millis(200),
            classes: BackdropClasses::default(),
        }
    }
}

impl OverlayConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let z_index = env::var(Z_INDEX_ENV).ok();
        Self::from_env_values(z_index.as_deref())
    }

    /// Defaults with the given raw override values applied.
    ///
    /// Unparsable values and values above [`MAX_Z_INDEX`] are ignored with a
    /// warning.
    #[must_use]
    pub fn from_env_values(z_index: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = z_index {
            match raw.trim().parse::<u32>() {
                Ok(value) if value <= MAX_Z_INDEX => config.base_z_index = value,
                Ok(value) => {
                    tracing::warn!(
                        value,
                        max = MAX_Z_INDEX,
                        "ignoring out-of-range {Z_INDEX_ENV}"
                    );
                }
                Err(err) => {
                    tracing::warn!(value = raw, %err, "ignoring invalid {Z_INDEX_ENV}");
                }
            }
        }
        config
    }

    #[must_use]
    pub fn base_z_index(mut self, z_index: u32) -> Self {
        self.base_z_index = z_index;
        self
    }

    #[must_use]
    pub fn transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    #[must_use]
    pub fn classes(mut self, classes: BackdropClasses) -> Self {
        self.classes = classes;
        self
    }
}
