//! `weft.toml` loading.
//!
//! Every section is optional; missing keys fall back to the defaults of the crate that owns
//! the setting.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use core_types::MapMessages;
use forms::{FormsConfig, default_messages};
use markup::{MarkupConfig, ModelKind, UnknownModel};
use persist::PersistConfig;
use render::RenderConfig;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Model(#[from] UnknownModel),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub markup: MarkupSection,
    pub render: RenderSection,
    pub forms: FormsSection,
    pub persist: PersistSection,
    /// Message catalog overrides, merged over the built-in validation messages.
    pub messages: BTreeMap<String, String>,
    pub demo: DemoSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupSection {
    pub model: String,
    pub coalesce_text: bool,
}

impl Default for MarkupSection {
    fn default() -> Self {
        let defaults = MarkupConfig::default();
        Self {
            model: "html5".to_string(),
            coalesce_text: defaults.coalesce_text,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    pub max_repeats: u32,
    pub max_heartbeat_iterations: usize,
    pub outline_lines: usize,
}

impl Default for RenderSection {
    fn default() -> Self {
        let defaults = RenderConfig::default();
        Self {
            max_repeats: defaults.max_repeats,
            max_heartbeat_iterations: defaults.max_heartbeat_iterations,
            outline_lines: defaults.outline_lines,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormsSection {
    pub tracker_field: String,
    pub error_class: String,
    pub max_blob_bytes: usize,
}

impl Default for FormsSection {
    fn default() -> Self {
        let defaults = FormsConfig::default();
        Self {
            tracker_field: defaults.tracker_field,
            error_class: defaults.error_class,
            max_blob_bytes: defaults.max_blob_bytes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistSection {
    pub key_prefix: String,
    pub always_write: bool,
}

impl Default for PersistSection {
    fn default() -> Self {
        let defaults = PersistConfig::default();
        Self {
            key_prefix: defaults.key_prefix,
            always_write: defaults.always_write,
        }
    }
}

/// Content for the demo pages.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoSection {
    pub title: String,
    pub stylesheets: Vec<String>,
    pub results: Vec<String>,
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            title: "Sign up".to_string(),
            stylesheets: vec!["/assets/site.css".to_string()],
            results: vec!["alpha".to_string(), "beta".to_string()],
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("loaded configuration from {path:?}");
                Self::from_toml(&content)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("{path:?} not found, using default configuration");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn markup_config(&self) -> Result<MarkupConfig, ConfigError> {
        Ok(MarkupConfig {
            coalesce_text: self.markup.coalesce_text,
            model: self.markup.model.parse::<ModelKind>()?,
        })
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            max_repeats: self.render.max_repeats,
            max_heartbeat_iterations: self.render.max_heartbeat_iterations,
            outline_lines: self.render.outline_lines,
        }
    }

    pub fn forms_config(&self) -> FormsConfig {
        FormsConfig {
            tracker_field: self.forms.tracker_field.clone(),
            error_class: self.forms.error_class.clone(),
            max_blob_bytes: self.forms.max_blob_bytes,
        }
    }

    pub fn persist_config(&self) -> PersistConfig {
        PersistConfig {
            key_prefix: self.persist.key_prefix.clone(),
            always_write: self.persist.always_write,
        }
    }

    pub fn messages(&self) -> MapMessages {
        let mut messages = default_messages();
        messages.merge(self.messages.iter().collect());
        messages
    }
}
