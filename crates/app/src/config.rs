//! Process-wide property settings.
//!
//! Settings are read from TOML:
//!
//! ```toml
//! name-collision = "rename"   # or "reject"
//! restore = "strict"          # or "best-effort"
//! auto-name-prefix = "Property"
//! ```
//!
//! The active settings live in an atomically swapped snapshot; [`install`] replaces it and
//! containers pick it up on their next operation. A container class can override the
//! snapshot through [`PropertyHooks::property_config`](crate::PropertyHooks::property_config).

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What adding a dynamic property under a taken name does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCollisionPolicy {
	/// Fail with the collision error.
	#[default]
	Reject,
	/// Pick the next free suffixed name and log a warning.
	Rename,
}

/// What restore does with an element it cannot apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestorePolicy {
	/// Log, keep the current value, continue with the next element.
	#[default]
	BestEffort,
	/// Abort the restore.
	Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PropertyConfig {
	pub name_collision: NameCollisionPolicy,
	pub restore: RestorePolicy,
	/// Base for names picked when a dynamic property is added without one.
	pub auto_name_prefix: String,
}

impl Default for PropertyConfig {
	fn default() -> Self {
		Self {
			name_collision: NameCollisionPolicy::default(),
			restore: RestorePolicy::default(),
			auto_name_prefix: "Property".to_string(),
		}
	}
}

impl PropertyConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		if config.auto_name_prefix.is_empty() {
			return Err(ConfigError::EmptyPrefix);
		}
		Ok(config)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {}: {error}", .path.display())]
	Io { path: PathBuf, error: std::io::Error },

	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("auto-name-prefix must not be empty")]
	EmptyPrefix,
}

static CONFIG: LazyLock<ArcSwap<PropertyConfig>> =
	LazyLock::new(|| ArcSwap::from_pointee(PropertyConfig::default()));

/// The active settings.
pub fn current() -> Arc<PropertyConfig> {
	CONFIG.load_full()
}

/// Replaces the active settings.
pub fn install(config: PropertyConfig) {
	tracing::debug!(
		domain = "config",
		name_collision = ?config.name_collision,
		restore = ?config.restore,
		auto_name_prefix = %config.auto_name_prefix,
		"installed property config"
	);
	CONFIG.store(Arc::new(config));
}

/// Loads `path` and installs it.
pub fn load_and_install(path: &Path) -> Result<(), ConfigError> {
	install(PropertyConfig::load(path)?);
	Ok(())
}
