//! Loading and validation of `bakefile.json` build configurations.
//!
//! This crate reads the project configuration into a strongly-typed
//! [`BuildConfig`], evaluates conditional compiler flag lists against the
//! platform [`FlagTable`], and resolves everything a build needs for one
//! [`BuildMode`] into a [`BuildProfile`].

#![warn(missing_docs)]

pub mod error;
pub mod flags;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use flags::{evaluate_flags, Condition, FlagElement, FlagTable};
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_profile, BuildMode, BuildProfile};
pub use types::{BuildConfig, FlagList};
