//! Configuration module for Cubist.
//!
//! Handles cube connection settings, environment variables, and service
//! configuration.

mod settings;

pub use settings::{
    expand_env_vars, BridgeSettings, CubeSettings, ServerSettings, Settings, SettingsError,
};
