// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `REDIS_URL` | Revocation store connection URL | `redis://127.0.0.1:6379/` |
//! | `REDIS_KEY_PREFIX` | Prefix for revocation record keys | `auth:token:` |
//! | `SIGNING_KEY_PATH` | PEM file with the RSA private key | Required |
//! | `VERIFYING_KEY_PATH` | PEM file with the RSA public key | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const REDIS_URL_ENV: &str = "REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "REDIS_KEY_PREFIX";

/// Environment variable name for the PEM-encoded RSA private key.
///
/// PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`).
pub const SIGNING_KEY_PATH_ENV: &str = "SIGNING_KEY_PATH";

/// Environment variable name for the PEM-encoded RSA public key.
///
/// SPKI (`BEGIN PUBLIC KEY`) or PKCS#1 (`BEGIN RSA PUBLIC KEY`). Must belong
/// to the private key; startup fails otherwise.
pub const VERIFYING_KEY_PATH_ENV: &str = "VERIFYING_KEY_PATH";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = "auth:token:";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub redis_url: String,
    pub redis_key_prefix: String,
    pub signing_key_path: PathBuf,
    pub verifying_key_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = match var(HOST_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value,
            })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = match var(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match var(LOG_FORMAT_ENV) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: LOG_FORMAT_ENV,
                        value,
                    })
                }
            },
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            redis_url: var(REDIS_URL_ENV).unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            redis_key_prefix: var(REDIS_KEY_PREFIX_ENV)
                .unwrap_or_else(|| DEFAULT_REDIS_KEY_PREFIX.to_string()),
            signing_key_path: var(SIGNING_KEY_PATH_ENV)
                .map(PathBuf::from)
                .ok_or(ConfigError::Missing(SIGNING_KEY_PATH_ENV))?,
            verifying_key_path: var(VERIFYING_KEY_PATH_ENV)
                .map(PathBuf::from)
                .ok_or(ConfigError::Missing(VERIFYING_KEY_PATH_ENV))?,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
