use std::env;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SLOT_DURATION_MINUTES: i32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Used when a slot request leaves out the service duration.
    pub default_slot_duration_minutes: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_slot_duration_minutes: DEFAULT_SLOT_DURATION_MINUTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env::var("SCHEDULING_API_HOST").unwrap_or_else(|_| {
            warn!("SCHEDULING_API_HOST not set, using {}", defaults.host);
            defaults.host.clone()
        });

        let port = match env::var("SCHEDULING_API_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("SCHEDULING_API_PORT '{}' is not a port number, using {}", raw, defaults.port);
                defaults.port
            }),
            Err(_) => {
                warn!("SCHEDULING_API_PORT not set, using {}", defaults.port);
                defaults.port
            }
        };

        let default_slot_duration_minutes = match env::var("DEFAULT_SLOT_DURATION_MINUTES") {
            Ok(raw) => match raw.parse::<i32>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    warn!(
                        "DEFAULT_SLOT_DURATION_MINUTES '{}' is not a positive integer, using {}",
                        raw, defaults.default_slot_duration_minutes
                    );
                    defaults.default_slot_duration_minutes
                }
            },
            Err(_) => defaults.default_slot_duration_minutes,
        };

        Self {
            host,
            port,
            default_slot_duration_minutes,
        }
    }

    /// Falls back to all interfaces when the host is not an IP literal.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| {
                warn!("Cannot bind to host '{}', using {}", self.host, DEFAULT_HOST);
                SocketAddr::from(([0, 0, 0, 0], self.port))
            })
    }
}
