//! Daemon configuration from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `WAITROOM_LOG_FORMAT` | `pretty` (`json` for production) |
//! | `WAITROOM_RPC_HOST` | `127.0.0.1` |
//! | `WAITROOM_RPC_PORT` | `9630` |
//! | `WAITROOM_CONNECT_DELAY_MS` | `2000` |
//! | `WAITROOM_TICK_INTERVAL_MS` | `15000` |
//! | `WAITROOM_AUTOSTART` | `true` |
//! | `WAITROOM_SEED` | unset (OS entropy) |
//! | `WAITROOM_EVENT_HISTORY` | `200` |

use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;
use waitroom_api_rpc::RpcServerConfig;
use waitroom_core::application::SimulatorConfig;

const DEFAULT_EVENT_HISTORY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug)]
pub struct DaemonConfig {
    pub log_format: LogFormat,
    pub rpc: RpcServerConfig,
    pub simulator: SimulatorConfig,
    pub autostart: bool,
    pub seed: Option<u64>,
    pub event_history: usize,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment in production, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("WAITROOM_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let mut rpc = RpcServerConfig::default();
        if let Some(host) = lookup("WAITROOM_RPC_HOST") {
            rpc.host = host;
        }
        if let Some(port) = parse_var::<u16, _>(&lookup, "WAITROOM_RPC_PORT")? {
            rpc.port = port;
        }

        let mut simulator = SimulatorConfig::default();
        if let Some(ms) = parse_var::<u64, _>(&lookup, "WAITROOM_CONNECT_DELAY_MS")? {
            simulator.connect_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "WAITROOM_TICK_INTERVAL_MS")? {
            simulator.tick_interval = Duration::from_millis(ms);
        }
        simulator
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid simulator settings: {}", e))?;

        Ok(Self {
            log_format,
            rpc,
            simulator,
            autostart: parse_var::<bool, _>(&lookup, "WAITROOM_AUTOSTART")?.unwrap_or(true),
            seed: parse_var::<u64, _>(&lookup, "WAITROOM_SEED")?,
            event_history: parse_var::<usize, _>(&lookup, "WAITROOM_EVENT_HISTORY")?
                .unwrap_or(DEFAULT_EVENT_HISTORY),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} has an invalid value: {:?}", key, raw))
        })
        .transpose()
}
