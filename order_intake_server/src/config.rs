use std::{env, time::Duration};

use bigcommerce_tools::BigCommerceConfig;
use log::*;
use oip_common::parse_boolean_flag;

const DEFAULT_OIP_HOST: &str = "127.0.0.1";
const DEFAULT_OIP_PORT: u16 = 8360;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);
const DEFAULT_CONSUMER_BATCH_SIZE: u32 = 10;
const DEFAULT_CONSUMER_IDLE_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// How often the poll worker sweeps the upstream order catalog.
    pub poll_interval: Duration,
    /// When false, the poll worker is not started. Useful when another node owns the sweep.
    pub poll_enabled: bool,
    /// When false, the consumer worker is not started. The queue then only accumulates.
    pub consumer_enabled: bool,
    /// How many messages the consumer worker claims per queue receive.
    pub consumer_batch_size: u32,
    /// How long the consumer worker sleeps after draining an empty queue.
    pub consumer_idle_delay: Duration,
    /// Where operator alerts are POSTed. When unset, alerts only go to the log.
    pub alert_webhook_url: Option<String>,
    /// Upstream storefront API configuration
    pub bigcommerce_config: BigCommerceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OIP_HOST.to_string(),
            port: DEFAULT_OIP_PORT,
            database_url: String::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_enabled: true,
            consumer_enabled: true,
            consumer_batch_size: DEFAULT_CONSUMER_BATCH_SIZE,
            consumer_idle_delay: DEFAULT_CONSUMER_IDLE_DELAY,
            alert_webhook_url: None,
            bigcommerce_config: BigCommerceConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OIP_HOST").ok().unwrap_or_else(|| DEFAULT_OIP_HOST.into());
        let port = env::var("OIP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "{s} is not a valid port for OIP_PORT. {e} Using the default, {DEFAULT_OIP_PORT}, instead."
                    );
                    DEFAULT_OIP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OIP_PORT);
        let database_url = env::var("OIP_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("OIP_DATABASE_URL is not set. Please set it to the URL for the pipeline database.");
            String::default()
        });
        let poll_interval = duration_from_env("OIP_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL);
        let poll_enabled = parse_boolean_flag(env::var("OIP_POLL_ENABLED").ok(), true);
        let consumer_enabled = parse_boolean_flag(env::var("OIP_CONSUMER_ENABLED").ok(), true);
        let consumer_idle_delay = duration_from_env("OIP_CONSUMER_IDLE_SECS", DEFAULT_CONSUMER_IDLE_DELAY);
        let consumer_batch_size = env::var("OIP_CONSUMER_BATCH_SIZE")
            .map(|s| {
                s.parse::<u32>().unwrap_or_else(|e| {
                    error!(
                        "{s} is not a valid value for OIP_CONSUMER_BATCH_SIZE. {e} Using the default, \
                         {DEFAULT_CONSUMER_BATCH_SIZE}, instead."
                    );
                    DEFAULT_CONSUMER_BATCH_SIZE
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CONSUMER_BATCH_SIZE);
        let alert_webhook_url = env::var("OIP_ALERT_WEBHOOK_URL").ok();
        if alert_webhook_url.is_none() {
            warn!("OIP_ALERT_WEBHOOK_URL is not set. Operator alerts will only be written to the log.");
        }
        let bigcommerce_config = BigCommerceConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            poll_interval,
            poll_enabled,
            consumer_enabled,
            consumer_batch_size,
            consumer_idle_delay,
            alert_webhook_url,
            bigcommerce_config,
        }
    }
}

fn duration_from_env(var: &str, default: Duration) -> Duration {
    env::var(var)
        .map(|s| {
            s.parse::<u64>().map(Duration::from_secs).unwrap_or_else(|e| {
                error!("{s} is not a valid value for {var}. {e} Using the default, {default:?}, instead.");
                default
            })
        })
        .ok()
        .unwrap_or(default)
}
