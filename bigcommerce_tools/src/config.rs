use log::*;
use oip_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct BigCommerceConfig {
    /// The store hash identifying the storefront, e.g. the `abc123` in `stores/abc123`.
    pub store_hash: String,
    pub client_id: Secret<String>,
    pub access_token: Secret<String>,
    pub api_version: String,
}

impl BigCommerceConfig {
    pub fn new_from_env_or_default() -> Self {
        let store_hash = std::env::var("OIP_BC_STORE_HASH").unwrap_or_else(|_| {
            warn!("OIP_BC_STORE_HASH not set, using (probably useless) default");
            "00000000".to_string()
        });
        let client_id = Secret::new(std::env::var("OIP_BC_CLIENT_ID").unwrap_or_else(|_| {
            warn!("OIP_BC_CLIENT_ID not set, using (probably useless) default");
            "0000000000000000".to_string()
        }));
        let access_token = Secret::new(std::env::var("OIP_BC_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("OIP_BC_ACCESS_TOKEN not set, using (probably useless) default");
            "0000000000000000".to_string()
        }));
        let api_version = std::env::var("OIP_BC_API_VERSION").unwrap_or_else(|_| {
            warn!("OIP_BC_API_VERSION not set, using v2 as default");
            "v2".to_string()
        });
        Self { store_hash, client_id, access_token, api_version }
    }

    /// The canonical producer identifier carried by webhook events from this store.
    pub fn producer(&self) -> String {
        format!("stores/{}", self.store_hash)
    }
}
