//! HTTP collaborator for the escrow recovery service.
//!
//! Thin blocking client over `ureq`: bearer-authenticated JSON POSTs against
//! the service's per-wallet recovery operations. Transport policy stops at a
//! request timeout; retry and backoff are deliberately out of scope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RecoveryError;
use crate::kdf::KeyFingerprint;
use crate::recover::{Credentials, EscrowResponse, RecoveryApi, SaltResponse, SharesResponse};

// ----------------------------- Configuration -----------------------------

/// Configuration for the recovery service client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecoveryServiceConfig {
    /// Base URL of the recovery API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RecoveryServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://auth.example.invalid/api/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

// ----------------------------- Client -----------------------------

/// Blocking HTTP implementation of [`RecoveryApi`].
pub struct HttpRecoveryClient {
    config: RecoveryServiceConfig,
    credentials: Credentials,
    agent: ureq::Agent,
}

impl HttpRecoveryClient {
    /// Create a new client with the given configuration and session
    /// credentials.
    pub fn new(config: RecoveryServiceConfig, credentials: Credentials) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, credentials, agent }
    }

    /// POST a recovery operation for the configured wallet and parse the
    /// JSON response.
    fn post<T: DeserializeOwned>(
        &self,
        op: &str,
        body: serde_json::Value,
    ) -> Result<T, RecoveryError> {
        let url = format!(
            "{}/embedded_wallets/{}/recovery/{}",
            self.config.base_url, self.credentials.wallet_address, op,
        );
        debug!(op, "recovery service request");
        let response = self
            .agent
            .post(&url)
            .set("content-type", "application/json")
            .set(
                "authorization",
                &format!("Bearer {}", self.credentials.bearer_token),
            )
            .set("x-app-id", &self.credentials.app_id)
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => {
                    let detail = resp.into_string().unwrap_or_default();
                    RecoveryError::CollaboratorRejected(format!(
                        "{} returned {}: {}",
                        op,
                        code,
                        detail.chars().take(200).collect::<String>(),
                    ))
                }
                ureq::Error::Transport(t) => {
                    RecoveryError::CollaboratorRejected(format!("{} transport error: {}", op, t))
                }
            })?;
        response
            .into_json::<T>()
            .map_err(|e| RecoveryError::CollaboratorRejected(format!("{} bad response: {}", op, e)))
    }
}

impl RecoveryApi for HttpRecoveryClient {
    fn fetch_escrow(&self) -> Result<EscrowResponse, RecoveryError> {
        self.post("escrow", serde_json::json!({}))
    }

    fn fetch_salt(&self) -> Result<SaltResponse, RecoveryError> {
        self.post("salt", serde_json::json!({}))
    }

    fn fetch_shares(
        &self,
        fingerprint: &KeyFingerprint,
    ) -> Result<SharesResponse, RecoveryError> {
        self.post(
            "shares",
            serde_json::json!({ "recovery_key_hash": fingerprint.as_str() }),
        )
    }
}

// ----------------------------- Tests -----------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RecoveryServiceConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.base_url.is_empty());
    }

    #[test]
    fn unreachable_endpoint_is_collaborator_rejection() {
        // Bind an ephemeral port, then drop the listener so the connection
        // is refused immediately; no DNS, no timeout wait.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = HttpRecoveryClient::new(
            RecoveryServiceConfig {
                base_url: format!("http://127.0.0.1:{}/api/v1", port),
                timeout_secs: 1,
            },
            Credentials {
                bearer_token: "token".into(),
                app_id: "app".into(),
                wallet_address: "0x0000000000000000000000000000000000000000".into(),
            },
        );
        assert!(matches!(
            client.fetch_escrow(),
            Err(RecoveryError::CollaboratorRejected(_))
        ));
    }
}
