use log::*;
use order_intake_engine::traits::{AlertError, OperatorAlerts};
use serde_json::json;

/// The operator alert channel for this deployment.
///
/// When an alert webhook URL is configured, alerts are POSTed there as a small JSON document;
/// otherwise they only land in the server log. Delivery is best-effort either way.
#[derive(Clone)]
pub enum AlertSink {
    Http { client: reqwest::Client, url: String },
    Log,
}

impl AlertSink {
    pub fn new(alert_webhook_url: Option<String>) -> Self {
        match alert_webhook_url {
            Some(url) => Self::Http { client: reqwest::Client::new(), url },
            None => Self::Log,
        }
    }
}

impl OperatorAlerts for AlertSink {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), AlertError> {
        match self {
            Self::Http { client, url } => {
                let payload = json!({ "subject": subject, "message": message });
                let response = client
                    .post(url)
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| AlertError::PublishError(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AlertError::PublishError(format!(
                        "alert webhook answered with status {status}"
                    )));
                }
                debug!("Published operator alert '{subject}' to {url}");
                Ok(())
            },
            Self::Log => {
                warn!("OPERATOR ALERT: {subject}\n{message}");
                Ok(())
            },
        }
    }
}
