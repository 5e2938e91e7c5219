//! Operator alert formatting and the logging fallback channel.

use std::fmt::Display;

use log::*;

use crate::traits::{AlertError, OperatorAlerts};

/// Formats the message published to the operator alert channel. Diagnostic detail goes here
/// and into the log; callers of the failed operation only ever see a generic response.
pub fn format_operator_alert<E: Display>(component: &str, error: &E) -> String {
    format!(
        "ERROR FROM {component}\nSee the server log for more details about this run.\n\
         ====================\n{error}"
    )
}

/// Publishes a failure to the alert channel. Never fails the caller: an alert publish that
/// itself fails is logged and swallowed, since the original error is what matters.
pub async fn report_failure<A: OperatorAlerts, E: Display>(alerts: &A, component: &str, error: &E) {
    error!("{component} failed. {error}");
    let message = format_operator_alert(component, error);
    if let Err(e) = alerts.publish(component, &message).await {
        error!("Could not publish operator alert for {component}. {e}");
    }
}

/// Fallback alert channel that writes to the error log. Used when no external channel is
/// configured, so failures are at least visible somewhere.
#[derive(Debug, Clone, Default)]
pub struct LoggingAlerts;

impl OperatorAlerts for LoggingAlerts {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), AlertError> {
        error!("OPERATOR ALERT [{subject}]\n{message}");
        Ok(())
    }
}
