//! Sequential delivery execution.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use tracing::{error, info, warn};

use super::report::RunOutcomes;
use crate::error::MailError;
use crate::mailer::{Mailer, OutgoingMessage, subject_line};
use crate::ledger::Ledger;
use crate::models::delivery::{Delivery, PostSendAnomaly};

/// Sends pending deliveries one at a time.
///
/// Only a confirmed transport success appends the hash to the ledger and
/// moves the document into the dated archive. Failures after the transport
/// acknowledgment never re-bucket the delivery; they surface as post-send
/// anomalies.
pub struct Dispatcher<'a> {
    pub mailer: &'a dyn Mailer,
    pub ledger: &'a Ledger,
    pub inbox_dir: &'a Path,
    pub archive_dir: &'a Path,
    pub subject_prefix: &'a str,
    pub html_body: &'a str,
    /// Pipeline-wide pause after a connection-refused failure.
    pub refusal_pause: Duration,
}

impl Dispatcher<'_> {
    /// Process the whole pending queue in order.
    pub async fn dispatch_all(&self, pending: Vec<Delivery>, outcomes: &mut RunOutcomes) {
        for delivery in pending {
            self.dispatch(delivery, outcomes).await;
        }
    }

    /// Send one delivery. Returns whether the transport accepted it.
    pub async fn dispatch(&self, delivery: Delivery, outcomes: &mut RunOutcomes) -> bool {
        let Some(customer) = delivery.customer.clone() else {
            warn!("{} has no matched customer, cannot send", delivery.file_name);
            outcomes.send_failed.push(delivery);
            return false;
        };

        let path = self.inbox_dir.join(&delivery.file_name);
        let attachment = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) => {
                let err = MailError::Attachment { path, source };
                error!("cannot send {}: {err}", delivery.file_name);
                outcomes.send_failed.push(delivery);
                return false;
            }
        };

        let message = OutgoingMessage {
            to: customer.emails.clone(),
            subject: subject_line(self.subject_prefix, &customer.name, &delivery.invoice_number),
            html_body: self.html_body.to_string(),
            attachment_name: delivery.file_name.clone(),
            attachment,
            receipt_id: delivery.content_hash.clone(),
        };

        info!("sending {} to {:?}", delivery.file_name, message.to);
        match self.mailer.send(&message).await {
            Ok(()) => {
                self.record_success(&delivery, outcomes);
                outcomes.sent.push(delivery);
                true
            }
            Err(err) => {
                error!("send failed for {}: {err}", delivery.file_name);
                let refused = err.is_connection_refused();
                outcomes.send_failed.push(delivery);
                if refused {
                    warn!(
                        "connection refused, pausing for {}s before the next send",
                        self.refusal_pause.as_secs()
                    );
                    tokio::time::sleep(self.refusal_pause).await;
                }
                false
            }
        }
    }

    /// Ledger append and archive move. The transport has already accepted
    /// the message, so failures here must not turn the delivery into a
    /// resend.
    fn record_success(&self, delivery: &Delivery, outcomes: &mut RunOutcomes) {
        if let Err(err) = self.ledger.append(&delivery.content_hash) {
            error!("post-send: {err}");
            outcomes.post_send_anomalies.push(PostSendAnomaly {
                file_name: delivery.file_name.clone(),
                detail: err.to_string(),
            });
        }

        if let Err(err) = self.archive(&delivery.file_name) {
            error!("post-send: failed to archive {}: {err}", delivery.file_name);
            outcomes.post_send_anomalies.push(PostSendAnomaly {
                file_name: delivery.file_name.clone(),
                detail: format!("failed to archive: {err}"),
            });
        }
    }

    fn archive(&self, file_name: &str) -> std::io::Result<()> {
        let day_dir = self
            .archive_dir
            .join(Local::now().format("%Y-%m-%d").to_string());
        fs::create_dir_all(&day_dir)?;
        fs::rename(self.inbox_dir.join(file_name), day_dir.join(file_name))
    }
}
