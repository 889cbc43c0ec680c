//! Outcome bookkeeping and the end-of-run summary.

use std::fmt::Write as _;

use crate::models::delivery::{Delivery, PostSendAnomaly};

/// Terminal outcome buckets for one run.
///
/// Every document discovered in the inbox ends up in exactly one bucket
/// (documents whose extraction failed are logged and skipped instead).
#[derive(Debug, Default)]
pub struct RunOutcomes {
    pub sent: Vec<Delivery>,
    pub send_failed: Vec<Delivery>,
    /// Resend candidates the operator declined.
    pub already_sent: Vec<Delivery>,
    /// Documents with no extractable CPF/CNPJ.
    pub missing_identifier: Vec<Delivery>,
    /// Documents whose identifier matched no registry record.
    pub unmatched_customer: Vec<Delivery>,
    /// Failures after the transport already accepted a message.
    pub post_send_anomalies: Vec<PostSendAnomaly>,
}

impl RunOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents that did not go out, excluding intentionally declined
    /// resends, which are reported as their own neutral category.
    pub fn not_sent_total(&self) -> usize {
        self.send_failed.len() + self.missing_identifier.len() + self.unmatched_customer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
            && self.send_failed.is_empty()
            && self.already_sent.is_empty()
            && self.missing_identifier.is_empty()
            && self.unmatched_customer.is_empty()
    }
}

/// Render the end-of-run summary for the console and the log.
pub fn render_summary(outcomes: &RunOutcomes) -> String {
    let mut out = String::new();

    if !outcomes.sent.is_empty() {
        let _ = writeln!(out, "SENT SUCCESSFULLY: {}", outcomes.sent.len());
        for delivery in &outcomes.sent {
            let _ = writeln!(out, "OK - {}", delivery.file_name);
        }
    }

    if outcomes.not_sent_total() > 0 {
        let _ = writeln!(out, "NOT SENT: {}", outcomes.not_sent_total());
        for delivery in &outcomes.send_failed {
            let _ = writeln!(out, "X - {} (send failed)", delivery.file_name);
        }
        for delivery in &outcomes.unmatched_customer {
            let _ = writeln!(
                out,
                "X - {} (customer {} not in registry)",
                delivery.file_name,
                delivery.tax_id.as_deref().unwrap_or("?"),
            );
        }
        for delivery in &outcomes.missing_identifier {
            let _ = writeln!(out, "X - {} (no CPF/CNPJ found)", delivery.file_name);
        }
    }

    if !outcomes.already_sent.is_empty() {
        let _ = writeln!(
            out,
            "SKIPPED, ALREADY SENT: {}",
            outcomes.already_sent.len()
        );
        for delivery in &outcomes.already_sent {
            let _ = writeln!(out, "- {} (resend declined)", delivery.file_name);
        }
    }

    if !outcomes.post_send_anomalies.is_empty() {
        let _ = writeln!(
            out,
            "POST-SEND ERRORS: {}",
            outcomes.post_send_anomalies.len()
        );
        for anomaly in &outcomes.post_send_anomalies {
            let _ = writeln!(out, "! - {}: {}", anomaly.file_name, anomaly.detail);
        }
    }

    if out.is_empty() {
        out.push_str("Nothing to report.\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn delivery(name: &str) -> Delivery {
        Delivery::new(name, format!("hash-{name}"))
    }

    #[test]
    fn empty_outcomes_render_placeholder() {
        assert_eq!(render_summary(&RunOutcomes::new()), "Nothing to report.\n");
    }

    #[test]
    fn declined_resends_are_not_counted_as_failures() {
        let mut outcomes = RunOutcomes::new();
        outcomes.already_sent.push(delivery("a.pdf"));
        assert_eq!(outcomes.not_sent_total(), 0);

        let summary = render_summary(&outcomes);
        assert!(summary.contains("SKIPPED, ALREADY SENT: 1"));
        assert!(!summary.contains("NOT SENT"));
    }

    #[test]
    fn summary_lists_each_bucket() {
        let mut outcomes = RunOutcomes::new();
        outcomes.sent.push(delivery("a.pdf"));
        outcomes.send_failed.push(delivery("b.pdf"));
        let mut unmatched = delivery("c.pdf");
        unmatched.tax_id = Some("000.000.000-00".to_string());
        outcomes.unmatched_customer.push(unmatched);
        outcomes.missing_identifier.push(delivery("d.pdf"));

        let summary = render_summary(&outcomes);
        assert!(summary.contains("SENT SUCCESSFULLY: 1"));
        assert!(summary.contains("OK - a.pdf"));
        assert!(summary.contains("NOT SENT: 3"));
        assert!(summary.contains("X - b.pdf (send failed)"));
        assert!(summary.contains("X - c.pdf (customer 000.000.000-00 not in registry)"));
        assert!(summary.contains("X - d.pdf (no CPF/CNPJ found)"));
    }

    #[test]
    fn post_send_anomalies_are_reported_separately() {
        let mut outcomes = RunOutcomes::new();
        outcomes.sent.push(delivery("a.pdf"));
        outcomes.post_send_anomalies.push(PostSendAnomaly {
            file_name: "a.pdf".to_string(),
            detail: "ledger append failed".to_string(),
        });

        let summary = render_summary(&outcomes);
        assert!(summary.contains("SENT SUCCESSFULLY: 1"));
        assert!(summary.contains("POST-SEND ERRORS: 1"));
        assert!(summary.contains("! - a.pdf: ledger append failed"));
    }
}
