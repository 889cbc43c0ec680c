//! One full dispatch run, start to finish.

use std::fs;
use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use remessa_core::{
    AppConfig, Classifier, ConfirmationGate, Dispatcher, IdentifierScanner, Ledger, PdfTextSource,
    RunOutcomes, SmtpMailer, load_registry, render_summary,
};
use tracing::info;

use crate::prompt::TermPrompt;

/// Execute the pipeline: scan, classify, confirm resends, deliver, report.
pub async fn execute(config: &AppConfig) -> anyhow::Result<()> {
    info!("**** run started ****");

    let ledger = Ledger::new(config.paths.ledger_file.clone());
    ledger
        .truncate_tail(config.limits.ledger_max_lines)
        .context("failed to trim the ledger")?;

    let registry = load_registry(&config.paths.registry_file).with_context(|| {
        format!(
            "failed to load customer registry {}",
            config.paths.registry_file.display()
        )
    })?;
    info!("registry loaded with {} customers", registry.len());

    let source = PdfTextSource::new();
    let classifier = Classifier::new(
        &registry,
        &ledger,
        IdentifierScanner::new(&config.extraction.company_tax_id),
        &source,
    );

    let mut outcomes = RunOutcomes::new();
    let mut intake = classifier
        .classify_inbox(&config.paths.inbox_dir, &mut outcomes)
        .with_context(|| {
            format!(
                "failed to scan inbox {}",
                config.paths.inbox_dir.display()
            )
        })?;

    if !intake.resend_candidates.is_empty() {
        let mut prompt = TermPrompt::new();
        prompt.preamble(intake.resend_candidates.len())?;
        let candidates = std::mem::take(&mut intake.resend_candidates);
        let confirmed = ConfirmationGate::new().run(candidates, &mut prompt, &mut outcomes)?;
        intake.pending.extend(confirmed);
    }

    if intake.pending.is_empty() {
        let notice = format!(
            "Nothing to send - check for files in {}",
            config.paths.inbox_dir.display()
        );
        println!("{notice}");
        info!("{notice}");
    } else {
        let html_body = fs::read_to_string(&config.message.body_template).with_context(|| {
            format!(
                "failed to read body template {}",
                config.message.body_template.display()
            )
        })?;

        let mailer = SmtpMailer::from_config(&config.smtp, &config.message)
            .context("failed to set up the SMTP transport")?;

        let dispatcher = Dispatcher {
            mailer: &mailer,
            ledger: &ledger,
            inbox_dir: &config.paths.inbox_dir,
            archive_dir: &config.paths.archive_dir,
            subject_prefix: &config.message.subject_prefix,
            html_body: &html_body,
            refusal_pause: Duration::from_secs(config.smtp.refusal_pause_secs),
        };

        let pb = ProgressBar::new(intake.pending.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} documents")
                .unwrap()
                .progress_chars("=>-"),
        );

        for delivery in intake.pending {
            let name = delivery.file_name.clone();
            let accepted = dispatcher.dispatch(delivery, &mut outcomes).await;
            if accepted {
                pb.println(format!("{} Sending {name}... OK", style("✓").green()));
            } else {
                pb.println(format!("{} Sending {name}... failed", style("✗").red()));
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
    }

    let summary = render_summary(&outcomes);
    println!();
    print!("{summary}");
    for line in summary.lines() {
        info!("{line}");
    }

    info!("**** run finished ****");
    Ok(())
}
