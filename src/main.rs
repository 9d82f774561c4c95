use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod campaign;
mod category;
mod config;
mod error;
mod intel;
mod mailer;
mod models;
mod personalize;
mod report;
mod store;
mod templates;

use campaign::Campaign;
use config::{CampaignSettings, EmailStyle, Paths, SenderIdentity};
use error::OutreachError;
use intel::IntelligenceGenerator;
use mailer::{DryRunMailer, GmailMailer, Mailer, OutgoingMessage, DRY_RUN_PREFIX};
use models::CampaignRecord;
use report::Selection;

#[derive(Parser)]
#[command(name = "outbound-outreach")]
#[command(about = "Personalized cold outreach for the Outbound experiences platform", long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: Paths,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create email drafts for all prospects
    Create {
        /// Log drafts instead of staging them in Gmail
        #[arg(long)]
        dry_run: bool,
        #[arg(long, value_enum, default_value_t = EmailStyle::Pitch)]
        style: EmailStyle,
        /// Seed for the demand simulation, for reproducible numbers
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Send previously created drafts
    Send {
        /// Send every draft without prompting
        #[arg(long)]
        all: bool,
    },
    /// Show campaign status
    Status {
        /// Also ask Gmail which ledger drafts still exist
        #[arg(long)]
        check: bool,
    },
    /// Merge prospects from a CSV file into the prospect list
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Delete every ledger draft from the mailbox
    Discard {
        #[arg(long)]
        yes: bool,
    },
    /// Send a single test message
    TestSend {
        #[arg(long)]
        to: String,
        #[arg(long, value_delimiter = ',')]
        cc: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        bcc: Vec<String>,
        /// HTML alternative to the plain-text body
        #[arg(long)]
        html: Option<String>,
    },
}

fn connect_mailer(paths: &Paths, dry_run: bool) -> anyhow::Result<Box<dyn Mailer>> {
    if dry_run {
        return Ok(Box::new(DryRunMailer));
    }

    let token = mailer::resolve_access_token(paths.access_token.as_deref(), &paths.token_file)
        .context("Gmail credentials are required; export a token or pass --dry-run")?;
    Ok(Box::new(GmailMailer::new(token)?))
}

fn open_ledger(paths: &Paths) -> anyhow::Result<Option<Vec<CampaignRecord>>> {
    match store::load_ledger(&paths.ledger) {
        Ok(records) => Ok(Some(records)),
        Err(OutreachError::MissingInputFile(_)) => {
            println!("No campaign drafts found. Run `create` first.");
            Ok(None)
        }
        Err(err) => Err(err).context("failed to read campaign ledger"),
    }
}

fn only_dry_run_drafts(records: &[CampaignRecord]) -> bool {
    records
        .iter()
        .all(|record| record.draft_id.starts_with(DRY_RUN_PREFIX))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let paths = cli.paths;

    match cli.command {
        Commands::Create {
            dry_run,
            style,
            seed,
        } => {
            if dry_run && store::holds_mailbox_drafts(&paths.ledger)? {
                anyhow::bail!(
                    "{} lists drafts staged in Gmail; pass --ledger <FILE> to keep the dry run separate",
                    paths.ledger.display()
                );
            }

            let sender = SenderIdentity::from_env()?;
            let prospects = store::load_prospects(&paths.prospects).with_context(|| {
                format!("could not load prospects from {}", paths.prospects.display())
            })?;
            let mailer = connect_mailer(&paths, dry_run)?;

            info!(count = prospects.len(), ?style, "creating campaign drafts");
            let settings = CampaignSettings {
                sender,
                base_url: paths.base_url.clone(),
                style,
            };
            let mut campaign = Campaign::new(
                &settings,
                IntelligenceGenerator::with_seed(seed),
                mailer.as_ref(),
            );
            let outcome = campaign.run(&prospects).await;

            for entry in &outcome.entries {
                if let Err(err) =
                    store::write_landing_page(&paths.landing_dir, &entry.slug, &entry.landing_page)
                {
                    warn!(business = %entry.record.business_name, error = %err, "landing page not written");
                }
            }

            let records: Vec<CampaignRecord> =
                outcome.entries.iter().map(|e| e.record.clone()).collect();
            store::save_ledger(&paths.ledger, &records).with_context(|| {
                format!("failed to write ledger {}", paths.ledger.display())
            })?;

            print!(
                "{}",
                report::build_create_summary(&outcome, &paths.ledger.display().to_string())
            );
        }
        Commands::Send { all } => {
            let Some(records) = open_ledger(&paths)? else {
                return Ok(());
            };

            let indices: Vec<usize> = if all {
                (0..records.len()).collect()
            } else {
                print!("{}", report::draft_menu(&records));
                let send_all = Confirm::new("Send all drafts?")
                    .with_default(false)
                    .prompt()?;

                if send_all {
                    (0..records.len()).collect()
                } else {
                    let input =
                        Text::new("Draft numbers to send (comma-separated), or 'none' to cancel:")
                            .prompt()?;
                    match report::parse_selection(&input, records.len()) {
                        Some(Selection::Indices(indices)) => indices,
                        Some(Selection::Cancel) => return Ok(()),
                        None => {
                            println!("Invalid selection. Cancelling.");
                            return Ok(());
                        }
                    }
                }
            };

            let mailer = connect_mailer(&paths, only_dry_run_drafts(&records))?;
            let mut sent = 0usize;
            for index in indices {
                let record = &records[index];
                match mailer.send_draft(&record.draft_id).await {
                    Ok(()) => sent += 1,
                    Err(err) => {
                        warn!(draft_id = %record.draft_id, business = %record.business_name, error = %err, "send failed")
                    }
                }
            }

            println!("Sent {sent} emails successfully!");
        }
        Commands::Status { check } => {
            let Some(records) = open_ledger(&paths)? else {
                return Ok(());
            };
            print!("{}", report::build_status(&records));

            if check {
                if only_dry_run_drafts(&records) {
                    println!("\nLedger holds only dry-run drafts; nothing to check in Gmail.");
                } else {
                    let mailbox = connect_mailer(&paths, false)?
                        .list_drafts()
                        .await
                        .context("failed to list Gmail drafts")?;
                    println!();
                    print!("{}", report::build_mailbox_check(&records, &mailbox));
                }
            }
        }
        Commands::Import { csv } => {
            let inserted = store::import_csv(&csv, &paths.prospects)
                .with_context(|| format!("failed to import {}", csv.display()))?;
            println!(
                "Imported {inserted} prospects from {} into {}.",
                csv.display(),
                paths.prospects.display()
            );
        }
        Commands::Discard { yes } => {
            let Some(records) = open_ledger(&paths)? else {
                return Ok(());
            };

            if !yes {
                let confirmed = Confirm::new(&format!(
                    "Delete {} drafts listed in {}?",
                    records.len(),
                    paths.ledger.display()
                ))
                .with_default(false)
                .prompt()?;

                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let mailer = connect_mailer(&paths, only_dry_run_drafts(&records))?;
            let mut remaining = Vec::new();
            for record in records {
                if let Err(err) = mailer.delete_draft(&record.draft_id).await {
                    warn!(draft_id = %record.draft_id, error = %err, "delete failed");
                    remaining.push(record);
                }
            }

            store::save_ledger(&paths.ledger, &remaining)?;
            println!("Discarded drafts; {} left in the ledger.", remaining.len());
        }
        Commands::TestSend { to, cc, bcc, html } => {
            let mailer = connect_mailer(&paths, false)?;
            let message = OutgoingMessage {
                cc,
                bcc,
                html_body: html,
                ..OutgoingMessage::new(
                    vec![to.clone()],
                    "Test Email from Outbound outreach",
                    "Hello! This is a test email sent through the Gmail API.",
                )
            };
            let message_id = mailer.send(&message).await?;
            println!("Test email sent to {to}. Message ID: {message_id}");
        }
    }

    Ok(())
}
