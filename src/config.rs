use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};

use crate::templates::Fields;

pub const DEFAULT_BASE_URL: &str = "https://outbound.com";

/// Who the outreach email is signed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl SenderIdentity {
    pub fn from_env() -> anyhow::Result<Self> {
        let name = std::env::var("OUTREACH_SENDER_NAME")
            .context("OUTREACH_SENDER_NAME must be set to the name emails are signed with")?;
        let email = std::env::var("OUTREACH_SENDER_EMAIL")
            .context("OUTREACH_SENDER_EMAIL must be set to the reply-to address")?;
        let phone = std::env::var("OUTREACH_SENDER_PHONE").unwrap_or_default();

        Ok(Self { name, email, phone })
    }

    pub fn fill(&self, fields: &mut Fields) {
        fields.insert("sender_name", self.name.clone());
        fields.insert("sender_email", self.email.clone());
        fields.insert("sender_phone", self.phone.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmailStyle {
    /// Intelligence-driven pitch with revenue numbers and a landing page link.
    #[default]
    Pitch,
    /// Static per-category introduction.
    Classic,
}

/// Everything the campaign needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct CampaignSettings {
    pub sender: SenderIdentity,
    pub base_url: String,
    pub style: EmailStyle,
}

/// File locations and service endpoints shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct Paths {
    /// Prospect list: JSON object of category -> businesses
    #[arg(long, env = "OUTREACH_PROSPECTS", default_value = "business_prospects.json", global = true)]
    pub prospects: PathBuf,

    /// Campaign ledger written by `create`
    #[arg(long, env = "OUTREACH_LEDGER", default_value = "personalized_campaigns.json", global = true)]
    pub ledger: PathBuf,

    /// Directory for per-business landing page data
    #[arg(long, env = "OUTREACH_LANDING_DIR", default_value = "landing_pages", global = true)]
    pub landing_dir: PathBuf,

    /// Landing page domain
    #[arg(long, env = "OUTREACH_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// OAuth token file holding a Gmail access token
    #[arg(long, env = "GMAIL_TOKEN_FILE", default_value = "token.json", global = true)]
    pub token_file: PathBuf,

    /// Gmail access token; takes precedence over the token file
    #[arg(long, env = "GMAIL_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,
}
