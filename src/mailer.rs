use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{OutreachError, Result};

pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

// Longest UTF-8 run whose base64 still fits a 75-char encoded-word.
const ENCODED_WORD_CHUNK: usize = 45;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
}

impl OutgoingMessage {
    pub fn new(to: Vec<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn recipients(&self) -> String {
        self.to.join(", ")
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Stages a message in the mailbox and returns the provider's draft id.
    async fn create_draft(&self, message: &OutgoingMessage) -> Result<String>;

    async fn send_draft(&self, draft_id: &str) -> Result<()>;

    /// Sends immediately and returns the provider's message id.
    async fn send(&self, message: &OutgoingMessage) -> Result<String>;

    async fn delete_draft(&self, draft_id: &str) -> Result<()>;

    async fn list_drafts(&self) -> Result<Vec<String>>;
}

fn check_header(name: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n']) {
        return Err(OutreachError::DispatchFailure(format!(
            "{name} header contains a line break"
        )));
    }
    Ok(())
}

fn check_addresses(name: &str, addresses: &[String]) -> Result<()> {
    addresses.iter().try_for_each(|addr| check_header(name, addr))
}

fn crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

fn write_part(message: &mut String, content_type: &str, text: &str) {
    let _ = write!(message, "Content-Type: {content_type}; charset=\"UTF-8\"\r\n");
    let _ = write!(message, "Content-Transfer-Encoding: 8bit\r\n\r\n");
    message.push_str(&crlf(text));
}

/// Builds an RFC 5322 message and encodes it as base64url, the form Gmail
/// expects in its `raw` field. With an HTML body the message becomes
/// `multipart/alternative` carrying both renderings.
pub fn build_raw_message(outgoing: &OutgoingMessage) -> Result<String> {
    if outgoing.to.is_empty() {
        return Err(OutreachError::DispatchFailure("no recipients".to_string()));
    }
    check_addresses("To", &outgoing.to)?;
    check_addresses("Cc", &outgoing.cc)?;
    check_addresses("Bcc", &outgoing.bcc)?;
    check_header("Subject", &outgoing.subject)?;

    let mut message = String::new();
    let _ = write!(message, "To: {}\r\n", outgoing.recipients());
    if !outgoing.cc.is_empty() {
        let _ = write!(message, "Cc: {}\r\n", outgoing.cc.join(", "));
    }
    if !outgoing.bcc.is_empty() {
        let _ = write!(message, "Bcc: {}\r\n", outgoing.bcc.join(", "));
    }
    let _ = write!(message, "Subject: {}\r\n", encode_header(&outgoing.subject));
    let _ = write!(message, "MIME-Version: 1.0\r\n");

    match &outgoing.html_body {
        None => write_part(&mut message, "text/plain", &outgoing.body),
        Some(html) => {
            let boundary = format!("outreach-{}", Uuid::new_v4().simple());
            let _ = write!(
                message,
                "Content-Type: multipart/alternative; boundary=\"{boundary}\"\r\n\r\n"
            );
            let _ = write!(message, "--{boundary}\r\n");
            write_part(&mut message, "text/plain", &outgoing.body);
            let _ = write!(message, "\r\n--{boundary}\r\n");
            write_part(&mut message, "text/html", html);
            let _ = write!(message, "\r\n--{boundary}--\r\n");
        }
    }

    Ok(URL_SAFE.encode(message.as_bytes()))
}

/// RFC 2047 encoded-words for headers that are not plain ASCII, folded so no
/// word exceeds 75 characters.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut start = 0;
    let mut end = 0;
    for (index, ch) in value.char_indices() {
        let next = index + ch.len_utf8();
        if next - start > ENCODED_WORD_CHUNK {
            words.push(&value[start..end]);
            start = end;
        }
        end = next;
    }
    words.push(&value[start..end]);

    words
        .iter()
        .map(|chunk| format!("=?UTF-8?B?{}?=", STANDARD.encode(chunk)))
        .collect::<Vec<_>>()
        .join("\r\n ")
}

#[derive(Deserialize)]
struct TokenFile {
    token: Option<String>,
    access_token: Option<String>,
}

/// Picks the explicit token if given, otherwise reads `token` or
/// `access_token` from the token file.
pub fn resolve_access_token(explicit: Option<&str>, token_file: &Path) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if !token_file.exists() {
        return Err(OutreachError::MissingCredentials(token_file.to_path_buf()));
    }

    let parsed: TokenFile = serde_json::from_str(&std::fs::read_to_string(token_file)?)?;
    parsed
        .token
        .or(parsed.access_token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| OutreachError::MissingCredentials(token_file.to_path_buf()))
}

#[derive(Serialize)]
struct RawMessage {
    raw: String,
}

#[derive(Serialize)]
struct DraftRequest {
    message: RawMessage,
}

#[derive(Serialize)]
struct DraftId<'a> {
    id: &'a str,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftPage {
    #[serde(default)]
    drafts: Vec<IdResponse>,
    next_page_token: Option<String>,
}

fn dispatch_err(err: reqwest::Error) -> OutreachError {
    OutreachError::DispatchFailure(err.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(OutreachError::DispatchFailure(format!("HTTP {status}: {text}")))
}

pub struct GmailMailer {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl GmailMailer {
    pub fn new(access_token: String) -> Result<Self> {
        Self::with_api_base(access_token, GMAIL_API_BASE)
    }

    pub fn with_api_base(access_token: String, api_base: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(dispatch_err)?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<IdResponse> {
        let url = self.url(path);
        debug!(%url, "gmail request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(dispatch_err)?;

        check_status(response)
            .await?
            .json::<IdResponse>()
            .await
            .map_err(dispatch_err)
    }
}

#[async_trait]
impl Mailer for GmailMailer {
    async fn create_draft(&self, message: &OutgoingMessage) -> Result<String> {
        let request = DraftRequest {
            message: RawMessage {
                raw: build_raw_message(message)?,
            },
        };
        let draft = self.post("drafts", &request).await?;
        info!(draft_id = %draft.id, to = %message.recipients(), subject = %message.subject, "draft created");
        Ok(draft.id)
    }

    async fn send_draft(&self, draft_id: &str) -> Result<()> {
        let message = self.post("drafts/send", &DraftId { id: draft_id }).await?;
        info!(draft_id, message_id = %message.id, "draft sent");
        Ok(())
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<String> {
        let request = RawMessage {
            raw: build_raw_message(message)?,
        };
        let sent = self.post("messages/send", &request).await?;
        info!(message_id = %sent.id, to = %message.recipients(), "message sent");
        Ok(sent.id)
    }

    async fn delete_draft(&self, draft_id: &str) -> Result<()> {
        let url = self.url(&format!("drafts/{draft_id}"));
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(dispatch_err)?;
        check_status(response).await?;

        info!(draft_id, "draft deleted");
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<String>> {
        let url = self.url("drafts");
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = request.send().await.map_err(dispatch_err)?;
            let page: DraftPage = check_status(response)
                .await?
                .json()
                .await
                .map_err(dispatch_err)?;

            ids.extend(page.drafts.into_iter().map(|draft| draft.id));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = ids.len(), "drafts listed");
        Ok(ids)
    }
}

/// Logs instead of dispatching and hands out `dry-run-<uuid>` ids.
#[derive(Debug, Default)]
pub struct DryRunMailer;

pub const DRY_RUN_PREFIX: &str = "dry-run-";

#[async_trait]
impl Mailer for DryRunMailer {
    async fn create_draft(&self, message: &OutgoingMessage) -> Result<String> {
        build_raw_message(message)?;
        let id = format!("{DRY_RUN_PREFIX}{}", Uuid::new_v4());
        info!(draft_id = %id, to = %message.recipients(), subject = %message.subject, "dry run: draft not staged");
        Ok(id)
    }

    async fn send_draft(&self, draft_id: &str) -> Result<()> {
        info!(draft_id, "dry run: draft not sent");
        Ok(())
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<String> {
        build_raw_message(message)?;
        let id = format!("{DRY_RUN_PREFIX}{}", Uuid::new_v4());
        info!(message_id = %id, to = %message.recipients(), "dry run: message not sent");
        Ok(id)
    }

    async fn delete_draft(&self, draft_id: &str) -> Result<()> {
        info!(draft_id, "dry run: draft not deleted");
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
