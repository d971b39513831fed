//! Outbound webhook notification for game submissions.
//!
//! Delivery is at-most-once: one POST, no retry, no response body consumed
//! beyond the status. The caller must not report success to the user before
//! the attempt resolves.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::models::GameSubmission;

const EMBED_COLOR: u32 = 0x7b68ee;
const FOOTER_TEXT: &str = "Gamedex Submission System";

/// A file attached to a submission.
#[derive(Debug, Clone)]
pub struct AttachedFile {
    /// Original file name.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    color: u32,
    fields: Vec<EmbedField>,
    thumbnail: Thumbnail,
    timestamp: String,
    footer: Footer,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: &'static str,
    value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    inline: bool,
}

#[derive(Debug, Serialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Serialize)]
struct Footer {
    text: &'static str,
}

/// Posts submission notifications to a fixed external endpoint.
#[derive(Debug, Clone)]
pub struct SubmissionNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SubmissionNotifier {
    /// Create a notifier for the given webhook URL.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    /// Deliver one submission notification.
    ///
    /// With an attachment the body is multipart: a `payload_json` field plus
    /// the file. Without one it is a plain JSON body.
    pub async fn notify(
        &self,
        submission: &GameSubmission,
        file: Option<AttachedFile>,
    ) -> Result<()> {
        let payload = build_payload(submission, file.is_some());
        let request = self.client.post(&self.webhook_url);
        let response = match file {
            Some(file) => {
                let form = Form::new()
                    .text(
                        "payload_json",
                        serde_json::to_string(&payload)
                            .context("failed to serialize webhook payload")?,
                    )
                    .part("file", Part::bytes(file.bytes).file_name(file.name));
                request.multipart(form).send().await
            }
            None => request.json(&payload).send().await,
        };

        response
            .context("failed to deliver submission webhook")?
            .error_for_status()
            .context("submission webhook rejected the notification")?;
        Ok(())
    }
}

fn build_payload(submission: &GameSubmission, file_attached: bool) -> WebhookPayload {
    let video = submission
        .video_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| "N/A".to_string());
    WebhookPayload {
        embeds: vec![Embed {
            title: "🎮 New Game Submission".to_string(),
            color: EMBED_COLOR,
            fields: vec![
                EmbedField {
                    name: "Title",
                    value: submission.title.clone(),
                    inline: true,
                },
                EmbedField {
                    name: "Category",
                    value: submission.category.to_string(),
                    inline: true,
                },
                EmbedField {
                    name: "File Attached",
                    value: if file_attached { "✅ Yes" } else { "❌ No" }.to_string(),
                    inline: true,
                },
                EmbedField {
                    name: "Description",
                    value: submission.description.clone(),
                    inline: false,
                },
                EmbedField {
                    name: "Image URL",
                    value: submission.image_url.clone(),
                    inline: false,
                },
                EmbedField {
                    name: "Video URL",
                    value: video,
                    inline: false,
                },
            ],
            thumbnail: Thumbnail {
                url: submission.image_url.clone(),
            },
            timestamp: submission.submitted_at.to_rfc3339(),
            footer: Footer { text: FOOTER_TEXT },
        }],
    }
}
