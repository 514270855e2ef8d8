//! Wire types for the `messages/send.json` call.
//!
//! Field names follow the Mandrill JSON schema exactly. Empty strings, empty
//! lists, and unset toggles are omitted from the encoded request.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a recipient appears in the delivered message headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    #[default]
    To,
    Cc,
    Bcc,
}

/// A single recipient of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: RecipientType,
}

impl Recipient {
    /// A primary (`to`) recipient.
    pub fn to(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            kind: RecipientType::To,
        }
    }

    /// A carbon-copy recipient.
    pub fn cc(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: RecipientType::Cc,
            ..Self::to(email, name)
        }
    }

    /// A blind carbon-copy recipient.
    pub fn bcc(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: RecipientType::Bcc,
            ..Self::to(email, name)
        }
    }
}

/// Extra headers added to the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    #[serde(rename = "Reply-To", default, skip_serializing_if = "String::is_empty")]
    pub reply_to: String,
}

/// A named merge variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeVar {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
}

impl MergeVar {
    /// A merge variable substituted for `*|NAME|*` in the message content.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Merge variables overriding the global ones for a single recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientMergeVars {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rcpt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<MergeVar>,
}

/// Global user metadata stored alongside the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,
}

/// Indexed metadata values for one recipient. A zero `user_id` is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientMetadataValues {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub user_id: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Metadata overriding [`Metadata`] for a single recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rcpt: String,
    pub values: RecipientMetadataValues,
}

/// A file attached to, or an image embedded in, a message.
///
/// `content` is base64 text; the client never decodes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
}

/// A single email as understood by Mandrill.
///
/// Use [`Message::new`] to get the documented default toggles, then the
/// chained setters for everything else. Tags starting with `_` are reserved
/// by Mandrill; the client passes them through untouched and the service
/// decides what to do with them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub html: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub from_email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub from_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_clicks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_strip_qs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_recipients: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_content_link: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bcc_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tracking_domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub signing_domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub return_path_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_merge_vars: Vec<MergeVar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merge_vars: Vec<RecipientMergeVars>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subaccount: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub google_analytics_domains: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub google_analytics_campaign: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_metadata: Vec<RecipientMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Attachment>,
}

/// Envelope posted to `messages/send.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub key: String,
    pub message: Message,
    #[serde(rename = "async", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_async: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_pool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "send_at_format")]
    pub send_at: Option<DateTime<Utc>>,
}

/// Delivery state reported for one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Sent,
    Queued,
    Scheduled,
    Rejected,
    Invalid,
    #[serde(other)]
    Unknown,
}

/// Per-recipient result of a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub email: String,
    pub status: SendStatus,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub reject_reason: Option<String>,
}

/// Body returned by Mandrill when it rejects the whole call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status: String,
    pub code: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// `send_at` travels as `YYYY-MM-DD HH:MM:SS` in UTC.
mod send_at_format {
    use super::*;
    use serde::{Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            NaiveDateTime::parse_from_str(&s, FORMAT)
                .map(|naive| naive.and_utc())
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
