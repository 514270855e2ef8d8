//! Message construction and request encoding.

use crate::models::{
    Attachment, Headers, MergeVar, Message, Metadata, Recipient, RecipientMergeVars,
    RecipientMetadata, RecipientMetadataValues, SendRequest,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;

impl Message {
    /// Create a message with the default toggles.
    ///
    /// Defaults: `auto_text`, `auto_html`, `inline_css` and `merge` on;
    /// `important`, tracking, `url_strip_qs`, `preserve_recipients` and
    /// `view_content_link` off.
    ///
    /// # Examples
    /// ```
    /// use mandrill_client::{Message, Recipient};
    ///
    /// let message = Message::new(
    ///     "<p>Hello!</p>",
    ///     "Welcome",
    ///     "noreply@example.com",
    ///     "Example",
    ///     Recipient::to("user@example.com", "User"),
    /// )
    /// .tags(["welcome"]);
    /// assert_eq!(message.auto_text, Some(true));
    /// ```
    pub fn new(
        html: impl Into<String>,
        subject: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
        to: Recipient,
    ) -> Self {
        Self {
            html: html.into(),
            subject: subject.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
            to: vec![to],
            important: Some(false),
            track_opens: Some(false),
            track_clicks: Some(false),
            auto_text: Some(true),
            auto_html: Some(true),
            inline_css: Some(true),
            url_strip_qs: Some(false),
            preserve_recipients: Some(false),
            view_content_link: Some(false),
            merge: Some(true),
            ..Default::default()
        }
    }

    /// Set the plain-text body.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add another recipient.
    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.to.push(recipient);
        self
    }

    /// Set the `Reply-To` header.
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.headers = Some(Headers {
            reply_to: address.into(),
        });
        self
    }

    /// Send an exact copy of every recipient's email to this address.
    pub fn bcc_address(mut self, address: impl Into<String>) -> Self {
        self.bcc_address = address.into();
        self
    }

    /// Turn open tracking on or off.
    pub fn track_opens(mut self, on: bool) -> Self {
        self.track_opens = Some(on);
        self
    }

    /// Turn click tracking on or off.
    pub fn track_clicks(mut self, on: bool) -> Self {
        self.track_clicks = Some(on);
        self
    }

    /// Deliver ahead of non-important messages.
    pub fn important(mut self, on: bool) -> Self {
        self.important = Some(on);
        self
    }

    /// Replace the tag list. Tags starting with `_` are reserved by Mandrill.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sub-account the message is billed and reported under. It must already
    /// exist on the Mandrill account.
    pub fn subaccount(mut self, subaccount: impl Into<String>) -> Self {
        self.subaccount = subaccount.into();
        self
    }

    /// Custom tracking, signing and return-path domains. Empty strings leave
    /// the Mandrill defaults in place.
    pub fn domains(
        mut self,
        tracking: impl Into<String>,
        signing: impl Into<String>,
        return_path: impl Into<String>,
    ) -> Self {
        self.tracking_domain = tracking.into();
        self.signing_domain = signing.into();
        self.return_path_domain = return_path.into();
        self
    }

    /// Add a global merge variable.
    ///
    /// This does not touch `merge`; Mandrill enables merging on its own when
    /// merge variables are present.
    pub fn global_merge_var(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.global_merge_vars.push(MergeVar::new(name, content));
        self
    }

    /// Add merge variables for a single recipient.
    pub fn recipient_merge_vars(mut self, rcpt: impl Into<String>, vars: Vec<MergeVar>) -> Self {
        self.merge_vars.push(RecipientMergeVars {
            rcpt: rcpt.into(),
            vars,
        });
        self
    }

    /// Append Google Analytics parameters to links on these domains.
    pub fn google_analytics<I, S>(mut self, domains: I, campaign: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.google_analytics_domains = domains.into_iter().map(Into::into).collect();
        self.google_analytics_campaign = campaign.into();
        self
    }

    /// Global metadata Mandrill stores with the message.
    pub fn metadata(mut self, website: impl Into<String>) -> Self {
        self.metadata = Some(Metadata {
            website: website.into(),
        });
        self
    }

    /// Metadata for a single recipient, overriding [`Message::metadata`].
    pub fn recipient_metadata(mut self, rcpt: impl Into<String>, user_id: u64) -> Self {
        self.recipient_metadata.push(RecipientMetadata {
            rcpt: rcpt.into(),
            values: RecipientMetadataValues { user_id },
        });
        self
    }

    /// Replace the attachment list.
    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Add one attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Add an image embedded in the HTML body, referenced as `cid:<name>`.
    pub fn image(mut self, image: Attachment) -> Self {
        self.images.push(image);
        self
    }
}

/// Per-call envelope settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Queue the message and return `queued` for every recipient.
    pub is_async: bool,
    /// Dedicated IP pool to send from.
    pub ip_pool: Option<String>,
    /// Schedule delivery instead of sending immediately.
    pub send_at: Option<DateTime<Utc>>,
    /// Deadline for this call, overriding the client default.
    pub timeout: Option<Duration>,
}

impl SendOptions {
    /// Synchronous send, default pool, immediate delivery, client timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the send instead of waiting for delivery results.
    pub fn is_async(mut self, on: bool) -> Self {
        self.is_async = on;
        self
    }

    /// Send through a dedicated IP pool. Unknown pools fall back to the
    /// account default.
    pub fn ip_pool(mut self, pool: impl Into<String>) -> Self {
        self.ip_pool = Some(pool.into());
        self
    }

    /// Schedule delivery. A time in the past sends immediately.
    pub fn send_at(mut self, at: DateTime<Utc>) -> Self {
        self.send_at = Some(at);
        self
    }

    /// Deadline for this call only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl SendRequest {
    /// Wrap a message in an envelope.
    pub fn new(key: impl Into<String>, message: Message, options: &SendOptions) -> Self {
        Self {
            key: key.into(),
            message,
            is_async: options.is_async,
            ip_pool: options.ip_pool.clone(),
            send_at: options.send_at,
        }
    }

    /// Encode as the JSON text posted to the API.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Encode)
    }
}

/// Build the envelope for `message` and encode it.
///
/// No validation happens here: an empty recipient list or a reserved tag is
/// encoded as given and left to the service to reject.
pub fn encode_send_request(key: &str, message: Message, options: &SendOptions) -> Result<String> {
    SendRequest::new(key, message, options).to_json()
}
