//! Mandrill async client implementation.

use crate::attachment::encode_attachment;
use crate::request::{SendOptions, encode_send_request};
use crate::transport::{endpoint_url, post_json};
use crate::{Attachment, Message, Recipient, Result, SendResponse};
use std::io::{self, Read};
use std::time::Duration;

/// Async client for the Mandrill transactional email API.
///
/// The client holds immutable configuration only, so one instance can be
/// shared (or cloned) across tasks and used for concurrent sends.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    subaccount: String,
    from_email: String,
    from_name: String,
    base_url: String,
    proxy: Option<String>,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a client with default settings and no sender defaults.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Default sub-account applied to messages that don't set one.
    pub fn subaccount(&self) -> &str {
        &self.subaccount
    }

    /// Default sender address.
    pub fn from_email(&self) -> &str {
        &self.from_email
    }

    /// Default sender display name.
    pub fn from_name(&self) -> &str {
        &self.from_name
    }

    /// Get the proxy URL if one was configured.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Send an HTML message to one recipient using the client's sender and
    /// sub-account defaults.
    ///
    /// # Examples
    /// ```no_run
    /// # use mandrill_client::{Client, Recipient};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mandrill_client::Error> {
    /// let client = Client::builder("api-key")
    ///     .from("noreply@example.com", "Example")
    ///     .subaccount("customer-123")
    ///     .build()?;
    /// let results = client
    ///     .send_message(
    ///         Recipient::to("user@example.com", "User"),
    ///         "Welcome",
    ///         "<p>Hello!</p>",
    ///         &["welcome"],
    ///     )
    ///     .await?;
    /// for r in results {
    ///     println!("{}: {:?}", r.email, r.status);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_message(
        &self,
        to: Recipient,
        subject: &str,
        html: &str,
        tags: &[&str],
    ) -> Result<Vec<SendResponse>> {
        self.send_message_with_attachments(to, subject, html, tags, Vec::new())
            .await
    }

    /// Like [`Client::send_message`], with attachments.
    pub async fn send_message_with_attachments(
        &self,
        to: Recipient,
        subject: &str,
        html: &str,
        tags: &[&str],
        attachments: Vec<Attachment>,
    ) -> Result<Vec<SendResponse>> {
        let message = self
            .message(to, subject, html, tags)
            .attachments(attachments);
        self.send(message, &SendOptions::default()).await
    }

    /// Like [`Client::send_message`], attaching the full contents of `reader`
    /// under `filename`.
    ///
    /// The stream is read on Tokio's blocking thread pool before any request
    /// is made, so a large file does not stall the async workers. A read
    /// error aborts the send.
    ///
    /// # Examples
    /// ```no_run
    /// # use mandrill_client::{Client, Recipient};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mandrill_client::Error> {
    /// let client = Client::builder("api-key")
    ///     .from("billing@example.com", "Billing")
    ///     .build()?;
    /// let file = std::fs::File::open("invoice.pdf")?;
    /// client
    ///     .send_message_with_reader(
    ///         Recipient::to("user@example.com", ""),
    ///         "Your invoice",
    ///         "<p>Attached.</p>",
    ///         &["invoice"],
    ///         "invoice.pdf",
    ///         file,
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_message_with_reader(
        &self,
        to: Recipient,
        subject: &str,
        html: &str,
        tags: &[&str],
        filename: &str,
        reader: impl Read + Send + 'static,
    ) -> Result<Vec<SendResponse>> {
        let filename = filename.to_owned();
        let attachment = tokio::task::spawn_blocking(move || encode_attachment(filename, reader))
            .await
            .map_err(io::Error::other)??;
        self.send_message_with_attachments(to, subject, html, tags, vec![attachment])
            .await
    }

    /// Send an arbitrary message.
    ///
    /// An empty `from_email` takes the client's sender address and, if the
    /// message has no `from_name` either, its display name. A message with its
    /// own sender address never borrows the default name. An empty
    /// `subaccount` takes the client default; everything else is sent as given.
    pub async fn send(
        &self,
        mut message: Message,
        options: &SendOptions,
    ) -> Result<Vec<SendResponse>> {
        self.apply_defaults(&mut message);

        let recipients = message.to.len();
        let body = encode_send_request(&self.api_key, message, options)?;
        let url = endpoint_url(&self.base_url, SEND_PATH);

        tracing::debug!(url = %url, recipients, is_async = options.is_async, "sending message");
        post_json(&self.http, &url, body, options.timeout).await
    }

    fn apply_defaults(&self, message: &mut Message) {
        if message.from_email.is_empty() {
            self.from_email.clone_into(&mut message.from_email);
            fill_if_empty(&mut message.from_name, &self.from_name);
        }
        fill_if_empty(&mut message.subaccount, &self.subaccount);
    }

    /// Message with the default toggles and this client's sender identity.
    fn message(&self, to: Recipient, subject: &str, html: &str, tags: &[&str]) -> Message {
        Message::new(html, subject, &self.from_email, &self.from_name, to)
            .tags(tags.iter().copied())
            .subaccount(&self.subaccount)
    }
}

fn fill_if_empty(field: &mut String, default: &str) {
    if field.is_empty() {
        default.clone_into(field);
    }
}

/// Public Mandrill API root.
pub const BASE_URL: &str = "https://mandrillapp.com/api/1.0/";
const SEND_PATH: &str = "messages/send.json";
const USER_AGENT_VALUE: &str = concat!("mandrill-client-rs/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a Mandrill client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    subaccount: String,
    from_email: String,
    from_name: String,
    base_url: String,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No sender or sub-account defaults
    /// - Public Mandrill endpoint
    /// - No proxy, strict TLS validation
    /// - No timeout beyond what reqwest applies
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            subaccount: String::new(),
            from_email: String::new(),
            from_name: String::new(),
            base_url: BASE_URL.to_string(),
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
            timeout: None,
        }
    }

    /// Default sub-account for messages that don't set one.
    pub fn subaccount(mut self, subaccount: impl Into<String>) -> Self {
        self.subaccount = subaccount.into();
        self
    }

    /// Default sender address and display name.
    pub fn from(mut self, email: impl Into<String>, name: impl Into<String>) -> Self {
        self.from_email = email.into();
        self.from_name = name.into();
        self
    }

    /// Override the API root URL.
    ///
    /// Useful for testing against a local mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:9050").
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Default deadline for every call. [`SendOptions::timeout`] overrides it
    /// per call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client. No network traffic happens here.
    pub fn build(self) -> Result<Client> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .user_agent(self.user_agent);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Client {
            http: builder.build()?,
            api_key: self.api_key,
            subaccount: self.subaccount,
            from_email: self.from_email,
            from_name: self.from_name,
            base_url: self.base_url,
            proxy: self.proxy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_configuration() {
        let client = Client::builder("key")
            .from("noreply@example.com", "Example")
            .subaccount("customer-123")
            .proxy("http://127.0.0.1:8080")
            .build()
            .unwrap();

        assert_eq!(client.from_email(), "noreply@example.com");
        assert_eq!(client.from_name(), "Example");
        assert_eq!(client.subaccount(), "customer-123");
        assert_eq!(client.proxy(), Some("http://127.0.0.1:8080"));
    }

    #[test]
    fn message_uses_client_identity() {
        let client = Client::builder("key")
            .from("noreply@example.com", "Example")
            .subaccount("customer-123")
            .build()
            .unwrap();

        let message = client.message(Recipient::to("a@b.com", "A"), "Hi", "<p>Hi</p>", &["_x"]);
        assert_eq!(message.from_email, "noreply@example.com");
        assert_eq!(message.subaccount, "customer-123");
        assert_eq!(message.tags, vec!["_x".to_string()]);
        assert_eq!(message.merge, Some(true));
    }

    #[test]
    fn sender_name_follows_sender_address() {
        let client = Client::builder("key")
            .from("noreply@example.com", "Example")
            .subaccount("customer-123")
            .build()
            .unwrap();

        let mut own_sender = Message {
            from_email: "override@example.com".into(),
            ..Default::default()
        };
        client.apply_defaults(&mut own_sender);
        assert_eq!(own_sender.from_email, "override@example.com");
        assert_eq!(own_sender.from_name, "");
        assert_eq!(own_sender.subaccount, "customer-123");

        let mut named = Message {
            from_name: "Support".into(),
            ..Default::default()
        };
        client.apply_defaults(&mut named);
        assert_eq!(named.from_email, "noreply@example.com");
        assert_eq!(named.from_name, "Support");

        let mut bare = Message::default();
        client.apply_defaults(&mut bare);
        assert_eq!(bare.from_email, "noreply@example.com");
        assert_eq!(bare.from_name, "Example");
    }

    #[test]
    fn explicit_fields_win_over_defaults() {
        let mut field = "set@example.com".to_string();
        fill_if_empty(&mut field, "default@example.com");
        assert_eq!(field, "set@example.com");

        let mut field = String::new();
        fill_if_empty(&mut field, "default@example.com");
        assert_eq!(field, "default@example.com");
    }
}
