//! # Mandrill Client
//! Asynchronous binding for the Mandrill transactional email API. Build a [`Message`], optionally attach files, and send it through a [`Client`] configured with [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust services that send transactional mail (sign-ups, receipts, password resets) through a Mandrill account: configure the API key and sender defaults once, then call [`Client::send_message`] or [`Client::send`] from any task.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Dropping a send future cancels the call; [`ClientBuilder::timeout`] and [`SendOptions::timeout`] bound how long it may take.
//!
//! ## Out of scope
//! Only `messages/send.json` is covered. There is no retry, rate limiting, or webhook handling; wrap the client if you need them.
//!
//! ## Errors
//! Transport failures and timeouts surface as [`Error::Request`]. A non-200 reply becomes [`Error::Api`] carrying Mandrill's code, name and message; a body that doesn't match the expected shape becomes [`Error::Decode`]. Attachment stream failures are [`Error::Io`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use mandrill_client::{Client, Recipient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mandrill_client::Error> {
//!     let client = Client::builder("your-api-key")
//!         .from("noreply@example.com", "Example")
//!         .subaccount("customer-123")
//!         .build()?;
//!
//!     let results = client
//!         .send_message(
//!             Recipient::to("user@example.com", "User"),
//!             "Welcome aboard",
//!             "<p>Hello!</p>",
//!             &["welcome"],
//!         )
//!         .await?;
//!     for r in results {
//!         println!("{} -> {:?} ({})", r.email, r.status, r.id);
//!     }
//!     Ok(())
//! }
//! ```

mod attachment;
mod client;
mod error;
mod models;
mod request;
mod transport;

pub use attachment::{encode_attachment, mime_type_for};
pub use client::{BASE_URL, Client, ClientBuilder};
pub use error::Error;
pub use models::{
    ApiError, Attachment, Headers, MergeVar, Message, Metadata, Recipient, RecipientMergeVars,
    RecipientMetadata, RecipientMetadataValues, RecipientType, SendRequest, SendResponse,
    SendStatus,
};
pub use request::{SendOptions, encode_send_request};
pub use transport::decode_response;

/// Result type alias for Mandrill operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
