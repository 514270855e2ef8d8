use mandrill_client::{Client, Recipient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("MANDRILL_API_KEY")?;
    let to = std::env::var("MANDRILL_TO")?;

    let client = Client::builder(api_key)
        .from("noreply@example.com", "Mandrill Demo")
        .build()?;

    let results = client
        .send_message(
            Recipient::to(to, ""),
            "Test Subject",
            "<p>Hello!</p>",
            &["demo"],
        )
        .await?;

    for r in results {
        println!("{} -> {:?} ({})", r.email, r.status, r.id);
        if let Some(reason) = r.reject_reason {
            println!("  rejected: {reason}");
        }
    }

    Ok(())
}
