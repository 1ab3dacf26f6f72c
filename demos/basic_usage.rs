//! Basic usage example.
//!
//! Fetches the current user and lists service categories through the
//! normalized envelope, branching on the outcome instead of catching errors.
//!
//! Usage:
//!   LUMORA_API_URL="https://api.lumora.app/v1" cargo run --example basic_usage

use lumora_client::ApiClient;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("LUMORA_API_URL")
        .unwrap_or_else(|_| "https://api.lumora.app/v1".to_string());

    let client = ApiClient::builder().base_url(base_url).build()?;

    let user = client.get::<Value>("/user/current-user", None).await;
    if user.is_success() {
        println!("Current user: {:?}", user.data());
    } else {
        // No exception to catch: the failure is data.
        println!(
            "Could not load user ({}): {}",
            user.status(),
            user.message()
        );
    }

    let categories = client.get::<Vec<Value>>("/catalog/categories", None).await;
    println!(
        "Categories: {} ({} entries)",
        categories.message(),
        categories.data().map(Vec::len).unwrap_or(0)
    );

    Ok(())
}
