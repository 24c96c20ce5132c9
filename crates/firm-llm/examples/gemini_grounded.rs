//! Grounded, schema-constrained completion against Gemini
//!
//! This example shows how to:
//! - Configure the Gemini provider (API base, timeout)
//! - Turn on Google Search grounding
//! - Constrain the reply to a JSON schema
//! - Read the grounding sources
//!
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//! cargo run -p firm-llm --example gemini_grounded
//! ```

use firm_llm::providers::{GeminiConfig, GeminiProvider};
use firm_llm::{CompletionRequest, LLMProvider, Message, ResponseFormat, schema};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider = GeminiProvider::with_config(GeminiConfig::from_env()?.with_timeout(120))?;
    println!("Endpoint base: {}", provider.config().api_base);
    println!("Config: {:?}\n", provider.config());

    let quote = schema::object(
        json!({
            "company": schema::string(),
            "fiscalYear": schema::string(),
            "revenue": schema::described(schema::number(), "Annual revenue in millions"),
        }),
        &["company", "fiscalYear", "revenue"],
    );

    let request = CompletionRequest::builder("gemini-2.5-flash")
        .system("Answer with figures from the latest annual report.")
        .add_message(Message::user("What was Microsoft's revenue last fiscal year?"))
        .search_grounding(true)
        .response_format(ResponseFormat::json(quote))
        .build();

    let response = provider.complete(request).await?;

    println!("Reply: {}", response.message.text().unwrap_or("<empty>"));
    println!("Stop reason: {:?}", response.stop_reason);
    println!("Tokens: {}", response.usage.total());
    for source in &response.grounding_sources {
        println!(
            "  - {} {}",
            source.uri,
            source.title.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}
