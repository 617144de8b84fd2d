//! Manual smoke test for the configured provider API key.
//!
//! Issues one direct chat-completion request to the upstream endpoint and
//! prints the status, reply and token usage, or a classified hint for the
//! common failure modes. Operator utility only; the served API does not
//! depend on it.
//!
//! Usage:
//!   export PROVIDER_API_KEY=sk-your-key-here
//!   cargo run -p upstream --bin upstream-check

use config::ProviderSettings;
use upstream::{extract_error_message, ChatCompletionParams, ChatCompletionResponse, ChatMessage};

#[tokio::main]
async fn main() {
    let settings = ProviderSettings::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    if !settings.has_usable_key() {
        eprintln!("No API key configured. Set PROVIDER_API_KEY and try again.");
        std::process::exit(1);
    }

    let key_preview: String = settings.api_key.chars().take(10).collect();
    println!("Testing {} connection...", settings.base_url);
    println!("Using API key: {key_preview}...");

    let params = ChatCompletionParams {
        model: settings.model.clone(),
        messages: vec![ChatMessage::user(
            "Hello! Please introduce yourself briefly.",
        )],
        max_tokens: Some(200),
        temperature: Some(0.7),
        stream: Some(false),
    };

    let url = format!("{}/chat/completions", settings.base_url);
    let client = reqwest::Client::new();

    let response = match client
        .post(&url)
        .bearer_auth(&settings.api_key)
        .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
        .json(&params)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Request failed: {e}");
            if e.is_connect() || e.is_timeout() {
                eprintln!("Hint: check your network connection");
            }
            std::process::exit(1);
        }
    };

    let status = response.status();
    println!("Response status: {status}");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        eprintln!("API call failed:");
        eprintln!("  status: {}", status.as_u16());
        eprintln!("  error: {}", extract_error_message(&body));

        match status.as_u16() {
            401 => eprintln!("Hint: check that your API key is correct"),
            402 => eprintln!("Hint: check your account balance"),
            429 => eprintln!("Hint: too many requests, try again later"),
            _ => {}
        }
        std::process::exit(1);
    }

    let completion: ChatCompletionResponse = match response.json().await {
        Ok(completion) => completion,
        Err(e) => {
            eprintln!("Failed to parse response: {e}");
            std::process::exit(1);
        }
    };

    println!("API call succeeded!");
    let reply = completion
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .unwrap_or("(no content)");
    println!("Reply: {reply}");

    if let Some(usage) = completion.usage {
        println!(
            "Token usage: prompt={} completion={} total={}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    println!("Done. The provider API is working.");
}
