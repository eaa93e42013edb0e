//! Client commands that talk to a running server.

use anyhow::{Context, Result};
use serde_json::{json, Value};

fn base_url(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// `prinix ask "<message>"`: post one utterance and print the JSON reply.
pub async fn ask(port: u16, message: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/ask", base_url(port)))
        .json(&json!({ "message": message }))
        .send()
        .await
        .with_context(|| format!("PRINIX is not running on port {port}"))?;

    let body: Value = resp.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// `prinix status`: print the server's health report.
pub async fn status(port: u16) -> Result<()> {
    println!("PRINIX status: checking...");
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/health", base_url(port)))
        .send()
        .await
    {
        Ok(resp) => {
            let body: Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("PRINIX is not running on port {port}");
        }
    }
    Ok(())
}
