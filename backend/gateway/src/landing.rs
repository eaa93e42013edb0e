//! Landing page.

use axum::{extract::State, response::Html};
use tracing::debug;

use crate::server::AppState;

const BUILTIN_INDEX: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>PRINIX</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <div id="chatArea"></div>
  <input id="userInput" placeholder="Ask me anything..." autofocus>
  <button id="sendBtn">Send</button>
  <script src="/static/app.js"></script>
</body>
</html>
"#;

/// `GET /` serves `<template_dir>/index.html`, or a minimal built-in page.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let path = state.template_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Using built-in landing page");
            Html(BUILTIN_INDEX.to_string())
        }
    }
}
