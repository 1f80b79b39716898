use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A chat-completion endpoint: one system prompt, one user message, one reply.
pub trait ChatBackend {
    fn chat(&self, system_prompt: &str, user_text: &str) -> anyhow::Result<String>;
}

#[derive(Clone, Debug)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct OllamaClient {
    cfg: OllamaConfig,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(cfg: OllamaConfig) -> anyhow::Result<Self> {
        // The endpoint is a model server on the local network; system proxies never apply.
        let client = reqwest::blocking::Client::builder()
            .timeout(cfg.timeout)
            .no_proxy()
            .build()
            .context("build http client")?;
        Ok(Self { cfg, client })
    }
}

impl ChatBackend for OllamaClient {
    fn chat(&self, system_prompt: &str, user_text: &str) -> anyhow::Result<String> {
        let req = ChatRequest {
            model: &self.cfg.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            stream: false,
        };
        debug!(url = %self.cfg.url, model = %self.cfg.model, "chat request");
        let resp: ChatResponse = self
            .client
            .post(&self.cfg.url)
            .json(&req)
            .send()
            .with_context(|| format!("post chat: {}", self.cfg.url))?
            .error_for_status()
            .context("chat endpoint status")?
            .json()
            .context("decode chat response")?;
        Ok(resp.message.content.trim().to_string())
    }
}

/// How a failed request should be reported to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatFailure {
    Timeout,
    Unreachable,
    Other,
}

impl ChatFailure {
    pub fn classify(err: &anyhow::Error) -> Self {
        let http = err
            .chain()
            .find_map(|e| e.downcast_ref::<reqwest::Error>());
        match http {
            Some(e) if e.is_timeout() => Self::Timeout,
            Some(e) if e.is_connect() => Self::Unreachable,
            _ => Self::Other,
        }
    }
}
