use anyhow::Result;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::model::CompletionRequest;
use crate::providers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub content: String,
}

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse>> + Send + 'a>>;

pub trait CompletionGateway {
    fn complete<'a>(&'a self, request: CompletionRequest) -> CompletionFuture<'a>;
}

/// Gateway backed by the configured HTTP completion endpoint.
pub struct HostCompletionGateway<'a> {
    client: &'a Client,
    cfg: &'a Config,
}

impl<'a> HostCompletionGateway<'a> {
    pub fn new(client: &'a Client, cfg: &'a Config) -> Self {
        Self { client, cfg }
    }
}

impl CompletionGateway for HostCompletionGateway<'_> {
    fn complete<'b>(&'b self, request: CompletionRequest) -> CompletionFuture<'b> {
        Box::pin(async move {
            let content = providers::deepseek::chat(self.client, self.cfg, &request).await?;
            Ok(CompletionResponse { content })
        })
    }
}
