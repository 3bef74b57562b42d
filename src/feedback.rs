use tracing::{error, info};

use crate::mode::FeedbackMode;
use crate::model::CompletionRequest;
use crate::model_gateway::CompletionGateway;

/// Shown for every upstream failure, whatever the cause.
pub const FALLBACK_REPLY: &str =
    "❌ Sorry, I couldn’t process your message right now. Please try again later.";

pub struct FeedbackRequester<G> {
    gateway: G,
}

impl<G> FeedbackRequester<G>
where
    G: CompletionGateway,
{
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Asks the model for feedback on `text`. `text` must already be cleaned
    /// and non-empty. Never fails: upstream errors become [`FALLBACK_REPLY`].
    pub async fn request(&self, text: &str, mode: FeedbackMode) -> String {
        let request = CompletionRequest::feedback(mode, text);

        match self.gateway.complete(request).await {
            Ok(response) => {
                let reply = response.content.trim();
                info!(
                    mode = mode.as_str(),
                    input_len = text.len(),
                    reply_len = reply.len(),
                    "feedback ready"
                );
                reply.to_string()
            }
            Err(err) => {
                error!(
                    mode = mode.as_str(),
                    error = %format!("{err:#}"),
                    "completion API error"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
