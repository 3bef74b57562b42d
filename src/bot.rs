//! Chat handlers, independent of any particular chat platform.

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

use crate::feedback::FeedbackRequester;
use crate::mode;
use crate::model_gateway::CompletionGateway;

pub const WELCOME_MESSAGE: &str = "Hi! I’m your AI English teacher 🧠\n\n\
Send me any English sentence, and I’ll check it for clarity and correctness.\n\n\
👉 For **Australian English** feedback, add `#au` or `/au` at the end:\n\
_Example: “I seen him at the servo. #au”_\n\n\
Let’s improve your English together! 💬";

pub const EMPTY_INPUT_REPLY: &str =
    "Please send a message to check! Add `#au` for Australian English feedback.";

pub type PlatformFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// The outbound operations the handlers need from a chat platform.
pub trait ChatPlatform {
    fn send_markdown<'a>(&'a self, chat_id: i64, text: &'a str) -> PlatformFuture<'a>;
    fn send_typing<'a>(&'a self, chat_id: i64) -> PlatformFuture<'a>;
}

pub async fn handle_start<P>(platform: &P, chat_id: i64) -> Result<()>
where
    P: ChatPlatform,
{
    info!(chat_id, "sending welcome message");
    platform.send_markdown(chat_id, WELCOME_MESSAGE).await
}

pub async fn handle_text<P, G>(
    platform: &P,
    requester: &FeedbackRequester<G>,
    chat_id: i64,
    raw: &str,
) -> Result<()>
where
    P: ChatPlatform,
    G: CompletionGateway,
{
    let input = mode::detect(raw);
    if input.is_empty() {
        info!(chat_id, "empty message after cleaning");
        return platform.send_markdown(chat_id, EMPTY_INPUT_REPLY).await;
    }

    info!(
        chat_id,
        mode = input.mode.as_str(),
        input_len = input.text.len(),
        "requesting feedback"
    );
    if let Err(err) = platform.send_typing(chat_id).await {
        warn!(chat_id, error = %format!("{err:#}"), "failed to send typing indicator");
    }

    let reply = requester.request(&input.text, input.mode).await;
    platform.send_markdown(chat_id, &reply).await
}
