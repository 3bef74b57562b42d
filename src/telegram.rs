//! Telegram front end using teloxide.

use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;
use teloxide::dispatching::HandlerExt;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};
use tracing::{debug, info, warn};

use crate::bot::{ChatPlatform, PlatformFuture, handle_start, handle_text};
use crate::config::Config;
use crate::feedback::FeedbackRequester;
use crate::model_gateway::HostCompletionGateway;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show how to use the bot.")]
    Start,
    #[command(description = "show how to use the bot.")]
    Help,
}

/// Read-only state shared by every update handler.
pub struct BotState {
    cfg: Config,
    client: Client,
}

pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    #[allow(deprecated)]
    async fn send_markdown_or_plain(&self, chat_id: i64, text: &str) -> Result<()> {
        let sent = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Markdown)
            .await;

        match sent {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::CantParseEntities(reason))) => {
                warn!(
                    chat_id,
                    reason = %reason,
                    "telegram rejected markdown, resending as plain text"
                );
                self.bot.send_message(ChatId(chat_id), text).await?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl ChatPlatform for TelegramPlatform {
    fn send_markdown<'a>(&'a self, chat_id: i64, text: &'a str) -> PlatformFuture<'a> {
        Box::pin(self.send_markdown_or_plain(chat_id, text))
    }

    fn send_typing<'a>(&'a self, chat_id: i64) -> PlatformFuture<'a> {
        Box::pin(async move {
            self.bot
                .send_chat_action(ChatId(chat_id), ChatAction::Typing)
                .await?;
            Ok(())
        })
    }
}

pub async fn run_bot(cfg: Config, client: Client) -> Result<()> {
    let bot = Bot::new(&cfg.telegram_bot_token);

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %err, "failed to register bot commands");
    }

    let state = Arc::new(BotState { cfg, client });
    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::endpoint(handle_message));

    info!("bot is running");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("bot stopped");
    Ok(())
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    let platform = TelegramPlatform::new(bot);
    let chat_id = msg.chat.id.0;

    match cmd {
        Command::Start | Command::Help => {
            if let Err(err) = handle_start(&platform, chat_id).await {
                warn!(chat_id, error = %format!("{err:#}"), "failed to send welcome message");
            }
        }
    }

    Ok(())
}

/// True for a leading bot command (`/name` or `/name@bot`) other than the
/// mode marker, which still goes to the text handler.
fn is_unhandled_command(text: &str) -> bool {
    let Some(rest) = text.trim_start().strip_prefix('/') else {
        return false;
    };
    let token = rest.split(char::is_whitespace).next().unwrap_or_default();
    let name = token.split('@').next().unwrap_or_default();

    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.eq_ignore_ascii_case("au")
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id.0;
    if is_unhandled_command(text) {
        debug!(chat_id, "ignoring unsupported command");
        return Ok(());
    }

    let platform = TelegramPlatform::new(bot);
    let requester = FeedbackRequester::new(HostCompletionGateway::new(&state.client, &state.cfg));
    if let Err(err) = handle_text(&platform, &requester, chat_id, text).await {
        warn!(chat_id, error = %format!("{err:#}"), "failed to reply to message");
    }

    Ok(())
}
