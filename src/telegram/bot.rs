//! teloxide dispatcher and update mapping.

use std::sync::Arc;

use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::{debug, error, info};

use crate::dialogue::{CallbackAction, DialogueHandler, Event, Keyboard, Reply};
use crate::storage::StoreError;
use crate::weather::WeatherProvider;

/// Registers the discoverable commands and runs the long-polling
/// dispatcher until interrupted.
///
/// # Errors
///
/// Returns an error if command registration fails.
pub async fn run<W>(bot: Bot, dialogue: Arc<DialogueHandler<W>>) -> anyhow::Result<()>
where
    W: WeatherProvider + Send + Sync + 'static,
{
    bot.set_my_commands(vec![BotCommand::new("profile", "Переглянути профіль")])
        .await?;

    info!("Bot is running. Use Ctrl+C to stop.");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message::<W>))
        .branch(Update::filter_callback_query().endpoint(on_callback::<W>));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dialogue])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Handles an inbound chat message.
async fn on_message<W>(
    bot: Bot,
    msg: Message,
    dialogue: Arc<DialogueHandler<W>>,
) -> ResponseResult<()>
where
    W: WeatherProvider + Send + Sync + 'static,
{
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let user_id = user.id.to_string();
    let event = Event::parse_message(text);
    deliver(&bot, msg.chat.id, dialogue.handle(&user_id, event).await).await
}

/// Handles an inline keyboard tap.
async fn on_callback<W>(
    bot: Bot,
    query: CallbackQuery,
    dialogue: Arc<DialogueHandler<W>>,
) -> ResponseResult<()>
where
    W: WeatherProvider + Send + Sync + 'static,
{
    let user_id = query.from.id.to_string();
    let chat_id = query.message.as_ref().map(|message| message.chat().id);

    if let (Some(data), Some(chat_id)) = (query.data.as_deref(), chat_id) {
        match CallbackAction::parse(data) {
            Some(action) => {
                let result = dialogue.handle(&user_id, Event::Callback(action)).await;
                deliver(&bot, chat_id, result).await?;
            }
            None => debug!("Ignoring unknown callback payload: {:?}", data),
        }
    }

    // Always answer so the client stops showing the loading indicator.
    bot.answer_callback_query(query.id).await?;
    Ok(())
}

/// Sends the controller's reply, or logs a store failure without
/// aborting the dispatch loop.
async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    result: Result<Reply, StoreError>,
) -> ResponseResult<()> {
    match result {
        Ok(reply) => {
            for message in reply.messages {
                let request = bot.send_message(chat_id, message.text);
                match message.keyboard {
                    Some(keyboard) => request.reply_markup(to_markup(&keyboard)).await?,
                    None => request.await?,
                };
            }
        }
        Err(e) => error!("Event handling failed: {}", e),
    }
    Ok(())
}

/// Converts a transport-neutral keyboard into Bot API markup.
fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.action.to_string())
            })
            .collect::<Vec<_>>()
    }))
}
