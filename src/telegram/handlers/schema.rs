//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::callback::{route_action, PickerCallback};
use crate::telegram::messenger::{Messenger, TelegramMessenger};
use crate::telegram::search::handle_search;
use crate::telegram::texts;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Order matters: commands first, then free text, then button presses.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler())
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

/// `/start` and `/help` both print the usage text.
fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

            match cmd {
                Command::Start | Command::Help => {
                    TelegramMessenger::new(bot)
                        .send_text(msg.chat.id, texts::USAGE, None)
                        .await?;
                }
            }
            Ok(())
        },
    ))
}

/// Any other text message is a search query.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some_and(|text| !text.starts_with('/')))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default();
                let messenger = TelegramMessenger::new(bot);
                handle_search(&deps.store, deps.lyrics(), &messenger, msg.chat.id, text).await?;
                Ok(())
            }
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            let messenger = TelegramMessenger::new(bot);

            // Picker buttons only live on regular chat messages
            let Some(message) = q.message.as_ref() else {
                messenger.answer_callback(&q.id, None).await?;
                return Ok(());
            };

            let callback = PickerCallback {
                callback_id: &q.id,
                chat_id: message.chat().id,
                message_id: message.id(),
                data: q.data.as_deref().unwrap_or_default(),
            };
            let outcome = route_action(&deps.store, &deps.fulfillment, &messenger, callback).await?;
            log::debug!("Callback from chat {} → {:?}", message.chat().id, outcome);
            Ok(())
        }
    })
}
