use anyhow::anyhow;
use conversa::bot::dialogue::{Dialogue, InMemStorage, Session};
use conversa::bot::ui::{choices_menu, split_message, MAX_MESSAGE_CHARS};
use conversa::core::grading::{LlmGrader, OfflineGrader};
use conversa::core::machine::{DialogueMachine, Input, Outcome};
use conversa::core::prompts::CatalogPromptSource;
use conversa::core::services::GradingService;
use conversa::infrastructure::config::{log_dir_from_env, Config};
use conversa::infrastructure::logging::init_logging;
use dotenv::dotenv;
use std::sync::Arc;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "Choose a language and level and get a writing prompt.")]
    Start,
    #[command(description = "Stop the current writing session.")]
    Cancel,
    #[command(description = "Show the available commands.")]
    Help,
    #[command(description = "Learn more about Conversa.")]
    About,
}

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let (config, _guard) = match Config::from_env() {
        Ok(config) => {
            let guard = init_logging(&config.log_dir);
            (config, guard)
        }
        Err(e) => {
            let guard = init_logging(&log_dir_from_env());
            log::error!("Invalid configuration: {}", e);
            drop(guard);
            std::process::exit(1);
        }
    };
    log::info!("Starting Conversa...");

    let grader: Arc<dyn GradingService> = match &config.grader {
        Some(grader) => {
            log::info!("Grading with model {} at {}", grader.model, grader.base_url);
            Arc::new(LlmGrader::new(
                grader.api_key.clone(),
                &grader.base_url,
                grader.model.clone(),
            ))
        }
        None => {
            log::warn!("OPENAI_API_KEY not set, falling back to offline grading");
            Arc::new(OfflineGrader)
        }
    };
    let machine = Arc::new(DialogueMachine::new(
        Arc::new(CatalogPromptSource::new()),
        grader,
        config.service_timeout,
    ));

    let bot = Bot::from_env();
    bot.set_my_commands(Command::bot_commands())
        .await
        .expect("Failed to set commands");

    let message_handler_chain = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<Session>, Session>()
        .branch(dptree::entry().filter_command::<Command>().endpoint(command_handler))
        .branch(dptree::entry().endpoint(message_handler));

    let callback_handler_chain = Update::filter_callback_query()
        .enter_dialogue::<CallbackQuery, InMemStorage<Session>, Session>()
        .endpoint(callback_handler);

    let schema = dptree::entry()
        .branch(message_handler_chain)
        .branch(callback_handler_chain);

    Dispatcher::builder(bot, schema)
        .dependencies(dptree::deps![InMemStorage::<Session>::new(), machine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn command_handler(
    bot: Bot,
    dialogue: Dialogue,
    msg: Message,
    cmd: Command,
    machine: Arc<DialogueMachine>,
) -> HandlerResult {
    let input = match cmd {
        Command::Start => Input::Start,
        Command::Cancel => Input::Cancel,
        Command::Help => Input::Help,
        Command::About => Input::About,
    };
    let first_name = msg.from().map(|user| user.first_name.clone());
    let outcome = machine.handle(&dialogue, input, first_name.as_deref()).await?;
    send_outcome(&bot, msg.chat.id, outcome).await
}

async fn message_handler(
    bot: Bot,
    dialogue: Dialogue,
    msg: Message,
    machine: Arc<DialogueMachine>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "ℹ️ I can only read text messages.").await?;
        return Ok(());
    };

    if text.starts_with('/') {
        log::debug!("Unknown command from {}: {}", msg.chat.id, text);
        bot.send_message(msg.chat.id, Command::descriptions().to_string())
            .await?;
        return Ok(());
    }

    let first_name = msg.from().map(|user| user.first_name.clone());
    let outcome = machine
        .handle(&dialogue, Input::Text(text.to_string()), first_name.as_deref())
        .await?;
    send_outcome(&bot, msg.chat.id, outcome).await
}

async fn callback_handler(
    bot: Bot,
    dialogue: Dialogue,
    q: CallbackQuery,
    machine: Arc<DialogueMachine>,
) -> HandlerResult {
    bot.answer_callback_query(q.id).await?;
    let msg = q.message.ok_or_else(|| anyhow!("Callback query has no message"))?;

    if let Some(data) = q.data {
        let outcome = machine
            .handle(&dialogue, Input::Text(data), Some(q.from.first_name.as_str()))
            .await?;
        send_outcome(&bot, msg.chat.id, outcome).await?;
    }
    Ok(())
}

/// Sends the reply in as many messages as Telegram's length limit needs; the
/// choices keyboard goes on the last one.
async fn send_outcome(bot: &Bot, chat_id: ChatId, outcome: Outcome) -> HandlerResult {
    let reply = outcome.reply;
    let mut chunks = split_message(&reply.text, MAX_MESSAGE_CHARS);
    let last = chunks.pop().unwrap_or_default();

    for chunk in chunks {
        bot.send_message(chat_id, chunk).await?;
    }
    match reply.choices {
        Some(choices) => {
            bot.send_message(chat_id, last)
                .reply_markup(choices_menu(&choices))
                .await?
        }
        None => bot.send_message(chat_id, last).await?,
    };
    Ok(())
}
