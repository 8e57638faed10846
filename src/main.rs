use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hungrybot::bot::{self, BotIdentity, FoodBot, TelegramTransport};
use hungrybot::config::{Config, LogFormat};
use hungrybot::search::YelpClient;
use hungrybot::server;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());
    let config = config.context("Invalid configuration")?;

    info!("Starting Hungrybot");

    // HTTP site
    let listener = server::bind(config.http_addr()).await?;
    let app = server::create_app(&config.static_dir);
    let http_server = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, app).await {
            error!(error = %e, "HTTP server stopped");
        }
    });

    // Telegram connection; failing to reach the Bot API is fatal
    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await.context("Failed to connect to Telegram")?;
    let identity = BotIdentity::new(me.username());
    info!(username = %identity.username, "Connected to Telegram");

    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let search = Arc::new(YelpClient::new(
        config.yelp_api_key.clone(),
        config.yelp_api_url.clone(),
    ));
    let food_bot = Arc::new(FoodBot::new(transport, search));

    let handler = dptree::entry().branch(Update::filter_message().endpoint(bot::message_handler));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![food_bot, identity])
        .enable_ctrlc_handler()
        .build();

    match config.webhook_url.clone() {
        Some(url) => {
            info!(port = config.webhook_port, %url, "Receiving updates through webhook");
            let update_listener = webhooks::axum(bot, webhooks::Options::new(config.webhook_addr(), url))
                .await
                .context("Failed to set up webhook listener")?;
            dispatcher
                .dispatch_with_listener(
                    update_listener,
                    LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
                )
                .await;
        }
        None => {
            info!("Receiving updates through long polling");
            dispatcher.dispatch().await;
        }
    }

    http_server.abort();
    info!("Hungrybot stopped");

    Ok(())
}
