use piyasa_bot::{
    api, constants,
    telegram::{run_polling, TelegramClient},
    AnswerComposer, AppConfig, Dispatcher, LlmState, MarketDataClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Setup Logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Piyasa Bot...");

    // Load Configuration
    let config = AppConfig::load()?;
    info!("Loaded Configuration: {:?}", config);

    let Some(token) = config.telegram.bot_token.clone() else {
        error!(
            "{} not found. Check your .env file.",
            constants::env::TELEGRAM_BOT_TOKEN
        );
        return Ok(());
    };

    // One completion client for the whole process; a failure here is final
    let llm = LlmState::from_config(&config.llm);

    let market = MarketDataClient::new(&config.data)?;
    info!("Market data endpoint: {}", market.url());

    let telegram = TelegramClient::new(&token, &config.telegram)?;
    let me = telegram.get_me().await?;
    info!(
        "🤖 Logged in as @{}",
        me.username.as_deref().unwrap_or(&me.first_name)
    );

    let dispatcher = Arc::new(
        Dispatcher::new(Arc::new(market), AnswerComposer::new(llm)).with_bot_username(me.username),
    );

    if config.http.enabled {
        let addr: SocketAddr = config.http.bind.parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            if let Err(e) = api::serve(listener, dispatcher).await {
                warn!("⚠️ API server stopped: {}", e);
            }
        });
    }

    info!("Bot starting...");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Ctrl-C received, shutting down");
    };

    run_polling(telegram, dispatcher, &config.telegram, shutdown).await?;

    Ok(())
}
