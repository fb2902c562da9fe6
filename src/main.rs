#[tokio::main]
async fn main() -> teleseek::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("teleseek=info,teloxide=warn"),
    )
    .init();
    log::info!("Starting teleseek Telegram bot");

    match teleseek::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {e}");
            Err(e)
        }
    }
}
