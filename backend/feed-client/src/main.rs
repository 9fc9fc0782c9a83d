use anyhow::Context;
use feed_client::{
    input, ClientConfig, ClientEvent, FeedClientController, FeedDriver, HttpFeedApi,
    TerminalRenderer,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they do not interleave with the feed on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,feed_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().map_err(anyhow::Error::msg)?;
    tracing::info!(api_url = %config.api_url, "starting feed client");

    let api = HttpFeedApi::new(&config).context("failed to build HTTP client")?;
    let renderer = TerminalRenderer::new(std::io::stdout());
    let controller =
        FeedClientController::new(renderer, config.page_size, config.form_restore_delay);
    let driver = FeedDriver::new(controller, Arc::new(api), config.search_max_pages);

    let events = driver.sender();
    events.send(ClientEvent::Start)?;

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match input::parse_line(&line) {
                    Some(event) => {
                        let quit = event == ClientEvent::Quit;
                        if events.send(event).is_err() || quit {
                            break;
                        }
                    }
                    None => eprintln!("{}", input::USAGE),
                },
                Ok(None) => {
                    let _ = events.send(ClientEvent::Quit);
                    break;
                }
                Err(e) => {
                    tracing::error!("failed to read stdin: {}", e);
                    let _ = events.send(ClientEvent::Quit);
                    break;
                }
            }
        }
    });

    driver.run().await;
    Ok(())
}
