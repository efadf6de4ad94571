use anyhow::{Context, Result, bail};
use pagesense::{config::Config, pipeline::ContentService, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let Some(url) = std::env::args().nth(1) else {
        bail!("usage: pagesense <url>");
    };

    let config = Config::from_env()?;
    let service = ContentService::new(config).context("failed to build inference client")?;

    let result = service.process_website(&url).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
