//! Authentication server binary.
//!
//! Reads settings from the environment (and `.env`), then serves the
//! `/auth` API on HOST:PORT until interrupted.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    turnstile_core::log()?;
    let settings = turnstile_core::Settings::load()?;
    log::info!("settings loaded");
    turnstile_server::run(settings).await?;
    Ok(())
}
