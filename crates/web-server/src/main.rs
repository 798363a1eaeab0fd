use anyhow::Context;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings, sets up logging and hands over to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = configuration::load_settings().context("failed to load settings")?;
    let _guard = configuration::init_tracing(&settings.logging)?;

    web_server::run_server(&settings.bind_address(), settings.forecast.default_horizon).await
}
