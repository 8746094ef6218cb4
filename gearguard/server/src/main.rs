use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = gearguard_server::config::Config::from_env()?;
    let filter = EnvFilter::try_new(&config.log_level)
        .or_else(|_| EnvFilter::try_from_default_env())?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    gearguard_server::web::start_web_server(config).await
}
