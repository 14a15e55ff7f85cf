use crate::config::config;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let config = config();
    tracing::info!("Starting Gigboard API in {:?} mode", config.environment);
    crate::server::serve(config, port).await
}
