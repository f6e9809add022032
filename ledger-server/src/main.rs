use ledger_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env (可选)
    let _ = dotenvy::dotenv();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 日志
    init_logger_with_file(config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        "Ledger server starting (env: {}, db: {})",
        config.environment,
        config.database_path
    );

    // 4. 启动 HTTP 服务器
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
