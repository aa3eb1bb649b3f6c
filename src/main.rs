//! Learning Companion - AI 学习助手 API 服务

use std::sync::Arc;
use std::time::Duration;

use learning_companion::config::{load_config, print_config, LogConfig};
use learning_companion::infrastructure::http::{AppState, HttpServer};
use learning_companion::infrastructure::memory::InMemoryRateLimitStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：PORT/NODE_ENV/FRONTEND_URL > LEARNING_* > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);
    install_panic_hook();

    tracing::info!("Learning Companion API");
    print_config(&config);

    let store = Arc::new(InMemoryRateLimitStore::new());
    let state = AppState::new(&config, store);
    let server = HttpServer::new(config.server.clone(), state);

    // 定期清理过期的限流窗口；该任务退出时服务随之停止
    let purge_state = server.state();
    let purge_every = Duration::from_secs(config.rate_limit.window_secs);
    let purge_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_every);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = purge_state.rate_limiter.purge_expired();
            tracing::debug!(purged, "Purged expired rate limit windows");
        }
    });

    if let Err(e) = server.run_supervised(shutdown_signal(), purge_task).await {
        tracing::error!("Server stopped: {}", e);
        return Err(e);
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},learning_companion={},tower_http=debug",
        log.level, log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 所有 panic 先经 tracing 记录，再交给默认 hook
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("Panic: {}", info);
        default_hook(info);
    }));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
