use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::utils::logging::log_startup;

/// 应用主结构：云函数服务
pub struct App {
    config: Config,
    listener: TcpListener,
}

impl App {
    /// 初始化应用：打印配置并绑定端口
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let listener = TcpListener::bind(&config.server_addr)
            .await
            .with_context(|| format!("无法监听 {}", config.server_addr))?;

        Ok(Self { config, listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 运行直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let addr = self.local_addr()?;
        let router = api::router(AppState::new(&self.config));

        info!("✓ 云函数服务已启动: http://{}", addr);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到退出信号，正在停止服务...");
    }
}
