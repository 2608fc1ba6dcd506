// ==========================================
// SOFEM-CI 生产录入 - 命令行入口
// ==========================================
// 无界面运行: 加载宿主配置,轮询驾驶舱并输出到日志,Ctrl-C 退出
// ==========================================

use std::sync::Arc;

use anyhow::Context;

use sofemci_saisie::api::DashboardPoller;
use sofemci_saisie::app::{AppState, StaticPrompt};
use sofemci_saisie::config::HostConfig;
use sofemci_saisie::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", sofemci_saisie::APP_NAME);
    tracing::info!("系统版本: {}", sofemci_saisie::VERSION);
    tracing::info!("==================================================");

    let config = HostConfig::load().context("加载宿主配置失败")?;
    tracing::info!(
        base_url = %config.base_url,
        role = %config.user.role,
        locale = %config.locale,
        "宿主配置已加载"
    );

    // 无界面时不会有人确认提交
    let state = AppState::new(config, Arc::new(StaticPrompt::new(false)))
        .context("初始化应用状态失败")?;

    let (handle, mut views) = DashboardPoller::spawn(
        Arc::clone(&state.dashboard_api),
        state.config.settings.poll_interval(),
    );

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    tracing::warn!("驾驶舱轮询已结束");
                    break;
                }
                if let Some(view) = views.borrow_and_update().clone() {
                    tracing::info!(
                        production = %view.production_totale,
                        machines = %view.machines,
                        at = %view.last_update,
                        "驾驶舱已更新"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("收到退出信号");
                break;
            }
        }
    }

    handle.abort();
    Ok(())
}
