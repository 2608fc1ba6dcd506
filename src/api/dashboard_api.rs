// ==========================================
// SOFEM-CI 生产录入 - 驾驶舱 API
// ==========================================
// 职责: 拉取实时指标并渲染为展示文本；按固定间隔轮询
// 约束: 轮询失败只记录日志,不重试、不退避
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveTime};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::backend::{DashboardMetrics, ProductionBackend};
use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, HostConfig};
use crate::engine::metrics::format_metric;

// ==========================================
// DashboardView - 驾驶舱展示
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    /// 一位小数
    pub production_totale: String,
    /// "在线/总数"
    pub machines: String,
    /// "HH:MM:SS"
    pub last_update: String,
}

fn format_count(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl DashboardView {
    pub fn render(metrics: &DashboardMetrics, fleet_size: u32, at: NaiveTime) -> Self {
        // 后端给出 0 或缺失时使用配置的机台总数
        let total = metrics
            .machines_total
            .filter(|t| *t != 0.0)
            .unwrap_or(f64::from(fleet_size));
        Self {
            production_totale: format_metric(metrics.production_totale),
            machines: format!(
                "{}/{}",
                format_count(metrics.machines_actives),
                format_count(total)
            ),
            last_update: at.format("%H:%M:%S").to_string(),
        }
    }
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    config: Arc<HostConfig>,
    backend: Arc<dyn ProductionBackend>,
}

impl DashboardApi {
    pub fn new(config: Arc<HostConfig>, backend: Arc<dyn ProductionBackend>) -> Self {
        Self { config, backend }
    }

    /// 驾驶舱数据地址
    pub fn endpoint(&self) -> ApiResult<String> {
        let path = self
            .config
            .url(config_keys::API_DASHBOARD)
            .ok_or_else(|| ApiError::MissingEndpoint(config_keys::API_DASHBOARD.to_string()))?;
        Ok(self.config.resolve_url(path)?)
    }

    pub async fn refresh(&self) -> ApiResult<DashboardView> {
        let url = self.endpoint()?;
        let metrics = self.backend.fetch_dashboard(&url).await?;
        Ok(DashboardView::render(
            &metrics,
            self.config.settings.machines_total_default,
            Local::now().time(),
        ))
    }
}

// ==========================================
// DashboardPoller - 定时轮询
// ==========================================
pub struct DashboardPoller;

impl DashboardPoller {
    /// 启动轮询任务
    ///
    /// 立即刷新一次,之后每 interval 刷新一次；最新结果通过 watch 通道发布。
    /// 未配置驾驶舱地址时任务直接结束。停止轮询: abort 返回的句柄。
    pub fn spawn(
        api: Arc<DashboardApi>,
        interval: Duration,
    ) -> (JoinHandle<()>, watch::Receiver<Option<DashboardView>>) {
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(async move {
            if let Err(e) = api.endpoint() {
                tracing::warn!(error = %e, "未配置驾驶舱地址,不启动轮询");
                return;
            }

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match api.refresh().await {
                    Ok(view) => {
                        if tx.send(Some(view)).is_err() {
                            tracing::debug!("驾驶舱订阅者已全部关闭,停止轮询");
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "驾驶舱刷新失败,等待下一次轮询"),
                }
            }
        });

        (handle, rx)
    }
}
