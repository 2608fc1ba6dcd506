// ==========================================
// SOFEM-CI 生产录入 - 通知与加载层
// ==========================================
// 职责: 全局加载遮罩 + 横幅提示
// 约束: 提示容器首次使用时才创建；按插入顺序展示
//       每条提示独立计时,到期自动移除
// ==========================================

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::types::AlertLevel;

pub type AlertId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub id: AlertId,
    pub level: AlertLevel,
    pub message: String,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Default)]
struct Surface {
    /// None 表示容器尚未创建
    container: Option<Vec<Alert>>,
    loader: Option<String>,
    /// 尚未结束的 show_loader 调用数
    loader_depth: usize,
}

// ==========================================
// NotificationCenter - 通知中心
// ==========================================
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Surface>>,
    alert_ttl: Duration,
}

fn lock(inner: &Mutex<Surface>) -> MutexGuard<'_, Surface> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn remove_alert(inner: &Mutex<Surface>, id: AlertId) -> bool {
    let mut surface = lock(inner);
    match surface.container.as_mut() {
        Some(alerts) => {
            let before = alerts.len();
            alerts.retain(|a| a.id != id);
            alerts.len() != before
        }
        None => false,
    }
}

impl NotificationCenter {
    pub fn new(alert_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Surface::default())),
            alert_ttl,
        }
    }

    // ==========================================
    // 加载遮罩
    // ==========================================

    /// 显示遮罩；多次调用需对应同样次数的 hide_loader
    pub fn show_loader(&self, message: impl Into<String>) {
        let mut surface = lock(&self.inner);
        surface.loader_depth += 1;
        surface.loader = Some(message.into());
    }

    /// 最后一个持有者结束时才真正隐藏
    pub fn hide_loader(&self) {
        let mut surface = lock(&self.inner);
        surface.loader_depth = surface.loader_depth.saturating_sub(1);
        if surface.loader_depth == 0 {
            surface.loader = None;
        }
    }

    pub fn loader(&self) -> Option<String> {
        lock(&self.inner).loader.clone()
    }

    /// 在加载遮罩下执行 future
    ///
    /// 遮罩至少显示 min_display；future 完成且最短时间到达后隐藏。
    /// 并发调用共享同一遮罩,全部结束后才隐藏；被取消时同样释放。
    pub async fn with_loader<F>(&self, message: impl Into<String>, min_display: Duration, fut: F) -> F::Output
    where
        F: Future,
    {
        self.show_loader(message);
        let _shown = LoaderHold(self);
        let (output, _) = futures::future::join(fut, tokio::time::sleep(min_display)).await;
        output
    }

    // ==========================================
    // 横幅提示
    // ==========================================

    /// 显示一条提示,返回其 id
    ///
    /// 在 tokio 运行时内调用时,提示在 alert_ttl 后自动移除；
    /// 运行时外调用则只能手动 dismiss。
    pub fn show_alert(&self, level: AlertLevel, message: impl Into<String>) -> AlertId {
        let alert = Alert {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Local::now(),
        };
        let id = alert.id;

        match level {
            AlertLevel::Error => tracing::warn!(alert_id = %id, "{}", alert.message),
            _ => tracing::info!(alert_id = %id, level = %level, "{}", alert.message),
        }

        lock(&self.inner)
            .container
            .get_or_insert_with(Vec::new)
            .push(alert);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = Arc::clone(&self.inner);
                let ttl = self.alert_ttl;
                handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    if remove_alert(&inner, id) {
                        tracing::trace!(alert_id = %id, "提示已过期");
                    }
                });
            }
            Err(_) => tracing::debug!(alert_id = %id, "无运行时,提示不会自动过期"),
        }

        id
    }

    /// 手动关闭提示
    pub fn dismiss(&self, id: AlertId) -> bool {
        remove_alert(&self.inner, id)
    }

    /// 当前提示快照（按插入顺序）
    pub fn alerts(&self) -> Vec<Alert> {
        lock(&self.inner).container.clone().unwrap_or_default()
    }

    pub fn has_container(&self) -> bool {
        lock(&self.inner).container.is_some()
    }
}

/// with_loader 期间持有,drop 时调用 hide_loader
struct LoaderHold<'a>(&'a NotificationCenter);

impl Drop for LoaderHold<'_> {
    fn drop(&mut self) {
        self.0.hide_loader();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_created_lazily() {
        let center = NotificationCenter::new(Duration::from_secs(5));
        assert!(!center.has_container());
        assert!(center.alerts().is_empty());

        let id = center.show_alert(AlertLevel::Info, "bonjour");
        assert!(center.has_container());
        assert_eq!(center.alerts().len(), 1);

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        // 容器保留
        assert!(center.has_container());
    }

    #[tokio::test(start_paused = true)]
    async fn test_alerts_expire_independently() {
        let center = NotificationCenter::new(Duration::from_secs(5));
        center.show_alert(AlertLevel::Success, "premier");

        tokio::time::sleep(Duration::from_secs(3)).await;
        center.show_alert(AlertLevel::Error, "second");
        let messages: Vec<String> = center.alerts().into_iter().map(|a| a.message).collect();
        assert_eq!(messages, vec!["premier", "second"]);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let remaining = center.alerts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "second");
        assert_eq!(remaining[0].level, AlertLevel::Error);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(center.alerts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_loader_respects_min_display() {
        let center = NotificationCenter::new(Duration::from_secs(5));
        let start = tokio::time::Instant::now();

        let observer = center.clone();
        let value = center
            .with_loader("Traitement en cours...", Duration::from_millis(500), async move {
                assert_eq!(observer.loader().as_deref(), Some("Traitement en cours..."));
                42
            })
            .await;

        assert_eq!(value, 42);
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(center.loader(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_loaders_hide_after_last() {
        let center = NotificationCenter::new(Duration::from_secs(5));

        let short = center.with_loader("Extrusion...", Duration::ZERO, async {
            tokio::time::sleep(Duration::from_millis(100)).await;
        });
        let long = center.with_loader("Imprimerie...", Duration::ZERO, async {
            tokio::time::sleep(Duration::from_millis(300)).await;
        });
        let watch = async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            // 第一笔已结束,第二笔仍在进行
            assert!(center.loader().is_some());
            tokio::time::sleep(Duration::from_millis(200)).await;
            assert_eq!(center.loader(), None);
        };
        tokio::join!(short, long, watch);

        // 计数归零后可重新显示
        center.show_loader("Traitement en cours...");
        center.hide_loader();
        center.hide_loader();
        assert_eq!(center.loader(), None);
        center.show_loader("Traitement en cours...");
        assert!(center.loader().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_loader_is_released() {
        let center = NotificationCenter::new(Duration::from_secs(5));
        let pending = center.with_loader("Traitement en cours...", Duration::ZERO, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        let timed_out = tokio::time::timeout(Duration::from_millis(50), pending).await;
        assert!(timed_out.is_err());
        assert_eq!(center.loader(), None);
    }
}
