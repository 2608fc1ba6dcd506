// ==========================================
// SOFEM-CI 生产录入 - 应用状态
// ==========================================
// 职责: 装配配置、后端、通知中心、提交适配器、驾驶舱 API 与草稿缓存
// 约束: 草稿缓存只是辅助,读写失败只记录日志
// ==========================================

use std::sync::Arc;

use crate::api::backend::{HttpBackend, ProductionBackend};
use crate::api::dashboard_api::DashboardApi;
use crate::api::error::ApiResult;
use crate::api::submission::{SubmissionAdapter, SubmissionReport};
use crate::app::form::SectionForm;
use crate::app::notifications::NotificationCenter;
use crate::app::prompt::OperatorPrompt;
use crate::config::HostConfig;
use crate::db::default_draft_db_path;
use crate::domain::types::Section;
use crate::repository::draft_repo::DraftRepository;

/// 应用状态
///
/// 宿主持有一份,所有表单共享
pub struct AppState {
    /// 宿主注入的只读配置
    pub config: Arc<HostConfig>,

    pub backend: Arc<dyn ProductionBackend>,

    /// 加载遮罩与提示横幅
    pub notifications: Arc<NotificationCenter>,

    pub submission: Arc<SubmissionAdapter>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 本地草稿缓存（不可用时为 None）
    pub drafts: Option<Arc<DraftRepository>>,
}

impl AppState {
    /// 使用 HTTP 后端与默认草稿库创建应用状态
    pub fn new(config: HostConfig, prompt: Arc<dyn OperatorPrompt>) -> ApiResult<Self> {
        let backend: Arc<dyn ProductionBackend> = Arc::new(HttpBackend::from_config(&config)?);

        let drafts = match default_draft_db_path() {
            Some(path) => match DraftRepository::open(&path) {
                Ok(repo) => {
                    tracing::info!("草稿缓存: {}", path.display());
                    Some(Arc::new(repo))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "草稿缓存不可用,继续运行");
                    None
                }
            },
            None => {
                tracing::warn!("无法确定草稿缓存位置,继续运行");
                None
            }
        };

        Ok(Self::with_backend(config, backend, prompt, drafts))
    }

    pub fn with_backend(
        config: HostConfig,
        backend: Arc<dyn ProductionBackend>,
        prompt: Arc<dyn OperatorPrompt>,
        drafts: Option<Arc<DraftRepository>>,
    ) -> Self {
        let config = Arc::new(config);
        let notifications = Arc::new(NotificationCenter::new(config.settings.alert_ttl()));
        let submission = Arc::new(SubmissionAdapter::new(
            Arc::clone(&config),
            Arc::clone(&backend),
            Arc::clone(&notifications),
            prompt,
        ));
        let dashboard_api = Arc::new(DashboardApi::new(Arc::clone(&config), Arc::clone(&backend)));

        Self {
            config,
            backend,
            notifications,
            submission,
            dashboard_api,
            drafts,
        }
    }

    /// 打开工段表单并恢复草稿
    pub fn open_form(&self, section: Section) -> SectionForm {
        let mut form = SectionForm::new(section);
        self.restore_draft(&mut form);
        form
    }

    /// 输入事件：更新表单（触发重算）并保存草稿
    pub fn input(&self, form: &mut SectionForm, field_id: &str, value: &str) -> bool {
        if !form.set_value(field_id, value) {
            return false;
        }
        if let Some(drafts) = &self.drafts {
            if let Err(e) = drafts.save_field(form.form_id(), field_id, value) {
                tracing::warn!(form_id = form.form_id(), field_id, error = %e, "草稿保存失败");
            }
        }
        true
    }

    /// 恢复草稿,返回恢复的字段数
    pub fn restore_draft(&self, form: &mut SectionForm) -> usize {
        let Some(drafts) = &self.drafts else {
            return 0;
        };
        match drafts.load(form.form_id()) {
            Ok(saved) => saved
                .into_iter()
                .filter(|(field_id, value)| form.set_value(field_id, value.as_str()))
                .count(),
            Err(e) => {
                tracing::warn!(form_id = form.form_id(), error = %e, "草稿读取失败");
                0
            }
        }
    }

    /// 提交表单；成功后清除草稿
    pub async fn submit(&self, form: &mut SectionForm) -> SubmissionReport {
        let report = self.submission.submit(form).await;
        if report.is_succeeded() {
            if let Some(drafts) = &self.drafts {
                if let Err(e) = drafts.clear(form.form_id()) {
                    tracing::warn!(form_id = form.form_id(), error = %e, "草稿清除失败");
                }
            }
        }
        report
    }
}
