// ==========================================
// SOFEM-CI 生产录入 - 表单提交适配器
// ==========================================
// 职责: 校验 → 确认 → 提交 → 反馈 的完整流程
// 路径: 挤出主表单走原生提交（页面跳转）；其余工段走异步提交
// 红线: 同一表单同一时刻只允许一次提交在途
//       本地校验失败不发任何网络请求
// ==========================================

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::instrument;

use crate::api::backend::{NativeReceipt, ProductionBackend, CSRF_FORM_FIELD};
use crate::api::error::{ApiError, ApiResult, FieldViolation};
use crate::api::submission_state::{SubmissionMachine, SubmissionState};
use crate::api::validator::RequiredFieldsValidator;
use crate::app::form::SectionForm;
use crate::app::notifications::NotificationCenter;
use crate::app::prompt::OperatorPrompt;
use crate::config::{config_keys, HostConfig};
use crate::domain::types::{AlertLevel, Section};
use crate::i18n::{keys, t, t_with_args};

// ==========================================
// 提交结果
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitReceipt {
    /// 原生提交：浏览器跳转到后端返回的页面
    Navigated(NativeReceipt),
    /// 异步提交：后端确认保存
    Saved { message: String },
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    /// 该表单已有提交在途,本次被忽略
    Busy,
    RejectedLocally(Vec<FieldViolation>),
    Aborted,
    Succeeded(SubmitReceipt),
    Failed(ApiError),
}

/// 一次提交的结果与状态轨迹
#[derive(Debug)]
pub struct SubmissionReport {
    pub outcome: SubmissionOutcome,
    pub trail: Vec<SubmissionState>,
}

impl SubmissionReport {
    pub fn is_succeeded(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Succeeded(_))
    }

    /// 回到 Idle 之前的最后一个状态
    pub fn final_state(&self) -> SubmissionState {
        self.trail
            .iter()
            .rev()
            .find(|s| **s != SubmissionState::Idle)
            .copied()
            .unwrap_or(SubmissionState::Idle)
    }
}

// ==========================================
// InFlightGuard - 在途标记（离开作用域自动释放）
// ==========================================
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    form_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.form_id);
    }
}

// ==========================================
// SubmissionAdapter - 表单提交适配器
// ==========================================
pub struct SubmissionAdapter {
    config: Arc<HostConfig>,
    backend: Arc<dyn ProductionBackend>,
    notifications: Arc<NotificationCenter>,
    prompt: Arc<dyn OperatorPrompt>,
    validator: RequiredFieldsValidator,
    in_flight: Mutex<HashSet<String>>,
}

impl SubmissionAdapter {
    pub fn new(
        config: Arc<HostConfig>,
        backend: Arc<dyn ProductionBackend>,
        notifications: Arc<NotificationCenter>,
        prompt: Arc<dyn OperatorPrompt>,
    ) -> Self {
        let validator = RequiredFieldsValidator::new(config.locale.clone());
        Self {
            config,
            backend,
            notifications,
            prompt,
            validator,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn locale(&self) -> &str {
        &self.config.locale
    }

    fn try_begin(&self, form_id: &str) -> Option<InFlightGuard<'_>> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert(form_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            in_flight: &self.in_flight,
            form_id: form_id.to_string(),
        })
    }

    pub fn is_in_flight(&self, form_id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(form_id)
    }

    /// 确认文案：挤出主表单与其他工段不同
    pub fn confirmation_message(&self, section: Section) -> String {
        match section {
            Section::Extrusion => t(self.locale(), keys::CONFIRM_PRODUCTION),
            other => t_with_args(
                self.locale(),
                keys::CONFIRM_SECTION,
                &[("section", other.slug())],
            ),
        }
    }

    /// 提交表单
    ///
    /// # 流程
    /// 1. 在途检查（同一 form_id 正在提交 → Busy,不校验不发送）
    /// 2. 必填校验（失败 → 内联错误,不发送）
    /// 3. 操作员确认（拒绝 → Aborted）
    /// 4. 原生或异步提交
    #[instrument(skip(self, form), fields(section = %form.section(), form_id = %form.form_id()))]
    pub async fn submit(&self, form: &mut SectionForm) -> SubmissionReport {
        let Some(_guard) = self.try_begin(form.form_id()) else {
            tracing::warn!("提交在途,忽略重复提交");
            self.notifications
                .show_alert(AlertLevel::Info, t(self.locale(), keys::FORM_BUSY));
            return SubmissionReport {
                outcome: SubmissionOutcome::Busy,
                trail: vec![SubmissionState::Idle],
            };
        };

        let mut machine = SubmissionMachine::new();
        let outcome = match self.run(form, &mut machine).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "提交流程异常");
                SubmissionOutcome::Failed(e)
            }
        };
        if let Err(e) = machine.finish() {
            tracing::error!(error = %e, "提交状态未回到终态");
        }

        SubmissionReport {
            outcome,
            trail: machine.into_trail(),
        }
    }

    async fn run(
        &self,
        form: &mut SectionForm,
        machine: &mut SubmissionMachine,
    ) -> ApiResult<SubmissionOutcome> {
        machine.transition(SubmissionState::Validating)?;
        let violations = self.validator.violations(form.section(), form.values());
        form.apply_violations(&violations);
        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "本地校验未通过");
            machine.transition(SubmissionState::RejectedLocally)?;
            return Ok(SubmissionOutcome::RejectedLocally(violations));
        }

        machine.transition(SubmissionState::AwaitingConfirmation)?;
        let message = self.confirmation_message(form.section());
        if !self.prompt.confirm(&message).await {
            tracing::debug!("操作员取消提交");
            machine.transition(SubmissionState::Aborted)?;
            return Ok(SubmissionOutcome::Aborted);
        }

        machine.transition(SubmissionState::Submitting)?;
        let sent = match form.section().ajax_path() {
            None => self.submit_native(form).await,
            Some(path) => self.submit_async(form, path).await,
        };

        match sent {
            Ok(receipt) => {
                machine.transition(SubmissionState::Succeeded)?;
                Ok(SubmissionOutcome::Succeeded(receipt))
            }
            Err(err) => {
                self.notifications
                    .show_alert(AlertLevel::Error, err.user_message(self.locale()));
                machine.transition(SubmissionState::Failed)?;
                Ok(SubmissionOutcome::Failed(err))
            }
        }
    }

    /// 原生提交：POST 到表单 action,后端负责重定向与页面重绘
    async fn submit_native(&self, form: &SectionForm) -> ApiResult<SubmitReceipt> {
        let action = self
            .config
            .url(config_keys::SAISIE_EXTRUSION)
            .unwrap_or(config_keys::DEFAULT_EXTRUSION_ACTION);
        let url = self.config.resolve_url(action)?;

        let mut fields = form.serialize();
        fields.push((CSRF_FORM_FIELD.to_string(), self.config.csrf_token.clone()));

        let receipt = self.backend.submit_native(&url, &fields).await?;
        tracing::info!(status = receipt.status, final_url = %receipt.final_url, "原生提交完成");
        Ok(SubmitReceipt::Navigated(receipt))
    }

    /// 异步提交：加载遮罩下 POST,成功后清空表单
    async fn submit_async(&self, form: &mut SectionForm, path: &str) -> ApiResult<SubmitReceipt> {
        let url = self.config.resolve_url(path)?;
        let fields = form.serialize();

        let response = self
            .notifications
            .with_loader(
                t(self.locale(), keys::LOADER_PROCESSING),
                self.config.settings.loader_min_display(),
                self.backend
                    .post_section(&url, &fields, &self.config.csrf_token),
            )
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "工段提交失败");
                e
            })?;

        if !response.success {
            tracing::error!(url = %url, errors = ?response.errors, "后端表单校验失败");
            return Err(ApiError::Rejected {
                message: response.message.unwrap_or_default(),
                errors: response.errors,
            });
        }

        let message = response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| t(self.locale(), keys::FORM_SAVED));
        self.notifications
            .show_alert(AlertLevel::Success, message.clone());
        form.reset();

        Ok(SubmitReceipt::Saved { message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::backend::{DashboardMetrics, HttpMethod, SectionResponse};
    use crate::app::prompt::StaticPrompt;
    use crate::engine::schema::{ids, outputs};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::time::Duration;

    /// 记录调用次数的后端桩
    struct MockBackend {
        response: SectionResponse,
        delay: Duration,
        posts: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockBackend {
        fn new(response: SectionResponse) -> Self {
            Self {
                response,
                delay: Duration::ZERO,
                posts: Mutex::new(Vec::new()),
            }
        }

        fn post_count(&self) -> usize {
            self.posts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProductionBackend for MockBackend {
        async fn fetch_dashboard(&self, _url: &str) -> ApiResult<DashboardMetrics> {
            Err(ApiError::HttpStatus { status: 404 })
        }

        async fn post_section(
            &self,
            url: &str,
            fields: &[(String, String)],
            _csrf_token: &str,
        ) -> ApiResult<SectionResponse> {
            self.posts
                .lock()
                .unwrap()
                .push((url.to_string(), fields.to_vec()));
            tokio::time::sleep(self.delay).await;
            Ok(self.response.clone())
        }

        async fn submit_native(
            &self,
            url: &str,
            fields: &[(String, String)],
        ) -> ApiResult<NativeReceipt> {
            self.posts
                .lock()
                .unwrap()
                .push((url.to_string(), fields.to_vec()));
            Ok(NativeReceipt {
                status: 200,
                final_url: format!("{}?ok=1", url),
            })
        }

        async fn call_json(
            &self,
            _method: HttpMethod,
            _url: &str,
            _body: Option<&Value>,
            _csrf_token: Option<&str>,
        ) -> ApiResult<Value> {
            Ok(Value::Null)
        }
    }

    fn adapter(backend: Arc<MockBackend>, answer: bool) -> (SubmissionAdapter, Arc<NotificationCenter>) {
        let config = Arc::new(HostConfig::new("http://backend.test", "tok"));
        let notifications = Arc::new(NotificationCenter::new(Duration::from_secs(5)));
        let adapter = SubmissionAdapter::new(
            config,
            backend,
            Arc::clone(&notifications),
            Arc::new(StaticPrompt::new(answer)),
        );
        (adapter, notifications)
    }

    fn ok_response() -> SectionResponse {
        SectionResponse {
            success: true,
            message: None,
            errors: None,
        }
    }

    #[tokio::test]
    async fn test_local_rejection_sends_nothing() {
        let backend = Arc::new(MockBackend::new(ok_response()));
        let (adapter, _) = adapter(Arc::clone(&backend), true);
        let mut form = SectionForm::with_values(Section::Welding, [(ids::SOU_BOBINES_FINIES, "")]);

        let report = adapter.submit(&mut form).await;
        assert!(matches!(report.outcome, SubmissionOutcome::RejectedLocally(ref v) if v.len() == 1));
        assert_eq!(report.final_state(), SubmissionState::RejectedLocally);
        assert!(form.error(ids::SOU_BOBINES_FINIES).is_some());
        assert_eq!(backend.post_count(), 0);
    }

    #[tokio::test]
    async fn test_success_resets_form_with_fallback_message() {
        let backend = Arc::new(MockBackend::new(ok_response()));
        let (adapter, notifications) = adapter(Arc::clone(&backend), true);
        let mut form = SectionForm::with_values(
            Section::Welding,
            [(ids::SOU_BOBINES_FINIES, "120"), (ids::SOU_BRETELLES, "8")],
        );

        let report = adapter.submit(&mut form).await;
        assert!(report.is_succeeded());
        assert_eq!(
            report.trail,
            vec![
                SubmissionState::Idle,
                SubmissionState::Validating,
                SubmissionState::AwaitingConfirmation,
                SubmissionState::Submitting,
                SubmissionState::Succeeded,
                SubmissionState::Idle,
            ]
        );
        assert!(form.values().is_empty());
        assert_eq!(form.display(outputs::SOU_TOTAL_PRODUCTION), Some("0.0"));

        let alerts = notifications.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Success);
        assert_eq!(alerts[0].message, "Production enregistrée !");

        let posts = backend.posts.lock().unwrap();
        assert_eq!(posts[0].0, "http://backend.test/ajax/saisie/soudure/");
        assert!(!adapter.is_in_flight("soudure-form"));
    }

    #[tokio::test]
    async fn test_backend_rejection_keeps_form() {
        let backend = Arc::new(MockBackend::new(SectionResponse {
            success: false,
            message: None,
            errors: Some(serde_json::json!({"dechets_kg": ["invalide"]})),
        }));
        let (adapter, notifications) = adapter(Arc::clone(&backend), true);
        let mut form = SectionForm::with_values(
            Section::Printing,
            [(ids::IMP_BOBINES_FINIES, "300"), (ids::IMP_BOBINES_SEMI_FINIES, "90")],
        );

        let report = adapter.submit(&mut form).await;
        assert!(matches!(report.outcome, SubmissionOutcome::Failed(ApiError::Rejected { .. })));
        assert_eq!(form.value(ids::IMP_BOBINES_FINIES), Some("300"));
        assert_eq!(form.display(outputs::IMP_TOTAL_PRODUCTION), Some("390.0"));
        assert_eq!(notifications.alerts()[0].message, "Erreur dans le formulaire");
    }

    #[tokio::test]
    async fn test_declined_confirmation_aborts() {
        let backend = Arc::new(MockBackend::new(ok_response()));
        let (adapter, _) = adapter(Arc::clone(&backend), false);
        let mut form = SectionForm::with_values(
            Section::Recycling,
            [(ids::REC_BROYAGE, "40"), (ids::REC_BACHE_NOIR, "10")],
        );

        let report = adapter.submit(&mut form).await;
        assert!(matches!(report.outcome, SubmissionOutcome::Aborted));
        assert_eq!(backend.post_count(), 0);
        assert_eq!(form.value(ids::REC_BROYAGE), Some("40"));
    }

    #[tokio::test]
    async fn test_native_path_adds_csrf_field() {
        let backend = Arc::new(MockBackend::new(ok_response()));
        let (adapter, _) = adapter(Arc::clone(&backend), true);
        let mut form = SectionForm::with_values(
            Section::Extrusion,
            [
                (ids::PROD_FINIS, "100"),
                (ids::PROD_SEMI_FINIS, "50"),
                (ids::MATIERE_PREMIERE, "200"),
            ],
        );

        let report = adapter.submit(&mut form).await;
        match report.outcome {
            SubmissionOutcome::Succeeded(SubmitReceipt::Navigated(receipt)) => {
                assert_eq!(receipt.final_url, "http://backend.test/saisie/extrusion/?ok=1");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        // 原生提交不清空表单
        assert_eq!(form.value(ids::PROD_FINIS), Some("100"));

        let posts = backend.posts.lock().unwrap();
        assert!(posts[0]
            .1
            .contains(&("csrfmiddlewaretoken".to_string(), "tok".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_of_same_form_is_busy() {
        let mut mock = MockBackend::new(ok_response());
        mock.delay = Duration::from_millis(200);
        let backend = Arc::new(mock);
        let (adapter, _) = adapter(Arc::clone(&backend), true);

        let values = [(ids::IMP_BOBINES_FINIES, "10"), (ids::IMP_BOBINES_SEMI_FINIES, "5")];
        let mut first = SectionForm::with_values(Section::Printing, values);
        let mut second = SectionForm::with_values(Section::Printing, values);

        let (a, b) = tokio::join!(adapter.submit(&mut first), adapter.submit(&mut second));
        assert!(a.is_succeeded());
        assert!(matches!(b.outcome, SubmissionOutcome::Busy));
        assert_eq!(backend.post_count(), 1);
        assert!(!adapter.is_in_flight("imprimerie-form"));
    }

    #[test]
    fn test_confirmation_messages() {
        let backend = Arc::new(MockBackend::new(ok_response()));
        let (adapter, _) = adapter(backend, true);
        assert_eq!(
            adapter.confirmation_message(Section::Extrusion),
            "Confirmer la validation de cette saisie de production ?"
        );
        assert_eq!(
            adapter.confirmation_message(Section::Welding),
            "Confirmer la validation de la production soudure ?"
        );
    }
}
