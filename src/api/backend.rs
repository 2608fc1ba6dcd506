// ==========================================
// SOFEM-CI 生产录入 - 后端 HTTP 契约
// ==========================================
// 职责: 驾驶舱指标查询、工段表单异步提交、主表单原生提交
// 接口: ProductionBackend trait（测试可替换）+ HttpBackend（reqwest 实现）
// ==========================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::config::HostConfig;

/// CSRF 请求头
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// 原生表单中携带 CSRF 的字段名
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

// ==========================================
// 数据传输对象
// ==========================================

/// 驾驶舱实时指标
///
/// 后端可能把 Decimal 序列化为字符串,数字与数字字符串均接受。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    #[serde(deserialize_with = "lenient_f64")]
    pub production_totale: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub machines_actives: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub machines_total: Option<f64>,
}

/// 工段异步提交的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

/// 原生提交结果（跟随重定向后的最终页面）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeReceipt {
    pub status: u16,
    pub final_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_f64(&value).ok_or_else(|| de::Error::custom(format!("期望数值，实际为 {}", value)))
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value_to_f64(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("期望数值，实际为 {}", value))),
    }
}

// ==========================================
// ProductionBackend - 后端接口
// ==========================================

#[async_trait]
pub trait ProductionBackend: Send + Sync {
    /// GET 驾驶舱指标
    async fn fetch_dashboard(&self, url: &str) -> ApiResult<DashboardMetrics>;

    /// POST 工段表单（form-encoded + CSRF 请求头）
    async fn post_section(
        &self,
        url: &str,
        fields: &[(String, String)],
        csrf_token: &str,
    ) -> ApiResult<SectionResponse>;

    /// 原生提交主录入表单（后端负责最终校验与页面重绘）
    async fn submit_native(&self, url: &str, fields: &[(String, String)]) -> ApiResult<NativeReceipt>;

    /// 通用 JSON 调用；非 2xx 视为错误
    async fn call_json(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        csrf_token: Option<&str>,
    ) -> ApiResult<Value>;
}

// ==========================================
// HttpBackend - reqwest 实现
// ==========================================

pub struct HttpBackend {
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub fn from_config(config: &HostConfig) -> ApiResult<Self> {
        Self::new(config.settings.request_timeout())
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::HttpStatus {
            status: status.as_u16(),
        });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl ProductionBackend for HttpBackend {
    async fn fetch_dashboard(&self, url: &str) -> ApiResult<DashboardMetrics> {
        let value = self.call_json(HttpMethod::Get, url, None, None).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_section(
        &self,
        url: &str,
        fields: &[(String, String)],
        csrf_token: &str,
    ) -> ApiResult<SectionResponse> {
        tracing::debug!(url, field_count = fields.len(), "POST 工段表单");
        let resp = self
            .http
            .post(url)
            .header(CSRF_HEADER, csrf_token)
            .form(fields)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn submit_native(&self, url: &str, fields: &[(String, String)]) -> ApiResult<NativeReceipt> {
        tracing::debug!(url, field_count = fields.len(), "原生提交主表单");
        let resp = self.http.post(url).form(fields).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
            });
        }
        Ok(NativeReceipt {
            status: status.as_u16(),
            final_url: resp.url().to_string(),
        })
    }

    async fn call_json(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        csrf_token: Option<&str>,
    ) -> ApiResult<Value> {
        let mut req = match method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
        };
        if let Some(token) = csrf_token {
            req = req.header(CSRF_HEADER, token);
        }
        if let (HttpMethod::Post, Some(body)) = (method, body) {
            req = req.json(body);
        }

        let result = match req.send().await {
            Ok(resp) => read_json(resp).await,
            Err(e) => Err(ApiError::from(e)),
        };
        if let Err(e) = &result {
            tracing::error!(url, error = %e, "API 调用失败");
        }
        result
    }
}
