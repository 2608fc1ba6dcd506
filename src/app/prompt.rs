// ==========================================
// SOFEM-CI 生产录入 - 操作员确认
// ==========================================
// 提交前的二次确认（宿主负责真正的弹窗）
// ==========================================

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

#[async_trait]
pub trait OperatorPrompt: Send + Sync {
    /// 返回 true 表示操作员确认
    async fn confirm(&self, message: &str) -> bool;
}

/// 固定应答的确认器（无界面运行与测试）
#[derive(Debug, Default)]
pub struct StaticPrompt {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl StaticPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// 已询问过的确认文案
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OperatorPrompt for StaticPrompt {
    async fn confirm(&self, message: &str) -> bool {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        self.answer
    }
}
