// ==========================================
// SOFEM-CI 生产录入 - 提交状态机
// ==========================================
// 状态: Idle → Validating → (RejectedLocally | AwaitingConfirmation)
//       AwaitingConfirmation → (Aborted | Submitting)
//       Submitting → (Succeeded | Failed)
//       任一终态 → Idle
// 红线: 其余转换一律拒绝
// ==========================================

use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    RejectedLocally,
    AwaitingConfirmation,
    Aborted,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Validating => "validating",
            SubmissionState::RejectedLocally => "rejected_locally",
            SubmissionState::AwaitingConfirmation => "awaiting_confirmation",
            SubmissionState::Aborted => "aborted",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::RejectedLocally
                | SubmissionState::Aborted
                | SubmissionState::Succeeded
                | SubmissionState::Failed
        )
    }

    pub fn can_transition_to(&self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        match (self, next) {
            (Idle, Validating) => true,
            (Validating, RejectedLocally) | (Validating, AwaitingConfirmation) => true,
            (AwaitingConfirmation, Aborted) | (AwaitingConfirmation, Submitting) => true,
            (Submitting, Succeeded) | (Submitting, Failed) => true,
            (from, Idle) => from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// SubmissionMachine - 单次提交的状态轨迹
// ==========================================
#[derive(Debug, Clone)]
pub struct SubmissionMachine {
    state: SubmissionState,
    trail: Vec<SubmissionState>,
}

impl Default for SubmissionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionMachine {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            trail: vec![SubmissionState::Idle],
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn trail(&self) -> &[SubmissionState] {
        &self.trail
    }

    pub fn transition(&mut self, next: SubmissionState) -> ApiResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(ApiError::InvalidStateTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        tracing::debug!(from = %self.state, to = %next, "提交状态转换");
        self.state = next;
        self.trail.push(next);
        Ok(())
    }

    /// 回到 Idle
    ///
    /// 非终态时仍强制回到 Idle,并返回错误供调用方记录。
    pub fn finish(&mut self) -> ApiResult<()> {
        let result = self.transition(SubmissionState::Idle);
        if result.is_err() {
            self.state = SubmissionState::Idle;
            self.trail.push(SubmissionState::Idle);
        }
        result
    }

    pub fn into_trail(self) -> Vec<SubmissionState> {
        self.trail
    }
}
