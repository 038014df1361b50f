use std::fmt;

use thiserror::Error;

/// 실패가 발생한 계산 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Stack,
    Pump,
    Energy,
    Aggregator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Stack => "stack",
            Stage::Pump => "pump",
            Stage::Energy => "energy",
            Stage::Aggregator => "aggregator",
        };
        f.write_str(name)
    }
}

/// 화학계 레코드 하나를 평가할 수 없을 때의 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostModelError {
    /// 분모 항이 0이거나 유한하지 않음
    #[error("{system}: degenerate input in {stage} stage ({quantity} = {value})")]
    DegenerateInput {
        system: String,
        stage: Stage,
        quantity: &'static str,
        value: f64,
    },
    /// 계산 결과가 유한하지 않음
    #[error("{system}: non-finite {quantity} in {stage} stage")]
    NonFinite {
        system: String,
        stage: Stage,
        quantity: &'static str,
    },
    /// 필수 열이 없거나 비어 있음
    #[error("{system}: missing field `{field}`")]
    MissingField { system: String, field: String },
    /// 숫자로 읽을 수 없는 값
    #[error("{system}: invalid value {raw:?} in field `{field}`")]
    InvalidField {
        system: String,
        field: String,
        raw: String,
    },
}

impl CostModelError {
    pub fn system(&self) -> &str {
        match self {
            CostModelError::DegenerateInput { system, .. }
            | CostModelError::NonFinite { system, .. }
            | CostModelError::MissingField { system, .. }
            | CostModelError::InvalidField { system, .. } => system,
        }
    }

    /// 입력 파싱 오류는 단계가 없다.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CostModelError::DegenerateInput { stage, .. }
            | CostModelError::NonFinite { stage, .. } => Some(*stage),
            CostModelError::MissingField { .. } | CostModelError::InvalidField { .. } => None,
        }
    }
}

pub type CostModelResult<T> = Result<T, CostModelError>;

/// 단계별 분모/결과 검사를 묶어 둔 헬퍼.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Guard<'a> {
    pub system: &'a str,
    pub stage: Stage,
}

impl<'a> Guard<'a> {
    pub fn new(system: &'a str, stage: Stage) -> Self {
        Self { system, stage }
    }

    /// 분모로 쓰이는 값은 0이 아니고 유한해야 한다.
    pub fn denominator(&self, quantity: &'static str, value: f64) -> CostModelResult<f64> {
        if value == 0.0 || !value.is_finite() {
            return Err(CostModelError::DegenerateInput {
                system: self.system.to_string(),
                stage: self.stage,
                quantity,
                value,
            });
        }
        Ok(value)
    }

    pub fn finite(&self, quantity: &'static str, value: f64) -> CostModelResult<f64> {
        if !value.is_finite() {
            return Err(CostModelError::NonFinite {
                system: self.system.to_string(),
                stage: self.stage,
                quantity,
            });
        }
        Ok(value)
    }
}
