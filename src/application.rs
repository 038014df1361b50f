use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_APP_POWER_KW, DEFAULT_DISCHARGE_HOURS};

/// 모든 화학계에 공통으로 적용되는 운전 요구 조건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSpec {
    /// 목표 출력 [kW]
    pub power_kw: f64,
    /// 평가할 방전 시간 [h]. 결과 시리즈도 이 순서를 따른다.
    pub discharge_hours: Vec<f64>,
}

impl Default for ApplicationSpec {
    fn default() -> Self {
        Self {
            power_kw: DEFAULT_APP_POWER_KW,
            discharge_hours: DEFAULT_DISCHARGE_HOURS.to_vec(),
        }
    }
}

impl ApplicationSpec {
    pub fn new(power_kw: f64, discharge_hours: Vec<f64>) -> Self {
        Self {
            power_kw,
            discharge_hours,
        }
    }
}

/// "1, 2, 4" 형태의 방전 시간 목록을 파싱한다.
pub fn parse_hours(text: &str) -> Option<Vec<f64>> {
    let hours: Option<Vec<f64>> = text
        .split([',', ' ', ';'])
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse::<f64>().ok())
        .collect();
    hours.filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_duty_cycle() {
        let app = ApplicationSpec::default();
        assert_eq!(app.power_kw, 50_000.0);
        assert_eq!(app.discharge_hours, vec![1.0, 2.0, 4.0, 6.0, 8.0, 16.0]);
    }

    #[test]
    fn parse_hours_accepts_mixed_separators() {
        assert_eq!(parse_hours("1, 2;4 8"), Some(vec![1.0, 2.0, 4.0, 8.0]));
        assert_eq!(parse_hours("1, x"), None);
        assert_eq!(parse_hours("  "), None);
    }
}
