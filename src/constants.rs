//! 비용 모델 수식에 박혀 있는 상수 모음.

/// 패러데이 상수 [C/mol]. 원 데이터셋과 동일하게 정수값을 사용한다.
pub const FARADAY_C_PER_MOL: f64 = 96485.0;

/// 전류밀도 열의 단위 정규화 계수.
/// 데이터셋의 current_density 값에 곱해 A/m² 기준으로 맞춘다. 재유도하지 말 것.
pub const CURRENT_DENSITY_SCALE: f64 = 10.0;

/// kW -> W
pub const WATTS_PER_KW: f64 = 1000.0;

/// Wh -> kWh (전달 에너지 정규화)
pub const WH_PER_KWH: f64 = 1000.0;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// 셀 1개(반복 단위)당 전극 펠트 수.
pub const ELECTRODES_PER_CELL: f64 = 2.0;

/// 기본 적용 출력 [kW].
pub const DEFAULT_APP_POWER_KW: f64 = 50_000.0;

/// 기본 방전 시간 목록 [h].
pub const DEFAULT_DISCHARGE_HOURS: [f64; 6] = [1.0, 2.0, 4.0, 6.0, 8.0, 16.0];
