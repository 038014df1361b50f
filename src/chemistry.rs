//! 화학계(전해질 조합) 한 행의 입력 파라미터를 정의한다.
//!
//! 표 형식 데이터에서 위치 인덱스로 꺼내 쓰지 않고, 각 단계에 명시적인 값 타입을
//! 참조로 넘긴다. 모델은 레코드를 절대 변경하지 않는다.

use serde::{Deserialize, Serialize};

/// 전해질의 어느 쪽인지 나타낸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Anolyte,
    Catholyte,
}

impl Side {
    /// 원 데이터셋 열 이름 접두사.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Side::Anolyte => "an",
            Side::Catholyte => "cath",
        }
    }
}

/// 셀 단위 전기화학 파라미터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellParameters {
    /// 전류밀도 (데이터셋 단위, ×10 하면 A/m²)
    pub current_density: f64,
    /// 시스템 방전 효율(0~1)
    pub eff_sys_d: f64,
    /// 왕복 쿨롱 효율(0~1)
    pub eff_coul_rt: f64,
    /// SOC 50%에서의 작동 전압 [V]
    pub working_v: f64,
    /// 1회 통과당 SOC 변화폭
    pub dsoc_per_pass: f64,
    /// 사용 가능한 SOC 비율
    pub soc_frac: f64,
    /// 최소 SOC
    pub min_soc: f64,
}

impl CellParameters {
    /// 펌프 사이징에 쓰는 더 보수적인 SOC 하한.
    pub fn limiting_soc(&self) -> f64 {
        self.min_soc.min(self.dsoc_per_pass)
    }
}

/// 한쪽 전해질(음극액/양극액)의 화학 조성과 단가.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Electrolyte {
    /// 활물질 몰농도 [mol/L]
    pub conc: f64,
    /// 반응당 전자 수
    pub n_e: f64,
    /// 화학양론 계수
    pub stoich: f64,
    /// 지지전해질(스펙테이터 이온) 농도 [mol/L]
    pub ci_conc: f64,
    /// 활물질 몰 단가 [$/mol]
    pub as_molar_cost: f64,
    /// 지지전해질 몰 단가 [$/mol]
    pub ci_molar_cost: f64,
    /// 저장 탱크 단가 [$/L]
    pub storage_cost: f64,
}

/// 스택 반복 단위의 면적당 단가 [$/m²].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackArealCosts {
    pub bipolar_plate: f64,
    pub electrode: f64,
    pub membrane: f64,
    pub other: f64,
}

impl StackArealCosts {
    /// 셀 1개 = 막 1 + 바이폴라 플레이트 1 + 전극 펠트 2 + 기타.
    pub fn per_cell_area(&self) -> f64 {
        self.membrane
            + self.bipolar_plate
            + crate::constants::ELECTRODES_PER_CELL * self.electrode
            + self.other
    }
}

/// 화학계 한 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryRecord {
    pub system: String,
    pub include: bool,
    pub cell: CellParameters,
    pub anolyte: Electrolyte,
    pub catholyte: Electrolyte,
    pub stack_costs: StackArealCosts,
    /// 펌프 단가 [$/(L/min)]
    pub pump_cost_per_flow: f64,
    /// 열교환기 단가 [$/kW]
    pub hex_cost_per_kw: f64,
}

impl ChemistryRecord {
    pub fn electrolyte(&self, side: Side) -> &Electrolyte {
        match side {
            Side::Anolyte => &self.anolyte,
            Side::Catholyte => &self.catholyte,
        }
    }
}

/// 원 데이터셋의 열 이름. CSV 로더와 오류 메시지가 같은 이름을 쓴다.
pub mod columns {
    pub const SYSTEM: &str = "system";
    pub const INCLUDE: &str = "include";
    pub const CURRENT_DENSITY: &str = "current_density";
    pub const EFF_SYS_D: &str = "eff_sys_d";
    pub const EFF_COUL_RT: &str = "eff_coul_RT";
    pub const WORKING_V: &str = "working_V_50%_SOC";
    pub const DSOC_PER_PASS: &str = "dSOC_per_pass";
    pub const SOC_FRAC: &str = "SOC_frac";
    pub const MIN_SOC: &str = "min_SOC";
    pub const BIPOLAR_PLATE: &str = "bipol_plate_areal_cost";
    pub const ELECTRODE: &str = "electrode_areal_cost";
    pub const MEMBRANE: &str = "memb_areal_cost";
    pub const OTHER_AREAL: &str = "other_areal_cost";
    pub const HEX_COST: &str = "HEX_cost";
    pub const DEFAULT_PUMP_COST: &str = "weber_pump_cost";
    pub const FLOW_PUMP_COST: &str = "flow_pump_cost";

    /// 전해질별 열 이름 접미사 (`an_conc`, `cath_Ne` ...).
    pub const CONC: &str = "conc";
    pub const NE: &str = "Ne";
    pub const STOICH: &str = "stoich";
    pub const CI_CONC: &str = "CI_conc";
    pub const AS_MOLAR_COST: &str = "AS_molar_cost";
    pub const CI_MOLAR_COST: &str = "CI_molar_cost";
    pub const STORAGE_COST: &str = "storage_cost";
}
