use crate::chemistry::{ChemistryRecord, Side};
use crate::constants::{CURRENT_DENSITY_SCALE, FARADAY_C_PER_MOL, SECONDS_PER_MINUTE};

use super::error::{CostModelResult, Guard, Stage};
use super::stack::StackSizing;

/// 한쪽 전해질의 유량 사이징 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideFlow {
    /// 체적당 전하 용량 [C/L]
    pub coulombs_per_litre: f64,
    /// 최대 요구 유량 [L/min]
    pub max_flow_l_per_min: f64,
}

/// 펌프/열교환기 사이징 결과. 전류와 C/L 값은 에너지 단계가 그대로 재사용한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpSizing {
    /// 운전 전류 [A]
    pub current_a: f64,
    pub anolyte: SideFlow,
    pub catholyte: SideFlow,
    /// 펌프 자본비 [$]
    pub pump_cost: f64,
    /// 열교환기 자본비 [$]
    pub hex_cost: f64,
}

/// 운전 전류 [A]. 스택 사이징과 같은 ×10 단위 규약을 쓴다.
pub fn operating_current(record: &ChemistryRecord, stack: &StackSizing) -> f64 {
    stack.area_m2 * record.cell.current_density * CURRENT_DENSITY_SCALE
}

/// (Ne / stoich) · F · conc
fn coulombs_per_litre(guard: &Guard, record: &ChemistryRecord, side: Side) -> CostModelResult<f64> {
    let e = record.electrolyte(side);
    let (stoich_name, conc_name) = match side {
        Side::Anolyte => ("an_stoich", "an_conc"),
        Side::Catholyte => ("cath_stoich", "cath_conc"),
    };
    guard.denominator(stoich_name, e.stoich)?;
    guard.denominator(conc_name, e.conc)?;
    let c_per_l = (e.n_e / e.stoich) * FARADAY_C_PER_MOL * e.conc;
    guard.denominator("coulombs_per_litre", c_per_l)
}

/// 펌프는 더 엄격한 SOC 하한(min_SOC 또는 통과당 ΔSOC)에서 전류를 감당하도록 사이징한다.
///
/// Q_max = I·60 / (C_per_L · min(min_SOC, ΔSOC) · √η_coul)
pub fn size_pumps(
    record: &ChemistryRecord,
    stack: &StackSizing,
    power_kw: f64,
) -> CostModelResult<PumpSizing> {
    let guard = Guard::new(&record.system, Stage::Pump);
    let cell = &record.cell;
    guard.denominator("min_SOC", cell.min_soc)?;
    guard.denominator("dSOC_per_pass", cell.dsoc_per_pass)?;
    let coul_derate = guard.denominator("sqrt(eff_coul_RT)", cell.eff_coul_rt.sqrt())?;

    let current_a = guard.finite("current", operating_current(record, stack))?;
    let limiting_soc = cell.limiting_soc();

    let side_flow = |side: Side| -> CostModelResult<SideFlow> {
        let c_per_l = coulombs_per_litre(&guard, record, side)?;
        let flow = current_a * SECONDS_PER_MINUTE / (c_per_l * limiting_soc * coul_derate);
        Ok(SideFlow {
            coulombs_per_litre: c_per_l,
            max_flow_l_per_min: guard.finite("max_flow", flow)?,
        })
    };
    let anolyte = side_flow(Side::Anolyte)?;
    let catholyte = side_flow(Side::Catholyte)?;

    let pump_cost = guard.finite(
        "pump_cost",
        (anolyte.max_flow_l_per_min + catholyte.max_flow_l_per_min) * record.pump_cost_per_flow,
    )?;
    let hex_cost = guard.finite("hex_cost", record.hex_cost_per_kw * power_kw)?;

    Ok(PumpSizing {
        current_a,
        anolyte,
        catholyte,
        pump_cost,
        hex_cost,
    })
}
