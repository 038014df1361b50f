use serde::Serialize;

use crate::chemistry::ChemistryRecord;
use crate::constants::WH_PER_KWH;

use super::energy::EnergyCosts;
use super::error::{CostModelResult, Guard, Stage};
use super::CostBreakdown;

/// (화학계, 방전 시간) 한 쌍의 에너지 기준 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostPoint {
    pub discharge_h: f64,
    /// 화학 재고와 탱크 비용
    pub energy: EnergyCosts,
    /// 시스템 총 자본비 [$]
    pub system_cost: f64,
    /// 전달 에너지 [kWh]
    pub delivered_kwh: f64,
    /// 정규화 비용 [$/kWh]
    pub cost_per_kwh: f64,
}

/// 출력 기준 비용과 에너지 기준 비용을 합산하고 전달 에너지로 정규화한다.
pub fn aggregate(
    record: &ChemistryRecord,
    breakdown: &CostBreakdown,
    energy: &EnergyCosts,
    discharge_h: f64,
) -> CostModelResult<CostPoint> {
    let guard = Guard::new(&record.system, Stage::Aggregator);
    let cell = &record.cell;

    let system_cost =
        breakdown.power_basis_cost() + energy.chemical_cost() + energy.vessel_cost;
    let system_cost = guard.finite("system_cost", system_cost)?;
    let delivered_kwh =
        breakdown.current_a * cell.working_v * cell.eff_sys_d * discharge_h / WH_PER_KWH;
    let delivered_kwh = guard.denominator("delivered_energy", delivered_kwh)?;
    let cost_per_kwh = guard.finite("cost_per_kwh", system_cost / delivered_kwh)?;

    Ok(CostPoint {
        discharge_h,
        energy: *energy,
        system_cost,
        delivered_kwh,
        cost_per_kwh,
    })
}
