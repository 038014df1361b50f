use crate::chemistry::ChemistryRecord;
use crate::constants::{CURRENT_DENSITY_SCALE, WATTS_PER_KW};

use super::error::{CostModelResult, Guard, Stage};

/// 스택 사이징 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackSizing {
    /// 활성 면적 [m²]
    pub area_m2: f64,
    /// 스택 자본비 [$]
    pub cost: f64,
}

/// 목표 출력을 정격 전류밀도·작동 전압·방전 효율로 내기 위한 스택 면적과 비용을 구한다.
///
/// area = P·1000 / (j·10·V·η_sys)
pub fn size_stack(record: &ChemistryRecord, power_kw: f64) -> CostModelResult<StackSizing> {
    let guard = Guard::new(&record.system, Stage::Stack);
    let cell = &record.cell;
    guard.denominator("current_density", cell.current_density)?;
    guard.denominator("working_V", cell.working_v)?;
    guard.denominator("eff_sys_d", cell.eff_sys_d)?;

    let area = power_kw * WATTS_PER_KW
        / (cell.current_density * CURRENT_DENSITY_SCALE * cell.working_v * cell.eff_sys_d);
    let area_m2 = guard.finite("stack_area", area)?;
    let cost = guard.finite("stack_cost", area_m2 * record.stack_costs.per_cell_area())?;

    Ok(StackSizing { area_m2, cost })
}
