use serde::{Deserialize, Serialize};

use crate::chemistry::{ChemistryRecord, Side};
use crate::constants::SECONDS_PER_HOUR;

use super::error::{CostModelResult, Guard, Stage};
use super::CostBreakdown;

/// 지지전해질 비용에서 농도비의 분모로 쓸 활물질 농도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportingBasis {
    /// 음극액 활물질 농도(an_conc)로 나눈다. 기존 데이터셋 결과와 같다.
    AnolyteConcentration,
    /// 해당 쪽 전해질의 활물질 농도로 나눈다.
    OwnSide,
}

/// 양극액 지지전해질 비용의 농도 기준.
///
/// 기존 계산은 양극액 쪽에서도 an_conc로 나눈다. 물리적 의도가 확인되지 않았으므로
/// 기본값은 기존 동작을 유지하고 `OwnSide`는 설정으로 선택한다.
pub const CATHOLYTE_SUPPORTING_BASIS: SupportingBasis = SupportingBasis::AnolyteConcentration;

/// 한쪽 전해질의 재고/탱크 산정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideInventory {
    /// 필요한 활물질 [mol]
    pub moles: f64,
    /// 활물질 비용 [$]
    pub active_species_cost: f64,
    /// 지지전해질 비용 [$]
    pub supporting_electrolyte_cost: f64,
    /// 저장 체적 [L]
    pub storage_volume_l: f64,
    /// 탱크 비용 [$]
    pub vessel_cost: f64,
}

/// 방전 시간에 비례하는 비용 묶음.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyCosts {
    pub anolyte: SideInventory,
    pub catholyte: SideInventory,
    /// 양쪽 탱크 비용 합 [$]
    pub vessel_cost: f64,
}

impl EnergyCosts {
    /// 양쪽 활물질 + 지지전해질 비용 합.
    pub fn chemical_cost(&self) -> f64 {
        self.catholyte.active_species_cost
            + self.catholyte.supporting_electrolyte_cost
            + self.anolyte.active_species_cost
            + self.anolyte.supporting_electrolyte_cost
    }
}

fn side_inventory(
    guard: &Guard,
    record: &ChemistryRecord,
    breakdown: &CostBreakdown,
    side: Side,
    discharge_h: f64,
    supporting_conc_basis: f64,
) -> CostModelResult<SideInventory> {
    let cell = &record.cell;
    let e = record.electrolyte(side);
    let c_per_l = match side {
        Side::Anolyte => breakdown.anolyte_coulombs_per_litre,
        Side::Catholyte => breakdown.catholyte_coulombs_per_litre,
    };
    let (conc_name, cost_name) = match side {
        Side::Anolyte => ("an_conc", "an_AS_molar_cost"),
        Side::Catholyte => ("cath_conc", "cath_AS_molar_cost"),
    };
    guard.denominator(conc_name, e.conc)?;
    guard.denominator(cost_name, e.as_molar_cost)?;

    // 방전 동안 전달해야 하는 총 전하를 사용 SOC 범위와 쿨롱 손실을 반영해 몰수로 환산
    let moles = breakdown.current_a * discharge_h * SECONDS_PER_HOUR
        / ((c_per_l / e.conc) * cell.soc_frac * cell.eff_coul_rt);
    let moles = guard.finite("active_species_moles", moles)?;
    let active_species_cost = moles * e.as_molar_cost;
    let supporting_electrolyte_cost = (active_species_cost / e.as_molar_cost)
        * (e.ci_conc / supporting_conc_basis)
        * e.ci_molar_cost;
    let storage_volume_l = moles / e.conc;
    let vessel_cost = storage_volume_l * e.storage_cost;

    Ok(SideInventory {
        moles,
        active_species_cost: guard.finite("active_species_cost", active_species_cost)?,
        supporting_electrolyte_cost: guard
            .finite("supporting_electrolyte_cost", supporting_electrolyte_cost)?,
        storage_volume_l: guard.finite("storage_volume", storage_volume_l)?,
        vessel_cost: guard.finite("vessel_cost", vessel_cost)?,
    })
}

/// 방전 시간 t에 대한 화학 재고 비용과 탱크 비용을 구한다.
pub fn energy_costs(
    record: &ChemistryRecord,
    breakdown: &CostBreakdown,
    discharge_h: f64,
    catholyte_basis: SupportingBasis,
) -> CostModelResult<EnergyCosts> {
    let guard = Guard::new(&record.system, Stage::Energy);
    guard.denominator("SOC_frac", record.cell.soc_frac)?;
    guard.denominator("eff_coul_RT", record.cell.eff_coul_rt)?;

    let an_conc = guard.denominator("an_conc", record.anolyte.conc)?;
    let cath_basis = match catholyte_basis {
        SupportingBasis::AnolyteConcentration => an_conc,
        SupportingBasis::OwnSide => guard.denominator("cath_conc", record.catholyte.conc)?,
    };

    let anolyte = side_inventory(&guard, record, breakdown, Side::Anolyte, discharge_h, an_conc)?;
    let catholyte = side_inventory(
        &guard,
        record,
        breakdown,
        Side::Catholyte,
        discharge_h,
        cath_basis,
    )?;
    let vessel_cost = guard.finite("vessel_cost", anolyte.vessel_cost + catholyte.vessel_cost)?;

    Ok(EnergyCosts {
        anolyte,
        catholyte,
        vessel_cost,
    })
}
