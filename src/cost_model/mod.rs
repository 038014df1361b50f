//! 레독스 흐름전지 균등화 자본비 모델.
//!
//! 화학계 레코드마다 스택 → 펌프 → (방전 시간별) 에너지 비용 → 합산 순서로 평가한다.
//! 레코드 간 의존성이 없고 I/O도 하지 않는다.

pub mod aggregate;
pub mod energy;
pub mod error;
pub mod pump;
pub mod stack;

use serde::{Deserialize, Serialize};

use crate::application::ApplicationSpec;
use crate::chemistry::ChemistryRecord;

pub use aggregate::{aggregate, CostPoint};
pub use energy::{
    energy_costs, EnergyCosts, SideInventory, SupportingBasis, CATHOLYTE_SUPPORTING_BASIS,
};
pub use error::{CostModelError, CostModelResult, Stage};
pub use pump::{size_pumps, PumpSizing};
pub use stack::{size_stack, StackSizing};

/// 모델 동작 옵션.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// 양극액 지지전해질 비용의 농도 기준
    pub catholyte_supporting_basis: SupportingBasis,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            catholyte_supporting_basis: CATHOLYTE_SUPPORTING_BASIS,
        }
    }
}

/// 레코드당 한 번 계산하는 출력(kW) 기준 중간값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub stack_area_m2: f64,
    pub stack_cost: f64,
    pub current_a: f64,
    pub anolyte_coulombs_per_litre: f64,
    pub catholyte_coulombs_per_litre: f64,
    pub max_anolyte_flow_l_per_min: f64,
    pub max_catholyte_flow_l_per_min: f64,
    pub pump_cost: f64,
    pub hex_cost: f64,
}

impl CostBreakdown {
    pub fn from_sizing(stack: &StackSizing, pumps: &PumpSizing) -> Self {
        Self {
            stack_area_m2: stack.area_m2,
            stack_cost: stack.cost,
            current_a: pumps.current_a,
            anolyte_coulombs_per_litre: pumps.anolyte.coulombs_per_litre,
            catholyte_coulombs_per_litre: pumps.catholyte.coulombs_per_litre,
            max_anolyte_flow_l_per_min: pumps.anolyte.max_flow_l_per_min,
            max_catholyte_flow_l_per_min: pumps.catholyte.max_flow_l_per_min,
            pump_cost: pumps.pump_cost,
            hex_cost: pumps.hex_cost,
        }
    }

    /// 스택 + 펌프 + 열교환기 [$]
    pub fn power_basis_cost(&self) -> f64 {
        self.stack_cost + self.pump_cost + self.hex_cost
    }

    pub fn stack_cost_per_kw(&self, power_kw: f64) -> f64 {
        self.stack_cost / power_kw
    }

    pub fn pump_cost_per_kw(&self, power_kw: f64) -> f64 {
        self.pump_cost / power_kw
    }
}

/// 출력 기준 단계(스택, 펌프)만 수행한다. 실패하면 레코드 전체가 실패한다.
pub fn power_basis(record: &ChemistryRecord, power_kw: f64) -> CostModelResult<CostBreakdown> {
    let stack = size_stack(record, power_kw)?;
    let pumps = size_pumps(record, &stack, power_kw)?;
    Ok(CostBreakdown::from_sizing(&stack, &pumps))
}

/// 방전 시간 하나에 대한 에너지 단계 + 합산.
pub fn cost_point(
    record: &ChemistryRecord,
    breakdown: &CostBreakdown,
    discharge_h: f64,
    options: &ModelOptions,
) -> CostModelResult<CostPoint> {
    let energy = energy_costs(
        record,
        breakdown,
        discharge_h,
        options.catholyte_supporting_basis,
    )?;
    aggregate(record, breakdown, &energy, discharge_h)
}

/// 화학계 하나의 평가 결과. `points`는 방전 시간 목록과 같은 순서이다.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemistrySeries {
    pub system: String,
    pub power_kw: f64,
    pub breakdown: CostBreakdown,
    pub points: Vec<CostModelResult<CostPoint>>,
}

impl ChemistrySeries {
    /// 방전 시간별 $/kWh. 실패한 시간은 None.
    pub fn costs_per_kwh(&self) -> Vec<Option<f64>> {
        self.points
            .iter()
            .map(|p| p.as_ref().ok().map(|p| p.cost_per_kwh))
            .collect()
    }

    pub fn stack_cost_per_kw(&self) -> f64 {
        self.breakdown.stack_cost_per_kw(self.power_kw)
    }

    pub fn pump_cost_per_kw(&self) -> f64 {
        self.breakdown.pump_cost_per_kw(self.power_kw)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CostModelError> {
        self.points.iter().filter_map(|p| p.as_ref().err())
    }
}

/// 레코드 하나를 평가한다. 출력 기준 단계가 실패하면 Err, 방전 시간별 실패는 각 point에 담긴다.
pub fn evaluate_record(
    record: &ChemistryRecord,
    app: &ApplicationSpec,
    options: &ModelOptions,
) -> CostModelResult<ChemistrySeries> {
    let breakdown = power_basis(record, app.power_kw)?;
    tracing::debug!(
        system = %record.system,
        stack_area_m2 = breakdown.stack_area_m2,
        current_a = breakdown.current_a,
        "power-basis sizing done"
    );
    let points = app
        .discharge_hours
        .iter()
        .map(|&t| cost_point(record, &breakdown, t, options))
        .collect();
    Ok(ChemistrySeries {
        system: record.system.clone(),
        power_kw: app.power_kw,
        breakdown,
        points,
    })
}

/// 전체 평가 결과. 포함된 레코드의 입력 순서를 유지한다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub outcomes: Vec<CostModelResult<ChemistrySeries>>,
}

impl Evaluation {
    pub fn series(&self) -> impl Iterator<Item = &ChemistrySeries> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// 레코드 단위 실패와 방전 시간 단위 실패를 모두 모은다.
    pub fn failures(&self) -> Vec<&CostModelError> {
        let mut out = Vec::new();
        for outcome in &self.outcomes {
            match outcome {
                Ok(series) => out.extend(series.failures()),
                Err(err) => out.push(err),
            }
        }
        out
    }
}

fn evaluate_logged(
    record: &ChemistryRecord,
    app: &ApplicationSpec,
    options: &ModelOptions,
) -> CostModelResult<ChemistrySeries> {
    let outcome = evaluate_record(record, app, options);
    match &outcome {
        Ok(series) => {
            for err in series.failures() {
                tracing::warn!("{err}");
            }
        }
        Err(err) => tracing::warn!("{err}"),
    }
    outcome
}

/// include 플래그가 켜진 레코드만 평가한다. 한 레코드의 실패가 다른 레코드를 막지 않는다.
pub fn evaluate(
    records: &[ChemistryRecord],
    app: &ApplicationSpec,
    options: &ModelOptions,
) -> Evaluation {
    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = {
        use rayon::prelude::*;
        records
            .par_iter()
            .filter(|r| r.include)
            .map(|r| evaluate_logged(r, app, options))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = records
        .iter()
        .filter(|r| r.include)
        .map(|r| evaluate_logged(r, app, options))
        .collect();

    tracing::info!(
        evaluated = outcomes.len(),
        skipped = records.len() - outcomes.len(),
        "cost model evaluation finished"
    );
    Evaluation { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::{CellParameters, Electrolyte, StackArealCosts};

    fn vanadium() -> ChemistryRecord {
        let side = Electrolyte {
            conc: 1.5,
            n_e: 2.0,
            stoich: 2.0,
            ci_conc: 3.0,
            as_molar_cost: 20.0,
            ci_molar_cost: 0.5,
            storage_cost: 0.2,
        };
        ChemistryRecord {
            system: "test".into(),
            include: true,
            cell: CellParameters {
                current_density: 40.0,
                eff_sys_d: 0.7,
                eff_coul_rt: 0.97,
                working_v: 1.4,
                dsoc_per_pass: 0.2,
                soc_frac: 0.6,
                min_soc: 0.1,
            },
            anolyte: side.clone(),
            catholyte: Electrolyte { conc: 2.0, ..side },
            stack_costs: StackArealCosts {
                bipolar_plate: 55.0,
                electrode: 30.0,
                membrane: 100.0,
                other: 5.0,
            },
            pump_cost_per_flow: 15.0,
            hex_cost_per_kw: 10.0,
        }
    }

    #[test]
    fn breakdown_reuses_pump_stage_values() {
        let r = vanadium();
        let stack = size_stack(&r, 1000.0).unwrap();
        let pumps = size_pumps(&r, &stack, 1000.0).unwrap();
        let b = CostBreakdown::from_sizing(&stack, &pumps);
        assert_eq!(b.current_a, pumps.current_a);
        assert_eq!(b.anolyte_coulombs_per_litre, pumps.anolyte.coulombs_per_litre);
        assert_eq!(b.power_basis_cost(), stack.cost + pumps.pump_cost + pumps.hex_cost);
    }

    #[test]
    fn catholyte_basis_switches_denominator() {
        let r = vanadium();
        let b = power_basis(&r, 1000.0).unwrap();
        let legacy = energy_costs(&r, &b, 4.0, SupportingBasis::AnolyteConcentration).unwrap();
        let own = energy_costs(&r, &b, 4.0, SupportingBasis::OwnSide).unwrap();
        // cath_conc(2.0) / an_conc(1.5)
        let ratio = legacy.catholyte.supporting_electrolyte_cost
            / own.catholyte.supporting_electrolyte_cost;
        assert!((ratio - 2.0 / 1.5).abs() < 1e-12);
        assert_eq!(legacy.anolyte, own.anolyte);
    }

    #[test]
    fn default_options_keep_legacy_basis() {
        assert_eq!(
            ModelOptions::default().catholyte_supporting_basis,
            SupportingBasis::AnolyteConcentration
        );
    }

    #[test]
    fn zero_duration_fails_only_that_point() {
        let r = vanadium();
        let app = ApplicationSpec::new(1000.0, vec![0.0, 4.0]);
        let series = evaluate_record(&r, &app, &ModelOptions::default()).unwrap();
        let err = series.points[0].as_ref().unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Aggregator));
        assert!(series.points[1].is_ok());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_evaluation_matches_record_by_record() {
        let records: Vec<_> = (0..32)
            .map(|i| ChemistryRecord {
                system: format!("chem-{i}"),
                ..vanadium()
            })
            .collect();
        let app = ApplicationSpec::default();
        let opts = ModelOptions::default();
        let expected: Vec<_> = records
            .iter()
            .map(|r| evaluate_record(r, &app, &opts))
            .collect();
        assert_eq!(evaluate(&records, &app, &opts).outcomes, expected);
    }
}
