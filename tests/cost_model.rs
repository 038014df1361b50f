//! 비용 모델 회귀 테스트. 대칭 전해질 레코드(50 MW) 기준 수기 계산값과 비교한다.
use approx::assert_relative_eq;
use rfb_cost_toolbox::{
    application::ApplicationSpec,
    chemistry::{CellParameters, ChemistryRecord, Electrolyte, StackArealCosts},
    cost_model::{
        self, evaluate, evaluate_record, power_basis, CostModelError, ModelOptions, Stage,
        SupportingBasis,
    },
};

fn symmetric_record(name: &str) -> ChemistryRecord {
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
        system: name.to_string(),
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
        catholyte: side,
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

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn reference_app() -> ApplicationSpec {
    ApplicationSpec::default()
}

#[test]
fn power_basis_matches_hand_calculation() {
    let b = power_basis(&symmetric_record("VRB"), 50_000.0).expect("power basis");
    assert_relative_eq!(b.stack_area_m2, 127_551.020_408_163_27, max_relative = 1e-12);
    assert_relative_eq!(b.stack_cost, 28_061_224.489_795_92, max_relative = 1e-12);
    assert_relative_eq!(b.current_a, 51_020_408.163_265_3, max_relative = 1e-12);
    assert_relative_eq!(b.anolyte_coulombs_per_litre, 144_727.5, max_relative = 1e-12);
    assert_relative_eq!(
        b.max_anolyte_flow_l_per_min,
        214_762.401_501_263,
        max_relative = 1e-12
    );
    assert_relative_eq!(b.pump_cost, 6_442_872.045_037_892, max_relative = 1e-12);
    assert_relative_eq!(b.hex_cost, 500_000.0);
}

#[test]
fn cost_point_matches_hand_calculation() {
    let series = evaluate_record(
        &symmetric_record("VRB"),
        &ApplicationSpec::new(50_000.0, vec![4.0]),
        &ModelOptions::default(),
    )
    .expect("record");
    let p = series.points[0].as_ref().expect("4 h point");
    let an = &p.energy.anolyte;
    assert_relative_eq!(an.moles, 13_083_490.846_751_643, max_relative = 1e-12);
    assert_relative_eq!(an.active_species_cost, 261_669_816.935_032_87, max_relative = 1e-12);
    assert_relative_eq!(
        an.supporting_electrolyte_cost,
        13_083_490.846_751_643,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        p.energy.catholyte.storage_volume_l,
        8_722_327.231_167_762,
        max_relative = 1e-12
    );
    assert_relative_eq!(p.system_cost, 587_999_642.990_87, max_relative = 1e-12);
    assert_relative_eq!(p.delivered_kwh, 200_000.0, max_relative = 1e-12);
    assert_relative_eq!(p.cost_per_kwh, 2_939.998_214_954_35, max_relative = 1e-12);
}

#[test]
fn concrete_scenario_is_positive_and_finite() {
    let series = evaluate_record(
        &symmetric_record("VRB"),
        &ApplicationSpec::new(50_000.0, vec![4.0]),
        &ModelOptions::default(),
    )
    .expect("record");
    let b = &series.breakdown;
    assert!(b.stack_area_m2.is_finite() && b.stack_area_m2 > 0.0);
    assert!(b.stack_cost.is_finite() && b.stack_cost > 0.0);
    let cost = series.points[0].as_ref().unwrap().cost_per_kwh;
    assert!(cost.is_finite() && cost > 0.0);
}

#[test]
fn evaluation_is_deterministic() {
    let records = vec![symmetric_record("A"), symmetric_record("B")];
    let first = evaluate(&records, &reference_app(), &ModelOptions::default());
    let second = evaluate(&records, &reference_app(), &ModelOptions::default());
    assert_eq!(first, second);
}

#[test]
fn energy_costs_grow_with_duration_and_power_costs_do_not() {
    let series = evaluate_record(
        &symmetric_record("VRB"),
        &reference_app(),
        &ModelOptions::default(),
    )
    .unwrap();
    let points: Vec<_> = series.points.iter().map(|p| p.as_ref().unwrap()).collect();
    let power_part =
        |p: &cost_model::CostPoint| p.system_cost - p.energy.chemical_cost() - p.energy.vessel_cost;
    for pair in points.windows(2) {
        assert!(pair[1].energy.chemical_cost() >= pair[0].energy.chemical_cost());
        assert!(pair[1].energy.vessel_cost >= pair[0].energy.vessel_cost);
        assert_relative_eq!(power_part(pair[0]), power_part(pair[1]), max_relative = 1e-9);
    }
}

#[test]
fn power_basis_ignores_duration_list() {
    let record = symmetric_record("VRB");
    let opts = ModelOptions::default();
    let short =
        evaluate_record(&record, &ApplicationSpec::new(50_000.0, vec![1.0]), &opts).unwrap();
    let long =
        evaluate_record(&record, &ApplicationSpec::new(50_000.0, vec![2.0, 8.0, 24.0]), &opts)
            .unwrap();
    assert_eq!(short.breakdown, long.breakdown);
}

#[test]
fn normalization_round_trips() {
    let series = evaluate_record(
        &symmetric_record("VRB"),
        &reference_app(),
        &ModelOptions::default(),
    )
    .unwrap();
    for p in series.points.iter().flatten() {
        let ratio = p.system_cost / (p.cost_per_kwh * p.delivered_kwh);
        assert_relative_eq!(ratio, 1.0, max_relative = 1e-12);
    }
}

#[test]
fn one_hour_costs_more_than_sixteen_hours() {
    let series = evaluate_record(
        &symmetric_record("VRB"),
        &ApplicationSpec::new(50_000.0, vec![1.0, 16.0]),
        &ModelOptions::default(),
    )
    .unwrap();
    let costs = series.costs_per_kwh();
    let (one, sixteen) = (costs[0].unwrap(), costs[1].unwrap());
    assert_close("1 h cost", one, 3_465.059_662_976_857, 1e-10);
    assert_close("16 h cost", sixteen, 2_808.732_852_948_724, 1e-10);
    assert!(one > sixteen);
}

#[test]
fn excluded_record_never_appears_even_if_degenerate() {
    let mut broken = symmetric_record("excluded");
    broken.include = false;
    broken.cell.working_v = 0.0;
    let records = vec![broken, symmetric_record("kept")];
    let eval = evaluate(&records, &reference_app(), &ModelOptions::default());
    assert_eq!(eval.outcomes.len(), 1);
    assert!(eval.failures().is_empty());
    assert_eq!(eval.series().next().unwrap().system, "kept");
}

#[test]
fn degenerate_record_does_not_block_others() {
    let mut broken = symmetric_record("broken");
    broken.cell.current_density = 0.0;
    let records = vec![symmetric_record("first"), broken, symmetric_record("last")];
    let eval = evaluate(&records, &reference_app(), &ModelOptions::default());
    assert_eq!(eval.outcomes.len(), 3);
    let names: Vec<_> = eval.series().map(|s| s.system.as_str()).collect();
    assert_eq!(names, ["first", "last"]);
    match eval.outcomes[1].as_ref().unwrap_err() {
        CostModelError::DegenerateInput {
            system,
            stage,
            quantity,
            ..
        } => {
            assert_eq!(system, "broken");
            assert_eq!(*stage, Stage::Stack);
            assert_eq!(*quantity, "current_density");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn degenerate_inputs_report_their_stage() {
    let app = ApplicationSpec::new(1_000.0, vec![4.0]);
    let opts = ModelOptions::default();

    let mut r = symmetric_record("stoich");
    r.catholyte.stoich = 0.0;
    let err = evaluate_record(&r, &app, &opts).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Pump));

    let mut r = symmetric_record("soc");
    r.cell.min_soc = 0.0;
    let err = evaluate_record(&r, &app, &opts).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Pump));

    let mut r = symmetric_record("molar cost");
    r.anolyte.as_molar_cost = 0.0;
    let series = evaluate_record(&r, &app, &opts).expect("power basis still ok");
    let err = series.points[0].as_ref().unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Energy));
    assert_eq!(err.system(), "molar cost");
}

#[test]
fn own_side_basis_only_changes_catholyte_supporting_cost() {
    let mut r = symmetric_record("asym");
    r.catholyte.conc = 2.0;
    let app = ApplicationSpec::new(1_000.0, vec![4.0]);
    let legacy = evaluate_record(&r, &app, &ModelOptions::default()).unwrap();
    let own = evaluate_record(
        &r,
        &app,
        &ModelOptions {
            catholyte_supporting_basis: SupportingBasis::OwnSide,
        },
    )
    .unwrap();
    let a = legacy.points[0].as_ref().unwrap();
    let b = own.points[0].as_ref().unwrap();
    assert_eq!(a.energy.anolyte, b.energy.anolyte);
    assert_eq!(a.energy.catholyte.moles, b.energy.catholyte.moles);
    assert_relative_eq!(
        a.energy.catholyte.supporting_electrolyte_cost
            / b.energy.catholyte.supporting_electrolyte_cost,
        2.0 / 1.5,
        max_relative = 1e-12
    );
}

#[test]
fn many_records_keep_input_order() {
    let records: Vec<_> = (0..64)
        .map(|i| {
            let mut r = symmetric_record(&format!("chem-{i:02}"));
            r.cell.current_density = 20.0 + i as f64;
            r.include = i % 5 != 0;
            r
        })
        .collect();
    let eval = evaluate(&records, &reference_app(), &ModelOptions::default());
    let expected: Vec<_> = records
        .iter()
        .filter(|r| r.include)
        .map(|r| r.system.clone())
        .collect();
    let names: Vec<_> = eval.series().map(|s| s.system.clone()).collect();
    assert_eq!(names, expected);
}
