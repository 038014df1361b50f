//! 결과 가공(진단값, 표, CSV 내보내기) 테스트.
use rfb_cost_toolbox::{
    application::ApplicationSpec,
    chemistry::{CellParameters, ChemistryRecord, Electrolyte, StackArealCosts},
    cost_model::{evaluate, ModelOptions},
    report::{power_diagnostics, render_table, table_rows, write_csv},
};

fn record(name: &str, as_molar_cost: f64) -> ChemistryRecord {
    let side = Electrolyte {
        conc: 1.5,
        n_e: 2.0,
        stoich: 2.0,
        ci_conc: 3.0,
        as_molar_cost,
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

#[test]
fn power_diagnostics_are_truncated_per_kw() {
    let eval = evaluate(
        &[record("VRB", 20.0)],
        &ApplicationSpec::new(50_000.0, vec![4.0]),
        &ModelOptions::default(),
    );
    let d = power_diagnostics(eval.series().next().unwrap());
    assert_eq!(d.system, "VRB");
    assert_eq!(d.stack_cost_per_kw, 561);
    assert_eq!(d.pump_cost_per_kw, 128);
}

#[test]
fn table_marks_failed_durations_and_drops_failed_records() {
    let mut broken = record("Broken", 20.0);
    broken.cell.eff_sys_d = 0.0;
    let app = ApplicationSpec::new(50_000.0, vec![0.0, 4.0]);
    let eval = evaluate(
        &[record("VRB", 20.0), broken],
        &app,
        &ModelOptions::default(),
    );
    let rows = table_rows(&eval);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].costs, vec![None, Some(2939)]);

    let text = render_table(&app, &rows);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "system       0h       4h");
    assert_eq!(lines[1], "VRB           -     2939");
}

#[test]
fn csv_export_has_one_line_per_successful_point() {
    let app = ApplicationSpec::new(50_000.0, vec![0.0, 1.0, 4.0]);
    let eval = evaluate(
        &[record("VRB", 20.0), record("Cheap", 2.0)],
        &app,
        &ModelOptions::default(),
    );
    let mut buf = Vec::new();
    write_csv(&eval, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("system,discharge_h,stack_cost"));
    assert!(lines[0].ends_with("cost_per_kwh"));
    // 0h는 두 화학계 모두 실패
    assert_eq!(lines.len(), 1 + 4);
    assert!(lines[1].starts_with("VRB,1.0,"));
    assert!(lines[3].starts_with("Cheap,1.0,"));
}
