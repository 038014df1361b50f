//! CLI 출력. 평가가 끝난 결과만 받아 표준 출력에 쓴다.

use std::path::Path;

use crate::application::ApplicationSpec;
use crate::cost_model::{CostModelError, Evaluation};
use crate::dataset::LoadedTable;
use crate::i18n::{keys, Translator};
use crate::report::{self, Benchmark};

pub fn print_load_summary(tr: &Translator, path: &Path, table: &LoadedTable) {
    println!(
        "{}",
        tr.fill(
            keys::LOAD_SUMMARY,
            &[
                ("path", path.display().to_string()),
                ("records", table.records.len().to_string()),
                ("excluded", table.excluded.to_string()),
                ("failures", table.failures.len().to_string()),
            ],
        )
    );
}

pub fn print_application(tr: &Translator, app: &ApplicationSpec) {
    let hours: Vec<String> = app.discharge_hours.iter().map(|h| h.to_string()).collect();
    println!(
        "{}",
        tr.fill(
            keys::APPLICATION,
            &[
                ("power", app.power_kw.to_string()),
                ("hours", hours.join(", ")),
            ],
        )
    );
}

/// 화학계별 스택/펌프 비용 [$/kW].
pub fn print_power_diagnostics(tr: &Translator, evaluation: &Evaluation) {
    for series in evaluation.series() {
        let d = report::power_diagnostics(series);
        println!(
            "{}",
            tr.fill(
                keys::POWER_DIAGNOSTICS,
                &[
                    ("system", d.system),
                    ("stack", d.stack_cost_per_kw.to_string()),
                    ("pump", d.pump_cost_per_kw.to_string()),
                ],
            )
        );
    }
}

pub fn print_results(
    tr: &Translator,
    app: &ApplicationSpec,
    evaluation: &Evaluation,
    benchmark: &Benchmark,
) {
    println!("{}", tr.t(keys::RESULTS_HEADING));
    let rows = report::table_rows(evaluation);
    print!("{}", report::render_table(app, &rows));
    if let Some(first) = benchmark.series(&app.discharge_hours).first() {
        println!(
            "{}",
            tr.fill(
                keys::BENCHMARK_LINE,
                &[
                    ("label", benchmark.label.clone()),
                    ("cost", benchmark.cost_per_kwh.to_string()),
                    ("from", first[0].to_string()),
                ],
            )
        );
    }
}

/// 로드 단계와 평가 단계의 실패를 모두 출력한다.
pub fn print_failures(tr: &Translator, load_failures: &[CostModelError], evaluation: &Evaluation) {
    let eval_failures = evaluation.failures();
    if load_failures.is_empty() && eval_failures.is_empty() {
        return;
    }
    println!("{}", tr.t(keys::FAILURES_HEADING));
    for err in load_failures.iter().chain(eval_failures) {
        println!("{}", failure_line(tr, err));
    }
}

fn failure_line(tr: &Translator, err: &CostModelError) -> String {
    let stage = err
        .stage()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "input".to_string());
    tr.fill(
        keys::FAILURE_LINE,
        &[("stage", stage), ("error", err.to_string())],
    )
}
