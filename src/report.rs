//! 평가 결과를 표/벤치마크/CSV로 가공한다. 계산은 하지 않고 완성된 결과만 받는다.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::application::ApplicationSpec;
use crate::cost_model::{ChemistrySeries, Evaluation};

/// 비교용 기준 비용선(예: 리튬이온 NMC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Benchmark {
    pub label: String,
    /// 기준 비용 [$/kWh]
    pub cost_per_kwh: f64,
    /// 앞에서부터 건너뛸 방전 시간 개수
    pub skip_durations: usize,
}

impl Default for Benchmark {
    fn default() -> Self {
        Self {
            label: "Li-ion (NMC) 2014 NREL".to_string(),
            cost_per_kwh: 180.0,
            skip_durations: 2,
        }
    }
}

impl Benchmark {
    /// (방전 시간, 비용) 점 목록. 건너뛴 뒤 남는 시간이 없으면 빈 목록.
    pub fn series(&self, discharge_hours: &[f64]) -> Vec<[f64; 2]> {
        discharge_hours
            .iter()
            .skip(self.skip_durations)
            .map(|&t| [t, self.cost_per_kwh])
            .collect()
    }
}

/// 플롯 시리즈에 순환 적용하는 마커.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Diamond,
    Point,
    Circle,
    Star,
    Hexagon,
    Square,
    TriangleDown,
}

pub const MARKER_CYCLE: [Marker; 7] = [
    Marker::Diamond,
    Marker::Point,
    Marker::Circle,
    Marker::Star,
    Marker::Hexagon,
    Marker::Square,
    Marker::TriangleDown,
];

/// n번째 시리즈의 마커.
pub fn marker_for(index: usize) -> Marker {
    MARKER_CYCLE[index % MARKER_CYCLE.len()]
}

/// 출력 기준 진단값(정수 절삭, $/kW).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerDiagnostics {
    pub system: String,
    pub stack_cost_per_kw: i64,
    pub pump_cost_per_kw: i64,
}

pub fn power_diagnostics(series: &ChemistrySeries) -> PowerDiagnostics {
    PowerDiagnostics {
        system: series.system.clone(),
        stack_cost_per_kw: series.stack_cost_per_kw().trunc() as i64,
        pump_cost_per_kw: series.pump_cost_per_kw().trunc() as i64,
    }
}

/// 결과 표 한 행. 방전 시간별 $/kWh를 정수로 절삭한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub system: String,
    pub costs: Vec<Option<i64>>,
}

pub fn table_rows(evaluation: &Evaluation) -> Vec<TableRow> {
    evaluation
        .series()
        .map(|s| TableRow {
            system: s.system.clone(),
            costs: s
                .costs_per_kwh()
                .into_iter()
                .map(|c| c.map(|v| v.trunc() as i64))
                .collect(),
        })
        .collect()
}

/// 고정폭 텍스트 표로 렌더링한다.
pub fn render_table(app: &ApplicationSpec, rows: &[TableRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.system.chars().count())
        .max()
        .unwrap_or(0)
        .max("system".len());
    let mut out = format!("{:<name_width$}", "system");
    for t in &app.discharge_hours {
        out.push_str(&format!(" {:>8}", format!("{t}h")));
    }
    out.push('\n');
    for row in rows {
        out.push_str(&format!("{:<name_width$}", row.system));
        for cost in &row.costs {
            match cost {
                Some(v) => out.push_str(&format!(" {v:>8}")),
                None => out.push_str(&format!(" {:>8}", "-")),
            }
        }
        out.push('\n');
    }
    out
}

/// CSV 내보내기 한 줄.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    system: &'a str,
    discharge_h: f64,
    stack_cost: f64,
    pump_cost: f64,
    hex_cost: f64,
    an_chem_cost: f64,
    an_ci_cost: f64,
    cath_chem_cost: f64,
    cath_ci_cost: f64,
    an_storage_vol_l: f64,
    cath_storage_vol_l: f64,
    vessel_cost: f64,
    system_cost: f64,
    delivered_kwh: f64,
    cost_per_kwh: f64,
}

/// 성공한 모든 (화학계, 방전 시간) 결과를 CSV로 쓴다.
pub fn write_csv<W: Write>(evaluation: &Evaluation, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for series in evaluation.series() {
        let b = &series.breakdown;
        for point in series.points.iter().flatten() {
            wtr.serialize(ExportRow {
                system: &series.system,
                discharge_h: point.discharge_h,
                stack_cost: b.stack_cost,
                pump_cost: b.pump_cost,
                hex_cost: b.hex_cost,
                an_chem_cost: point.energy.anolyte.active_species_cost,
                an_ci_cost: point.energy.anolyte.supporting_electrolyte_cost,
                cath_chem_cost: point.energy.catholyte.active_species_cost,
                cath_ci_cost: point.energy.catholyte.supporting_electrolyte_cost,
                an_storage_vol_l: point.energy.anolyte.storage_volume_l,
                cath_storage_vol_l: point.energy.catholyte.storage_volume_l,
                vessel_cost: point.energy.vessel_cost,
                system_cost: point.system_cost,
                delivered_kwh: point.delivered_kwh,
                cost_per_kwh: point.cost_per_kwh,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_starts_after_skipped_durations() {
        let b = Benchmark::default();
        let pts = b.series(&[1.0, 2.0, 4.0, 6.0, 8.0, 16.0]);
        assert_eq!(pts.first(), Some(&[4.0, 180.0]));
        assert_eq!(pts.len(), 4);
        assert!(b.series(&[1.0]).is_empty());
    }

    #[test]
    fn markers_cycle() {
        assert_eq!(marker_for(0), Marker::Diamond);
        assert_eq!(marker_for(6), Marker::TriangleDown);
        assert_eq!(marker_for(7), Marker::Diamond);
    }

    #[test]
    fn table_shows_dash_for_failed_duration() {
        let app = ApplicationSpec::new(1.0, vec![1.0, 2.0]);
        let rows = vec![TableRow {
            system: "V".into(),
            costs: vec![Some(512), None],
        }];
        let text = render_table(&app, &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "system       1h       2h");
        assert_eq!(lines[1], "V           512        -");
    }
}
