//! CSV 파라미터 표를 읽어 `ChemistryRecord` 목록으로 변환한다.
//!
//! 열 이름은 기존 RFB 기술 데이터베이스와 같다. include 열이 켜진 행만 변환하며,
//! 제외된 행은 다른 셀을 읽지 않으므로 값이 비어 있어도 오류가 나지 않는다.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::chemistry::{
    columns, CellParameters, ChemistryRecord, Electrolyte, Side, StackArealCosts,
};
use crate::cost_model::CostModelError;

/// 파일 자체를 읽지 못한 경우의 오류. 행 단위 오류는 `LoadedTable::failures`에 담긴다.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// 로더 옵션.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// 유량당 펌프 단가로 쓸 열 이름
    pub pump_cost_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            pump_cost_column: columns::DEFAULT_PUMP_COST.to_string(),
        }
    }
}

/// 로드 결과.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    /// 포함된(include) 행 중 변환에 성공한 레코드
    pub records: Vec<ChemistryRecord>,
    /// 포함된 행 중 변환에 실패한 행
    pub failures: Vec<CostModelError>,
    /// include가 꺼져 건너뛴 행 수
    pub excluded: usize,
}

/// include 셀 해석. 기존 데이터는 'y'를 쓴다.
pub fn parse_include(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

/// 경로에서 CSV 표를 읽는다.
pub fn load_csv(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<LoadedTable, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let table = read_csv(file, options)?;
    tracing::info!(
        path = %path.display(),
        records = table.records.len(),
        failures = table.failures.len(),
        excluded = table.excluded,
        "parameter table loaded"
    );
    Ok(table)
}

/// 임의의 reader에서 CSV 표를 읽는다.
///
/// 행은 바이트 단위로 읽고 셀마다 UTF-8로 해석한다. 인코딩이 깨진 셀은 그 행만 실패시킨다.
pub fn read_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<LoadedTable, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let header_index: HashMap<String, usize> = rdr
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (String::from_utf8_lossy(h).into_owned(), i))
        .collect();
    if !header_index.contains_key(columns::INCLUDE) {
        return Err(DatasetError::MissingColumn(columns::INCLUDE));
    }

    let mut table = LoadedTable::default();
    for (row_no, row) in rdr.byte_records().enumerate() {
        let row = row?;
        let cells = Row {
            index: &header_index,
            row: &row,
            system: row_name(&header_index, &row, row_no),
        };
        let included = cells
            .bytes(columns::INCLUDE)
            .and_then(|b| std::str::from_utf8(b).ok())
            .is_some_and(parse_include);
        if !included {
            tracing::debug!(system = %cells.system, "row excluded");
            table.excluded += 1;
            continue;
        }
        match cells.to_record(options) {
            Ok(record) => table.records.push(record),
            Err(err) => {
                tracing::warn!("skipping row: {err}");
                table.failures.push(err);
            }
        }
    }
    Ok(table)
}

fn row_name(index: &HashMap<String, usize>, row: &csv::ByteRecord, row_no: usize) -> String {
    index
        .get(columns::SYSTEM)
        .and_then(|&i| row.get(i))
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .unwrap_or_else(|| format!("row {}", row_no + 1))
}

struct Row<'a> {
    index: &'a HashMap<String, usize>,
    row: &'a csv::ByteRecord,
    system: String,
}

impl Row<'_> {
    fn bytes(&self, column: &str) -> Option<&[u8]> {
        self.index
            .get(column)
            .and_then(|&i| self.row.get(i))
            .filter(|s| !s.is_empty())
    }

    /// 비어 있지 않은 셀을 문자열로. 없으면 None, UTF-8이 아니면 InvalidField.
    fn raw(&self, column: &str) -> Result<Option<&str>, CostModelError> {
        self.bytes(column)
            .map(|b| {
                std::str::from_utf8(b).map_err(|_| CostModelError::InvalidField {
                    system: self.system.clone(),
                    field: column.to_string(),
                    raw: String::from_utf8_lossy(b).into_owned(),
                })
            })
            .transpose()
    }

    fn num(&self, column: &str) -> Result<f64, CostModelError> {
        let raw = self.raw(column)?.ok_or_else(|| CostModelError::MissingField {
            system: self.system.clone(),
            field: column.to_string(),
        })?;
        raw.parse::<f64>().map_err(|_| CostModelError::InvalidField {
            system: self.system.clone(),
            field: column.to_string(),
            raw: raw.to_string(),
        })
    }

    fn electrolyte(&self, side: Side) -> Result<Electrolyte, CostModelError> {
        let col = |suffix: &str| format!("{}_{}", side.column_prefix(), suffix);
        Ok(Electrolyte {
            conc: self.num(&col(columns::CONC))?,
            n_e: self.num(&col(columns::NE))?,
            stoich: self.num(&col(columns::STOICH))?,
            ci_conc: self.num(&col(columns::CI_CONC))?,
            as_molar_cost: self.num(&col(columns::AS_MOLAR_COST))?,
            ci_molar_cost: self.num(&col(columns::CI_MOLAR_COST))?,
            storage_cost: self.num(&col(columns::STORAGE_COST))?,
        })
    }

    fn to_record(&self, options: &LoadOptions) -> Result<ChemistryRecord, CostModelError> {
        if self.raw(columns::SYSTEM)?.is_none() {
            return Err(CostModelError::MissingField {
                system: self.system.clone(),
                field: columns::SYSTEM.to_string(),
            });
        }
        Ok(ChemistryRecord {
            system: self.system.clone(),
            include: true,
            cell: CellParameters {
                current_density: self.num(columns::CURRENT_DENSITY)?,
                eff_sys_d: self.num(columns::EFF_SYS_D)?,
                eff_coul_rt: self.num(columns::EFF_COUL_RT)?,
                working_v: self.num(columns::WORKING_V)?,
                dsoc_per_pass: self.num(columns::DSOC_PER_PASS)?,
                soc_frac: self.num(columns::SOC_FRAC)?,
                min_soc: self.num(columns::MIN_SOC)?,
            },
            anolyte: self.electrolyte(Side::Anolyte)?,
            catholyte: self.electrolyte(Side::Catholyte)?,
            stack_costs: StackArealCosts {
                bipolar_plate: self.num(columns::BIPOLAR_PLATE)?,
                electrode: self.num(columns::ELECTRODE)?,
                membrane: self.num(columns::MEMBRANE)?,
                other: self.num(columns::OTHER_AREAL)?,
            },
            pump_cost_per_flow: self.num(&options.pump_cost_column)?,
            hex_cost_per_kw: self.num(columns::HEX_COST)?,
        })
    }
}
