use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::application::ApplicationSpec;
use crate::chemistry::columns;
use crate::cost_model::{ModelOptions, SupportingBasis, CATHOLYTE_SUPPORTING_BASIS};
use crate::dataset::LoadOptions;
use crate::report::Benchmark;

const CONFIG_FILE: &str = "config.toml";

/// 모델/로더 관련 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 유량당 펌프 단가로 쓸 열 (weber_pump_cost / flow_pump_cost / base_pump_cost)
    pub pump_cost_column: String,
    pub catholyte_supporting_basis: SupportingBasis,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pump_cost_column: columns::DEFAULT_PUMP_COST.to_string(),
            catholyte_supporting_basis: CATHOLYTE_SUPPORTING_BASIS,
        }
    }
}

/// 그래프 표시 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// y축 상한 [$/kWh]
    pub y_max: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { y_max: 700.0 }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub language_pack_dir: Option<String>,
    /// 파라미터 표 CSV 경로
    pub data_path: String,
    pub application: ApplicationSpec,
    pub model: ModelConfig,
    pub benchmark: Benchmark,
    pub plot: PlotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            data_path: "RFB_technical_database_2019.csv".to_string(),
            application: ApplicationSpec::default(),
            model: ModelConfig::default(),
            benchmark: Benchmark::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl Config {
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            catholyte_supporting_basis: self.model.catholyte_supporting_basis,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            pump_cost_column: self.model.pump_cost_column.clone(),
        }
    }

    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_config(self, Path::new(CONFIG_FILE))
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_create(Path::new(CONFIG_FILE))
}

/// 주어진 경로에서 설정을 읽고, 파일이 없으면 기본값을 써 둔다.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        tracing::info!(path = %path.display(), "default config written");
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}
