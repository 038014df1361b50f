use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::application::ApplicationSpec;
use crate::config::{Config, ConfigError};
use crate::cost_model::{self, Evaluation};
use crate::dataset::{self, DatasetError};
use crate::i18n::{self, Translator};
use crate::report;
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("export error: {0}")]
    Export(#[from] csv::Error),
    #[error("invalid application: {0}")]
    InvalidApplication(&'static str),
}

/// 명령행 인자. 지정한 값은 config.toml보다 우선한다.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rfb_cost_cli",
    about = "Levelized capital cost of redox flow battery chemistries"
)]
pub struct CliArgs {
    /// 파라미터 표 CSV
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// 목표 출력 [kW]
    #[arg(long)]
    pub power: Option<f64>,
    /// 방전 시간 목록 [h], 쉼표 구분
    #[arg(long, value_delimiter = ',')]
    pub hours: Option<Vec<f64>>,
    /// 언어 (auto/ko/en-us)
    #[arg(long, short = 'L', default_value = "auto")]
    pub lang: String,
    /// 결과 CSV 저장 경로
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// 디버그 로그 출력
    #[arg(long, short)]
    pub verbose: bool,
}

impl CliArgs {
    /// 설정값에 명령행 값을 덮어쓴 적용 조건.
    pub fn application(&self, config: &Config) -> Result<ApplicationSpec, AppError> {
        let mut app = config.application.clone();
        if let Some(power) = self.power {
            app.power_kw = power;
        }
        if let Some(hours) = &self.hours {
            app.discharge_hours = hours.clone();
        }
        if app.discharge_hours.is_empty() {
            return Err(AppError::InvalidApplication("discharge time list is empty"));
        }
        Ok(app)
    }

    pub fn data_path(&self, config: &Config) -> PathBuf {
        self.data
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data_path))
    }
}

/// stderr로 tracing 로그를 내보낸다.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 언어 설정을 해석해 번역기를 만든다. 설정을 읽지 못했으면 플래그와 시스템 로케일만 본다.
pub fn translator(args_lang: &str, config: Option<&Config>) -> Translator {
    let lang = i18n::resolve_language(args_lang, config.map(|c| c.language.as_str()));
    let pack_dir = config.and_then(|c| c.language_pack_dir.as_deref());
    Translator::new_with_pack(&lang, pack_dir)
}

/// CSV를 읽고 평가한 뒤 결과를 출력한다.
pub fn run(config: &Config, args: &CliArgs, tr: &Translator) -> Result<Evaluation, AppError> {
    let app = args.application(config)?;
    let path = args.data_path(config);
    let table = dataset::load_csv(&path, &config.load_options())?;
    ui_cli::print_load_summary(tr, &path, &table);
    ui_cli::print_application(tr, &app);

    let evaluation = cost_model::evaluate(&table.records, &app, &config.model_options());
    if evaluation.outcomes.is_empty() && table.failures.is_empty() {
        println!("{}", tr.t(i18n::keys::NO_RECORDS));
        return Ok(evaluation);
    }

    ui_cli::print_power_diagnostics(tr, &evaluation);
    ui_cli::print_results(tr, &app, &evaluation, &config.benchmark);
    ui_cli::print_failures(tr, &table.failures, &evaluation);

    if let Some(out) = &args.output {
        report::write_csv(&evaluation, File::create(out)?)?;
        println!(
            "{}",
            tr.fill(i18n::keys::EXPORT_DONE, &[("path", out.display().to_string())])
        );
    }
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config_application() {
        let args =
            CliArgs::try_parse_from(["rfb_cost_cli", "--power", "1000", "--hours", "2,4"]).unwrap();
        let app = args.application(&Config::default()).unwrap();
        assert_eq!(app.power_kw, 1000.0);
        assert_eq!(app.discharge_hours, vec![2.0, 4.0]);
    }

    #[test]
    fn data_path_defaults_to_config() {
        let args = CliArgs::try_parse_from(["rfb_cost_cli"]).unwrap();
        let cfg = Config::default();
        assert_eq!(args.data_path(&cfg), PathBuf::from(&cfg.data_path));
        assert_eq!(args.lang, "auto");
    }

    #[test]
    fn configured_language_reaches_error_prefix() {
        let cfg = Config {
            language: "ko".into(),
            ..Config::default()
        };
        let tr = translator("auto", Some(&cfg));
        assert_eq!(tr.t(i18n::keys::ERROR_PREFIX), "오류");

        let tr = translator("en-us", Some(&cfg));
        assert_eq!(tr.t(i18n::keys::ERROR_PREFIX), "Error");
    }
}
