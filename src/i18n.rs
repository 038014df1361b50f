use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";

    pub const LOAD_SUMMARY: &str = "cli.load_summary";
    pub const APPLICATION: &str = "cli.application";
    pub const POWER_DIAGNOSTICS: &str = "cli.power_diagnostics";
    pub const RESULTS_HEADING: &str = "cli.results_heading";
    pub const BENCHMARK_LINE: &str = "cli.benchmark_line";
    pub const FAILURES_HEADING: &str = "cli.failures_heading";
    pub const FAILURE_LINE: &str = "cli.failure_line";
    pub const NO_RECORDS: &str = "cli.no_records";
    pub const EXPORT_DONE: &str = "cli.export_done";

    pub const GUI_TITLE: &str = "gui.title";
    pub const GUI_OPEN_CSV: &str = "gui.open_csv";
    pub const GUI_RELOAD: &str = "gui.reload";
    pub const GUI_POWER: &str = "gui.power";
    pub const GUI_HOURS: &str = "gui.hours";
    pub const GUI_HOURS_INVALID: &str = "gui.hours_invalid";
    pub const GUI_BASIS: &str = "gui.basis";
    pub const GUI_BASIS_ANOLYTE: &str = "gui.basis.anolyte";
    pub const GUI_BASIS_OWN: &str = "gui.basis.own";
    pub const GUI_SHOW_BENCHMARK: &str = "gui.show_benchmark";
    pub const GUI_X_AXIS: &str = "gui.x_axis";
    pub const GUI_Y_AXIS: &str = "gui.y_axis";
    pub const GUI_TABLE: &str = "gui.table";
    pub const GUI_DIAGNOSTICS: &str = "gui.diagnostics";
    pub const GUI_FAILURES: &str = "gui.failures";
    pub const GUI_NO_DATA: &str = "gui.no_data";
    pub const GUI_EXPORT: &str = "gui.export";
    pub const GUI_SAVE_SETTINGS: &str = "gui.save_settings";
    pub const GUI_SAVED: &str = "gui.saved";
    pub const GUI_LANGUAGE: &str = "gui.language";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir.and_then(|dir| load_overrides(dir, lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    /// 언어팩 → 내장 문자열 순으로 조회한다.
    pub fn lookup(&self, key: &str) -> Option<String> {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return Some(v.clone());
        }
        let builtin = match self.lang {
            Language::En => en(key),
            Language::Ko => ko(key).or_else(|| en(key)),
        };
        builtin.map(str::to_string)
    }

    /// 번역을 가져온다. 어디에도 없으면 키 자체를 돌려준다.
    pub fn t(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역.
    pub fn fill(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        "ko" | "ko-kr" => Some("ko".into()),
        "en" | "en-us" | "en-uk" => Some("en-us".into()),
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "오류",
        LOAD_SUMMARY => "{path}: 포함 {records}건, 제외 {excluded}건, 오류 {failures}건",
        APPLICATION => "적용 조건: {power} kW, 방전 시간 {hours} h",
        POWER_DIAGNOSTICS => "{system} | 스택 비용: {stack} $/kW, 펌프 비용: {pump} $/kW",
        RESULTS_HEADING => "\n-- 방전 시간별 시스템 비용 ($/kWh) --",
        BENCHMARK_LINE => "기준선 {label}: {cost} $/kWh ({from} h 이상)",
        FAILURES_HEADING => "\n-- 평가 실패 --",
        FAILURE_LINE => "[{stage}] {error}",
        NO_RECORDS => "평가할 레코드가 없습니다.",
        EXPORT_DONE => "결과를 {path}에 저장했습니다.",
        GUI_TITLE => "레독스 흐름전지 비용 비교",
        GUI_OPEN_CSV => "CSV 열기",
        GUI_RELOAD => "다시 불러오기",
        GUI_POWER => "출력 [kW]",
        GUI_HOURS => "방전 시간 [h]",
        GUI_HOURS_INVALID => "방전 시간 목록을 해석할 수 없습니다.",
        GUI_BASIS => "양극액 지지전해질 농도 기준",
        GUI_BASIS_ANOLYTE => "an_conc (기존)",
        GUI_BASIS_OWN => "cath_conc",
        GUI_SHOW_BENCHMARK => "기준선 표시",
        GUI_X_AXIS => "시스템 사양, 에너지/출력 (h)",
        GUI_Y_AXIS => "시스템 구성 비용 ($/kWh)",
        GUI_TABLE => "결과 표",
        GUI_DIAGNOSTICS => "출력 기준 비용 ($/kW)",
        GUI_FAILURES => "실패 목록",
        GUI_NO_DATA => "CSV 파일을 열어 주세요.",
        GUI_EXPORT => "CSV 내보내기",
        GUI_SAVE_SETTINGS => "설정 저장",
        GUI_SAVED => "저장했습니다.",
        GUI_LANGUAGE => "언어",
        _ => return None,
    };
    Some(s)
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "Error",
        LOAD_SUMMARY => "{path}: {records} included, {excluded} excluded, {failures} failed",
        APPLICATION => "Application: {power} kW, discharge times {hours} h",
        POWER_DIAGNOSTICS => "{system} | Stack Cost: {stack} $/kW, Pump cost: {pump} $/kW",
        RESULTS_HEADING => "\n-- System cost by discharge time ($/kWh) --",
        BENCHMARK_LINE => "Reference {label}: {cost} $/kWh (from {from} h)",
        FAILURES_HEADING => "\n-- Failed evaluations --",
        FAILURE_LINE => "[{stage}] {error}",
        NO_RECORDS => "No records to evaluate.",
        EXPORT_DONE => "Results written to {path}.",
        GUI_TITLE => "Redox Flow Battery Cost Comparison",
        GUI_OPEN_CSV => "Open CSV",
        GUI_RELOAD => "Reload",
        GUI_POWER => "Power [kW]",
        GUI_HOURS => "Discharge times [h]",
        GUI_HOURS_INVALID => "Cannot parse the discharge time list.",
        GUI_BASIS => "Catholyte supporting-electrolyte basis",
        GUI_BASIS_ANOLYTE => "an_conc (legacy)",
        GUI_BASIS_OWN => "cath_conc",
        GUI_SHOW_BENCHMARK => "Show reference",
        GUI_X_AXIS => "System specification, Energy/Power (h)",
        GUI_Y_AXIS => "System component cost ($.kWh-1)",
        GUI_TABLE => "Results",
        GUI_DIAGNOSTICS => "Power-basis cost ($/kW)",
        GUI_FAILURES => "Failures",
        GUI_NO_DATA => "Open a CSV parameter table.",
        GUI_EXPORT => "Export CSV",
        GUI_SAVE_SETTINGS => "Save settings",
        GUI_SAVED => "Saved.",
        GUI_LANGUAGE => "Language",
        _ => return None,
    };
    Some(s)
}
