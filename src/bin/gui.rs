#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점. 방전 시간별 $/kWh 곡선을 그린다.

use eframe::{egui, App, Frame};
use egui_plot::{Legend, Line, LineStyle, MarkerShape, Plot, PlotPoints, Points};
use image::GenericImageView;
use rfb_cost_toolbox::{
    application::{self, ApplicationSpec},
    config,
    cost_model::{self, Evaluation, ModelOptions, SupportingBasis},
    dataset::{self, LoadedTable},
    i18n::{self, keys},
    report::{self, Marker},
};
use rfd::FileDialog;
use std::{env, fs, path::Path, path::PathBuf};

fn main() -> Result<(), eframe::Error> {
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }
    rfb_cost_toolbox::app::init_logging(false);

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(1100.0, 720.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("config not loaded, using defaults: {e}");
            config::Config::default()
        }
    };
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "RFB Cost Toolbox",
        native,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::warn!("font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["rfb_icon.png", "icon.png", "assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .push(font_name);
    ctx.set_fonts(fonts);
}

/// 한글을 표시하기 위해 프로젝트/시스템 폰트를 찾아 적용한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<PathBuf> = vec![PathBuf::from("assets/fonts/malgun.ttf")];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["malgun.ttf", "gulim.ttc"].iter().map(|f| fonts.join(f)));
    }
    candidates.extend(
        [
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
            "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        ]
        .iter()
        .map(PathBuf::from),
    );
    for p in candidates {
        if p.exists() {
            let bytes =
                fs::read(&p).map_err(|e| format!("Failed to read font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found; Hangul labels may not render.".into())
}

fn marker_shape(marker: Marker) -> (MarkerShape, f32) {
    match marker {
        Marker::Diamond => (MarkerShape::Diamond, 5.0),
        Marker::Point => (MarkerShape::Circle, 2.5),
        Marker::Circle => (MarkerShape::Circle, 5.0),
        Marker::Star => (MarkerShape::Asterisk, 6.0),
        // egui_plot에는 육각형 마커가 없다
        Marker::Hexagon => (MarkerShape::Cross, 5.0),
        Marker::Square => (MarkerShape::Square, 5.0),
        Marker::TriangleDown => (MarkerShape::Down, 5.0),
    }
}

const SERIES_COLORS: [egui::Color32; 8] = [
    egui::Color32::from_rgb(31, 119, 180),
    egui::Color32::from_rgb(255, 127, 14),
    egui::Color32::from_rgb(44, 160, 44),
    egui::Color32::from_rgb(214, 39, 40),
    egui::Color32::from_rgb(148, 103, 189),
    egui::Color32::from_rgb(140, 86, 75),
    egui::Color32::from_rgb(227, 119, 194),
    egui::Color32::from_rgb(23, 190, 207),
];

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    lang_input: String,
    data_path: Option<PathBuf>,
    table: Option<LoadedTable>,
    load_error: Option<String>,
    power_kw: f64,
    hours_input: String,
    hours_error: bool,
    basis: SupportingBasis,
    show_benchmark: bool,
    evaluation: Evaluation,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        tracing::info!("GUI language resolved: {lang_code}");
        let hours_input = config
            .application
            .discharge_hours
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let data_path = Some(PathBuf::from(&config.data_path)).filter(|p| p.exists());
        let mut s = Self {
            lang_input: config.language.clone(),
            power_kw: config.application.power_kw,
            basis: config.model.catholyte_supporting_basis,
            config,
            tr,
            data_path,
            table: None,
            load_error: None,
            hours_input,
            hours_error: false,
            show_benchmark: true,
            evaluation: Evaluation::default(),
            status: None,
        };
        s.reload();
        s
    }

    fn txt(&self, key: &str) -> String {
        self.tr.t(key)
    }

    fn application(&self) -> Option<ApplicationSpec> {
        application::parse_hours(&self.hours_input).map(|h| ApplicationSpec::new(self.power_kw, h))
    }

    /// 현재 경로에서 CSV를 다시 읽는다.
    fn reload(&mut self) {
        self.table = None;
        self.load_error = None;
        if let Some(path) = &self.data_path {
            match dataset::load_csv(path, &self.config.load_options()) {
                Ok(table) => self.table = Some(table),
                Err(e) => self.load_error = Some(e.to_string()),
            }
        }
        self.recompute();
    }

    /// 입력이 바뀌면 전체를 다시 평가한다.
    fn recompute(&mut self) {
        let app = self.application();
        self.hours_error = app.is_none();
        self.evaluation = match (&self.table, app) {
            (Some(table), Some(app)) => cost_model::evaluate(
                &table.records,
                &app,
                &ModelOptions {
                    catholyte_supporting_basis: self.basis,
                },
            ),
            _ => Evaluation::default(),
        };
    }

    fn ui_controls(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        ui.horizontal(|ui| {
            if ui.button(self.txt(keys::GUI_OPEN_CSV)).clicked() {
                if let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
                    self.config.data_path = path.display().to_string();
                    self.data_path = Some(path);
                    self.reload();
                }
            }
            if ui.button(self.txt(keys::GUI_RELOAD)).clicked() {
                self.reload();
            }
            if let Some(p) = &self.data_path {
                ui.label(p.display().to_string());
            }
        });
        ui.horizontal(|ui| {
            ui.label(self.txt(keys::GUI_POWER));
            let power = egui::DragValue::new(&mut self.power_kw)
                .speed(100.0)
                .clamp_range(1.0..=1.0e7);
            changed |= ui.add(power).changed();
            ui.separator();
            ui.label(self.txt(keys::GUI_HOURS));
            changed |= ui.text_edit_singleline(&mut self.hours_input).changed();
        });
        if self.hours_error {
            ui.colored_label(ui.visuals().error_fg_color, self.txt(keys::GUI_HOURS_INVALID));
        }
        ui.horizontal(|ui| {
            ui.label(self.txt(keys::GUI_BASIS));
            let anolyte = self.txt(keys::GUI_BASIS_ANOLYTE);
            let own = self.txt(keys::GUI_BASIS_OWN);
            changed |= ui
                .selectable_value(&mut self.basis, SupportingBasis::AnolyteConcentration, anolyte)
                .changed();
            changed |= ui
                .selectable_value(&mut self.basis, SupportingBasis::OwnSide, own)
                .changed();
            ui.separator();
            let label = self.txt(keys::GUI_SHOW_BENCHMARK);
            ui.checkbox(&mut self.show_benchmark, label);
        });
        if changed {
            self.recompute();
        }
    }

    fn ui_plot(&self, ui: &mut egui::Ui) {
        let hours = self
            .application()
            .map(|a| a.discharge_hours)
            .unwrap_or_default();
        let benchmark = &self.config.benchmark;
        let text_color = ui.visuals().text_color();
        Plot::new("cost_vs_duration")
            .legend(Legend::default())
            .x_axis_label(self.txt(keys::GUI_X_AXIS))
            .y_axis_label(self.txt(keys::GUI_Y_AXIS))
            .include_y(0.0)
            .include_y(self.config.plot.y_max)
            .height(ui.available_height() * 0.6)
            .show(ui, |plot_ui| {
                for (idx, series) in self.evaluation.series().enumerate() {
                    let pts: Vec<[f64; 2]> = hours
                        .iter()
                        .zip(series.costs_per_kwh())
                        .filter_map(|(&t, c)| c.map(|c| [t, c]))
                        .collect();
                    let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
                    let (shape, radius) = marker_shape(report::marker_for(idx));
                    plot_ui.line(
                        Line::new(PlotPoints::from(pts.clone()))
                            .color(color)
                            .name(&series.system),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(pts))
                            .shape(shape)
                            .radius(radius)
                            .filled(true)
                            .color(color)
                            .name(&series.system),
                    );
                }
                if self.show_benchmark {
                    let pts = benchmark.series(&hours);
                    if !pts.is_empty() {
                        plot_ui.line(
                            Line::new(PlotPoints::from(pts))
                                .color(text_color)
                                .style(LineStyle::dashed_loose())
                                .name(&benchmark.label),
                        );
                    }
                }
            });
    }

    fn ui_tables(&mut self, ui: &mut egui::Ui) {
        let Some(app) = self.application() else {
            return;
        };
        ui.heading(self.txt(keys::GUI_TABLE));
        let rows = report::table_rows(&self.evaluation);
        egui::Grid::new("results_grid").striped(true).show(ui, |ui| {
            ui.strong("system");
            for t in &app.discharge_hours {
                ui.strong(format!("{t} h"));
            }
            ui.end_row();
            for row in &rows {
                ui.label(row.system.as_str());
                for c in &row.costs {
                    ui.label(c.map(|v| v.to_string()).unwrap_or_else(|| "-".into()));
                }
                ui.end_row();
            }
        });

        ui.add_space(8.0);
        ui.heading(self.txt(keys::GUI_DIAGNOSTICS));
        egui::Grid::new("diag_grid").striped(true).show(ui, |ui| {
            ui.strong("system");
            ui.strong("stack");
            ui.strong("pump");
            ui.end_row();
            for series in self.evaluation.series() {
                let d = report::power_diagnostics(series);
                ui.label(d.system);
                ui.label(d.stack_cost_per_kw.to_string());
                ui.label(d.pump_cost_per_kw.to_string());
                ui.end_row();
            }
        });

        let load_failures = self.table.as_ref().map(|t| t.failures.as_slice()).unwrap_or(&[]);
        let eval_failures = self.evaluation.failures();
        if !load_failures.is_empty() || !eval_failures.is_empty() {
            ui.add_space(8.0);
            ui.heading(self.txt(keys::GUI_FAILURES));
            for err in load_failures.iter().chain(eval_failures) {
                ui.colored_label(ui.visuals().warn_fg_color, err.to_string());
            }
        }

        ui.add_space(8.0);
        if ui.button(self.txt(keys::GUI_EXPORT)).clicked() {
            if let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).save_file() {
                let result = fs::File::create(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|f| {
                        report::write_csv(&self.evaluation, f).map_err(|e| e.to_string())
                    });
                let shown = path.display().to_string();
                self.status = Some(match result {
                    Ok(()) => self.tr.fill(keys::EXPORT_DONE, &[("path", shown)]),
                    Err(e) => format!("{}: {e}", self.txt(keys::ERROR_PREFIX)),
                });
            }
        }
    }

    fn ui_settings(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.txt(keys::GUI_LANGUAGE));
            egui::ComboBox::from_id_source("lang_choice")
                .selected_text(self.lang_input.as_str())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.lang_input, "auto".into(), "auto");
                    ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                    ui.selectable_value(&mut self.lang_input, "ko".into(), "한국어");
                });
            if ui.button(self.txt(keys::GUI_SAVE_SETTINGS)).clicked() {
                self.save_settings();
            }
            if let Some(msg) = &self.status {
                ui.label(msg.as_str());
            }
        });
    }

    fn save_settings(&mut self) {
        self.config.language = self.lang_input.clone();
        self.config.model.catholyte_supporting_basis = self.basis;
        if let Some(app) = self.application() {
            self.config.application = app;
        }
        let resolved = i18n::resolve_language(&self.config.language, None);
        let pack_dir = self.config.language_pack_dir.as_deref();
        self.tr = i18n::Translator::new_with_pack(&resolved, pack_dir);
        self.status = Some(match self.config.save() {
            Ok(()) => self.txt(keys::GUI_SAVED),
            Err(e) => format!("{}: {e}", self.txt(keys::ERROR_PREFIX)),
        });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.txt(keys::GUI_TITLE));
            });
            self.ui_controls(ui);
        });
        egui::TopBottomPanel::bottom("settings_bar").show(ctx, |ui| {
            self.ui_settings(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.load_error {
                ui.colored_label(ui.visuals().error_fg_color, err.as_str());
            } else if self.table.is_none() {
                ui.label(self.txt(keys::GUI_NO_DATA));
            }
            self.ui_plot(ui);
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| self.ui_tables(ui));
        });
    }
}
