use clap::Parser;
use rfb_cost_toolbox::{app, config, i18n::keys};

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CSV를 평가해 결과를 출력한다.
fn main() {
    let args = app::CliArgs::parse();
    app::init_logging(args.verbose);
    let cfg = config::load_or_default();
    let tr = app::translator(&args.lang, cfg.as_ref().ok());
    let outcome = cfg
        .map_err(app::AppError::from)
        .and_then(|cfg| app::run(&cfg, &args, &tr));
    if let Err(err) = outcome {
        eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
        std::process::exit(1);
    }
}
