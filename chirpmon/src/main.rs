use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Instant,
};

use chirpmon::{
    init_logging, open_source, parse_baud_rate, Dashboard, Endpoint, LogDisplay, MonitorConfig,
    MonitorMetrics, MonitorPipeline, UiExit,
};
use chirpmon_core::{DisplayState, SharedDisplay};
use clap::Parser;
use log::{error, info, warn, LevelFilter};

#[derive(Parser, Debug)]
#[command(
    name = "chirpmon",
    version = env!("CARGO_PKG_VERSION"),
    about = "Live dashboard for chirp receiver telemetry",
    long_about = None,
)]
struct Cli {
    /// Последовательный порт (/dev/ttyUSB0, COM3) или `sim`
    endpoint: Endpoint,
    /// Скорость порта (115200, 115.2k)
    #[arg(short, long, default_value = "115200", value_parser = parse_baud_rate)]
    baud: u32,
    /// Без TUI: каждый кадр строкой в лог
    #[arg(long)]
    headless: bool,
    /// Файл журнала
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Интервал вывода статистики (секунды)
    #[arg(long, default_value = "5")]
    stats_interval: u64,
    /// Симулятор без мусора между кадрами
    #[arg(long)]
    no_noise: bool,
    /// Подробный журнал
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Тихий режим (только ошибки)
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = MonitorConfig {
        endpoint: cli.endpoint,
        baud_rate: cli.baud,
        headless: cli.headless,
        log_file: cli.log_file,
        log_level,
        stats_interval_secs: cli.stats_interval,
        sim_noise: !cli.no_noise,
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Failed to initialise logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = config.validate() {
        fail(&config, format!("{e}"));
    }

    let source = match open_source(&config) {
        Ok(s) => s,
        Err(e) => fail(&config, format!("Failed to open {}: {e}", config.endpoint)),
    };

    // Выводим конфигурацию
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Endpoint      : {}", config.endpoint);
    info!("  Baud rate     : {}", config.baud_rate);
    info!(
        "  Mode          : {}",
        if config.headless { "headless" } else { "tui" }
    );
    if let Some(path) = &config.log_file {
        info!("  Log file      : {:?}", path);
    }
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let (pipeline, metrics) = MonitorPipeline::new(&config);
    let stop_flag: Arc<AtomicBool> = pipeline.stop_flag();

    let stop_ctrlc = stop_flag.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        if stop_ctrlc.swap(true, Ordering::SeqCst) {
            // Второй Ctrl+C: принудительный выход
            warn!("Force exit");
            std::process::exit(130);
        }
        warn!("Ctrl+C received, stopping after current frame...");
    }) {
        warn!("Failed to set Ctrl+C handler: {e}");
    }

    let session_start = Instant::now();

    if config.headless {
        let sink = LogDisplay::new();
        let result = pipeline.run(source, &sink);
        finish(&metrics, &session_start);

        if let Err(e) = result {
            fail(&config, format!("Monitoring stopped: {e}"));
        }
        return;
    }

    let state = DisplayState::new();
    let (sink, redraw_rx) = SharedDisplay::new(state.clone());

    let spawned = thread::Builder::new()
        .name("pipeline".to_string())
        .spawn(move || pipeline.run(source, &sink));

    let handle = match spawned {
        Ok(h) => h,
        Err(e) => fail(&config, format!("Failed to start pipeline thread: {e}")),
    };

    let dashboard = Dashboard::new(state, metrics.clone(), redraw_rx, stop_flag);

    // К этому моменту терминал уже восстановлен
    match dashboard.run() {
        Ok(UiExit::Quit) => {
            // Поток пайплайна может висеть в чтении: не ждём его
            finish(&metrics, &session_start);
            std::process::exit(0);
        }
        Ok(UiExit::StreamEnded) => {
            let result = match handle.join() {
                Ok(r) => r,
                Err(_) => fail(&config, "Pipeline thread panicked".to_string()),
            };
            finish(&metrics, &session_start);

            if let Err(e) = result {
                fail(&config, format!("Monitoring stopped: {e}"));
            }
        }
        Err(e) => fail(&config, format!("Terminal failure: {e}")),
    }
}

/// Фатальная ошибка: в лог, а если лог молчит (TUI без файла), то в stderr.
fn fail(
    config: &MonitorConfig,
    message: String,
) -> ! {
    error!("{message}");
    if !config.headless && config.log_file.is_none() {
        eprintln!("{message}");
    }
    std::process::exit(1);
}

fn finish(
    metrics: &MonitorMetrics,
    session_start: &Instant,
) {
    let summary = metrics.summary(session_start);
    info!("\n{summary}");

    if summary.frames_dropped > 0 {
        warn!(
            "⚠ {} frames dropped ({:.2}%). Check the link for corruption.",
            summary.frames_dropped, summary.drop_rate_pct
        );
    }
}
