use std::fs::File;

use env_logger::{Logger, Target};
use log::LevelFilter;

use crate::{MonitorConfig, MonitorError, MonitorResult};

/// Собирает логгер по конфигурации.
///
/// С `log_file` журнал пишется в файл. В режиме TUI без файла журнал
/// выключен: stderr занят экраном панели.
pub fn build_logger(config: &MonitorConfig) -> MonitorResult<Logger> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.log_level)
        .format_target(false)
        .format_timestamp_secs();

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None if !config.headless => {
            builder.filter_level(LevelFilter::Off);
        }
        None => {}
    }

    Ok(builder.build())
}

/// Устанавливает глобальный логгер. Вызывается один раз при старте.
pub fn init_logging(config: &MonitorConfig) -> MonitorResult<()> {
    let logger = build_logger(config)?;
    let max_level = logger.filter();

    log::set_boxed_logger(Box::new(logger)).map_err(|e| MonitorError::Config(e.to_string()))?;
    log::set_max_level(max_level);

    Ok(())
}
