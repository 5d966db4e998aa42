use chirpmon_types::ChirpError;
use thiserror::Error;

pub type MonitorResult<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Не удалось открыть транспорт
    #[error("Transport error: {0}")]
    Transport(String),

    /// Ошибка потока телеметрии
    #[error("Stream error: {0}")]
    Stream(#[from] ChirpError),

    /// Ошибка ввода/вывода (терминал, лог-файл)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка терминала
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Некорректная конфигурация
    #[error("Config error: {0}")]
    Config(String),

    /// Поток пайплайна аварийно завершился
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl From<serialport::Error> for MonitorError {
    fn from(e: serialport::Error) -> Self {
        MonitorError::Transport(e.to_string())
    }
}
