use std::path::PathBuf;

use log::LevelFilter;

use crate::{MonitorError, MonitorResult};

/// Источник байт (выбор при старте).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Последовательный порт (/dev/ttyUSB0, COM3, ...).
    Serial(String),
    /// Встроенный симулятор приёмника (не требует железа).
    Simulated,
}

/// Полная конфигурация монитора.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Откуда читать поток
    pub endpoint: Endpoint,
    /// Скорость порта (бод)
    pub baud_rate: u32,
    /// Без TUI: обновления слотов идут в лог
    pub headless: bool,
    /// Файл журнала (в режиме TUI stderr занят экраном)
    pub log_file: Option<PathBuf>,
    /// Уровень журнала
    pub log_level: LevelFilter,
    /// Интервал вывода статистики в лог (секунды)
    pub stats_interval_secs: u64,
    /// Симулятор: вставлять мусор между кадрами
    pub sim_noise: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl MonitorConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> MonitorResult<()> {
        if self.baud_rate == 0 {
            return Err(MonitorError::Config("baud rate must be > 0".to_string()));
        }

        if let Endpoint::Serial(path) = &self.endpoint {
            if path.trim().is_empty() {
                return Err(MonitorError::Config("empty serial port name".to_string()));
            }
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Endpoint, MonitorConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for Endpoint {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Endpoint::Serial(path) => write!(f, "{path}"),
            Endpoint::Simulated => write!(f, "sim"),
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "" => Err("Empty endpoint. Use a serial port path or 'sim'".to_string()),
            "sim" | "simulated" => Ok(Endpoint::Simulated),
            _ => Ok(Endpoint::Serial(s.to_string())),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Simulated,
            baud_rate: 115_200,
            headless: false,
            log_file: None,
            log_level: LevelFilter::Info,
            stats_interval_secs: 5,
            sim_noise: true,
        }
    }
}

/// Парсит скорость порта.
///
/// Поддерживает суффикс `k` (регистронезависимо).
///
/// # Примеры
/// ```
/// use chirpmon::config::parse_baud_rate;
/// assert_eq!(parse_baud_rate("115200").unwrap(), 115_200);
/// assert_eq!(parse_baud_rate("115.2k").unwrap(), 115_200);
/// ```
pub fn parse_baud_rate(s: &str) -> Result<u32, String> {
    let lower = s.trim().to_lowercase();

    let rate = if let Some(v) = lower.strip_suffix('k') {
        let n: f64 = v
            .trim()
            .parse()
            .map_err(|e| format!("Invalid baud rate value '{v}': {e}"))?;
        (n * 1_000.0).round()
    } else {
        lower
            .parse::<u32>()
            .map_err(|e| format!("Invalid baud rate '{s}': {e}"))? as f64
    };

    if rate <= 0.0 || rate > u32::MAX as f64 {
        return Err(format!("Baud rate out of range: '{s}'"));
    }

    Ok(rate as u32)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
