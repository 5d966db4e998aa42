use thiserror::Error;

/// Результат для операций разбора потока
pub type ChirpResult<T> = std::result::Result<T, ChirpError>;

/// Класс ошибки: решает, продолжает ли пайплайн работу.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Источник байт больше не пригоден, пайплайн завершается
    Fatal,
    /// Испорчен только текущий кадр, сканирование продолжается
    FrameRecoverable,
}

/// Типы ошибок потока телеметрии.
#[derive(Debug, Error)]
pub enum ChirpError {
    /// Ошибки ввода/вывода транспорта (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Источник закончился (EOF)
    #[error("Byte stream closed")]
    StreamClosed,

    /// Поток оборвался посреди кадра
    #[error("Short frame: expected {expected} bytes, got {got}")]
    ShortFrame { expected: usize, got: usize },

    /// Вычисленный слот вне диапазона 0..18 (повреждённое поле primary)
    #[error("Routing out of range: primary={primary} maps to slot {slot}")]
    RoutingRange { primary: u8, slot: usize },

    /// Нарушение формата кадра
    #[error("Format violation: {0}")]
    FormatViolation(String),
}

impl ChirpError {
    pub fn format_violation<S: Into<String>>(s: S) -> Self {
        Self::FormatViolation(s.into())
    }

    /// Классификация ошибки для главного цикла.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChirpError::Io(_) | ChirpError::StreamClosed | ChirpError::ShortFrame { .. } => {
                ErrorKind::Fatal
            }
            ChirpError::RoutingRange { .. } | ChirpError::FormatViolation(_) => {
                ErrorKind::FrameRecoverable
            }
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }
}
