use crate::CHANNEL_COUNT;

/// Режим восстановления заголовка, передаваемый декодеру.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Без коррекции ошибок: только прямое извлечение полей
    #[default]
    None,
}

/// Заголовок кадра (первые 82 байта), живёт ровно один кадр
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Тип пакета
    pub packet_type: u8,
    /// Собственный счётчик пакетов передатчика
    pub seqno: u16,
    /// Версия прошивки
    pub build: u16,
    /// Калибровочный импульс
    pub cal_pulse: u16,
    /// Индекс передающего канала (0..6)
    pub primary: u8,
    /// Температура внешнего датчика, °C (None если датчика нет)
    pub temperature: Option<f64>,
    /// Индекс максимума по каждой принимающей позиции
    pub max_index: [u16; CHANNEL_COUNT],
}

impl Header {
    pub fn new(primary: u8) -> Self {
        Self {
            packet_type: 1,
            seqno: 0,
            build: 0,
            cal_pulse: 0,
            primary,
            temperature: None,
            max_index: [0; CHANNEL_COUNT],
        }
    }
}
