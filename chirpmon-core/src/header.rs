//! Заголовок кадра: 82 байта, все многобайтовые поля little-endian.
//!
//! | смещение | размер | поле                                  |
//! |----------|--------|---------------------------------------|
//! | 0        | 1      | тип пакета                            |
//! | 1..3     | 2      | seqno                                 |
//! | 3..5     | 2      | build                                 |
//! | 5..7     | 2      | cal_pulse                             |
//! | 7        | 1      | primary                               |
//! | 8        | 1      | флаги (bit 0: есть температура)       |
//! | 9..11    | 2      | температура, i16, сотые доли °C       |
//! | 11..23   | 12     | max_index[6], u16                     |
//! | 23..82   | 59     | калибровочные данные, не разбираются  |

use chirpmon_types::{Header, RawHeader, RecoveryMode, CHANNEL_COUNT, HEADER_SIZE};

use crate::binary::{
    read_i16_local, read_u16_local, read_u8_local, write_i16_local, write_u16_local,
    write_u8_local,
};

/// Флаг: поле температуры заполнено
pub const FLAG_TEMPERATURE: u8 = 0x01;

/// Смещение зарезервированной области (после max_index)
pub const HEADER_RESERVED_OFFSET: usize = 23;

/// Внешний декодер заголовка.
///
/// Никогда не отказывает: на мусоре возвращает поля "как есть".
pub trait HeaderDecoder {
    fn decode_header(
        &self,
        mode: RecoveryMode,
        raw: &RawHeader,
    ) -> Header;
}

/// Декодер заголовка L7G без восстановления.
#[derive(Debug, Clone, Copy, Default)]
pub struct L7gHeaderDecoder;

impl HeaderDecoder for L7gHeaderDecoder {
    fn decode_header(
        &self,
        mode: RecoveryMode,
        raw: &RawHeader,
    ) -> Header {
        match mode {
            RecoveryMode::None => Header::deserialize(raw),
        }
    }
}

/// Сериализация/десериализация [`Header`] в сырые 82 байта.
pub trait HeaderExt: Sized {
    fn serialize(&self) -> RawHeader;
    fn deserialize(raw: &RawHeader) -> Self;
}

impl HeaderExt for Header {
    fn serialize(&self) -> RawHeader {
        let mut buf = [0u8; HEADER_SIZE];
        let mut off = 0;

        write_u8_local(&mut buf, &mut off, self.packet_type);
        write_u16_local(&mut buf, &mut off, self.seqno);
        write_u16_local(&mut buf, &mut off, self.build);
        write_u16_local(&mut buf, &mut off, self.cal_pulse);
        write_u8_local(&mut buf, &mut off, self.primary);

        let (flags, centi) = match self.temperature {
            Some(t) => (FLAG_TEMPERATURE, celsius_to_centi(t)),
            None => (0, 0),
        };
        write_u8_local(&mut buf, &mut off, flags);
        write_i16_local(&mut buf, &mut off, centi);

        for v in self.max_index {
            write_u16_local(&mut buf, &mut off, v);
        }

        debug_assert_eq!(off, HEADER_RESERVED_OFFSET);
        // [23..82] reserved, уже нули
        buf
    }

    fn deserialize(raw: &RawHeader) -> Self {
        let mut off = 0;

        let packet_type = read_u8_local(raw, &mut off);
        let seqno = read_u16_local(raw, &mut off);
        let build = read_u16_local(raw, &mut off);
        let cal_pulse = read_u16_local(raw, &mut off);
        let primary = read_u8_local(raw, &mut off);
        let flags = read_u8_local(raw, &mut off);
        let centi = read_i16_local(raw, &mut off);

        let mut max_index = [0u16; CHANNEL_COUNT];
        for v in max_index.iter_mut() {
            *v = read_u16_local(raw, &mut off);
        }

        let temperature = (flags & FLAG_TEMPERATURE != 0).then(|| centi as f64 / 100.0);

        Header {
            packet_type,
            seqno,
            build,
            cal_pulse,
            primary,
            temperature,
            max_index,
        }
    }
}

fn celsius_to_centi(t: f64) -> i16 {
    (t * 100.0)
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn sample_header() -> Header {
        Header {
            packet_type: 1,
            seqno: 0xBEEF,
            build: 250,
            cal_pulse: 12,
            primary: 4,
            temperature: Some(-12.5),
            max_index: [1, 2, 3, 40, 500, 6000],
        }
    }

    #[test]
    fn test_header_layout_offsets() {
        let raw = sample_header().serialize();

        assert_eq!(raw[0], 1);
        assert_eq!(&raw[1..3], &0xBEEFu16.to_le_bytes());
        assert_eq!(raw[7], 4, "primary at offset 7");
        assert_eq!(raw[8], FLAG_TEMPERATURE);
        assert_eq!(&raw[9..11], &(-1250i16).to_le_bytes());
        assert_eq!(&raw[21..23], &6000u16.to_le_bytes());
        assert!(raw[HEADER_RESERVED_OFFSET..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decoder_extracts_fields() {
        let h = sample_header();
        let decoded = L7gHeaderDecoder.decode_header(RecoveryMode::None, &h.serialize());

        assert_eq!(decoded.primary, 4);
        assert_eq!(decoded.seqno, 0xBEEF);
        assert_eq!(decoded.max_index, h.max_index);
        assert_relative_eq!(decoded.temperature.unwrap(), -12.5);
    }

    #[test]
    fn test_temperature_absent_flag() {
        let mut h = sample_header();
        h.temperature = None;
        let mut raw = h.serialize();
        // Мусор в поле температуры без флага игнорируется
        raw[9] = 0x55;
        raw[10] = 0x55;

        let decoded = Header::deserialize(&raw);
        assert!(decoded.temperature.is_none());
    }

    #[test]
    fn test_garbage_header_never_fails() {
        let raw = [0xFFu8; HEADER_SIZE];
        let decoded = L7gHeaderDecoder.decode_header(RecoveryMode::None, &raw);

        assert_eq!(decoded.primary, 0xFF);
        assert_eq!(decoded.max_index, [0xFFFF; CHANNEL_COUNT]);
        assert_relative_eq!(decoded.temperature.unwrap(), -0.01);
    }

    #[test]
    fn test_temperature_rounds_to_centi() {
        let mut h = sample_header();
        h.temperature = Some(23.456);
        let decoded = Header::deserialize(&h.serialize());
        assert_relative_eq!(decoded.temperature.unwrap(), 23.46);
    }
}
