//! Константы протокола и сырые области кадра.
//!
//! Кадр следует сразу за 8-байтовым маркером `cafebabe`:
//! 82 байта заголовка и три блока по 64 байта с I/Q выборками.

/// Маркер начала кадра: b"cafebabe"
pub const MARKER: [u8; 8] = *b"cafebabe";

/// Размер области заголовка
pub const HEADER_SIZE: usize = 82;

/// Размер одного блока сырых I/Q выборок
pub const BLOCK_SIZE: usize = 64;

/// Количество блоков в кадре (по одному на принимающую позицию)
pub const BLOCK_COUNT: usize = 3;

/// Количество I/Q пар в блоке
pub const SAMPLES_PER_BLOCK: usize = 16;

/// Размер одной I/Q пары (i16 I + i16 Q)
pub const SAMPLE_SIZE: usize = 4;

/// Полный размер кадра без маркера (274 байта)
pub const FRAME_SIZE: usize = HEADER_SIZE + BLOCK_COUNT * BLOCK_SIZE;

/// Кадр фиксированного размера.
pub type Frame = [u8; FRAME_SIZE];

/// Сырой заголовок кадра.
pub type RawHeader = [u8; HEADER_SIZE];

/// Блок из 16 чередующихся little-endian пар (I, Q).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock(pub [u8; BLOCK_SIZE]);

impl RawBlock {
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.0
    }
}

impl Default for RawBlock {
    fn default() -> Self {
        Self([0u8; BLOCK_SIZE])
    }
}

// Инвариант раскладки: 16 пар по 4 байта заполняют блок целиком
const _: () = assert!(SAMPLES_PER_BLOCK * SAMPLE_SIZE == BLOCK_SIZE);
const _: () = assert!(FRAME_SIZE == 274);
