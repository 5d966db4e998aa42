//! Амплитуды и сводная статистика по блоку I/Q выборок.
//!
//! Статистика считается заново на каждом кадре: без сглаживания,
//! окон и отбраковки выбросов.

use byteorder::{ByteOrder, LittleEndian};
use chirpmon_types::{RawBlock, SAMPLES_PER_BLOCK, SAMPLE_SIZE};

/// Амплитуда одной пары: `sqrt(I² + Q²)`.
///
/// Сумма квадратов считается в i64, чтобы `(-32768)²·2` не переполнялась.
pub fn magnitude(
    i: i16,
    q: i16,
) -> f64 {
    let (i, q) = (i as i64, q as i64);
    ((i * i + q * q) as f64).sqrt()
}

/// Декодирует пары (I, Q) блока в порядке следования.
pub fn iq_pairs(block: &RawBlock) -> impl Iterator<Item = (i16, i16)> + '_ {
    block.as_bytes().chunks_exact(SAMPLE_SIZE).map(|pair| {
        (
            LittleEndian::read_i16(&pair[0..2]),
            LittleEndian::read_i16(&pair[2..4]),
        )
    })
}

/// 16 амплитуд одного блока.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeSeries(pub [f64; SAMPLES_PER_BLOCK]);

impl MagnitudeSeries {
    pub fn from_block(block: &RawBlock) -> Self {
        let mut mags = [0.0f64; SAMPLES_PER_BLOCK];
        for (slot, (i, q)) in mags.iter_mut().zip(iq_pairs(block)) {
            *slot = magnitude(i, q);
        }
        Self(mags)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Максимум и среднее по серии.
    pub fn summary(&self) -> ChannelSummary {
        let max = self.0.iter().copied().fold(0.0f64, f64::max);
        let average = self.0.iter().sum::<f64>() / SAMPLES_PER_BLOCK as f64;
        ChannelSummary { max, average }
    }
}

impl Default for MagnitudeSeries {
    fn default() -> Self {
        Self([0.0; SAMPLES_PER_BLOCK])
    }
}

/// Сводка по блоку.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelSummary {
    pub max: f64,
    pub average: f64,
}

/// Серия и сводка одного блока.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockStats {
    pub series: MagnitudeSeries,
    pub summary: ChannelSummary,
}

impl BlockStats {
    pub fn from_block(block: &RawBlock) -> Self {
        let series = MagnitudeSeries::from_block(block);
        let summary = series.summary();
        Self { series, summary }
    }
}
