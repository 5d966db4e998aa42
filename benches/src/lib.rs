//! Генерация входных потоков для бенчмарков.

use chirpmon_core::FrameBuilder;
use chirpmon_types::{ChirpResult, Header, BLOCK_COUNT, CHANNEL_COUNT, SAMPLES_PER_BLOCK};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Поток из `frames` кадров со случайными I/Q и случайным `primary`.
///
/// Перед каждым кадром `noise` байт мусора из `d..=z`: в нём нет первого
/// символа маркера, так что каждый кадр находится ровно один раз.
pub fn frame_stream(
    frames: usize,
    noise: usize,
    seed: u64,
) -> ChirpResult<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::new();

    for n in 0..frames {
        out.extend((0..noise).map(|_| rng.gen_range(b'd'..=b'z')));

        let mut header = Header::new(rng.gen_range(0..CHANNEL_COUNT as u8));
        header.seqno = n as u16;
        header.temperature = Some(rng.gen_range(-4000..4000) as f64 / 100.0);

        let mut builder = FrameBuilder::new(header);
        for position in 0..BLOCK_COUNT {
            let pairs: Vec<(i16, i16)> = (0..SAMPLES_PER_BLOCK)
                .map(|_| (rng.gen(), rng.gen()))
                .collect();
            builder = builder.block(position, &pairs)?;
        }
        out.extend(builder.to_bytes());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chirpmon_core::FrameSync;

    use super::*;

    #[test]
    fn test_stream_yields_every_frame() {
        let stream = frame_stream(10, 5, 1).unwrap();
        let mut sync = FrameSync::new(Cursor::new(stream));

        for _ in 0..10 {
            sync.next_frame().unwrap();
        }
        assert!(sync.next_frame().is_err());
        assert_eq!(sync.stats().bytes_skipped, 50);
    }
}
