//! Сборка кадров из известных полей (обратная сторона декодера).
//!
//! Используется симулятором, тестами и бенчмарками.

use chirpmon_types::{
    ChirpError, ChirpResult, Frame, Header, RawBlock, BLOCK_COUNT, BLOCK_SIZE, FRAME_SIZE,
    HEADER_SIZE, MARKER, SAMPLES_PER_BLOCK, SAMPLE_SIZE,
};

use crate::header::HeaderExt;

/// Кодирует 16 пар (I, Q) в сырой блок.
pub fn encode_block(pairs: &[(i16, i16)]) -> ChirpResult<RawBlock> {
    if pairs.len() != SAMPLES_PER_BLOCK {
        return Err(ChirpError::format_violation(format!(
            "block needs {SAMPLES_PER_BLOCK} IQ pairs, got {}",
            pairs.len()
        )));
    }

    let mut raw = [0u8; BLOCK_SIZE];
    for (chunk, (i, q)) in raw.chunks_exact_mut(SAMPLE_SIZE).zip(pairs) {
        chunk[0..2].copy_from_slice(&i.to_le_bytes());
        chunk[2..4].copy_from_slice(&q.to_le_bytes());
    }

    Ok(RawBlock(raw))
}

/// Строитель кадра: заголовок + три блока.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    header: Header,
    blocks: [RawBlock; BLOCK_COUNT],
}

impl FrameBuilder {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            blocks: [RawBlock::default(); BLOCK_COUNT],
        }
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Задаёт блок на позиции `position` из 16 пар (I, Q).
    pub fn block(
        mut self,
        position: usize,
        pairs: &[(i16, i16)],
    ) -> ChirpResult<Self> {
        if position >= BLOCK_COUNT {
            return Err(ChirpError::format_violation(format!(
                "block position {position} out of 0..{BLOCK_COUNT}"
            )));
        }
        self.blocks[position] = encode_block(pairs)?;
        Ok(self)
    }

    pub fn raw_block(
        mut self,
        position: usize,
        block: RawBlock,
    ) -> Self {
        self.blocks[position] = block;
        self
    }

    /// Кадр без маркера.
    pub fn frame(&self) -> Frame {
        let mut frame = [0u8; FRAME_SIZE];
        frame[..HEADER_SIZE].copy_from_slice(&self.header.serialize());

        for (k, block) in self.blocks.iter().enumerate() {
            let off = HEADER_SIZE + k * BLOCK_SIZE;
            frame[off..off + BLOCK_SIZE].copy_from_slice(block.as_bytes());
        }

        frame
    }

    /// Маркер + кадр, готовые к записи в поток.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MARKER.len() + FRAME_SIZE);
        out.extend_from_slice(&MARKER);
        out.extend_from_slice(&self.frame());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_block_rejects_wrong_length() {
        assert!(encode_block(&[(1, 1); 15]).is_err());
        assert!(encode_block(&[(1, 1); 17]).is_err());
        assert!(encode_block(&[(1, 1); SAMPLES_PER_BLOCK]).is_ok());
    }

    #[test]
    fn test_frame_bytes_start_with_marker() {
        let bytes = FrameBuilder::new(Header::new(0)).to_bytes();
        assert_eq!(bytes.len(), MARKER.len() + FRAME_SIZE);
        assert_eq!(&bytes[..8], b"cafebabe");
    }

    #[test]
    fn test_block_position_checked() {
        let r = FrameBuilder::new(Header::new(0)).block(3, &[(0, 0); SAMPLES_PER_BLOCK]);
        assert!(r.is_err());
    }

    #[test]
    fn test_block_placed_after_header() {
        let frame = FrameBuilder::new(Header::new(0))
            .block(0, &[(100, 0); SAMPLES_PER_BLOCK])
            .unwrap()
            .frame();
        // I=100 little-endian в байтах 82..84
        assert_eq!(&frame[HEADER_SIZE..HEADER_SIZE + 4], &[100, 0, 0, 0]);
    }
}
