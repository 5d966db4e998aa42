use chirpmon_types::{
    Frame, Header, RawBlock, RawHeader, RecoveryMode, BLOCK_COUNT, BLOCK_SIZE, HEADER_SIZE,
};

use crate::header::{HeaderDecoder, L7gHeaderDecoder};

/// Разобранный кадр: заголовок и три сырых блока.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub header: Header,
    pub blocks: [RawBlock; BLOCK_COUNT],
}

/// Делит кадр на заголовок и блоки, заголовок отдаёт внешнему декодеру.
#[derive(Debug, Clone, Default)]
pub struct PacketDecoder<D: HeaderDecoder = L7gHeaderDecoder> {
    header_decoder: D,
}

impl<D: HeaderDecoder> PacketDecoder<D> {
    pub fn new(header_decoder: D) -> Self {
        Self { header_decoder }
    }

    /// Разбор не отказывает: содержимое заголовка не проверяется.
    pub fn decode(
        &self,
        frame: &Frame,
    ) -> Packet {
        let (head, body) = frame.split_at(HEADER_SIZE);

        let mut raw_header: RawHeader = [0u8; HEADER_SIZE];
        raw_header.copy_from_slice(head);

        let header = self
            .header_decoder
            .decode_header(RecoveryMode::None, &raw_header);

        let mut blocks = [RawBlock::default(); BLOCK_COUNT];
        for (block, chunk) in blocks.iter_mut().zip(body.chunks_exact(BLOCK_SIZE)) {
            block.0.copy_from_slice(chunk);
        }

        Packet { header, blocks }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chirpmon_types::FRAME_SIZE;

    use super::*;

    /// Декодер, запоминающий режим, с которым его вызвали.
    #[derive(Default)]
    struct SpyDecoder {
        seen_mode: Cell<Option<RecoveryMode>>,
    }

    impl HeaderDecoder for SpyDecoder {
        fn decode_header(
            &self,
            mode: RecoveryMode,
            raw: &RawHeader,
        ) -> Header {
            self.seen_mode.set(Some(mode));
            Header::new(raw[7])
        }
    }

    #[test]
    fn test_blocks_split_at_fixed_offsets() {
        let mut frame = [0u8; FRAME_SIZE];
        for (k, b) in frame.iter_mut().enumerate().skip(HEADER_SIZE) {
            *b = ((k - HEADER_SIZE) / BLOCK_SIZE) as u8 + 1;
        }

        let packet = PacketDecoder::<L7gHeaderDecoder>::default().decode(&frame);

        assert!(packet.blocks[0].0.iter().all(|&b| b == 1));
        assert!(packet.blocks[1].0.iter().all(|&b| b == 2));
        assert!(packet.blocks[2].0.iter().all(|&b| b == 3));
    }

    #[test]
    fn test_header_decoded_without_recovery() {
        let mut frame = [0u8; FRAME_SIZE];
        frame[7] = 5;

        let decoder = PacketDecoder::new(SpyDecoder::default());
        let packet = decoder.decode(&frame);

        assert_eq!(packet.header.primary, 5);
        assert_eq!(
            decoder.header_decoder.seen_mode.get(),
            Some(RecoveryMode::None)
        );
    }
}
