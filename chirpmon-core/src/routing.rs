//! Таблица маршрутизации блоков по слотам дисплея (6-канальная конфигурация).
//!
//! Если `primary < 3`, блоки кадра уходят в слоты `primary*6 + 3..6`
//! (принимающие позиции 3, 4, 5). Иначе в слоты `(primary-3)*6 + 0..3`
//! (позиции 0, 1, 2). Для `primary` в 0..6 это биекция на 0..18.

use chirpmon_types::{ChirpError, ChirpResult, Header, SlotIndex, BLOCK_COUNT, CHANNEL_COUNT};

use crate::{
    decoder::Packet,
    stats::{BlockStats, ChannelSummary, MagnitudeSeries},
};

/// Куда попадает блок: слот и принимающая позиция (ASIC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRoute {
    pub slot: SlotIndex,
    pub receiver: usize,
}

/// Готовое обновление одного слота.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotUpdate {
    pub slot: SlotIndex,
    pub series: MagnitudeSeries,
    pub label: String,
    pub summary: String,
}

/// Маршрут блока на позиции `position` (0..3) для данного `primary`.
pub fn route(
    primary: u8,
    position: usize,
) -> ChirpResult<SlotRoute> {
    debug_assert!(position < BLOCK_COUNT);

    let primary_idx = primary as usize;
    let half = CHANNEL_COUNT / 2;

    let (base, receiver) = if primary_idx < half {
        (primary_idx * CHANNEL_COUNT + half, half + position)
    } else {
        ((primary_idx - half) * CHANNEL_COUNT, position)
    };

    let slot_num = base + position;
    let slot = SlotIndex::new(slot_num).ok_or(ChirpError::RoutingRange {
        primary,
        slot: slot_num,
    })?;

    Ok(SlotRoute { slot, receiver })
}

/// Подпись слота: `ASIC {receiver+1} FROM {primary+1}`.
pub fn slot_label(
    receiver: usize,
    primary: u8,
) -> String {
    format!("ASIC {} FROM {}", receiver + 1, primary as usize + 1)
}

/// Текст сводки слота.
pub fn slot_summary(
    seq: u64,
    max_index: u16,
    summary: &ChannelSummary,
) -> String {
    format!(
        "Seq #: {seq}\nMax Index: {max_index}\nMaximum: {:.2}\nAverage: {:.2}",
        summary.max, summary.average
    )
}

/// Строит обновления для всех трёх блоков кадра.
///
/// Все маршруты проверяются до построения: при ошибке диапазона
/// не возвращается ни одного обновления.
pub fn route_packet(
    packet: &Packet,
    seq: u64,
) -> ChirpResult<Vec<SlotUpdate>> {
    let header: &Header = &packet.header;

    let routes = (0..BLOCK_COUNT)
        .map(|position| route(header.primary, position))
        .collect::<ChirpResult<Vec<_>>>()?;

    let updates = routes
        .into_iter()
        .zip(packet.blocks.iter())
        .map(|(r, block)| {
            let stats = BlockStats::from_block(block);
            SlotUpdate {
                slot: r.slot,
                series: stats.series,
                label: slot_label(r.receiver, header.primary),
                summary: slot_summary(seq, header.max_index[r.receiver], &stats.summary),
            }
        })
        .collect();

    Ok(updates)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chirpmon_types::{RawBlock, SLOT_COUNT};

    use super::*;

    #[test]
    fn test_route_low_primary() {
        let r = route(0, 1).unwrap();
        assert_eq!(r.slot.get(), 4);
        assert_eq!(r.receiver, 4);
        assert_eq!(slot_label(r.receiver, 0), "ASIC 5 FROM 1");
    }

    #[test]
    fn test_route_high_primary() {
        let r = route(4, 2).unwrap();
        assert_eq!(r.slot.get(), 8);
        assert_eq!(r.receiver, 2);
        assert_eq!(slot_label(r.receiver, 4), "ASIC 3 FROM 5");
    }

    #[test]
    fn test_routing_is_bijection() {
        let mut seen = HashSet::new();
        for primary in 0..CHANNEL_COUNT as u8 {
            for position in 0..BLOCK_COUNT {
                let r = route(primary, position).unwrap();
                assert!(r.slot.get() < SLOT_COUNT);
                assert!(seen.insert(r.slot), "slot {} reused", r.slot);
            }
        }
        assert_eq!(seen.len(), SLOT_COUNT);
    }

    #[test]
    fn test_route_out_of_range_primary() {
        for primary in [6u8, 7, 100, 255] {
            match route(primary, 0) {
                Err(ChirpError::RoutingRange { primary: p, slot }) => {
                    assert_eq!(p, primary);
                    assert!(slot >= SLOT_COUNT);
                }
                other => panic!("expected RoutingRange, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_summary_text() {
        let s = slot_summary(
            12,
            7,
            &ChannelSummary {
                max: 100.0,
                average: 6.25,
            },
        );
        assert_eq!(s, "Seq #: 12\nMax Index: 7\nMaximum: 100.00\nAverage: 6.25");
    }

    #[test]
    fn test_route_packet_uses_receiver_max_index() {
        let mut header = Header::new(1);
        header.max_index = [10, 11, 12, 13, 14, 15];
        let packet = Packet {
            header,
            blocks: [RawBlock::default(); BLOCK_COUNT],
        };

        let updates = route_packet(&packet, 3).unwrap();
        let slots: Vec<usize> = updates.iter().map(|u| u.slot.get()).collect();

        assert_eq!(slots, vec![9, 10, 11]);
        assert_eq!(updates[0].label, "ASIC 4 FROM 2");
        assert!(updates[0].summary.contains("Max Index: 13"));
        assert!(updates[2].summary.starts_with("Seq #: 3\n"));
    }

    #[test]
    fn test_route_packet_rejects_whole_frame() {
        let packet = Packet {
            header: Header::new(9),
            blocks: [RawBlock::default(); BLOCK_COUNT],
        };
        assert!(route_packet(&packet, 1).is_err());
    }
}
