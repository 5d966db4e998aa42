/// Количество каналов (ASIC) в 6-канальной конфигурации
pub const CHANNEL_COUNT: usize = 6;

/// Количество слотов дисплея: 6 каналов × 3 принимающие позиции
pub const SLOT_COUNT: usize = 18;

/// Индекс слота дисплея, гарантированно в диапазоне `0..SLOT_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Возвращает `None`, если индекс вне `0..SLOT_COUNT`.
    pub fn new(index: usize) -> Option<Self> {
        (index < SLOT_COUNT).then_some(Self(index))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Все слоты по порядку.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOT_COUNT).map(SlotIndex)
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
