//! Интерфейс дисплея и разделяемое состояние слотов.
//!
//! Пайплайн только пишет (`set_*`), поток отрисовки только читает.
//! Синхронизация спрятана внутри приёмника, а не в глобальных переменных.

use std::sync::Arc;

use chirpmon_types::{SlotIndex, SAMPLES_PER_BLOCK, SLOT_COUNT};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;

use crate::stats::MagnitudeSeries;

/// Префикс баннера температуры
pub const BANNER_PREFIX: &str = "External Temp Sensor";

/// Приёмник обновлений дисплея.
pub trait DisplaySink {
    fn set_banner(
        &self,
        text: &str,
    );

    fn set_slot(
        &self,
        slot: SlotIndex,
        series: &MagnitudeSeries,
        label: &str,
        summary: &str,
    );

    /// Вызывается один раз на кадр после всех `set_slot`.
    fn render(&self);
}

/// Текст баннера: температура с 2 знаками или явное "Not Present".
pub fn temperature_banner(temperature: Option<f64>) -> String {
    match temperature {
        Some(t) => format!("{BANNER_PREFIX}: {t:.2} C"),
        None => format!("{BANNER_PREFIX}: Not Present"),
    }
}

/// Содержимое одного слота.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub series: Vec<f64>,
    pub label: String,
    pub summary: String,
}

impl Default for SlotView {
    fn default() -> Self {
        Self {
            series: vec![0.0; SAMPLES_PER_BLOCK],
            label: String::new(),
            summary: String::new(),
        }
    }
}

/// Всё, что видно на экране.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub banner: String,
    pub slots: Vec<SlotView>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            banner: format!("{BANNER_PREFIX}: <UNK>"),
            slots: vec![SlotView::default(); SLOT_COUNT],
        }
    }
}

impl DisplayState {
    pub fn new() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn slot(
        &self,
        slot: SlotIndex,
    ) -> &SlotView {
        &self.slots[slot.get()]
    }
}

/// Запрос к потоку отрисовки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRequest {
    Redraw,
}

/// Приёмник, пишущий в общее [`DisplayState`] и будящий поток отрисовки.
///
/// Канал рандеву (ёмкость 0): `render()` возвращается только когда поток
/// отрисовки забрал запрос, т.е. закончил предыдущую отрисовку.
#[derive(Clone)]
pub struct SharedDisplay {
    state: Arc<RwLock<DisplayState>>,
    redraw_tx: Sender<RenderRequest>,
}

impl SharedDisplay {
    /// Создаёт приёмник и конец канала для потока отрисовки.
    pub fn new(state: Arc<RwLock<DisplayState>>) -> (Self, Receiver<RenderRequest>) {
        let (redraw_tx, redraw_rx) = crossbeam_channel::bounded(0);
        (Self { state, redraw_tx }, redraw_rx)
    }

    pub fn state(&self) -> Arc<RwLock<DisplayState>> {
        self.state.clone()
    }
}

impl DisplaySink for SharedDisplay {
    fn set_banner(
        &self,
        text: &str,
    ) {
        self.state.write().banner = text.to_string();
    }

    fn set_slot(
        &self,
        slot: SlotIndex,
        series: &MagnitudeSeries,
        label: &str,
        summary: &str,
    ) {
        let mut state = self.state.write();
        let view = &mut state.slots[slot.get()];
        view.series.clear();
        view.series.extend_from_slice(series.as_slice());
        view.label = label.to_string();
        view.summary = summary.to_string();
    }

    fn render(&self) {
        // Поток отрисовки завершился: рисовать некому, кадры всё равно
        // продолжают попадать в состояние
        let _ = self.redraw_tx.send(RenderRequest::Redraw);
    }
}
