//! Приёмник для работы без терминала: каждый кадр одной строкой в лог.

use chirpmon_core::{DisplaySink, MagnitudeSeries};
use chirpmon_types::SlotIndex;
use log::info;
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct PendingFrame {
    banner: String,
    slots: Vec<String>,
}

/// Копит обновления кадра и пишет их в лог на `render()`.
#[derive(Debug, Default)]
pub struct LogDisplay {
    pending: Mutex<PendingFrame>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Строка, которая будет записана на следующем `render()`.
    pub fn pending_line(&self) -> String {
        let p = self.pending.lock();
        let mut line = p.banner.clone();
        for s in &p.slots {
            line.push_str(" | ");
            line.push_str(s);
        }
        line
    }
}

impl DisplaySink for LogDisplay {
    fn set_banner(
        &self,
        text: &str,
    ) {
        self.pending.lock().banner = text.to_string();
    }

    fn set_slot(
        &self,
        slot: SlotIndex,
        _series: &MagnitudeSeries,
        label: &str,
        summary: &str,
    ) {
        let flat = summary.replace('\n', ", ");
        self.pending
            .lock()
            .slots
            .push(format!("[{slot}] {label}: {flat}"));
    }

    fn render(&self) {
        let line = self.pending_line();
        self.pending.lock().slots.clear();
        info!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_collects_frame() {
        let sink = LogDisplay::new();
        let series = MagnitudeSeries::default();

        sink.set_banner("External Temp Sensor: 21.00 C");
        sink.set_slot(
            SlotIndex::new(4).unwrap(),
            &series,
            "ASIC 5 FROM 1",
            "Seq #: 7\nMax Index: 0",
        );

        assert_eq!(
            sink.pending_line(),
            "External Temp Sensor: 21.00 C | [4] ASIC 5 FROM 1: Seq #: 7, Max Index: 0"
        );
    }

    #[test]
    fn test_render_resets_slots_keeps_banner() {
        let sink = LogDisplay::new();
        sink.set_banner("b");
        sink.set_slot(
            SlotIndex::new(0).unwrap(),
            &MagnitudeSeries::default(),
            "l",
            "s",
        );
        sink.render();

        assert_eq!(sink.pending_line(), "b");
    }
}
