use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Метрики, обновляемые lock-free из потока пайплайна.
#[derive(Debug, Default)]
pub struct MonitorMetrics {
    pub frames_decoded: AtomicU64,
    pub frames_dropped: AtomicU64,
    pub markers_found: AtomicU64,
    pub bytes_skipped: AtomicU64,
    pub renders: AtomicU64,
}

/// Snapshot метрик для отображения / тестирования.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub duration_secs: f64,
    pub frames_decoded: u64,
    pub frames_dropped: u64,
    pub markers_found: u64,
    pub bytes_skipped: u64,
    pub renders: u64,
    pub frame_rate_hz: f64,
    pub drop_rate_pct: f64,
}

impl MonitorMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Кадров в секунду с момента `elapsed`.
    pub fn frame_rate_hz(
        &self,
        elapsed: &Instant,
    ) -> f64 {
        let secs = elapsed.elapsed().as_secs_f64();

        if secs < 1e-9 {
            return 0.0;
        }

        self.frames_decoded.load(Ordering::Relaxed) as f64 / secs
    }

    /// Процент отброшенных кадров (0.0-100.0).
    pub fn drop_rate_pct(&self) -> f64 {
        let decoded = self.frames_decoded.load(Ordering::Relaxed);
        let dropped = self.frames_dropped.load(Ordering::Relaxed);

        if decoded == 0 {
            0.0
        } else {
            dropped as f64 / decoded as f64 * 100.0
        }
    }

    /// Однострочный статус для футера TUI.
    pub fn status_line(
        &self,
        elapsed: &Instant,
    ) -> String {
        format!(
            "frames={} dropped={} skipped={}B rate={:.1}Hz | q: quit",
            self.frames_decoded.load(Ordering::Relaxed),
            self.frames_dropped.load(Ordering::Relaxed),
            self.bytes_skipped.load(Ordering::Relaxed),
            self.frame_rate_hz(elapsed),
        )
    }

    /// Итоговая сводка для вывода в конце сессии.
    pub fn summary(
        &self,
        elapsed: &Instant,
    ) -> MetricsSummary {
        MetricsSummary {
            duration_secs: elapsed.elapsed().as_secs_f64(),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            markers_found: self.markers_found.load(Ordering::Relaxed),
            bytes_skipped: self.bytes_skipped.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
            frame_rate_hz: self.frame_rate_hz(elapsed),
            drop_rate_pct: self.drop_rate_pct(),
        }
    }
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.1}s", self.duration_secs)?;
        writeln!(f, "  Frames        : {}", self.frames_decoded)?;
        writeln!(
            f,
            "  Dropped       : {} ({:.2}%)",
            self.frames_dropped, self.drop_rate_pct
        )?;
        writeln!(f, "  Markers       : {}", self.markers_found)?;
        writeln!(f, "  Bytes skipped : {}", self.bytes_skipped)?;
        writeln!(f, "  Renders       : {}", self.renders)?;
        writeln!(f, "  Frame rate    : {:.1} Hz", self.frame_rate_hz)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
