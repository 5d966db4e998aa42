use std::{
    io::Read,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chirpmon_core::{
    route_packet, temperature_banner, DisplaySink, FrameSync, HeaderDecoder, L7gHeaderDecoder,
    Packet, PacketDecoder, SyncStats,
};
use chirpmon_types::{ChirpResult, ErrorKind};
use log::{debug, error, info, warn};

use crate::{metrics::MonitorMetrics, MonitorConfig, MonitorResult};

/// Пайплайн монитора: синхронизация, разбор, маршрутизация, отрисовка.
pub struct MonitorPipeline<D: HeaderDecoder = L7gHeaderDecoder> {
    decoder: PacketDecoder<D>,
    metrics: Arc<MonitorMetrics>,
    stop_flag: Arc<AtomicBool>,
    stats_interval: Duration,
}

impl MonitorPipeline {
    /// Создаёт пайплайн. Возвращает также shared-ссылку на метрики.
    pub fn new(config: &MonitorConfig) -> (Self, Arc<MonitorMetrics>) {
        Self::with_decoder(L7gHeaderDecoder, config)
    }
}

impl<D: HeaderDecoder> MonitorPipeline<D> {
    /// Пайплайн с другим разборщиком заголовка.
    pub fn with_decoder(
        header_decoder: D,
        config: &MonitorConfig,
    ) -> (Self, Arc<MonitorMetrics>) {
        let metrics = MonitorMetrics::new();
        let p = Self {
            decoder: PacketDecoder::new(header_decoder),
            metrics: metrics.clone(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            stats_interval: Duration::from_secs(config.stats_interval_secs.max(1)),
        };

        (p, metrics)
    }

    /// Флаг остановки. Проверяется между кадрами.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Обрабатывает поток до остановки или фатальной ошибки.
    ///
    /// `Ok(())` только по флагу остановки. Закрытие потока, обрыв кадра и
    /// ошибки чтения возвращаются как `Err`. Кадр с недопустимым `primary`
    /// отбрасывается и считается в `frames_dropped`, чтение продолжается.
    pub fn run<R: Read, S: DisplaySink>(
        &self,
        source: R,
        sink: &S,
    ) -> MonitorResult<()> {
        let mut sync = FrameSync::new(source);
        let mut seq: u64 = 0;

        let session_start = Instant::now();
        let mut last_stats = Instant::now();

        info!("Waiting for frame marker...");

        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                info!("Stop signal received after {seq} frames");
                return Ok(());
            }

            let packet = match sync.next_frame() {
                Ok(frame) => self.decoder.decode(frame),
                Err(e) => {
                    self.record_sync(sync.stats());
                    error!("Telemetry stream ended after {seq} frames: {e}");
                    return Err(e.into());
                }
            };

            seq += 1;
            self.metrics.frames_decoded.fetch_add(1, Ordering::Relaxed);
            self.record_sync(sync.stats());

            match self.process(&packet, seq, sink) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::FrameRecoverable => {
                    self.metrics.frames_dropped.fetch_add(1, Ordering::Relaxed);
                    warn!("Dropping frame #{seq} (seqno {}): {e}", packet.header.seqno);
                }
                Err(e) => {
                    error!("Frame #{seq}: {e}");
                    return Err(e.into());
                }
            }

            // Периодически выводим статистику
            if last_stats.elapsed() >= self.stats_interval {
                self.log_progress(&session_start);
                last_stats = Instant::now();
            }
        }
    }

    /// Один кадр: баннер, затем слоты, затем ровно один `render`.
    fn process<S: DisplaySink>(
        &self,
        packet: &Packet,
        seq: u64,
        sink: &S,
    ) -> ChirpResult<()> {
        // Баннер обновляется даже для кадра, который дальше будет отброшен
        sink.set_banner(&temperature_banner(packet.header.temperature));

        let updates = route_packet(packet, seq)?;

        for u in &updates {
            debug!("#{seq} -> slot {}: {}", u.slot, u.label);
            sink.set_slot(u.slot, &u.series, &u.label, &u.summary);
        }

        sink.render();
        self.metrics.renders.fetch_add(1, Ordering::Relaxed);

        Ok(())
    }

    fn record_sync(
        &self,
        stats: &SyncStats,
    ) {
        self.metrics
            .markers_found
            .store(stats.markers_found, Ordering::Relaxed);
        self.metrics
            .bytes_skipped
            .store(stats.bytes_skipped, Ordering::Relaxed);
    }

    fn log_progress(
        &self,
        session_start: &Instant,
    ) {
        let m = &self.metrics;
        let elapsed = session_start.elapsed().as_secs_f64();

        info!(
            "[{:.0}s] frames={} dropped={} ({:.2}%) skipped={}B rate={:.1}Hz",
            elapsed,
            m.frames_decoded.load(Ordering::Relaxed),
            m.frames_dropped.load(Ordering::Relaxed),
            m.drop_rate_pct(),
            m.bytes_skipped.load(Ordering::Relaxed),
            m.frame_rate_hz(session_start),
        );
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
