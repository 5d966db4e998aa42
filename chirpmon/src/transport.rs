// Источники байт для пайплайна: последовательный порт и симулятор.
// Ядру нужен только `std::io::Read`; таймауты драйвера порта скрыты здесь,
// чтобы зависший источник просто останавливал пайплайн.

use std::{
    f64::consts::PI,
    io::{ErrorKind, Read},
    thread,
    time::{Duration, Instant},
};

use chirpmon_core::FrameBuilder;
use chirpmon_types::{Header, BLOCK_COUNT, CHANNEL_COUNT, FRAME_SIZE, MARKER, SAMPLES_PER_BLOCK};
use log::info;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::{Endpoint, MonitorConfig, MonitorResult};

/// Период опроса драйвера порта. Истечение не является ошибкой.
const SERIAL_POLL: Duration = Duration::from_millis(500);

/// Бит на байт в линии 8N1 (старт + 8 данных + стоп).
const BITS_PER_BYTE: u64 = 10;

/// Последовательный порт 8N1 без таймаута на чтение.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    pub fn open(
        path: &str,
        baud_rate: u32,
    ) -> MonitorResult<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(SERIAL_POLL)
            .open()?;

        info!("Opened serial port {path} at {baud_rate} baud (8N1)");

        Ok(Self { port })
    }
}

impl Read for SerialSource {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> std::io::Result<usize> {
        loop {
            match self.port.read(buf) {
                Err(e) if e.kind() == ErrorKind::TimedOut => continue,
                other => return other,
            }
        }
    }
}

/// Генерирует синтетический поток приёмника для работы без железа.
///
/// `primary` перебирает каналы 0..6 по кругу, в блоках комплексная
/// синусоида с медленно меняющейся амплитудой. Раз в `noise_every` кадров
/// перед маркером вставляется обрывок маркера, чтобы работала ресинхронизация.
pub struct SimulatedSource {
    /// Пауза между кадрами (None: без pacing, для тестов)
    pub frame_interval: Option<Duration>,
    /// Каждый N-й кадр предваряется мусором (0: никогда)
    pub noise_every: u64,
    frame_no: u64,
    pending: Vec<u8>,
    cursor: usize,
    start: Instant,
}

/// Мусор с ложным началом маркера.
pub const SIM_NOISE: &[u8] = b"cafeba\x00\xff";

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl SimulatedSource {
    /// Симулятор, выдающий кадры в темпе линии `baud_rate`.
    pub fn new(
        baud_rate: u32,
        noise: bool,
    ) -> Self {
        let frame_bits = (MARKER.len() + FRAME_SIZE) as u64 * BITS_PER_BYTE;
        let interval = Duration::from_micros(frame_bits * 1_000_000 / baud_rate.max(1) as u64);

        Self {
            frame_interval: Some(interval),
            noise_every: if noise { 10 } else { 0 },
            frame_no: 0,
            pending: Vec::with_capacity(MARKER.len() + FRAME_SIZE + SIM_NOISE.len()),
            cursor: 0,
            start: Instant::now(),
        }
    }

    /// Без pacing и без мусора.
    pub fn unpaced() -> Self {
        Self {
            frame_interval: None,
            noise_every: 0,
            ..Self::new(115_200, false)
        }
    }

    /// Заголовок кадра номер `n`.
    pub fn header_for(n: u64) -> Header {
        let mut h = Header::new((n % CHANNEL_COUNT as u64) as u8);
        h.seqno = n as u16;
        // Датчик отдаёт сотые доли градуса
        let t = 22.0 + (n as f64 / 50.0).sin() * 3.0;
        h.temperature = Some((t * 100.0).round() / 100.0);
        for (k, v) in h.max_index.iter_mut().enumerate() {
            *v = ((n + k as u64 * 3) % SAMPLES_PER_BLOCK as u64) as u16;
        }
        h
    }

    fn block_pairs(
        n: u64,
        position: usize,
    ) -> Vec<(i16, i16)> {
        let amplitude = 2_000.0 + 1_500.0 * ((n as f64 / 20.0) + position as f64).sin();
        let cycles = (position + 1) as f64;

        (0..SAMPLES_PER_BLOCK)
            .map(|k| {
                let phase = 2.0 * PI * cycles * k as f64 / SAMPLES_PER_BLOCK as f64;
                let envelope = 0.5 + 0.5 * (PI * k as f64 / SAMPLES_PER_BLOCK as f64).sin();
                let a = amplitude * envelope;
                ((a * phase.cos()) as i16, (a * phase.sin()) as i16)
            })
            .collect()
    }

    fn generate(&mut self) {
        let n = self.frame_no;
        self.pending.clear();
        self.cursor = 0;

        if self.noise_every > 0 && n % self.noise_every == self.noise_every - 1 {
            self.pending.extend_from_slice(SIM_NOISE);
        }

        let mut builder = FrameBuilder::new(Self::header_for(n));
        for position in 0..BLOCK_COUNT {
            builder = builder.raw_block(
                position,
                chirpmon_core::encode_block(&Self::block_pairs(n, position))
                    .unwrap_or_default(),
            );
        }
        self.pending.extend(builder.to_bytes());

        self.frame_no += 1;
    }

    fn pace(&self) {
        if let Some(interval) = self.frame_interval {
            let expected = interval * self.frame_no as u32;
            let elapsed = self.start.elapsed();
            if expected > elapsed {
                thread::sleep(expected - elapsed);
            }
        }
    }
}

impl Read for SimulatedSource {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.cursor >= self.pending.len() {
            self.pace();
            self.generate();
        }

        let n = buf.len().min(self.pending.len() - self.cursor);
        buf[..n].copy_from_slice(&self.pending[self.cursor..self.cursor + n]);
        self.cursor += n;

        Ok(n)
    }
}

/// Открывает источник по конфигурации.
pub fn open_source(config: &MonitorConfig) -> MonitorResult<Box<dyn Read + Send>> {
    match &config.endpoint {
        Endpoint::Serial(path) => Ok(Box::new(SerialSource::open(path, config.baud_rate)?)),
        Endpoint::Simulated => Ok(Box::new(SimulatedSource::new(
            config.baud_rate,
            config.sim_noise,
        ))),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
