//! Синхронизация по маркеру и чтение кадров фиксированного размера.
//!
//! Поток байт не имеет внешнего фрейминга: кадр начинается сразу после
//! маркера `cafebabe`. После каждого кадра поиск маркера начинается заново,
//! поэтому один испорченный кадр не сбивает синхронизацию навсегда.

use std::io::{BufReader, ErrorKind, Read};

use chirpmon_types::{ChirpError, ChirpResult, Frame, FRAME_SIZE, MARKER};
use log::debug;

/// Статистика, накопленная [`FrameSync`] в процессе чтения.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    /// Сколько раз маркер найден целиком.
    pub markers_found: u64,
    /// Полностью прочитанных кадров.
    pub frames_read: u64,
    /// Байт, отброшенных при поиске маркера.
    pub bytes_skipped: u64,
}

/// Потоковый синхронизатор и читатель кадров.
pub struct FrameSync<R: Read> {
    reader: BufReader<R>,
    frame: Frame,
    stats: SyncStats,
}

impl<R: Read> FrameSync<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            frame: [0u8; FRAME_SIZE],
            stats: SyncStats::default(),
        }
    }

    /// Ищет маркер, читая по одному байту. Возвращается сразу после
    /// последнего байта маркера.
    pub fn scan_marker(&mut self) -> ChirpResult<()> {
        let mut matched = 0usize;
        let mut consumed = 0u64;

        while matched < MARKER.len() {
            let byte = self.read_byte()?;
            consumed += 1;

            if byte == MARKER[matched] {
                matched += 1;
            } else {
                // Перезапуск с текущего байта: в маркере нет самоперекрытий,
                // кроме повтора первого символа
                matched = usize::from(byte == MARKER[0]);
            }
        }

        let skipped = consumed - MARKER.len() as u64;
        if skipped > 0 {
            debug!("Resynchronized after skipping {skipped} bytes");
        }

        self.stats.bytes_skipped += skipped;
        self.stats.markers_found += 1;

        Ok(())
    }

    /// Читает ровно `FRAME_SIZE` байт в переиспользуемый буфер.
    ///
    /// Неполный кадр никогда не отдаётся: обрыв потока даёт [`ChirpError::ShortFrame`].
    pub fn read_frame(&mut self) -> ChirpResult<&Frame> {
        let mut filled = 0usize;

        while filled < FRAME_SIZE {
            match self.reader.read(&mut self.frame[filled..]) {
                Ok(0) => {
                    return Err(ChirpError::ShortFrame {
                        expected: FRAME_SIZE,
                        got: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ChirpError::Io(e)),
            }
        }

        self.stats.frames_read += 1;
        Ok(&self.frame)
    }

    /// Маркер + кадр.
    pub fn next_frame(&mut self) -> ChirpResult<&Frame> {
        self.scan_marker()?;
        self.read_frame()
    }

    /// Накопленная статистика синхронизации.
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read_byte(&mut self) -> ChirpResult<u8> {
        let mut b = [0u8; 1];
        loop {
            match self.reader.read(&mut b) {
                Ok(0) => return Err(ChirpError::StreamClosed),
                Ok(_) => return Ok(b[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ChirpError::Io(e)),
            }
        }
    }
}
