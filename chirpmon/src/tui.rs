//! Терминальная панель: баннер, сетка 6×3 слотов (график + сводка), статус.
//!
//! Отрисовка идёт в отдельном потоке и просыпается по [`RenderRequest`]
//! от пайплайна. Между запросами опрашивается клавиатура.

use std::{
    io::{self, Stdout},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chirpmon_core::{DisplayState, RenderRequest, SlotView};
use chirpmon_types::{CHANNEL_COUNT, SAMPLES_PER_BLOCK, SLOT_COUNT};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, warn};
use parking_lot::RwLock;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use crate::{metrics::MonitorMetrics, MonitorError, MonitorResult};

/// Как долго ждать запроса отрисовки перед опросом клавиатуры.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Слотов в строке сетки.
const SLOTS_PER_ROW: usize = SLOT_COUNT / CHANNEL_COUNT;

/// Почему панель завершилась.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    /// Пользователь нажал q / Esc / Ctrl+C
    Quit,
    /// Пайплайн закрыл канал отрисовки
    StreamEnded,
}

/// Терминал в raw-режиме. Восстанавливается при drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> MonitorResult<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {e}");
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {e}");
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Поток отрисовки.
pub struct Dashboard {
    state: Arc<RwLock<DisplayState>>,
    metrics: Arc<MonitorMetrics>,
    redraw_rx: Receiver<RenderRequest>,
    stop_flag: Arc<AtomicBool>,
    session_start: Instant,
}

impl Dashboard {
    pub fn new(
        state: Arc<RwLock<DisplayState>>,
        metrics: Arc<MonitorMetrics>,
        redraw_rx: Receiver<RenderRequest>,
        stop_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            state,
            metrics,
            redraw_rx,
            stop_flag,
            session_start: Instant::now(),
        }
    }

    /// Захватывает терминал и рисует до выхода. Терминал восстанавливается
    /// до возврата из функции.
    pub fn run(self) -> MonitorResult<UiExit> {
        let mut guard = TerminalGuard::enter()?;
        self.redraw(&mut guard)?;

        loop {
            match self.redraw_rx.recv_timeout(INPUT_POLL) {
                Ok(RenderRequest::Redraw) => self.redraw(&mut guard)?,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Render channel closed");
                    return Ok(UiExit::StreamEnded);
                }
            }

            if quit_requested()? || self.stop_flag.load(Ordering::Relaxed) {
                return Ok(UiExit::Quit);
            }
        }
    }

    fn redraw(
        &self,
        guard: &mut TerminalGuard,
    ) -> MonitorResult<()> {
        // Снимок под коротким read-lock, рисуем уже без блокировки
        let snapshot = self.state.read().clone();
        let status = self.metrics.status_line(&self.session_start);

        guard
            .terminal
            .draw(|f| draw_dashboard(f, &snapshot, &status))
            .map_err(|e| MonitorError::Terminal(e.to_string()))?;

        Ok(())
    }
}

/// Забирает все ожидающие события клавиатуры.
fn quit_requested() -> MonitorResult<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if is_quit_key(&key) {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// q, Esc или Ctrl+C (в raw-режиме Ctrl+C не превращается в сигнал).
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

////////////////////////////////////////////////////////////////////////////////
// Отрисовка
////////////////////////////////////////////////////////////////////////////////

/// Рисует всю панель по снимку состояния.
pub fn draw_dashboard(
    f: &mut Frame,
    state: &DisplayState,
    status: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(CHANNEL_COUNT as u16 * 3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let banner = Paragraph::new(state.banner.as_str())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(banner, chunks[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, CHANNEL_COUNT as u32); CHANNEL_COUNT])
        .split(chunks[1]);

    for (r, row_area) in rows.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, (SLOTS_PER_ROW * 2) as u32); SLOTS_PER_ROW * 2])
            .split(*row_area);

        for c in 0..SLOTS_PER_ROW {
            let view = &state.slots[r * SLOTS_PER_ROW + c];
            draw_chart(f, view, cells[c * 2]);
            draw_summary(f, view, cells[c * 2 + 1]);
        }
    }

    let footer = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[2]);
}

fn draw_chart(
    f: &mut Frame,
    view: &SlotView,
    area: Rect,
) {
    let points: Vec<(f64, f64)> = view
        .series
        .iter()
        .enumerate()
        .map(|(k, &m)| (k as f64, m))
        .collect();

    let y_max = view.series.iter().copied().fold(1.0, f64::max);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Line)
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, (SAMPLES_PER_BLOCK - 1) as f64]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max]),
        );

    f.render_widget(chart, area);
}

fn draw_summary(
    f: &mut Frame,
    view: &SlotView,
    area: Rect,
) {
    let summary = Paragraph::new(view.summary.as_str()).block(
        Block::default()
            .title(view.label.as_str())
            .borders(Borders::ALL),
    );

    f.render_widget(summary, area);
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
