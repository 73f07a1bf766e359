use crate::config::AppConfig;
use crate::persistence::{open_history, FileStore};
use crate::wheel::Wheel;
use anyhow::{Context, Result};
use arcana_core::{
    all_spreads_in, find_card, find_spread, question_templates, DrawMode, DrawnCard, Event,
    EventBus, HistoryStore, Interpretation, InterpretationTicket, Locale, ReadingResult, Session,
    Spread, Step,
};
use arcana_oracle::{fallback_interpretation, record_interpretation, Interpreter};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

const MAX_EVENT_LOG: usize = 200;
const MAX_QUESTION_CHARS: usize = 200;

struct PendingReading {
    ticket: InterpretationTicket,
    cards: Vec<DrawnCard>,
    rx: oneshot::Receiver<Interpretation>,
}

pub struct App {
    pub locale: Locale,
    pub session: Session,
    pub history: HistoryStore<FileStore>,
    pub events: EventBus,
    pub wheel: Wheel,
    pub spreads: Vec<Spread>,
    pub spread_cursor: usize,
    pub question_input: String,
    pub template_cursor: Option<usize>,
    pub history_cursor: usize,
    pub show_history: bool,
    pub show_help: bool,
    pub show_meanings: bool,
    pub reading_scroll: u16,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub should_quit: bool,
    interpreter: Arc<Interpreter>,
    runtime: Runtime,
    pending: Option<PendingReading>,
    press_moved: Option<bool>,
    last_tick: Instant,
}

impl App {
    pub fn bootstrap(config: &AppConfig, offline: bool) -> Result<Self> {
        let interpreter = if offline {
            Interpreter::offline()
        } else {
            Interpreter::from_config(&config.oracle)
        };
        let history = open_history(config.data_dir());
        Self::new(config, history, interpreter)
    }

    pub fn new(
        config: &AppConfig,
        history: HistoryStore<FileStore>,
        interpreter: Interpreter,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("start async runtime")?;
        let locale = config.locale();
        let mut session = Session::new(config.session.clone(), locale, config.rng());
        session.set_tone(config.tone);
        session.set_draw_mode(config.draw_mode);

        let mut app = Self {
            locale,
            session,
            history,
            events: EventBus::default(),
            wheel: Wheel::default(),
            spreads: all_spreads_in(locale),
            spread_cursor: 0,
            question_input: String::new(),
            template_cursor: None,
            history_cursor: 0,
            show_history: false,
            show_help: false,
            show_meanings: config.show_meanings,
            reading_scroll: 0,
            event_log: VecDeque::new(),
            status_line: locale.text("ready", "准备就绪").to_string(),
            should_quit: false,
            interpreter: Arc::new(interpreter),
            runtime,
            pending: None,
            press_moved: None,
            last_tick: Instant::now(),
        };
        app.push_event_line(format!(
            "{}: {}",
            locale.text("saved readings", "历史解读"),
            app.history.len()
        ));
        let provider_line = match app.interpreter.provider_name() {
            Some(name) => format!("{}: {name}", locale.text("interpreter", "解读服务")),
            None => locale
                .text(
                    "interpreter offline, readings use fallback text",
                    "解读服务离线，将使用默认文本",
                )
                .to_string(),
        };
        app.push_event_line(provider_line);
        Ok(app)
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.advance_clock(elapsed);
    }

    /// Runs due session jobs and picks up a finished interpretation.
    pub fn advance_clock(&mut self, elapsed: Duration) {
        self.session.advance(elapsed, &mut self.events);
        self.poll_interpretation();
        self.flush_events();
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    /// Line editing on the question step. Returns true when the key was used.
    pub fn handle_text_key(&mut self, key: KeyEvent) -> bool {
        if self.session.step() != Step::Question || self.show_help || self.show_history {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => self.submit_question(),
            KeyCode::Backspace => {
                self.question_input.pop();
                self.template_cursor = None;
            }
            KeyCode::Up => self.cycle_template(false),
            KeyCode::Down | KeyCode::Tab => self.cycle_template(true),
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::ALT)
                    && self.question_input.chars().count() < MAX_QUESTION_CHARS
                {
                    self.question_input.push(ch);
                }
            }
            _ => return false,
        }
        true
    }

    /// Drag rotates the wheel; a click without movement draws the top card.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, wheel_area: Rect) {
        if self.session.step() != Step::ShuffleAndDraw || self.show_help || self.show_history {
            return;
        }
        let (dx, dy) = pointer_offset(mouse.column, mouse.row, wheel_area);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(wheel_area, mouse.column, mouse.row) {
                    self.wheel.begin_drag(dx, dy);
                    self.press_moved = Some(false);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.wheel.is_dragging() {
                    self.wheel.drag_to(dx, dy);
                    self.press_moved = Some(true);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.wheel.end_drag();
                if self.press_moved.take() == Some(false) {
                    self.draw_card();
                }
            }
            MouseEventKind::ScrollUp => self.rotate(false),
            MouseEventKind::ScrollDown => self.rotate(true),
            _ => {}
        }
    }

    pub fn confirm(&mut self) {
        if self.show_history {
            self.replay_selected();
            return;
        }
        match self.session.step() {
            Step::Welcome => self.start(),
            Step::Question => self.submit_question(),
            Step::SpreadSelect => self.select_spread(),
            Step::ShuffleAndDraw => match self.session.draw_mode() {
                DrawMode::Manual => self.draw_card(),
                DrawMode::Auto => self.auto_draw(),
            },
            Step::Reveal => {
                if self.session.all_revealed() {
                    self.request_interpretation();
                } else {
                    self.reveal_next();
                }
            }
            Step::Reading => {}
        }
    }

    pub fn flip(&mut self) {
        match self.session.step() {
            Step::ShuffleAndDraw => self.draw_card(),
            Step::Reveal => self.reveal_next(),
            _ => {}
        }
    }

    pub fn auto(&mut self) {
        match self.session.step() {
            Step::ShuffleAndDraw => self.auto_draw(),
            Step::Reveal => self.reveal_all(),
            _ => {}
        }
    }

    pub fn start(&mut self) {
        let _ = self.session.start(&mut self.events);
        self.flush_events();
    }

    pub fn submit_question(&mut self) {
        let text = self.question_input.clone();
        if self.session.submit_question(&text, &mut self.events).is_ok() {
            self.question_input.clear();
            self.template_cursor = None;
        }
        self.flush_events();
    }

    pub fn select_spread(&mut self) {
        let Some(spread) = self.spreads.get(self.spread_cursor).cloned() else {
            return;
        };
        if self.session.select_spread(spread, &mut self.events).is_ok() {
            self.wheel.reset();
        }
        self.flush_events();
    }

    /// Draws the card at the top of the wheel.
    pub fn draw_card(&mut self) {
        let Some(index) = self.wheel.top_index(self.session.deck().visuals()) else {
            return;
        };
        let _ = self.session.draw_at(index, &mut self.events);
        self.flush_events();
    }

    pub fn auto_draw(&mut self) {
        let _ = self.session.auto_draw_remaining(&mut self.events);
        self.flush_events();
    }

    pub fn reveal_next(&mut self) {
        let index = self.session.revealed_count();
        let _ = self.session.reveal_next(index, &mut self.events);
        self.flush_events();
    }

    pub fn reveal_all(&mut self) {
        let _ = self.session.reveal_all(&mut self.events);
        self.flush_events();
    }

    /// Starts the interpretation on the runtime; the result is collected on a
    /// later tick.
    pub fn request_interpretation(&mut self) {
        let request = match self.session.begin_interpretation(&mut self.events) {
            Ok(request) => request,
            Err(_) => {
                self.flush_events();
                return;
            }
        };
        let (tx, rx) = oneshot::channel();
        let interpreter = Arc::clone(&self.interpreter);
        let ticket = request.ticket;
        let cards = request.cards.clone();
        self.runtime.spawn(async move {
            let interpretation = interpreter.interpret(&request).await;
            let _ = tx.send(interpretation);
        });
        self.pending = Some(PendingReading { ticket, cards, rx });
        self.push_status(self.locale.text("consulting the cards...", "正在连接宇宙能量..."));
        self.flush_events();
    }

    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.show_history {
            self.show_history = false;
            return;
        }
        let _ = self.session.go_back(&mut self.events);
        self.flush_events();
    }

    pub fn new_reading(&mut self) {
        self.pending = None;
        self.session.reset(&mut self.events);
        self.question_input.clear();
        self.template_cursor = None;
        self.wheel.reset();
        self.press_moved = None;
        self.reading_scroll = 0;
        self.show_history = false;
        self.push_status(self.locale.text("new reading", "新的占卜"));
        self.flush_events();
    }

    pub fn move_cursor(&mut self, down: bool) {
        if self.show_history {
            move_index(&mut self.history_cursor, self.history.len(), down);
            return;
        }
        match self.session.step() {
            Step::SpreadSelect => move_index(&mut self.spread_cursor, self.spreads.len(), down),
            Step::ShuffleAndDraw => self.rotate(down),
            Step::Reading => {
                self.reading_scroll = if down {
                    self.reading_scroll.saturating_add(1)
                } else {
                    self.reading_scroll.saturating_sub(1)
                };
            }
            _ => {}
        }
    }

    pub fn rotate(&mut self, forward: bool) {
        if self.session.step() == Step::ShuffleAndDraw {
            self.wheel.step(forward, self.session.deck().len());
        }
    }

    pub fn toggle_draw_mode(&mut self) {
        let mode = self.session.draw_mode().toggled();
        self.session.set_draw_mode(mode);
        self.push_status(format!(
            "{}: {}",
            self.locale.text("draw mode", "抽牌方式"),
            mode.label(self.locale)
        ));
    }

    pub fn cycle_tone(&mut self) {
        let tone = self.session.tone().next();
        self.session.set_tone(tone);
        self.push_status(format!(
            "{}: {}",
            self.locale.text("tone", "解读风格"),
            tone.label(self.locale)
        ));
    }

    pub fn toggle_meanings(&mut self) {
        self.show_meanings = !self.show_meanings;
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        self.history_cursor = self.history_cursor.min(self.history.len().saturating_sub(1));
    }

    pub fn templates(&self) -> Vec<&'static str> {
        question_templates(self.locale)
    }

    pub fn spread_name(&self, id: &str) -> String {
        find_spread(id, self.locale)
            .map(|spread| spread.name)
            .unwrap_or_else(|| id.to_string())
    }

    /// One line per saved reading, newest first.
    pub fn history_rows(&self) -> Vec<String> {
        self.history
            .load_all()
            .iter()
            .map(|reading| format_history_row(self.locale, reading, &self.spread_name(&reading.spread_id)))
            .collect()
    }

    pub fn hint(&self) -> String {
        let text = match self.session.step() {
            Step::Welcome => self.locale.text("Enter begin | H history | ? help", "回车 开始 | H 历史 | ? 帮助"),
            Step::Question => self.locale.text(
                "type your question | up/down templates | Enter confirm | Esc back",
                "输入问题 | 上下键 选择示例 | 回车 确认 | Esc 返回",
            ),
            Step::SpreadSelect => self.locale.text(
                "up/down choose | m draw mode | Enter shuffle | Esc back",
                "上下键 选择 | m 抽牌方式 | 回车 洗牌 | Esc 返回",
            ),
            Step::ShuffleAndDraw => match self.session.draw_mode() {
                DrawMode::Manual => self.locale.text(
                    "drag or arrows rotate | Enter/space/click draw | a auto",
                    "拖动或方向键旋转 | 回车/空格/点击 抽牌 | a 自动",
                ),
                DrawMode::Auto => self
                    .locale
                    .text("Enter draw all | arrows rotate", "回车 一键抽取 | 方向键 旋转"),
            },
            Step::Reveal => {
                if self.is_loading() {
                    self.locale.text("consulting the cards...", "正在连接宇宙能量...")
                } else if self.session.all_revealed() {
                    self.locale.text("Enter/i interpret | n new reading", "回车/i 解读 | n 重新开始")
                } else {
                    self.locale.text("space reveal next | a reveal all", "空格 翻开下一张 | a 全部翻开")
                }
            }
            Step::Reading => self.locale.text(
                "up/down scroll | v meanings | n new reading | H history",
                "上下键 滚动 | v 牌义 | n 重新开始 | H 历史",
            ),
        };
        text.to_string()
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    fn cycle_template(&mut self, forward: bool) {
        let templates = self.templates();
        if templates.is_empty() {
            return;
        }
        let next = match (self.template_cursor, forward) {
            (None, true) => 0,
            (None, false) => templates.len() - 1,
            (Some(idx), true) => (idx + 1) % templates.len(),
            (Some(idx), false) => (idx + templates.len() - 1) % templates.len(),
        };
        self.template_cursor = Some(next);
        self.question_input = templates[next].to_string();
    }

    fn replay_selected(&mut self) {
        let Some(reading) = self
            .history
            .load_all()
            .get(self.history_cursor)
            .and_then(|reading| self.history.select_for_replay(&reading.id))
        else {
            return;
        };
        self.pending = None;
        self.session.restore(reading, &mut self.events);
        self.show_history = false;
        self.reading_scroll = 0;
        self.flush_events();
    }

    fn poll_interpretation(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let interpretation = match pending.rx.try_recv() {
            Ok(interpretation) => interpretation,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                tracing::warn!("interpretation task ended without a result");
                fallback_interpretation(&pending.cards, self.locale)
            }
        };
        let ticket = pending.ticket;
        self.pending = None;
        match record_interpretation(
            &mut self.session,
            &mut self.history,
            ticket,
            interpretation,
            now_millis(),
            &mut self.events,
        ) {
            Ok(reading) => {
                self.reading_scroll = 0;
                self.history_cursor = 0;
                self.push_status(format!(
                    "{} #{}",
                    self.locale.text("reading saved", "解读已保存"),
                    reading.id
                ));
            }
            Err(err) => tracing::debug!(%err, "interpretation discarded"),
        }
    }

    fn flush_events(&mut self) {
        let drained: Vec<_> = self.events.drain().collect();
        for event in drained {
            self.push_event_line(format_event(self.locale, &event));
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

fn move_index(value: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *value = 0;
        return;
    }
    *value = if down {
        (*value + 1) % len
    } else if *value == 0 {
        len - 1
    } else {
        *value - 1
    };
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Offset of a cell from the centre of `area`. Rows count double because a
/// terminal cell is about twice as tall as it is wide.
pub fn pointer_offset(column: u16, row: u16, area: Rect) -> (f64, f64) {
    let cx = f64::from(area.x) + f64::from(area.width) / 2.0;
    let cy = f64::from(area.y) + f64::from(area.height) / 2.0;
    (
        f64::from(column) + 0.5 - cx,
        (f64::from(row) + 0.5 - cy) * 2.0,
    )
}

pub fn format_history_row(locale: Locale, reading: &ReadingResult, spread_name: &str) -> String {
    let when = chrono::DateTime::from_timestamp_millis(reading.timestamp as i64)
        .map(|at| {
            at.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| reading.id.clone());
    format!(
        "{when} | {} | {} | {spread_name} | {} {}",
        reading.tone.label(locale),
        reading.question,
        reading.cards.len(),
        locale.text("cards", "张")
    )
}

fn card_name(locale: Locale, id: &str) -> String {
    find_card(id, locale)
        .map(|card| card.name)
        .unwrap_or_else(|| id.to_string())
}

fn format_event(locale: Locale, event: &Event) -> String {
    match event {
        Event::StepChanged { from, to } => format!(
            "{} {} -> {}",
            locale.text("step", "步骤"),
            from.label(locale),
            to.label(locale)
        ),
        Event::DeckShuffled { spread, cards } => format!(
            "{} {cards} {} ({spread})",
            locale.text("shuffled", "已洗牌"),
            locale.text("cards", "张")
        ),
        Event::CardDrawn {
            card,
            position_index,
            position_name,
            reversed,
        } => {
            let orientation = if *reversed {
                locale.text("reversed", "逆位")
            } else {
                locale.text("upright", "正位")
            };
            format!(
                "{} #{} {position_name}: {} ({orientation})",
                locale.text("drew", "抽到"),
                position_index + 1,
                card_name(locale, card)
            )
        }
        Event::CardRevealed { index } => {
            format!("{} #{}", locale.text("revealed", "翻开"), index + 1)
        }
        Event::RevealSequenceStarted { remaining } => format!(
            "{} ({remaining})",
            locale.text("revealing all", "全部翻开")
        ),
        Event::RevealSequenceCancelled => {
            locale.text("reveal sequence restarted", "翻牌序列已重启").to_string()
        }
        Event::InterpretationRequested { cards } => format!(
            "{} ({cards} {})",
            locale.text("interpretation requested", "请求解读"),
            locale.text("cards", "张")
        ),
        Event::ReadingCompleted { id } => {
            format!("{} #{id}", locale.text("reading complete", "解读完成"))
        }
        Event::ReadingRestored { id } => {
            format!("{} #{id}", locale.text("reading restored", "已载入历史解读"))
        }
        Event::SessionReset => locale.text("session reset", "已重新开始").to_string(),
    }
}
