use crate::app::{update, AppMsg, Effect};
use crate::model::AppConfig;
use crate::widgets::builder_form::BuilderWidget;
use crate::widgets::field_table::draw_field_table;
use crate::widgets::header::draw_header;
use crate::widgets::result_viewer::ResultViewerWidget;
use crate::widgets::runtime_form::RuntimeWidget;
use crate::widgets::status_bar::draw_footer;
use crate::widgets::Widget;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) view: View,
    pub(crate) builder: BuilderWidget,
    pub(crate) runtime: Option<RuntimeWidget>,
    pub(crate) result: Option<ResultViewerWidget>,
    pub(crate) last_submission: Option<JsonValue>,
    // Lines for the stdout sink, printed after the terminal is restored
    pub(crate) stdout_queue: Vec<String>,
    pub(crate) tick: u64,
    pub(crate) toast: Option<Toast>,
    pub(crate) theme: crate::theme::Theme,
    // Debug log (rendered in bottom debug pane)
    pub(crate) debug_log: VecDeque<String>,
    pub(crate) quit: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    #[default]
    Builder,
    Runtime,
    Result,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let theme = crate::theme::Theme::from_choice(config.theme);
        let builder = BuilderWidget::new(config.title.clone(), Default::default());
        Self {
            config,
            builder,
            theme,
            ..Default::default()
        }
    }

    pub fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg.into());
    }

    fn focused_widget(&self) -> Option<&dyn Widget> {
        match self.view {
            View::Builder => Some(&self.builder),
            View::Runtime => self.runtime.as_ref().map(|w| w as &dyn Widget),
            View::Result => self.result.as_ref().map(|w| w as &dyn Widget),
        }
    }

    fn focused_widget_mut(&mut self) -> Option<&mut dyn Widget> {
        match self.view {
            View::Builder => Some(&mut self.builder),
            View::Runtime => self.runtime.as_mut().map(|w| w as &mut dyn Widget),
            View::Result => self.result.as_mut().map(|w| w as &mut dyn Widget),
        }
    }

    pub fn focused_is_editing(&self) -> bool {
        self.focused_widget().is_some_and(|w| w.is_editing())
    }

    fn help_text(&self) -> &'static str {
        self.focused_widget()
            .map(|w| w.help_text())
            .unwrap_or("q quit")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

pub(crate) fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::CreateForm => {
                let more = update(state, AppMsg::CreateForm);
                run_effects(state, more);
            }
            Effect::Submit { payload } => {
                state.dbg(format!("submit via {:?}", state.config.submit.sink));
                let outcome = crate::services::submit::deliver(
                    &state.config.submit,
                    &payload,
                    &mut state.stdout_queue,
                )
                .map_err(|e| format!("{e:#}"));
                if let Err(e) = &outcome {
                    state.dbg(format!("sink error: {e}"));
                }
                let more = update(state, AppMsg::Submitted { payload, outcome });
                run_effects(state, more);
            }
            Effect::BackToForm => {
                let more = update(state, AppMsg::BackToForm);
                run_effects(state, more);
            }
            Effect::CopyToClipboard { text } => {
                let copied = arboard::Clipboard::new().and_then(|mut c| c.set_text(text));
                let (text, level) = match copied {
                    Ok(()) => ("Copied to clipboard!".to_string(), ToastLevel::Info),
                    Err(e) => (format!("Clipboard unavailable: {e}"), ToastLevel::Error),
                };
                state.dbg(&text);
                run_effects(
                    state,
                    vec![Effect::ShowToast {
                        text,
                        level,
                        seconds: 2,
                    }],
                );
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                let exp = state.tick.saturating_add(ticks);
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: exp,
                });
            }
            Effect::Debug(msg) => state.dbg(msg),
        }
    }
}

/// Global shortcuts first, then the focused widget. Printable keys go to the
/// widget while it is editing.
pub(crate) fn dispatch_key(state: &mut AppState, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        state.quit = true;
        return;
    }
    if code == KeyCode::Char('q') && !state.focused_is_editing() {
        state.quit = true;
        return;
    }
    let effects = match state.focused_widget_mut() {
        Some(w) => w.on_key(code),
        None => Vec::new(),
    };
    run_effects(state, effects);
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    let (cfg, path) = crate::services::config::load_config()?;
    let mut state = AppState::new(cfg);
    match &path {
        Some(p) => state.dbg(format!("config: {}", p.display())),
        None => state.dbg("config: defaults (no formforge.yaml found)"),
    }
    state.config_path = path;

    // Headless smoke mode
    if env_flag("FORMFORGE_HEADLESS") {
        let ticks: u64 = std::env::var("FORMFORGE_TICKS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend)?;
        for _ in 0..ticks {
            terminal.draw(|f| ui(f, &mut state))?;
            let effs = update(&mut state, AppMsg::Tick);
            run_effects(&mut state, effs);
        }
        if env_flag("FORMFORGE_SMOKE_SUMMARY") {
            let summary = serde_json::json!({
                "ok": true,
                "view": format!("{:?}", state.view),
                "fields": state.builder.session.accepted().len(),
                "ticks": state.tick,
                "config": state.config_path.as_ref().map(|p| p.display().to_string()),
            });
            println!("{summary}");
        }
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    let res: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut state)) {
            break Err(e.into());
        }
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    dispatch_key(&mut state, key.code, key.modifiers);
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
        if state.quit {
            break Ok(());
        }
        if last_tick.elapsed() >= tick_rate {
            let effs = update(&mut state, AppMsg::Tick);
            run_effects(&mut state, effs);
            last_tick = Instant::now();
        }
    };
    // Restore
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    for line in state.stdout_queue.drain(..) {
        println!("{line}");
    }
    res
}

pub(crate) fn ui(f: &mut Frame, state: &mut AppState) {
    let screen = f.area();
    let bg = Block::default().style(state.theme.base_style());
    f.render_widget(bg, screen);

    let mut constraints = vec![Constraint::Length(2), Constraint::Min(0)];
    const DEBUG_H: u16 = 5;
    if state.config.debug_pane {
        constraints.push(Constraint::Length(DEBUG_H));
    }
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(screen);

    draw_header(f, chunks[0], state);
    let main = chunks[1];
    let tick = state.tick;
    match state.view {
        View::Builder => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(main);
            state.builder.render(f, cols[0], true, &state.theme, tick);
            draw_field_table(f, cols[1], state.builder.session.accepted(), &state.theme);
        }
        View::Runtime => match &mut state.runtime {
            Some(w) => w.render(f, main, true, &state.theme, tick),
            None => draw_missing(f, main, "No form created yet", state),
        },
        View::Result => match &mut state.result {
            Some(w) => w.render(f, main, true, &state.theme, tick),
            None => draw_missing(f, main, "Nothing submitted yet", state),
        },
    }
    if state.config.debug_pane {
        draw_debug(f, chunks[2], state);
    }
    let footer = chunks[chunks.len() - 1];
    draw_footer(f, footer, state, state.help_text());
}

fn draw_missing(f: &mut Frame, area: Rect, text: &str, state: &AppState) {
    let block = crate::widgets::chrome::panel_block("", true, &state.theme);
    let p = Paragraph::new(Span::styled(text.to_string(), state.theme.text_muted())).block(block);
    f.render_widget(p, area);
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let b = Block::default()
        .borders(Borders::TOP)
        .border_style(state.theme.border_unfocused())
        .title(Span::styled(
            "Debug",
            state.theme.text_muted().add_modifier(Modifier::BOLD),
        ));
    // Take last `area.height - 1` lines (top border)
    let h = area.height.saturating_sub(1) as usize;
    let total = state.debug_log.len();
    let start = total.saturating_sub(h);
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(start)
        .map(|s| Line::raw(s.clone()))
        .collect();
    let p = Paragraph::new(lines)
        .style(state.theme.text_muted())
        .block(b)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
