use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs, Wrap},
};

use crate::palette::Palette;
use crate::quiz::{QuizQuestion, QuizResult};
use crate::tui::Theme;

const PAGE_SCROLL: u16 = 10;
const PLAIN_COLUMN_WIDTH: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizTab {
    Questions,
    AnswerKey,
}

impl QuizTab {
    pub const TITLES: [&'static str; 2] = ["Questions", "Answer Key"];

    fn index(self) -> usize {
        match self {
            QuizTab::Questions => 0,
            QuizTab::AnswerKey => 1,
        }
    }

    fn toggle(self) -> Self {
        match self {
            QuizTab::Questions => QuizTab::AnswerKey,
            QuizTab::AnswerKey => QuizTab::Questions,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct QuizViewState {
    tab: QuizTab,
    current: usize,
    total: usize,
    answer_scroll: u16,
}

impl QuizViewState {
    pub fn new(total: usize) -> Self {
        Self {
            tab: QuizTab::Questions,
            current: 0,
            total,
            answer_scroll: 0,
        }
    }

    pub fn tab(&self) -> QuizTab {
        self.tab
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        if key.code == KeyCode::Esc
            || key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return ViewAction::Exit;
        }

        match (self.tab, key.code) {
            (_, KeyCode::Tab | KeyCode::BackTab) => self.tab = self.tab.toggle(),
            (_, KeyCode::Char('1')) => self.tab = QuizTab::Questions,
            (_, KeyCode::Char('2')) => self.tab = QuizTab::AnswerKey,
            (QuizTab::Questions, KeyCode::Right | KeyCode::Char('n') | KeyCode::Char(' ')) => {
                if self.current + 1 < self.total {
                    self.current += 1;
                }
            }
            (QuizTab::Questions, KeyCode::Left | KeyCode::Char('p')) => {
                self.current = self.current.saturating_sub(1);
            }
            (QuizTab::AnswerKey, KeyCode::Down | KeyCode::Char('j')) => {
                self.answer_scroll = self.answer_scroll.saturating_add(1);
            }
            (QuizTab::AnswerKey, KeyCode::Up | KeyCode::Char('k')) => {
                self.answer_scroll = self.answer_scroll.saturating_sub(1);
            }
            (QuizTab::AnswerKey, KeyCode::PageDown) => {
                self.answer_scroll = self.answer_scroll.saturating_add(PAGE_SCROLL);
            }
            (QuizTab::AnswerKey, KeyCode::PageUp) => {
                self.answer_scroll = self.answer_scroll.saturating_sub(PAGE_SCROLL);
            }
            _ => {}
        }
        ViewAction::Continue
    }
}

/// Shows the quiz until the user closes the view.
pub fn show_quiz(quiz: &QuizResult, title: &str) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = restore_on_error(enter_quiz_screen, abandon_quiz_screen)?;

    let mut state = QuizViewState::new(quiz.len());
    let loop_result = view_loop(&mut terminal, quiz, title, &mut state);

    teardown_terminal(&mut terminal)?;
    loop_result
}

fn view_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    quiz: &QuizResult,
    title: &str,
    state: &mut QuizViewState,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| draw(frame, quiz, title, state))
            .context("failed to render frame")?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if state.handle_key(key) == ViewAction::Exit {
                return Ok(());
            }
        }
    }
}

fn enter_quiz_screen() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to configure terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to start terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;
    Ok(terminal)
}

// Errors here are dropped; the caller returns the setup error.
fn abandon_quiz_screen() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Runs `setup`, calling `restore` before handing back any error.
fn restore_on_error<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| restore())
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to restore terminal")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

pub fn draw(frame: &mut Frame<'_>, quiz: &QuizResult, title: &str, state: &QuizViewState) {
    let area = frame.area();
    frame.render_widget(Theme::backdrop(), area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    let tabs = Tabs::new(QuizTab::TITLES.to_vec())
        .select(state.tab.index())
        .highlight_style(Theme::active_tab())
        .divider(Theme::bullet())
        .block(Theme::panel(title));
    frame.render_widget(tabs, chunks[0]);

    match state.tab {
        QuizTab::Questions => {
            if let Some(question) = quiz.questions.get(state.current) {
                draw_question(frame, chunks[1], question, state.current, quiz.len());
            }
        }
        QuizTab::AnswerKey => {
            let answers = Paragraph::new(answer_key_lines(quiz))
                .block(Theme::panel("Answer Key"))
                .wrap(Wrap { trim: false })
                .scroll((state.answer_scroll, 0));
            frame.render_widget(answers, chunks[1]);
        }
    }

    let footer = Paragraph::new(controls_line(state.tab))
        .block(Theme::panel_with_line(Theme::section_header("Controls")));
    frame.render_widget(footer, chunks[2]);
}

fn draw_question(
    frame: &mut Frame<'_>,
    area: Rect,
    question: &QuizQuestion,
    idx: usize,
    total: usize,
) {
    let block = Theme::panel(format!("Question {}/{}", idx + 1, total));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(6)])
        .split(inner);

    let text = Paragraph::new(Line::from(Span::styled(
        question.question.clone(),
        Theme::emphasis(),
    )))
    .wrap(Wrap { trim: true });
    frame.render_widget(text, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let [left, right] = option_column_lines(question);
    frame.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), columns[0]);
    frame.render_widget(Paragraph::new(right).wrap(Wrap { trim: true }), columns[1]);
}

pub fn option_column_lines(question: &QuizQuestion) -> [Vec<Line<'static>>; 2] {
    let (left, right) = question.option_columns();
    let to_lines = |options: &[String]| {
        options
            .iter()
            .flat_map(|option| [Line::from(option.clone()), Line::default()])
            .collect::<Vec<_>>()
    };
    [to_lines(left), to_lines(right)]
}

pub fn answer_key_lines(quiz: &QuizResult) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, question) in quiz.iter().enumerate() {
        lines.push(Theme::section_header(format!("Question {} - Answer", idx + 1)));
        lines.push(Line::from(vec![
            Span::styled("Correct Answer: ", Theme::success()),
            Theme::span(question.answer.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Explanation: ", Theme::label()),
            Theme::span(question.explanation.clone()),
        ]));
        lines.push(Line::from(Span::styled("─".repeat(24), Theme::muted())));
    }
    lines
}

fn controls_line(tab: QuizTab) -> Line<'static> {
    let mut spans = vec![Theme::key_chip("Tab"), Theme::span(" switch tab")];
    match tab {
        QuizTab::Questions => {
            spans.extend([
                Theme::bullet(),
                Theme::key_chip("←"),
                Theme::span(" / "),
                Theme::key_chip("→"),
                Theme::span(" previous / next"),
            ]);
        }
        QuizTab::AnswerKey => {
            spans.extend([
                Theme::bullet(),
                Theme::key_chip("↑"),
                Theme::span(" / "),
                Theme::key_chip("↓"),
                Theme::span(" scroll"),
            ]);
        }
    }
    spans.extend([
        Theme::bullet(),
        Theme::key_chip("Esc"),
        Theme::span(" / "),
        Theme::key_chip("q"),
        Theme::span(" close"),
    ]);
    Line::from(spans)
}

/// Pads by terminal cell width so combining marks don't shift the next column.
fn pad_to_width(text: &str, width: usize) -> String {
    let used = Span::raw(text).width();
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

/// The same two sections as the TUI, as ANSI-colored text.
pub fn plain_text(quiz: &QuizResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", Palette::paint(Palette::ACCENT, "Questions")));
    for (idx, question) in quiz.iter().enumerate() {
        out.push_str(&format!("{}\n", Palette::bold(format!("Question {}", idx + 1))));
        out.push_str(&format!("{}\n", question.question));
        let (left, right) = question.option_columns();
        for row in 0..left.len().max(right.len()) {
            let left = left.get(row).map(String::as_str).unwrap_or("");
            let right = right.get(row).map(String::as_str).unwrap_or("");
            out.push_str(&format!(
                "  {}  {right}\n",
                pad_to_width(left, PLAIN_COLUMN_WIDTH)
            ));
        }
        out.push_str(&format!("{}\n", Palette::rule()));
    }

    out.push_str(&format!("\n{}\n\n", Palette::paint(Palette::ACCENT, "Answer Key")));
    for (idx, question) in quiz.iter().enumerate() {
        out.push_str(&format!(
            "{}\n",
            Palette::bold(format!("Question {} - Answer", idx + 1))
        ));
        out.push_str(&format!(
            "{} {}\n",
            Palette::paint(Palette::SUCCESS, "Correct Answer:"),
            question.answer
        ));
        out.push_str(&format!(
            "{} {}\n",
            Palette::paint(Palette::INFO, "Explanation:"),
            question.explanation
        ));
        out.push_str(&format!("{}\n", Palette::rule()));
    }
    out
}
