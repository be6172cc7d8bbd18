use crate::calc::grid::{DAYS_PER_WEEK, MonthGrid, ViewMonth, build_grid};
use crate::calc::hijri::HijriDate;
use crate::calc::resolve::{Indicator, assemble_popup};
use crate::data::miqaat::{DayRecord, MiqaatEntry, Phase};
use crate::data::store::{LoadError, LoadOutcome};
use crate::data::AppSettings;
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};
use std::io::Stdout;
use std::time::Duration as StdDuration;

// Indicator colors by priority; night-phase observances use the night color
// regardless of priority.
const P1_COLOR: Color = Color::Red;
const P2_COLOR: Color = Color::Yellow;
const P3_COLOR: Color = Color::Cyan;
const NIGHT_COLOR: Color = Color::Blue;

const DAY_GLYPH: &str = "●";
const NIGHT_GLYPH: &str = "○";

const CELL_WIDTH: u16 = 11;

const ARABIC_NUMERALS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Full entry list behind the popup for one selected day.
struct PopupState {
    hijri: HijriDate,
    gregorian: NaiveDate,
    entries: Vec<MiqaatEntry>,
}

pub struct App {
    records: Vec<DayRecord>,
    /// Set when the store load failed: the calendar area is replaced by the
    /// error and every key except quit is ignored.
    load_error: Option<String>,
    /// Store loaded but was empty: render normally with a persistent notice.
    empty_data: bool,
    view: ViewMonth,
    grid: MonthGrid,
    /// Day cursor; always a real Gregorian date inside the current grid.
    selected: NaiveDate,
    today: NaiveDate,
    popup: Option<PopupState>,
    pub settings: AppSettings,
    source: String,
}

impl App {
    pub fn new(
        load: Result<LoadOutcome, LoadError>,
        settings: AppSettings,
        today: NaiveDate,
        source: String,
    ) -> Self {
        let (records, load_error, empty_data) = match load {
            Ok(outcome) => {
                let empty = outcome.is_empty_data();
                (outcome.records(), None, empty)
            }
            Err(e) => (Vec::new(), Some(e.to_string()), false),
        };

        let view = ViewMonth::of(today);
        let grid = build_grid(&records, view.year, view.month, today);
        App {
            records,
            load_error,
            empty_data,
            view,
            grid,
            selected: today,
            today,
            popup: None,
            settings,
            source,
        }
    }

    fn rebuild_grid(&mut self) {
        self.grid = build_grid(&self.records, self.view.year, self.view.month, self.today);
    }

    fn set_view(&mut self, view: ViewMonth) {
        self.view = view;
        self.rebuild_grid();
        self.selected = view.first_day();
    }

    /// Moves the day cursor; crossing the grid edge re-targets the viewed
    /// month to wherever the cursor landed.
    fn move_selected(&mut self, days: i64) {
        self.selected += Duration::days(days);
        if !self.grid.contains(self.selected) {
            self.view = ViewMonth::of(self.selected);
            self.rebuild_grid();
        }
    }

    fn jump_to_today(&mut self) {
        self.view = ViewMonth::of(self.today);
        self.rebuild_grid();
        self.selected = self.today;
    }

    /// Re-derives the selected cell's Hijri date and gathers every applicable
    /// miqaat. An empty result suppresses the popup instead of showing a
    /// hollow one.
    fn open_popup(&mut self) {
        let hijri = HijriDate::from_gregorian(self.selected);
        let entries: Vec<MiqaatEntry> =
            assemble_popup(&self.records, hijri.year, hijri.month, hijri.day)
                .into_iter()
                .cloned()
                .collect();
        if entries.is_empty() {
            self.popup = None;
        } else {
            self.popup = Some(PopupState {
                hijri,
                gregorian: self.selected,
                entries,
            });
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        // A failed load is terminal for the session: no navigation, only quit.
        if self.load_error.is_some() {
            return code == KeyCode::Char('q');
        }

        if self.popup.is_some() {
            match code {
                KeyCode::Esc | KeyCode::Enter => self.popup = None,
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Left => self.move_selected(-1),
            KeyCode::Right => self.move_selected(1),
            KeyCode::Up => self.move_selected(-(DAYS_PER_WEEK as i64)),
            KeyCode::Down => self.move_selected(DAYS_PER_WEEK as i64),
            KeyCode::Char('p') => self.set_view(self.view.prev_month()),
            KeyCode::Char('n') => self.set_view(self.view.next_month()),
            KeyCode::Char('P') => self.set_view(self.view.prev_year()),
            KeyCode::Char('N') => self.set_view(self.view.next_year()),
            KeyCode::Char('t') => self.jump_to_today(),
            KeyCode::Enter => self.open_popup(),
            KeyCode::Char('a') => {
                self.settings.arabic_numerals = !self.settings.arabic_numerals;
            }
            _ => {}
        }
        false
    }

    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();

        if let Some(msg) = &self.load_error {
            let p = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Error loading miqaat data",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(msg.clone()),
                Line::from(format!("Source: {}", self.source)),
                Line::from(""),
                Line::from(Span::styled(
                    "Navigation is disabled. Press q to quit.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(Block::default().borders(Borders::ALL).title(" miqaat "));
            f.render_widget(p, area);
            return;
        }

        let notice_height = if self.empty_data { 1 } else { 0 };
        let grid_height = (self.grid.weeks.len() as u16) * 2 + 3;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),             // title
                Constraint::Length(notice_height), // degraded-store notice
                Constraint::Length(grid_height),   // calendar table
                Constraint::Min(8),                // selected-day details + help
            ])
            .split(area);

        self.render_title(f, chunks[0]);
        if self.empty_data {
            let notice = Paragraph::new(Span::styled(
                "Miqaat store is empty — the calendar renders without indicators.",
                Style::default().fg(Color::Yellow),
            ));
            f.render_widget(notice, chunks[1]);
        }
        self.render_calendar(f, chunks[2]);
        self.render_details_and_help(f, chunks[3]);
        self.render_popup(f, area);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let range = format!(
            "{} – {}",
            self.grid.start.format("%-d %b %Y"),
            self.grid.last().format("%-d %b %Y")
        );
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    self.view.title(),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                Span::raw("   "),
                Span::styled(range, Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(Span::styled(
                format!("Store: {}", self.source),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];
        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_calendar(&self, f: &mut Frame, area: Rect) {
        let header_style = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(
            ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
                .map(|d| Cell::from(d).style(header_style)),
        );

        let rows: Vec<Row> = self
            .grid
            .weeks
            .iter()
            .map(|week| {
                Row::new(week.iter().map(|c| self.day_cell(c)).collect::<Vec<_>>()).height(2)
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(CELL_WIDTH); DAYS_PER_WEEK])
            .header(header)
            .block(Block::default().borders(Borders::ALL))
            .column_spacing(1);
        f.render_widget(table, area);
    }

    fn day_cell(&self, cell: &crate::calc::grid::CalendarCell) -> Cell<'static> {
        let day_str = if self.settings.arabic_numerals {
            to_arabic_numerals(cell.hijri.day)
        } else {
            cell.hijri.day.to_string()
        };

        let mut day_spans = vec![Span::raw(format!("{day_str:>2}"))];
        if let Some(ind) = cell.indicator {
            day_spans.push(Span::raw(" "));
            let glyph = if ind.phase == Some(Phase::Night) {
                NIGHT_GLYPH
            } else {
                DAY_GLYPH
            };
            day_spans.push(Span::styled(glyph, indicator_style(&ind)));
        }

        let is_first = cell.gregorian == self.grid.start;
        let label = gregorian_label(cell.gregorian, is_first, self.today);
        let text = Text::from(vec![
            Line::from(day_spans),
            Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
        ]);

        let style = calendar_day_style(
            cell.in_view_month,
            cell.is_today,
            cell.gregorian == self.selected,
        );
        Cell::from(text).style(style)
    }

    fn render_details_and_help(&self, f: &mut Frame, area: Rect) {
        let hijri = HijriDate::from_gregorian(self.selected);
        let entries = assemble_popup(&self.records, hijri.year, hijri.month, hijri.day);

        let mut lines: Vec<Line> = vec![Line::from(Span::styled(
            format!("{} ({})", hijri, self.selected.format("%-d %b %Y")),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No miqaats",
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        for entry in &entries {
            let mut spans = vec![Span::raw("  • "), Span::raw(entry.title.clone())];
            if let Some(desc) = &entry.description {
                spans.push(Span::styled(
                    format!(" — {desc}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if entry.phase == Some(Phase::Night) {
                spans.push(Span::styled(
                    " (night)",
                    Style::default().fg(NIGHT_COLOR),
                ));
            }
            lines.push(Line::from(spans));
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(2), Constraint::Length(5)])
            .split(area);

        f.render_widget(Paragraph::new(lines), chunks[0]);

        let key_rows = vec![
            Row::new(vec!["←↑↓→", "Move day", "n/p", "Next/prev month"]),
            Row::new(vec!["N/P", "Next/prev year", "t", "Today"]),
            Row::new(vec!["Enter", "Miqaat details", "a", "Toggle numerals"]),
            Row::new(vec!["q/Ctrl+C", "Quit", "", ""]),
        ];
        let help = Table::new(
            key_rows,
            [
                Constraint::Length(10),
                Constraint::Length(20),
                Constraint::Length(10),
                Constraint::Length(20),
            ],
        )
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);
        f.render_widget(help, chunks[1]);
    }

    fn render_popup(&self, f: &mut Frame, area: Rect) {
        let Some(popup) = &self.popup else {
            return;
        };

        let rect = centered_rect(60, 60, area);
        f.render_widget(Clear, rect);

        let title = format!(
            " Miqaats for: {} ({}) ",
            popup.hijri,
            popup.gregorian.format("%-d %b %Y")
        );

        let mut lines: Vec<Line> = Vec::new();
        for entry in &popup.entries {
            let mut title_spans = vec![Span::styled(
                entry.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if entry.phase == Some(Phase::Night) {
                title_spans.push(Span::styled(
                    "  (night)",
                    Style::default().fg(NIGHT_COLOR),
                ));
            }
            lines.push(Line::from(title_spans));
            if let Some(desc) = &entry.description {
                lines.push(Line::from(Span::styled(
                    format!("  {desc}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "Esc to close",
            Style::default().add_modifier(Modifier::DIM),
        )));

        let p = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(p, rect);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

// ── Cell formatting helpers ───────────────────────────────────────────────────

pub(crate) fn to_arabic_numerals(number: u32) -> String {
    number
        .to_string()
        .chars()
        .map(|c| ARABIC_NUMERALS[(c as usize) - ('0' as usize)])
        .collect()
}

/// Gregorian sub-label for a cell: the first grid cell shows "d Mon" (with
/// the year appended when it differs from the current year), month starts
/// show "d Mon", everything else just the day number.
pub(crate) fn gregorian_label(date: NaiveDate, is_first: bool, today: NaiveDate) -> String {
    if is_first {
        if date.year() != today.year() {
            date.format("%-d %b %Y").to_string()
        } else {
            date.format("%-d %b").to_string()
        }
    } else if date.day() == 1 {
        date.format("%-d %b").to_string()
    } else {
        date.day().to_string()
    }
}

/// Determines the ratatui `Style` for a calendar day cell based on its state.
pub(crate) fn calendar_day_style(in_view_month: bool, is_today: bool, is_selected: bool) -> Style {
    if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if is_today {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else if !in_view_month {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

pub(crate) fn indicator_style(ind: &Indicator) -> Style {
    let color = if ind.phase == Some(Phase::Night) {
        NIGHT_COLOR
    } else {
        match ind.priority {
            1 => P1_COLOR,
            2 => P2_COLOR,
            _ => P3_COLOR,
        }
    };
    Style::default().fg(color)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
