use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use jma_forecast::{load_forecast, AreaCatalog, AreaEntry, DisplayRecord, ForecastSource, Tone};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_STEP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Areas,
    Forecast,
}

impl Pane {
    pub fn toggle(&self) -> Self {
        match self {
            Pane::Areas => Pane::Forecast,
            Pane::Forecast => Pane::Areas,
        }
    }
}

pub struct App {
    pub catalog: AreaCatalog,
    pub filtered_areas: Vec<AreaEntry>,
    pub query: String,
    pub state: TableState,
    pub focus: Pane,
    pub loaded_area: Option<AreaEntry>,
    pub records: Vec<DisplayRecord>,
    pub fetched_at: Option<DateTime<Local>>,
    pub forecast_scroll: u16,
    pub error: Option<String>,
}

impl App {
    pub fn new(catalog: AreaCatalog) -> Self {
        let filtered_areas = catalog.entries().to_vec();
        let mut state = TableState::default();
        if !filtered_areas.is_empty() {
            state.select(Some(0));
        }

        Self {
            catalog,
            filtered_areas,
            query: String::new(),
            state,
            focus: Pane::Areas,
            loaded_area: None,
            records: Vec::new(),
            fetched_at: None,
            forecast_scroll: 0,
            error: None,
        }
    }

    pub fn selected_area(&self) -> Option<&AreaEntry> {
        self.state.selected().and_then(|i| self.filtered_areas.get(i))
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.apply_query();
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.apply_query();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.apply_query();
    }

    fn apply_query(&mut self) {
        self.filtered_areas = self
            .catalog
            .search(&self.query)
            .into_iter()
            .cloned()
            .collect();

        let selection = if self.filtered_areas.is_empty() { None } else { Some(0) };
        self.state.select(selection);
    }

    /// Fetch and extract the selected area's forecast (blocking)
    pub fn load_selected(&mut self, source: &dyn ForecastSource) {
        let area = match self.selected_area() {
            Some(area) => area.clone(),
            None => return,
        };

        match load_forecast(source, &area.code) {
            Ok(records) => {
                self.records = records;
                self.fetched_at = Some(Local::now());
                self.error = None;
                self.focus = Pane::Forecast;
            }
            Err(err) => {
                tracing::warn!(code = %area.code, error = %err, "forecast load failed");
                self.records.clear();
                self.fetched_at = None;
                self.error = Some(format!("[ERROR] FAILED TO LOAD WEATHER DATA: {}", err));
            }
        }
        self.loaded_area = Some(area);
        self.forecast_scroll = 0;
    }

    pub fn next(&mut self) {
        let len = self.filtered_areas.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered_areas.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered_areas.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_STEP).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(PAGE_STEP),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn scroll_down(&mut self) {
        let max = self.records.len().saturating_sub(1) as u16;
        self.forecast_scroll = (self.forecast_scroll + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.forecast_scroll = self.forecast_scroll.saturating_sub(1);
    }
}

pub fn run_ui(app: &mut App, source: &dyn ForecastSource) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, source);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: &dyn ForecastSource,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        match (app.focus, key.code) {
            (_, KeyCode::Esc) => {
                if app.query.is_empty() {
                    return Ok(());
                }
                app.clear_query();
            }
            (_, KeyCode::Tab) => app.focus = app.focus.toggle(),
            (Pane::Areas, KeyCode::Enter) => app.load_selected(source),
            (Pane::Areas, KeyCode::Down) => app.next(),
            (Pane::Areas, KeyCode::Up) => app.previous(),
            (Pane::Areas, KeyCode::PageDown) => app.page_down(),
            (Pane::Areas, KeyCode::PageUp) => app.page_up(),
            (Pane::Areas, KeyCode::Backspace) => app.pop_query(),
            (Pane::Areas, KeyCode::Char(c)) => app.push_query(c),
            (Pane::Forecast, KeyCode::Char('q')) => return Ok(()),
            (Pane::Forecast, KeyCode::Down | KeyCode::Char('j')) => app.scroll_down(),
            (Pane::Forecast, KeyCode::Up | KeyCode::Char('k')) => app.scroll_up(),
            (Pane::Forecast, KeyCode::Home) => app.forecast_scroll = 0,
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Areas | Forecast
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(chunks[1]);

    render_areas(f, content_chunks[0], app);
    render_forecast(f, content_chunks[1], app);

    render_status_bar(f, chunks[2], app);
}

fn tone_color(tone: Tone) -> Color {
    let (r, g, b) = tone.rgb();
    Color::Rgb(r, g, b)
}

fn pane_border(app: &App, pane: Pane) -> Style {
    if app.focus == pane {
        Style::default().fg(tone_color(Tone::Accent))
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "> WEATHER FORECAST SYSTEM <",
        Style::default()
            .fg(tone_color(Tone::Accent))
            .add_modifier(Modifier::BOLD),
    )];

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Areas: {}", app.catalog.len()),
        Style::default().fg(Color::White),
    ));

    if let Some(area) = &app.loaded_area {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            area.label(),
            Style::default().fg(tone_color(Tone::AccentSecondary)),
        ));
    }

    if let Some(fetched_at) = &app.fetched_at {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            format!("Fetched: {}", fetched_at.format("%Y-%m-%d %H:%M:%S")),
            Style::default().fg(tone_color(Tone::TextSecondary)),
        ));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(tone_color(Tone::Border))),
    );

    f.render_widget(header, area);
}

fn render_areas(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "Code", "Kind"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(tone_color(Tone::TextSecondary))
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered_areas.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.name.clone()),
            Cell::from(entry.code.clone()),
            Cell::from(entry.kind.as_str()),
        ])
        .style(Style::default().fg(tone_color(Tone::Text)))
        .height(1)
    });

    let title = if app.query.is_empty() {
        " Areas (type to filter) ".to_string()
    } else {
        format!(" Areas: {}_ ", app.query)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(8),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(pane_border(app, Pane::Areas))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_forecast(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = if app.records.is_empty() {
        vec![Line::from(Span::styled(
            "Select an area and press Enter",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        app.records.iter().map(record_line).collect()
    };

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(pane_border(app, Pane::Forecast))
                .title(" > FORECAST DATA < "),
        )
        .scroll((app.forecast_scroll, 0));

    f.render_widget(panel, area);
}

fn record_line(record: &DisplayRecord) -> Line<'static> {
    let mut style = Style::default().fg(tone_color(record.tone()));
    if record.is_heading() {
        style = style.add_modifier(Modifier::BOLD);
    }
    Line::from(Span::styled(record.line(), style))
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered_areas.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(error) = &app.error {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            error.clone(),
            Style::default().fg(tone_color(Tone::Error)),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Load | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Pane | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Clear/Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use jma_forecast::{FetchError, ForecastDocument};
    use serde_json::{json, Value};

    struct FixedSource(ForecastDocument);

    impl ForecastSource for FixedSource {
        fn area_directory(&self) -> Result<Value, FetchError> {
            Ok(json!({}))
        }

        fn forecast(&self, _code: &str) -> Result<ForecastDocument, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct DownSource;

    impl ForecastSource for DownSource {
        fn area_directory(&self) -> Result<Value, FetchError> {
            Ok(json!({}))
        }

        fn forecast(&self, code: &str) -> Result<ForecastDocument, FetchError> {
            Err(FetchError::InvalidCode(code.to_string()))
        }
    }

    fn sample_app() -> App {
        App::new(AreaCatalog::from_directory(&json!({
            "offices": {
                "130000": { "name": "東京都" },
                "140000": { "name": "神奈川県" },
                "270000": { "name": "大阪府" }
            }
        })))
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = sample_app();
        assert_eq!(app.state.selected(), Some(0));

        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));

        app.page_down();
        assert_eq!(app.state.selected(), Some(2));
        app.page_up();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_typing_filters_areas() {
        let mut app = sample_app();

        app.push_query('大');
        assert_eq!(app.filtered_areas.len(), 1);
        assert_eq!(app.selected_area().map(|a| a.code.as_str()), Some("270000"));

        app.push_query('X');
        assert!(app.filtered_areas.is_empty());
        assert_eq!(app.state.selected(), None);

        app.clear_query();
        assert_eq!(app.filtered_areas.len(), 3);
    }

    #[test]
    fn test_load_selected_switches_to_forecast() {
        let mut app = sample_app();
        let source = FixedSource(vec![json!({ "area": { "name": "東京都" } })]);

        app.load_selected(&source);

        assert_eq!(app.focus, Pane::Forecast);
        assert_eq!(app.records.len(), 2);
        assert!(app.error.is_none());
        assert!(app.loaded_area.is_some());
        assert!(app.fetched_at.is_some());
    }

    #[test]
    fn test_load_failure_sets_error() {
        let mut app = sample_app();

        app.load_selected(&DownSource);

        assert!(app.records.is_empty());
        assert!(app.fetched_at.is_none());
        assert!(app
            .error
            .as_deref()
            .unwrap_or_default()
            .starts_with("[ERROR] FAILED TO LOAD WEATHER DATA"));
        assert_eq!(app.focus, Pane::Areas);
    }

    #[test]
    fn test_forecast_scroll_is_bounded() {
        let mut app = sample_app();
        app.records = vec![DisplayRecord::Separator, DisplayRecord::Separator];

        app.scroll_up();
        assert_eq!(app.forecast_scroll, 0);
        app.scroll_down();
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.forecast_scroll, 1);
    }
}
