use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use variance_ledger::{
    CategoryId, Ledger, LedgerError, LineItemDraft, LineItemId, Period, RowView, SortState,
    TotalsRow, Trend, VariancePercent, VarianceView, ViewKind, WindowView,
};

// ============================================================================
// APP STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    AddCategory,
    AddLineItem(CategoryId),
    EditValue {
        category: CategoryId,
        item: LineItemId,
        period: Period,
    },
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<(String, String)>,
    pub focus: usize,
}

impl Form {
    fn add_category() -> Self {
        Form {
            kind: FormKind::AddCategory,
            fields: vec![("Category".to_string(), String::new())],
            focus: 0,
        }
    }

    fn add_line_item(category: CategoryId) -> Self {
        let mut fields = vec![("Category".to_string(), String::new())];
        fields.extend(Period::ALL.iter().map(|p| (p.label().to_string(), String::new())));
        Form {
            kind: FormKind::AddLineItem(category),
            fields,
            focus: 0,
        }
    }

    fn edit_value(category: CategoryId, row: &RowView, period: Period) -> Self {
        Form {
            kind: FormKind::EditValue {
                category,
                item: row.id.clone(),
                period,
            },
            fields: vec![(period.label().to_string(), format_number(row.values[period]))],
            focus: 0,
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            FormKind::AddCategory => "Add Category",
            FormKind::AddLineItem(_) => "Add Sub-Row",
            FormKind::EditValue { .. } => "Edit Value",
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn previous_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn input(&mut self) -> &mut String {
        &mut self.fields[self.focus].1
    }

    fn edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Backspace => {
                self.input().pop();
            }
            KeyCode::Char(c) => self.input().push(c),
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub enum Mode {
    Browse,
    Expanded,
    Form { form: Form, return_to_expanded: bool },
}

pub struct App {
    pub ledger: Ledger,
    pub selected: usize,
    pub row_cursor: usize,
    pub mode: Mode,
    pub status: Option<String>,
}

impl App {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            selected: 0,
            row_cursor: 0,
            mode: Mode::Browse,
            status: None,
        }
    }

    pub fn selected_category(&self) -> Option<CategoryId> {
        self.ledger.categories().get(self.selected).map(|c| c.id.clone())
    }

    fn window(&self, view: ViewKind) -> Option<WindowView> {
        let id = self.selected_category()?;
        self.ledger.sorted_window(&id, view).ok()
    }

    fn report(&mut self, result: Result<(), LedgerError>) {
        if let Err(err) = result {
            self.status = Some(err.to_string());
        }
    }

    pub fn next_category(&mut self) {
        let len = self.ledger.categories().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
            self.row_cursor = 0;
        }
    }

    pub fn previous_category(&mut self) {
        let len = self.ledger.categories().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
            self.row_cursor = 0;
        }
    }

    pub fn next_row(&mut self, view: ViewKind) {
        let rows = self.window(view).map(|w| w.rows.len()).unwrap_or(0);
        if rows > 0 {
            self.row_cursor = (self.row_cursor + 1).min(rows - 1);
        }
    }

    pub fn previous_row(&mut self) {
        self.row_cursor = self.row_cursor.saturating_sub(1);
    }

    pub fn toggle_sort(&mut self) {
        if let Some(id) = self.selected_category() {
            let result = self.ledger.toggle_sort(&id).map(|_| ());
            self.report(result);
        }
    }

    /// Step the page by `delta`, staying within 1..=total_pages
    pub fn turn_page(&mut self, view: ViewKind, delta: isize) {
        let (Some(id), Some(window)) = (self.selected_category(), self.window(view)) else {
            return;
        };
        let page = window.page.saturating_add_signed(delta).clamp(1, window.total_pages);
        let result = self.ledger.set_page(&id, view, page).map(|_| ());
        self.row_cursor = 0;
        self.report(result);
    }

    /// Cycle the compact page size through the configured options
    pub fn cycle_page_size(&mut self, forward: bool) {
        let Some(id) = self.selected_category() else {
            return;
        };
        let Ok(table) = self.ledger.table(&id) else {
            return;
        };
        let options = table.pages.page_size_options();
        if options.is_empty() {
            return;
        }
        let current = table.pages.window(ViewKind::Compact).page_size;
        let index = options.iter().position(|s| *s == current).unwrap_or(0);
        let next = if forward {
            (index + 1) % options.len()
        } else {
            (index + options.len() - 1) % options.len()
        };
        let result = self.ledger.set_page_size(&id, options[next]).map(|_| ());
        self.row_cursor = 0;
        self.report(result);
    }

    pub fn open_form(&mut self, form: Form) {
        let return_to_expanded = matches!(self.mode, Mode::Expanded);
        self.mode = Mode::Form {
            form,
            return_to_expanded,
        };
    }

    pub fn open_edit_latest(&mut self, view: ViewKind) {
        let (Some(id), Some(window)) = (self.selected_category(), self.window(view)) else {
            return;
        };
        if let Some(row) = window.rows.get(self.row_cursor) {
            self.open_form(Form::edit_value(id, row, Period::Latest));
        }
    }

    /// Apply the open form. Validation failures keep the form open.
    pub fn submit_form(&mut self) {
        let Mode::Form {
            form,
            return_to_expanded,
        } = self.mode.clone()
        else {
            return;
        };

        let result = match &form.kind {
            FormKind::AddCategory => self.ledger.add_category(&form.fields[0].1).map(|_| ()),
            FormKind::AddLineItem(category) => {
                let draft = form
                    .fields
                    .iter()
                    .skip(1)
                    .zip(Period::ALL)
                    .fold(LineItemDraft::new(form.fields[0].1.clone()), |draft, ((_, raw), period)| {
                        draft.with_value(period, raw.clone())
                    });
                self.ledger.add_line_item(category, &draft).map(|_| ())
            }
            FormKind::EditValue {
                category,
                item,
                period,
            } => self
                .ledger
                .update_value(category, item, *period, &form.fields[0].1)
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                if form.kind == FormKind::AddCategory {
                    self.selected = self.ledger.categories().len().saturating_sub(1);
                    self.row_cursor = 0;
                }
                self.status = None;
                self.mode = if return_to_expanded {
                    Mode::Expanded
                } else {
                    Mode::Browse
                };
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn close_form(&mut self) {
        if let Mode::Form {
            return_to_expanded, ..
        } = self.mode
        {
            self.status = None;
            self.mode = if return_to_expanded {
                Mode::Expanded
            } else {
                Mode::Browse
            };
        }
    }

    /// Returns false when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Form { .. } => match key.code {
                KeyCode::Esc => self.close_form(),
                KeyCode::Enter => self.submit_form(),
                code => {
                    if let Mode::Form { form, .. } = &mut self.mode {
                        form.edit(code);
                    }
                }
            },
            Mode::Expanded => match key.code {
                KeyCode::Esc | KeyCode::Char('e') => {
                    self.mode = Mode::Browse;
                    self.row_cursor = 0;
                }
                KeyCode::Char('q') => return false,
                KeyCode::Char('s') => self.toggle_sort(),
                KeyCode::Left => self.turn_page(ViewKind::Expanded, -1),
                KeyCode::Right => self.turn_page(ViewKind::Expanded, 1),
                KeyCode::Down | KeyCode::Char('j') => self.next_row(ViewKind::Expanded),
                KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
                KeyCode::Enter => self.open_edit_latest(ViewKind::Expanded),
                KeyCode::Char('a') => {
                    if let Some(id) = self.selected_category() {
                        self.open_form(Form::add_line_item(id));
                    }
                }
                _ => {}
            },
            Mode::Browse => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return false,
                KeyCode::Tab => self.next_category(),
                KeyCode::BackTab => self.previous_category(),
                KeyCode::Down | KeyCode::Char('j') => self.next_row(ViewKind::Compact),
                KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
                KeyCode::Char('s') => self.toggle_sort(),
                KeyCode::Left => self.turn_page(ViewKind::Compact, -1),
                KeyCode::Right => self.turn_page(ViewKind::Compact, 1),
                KeyCode::Char('[') => self.cycle_page_size(false),
                KeyCode::Char(']') => self.cycle_page_size(true),
                KeyCode::Char('e') => {
                    self.mode = Mode::Expanded;
                    self.row_cursor = 0;
                }
                KeyCode::Char('a') => {
                    if let Some(id) = self.selected_category() {
                        self.open_form(Form::add_line_item(id));
                    }
                }
                KeyCode::Char('c') => self.open_form(Form::add_category()),
                KeyCode::Enter => self.open_edit_latest(ViewKind::Compact),
                _ => {}
            },
        }
        true
    }
}

// ============================================================================
// RUN LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, chunks[0]);
    render_categories(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::Browse => {}
        Mode::Expanded => render_expanded(f, app),
        Mode::Form {
            form,
            return_to_expanded,
        } => {
            if *return_to_expanded {
                render_expanded(f, app);
            }
            render_form(f, form);
        }
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Financial Statements",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("v{}", variance_ledger::VERSION),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let windows: Vec<WindowView> = app
        .ledger
        .categories()
        .iter()
        .filter_map(|c| app.ledger.sorted_window(&c.id, ViewKind::Compact).ok())
        .collect();

    let mut constraints: Vec<Constraint> = windows
        .iter()
        .map(|w| Constraint::Length(w.rows.len() as u16 + 3))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, (category, window)) in app.ledger.categories().iter().zip(&windows).enumerate() {
        let selected = i == app.selected;
        let cursor = (selected && matches!(app.mode, Mode::Browse)).then_some(app.row_cursor);
        let title = format!(
            " {} [{}] page {}/{} · {} per page ",
            category.label,
            sort_badge(window.sort),
            window.page,
            window.total_pages,
            window.page_size
        );
        let border = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Blue)
        };
        let table = ledger_table(window, cursor, false).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        );
        f.render_widget(table, chunks[i]);
    }
}

fn render_expanded(f: &mut Frame, app: &App) {
    let Some(window) = app.window(ViewKind::Expanded) else {
        return;
    };
    let label = app
        .ledger
        .categories()
        .get(app.selected)
        .map(|c| c.label.clone())
        .unwrap_or_default();

    let area = centered_rect(85, 90, f.size());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let cursor = matches!(app.mode, Mode::Expanded).then_some(app.row_cursor);
    let table = ledger_table(&window, cursor, true).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} [{}] ", label, sort_badge(window.sort))),
    );
    f.render_widget(table, chunks[0]);

    let pager = Paragraph::new(Line::from(format!(
        " page {}/{} · {} rows · ←/→ page · s sort · a add · Esc close",
        window.page, window.total_pages, window.total_items
    )))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(pager, chunks[1]);
}

fn render_form(f: &mut Frame, form: &Form) {
    let height = form.fields.len() as u16 + 4;
    let area = centered_fixed(50, height, f.size());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let focused = i == form.focus;
            let style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:>12}: ", label), style),
                Span::raw(value.clone()),
                Span::styled(if focused { "█" } else { "" }, style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter OK · Esc Cancel · Tab next field",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(form.title()));
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.status {
        Some(message) => Line::from(Span::styled(
            format!(" ⚠ {}", message),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(vec![
            Span::styled(" q", Style::default().fg(Color::Yellow)),
            Span::raw(" Quit | "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" Category | "),
            Span::styled("s", Style::default().fg(Color::Yellow)),
            Span::raw(" Sort | "),
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::raw(" Page | "),
            Span::styled("[ ]", Style::default().fg(Color::Yellow)),
            Span::raw(" Page size | "),
            Span::styled("e", Style::default().fg(Color::Yellow)),
            Span::raw(" Expand | "),
            Span::styled("a/c", Style::default().fg(Color::Yellow)),
            Span::raw(" Add row/category | "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Edit latest"),
        ]),
    };
    f.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn ledger_table(window: &WindowView, cursor: Option<usize>, show_header: bool) -> Table<'static> {
    let mut rows: Vec<Row> = window
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if cursor == Some(i) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if i % 2 == 1 {
                Style::default().bg(Color::Rgb(40, 40, 40))
            } else {
                Style::default()
            };
            data_row(&row.label, &row.values, &row.variance).style(style)
        })
        .collect();
    rows.push(totals_row(&window.totals));

    let widths = [
        Constraint::Length(24),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths);
    if show_header {
        let mut titles = vec!["Category".to_string()];
        titles.extend(Period::ALL.iter().map(|p| p.label().to_string()));
        titles.push("Variance".to_string());
        titles.push("Variance %".to_string());
        table.header(
            Row::new(titles).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
    } else {
        table
    }
}

fn data_row(label: &str, values: &variance_ledger::PeriodValues, variance: &VarianceView) -> Row<'static> {
    let mut cells = vec![Cell::from(label.to_string())];
    cells.extend(Period::ALL.iter().map(|p| Cell::from(format_number(values[*p]))));
    cells.push(Cell::from(format_number(variance.variance)).style(trend_style(Some(variance.trend()))));
    cells.push(
        Cell::from(format_percent(variance.variance_percent)).style(trend_style(variance.percent_trend())),
    );
    Row::new(cells)
}

fn totals_row(totals: &TotalsRow) -> Row<'static> {
    data_row(&totals.label, &totals.values, &totals.variance)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
}

fn trend_style(trend: Option<Trend>) -> Style {
    match trend {
        Some(Trend::Gain) => Style::default().fg(Color::Green),
        Some(Trend::Loss) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    }
}

fn sort_badge(sort: SortState) -> &'static str {
    match sort {
        SortState::None => "⇅",
        SortState::ProfitDescending => "▲ profit",
        SortState::LossAscending => "▼ loss",
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

pub fn format_percent(percent: VariancePercent) -> String {
    match percent {
        VariancePercent::Value(v) => format!("{:.1}%", v),
        VariancePercent::DivisionAnomaly => "n/a".to_string(),
    }
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

fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

// ============================================================================
// TESTS
// ============================================================================
