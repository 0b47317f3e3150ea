use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{env, fs::File, io::stdout, ops::Range, path::PathBuf, process};
use tracenav_config::Config;
use tracenav_engine::{
    BufferEditor, Message, NavOutcome, Navigator, Session, Settings, TraceStats, TreeItem,
    TreeProvider, io,
};

/// Engine settings backed by the TOML configuration.
struct ConfigSettings(Config);

impl Settings for ConfigSettings {
    fn string(&self, key: &str) -> Option<&str> {
        self.0.string(key)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.0.flag(key)
    }
}

/// A transaction list row flattened for display.
struct Row {
    item: TreeItem,
    depth: usize,
}

struct App {
    session: Session<BufferEditor>,
    navigator: Navigator,
    transactions: TreeProvider<BufferEditor>,
    policies: TreeProvider<BufferEditor>,
    rows: Vec<Row>,
    row_state: ListState,
    markers: Vec<TreeItem>,
    marker_index: usize,
    policy_labels: Vec<String>,
    lines: Vec<String>,
    cursor_line: usize,
    stats: Option<TraceStats>,
    last_message: Option<Message>,
}

impl App {
    fn new(text: &str, config: Config) -> Self {
        let mut session = Session::new(BufferEditor::from_text(text), ConfigSettings(config));

        let transactions = TreeProvider::transaction_list();
        let policies = TreeProvider::transaction_policies();
        transactions.subscribe(&mut session);
        policies.subscribe(&mut session);
        let markers = TreeProvider::navigation_markers().children(&session, None);

        let mut app = Self {
            session,
            navigator: Navigator::new(),
            transactions,
            policies,
            rows: Vec::new(),
            row_state: ListState::default(),
            markers,
            marker_index: 0,
            policy_labels: Vec::new(),
            lines: text.lines().map(str::to_string).collect(),
            cursor_line: 0,
            stats: None,
            last_message: None,
        };
        app.sync();
        app
    }

    fn move_cursor(&mut self, down: bool) {
        let last_line = self.lines.len().saturating_sub(1);
        let line = if down {
            (self.cursor_line + 1).min(last_line)
        } else {
            self.cursor_line.saturating_sub(1)
        };
        let offset = self.session.editor().offset_of_line(line);
        self.session.set_position(offset);
        self.sync();
    }

    fn cycle_marker(&mut self) {
        if !self.markers.is_empty() {
            self.marker_index = (self.marker_index + 1) % self.markers.len();
        }
    }

    fn navigate(&mut self, direction: KeyCode) {
        let Some(pattern) = self
            .markers
            .get(self.marker_index)
            .and_then(|marker| marker.search_pattern.clone())
        else {
            return;
        };
        let outcome = match direction {
            KeyCode::Char('n') => self.navigator.next_occurrence(&mut self.session, &pattern),
            KeyCode::Char('p') => self
                .navigator
                .previous_occurrence(&mut self.session, &pattern),
            _ => self.navigator.last_occurrence(&mut self.session, &pattern),
        };
        log::debug!("Navigated to {:?}", outcome.range());
        self.sync();
    }

    fn reveal_current_transaction(&mut self) {
        if let NavOutcome::Moved { range, .. } =
            self.navigator.reveal_current_transaction(&mut self.session)
        {
            self.cursor_line = self.session.editor().line_of_offset(range.start);
        }
        self.sync_views();
    }

    /// Follows the session after the position moved.
    fn sync(&mut self) {
        self.cursor_line = self
            .session
            .editor()
            .line_of_offset(self.session.position());
        self.sync_views();
    }

    /// Rebuilds whatever the session marked dirty and collects messages.
    fn sync_views(&mut self) {
        if self.transactions.needs_refresh() {
            self.rows.clear();
            let roots = self.transactions.children(&self.session, None);
            self.push_rows(roots, 0);
        }
        if self.policies.needs_refresh() {
            self.policy_labels = self
                .policies
                .children(&self.session, None)
                .into_iter()
                .map(|item| item.label)
                .collect();
        }

        let current = self.session.current_transaction();
        let selected = self.rows.iter().position(|row| {
            row.depth == 0
                && matches!(
                    (&row.item.transaction, current),
                    (Some(t), Some(c)) if t.same_span(c)
                )
        });
        self.row_state.select(selected);

        self.stats = TraceStats::for_session(&self.session);
        if let Some(message) = self.session.editor().take_messages().pop() {
            self.last_message = Some(message);
        }
    }

    fn push_rows(&mut self, items: Vec<TreeItem>, depth: usize) {
        for item in items {
            let children = if item.is_expanded() {
                self.transactions.children(&self.session, Some(&item))
            } else {
                Vec::new()
            };
            self.rows.push(Row { item, depth });
            self.push_rows(children, depth + 1);
        }
    }

    fn selection_lines(&self) -> Option<Range<usize>> {
        let editor = self.session.editor();
        editor.selection().map(|range| {
            editor.line_of_offset(range.start)..editor.line_of_offset(range.end) + 1
        })
    }
}

fn main() -> Result<()> {
    // Log to a file; the terminal belongs to the UI
    let log_path = env::temp_dir().join("tracenav.log");
    if let Ok(file) = File::create(&log_path) {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    log::info!("tracenav starting up!");

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            let config = Config::with_defaults();
            match config.save() {
                Ok(()) => log::info!("Created default config file at {}", config_path.display()),
                Err(e) => log::warn!("Failed to create default config file: {e}"),
            }
            config
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let trace_path = match (args.len(), &config.trace_path) {
        (2, _) => PathBuf::from(&args[1]),
        (1, Some(path)) => path.clone(),
        _ => {
            eprintln!("Usage: {} <trace-file>", args[0]);
            eprintln!(
                "Or set trace_path in the config file at {}",
                config_path.display()
            );
            process::exit(1);
        }
    };

    let text = match io::read_trace(&trace_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: Cannot open trace '{}': {e}", trace_path.display());
            process::exit(1);
        }
    };
    log::info!("Loaded {} bytes from {}", text.len(), trace_path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&text, config);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
                KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
                code @ (KeyCode::Char('n') | KeyCode::Char('p') | KeyCode::Char('l')) => {
                    app.navigate(code)
                }
                KeyCode::Tab => app.cycle_marker(),
                KeyCode::Char('c') => app.reveal_current_transaction(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[0]);

    // Transaction list panel
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let description = row.item.description.as_deref().unwrap_or_default();
            ListItem::new(vec![Line::from(vec![
                Span::raw(format!("{indent}{} ", row.item.label)),
                Span::styled(description.to_string(), Style::default().fg(Color::DarkGray)),
            ])])
        })
        .collect();

    let transactions = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Transactions"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(transactions, chunks[0], &mut app.row_state);

    // Trace panel, scrolled to keep the cursor line in view
    let height = chunks[1].height.saturating_sub(2) as usize;
    let top = app.cursor_line.saturating_sub(height / 2);
    let selected = app.selection_lines();
    let trace_lines: Vec<Line> = app
        .lines
        .iter()
        .enumerate()
        .skip(top)
        .take(height)
        .map(|(number, line)| {
            let style = if number == app.cursor_line {
                Style::default().bg(Color::Yellow).fg(Color::Black)
            } else if selected.as_ref().is_some_and(|lines| lines.contains(&number)) {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![Span::styled(line.clone(), style)])
        })
        .collect();

    let trace = Paragraph::new(trace_lines).block(Block::default().borders(Borders::ALL).title("Trace"));
    f.render_widget(trace, chunks[1]);

    // Status
    let marker = app
        .markers
        .get(app.marker_index)
        .map_or("(no markers)", |marker| marker.label.as_str());
    let current = app
        .row_state
        .selected()
        .and_then(|i| app.rows.get(i))
        .map_or("none", |row| row.item.label.as_str());
    let stats = app.stats.as_ref().map_or_else(String::new, |stats| {
        format!(
            "{} .. {} | errors: {} total, {} in transaction",
            stats.start_date, stats.end_date, stats.total_errors, stats.transaction_errors
        )
    });
    let message = app.last_message.as_ref().map_or("", Message::text);

    let status = vec![
        Line::from(vec![
            Span::raw(format!("Marker: {marker} | Transaction: {current} | ")),
            Span::raw(format!("Policies: {}", app.policy_labels.join(", "))),
        ]),
        Line::from(stats),
        Line::from(message.to_string()),
        Line::from(vec![
            Span::raw("q: Quit | j/k: Line | n/p/l: Next/Previous/Last | "),
            Span::raw("Tab: Marker | c: Current transaction"),
        ]),
    ];

    f.render_widget(Paragraph::new(status).block(Block::default()), rows[1]);
}
