use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Sparkline, Table};

use pitch_metrics::config::Settings;
use pitch_metrics::dataset::load_dataset;
use pitch_metrics::mock_feed::mock_dataset;
use pitch_metrics::report::{build_reports, TeamReport};
use pitch_metrics::report_export::export_reports;
use pitch_metrics::state::{DashboardState, Screen};

const DEFAULT_EXPORT: &str = "pitch_metrics_report.xlsx";

struct App {
    state: DashboardState,
    should_quit: bool,
    tick_rate: Duration,
    export_path: PathBuf,
}

impl App {
    fn new(settings: &Settings) -> Self {
        let mut logs = Vec::new();
        let dataset = match &settings.dataset_path {
            Some(path) => match load_dataset(path) {
                Ok(dataset) => {
                    logs.push(format!(
                        "[INFO] Loaded {} matches from {}",
                        dataset.matches.len(),
                        path.display()
                    ));
                    dataset
                }
                Err(err) => {
                    logs.push(format!("[WARN] {err:#}; using mock data"));
                    mock_dataset(settings.mock_seed, settings.mock_matches)
                }
            },
            None => {
                logs.push(format!("[INFO] Mock dataset (seed {})", settings.mock_seed));
                mock_dataset(settings.mock_seed, settings.mock_matches)
            }
        };
        if dataset.matches.is_empty() {
            logs.push("[WARN] Dataset has no matches".to_string());
        }

        let mut state = DashboardState::new(build_reports(&dataset), settings.timeline_step_minutes);
        for line in logs {
            state.push_log(line);
        }
        Self {
            state,
            should_quit: false,
            tick_rate: settings.tick,
            export_path: settings
                .export_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT)),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(' ') => self.state.toggle_play(),
            KeyCode::Char('l') | KeyCode::Right => self.state.step_forward(),
            KeyCode::Char('h') | KeyCode::Left => self.state.step_back(),
            KeyCode::Char('r') => self.state.reset(),
            KeyCode::Tab => self.state.cycle_screen(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn export(&mut self) {
        match export_reports(&self.export_path, &self.state.reports) {
            Ok(summary) => self.state.push_log(format!(
                "[INFO] Exported {} matches ({} players) to {}",
                summary.matches,
                summary.player_rows,
                self.export_path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let settings = Settings::load();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(&settings);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= app.tick_rate {
            app.state.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(chunks[1]);

    let list = Paragraph::new(match_list_text(&app.state))
        .block(Block::default().title("Matches").borders(Borders::ALL));
    frame.render_widget(list, body[0]);

    match app.state.screen {
        Screen::Overview => render_overview(frame, body[1], &app.state),
        Screen::Players => render_players(frame, body[1], &app.state),
        Screen::Shape => render_shape(frame, body[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Log").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "j/k Match | Space Play/Pause | h/l Step | r Reset | Tab Screen | e Export | ? Help | q Quit",
    );
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &DashboardState) -> String {
    let Some(report) = state.current() else {
        return "PITCH METRICS | no matches loaded".to_string();
    };
    let (home_xg, away_xg) = state
        .timeline_point()
        .map(|p| (p.home, p.away))
        .unwrap_or_default();
    format!(
        "PITCH METRICS | {} | {} | {}' / {}' {} | xG {:.2} - {:.2}",
        state.screen.label(),
        report.label,
        state.cursor,
        report.final_minute,
        if state.playing { "▶" } else { "⏸" },
        home_xg,
        away_xg
    )
}

fn match_list_text(state: &DashboardState) -> String {
    if state.reports.is_empty() {
        return "No matches".to_string();
    }
    state
        .reports
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let marker = if idx == state.selected { ">" } else { " " };
            format!("{marker} {}", r.label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_overview(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(1),
        ])
        .split(area);

    let Some((home, away)) = state.teams() else {
        frame.render_widget(
            Paragraph::new("Nothing to show").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let timeline = state.visible_timeline();
    let home_series: Vec<u64> = timeline.iter().map(|p| scaled(p.home)).collect();
    let away_series: Vec<u64> = timeline.iter().map(|p| scaled(p.away)).collect();
    let max = home_series
        .last()
        .copied()
        .unwrap_or(0)
        .max(away_series.last().copied().unwrap_or(0))
        .max(1);

    let home_chart = Sparkline::default()
        .block(
            Block::default()
                .title(format!("{} xG", home.team))
                .borders(Borders::ALL),
        )
        .data(&home_series)
        .max(max)
        .style(Style::default().fg(Color::Green));
    frame.render_widget(home_chart, rows[0]);

    let away_chart = Sparkline::default()
        .block(
            Block::default()
                .title(format!("{} xG", away.team))
                .borders(Borders::ALL),
        )
        .data(&away_series)
        .max(max)
        .style(Style::default().fg(Color::Red));
    frame.render_widget(away_chart, rows[1]);

    let metric_rows = comparison_rows(home, away);
    let table = Table::new(
        metric_rows,
        [
            Constraint::Length(24),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(
        Row::new(vec!["Metric".to_string(), home.team.clone(), away.team.clone()])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("Team Metrics").borders(Borders::ALL));
    frame.render_widget(table, rows[2]);
}

fn scaled(xg: f64) -> u64 {
    (xg * 100.0).round().max(0.0) as u64
}

fn comparison_rows(home: &TeamReport, away: &TeamReport) -> Vec<Row<'static>> {
    let metrics: [(&str, fn(&TeamReport) -> String); 8] = [
        ("PPDA", |t| format!("{:.2}", t.ppda)),
        ("Field tilt", |t| format!("{:.1}", t.field_tilt)),
        ("xG", |t| format!("{:.3}", t.xg)),
        ("xA", |t| format!("{:.3}", t.xa)),
        ("Shots", |t| t.shots.to_string()),
        ("Progressive actions", |t| t.progressive_actions.to_string()),
        ("Possession value", |t| format!("{:.3}", t.possession_value.total)),
        ("Mean impact", |t| format!("{:.2}", t.impact.mean_impact)),
    ];
    let mut rows: Vec<Row<'static>> = metrics
        .iter()
        .map(|(label, f)| Row::new(vec![label.to_string(), f(home), f(away)]))
        .collect();
    let mut keys: Vec<&String> = home.opaque.keys().chain(away.opaque.keys()).collect();
    keys.sort();
    keys.dedup();
    for key in keys {
        rows.push(Row::new(vec![
            key.replace('_', " "),
            opaque_cell(home, key),
            opaque_cell(away, key),
        ]));
    }
    rows
}

fn opaque_cell(team: &TeamReport, key: &str) -> String {
    team.opaque
        .get(key)
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "-".to_string())
}

fn render_players(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let rows: Vec<Row> = state
        .current()
        .map(|r| {
            r.players
                .iter()
                .map(|p| {
                    let risk = p
                        .injury
                        .map(|i| format!("{:.0} {}", i.risk_score, i.risk_category))
                        .unwrap_or_else(|| "-".to_string());
                    let value = p
                        .value
                        .map(|v| format!("{:+.1}%", v.delta_pct))
                        .unwrap_or_else(|| "-".to_string());
                    let style = if p.impact.score >= 7.0 {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    Row::new(vec![
                        p.impact.player.clone(),
                        p.impact.team.clone(),
                        p.impact.position.tag().to_string(),
                        format!("{:.2}", p.impact.score),
                        format!("{:.2}", p.xa),
                        risk,
                        value,
                    ])
                    .style(style)
                })
                .collect()
        })
        .unwrap_or_default();

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Min(14),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["Player", "Team", "Pos", "Impact", "xA", "Injury risk", "Value"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("Player Impact").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_shape(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let Some((home, away)) = state.teams() else {
        return;
    };
    for (team, col) in [(home, columns[0]), (away, columns[1])] {
        let text = shape_text(team);
        frame.render_widget(
            Paragraph::new(text).block(Block::default().title(team.team.clone()).borders(Borders::ALL)),
            col,
        );
    }
}

fn shape_text(team: &TeamReport) -> String {
    let mut lines = vec![
        format!(
            "Coordination  {:.1}  ({} players, {} links)",
            team.coordination.index, team.coordination.players, team.coordination.observed_pairs
        ),
        format!(
            "Def. line     {:.1}m  stability {:.3}",
            team.defensive_line.mean_height, team.defensive_line.stability
        ),
        format!(
            "Discipline    {:.1}  (mean dev {:.1}m)",
            team.discipline.score, team.discipline.mean_deviation
        ),
        String::new(),
        "Top pairs:".to_string(),
    ];
    if team.top_pairs.is_empty() {
        lines.push("  none".to_string());
    }
    for pair in &team.top_pairs {
        lines.push(format!(
            "  {} / {}  {:.1} ({} passes)",
            pair.player_a, pair.player_b, pair.score, pair.passes
        ));
    }
    lines.join("\n")
}

fn console_text(state: &DashboardState) -> String {
    if state.logs.is_empty() {
        return "No log lines yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Pitch Metrics - Help",
        "",
        "  j/k or ↑/↓   Select match",
        "  Space        Play / pause timeline",
        "  h/l or ←/→   Step timeline",
        "  r            Rewind to kick-off",
        "  Tab          Overview / Players / Shape",
        "  e            Export workbook",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
