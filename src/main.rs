use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};
use rust_i18n::t;

use codetyper::app::{App, AppScreen, SessionEvent};
use codetyper::catalog::Catalog;
use codetyper::config::{default_data_dir, user_snippet_dir};
use codetyper::engine::scoring::level_progress;
use codetyper::event::{AppEvent, EventHandler, translate_key};
use codetyper::profile::ProfileState;
use codetyper::store::{JsonStore, MemoryStore, Store};
use codetyper::ui::components::dashboard::Dashboard;
use codetyper::ui::components::profile_overview::ProfileOverview;
use codetyper::ui::components::progress_bar::ProgressBar;
use codetyper::ui::components::snippet_list::SnippetList;
use codetyper::ui::components::stats_sidebar::StatsSidebar;
use codetyper::ui::components::typing_area::TypingArea;
use codetyper::ui::layout::{AppLayout, fit_hints, popup_rect};

rust_i18n::i18n!("locales", fallback = "en");

const LOG_FILE: &str = "codetyper.log";

#[derive(Parser)]
#[command(name = "codetyper", version, about = "Terminal code typing trainer")]
struct Cli {
    #[arg(long, help = "Directory for profile, settings and log")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Start with this snippet id")]
    snippet: Option<String>,

    #[arg(long, help = "Practice without writing progress to disk")]
    no_save: bool,

    #[arg(long, help = "Print the snippet catalog and exit")]
    list: bool,

    #[arg(long, help = "Print profile statistics and exit")]
    stats: bool,
}

/// Log to a file in the data dir; the terminal belongs to the UI. Without
/// `create_dir` a missing data dir stays missing and logging is off unless
/// `RUST_LOG` asks for it on stderr.
fn init_logging(data_dir: &Path, create_dir: bool) {
    if create_dir {
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            eprintln!("could not create {}: {e}", data_dir.display());
        }
    }
    let has_dir = data_dir.is_dir();

    let env = env_logger::Env::default().default_filter_or(if has_dir { "warn" } else { "off" });
    let mut builder = env_logger::Builder::from_env(env);

    if has_dir {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE));
        match file {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("could not open log file, logging to stderr: {e}");
            }
        }
    }
    builder.init();
}

fn open_store(data_dir: PathBuf, no_save: bool) -> Result<Box<dyn Store>> {
    if !no_save {
        let disk = JsonStore::with_base_dir(data_dir.clone())
            .with_context(|| format!("opening data dir {}", data_dir.display()))?;
        return Ok(Box::new(disk));
    }

    // Start from the saved records but keep every change in memory.
    let memory = match JsonStore::open_existing(data_dir) {
        Some(disk) => MemoryStore::snapshot_of(&disk),
        None => MemoryStore::new(),
    };
    Ok(Box::new(memory))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    init_logging(&data_dir, !cli.no_save);

    let catalog = Catalog::load(user_snippet_dir().as_deref())?;
    let profile = ProfileState::load(open_store(data_dir, cli.no_save)?);
    let mut app = App::new(catalog, profile)?;

    if cli.list {
        print_catalog(&app);
        return Ok(());
    }
    if cli.stats {
        print_stats(&app);
        return Ok(());
    }
    if let Some(ref id) = cli.snippet {
        app.select_snippet_by_id(id)?;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn print_catalog(app: &App) {
    let level = app.level();
    for (idx, snippet) in app.catalog.snippets().iter().enumerate() {
        let lock = if Catalog::is_unlocked(idx, level) {
            String::new()
        } else {
            format!("  (level {})", Catalog::required_level(idx))
        };
        println!(
            "{:<20} {:<12} {:<7}{lock}",
            snippet.id,
            snippet.language,
            snippet.difficulty.as_str()
        );
    }
}

fn print_stats(app: &App) {
    let profile = app.profile.profile();
    let progress = level_progress(profile.xp);
    println!(
        "level {} ({}/{} xp)",
        progress.level, progress.into_level, progress.required
    );
    println!("challenges {}", profile.total_challenges);
    println!("best wpm {}", profile.best_wpm);
    println!("avg accuracy {}%", profile.average_accuracy);
    println!("points {}", profile.total_points);
    println!("streak {} (best {})", profile.streak_days, profile.best_streak);
    println!(
        "achievements {}",
        profile
            .achievements
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                handle_key(app, key);
                dispatch_events(app);
            }
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn dispatch_events(app: &mut App) {
    for event in app.drain_events() {
        if matches!(event, SessionEvent::KeyIncorrect) {
            // Terminal bell stands in for the error sound.
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07").and_then(|()| out.flush());
        }
        if let Some(message) = App::toast_message(&event) {
            app.show_toast(message);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::Explorer => handle_explorer_key(app, key),
        AppScreen::Dashboard => handle_dashboard_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => app.reset(),
            KeyCode::Char('n') => app.random_snippet(),
            KeyCode::Char('d') => app.go_to_dashboard(),
            KeyCode::Char('s') => app.go_to_settings(),
            _ => {}
        }
        return;
    }
    if key.code == KeyCode::Esc {
        app.go_to_explorer();
        return;
    }
    if let Some(input) = translate_key(&key) {
        app.handle_input(input);
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('n') => app.next_snippet(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('x') => app.random_snippet(),
        KeyCode::Char('e') | KeyCode::Esc => app.go_to_explorer(),
        KeyCode::Char('d') => app.go_to_dashboard(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_explorer_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_practice(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.explorer_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.explorer_next(),
        KeyCode::Enter => app.explorer_confirm(),
        KeyCode::Char('x') => app.random_snippet(),
        KeyCode::Char('d') => app.go_to_dashboard(),
        KeyCode::Char('s') => app.go_to_settings(),
        KeyCode::Left | KeyCode::Char('h') => app.explorer_cycle_difficulty(false),
        KeyCode::Right | KeyCode::Char('l') => app.explorer_cycle_difficulty(true),
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.go_to_practice(),
        KeyCode::Char('e') => app.go_to_explorer(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_practice(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev_row(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next_row(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match app.screen {
        AppScreen::Practice => render_practice(frame, app, &layout),
        AppScreen::Result => render_result(frame, app, layout.main),
        AppScreen::Explorer => render_explorer(frame, app, area),
        AppScreen::Dashboard => render_dashboard(frame, app, area),
        AppScreen::Settings => render_settings(frame, app, area),
    }

    render_footer(frame, app, layout.footer);
    render_toast(frame, app, area);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let profile = app.profile.profile();

    let mut info = format!(
        " {} {} | {} XP | {} {}",
        t!("dashboard.level_short"),
        profile.level,
        profile.xp,
        profile.total_points,
        t!("dashboard.points_short"),
    );
    if profile.streak_days > 0 {
        info.push_str(&format!(" | {}", t!("result.streak", days = profile.streak_days)));
    }

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " codetyper ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_practice(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let snippet = app.current_snippet();
    let show_progress = layout.show_progress_bar();

    let mut constraints = vec![Constraint::Min(3)];
    if layout.is_compact() {
        constraints.insert(0, Constraint::Length(1));
    }
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(layout.main);

    let mut idx = 0;
    if layout.is_compact() {
        let stats = &app.stats;
        let line = format!(
            " {}: {} | {}: {}% | {}: {} | {}: {}",
            t!("stats.wpm"),
            stats.wpm,
            t!("stats.accuracy"),
            stats.accuracy,
            t!("stats.errors"),
            stats.errors,
            t!("stats.combo"),
            app.session.combo,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(line, Style::default().fg(colors.fg()))),
            main_layout[idx],
        );
        idx += 1;
    }

    let title = format!(
        "{}  [{}, {}]",
        snippet.filename, snippet.language, snippet.difficulty
    );
    let typing = TypingArea::new(&app.session, &app.theme, title)
        .line_numbers(app.settings().show_line_numbers);
    frame.render_widget(typing, main_layout[idx]);
    idx += 1;

    if show_progress {
        let progress = ProgressBar::new(
            t!("stats.progress").to_string(),
            app.session.progress(),
            &app.theme,
        );
        frame.render_widget(progress, main_layout[idx]);
    }

    if let Some(sidebar_area) = layout.sidebar {
        let sidebar = StatsSidebar::new(
            &app.stats,
            app.session.combo,
            app.session.progress(),
            app.profile.profile().high_score(&snippet.id),
            &app.theme,
        );
        frame.render_widget(sidebar, sidebar_area);
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    if let Some(ref report) = app.last_report {
        let centered = popup_rect(area, 60, 80);
        frame.render_widget(Clear, centered);
        frame.render_widget(Dashboard::new(report, &app.theme), centered);
    }
}

fn render_explorer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let centered = popup_rect(area, 80, 80);
    let visible = app.visible_snippets();
    let list = SnippetList::new(
        &app.catalog,
        &visible,
        app.explorer_selected,
        app.profile.profile(),
        &app.theme,
    );
    frame.render_widget(Clear, centered);
    frame.render_widget(list, centered);
}

fn render_dashboard(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let centered = popup_rect(area, 70, 90);
    frame.render_widget(Clear, centered);
    frame.render_widget(
        ProfileOverview::new(app.profile.profile(), app.catalog.len(), &app.theme),
        centered,
    );
}

fn render_settings(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let settings = app.settings();

    let centered = popup_rect(area, 60, 80);
    frame.render_widget(Clear, centered);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let on_off = |on: bool| {
        if on {
            t!("settings.on").to_string()
        } else {
            t!("settings.off").to_string()
        }
    };

    let fields: Vec<(String, String)> = vec![
        (t!("settings.theme").to_string(), settings.theme.as_str().to_string()),
        (t!("settings.sound").to_string(), on_off(settings.sound_enabled)),
        (t!("settings.line_numbers").to_string(), on_off(settings.show_line_numbers)),
        (t!("settings.font_size").to_string(), format!("{}px", settings.font_size)),
        (t!("settings.difficulty").to_string(), settings.difficulty.as_str().to_string()),
        (t!("settings.language").to_string(), settings.language.locale().to_string()),
    ];

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(2)).collect::<Vec<_>>())
        .split(inner);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_style = Style::default().fg(if is_selected {
            colors.warning()
        } else {
            colors.text_pending()
        });

        let line = Line::from(vec![
            Span::styled(format!("{indicator}{label:<20}"), label_style),
            Span::styled(format!("< {value} >"), value_style),
        ]);
        if let Some(row) = field_layout.get(i) {
            Paragraph::new(line).render(*row, frame.buffer_mut());
        }
    }
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let hints = match app.screen {
        AppScreen::Practice => t!("hints.practice"),
        AppScreen::Result => t!("hints.result"),
        AppScreen::Explorer => t!("hints.explorer"),
        AppScreen::Dashboard => t!("hints.dashboard"),
        AppScreen::Settings => t!("hints.settings"),
    };
    let line = fit_hints(&hints, area.width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(line, Style::default().fg(colors.text_pending()))),
        area,
    );
}

fn render_toast(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(ref toast) = app.toast else {
        return;
    };
    let colors = &app.theme.colors;
    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + 1,
        width,
        3.min(area.height),
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(toast.message.as_str())
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.accent()))
                    .style(Style::default().bg(colors.header_bg()).fg(colors.header_fg())),
            ),
        rect,
    );
}
