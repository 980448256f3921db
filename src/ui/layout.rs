use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Terminals at least this wide get the stats sidebar.
pub const SIDEBAR_MIN_WIDTH: u16 = 100;
/// The practice progress bar needs this much main-area height.
pub const PROGRESS_MIN_HEIGHT: u16 = 16;

const POPUP_MIN: (u16, u16) = (60, 16);
const HINT_SEPARATOR: &str = "  ";

/// Header, body and footer rows, with the body split off a sidebar on wide
/// terminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(area);

        if area.width < SIDEBAR_MIN_WIDTH {
            return Self {
                header,
                main: body,
                sidebar: None,
                footer,
            };
        }

        let [main, sidebar] =
            Layout::horizontal([Constraint::Percentage(75), Constraint::Percentage(25)])
                .areas(body);
        Self {
            header,
            main,
            sidebar: Some(sidebar),
            footer,
        }
    }

    pub fn is_compact(&self) -> bool {
        self.sidebar.is_none()
    }

    pub fn show_progress_bar(&self) -> bool {
        self.main.height >= PROGRESS_MIN_HEIGHT
    }
}

/// The leading key hints of a `"[k] a  [k] b"` string that fit in `width`.
pub fn fit_hints(hints: &str, width: usize) -> String {
    let mut line = String::new();
    for hint in hints.split(HINT_SEPARATOR).filter(|h| !h.is_empty()) {
        let sep = if line.is_empty() { " " } else { HINT_SEPARATOR };
        if line.chars().count() + sep.len() + hint.chars().count() > width {
            break;
        }
        line.push_str(sep);
        line.push_str(hint);
    }
    line
}

/// A centred popup covering the given share of `area`, grown to a readable
/// minimum where the terminal allows it.
pub fn popup_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let share = |len: u16, pct: u16| (u32::from(len) * u32::from(pct.min(100)) / 100) as u16;
    let width = share(area.width, percent_x).max(POPUP_MIN.0).min(area.width);
    let height = share(area.height, percent_y).max(POPUP_MIN.1).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
