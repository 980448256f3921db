use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::achievements::ACHIEVEMENTS;
use crate::engine::scoring::level_progress;
use crate::store::schema::UserProfile;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// Long-term progress: level bar, totals and the achievement table.
pub struct ProfileOverview<'a> {
    profile: &'a UserProfile,
    catalog_len: usize,
    theme: &'a Theme,
}

impl<'a> ProfileOverview<'a> {
    pub fn new(profile: &'a UserProfile, catalog_len: usize, theme: &'a Theme) -> Self {
        Self {
            profile,
            catalog_len,
            theme,
        }
    }
}

impl Widget for ProfileOverview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let profile = self.profile;

        let block = Block::bordered()
            .title(format!(" {} ", t!("dashboard.title")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(inner);

        let progress = level_progress(profile.xp);
        ProgressBar::new(
            t!("dashboard.level", level = progress.level).to_string(),
            progress.ratio(),
            self.theme,
        )
        .caption(format!("{} / {} XP", progress.into_level, progress.required))
        .render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default().fg(colors.accent());
        let row = |name: String, v: String| {
            Line::from(vec![
                Span::styled(format!("  {name:<22}"), label),
                Span::styled(v, value),
            ])
        };
        let totals = vec![
            row(
                t!("dashboard.challenges").to_string(),
                format!(
                    "{}  ({}/{} {})",
                    profile.total_challenges,
                    profile.completed_snippets.len(),
                    self.catalog_len,
                    t!("dashboard.snippets")
                ),
            ),
            row(t!("dashboard.best_wpm").to_string(), profile.best_wpm.to_string()),
            row(
                t!("dashboard.avg_accuracy").to_string(),
                format!("{}%", profile.average_accuracy),
            ),
            row(t!("dashboard.points").to_string(), profile.total_points.to_string()),
            row(
                t!("dashboard.streak").to_string(),
                format!("{} / {}", profile.streak_days, profile.best_streak),
            ),
        ];
        Paragraph::new(totals).render(layout[1], buf);

        let mut lines = vec![Line::from(Span::styled(
            format!(
                "  {} ({}/{})",
                t!("dashboard.achievements"),
                profile.achievements.len(),
                ACHIEVEMENTS.len()
            ),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))];
        for def in ACHIEVEMENTS {
            let unlocked = profile.has_achievement(def.id.to_key());
            let (icon, title_style) = if unlocked {
                (def.icon, Style::default().fg(colors.warning()))
            } else {
                ("\u{00b7}", Style::default().fg(colors.text_pending()))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {icon} "), title_style),
                Span::styled(format!("{:<18}", def.id.title()), title_style),
                Span::styled(
                    def.id.description(),
                    Style::default().fg(colors.text_pending()),
                ),
            ]));
        }
        Paragraph::new(lines).render(layout[2], buf);
    }
}
