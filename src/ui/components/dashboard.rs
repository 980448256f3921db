use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::profile::CompletionReport;
use crate::ui::theme::Theme;

/// Completion screen for one finished snippet.
pub struct Dashboard<'a> {
    pub report: &'a CompletionReport,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(report: &'a CompletionReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = &self.report.result;
        let rewards = &self.report.rewards;

        let block = Block::bordered()
            .title(format!(" {} ", t!("result.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let grade = result.grade();
        let headline = vec![
            Line::from(Span::styled(
                grade.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                result.tier().message(),
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(headline)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let acc_color = if result.accuracy >= 95 {
            colors.success()
        } else if result.accuracy >= 85 {
            colors.warning()
        } else {
            colors.error()
        };

        let figures = vec![
            Line::from(vec![
                Span::styled(format!("  {:<10}", t!("stats.wpm")), label),
                Span::styled(result.wpm.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled(format!("  {:<10}", t!("stats.accuracy")), label),
                Span::styled(
                    format!("{}%", result.accuracy),
                    Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} / {})", result.errors, result.typed_chars),
                    Style::default().fg(colors.text_pending()),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("  {:<10}", t!("stats.time")), label),
                Span::styled(format!("{:.1}s", result.elapsed_secs), label),
            ]),
            Line::from(vec![
                Span::styled(format!("  {:<10}", t!("stats.combo")), label),
                Span::styled(result.best_combo.to_string(), label),
            ]),
            Line::from(vec![
                Span::styled(format!("  {:<10}", t!("result.points")), label),
                Span::styled(format!("+{}", rewards.points), value),
                Span::styled(
                    format!("  +{} XP", rewards.xp_gained),
                    Style::default().fg(colors.text_pending()),
                ),
            ]),
        ];
        Paragraph::new(figures).render(layout[1], buf);

        let mut notes: Vec<Line> = Vec::new();
        if let Some(rewards) = self.report.confirmed_rewards() {
            if rewards.leveled_up() {
                notes.push(Line::from(Span::styled(
                    format!("  {}", t!("toast.level_up", level = rewards.level_after)),
                    Style::default().fg(colors.success()).add_modifier(Modifier::BOLD),
                )));
            }
            if rewards.new_high_score {
                notes.push(Line::from(Span::styled(
                    format!("  {}", t!("toast.high_score", wpm = result.wpm)),
                    Style::default().fg(colors.success()),
                )));
            }
            notes.push(Line::from(Span::styled(
                format!("  {}", t!("result.streak", days = rewards.streak_days)),
                Style::default().fg(colors.fg()),
            )));
            for id in &rewards.new_achievements {
                notes.push(Line::from(vec![
                    Span::styled(format!("  {} ", id.def().icon), Style::default()),
                    Span::styled(
                        id.title(),
                        Style::default().fg(colors.warning()).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", id.description()),
                        Style::default().fg(colors.text_pending()),
                    ),
                ]));
            }
        }
        if let Some(ref err) = self.report.persist_error {
            notes.push(Line::from(""));
            notes.push(Line::from(Span::styled(
                format!("  {}: {err}", t!("toast.save_failed")),
                Style::default().fg(colors.error()),
            )));
        }
        Paragraph::new(notes).render(layout[2], buf);

        let help = Paragraph::new(Line::from(Span::styled(
            format!(" {}", t!("hints.result")),
            Style::default().fg(colors.accent()),
        )));
        help.render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::engine::achievements::AchievementId;
    use crate::engine::rewards::RewardSummary;
    use crate::session::result::SessionResult;

    fn report(persist_error: Option<String>) -> CompletionReport {
        CompletionReport {
            result: SessionResult {
                snippet_id: "a".to_string(),
                wpm: 50,
                accuracy: 100,
                errors: 0,
                typed_chars: 100,
                elapsed_secs: 24.0,
                best_combo: 100,
                timestamp: Utc::now(),
            },
            rewards: RewardSummary {
                points: 75,
                xp_gained: 37,
                level_before: 1,
                level_after: 1,
                new_high_score: true,
                streak_days: 1,
                new_achievements: vec![AchievementId::FirstChallenge],
            },
            persist_error,
        }
    }

    fn rendered(report: &CompletionReport) -> String {
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        Dashboard::new(report, &Theme::default()).render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_unlocks_shown_after_save() {
        let icon = AchievementId::FirstChallenge.def().icon;
        assert!(rendered(&report(None)).contains(icon));
    }

    #[test]
    fn test_unlocks_hidden_when_save_failed() {
        let icon = AchievementId::FirstChallenge.def().icon;
        let text = rendered(&report(Some("store is unavailable".to_string())));
        assert!(!text.contains(icon));
        assert!(text.contains("store is unavailable"));
    }
}
