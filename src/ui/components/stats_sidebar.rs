use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::session::stats::LiveStats;
use crate::store::schema::HighScore;
use crate::ui::theme::Theme;

pub struct StatsSidebar<'a> {
    stats: &'a LiveStats,
    combo: u32,
    progress: f64,
    high_score: Option<&'a HighScore>,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(
        stats: &'a LiveStats,
        combo: u32,
        progress: f64,
        high_score: Option<&'a HighScore>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            stats,
            combo,
            progress,
            high_score,
            theme,
        }
    }
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());

        let accuracy = self.stats.accuracy;
        let acc_color = if accuracy >= 95 {
            colors.success()
        } else if accuracy >= 85 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.wpm")), label),
                Span::styled(self.stats.wpm.to_string(), Style::default().fg(colors.accent())),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.accuracy")), label),
                Span::styled(format!("{accuracy}%"), Style::default().fg(acc_color)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.progress")), label),
                Span::styled(
                    format!("{:.0}%", self.progress * 100.0),
                    Style::default().fg(colors.accent()),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.errors")), label),
                Span::styled(self.stats.errors.to_string(), Style::default().fg(colors.error())),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.combo")), label),
                Span::styled(self.combo.to_string(), Style::default().fg(colors.success())),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.time")), label),
                Span::styled(format!("{}s", self.stats.elapsed_secs), label),
            ]),
        ];

        if let Some(best) = self.high_score {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", t!("stats.best")), label),
                Span::styled(
                    format!("{} wpm / {}%", best.wpm, best.accuracy),
                    Style::default().fg(colors.text_pending()),
                ),
            ]));
        }

        let block = Block::bordered()
            .title(format!(" {} ", t!("stats.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
