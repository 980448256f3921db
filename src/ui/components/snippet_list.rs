use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::catalog::{Catalog, Difficulty};
use crate::store::schema::UserProfile;
use crate::ui::theme::Theme;

/// Explorer list: the catalog entries passing the difficulty filter, with
/// lock state, completion mark and best WPM.
pub struct SnippetList<'a> {
    catalog: &'a Catalog,
    visible: &'a [usize],
    selected: usize,
    profile: &'a UserProfile,
    theme: &'a Theme,
}

impl<'a> SnippetList<'a> {
    pub fn new(
        catalog: &'a Catalog,
        visible: &'a [usize],
        selected: usize,
        profile: &'a UserProfile,
        theme: &'a Theme,
    ) -> Self {
        Self {
            catalog,
            visible,
            selected,
            profile,
            theme,
        }
    }
}

impl Widget for SnippetList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("explorer.title")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.visible.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", t!("explorer.empty")),
                Style::default().fg(colors.text_pending()),
            )))
            .render(inner, buf);
            return;
        }

        // Keep the selection on screen.
        let height = inner.height as usize;
        let offset = if height == 0 {
            0
        } else {
            self.selected.saturating_sub(height - 1)
        };

        let lines: Vec<Line> = self
            .visible
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .filter_map(|(row, &idx)| {
                let snippet = self.catalog.get(idx)?;
                let is_selected = row == self.selected;
                let unlocked = Catalog::is_unlocked(idx, self.profile.level);

                let indicator = if is_selected { ">" } else { " " };
                let mark = if !unlocked {
                    "\u{1f512}"
                } else if self.profile.completed_snippets.contains(&snippet.id) {
                    "\u{2713} "
                } else {
                    "  "
                };
                let difficulty_color = match snippet.difficulty {
                    Difficulty::Easy => colors.success(),
                    Difficulty::Medium => colors.warning(),
                    Difficulty::Hard => colors.error(),
                };
                let name_style = if !unlocked {
                    Style::default().fg(colors.text_pending())
                } else if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };

                let detail = if unlocked {
                    match self.profile.high_score(&snippet.id) {
                        Some(best) => format!("  {} wpm", best.wpm),
                        None => String::new(),
                    }
                } else {
                    format!(
                        "  {}",
                        t!("explorer.locked", level = Catalog::required_level(idx))
                    )
                };

                Some(Line::from(vec![
                    Span::styled(format!(" {indicator} {mark} "), name_style),
                    Span::styled(format!("{:<28}", snippet.filename), name_style),
                    Span::styled(
                        format!("{:<12}", snippet.language),
                        Style::default().fg(colors.text_pending()),
                    ),
                    Span::styled(
                        format!("{:<7}", snippet.difficulty.as_str()),
                        Style::default().fg(difficulty_color),
                    ),
                    Span::styled(detail, Style::default().fg(colors.text_pending())),
                ]))
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
