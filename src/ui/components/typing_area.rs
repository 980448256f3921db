use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::state::SessionState;
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    session: &'a SessionState,
    theme: &'a Theme,
    title: String,
    show_line_numbers: bool,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a SessionState, theme: &'a Theme, title: String) -> Self {
        Self {
            session,
            theme,
            title,
            show_line_numbers: false,
        }
    }

    pub fn line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }
}

/// A render token maps a single target character to its display representation.
struct RenderToken {
    target_idx: usize,
    display: String,
    is_line_break: bool,
}

/// Expand target chars into render tokens, handling whitespace display.
fn build_render_tokens(target: &[char]) -> Vec<RenderToken> {
    let mut tokens = Vec::new();
    let mut col = 0usize;

    for (i, &ch) in target.iter().enumerate() {
        match ch {
            '\n' => {
                tokens.push(RenderToken {
                    target_idx: i,
                    display: "\u{21b5}".to_string(), // ↵
                    is_line_break: true,
                });
                col = 0;
            }
            '\t' => {
                let tab_width = 4 - (col % 4);
                tokens.push(RenderToken {
                    target_idx: i,
                    display: " ".repeat(tab_width),
                    is_line_break: false,
                });
                col += tab_width;
            }
            _ => {
                tokens.push(RenderToken {
                    target_idx: i,
                    display: ch.to_string(),
                    is_line_break: false,
                });
                col += 1;
            }
        }
    }

    tokens
}

fn line_number_span(n: usize, width: usize, style: Style) -> Span<'static> {
    Span::styled(format!("{n:>width$} "), style)
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;
        let tokens = build_render_tokens(&session.target);
        let next = (!session.is_complete()).then(|| session.next_target());

        let number_style = Style::default().fg(colors.line_number());
        let total_lines = session.target.iter().filter(|&&c| c == '\n').count() + 1;
        let number_width = total_lines.to_string().len();

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        if self.show_line_numbers {
            lines[0].push(line_number_span(1, number_width, number_style));
        }

        // Index into `typed` for the next consumed typeable position.
        let mut typed_idx = 0;

        for token in &tokens {
            let idx = token.target_idx;
            let target_ch = session.target[idx];
            let mut display = token.display.clone();

            let style = if session.is_skipped(idx) {
                if target_ch.is_whitespace() {
                    Style::default().fg(colors.text_skipped())
                } else {
                    Style::default()
                        .fg(colors.text_skipped())
                        .add_modifier(Modifier::ITALIC)
                }
            } else if Some(idx) == next {
                Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg())
            } else if idx < session.cursor {
                let typed = session.typed.get(typed_idx).copied();
                typed_idx += 1;
                if session.is_error(idx) {
                    // Show what was typed, except over whitespace markers.
                    if let Some(actual) = typed {
                        if !target_ch.is_whitespace() && !actual.is_control() {
                            display = actual.to_string();
                        }
                    }
                    Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED)
                } else {
                    Style::default().fg(colors.text_correct())
                }
            } else {
                Style::default().fg(colors.text_pending())
            };

            if let Some(line) = lines.last_mut() {
                line.push(Span::styled(display, style));
            }

            if token.is_line_break {
                let mut line = Vec::new();
                if self.show_line_numbers {
                    line.push(line_number_span(lines.len() + 1, number_width, number_style));
                }
                lines.push(line);
            }
        }

        let ratatui_lines: Vec<Line> = lines.into_iter().map(Line::from).collect();

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let paragraph = Paragraph::new(ratatui_lines)
            .block(block)
            .wrap(Wrap { trim: false });

        paragraph.render(area, buf);
    }
}
