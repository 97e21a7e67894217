//! The per-stage console box

use super::wrap::{display_width, pad_to};
use super::RenderContext;
use pipefolio_core::LineRevealer;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

pub const CONSOLE_TITLE: &str = "jenkins-pipeline-console";

/// Rows the console occupies for `log_len` lines: borders, the lines, and the prompt row
pub fn console_height(log_len: usize) -> usize {
    log_len + 3
}

/// Render the console at a fixed height so revealing lines never moves the layout.
/// Lines that are not out yet are blank rows.
pub fn render_console(log: &LineRevealer, ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
    let theme = ctx.theme;
    let border = Style::default().fg(theme.border);
    let inner = width.saturating_sub(4).max(1);

    let mut lines = Vec::with_capacity(console_height(log.lines().len()));

    let dots = vec![
        Span::styled("●", Style::default().fg(theme.error)),
        Span::raw(" "),
        Span::styled("●", Style::default().fg(theme.warning)),
        Span::raw(" "),
        Span::styled("●", Style::default().fg(theme.success)),
        Span::raw("  "),
        Span::styled(CONSOLE_TITLE, Style::default().fg(theme.text_muted)),
        Span::raw(" "),
    ];
    let used: usize = dots.iter().map(|span| display_width(&span.content)).sum();
    let mut top = vec![Span::styled("╭─ ", border)];
    top.extend(dots);
    top.push(Span::styled(
        format!("{}╮", "─".repeat(inner.saturating_sub(used))),
        border,
    ));
    lines.push(Line::from(top));

    let stamp = format!("[{}] ", ctx.clock);
    let stamp_width = display_width(&stamp);
    let displayed = log.displayed();
    for index in 0..log.lines().len() {
        let body = match displayed.get(index) {
            Some(text) => vec![
                Span::styled(stamp.clone(), Style::default().fg(theme.text_muted)),
                Span::styled(
                    pad_to(text, inner.saturating_sub(stamp_width)),
                    Style::default().fg(theme.console),
                ),
            ],
            None => vec![Span::raw(" ".repeat(inner))],
        };
        lines.push(boxed(body, border));
    }

    let prompt = if log.is_visible() {
        let cursor = if ctx.blink_on { "█" } else { " " };
        vec![
            Span::styled("$ ", Style::default().fg(theme.console)),
            Span::styled(
                cursor,
                Style::default().fg(theme.console).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(inner.saturating_sub(3))),
        ]
    } else {
        vec![Span::raw(" ".repeat(inner))]
    };
    lines.push(boxed(prompt, border));

    lines.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(inner + 2)),
        border,
    )));
    lines
}

fn boxed(body: Vec<Span<'static>>, border: Style) -> Line<'static> {
    let mut spans = vec![Span::styled("│ ", border)];
    spans.extend(body);
    spans.push(Span::styled(" │", border));
    Line::from(spans)
}
