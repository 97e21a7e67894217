//! The scrolled page: one section per stage, stacked

use super::blocks::{render_block, render_profile};
use super::terminal::render_console;
use super::wrap::{display_width, wrap_text};
use super::{status_color, status_icon, RenderContext};
use crate::app::{App, SectionSpan};
use pipefolio_core::StageId;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

const MARGIN: usize = 1;

/// Rendered page lines and where each section sits
#[derive(Debug, Default)]
pub struct Page {
    pub lines: Vec<Line<'static>>,
    pub sections: Vec<SectionSpan>,
}

impl Page {
    /// Rows `offset..offset + height`, for drawing
    pub fn window(&self, offset: usize, height: usize) -> Vec<Line<'static>> {
        self.lines.iter().skip(offset).take(height).cloned().collect()
    }
}

/// Lay out every stage. Each section is at least `min_height` rows tall so a
/// single section can fill the view on its own.
pub fn build_page(app: &App, ctx: &RenderContext, width: u16, min_height: usize) -> Page {
    let inner = (width as usize).saturating_sub(MARGIN * 2).max(1);
    let mut page = Page::default();
    for index in 0..app.stage_count() {
        let mut section = render_section(app, StageId::new(index), ctx, inner);
        let height = section.len().max(min_height);
        section.resize(height, Line::default());
        page.sections.push(SectionSpan::new(page.lines.len(), height));
        page.lines.extend(section.into_iter().map(indent));
    }
    page
}

fn indent(mut line: Line<'static>) -> Line<'static> {
    if !line.spans.is_empty() {
        line.spans.insert(0, Span::raw(" ".repeat(MARGIN)));
    }
    line
}

fn render_section(app: &App, id: StageId, ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
    let Some(stage) = app.stage(id) else {
        return Vec::new();
    };
    let theme = ctx.theme;
    let status = app.stage_status(id);
    let status_style = Style::default().fg(status_color(status, theme));

    let title = format!("{} STAGE {} · {}", stage.icon, id.number(), stage.title.to_uppercase());
    let tag = format!("{} {}", status_icon(status), status.label().to_uppercase());
    let gap = width
        .saturating_sub(display_width(&title) + display_width(&tag))
        .max(2);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(gap)),
            Span::styled(tag, status_style.add_modifier(Modifier::BOLD)),
        ]),
        Line::default(),
    ];

    let heading_style = Style::default()
        .fg(theme.primary)
        .add_modifier(Modifier::BOLD);
    lines.extend(
        wrap_text(stage.heading(), width)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, heading_style))),
    );
    if let Some(subheading) = &stage.subheading {
        lines.extend(
            wrap_text(subheading, width)
                .into_iter()
                .map(|row| Line::from(Span::styled(row, Style::default().fg(theme.text_muted)))),
        );
    }
    lines.push(Line::default());

    if id.index() == 0 {
        lines.extend(render_profile(&app.portfolio.profile, ctx, width));
        lines.push(Line::default());
    }

    if let Some(log) = app.log(id) {
        if !log.lines().is_empty() {
            lines.extend(render_console(log, ctx, width));
            lines.push(Line::default());
        }
    }

    for block in &stage.blocks {
        lines.extend(render_block(block, ctx, width));
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled(
        "┄".repeat(width),
        Style::default().fg(theme.border),
    )));
    lines
}
