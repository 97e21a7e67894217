//! UI rendering for the TUI

use crate::app::{
    App, NavHit, DESKTOP_NAV_MIN_WIDTH, PROGRESS_RAIL_MIN_WIDTH, PROGRESS_RAIL_WIDTH,
};
use crate::config::NavMode;
use crate::views::wrap::{display_width, truncate, wrap_text};
use crate::views::{build_page, status_color, status_icon, RenderContext};
use pipefolio_core::StageId;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    if let Some(bg) = app.theme.background {
        frame.render_widget(Block::default().style(Style::default().bg(bg)), area);
    }

    if app.is_booting() {
        draw_boot_splash(frame, app, area);
        return;
    }

    app.nav_hits.clear();

    if app.zen_mode {
        // Zen mode: just the content with a minimal stage indicator
        draw_body(frame, app, area);
        draw_zen_progress(frame, app);
    } else {
        let desktop = use_desktop_nav(app, area.width);
        let mut constraints = vec![
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Page
        ];
        if !desktop {
            constraints.push(Constraint::Length(1)); // Bottom navigation
        }
        constraints.push(Constraint::Length(1)); // Status bar
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        draw_header(frame, app, chunks[0], desktop);

        let show_rail = app.progress_rail && area.width >= PROGRESS_RAIL_MIN_WIDTH;
        if show_rail {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(PROGRESS_RAIL_WIDTH), Constraint::Min(0)])
                .split(chunks[1]);
            draw_progress_rail(frame, app, columns[0]);
            draw_body(frame, app, columns[1]);
        } else {
            draw_body(frame, app, chunks[1]);
        }

        if !desktop {
            draw_mobile_nav(frame, app, chunks[2]);
        }
        draw_status_bar(frame, app, chunks[chunks.len() - 1]);
    }

    if app.show_help {
        draw_help_popover(frame, app);
    }

    if app.prompt().is_some() {
        draw_prompt(frame, app);
    }
}

fn chip_label(app: &App, id: StageId) -> String {
    let status = app.stage_status(id);
    let title = app.stage(id).map(|stage| stage.title.as_str()).unwrap_or("");
    format!(" Stage {}: {} {} ", id.number(), status_icon(status), title)
}

fn use_desktop_nav(app: &App, width: u16) -> bool {
    match app.nav_mode {
        NavMode::Desktop => true,
        NavMode::Mobile => false,
        NavMode::Auto => {
            if width < DESKTOP_NAV_MIN_WIDTH {
                return false;
            }
            let needed: usize = (0..app.stage_count())
                .map(|index| display_width(&chip_label(app, StageId::new(index))) + 1)
                .sum();
            needed <= width as usize
        }
    }
}

fn draw_header(frame: &mut Frame, app: &mut App, area: Rect, desktop: bool) {
    let theme = &app.theme;
    let mut block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border));
    if let Some(bg) = theme.background_panel {
        block = block.style(Style::default().bg(bg));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dot_color = if app.blink_on() {
        theme.success
    } else {
        theme.success_dim()
    };
    let build = format!("Build #{} ", app.build_number);
    let title = format!(" ⚙ {}", app.portfolio.title);
    let gap = (inner.width as usize)
        .saturating_sub(display_width(&title) + display_width(&build) + 2);
    let top = Line::from(vec![
        Span::styled(title, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(gap)),
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::styled(build, Style::default().fg(theme.text_muted)),
    ]);
    frame.render_widget(Paragraph::new(top), Rect { height: 1, ..inner });

    if !desktop || inner.height < 2 {
        return;
    }

    let row = inner.y + 1;
    let active = app.active_stage();
    let mut spans = Vec::new();
    let mut hits = Vec::new();
    let mut x = inner.x;
    for index in 0..app.stage_count() {
        let id = StageId::new(index);
        let label = chip_label(app, id);
        let width = display_width(&label) as u16;
        if x.saturating_add(width) > inner.x + inner.width {
            break;
        }
        let status = app.stage_status(id);
        let mut style = Style::default().fg(status_color(status, &app.theme));
        if id == active {
            style = style
                .fg(app.theme.border_active)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        hits.push(NavHit {
            x,
            y: row,
            width,
            height: 1,
            stage: id,
        });
        x = x.saturating_add(width + 1);
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(inner.x, row, inner.width, 1),
    );
    app.nav_hits.extend(hits);
}

fn draw_mobile_nav(frame: &mut Frame, app: &mut App, area: Rect) {
    let active = app.active_stage();
    let count = app.stage_count();
    let slot = (area.width as usize / count.max(1)).max(1);

    let mut spans = Vec::new();
    let mut hits = Vec::new();
    for index in 0..count {
        let id = StageId::new(index);
        let Some(stage) = app.stage(id) else {
            continue;
        };
        let full = format!("{} {}", stage.icon, stage.title);
        let label = if display_width(&full) + 2 <= slot {
            full
        } else {
            truncate(&format!("{}{}", stage.icon, id.number()), slot.saturating_sub(1))
        };
        let pad = slot.saturating_sub(display_width(&label));
        let label = format!("{}{}{}", " ".repeat(pad / 2), label, " ".repeat(pad - pad / 2));
        let status = app.stage_status(id);
        let mut style = Style::default().fg(status_color(status, &app.theme));
        if id == active {
            style = style.fg(app.theme.accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        hits.push(NavHit {
            x: area.x + (index * slot) as u16,
            y: area.y,
            width: slot as u16,
            height: 1,
            stage: id,
        });
        spans.push(Span::styled(label, style));
    }

    let mut paragraph = Paragraph::new(Line::from(spans));
    if let Some(bg) = app.theme.background_panel {
        paragraph = paragraph.style(Style::default().bg(bg));
    }
    frame.render_widget(paragraph, area);
    app.nav_hits.extend(hits);
}

fn draw_body(frame: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height as usize;
    let page = {
        let ctx = RenderContext::from_app(app);
        build_page(app, &ctx, area.width, height)
    };
    app.viewport.set_layout(page.sections.clone(), height);
    let lines = page.window(app.viewport.offset(), height);
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_progress_rail(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Pipeline ")
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 3 {
        return;
    }

    let count = app.stage_count();
    let active = app.active_stage().index();
    let bar_height = inner.height.saturating_sub(2) as usize;
    let filled = (bar_height as f32 * app.viewport.progress() / 100.0).round() as usize;

    let mut lines = Vec::with_capacity(inner.height as usize);
    for row in 0..bar_height {
        let bar = if row < filled {
            Span::styled("┃", Style::default().fg(theme.success))
        } else {
            Span::styled("│", Style::default().fg(theme.border))
        };
        let mut spans = vec![Span::raw(" "), bar];
        let stage_row = (0..count).find(|index| {
            let at = if count > 1 {
                index * (bar_height.saturating_sub(1)) / (count - 1)
            } else {
                0
            };
            at == row
        });
        if let Some(index) = stage_row {
            let lit = index <= active;
            let (dot, color) = if lit {
                ("●", theme.success)
            } else {
                ("○", theme.text_muted)
            };
            spans.push(Span::styled(format!(" {dot} {}", index + 1), Style::default().fg(color)));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(" Stage {}/{}", active + 1, count),
        Style::default().fg(theme.text_muted),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_zen_progress(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let text = format!(" {}/{} ", app.active_stage().number(), app.stage_count());
    let width = (text.len() as u16).min(area.width);
    let rect = Rect::new(area.x + area.width - width, area.y, width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(app.theme.text_muted))),
        rect,
    );
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.active_stage();
    let status = app.stage_status(active);
    let title = app.stage(active).map(|stage| stage.title.clone()).unwrap_or_default();

    let left = vec![
        Span::styled(
            " PIPELINE ",
            Style::default()
                .fg(Color::Black)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("Stage {}/{}", active.number(), app.stage_count()),
            Style::default().fg(theme.text),
        ),
        Span::styled(" · ", Style::default().fg(theme.text_muted)),
        Span::styled(title, Style::default().fg(theme.text)),
        Span::styled(" · ", Style::default().fg(theme.text_muted)),
        Span::styled(
            status.label().to_uppercase(),
            Style::default().fg(status_color(status, theme)),
        ),
    ];
    let right = vec![
        Span::styled(
            format!("{:>3.0}%", app.viewport.progress()),
            Style::default().fg(theme.text_muted),
        ),
        Span::raw("  "),
        Span::styled("p", Style::default().fg(theme.accent)),
        Span::styled(" prompt  ", Style::default().fg(theme.text_muted)),
        Span::styled("?", Style::default().fg(theme.accent)),
        Span::styled(" help ", Style::default().fg(theme.text_muted)),
    ];

    let left_width: usize = left.iter().map(|span| display_width(&span.content)).sum();
    let right_width: usize = right.iter().map(|span| display_width(&span.content)).sum();
    let mut spans = left;
    if left_width + right_width < area.width as usize {
        spans.push(Span::raw(" ".repeat(area.width as usize - left_width - right_width)));
        spans.extend(right);
    }

    let mut paragraph = Paragraph::new(Line::from(spans));
    if let Some(bg) = theme.background_panel {
        paragraph = paragraph.style(Style::default().bg(bg));
    }
    frame.render_widget(paragraph, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn draw_help_popover(frame: &mut Frame, app: &App) {
    let popup_area = centered(frame.area(), 44, 22);
    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(app.theme.accent);
    let label_style = Style::default().fg(app.theme.text);
    let section_style = Style::default().fg(app.theme.primary);

    let help_line = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), key_style),
            Span::styled(desc.to_string(), label_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(" Scroll", section_style)),
        help_line("j / k / ↑↓", "Scroll line"),
        help_line("^D / ^U", "Scroll half-page"),
        help_line("wheel", "Scroll"),
        Line::from(""),
        Line::from(Span::styled(" Stages", section_style)),
        help_line("n / l / →", "Next stage"),
        help_line("N / h / ←", "Previous stage"),
        help_line("1-9", "Jump to stage"),
        help_line("g / G", "First/last stage"),
        help_line("click", "Jump to stage"),
        help_line("p", "Pipeline prompt"),
        Line::from(""),
        Line::from(Span::styled(" View", section_style)),
        help_line("Z", "Zen mode"),
        help_line("?", "Close help"),
        help_line("q / Esc", "Quit"),
    ];

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(app.theme.border_active));
    if let Some(bg) = app.theme.background_panel {
        block = block.style(Style::default().bg(bg));
    }

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

fn draw_prompt(frame: &mut Frame, app: &App) {
    let Some((id, typer)) = app.prompt() else {
        return;
    };
    let Some(stage) = app.stage(id) else {
        return;
    };
    let Some(prompt) = stage.prompt.as_ref() else {
        return;
    };
    let theme = &app.theme;
    let popup_area = centered(frame.area(), 72, 18);
    frame.render_widget(Clear, popup_area);

    let inner_width = popup_area.width.saturating_sub(4) as usize;
    let muted = Style::default().fg(theme.text_muted);
    let mut lines = vec![
        Line::from(Span::styled("jenkins@pipeline:~$", muted)),
    ];
    for row in wrap_text(&prompt.command, inner_width.saturating_sub(2)) {
        lines.push(Line::from(vec![
            Span::styled("▌ ", Style::default().fg(theme.success)),
            Span::styled(row, Style::default().fg(theme.success)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Output:", muted)));

    let mut output: Vec<Line<'static>> = if typer.displayed().is_empty() {
        vec![Line::default()]
    } else {
        wrap_text(typer.displayed(), inner_width)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, Style::default().fg(theme.text))))
            .collect()
    };
    if typer.is_typing() {
        if let Some(last) = output.last_mut() {
            let caret = if app.blink_on() {
                Style::default().fg(theme.success)
            } else {
                Style::default().fg(theme.success).add_modifier(Modifier::DIM)
            };
            last.spans.push(Span::styled("|", caret));
        }
    }
    lines.extend(output);

    let title = format!(" ⌨ Pipeline Stage {}: {} ", id.number(), stage.title);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)))
        .title_bottom(Line::from(Span::styled(" Esc close ", muted)).right_aligned())
        .border_style(Style::default().fg(theme.border_active));
    if let Some(bg) = theme.background_panel {
        block = block.style(Style::default().bg(bg));
    }
    let paragraph = Paragraph::new(lines)
        .block(block.padding(ratatui::widgets::Padding::horizontal(1)));
    frame.render_widget(paragraph, popup_area);
}

fn draw_boot_splash(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let popup_area = centered(area, 48, 9);
    let frame_index = (app.now().as_millis() / 80) as usize % SPINNER.len();
    let bar_width = popup_area.width.saturating_sub(6) as usize;
    let filled = (bar_width as f32 * app.boot_progress()).round() as usize;

    let lines = vec![
        Line::from(Span::styled(
            app.portfolio.title.clone(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled(SPINNER[frame_index], Style::default().fg(theme.running)),
            Span::styled(" Initializing pipeline...", Style::default().fg(theme.text)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(theme.success)),
            Span::styled(
                "░".repeat(bar_width.saturating_sub(filled)),
                Style::default().fg(theme.border),
            ),
        ]),
        Line::default(),
        Line::from(Span::styled("press any key to skip", Style::default().fg(theme.text_muted))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        popup_area,
    );
}
