//! Content blocks inside a stage section

use super::wrap::{display_width, flow, pad_to, truncate, wrap_text};
use super::RenderContext;
use crate::color::{badge_fill, badge_text};
use pipefolio_core::content::{Badge, KeyValue, Link, Profile, Project};
use pipefolio_core::Block;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const INDENT: usize = 2;
const BAR_WIDTH: usize = 20;

pub fn render_block(block: &Block, ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
    match block {
        Block::Text { paragraphs } => text(paragraphs, ctx, width),
        Block::Badges {
            heading,
            icon,
            badges,
        } => {
            let mut lines = vec![heading_line(heading, icon.as_deref(), ctx)];
            lines.extend(badge_lines(badges, width));
            lines
        }
        Block::Bullets {
            title,
            subtitle,
            period,
            items,
        } => bullets(title, subtitle.as_deref(), period.as_deref(), items, ctx, width),
        Block::Metrics { heading, metrics } => {
            let mut lines = vec![heading_line(heading, None, ctx)];
            let groups = metrics
                .iter()
                .map(|metric| {
                    vec![
                        Span::styled(
                            metric.value.clone(),
                            Style::default()
                                .fg(badge_text(metric.color))
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" "),
                        Span::styled(metric.label.clone(), Style::default().fg(ctx.theme.text_muted)),
                    ]
                })
                .collect();
            lines.extend(flow(groups, width, INDENT, 4));
            lines
        }
        Block::Projects { projects, footer } => {
            let mut lines = Vec::new();
            for project in projects {
                lines.extend(project_card(project, ctx, width));
                lines.push(Line::default());
            }
            if let Some(link) = footer {
                lines.push(link_line(link, ctx, width));
            }
            lines
        }
        Block::List {
            heading,
            icon,
            items,
        } => {
            let mut lines = vec![heading_line(heading, icon.as_deref(), ctx)];
            for item in items {
                let marker = item.icon.clone().unwrap_or_else(|| "•".to_string());
                let mut spans = vec![
                    Span::raw(" ".repeat(INDENT)),
                    Span::styled(format!("{marker} "), Style::default().fg(badge_text(item.color))),
                    Span::styled(item.text.clone(), Style::default().fg(ctx.theme.text)),
                ];
                if let Some(detail) = &item.detail {
                    spans.push(Span::styled(
                        format!("  {detail}"),
                        Style::default().fg(ctx.theme.text_muted),
                    ));
                }
                lines.push(Line::from(spans));
            }
            lines
        }
        Block::Progress { heading, items } => {
            let mut lines = vec![heading_line(heading, None, ctx)];
            let label_width = items
                .iter()
                .map(|item| display_width(&item.label))
                .max()
                .unwrap_or(0)
                .min(width / 2);
            for item in items {
                let percent = item.percent.min(100) as usize;
                let filled = BAR_WIDTH * percent / 100;
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(INDENT)),
                    Span::styled(pad_to(&item.label, label_width), Style::default().fg(ctx.theme.text)),
                    Span::raw(" "),
                    Span::styled("█".repeat(filled), Style::default().fg(badge_text(item.color))),
                    Span::styled(
                        "░".repeat(BAR_WIDTH - filled),
                        Style::default().fg(ctx.theme.border),
                    ),
                    Span::styled(format!(" {percent:>3}%"), Style::default().fg(ctx.theme.text_muted)),
                ]));
            }
            lines
        }
        Block::Links { heading, links } => {
            let mut lines = vec![heading_line(heading, None, ctx)];
            lines.extend(links.iter().map(|link| link_line(link, ctx, width)));
            lines
        }
        Block::KeyValues { heading, rows } => {
            let mut lines = vec![heading_line(heading, None, ctx)];
            lines.extend(key_values(rows, ctx, width));
            lines
        }
    }
}

/// The hero block of the first stage
pub fn render_profile(profile: &Profile, ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
    let theme = ctx.theme;
    let mut name = vec![Span::styled(
        profile.name.clone(),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(pronouns) = &profile.pronouns {
        name.push(Span::styled(
            format!(" ({pronouns})"),
            Style::default().fg(theme.text_muted),
        ));
    }
    let mut lines = vec![
        Line::from(name),
        Line::from(Span::styled(
            profile.headline.clone(),
            Style::default().fg(theme.accent),
        )),
        Line::default(),
    ];
    lines.extend(text(&profile.summary, ctx, width));
    if !profile.badges.is_empty() {
        lines.push(Line::default());
        lines.extend(badge_lines(&profile.badges, width));
    }
    if !profile.status.is_empty() {
        lines.push(Line::default());
        lines.extend(key_values(&profile.status, ctx, width));
    }
    lines
}

fn heading_line(heading: &str, icon: Option<&str>, ctx: &RenderContext) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(icon) = icon {
        spans.push(Span::styled(format!("{icon} "), Style::default().fg(ctx.theme.accent)));
    }
    spans.push(Span::styled(
        heading.to_string(),
        Style::default()
            .fg(ctx.theme.primary)
            .add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

fn text(paragraphs: &[String], ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
    let style = Style::default().fg(ctx.theme.text);
    let mut lines = Vec::new();
    for (index, paragraph) in paragraphs.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.extend(
            wrap_text(paragraph, width)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, style))),
        );
    }
    lines
}

fn chip(label: String, fill: Color) -> Vec<Span<'static>> {
    vec![Span::styled(
        format!(" {label} "),
        Style::default().fg(Color::White).bg(fill),
    )]
}

fn badge_lines(badges: &[Badge], width: usize) -> Vec<Line<'static>> {
    let groups = badges
        .iter()
        .map(|badge| {
            let label = match &badge.icon {
                Some(icon) => format!("{icon} {}", badge.name),
                None => badge.name.clone(),
            };
            chip(label, badge_fill(badge.color))
        })
        .collect();
    flow(groups, width, INDENT, 1)
}

fn bullets(
    title: &str,
    subtitle: Option<&str>,
    period: Option<&str>,
    items: &[String],
    ctx: &RenderContext,
    width: usize,
) -> Vec<Line<'static>> {
    let theme = ctx.theme;
    let mut head = vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(period) = period {
        let gap = width
            .saturating_sub(display_width(title) + display_width(period))
            .max(2);
        head.push(Span::raw(" ".repeat(gap)));
        head.push(Span::styled(period.to_string(), Style::default().fg(theme.text_muted)));
    }
    let mut lines = vec![Line::from(head)];
    if let Some(subtitle) = subtitle {
        lines.push(Line::from(Span::styled(
            subtitle.to_string(),
            Style::default().fg(theme.accent),
        )));
    }
    let hang = INDENT + 2;
    for item in items {
        for (index, row) in wrap_text(item, width.saturating_sub(hang)).into_iter().enumerate() {
            let marker = if index == 0 { "▸ " } else { "  " };
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(INDENT)),
                Span::styled(marker, Style::default().fg(theme.success)),
                Span::styled(row, Style::default().fg(theme.text)),
            ]));
        }
    }
    lines
}

fn project_card(project: &Project, ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
    let theme = ctx.theme;
    let mut lines = vec![Line::from(vec![
        Span::styled("▣ ", Style::default().fg(theme.accent)),
        Span::styled(
            project.title.clone(),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.extend(
        wrap_text(&project.description, width.saturating_sub(INDENT))
            .into_iter()
            .map(|row| {
                Line::from(vec![
                    Span::raw(" ".repeat(INDENT)),
                    Span::styled(row, Style::default().fg(theme.text)),
                ])
            }),
    );
    let tech = project
        .technologies
        .iter()
        .map(|name| {
            vec![Span::styled(
                format!("[{name}]"),
                Style::default().fg(theme.text_muted),
            )]
        })
        .collect();
    lines.extend(flow(tech, width, INDENT, 1));
    let mut links = Vec::new();
    if let Some(url) = &project.code_url {
        links.push(("code", url));
    }
    if let Some(url) = &project.live_url {
        links.push(("live", url));
    }
    for (label, url) in links {
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(INDENT)),
            Span::styled(format!("{label}: "), Style::default().fg(theme.text_muted)),
            Span::styled(
                truncate(url, width.saturating_sub(INDENT + label.len() + 2)),
                Style::default()
                    .fg(theme.running)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }
    lines
}

fn link_line(link: &Link, ctx: &RenderContext, width: usize) -> Line<'static> {
    let theme = ctx.theme;
    let mut spans = vec![
        Span::raw(" ".repeat(INDENT)),
        Span::styled("→ ", Style::default().fg(badge_text(link.color))),
        Span::styled(
            link.label.clone(),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    let mut used = INDENT + 2 + display_width(&link.label);
    if let Some(detail) = &link.detail {
        let detail = format!("  {detail}");
        used += display_width(&detail);
        spans.push(Span::styled(detail, Style::default().fg(theme.text_muted)));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        truncate(&link.url, width.saturating_sub(used + 2)),
        Style::default()
            .fg(theme.running)
            .add_modifier(Modifier::UNDERLINED),
    ));
    Line::from(spans)
}

fn key_values(rows: &[KeyValue], ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
    let theme = ctx.theme;
    let label_width = rows
        .iter()
        .map(|row| display_width(&row.label) + 1)
        .max()
        .unwrap_or(0)
        .min(width / 2);
    rows.iter()
        .map(|row| {
            let value = if row.is_today() {
                ctx.today.clone()
            } else {
                row.value.clone()
            };
            let color = row.color.map(badge_text).unwrap_or(theme.text);
            Line::from(vec![
                Span::raw(" ".repeat(INDENT)),
                Span::styled(
                    pad_to(&format!("{}:", row.label), label_width),
                    Style::default().fg(theme.text_muted),
                ),
                Span::raw(" "),
                Span::styled(value, Style::default().fg(color)),
            ])
        })
        .collect()
}
