use std::time::Duration;

use crate::app::App;
use crate::clock::Clock;
use crate::config::{NavMode, TimingConfig, ViewportConfig};
use crate::ui;
use crate::views::{build_page, RenderContext, CONSOLE_TITLE};
use pipefolio_core::{Portfolio, StageId};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use time::macros::datetime;

const PORTFOLIO: &str = r#"
title = "Test Pipeline"

[profile]
name = "Ada Lovelace"
headline = "Analytical Engineer"
summary = ["Writes programs for engines that do not exist yet."]

[[stages]]
title = "Init"
description = "Initialize Profile"
icon = "⚙"
logs = ["Starting pipeline", "Profile loaded"]

[stages.prompt]
command = "cat profile.yml"
response = "OK"

[[stages]]
title = "Build"
description = "Compile Experience"
icon = "🔨"
logs = ["Compiling"]

[[stages.blocks]]
kind = "progress"
heading = "Coverage"
items = [{ label = "Rust", percent = 50, color = "orange" }]

[[stages]]
title = "Monitor"
description = "Monitoring Dashboard"
icon = "📊"
logs = ["Watching"]

[[stages.blocks]]
kind = "key_values"
heading = "Status"
rows = [{ label = "Last Deploy", value = "@today" }]
"#;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn make_app(boot_ms: u64) -> App {
    let portfolio = Portfolio::from_toml_str(PORTFOLIO, None).expect("fixture parses");
    let timing = TimingConfig {
        boot_ms,
        scroll_ms: 0,
        ..TimingConfig::default()
    };
    let mut app = App::new(portfolio, &timing, &ViewportConfig::default());
    app.clock = Clock::fixed(datetime!(2024-03-09 07:05:03 UTC));
    app.build_number = 42;
    app
}

fn render_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| ui::draw(frame, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn buffer_text(buf: &Buffer) -> Vec<String> {
    let mut lines = Vec::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        for x in 0..buf.area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines
}

fn page_text(app: &App, width: u16, min_height: usize) -> Vec<String> {
    let ctx = RenderContext::from_app(app);
    build_page(app, &ctx, width, min_height)
        .lines
        .iter()
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn test_sections_fill_the_view_and_stack() {
    let app = make_app(0);
    let ctx = RenderContext::from_app(&app);
    let page = build_page(&app, &ctx, 80, 30);
    assert_eq!(page.sections.len(), 3);
    let mut next = 0;
    for section in &page.sections {
        assert_eq!(section.start, next);
        assert!(section.height >= 30);
        next = section.end();
    }
    assert_eq!(page.lines.len(), next);
}

#[test]
fn test_console_height_is_fixed_while_revealing() {
    let mut app = make_app(0);
    let ctx = RenderContext::from_app(&app);
    let before = build_page(&app, &ctx, 80, 0).sections;
    drop(ctx);
    app.tick(ms(1600));
    let ctx = RenderContext::from_app(&app);
    let after = build_page(&app, &ctx, 80, 0).sections;
    assert_eq!(before, after);
}

#[test]
fn test_console_shows_revealed_lines_with_timestamps() {
    let mut app = make_app(0);
    let text = page_text(&app, 80, 0).join("\n");
    assert!(text.contains(CONSOLE_TITLE));
    assert!(!text.contains("Starting pipeline"));

    app.tick(ms(800));
    let text = page_text(&app, 80, 0).join("\n");
    assert!(text.contains("[07:05:03] Starting pipeline"));
    assert!(!text.contains("Profile loaded"));
}

#[test]
fn test_profile_and_blocks_render() {
    let app = make_app(0);
    let text = page_text(&app, 80, 0).join("\n");
    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("Analytical Engineer"));
    assert!(text.contains("Compile Experience"));
    assert!(text.contains("██████████░░░░░░░░░░  50%"));
    assert!(text.contains("Last Deploy: 2024-03-09"));
    assert!(!text.contains("@today"));
}

#[test]
fn test_section_status_tags_follow_tracker() {
    let mut app = make_app(0);
    let text = page_text(&app, 80, 0).join("\n");
    assert!(text.contains("RUNNING"));
    assert!(!text.contains("SUCCESS"));

    app.navigate_to(StageId::new(1));
    let text = page_text(&app, 80, 0).join("\n");
    assert_eq!(text.matches("SUCCESS").count(), 2);
    assert!(text.contains("PENDING"));
}

#[test]
fn test_boot_splash() {
    let mut app = make_app(1000);
    let text = buffer_text(&render_buffer(&mut app, 80, 24)).join("\n");
    assert!(text.contains("Initializing pipeline"));
    assert!(text.contains("Test Pipeline"));
    assert!(!text.contains("Build #42"));
}

#[test]
fn test_desktop_header_with_chips() {
    let mut app = make_app(0);
    let lines = buffer_text(&render_buffer(&mut app, 140, 40));
    assert!(lines[0].contains("Test Pipeline"));
    assert!(lines[0].contains("Build #42"));
    assert!(lines[1].contains("Stage 1: ▶ Init"));
    assert!(lines[1].contains("Stage 3: ◷ Monitor"));
    assert_eq!(app.nav_hits.len(), 3);
    let text = lines.join("\n");
    assert!(text.contains("Pipeline"));
    assert!(text.contains("Stage 1/3"));
}

#[test]
fn test_clicking_a_rendered_chip_navigates() {
    let mut app = make_app(0);
    render_buffer(&mut app, 140, 40);
    let hit = app.nav_hits[2];
    assert!(app.click(hit.x + 1, hit.y));
    assert_eq!(app.active_stage(), StageId::new(2));
}

#[test]
fn test_narrow_terminal_uses_bottom_nav() {
    let mut app = make_app(0);
    let lines = buffer_text(&render_buffer(&mut app, 60, 30));
    assert!(!lines[1].contains("Stage 1:"));
    let bottom_nav = &lines[lines.len() - 2];
    assert!(bottom_nav.contains("Init"));
    assert_eq!(app.nav_hits.len(), 3);
}

#[test]
fn test_forced_mobile_nav() {
    let mut app = make_app(0);
    app.nav_mode = NavMode::Mobile;
    let lines = buffer_text(&render_buffer(&mut app, 140, 40));
    assert!(!lines[1].contains("Stage 1:"));
}

#[test]
fn test_zen_mode_hides_chrome() {
    let mut app = make_app(0);
    app.zen_mode = true;
    let text = buffer_text(&render_buffer(&mut app, 100, 30)).join("\n");
    assert!(!text.contains("Build #42"));
    assert!(text.contains("1/3"));
    assert!(app.nav_hits.is_empty());
}

#[test]
fn test_prompt_modal_types_response() {
    let mut app = make_app(0);
    app.open_prompt();
    let text = buffer_text(&render_buffer(&mut app, 100, 30)).join("\n");
    assert!(text.contains("Pipeline Stage 1: Init"));
    assert!(text.contains("jenkins@pipeline:~$"));
    assert!(text.contains("cat profile.yml"));
    assert!(text.contains("Output:"));

    app.tick(ms(60));
    let text = buffer_text(&render_buffer(&mut app, 100, 30)).join("\n");
    assert!(text.contains("OK"));
}

#[test]
fn test_render_sets_viewport_layout() {
    let mut app = make_app(0);
    render_buffer(&mut app, 100, 30);
    assert_eq!(app.viewport.sections().len(), 3);
    // Header (3) and status bar (1) take four rows
    assert_eq!(app.viewport.height(), 26);
}

#[test]
fn test_help_popover() {
    let mut app = make_app(0);
    app.toggle_help();
    let text = buffer_text(&render_buffer(&mut app, 100, 30)).join("\n");
    assert!(text.contains("Help"));
    assert!(text.contains("Pipeline prompt"));
}
