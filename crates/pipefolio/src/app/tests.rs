use super::*;
use pipefolio_core::ViewportController;

const PORTFOLIO: &str = r#"
[profile]
name = "Ada"
headline = "Engineer"

[[stages]]
title = "Init"
description = "Initialize Profile"
logs = ["a", "b"]

[stages.prompt]
command = "whoami"
response = "OK"

[[stages]]
title = "Build"
description = "Compile Experience"
logs = ["a", "b"]

[[stages]]
title = "Deploy"
description = "Deploy Contact"
logs = ["a", "b"]
"#;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn make_app(boot_ms: u64) -> App {
    let portfolio = Portfolio::from_toml_str(PORTFOLIO, None).expect("fixture parses");
    let timing = TimingConfig {
        dwell_ms: 600,
        line_interval_ms: 800,
        char_interval_ms: 30,
        boot_ms,
        scroll_ms: 0,
    };
    let mut app = App::new(portfolio, &timing, &ViewportConfig::default());
    app.viewport.set_layout(
        vec![
            SectionSpan::new(0, 20),
            SectionSpan::new(20, 20),
            SectionSpan::new(40, 20),
        ],
        20,
    );
    app
}

fn shown(app: &App, index: usize) -> Vec<String> {
    app.log(StageId::new(index))
        .map(|log| log.displayed().to_vec())
        .unwrap_or_default()
}

#[test]
fn test_boot_phase_holds_dwell_and_logs() {
    let mut app = make_app(1000);
    app.tick(ms(0));
    app.tick(ms(900));
    assert!(app.is_booting());
    assert!(shown(&app, 0).is_empty());
    assert!(!app.log(StageId::new(0)).unwrap().is_running());
    assert!(app.tracker.completed().is_empty());

    app.tick(ms(1000));
    assert_eq!(app.phase, Phase::Ready);
    assert_eq!(app.stage_status(StageId::new(0)), StageStatus::Running);

    app.tick(ms(1599));
    assert!(!app.tracker.is_completed(StageId::new(0)));
    app.tick(ms(1600));
    assert!(app.tracker.is_completed(StageId::new(0)));

    app.tick(ms(1800));
    assert_eq!(shown(&app, 0), vec!["a"]);
    app.tick(ms(2600));
    assert_eq!(shown(&app, 0), vec!["a", "b"]);
}

#[test]
fn test_zero_boot_starts_immediately() {
    let mut app = make_app(0);
    assert_eq!(app.phase, Phase::Ready);
    app.tick(ms(600));
    assert!(app.tracker.is_completed(StageId::new(0)));
    app.tick(ms(800));
    assert_eq!(shown(&app, 0), vec!["a"]);
}

#[test]
fn test_scrolling_moves_active_stage_and_console() {
    let mut app = make_app(0);
    app.tick(ms(0));
    app.tick(ms(800));
    assert_eq!(shown(&app, 0), vec!["a"]);
    assert!(app.tracker.is_completed(StageId::new(0)));

    app.viewport.scroll_by(20);
    app.tick(ms(900));
    assert_eq!(app.active_stage(), StageId::new(1));
    assert!(shown(&app, 0).is_empty(), "hidden console resets");
    assert_eq!(app.stage_status(StageId::new(0)), StageStatus::Success);
    assert_eq!(app.stage_status(StageId::new(1)), StageStatus::Running);
    assert_eq!(app.stage_status(StageId::new(2)), StageStatus::Pending);

    app.tick(ms(1499));
    assert!(!app.tracker.is_completed(StageId::new(1)));
    app.tick(ms(1500));
    assert!(app.tracker.is_completed(StageId::new(1)));
    app.tick(ms(1700));
    assert_eq!(shown(&app, 1), vec!["a"]);
}

#[test]
fn test_scrolling_past_a_stage_does_not_complete_it() {
    let mut app = make_app(0);
    app.tick(ms(0));
    app.viewport.scroll_by(20);
    app.tick(ms(100));
    app.viewport.scroll_by(20);
    app.tick(ms(200));
    assert_eq!(app.active_stage(), StageId::new(2));
    app.tick(ms(2000));
    assert!(!app.tracker.is_completed(StageId::new(0)));
    assert!(!app.tracker.is_completed(StageId::new(1)));
    assert!(app.tracker.is_completed(StageId::new(2)));
}

#[test]
fn test_navigate_completes_prefix_and_scrolls() {
    let mut app = make_app(0);
    app.tick(ms(0));
    app.navigate_to(StageId::new(2));
    assert_eq!(app.viewport.offset(), 40);
    app.tick(ms(16));
    assert_eq!(app.active_stage(), StageId::new(2));
    assert!(app.tracker.state().all_completed());
    assert!(!app.viewport.is_intersecting(StageId::new(0)));
    assert!(app.viewport.is_intersecting(StageId::new(2)));
}

#[test]
fn test_navigation_during_boot_starts_pipeline() {
    let mut app = make_app(1000);
    app.tick(ms(0));
    app.navigate_to(StageId::new(1));
    assert_eq!(app.phase, Phase::Ready);
    assert_eq!(app.active_stage(), StageId::new(1));
    assert!(app.tracker.is_completed(StageId::new(0)));
    assert!(app.tracker.is_completed(StageId::new(1)));
}

#[test]
fn test_next_prev_and_bounds() {
    let mut app = make_app(0);
    app.prev_stage();
    assert_eq!(app.active_stage(), StageId::new(0));
    app.next_stage();
    assert_eq!(app.active_stage(), StageId::new(1));
    app.next_stage();
    app.next_stage();
    assert_eq!(app.active_stage(), StageId::new(2));
    app.prev_stage();
    assert_eq!(app.active_stage(), StageId::new(1));
    app.first_stage();
    assert_eq!(app.active_stage(), StageId::new(0));
    app.last_stage();
    assert_eq!(app.active_stage(), StageId::new(2));
}

#[test]
fn test_jump_to_missing_stage_is_ignored() {
    let mut app = make_app(0);
    app.jump_to_number(9);
    app.jump_to_number(0);
    assert_eq!(app.active_stage(), StageId::new(0));
    assert!(app.tracker.completed().is_empty());
    app.jump_to_number(2);
    assert_eq!(app.active_stage(), StageId::new(1));
}

#[test]
fn test_prompt_types_response() {
    let mut app = make_app(0);
    app.tick(ms(0));
    app.open_prompt();
    let (stage, typer) = app.prompt().expect("prompt open");
    assert_eq!(stage, StageId::new(0));
    assert_eq!(typer.displayed(), "");
    assert!(typer.is_typing());

    app.tick(ms(30));
    assert_eq!(app.prompt().unwrap().1.displayed(), "O");
    app.tick(ms(60));
    let typer = app.prompt().unwrap().1;
    assert_eq!(typer.displayed(), "OK");
    assert!(!typer.is_typing());

    app.close_prompt();
    assert!(app.prompt().is_none());
    app.open_prompt();
    assert_eq!(app.prompt().unwrap().1.displayed(), "");
}

#[test]
fn test_prompt_needs_content() {
    let mut app = make_app(0);
    app.next_stage();
    app.open_prompt();
    assert!(app.prompt().is_none());
}

#[test]
fn test_escape_closes_popups_before_quitting() {
    let mut app = make_app(0);
    app.open_prompt();
    app.show_help = true;
    app.escape();
    assert!(app.prompt().is_none());
    assert!(app.show_help);
    app.escape();
    assert!(!app.show_help);
    assert!(!app.should_quit);
    app.escape();
    assert!(app.should_quit);
}

#[test]
fn test_click_on_nav_chip() {
    let mut app = make_app(0);
    app.nav_hits = vec![NavHit {
        x: 10,
        y: 0,
        width: 8,
        height: 1,
        stage: StageId::new(2),
    }];
    assert!(!app.click(0, 5));
    assert!(app.click(12, 0));
    assert_eq!(app.active_stage(), StageId::new(2));
}

#[test]
fn test_shutdown_cancels_every_timer() {
    let mut app = make_app(1000);
    app.tick(ms(0));
    assert!(app.pending_timers() > 0);
    app.shutdown();
    assert_eq!(app.pending_timers(), 0);

    let mut app = make_app(0);
    app.tick(ms(0));
    app.open_prompt();
    assert!(app.pending_timers() >= 3);
    app.shutdown();
    assert_eq!(app.pending_timers(), 0);
}

#[test]
fn test_scroll_before_layout_uses_controller() {
    let portfolio = Portfolio::from_toml_str(PORTFOLIO, None).unwrap();
    let mut app = App::new(portfolio, &TimingConfig::default(), &ViewportConfig::default());
    app.viewport.scroll_into_view(StageId::new(1));
    assert_eq!(app.viewport.offset(), 0);
}

#[test]
fn test_time_until_next_timer() {
    let mut app = make_app(0);
    app.tick(ms(0));
    assert_eq!(app.time_until_next_timer(ms(100)), Some(ms(500)));
}
