use super::{App, Phase};
use pipefolio_core::StageId;

impl App {
    /// Jump to a stage the way the header navigation does
    pub fn navigate_to(&mut self, id: StageId) {
        if id.index() >= self.stage_count() {
            tracing::debug!(stage = id.index(), "ignoring jump past the last stage");
            return;
        }
        if self.phase == Phase::Booting {
            self.finish_boot();
        }
        self.tracker
            .navigate_to(id, &mut self.timers, &mut self.viewport);
    }

    pub fn next_stage(&mut self) {
        let next = self.active_stage().index() + 1;
        if next < self.stage_count() {
            self.navigate_to(StageId::new(next));
        }
    }

    pub fn prev_stage(&mut self) {
        if let Some(prev) = self.active_stage().index().checked_sub(1) {
            self.navigate_to(StageId::new(prev));
        }
    }

    pub fn first_stage(&mut self) {
        self.navigate_to(StageId::new(0));
    }

    pub fn last_stage(&mut self) {
        self.navigate_to(StageId::new(self.stage_count() - 1));
    }

    /// `1`..`9`: jump to that stage number, if it exists
    pub fn jump_to_number(&mut self, number: usize) {
        if let Some(index) = number.checked_sub(1) {
            self.navigate_to(StageId::new(index));
        }
    }

    pub fn scroll_down(&mut self) {
        self.viewport.scroll_by(1);
    }

    pub fn scroll_up(&mut self) {
        self.viewport.scroll_by(-1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half = (self.viewport.height() / 2).max(1);
        self.viewport.scroll_by(half as isize);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half = (self.viewport.height() / 2).max(1);
        self.viewport.scroll_by(-(half as isize));
    }

    /// Open the prompt popup for the active stage
    pub fn open_prompt(&mut self) {
        let id = self.active_stage();
        let Some(response) = self
            .stage(id)
            .and_then(|stage| stage.prompt.as_ref())
            .map(|prompt| prompt.response.clone())
        else {
            tracing::debug!(stage = id.index(), "stage has no prompt");
            return;
        };
        self.prompt_typer.set_visible(false, &mut self.timers);
        self.prompt_typer.set_text(response, &mut self.timers);
        self.prompt_typer.set_visible(true, &mut self.timers);
        self.prompt_stage = Some(id);
        tracing::debug!(stage = id.index(), "prompt opened");
    }

    pub fn close_prompt(&mut self) {
        if self.prompt_stage.take().is_some() {
            self.prompt_typer.set_visible(false, &mut self.timers);
        }
    }

    pub fn toggle_prompt(&mut self) {
        if self.prompt_stage.is_some() {
            self.close_prompt();
        } else {
            self.open_prompt();
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_zen(&mut self) {
        self.zen_mode = !self.zen_mode;
    }

    /// `q`/`Esc`: close the topmost popup, or quit
    pub fn escape(&mut self) {
        if self.prompt_stage.is_some() {
            self.close_prompt();
        } else if self.show_help {
            self.show_help = false;
        } else {
            self.should_quit = true;
        }
    }

    /// Mouse click: header chips jump to their stage
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        let Some(stage) = self
            .nav_hits
            .iter()
            .find(|hit| hit.contains(column, row))
            .map(|hit| hit.stage)
        else {
            return false;
        };
        self.navigate_to(stage);
        true
    }
}
