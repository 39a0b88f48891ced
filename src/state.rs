use std::collections::VecDeque;

use crate::report::{MatchReport, TeamReport};
use crate::xg::TimelinePoint;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Players,
    Shape,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Overview => Screen::Players,
            Screen::Players => Screen::Shape,
            Screen::Shape => Screen::Overview,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Overview => "Overview",
            Screen::Players => "Players",
            Screen::Shape => "Shape",
        }
    }
}

/// Everything the dashboard renders. Owned by the event loop.
pub struct DashboardState {
    pub reports: Vec<MatchReport>,
    pub selected: usize,
    pub screen: Screen,
    /// Current playback minute in the selected match.
    pub cursor: u16,
    pub playing: bool,
    pub step: u16,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl DashboardState {
    pub fn new(reports: Vec<MatchReport>, step: u16) -> Self {
        Self {
            reports,
            selected: 0,
            screen: Screen::Overview,
            cursor: 0,
            playing: false,
            step: step.max(1),
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn current(&self) -> Option<&MatchReport> {
        self.reports.get(self.selected)
    }

    pub fn final_minute(&self) -> u16 {
        self.current().map(|r| r.final_minute).unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        let total = self.reports.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
        self.reset();
    }

    pub fn select_prev(&mut self) {
        let total = self.reports.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if self.selected == 0 {
            total - 1
        } else {
            self.selected - 1
        };
        self.reset();
    }

    pub fn toggle_play(&mut self) {
        if self.current().is_none() {
            return;
        }
        if !self.playing && self.cursor >= self.final_minute() {
            self.cursor = 0;
        }
        self.playing = !self.playing;
    }

    /// Advances playback by one step. Returns `true` when the cursor moved.
    pub fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        let end = self.final_minute();
        let before = self.cursor;
        self.cursor = self.cursor.saturating_add(self.step).min(end);
        if self.cursor >= end {
            self.playing = false;
            let label = self.current().map(|r| r.label.clone()).unwrap_or_default();
            self.push_log(format!("[INFO] {label}: full time at {end}'"));
        }
        self.cursor != before
    }

    pub fn step_forward(&mut self) {
        self.cursor = self.cursor.saturating_add(self.step).min(self.final_minute());
    }

    pub fn step_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.step);
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.playing = false;
    }

    pub fn cycle_screen(&mut self) {
        self.screen = self.screen.next();
    }

    pub fn timeline_point(&self) -> Option<TimelinePoint> {
        self.current()?.timeline_at(self.cursor)
    }

    /// Timeline up to and including the cursor.
    pub fn visible_timeline(&self) -> &[TimelinePoint] {
        match self.current() {
            Some(r) => {
                let end = (usize::from(self.cursor) + 1).min(r.timeline.len());
                &r.timeline[..end]
            }
            None => &[],
        }
    }

    pub fn teams(&self) -> Option<(&TeamReport, &TeamReport)> {
        self.current().map(|r| (&r.home, &r.away))
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
