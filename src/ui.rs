//! Menu hooks and game-over text
//!
//! The session calls a [`SessionUi`] at lifecycle edges. The browser build
//! toggles DOM menus; headless runs log.

use std::fmt;

use crate::sim::Statistics;

/// Lifecycle callbacks for whatever shows the menus
pub trait SessionUi {
    /// Start menu dismissed, first world running
    fn on_start(&mut self);
    /// Old world torn down, replacement running
    fn on_restart(&mut self);
    /// Lives ran out (once per world)
    fn on_game_over(&mut self, frame: u64, statistics: &Statistics);
}

/// "1 chaser" / "3 chasers"
pub fn count_noun(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Text shown on the game-over menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    /// Frames survived, used as the score
    pub score: u64,
    pub statistics: Statistics,
}

impl GameOverSummary {
    pub fn new(frame: u64, statistics: &Statistics) -> Self {
        Self {
            score: frame,
            statistics: *statistics,
        }
    }

    pub fn chasers(&self) -> String {
        count_noun(self.statistics.chasers_killed, "chaser")
    }

    pub fn minders(&self) -> String {
        count_noun(self.statistics.minders_killed, "minder")
    }
}

impl fmt::Display for GameOverSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score {}: took out {} and {}",
            self.score,
            self.chasers(),
            self.minders()
        )
    }
}

/// UI that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogUi;

impl SessionUi for LogUi {
    fn on_start(&mut self) {
        log::info!("Session started");
    }

    fn on_restart(&mut self) {
        log::info!("Session restarted");
    }

    fn on_game_over(&mut self, frame: u64, statistics: &Statistics) {
        log::info!("{}", GameOverSummary::new(frame, statistics));
    }
}

/// Lifecycle calls as they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCall {
    Start,
    Restart,
    GameOver(GameOverSummary),
}

/// UI that records every call
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub calls: Vec<UiCall>,
}

impl RecordingUi {
    pub fn game_overs(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, UiCall::GameOver(_)))
            .count()
    }
}

impl SessionUi for RecordingUi {
    fn on_start(&mut self) {
        self.calls.push(UiCall::Start);
    }

    fn on_restart(&mut self) {
        self.calls.push(UiCall::Restart);
    }

    fn on_game_over(&mut self, frame: u64, statistics: &Statistics) {
        self.calls
            .push(UiCall::GameOver(GameOverSummary::new(frame, statistics)));
    }
}
