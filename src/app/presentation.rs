use bevy::prelude::*;

use crate::gameplay::goal::GoalSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Win,
    Lose,
    /// Won the last level of the world.
    GameComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultIcon {
    GoalComplete,
    GoalFailed,
}

/// Everything the end-of-level screen needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultScreen {
    pub kind: ResultKind,
    pub caption: String,
    pub icon: ResultIcon,
}

/// Receives what the session wants shown. Purely reactive: the only way back into
/// the session is `begin_game` / `reload_scene`.
pub trait PresentationSink {
    fn show_intro(&mut self, summary: &GoalSummary);
    fn show_result(&mut self, screen: &ResultScreen);
    /// Screen fader on (covers the board).
    fn fade_on(&mut self);
    /// Screen fader off (reveals the board).
    fn fade_off(&mut self);
    fn fade_timer_off(&mut self);
    fn update_moves(&mut self, moves_left: u32);
    fn update_timer(&mut self, seconds_left: u32);
    fn update_score_meter(&mut self, score: u32, stars: u32);
}

/// One recorded presentation call.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCue {
    Intro(GoalSummary),
    Result(ResultScreen),
    FadeOn,
    FadeOff,
    TimerFadeOff,
    MovesLeft(u32),
    TimeLeft(u32),
    ScoreMeter { score: u32, stars: u32 },
}

/// Sink that records cues for a UI layer (or a test) to inspect.
#[derive(Debug, Default, Clone)]
pub struct CueQueue {
    cues: Vec<PresentationCue>,
}

impl CueQueue {
    pub fn cues(&self) -> &[PresentationCue] {
        &self.cues
    }

    pub fn last_result(&self) -> Option<&ResultScreen> {
        self.cues.iter().rev().find_map(|c| match c {
            PresentationCue::Result(r) => Some(r),
            _ => None,
        })
    }
}

impl PresentationSink for CueQueue {
    fn show_intro(&mut self, summary: &GoalSummary) {
        self.cues.push(PresentationCue::Intro(summary.clone()));
    }
    fn show_result(&mut self, screen: &ResultScreen) {
        self.cues.push(PresentationCue::Result(screen.clone()));
    }
    fn fade_on(&mut self) {
        self.cues.push(PresentationCue::FadeOn);
    }
    fn fade_off(&mut self) {
        self.cues.push(PresentationCue::FadeOff);
    }
    fn fade_timer_off(&mut self) {
        self.cues.push(PresentationCue::TimerFadeOff);
    }
    fn update_moves(&mut self, moves_left: u32) {
        self.cues.push(PresentationCue::MovesLeft(moves_left));
    }
    fn update_timer(&mut self, seconds_left: u32) {
        self.cues.push(PresentationCue::TimeLeft(seconds_left));
    }
    fn update_score_meter(&mut self, score: u32, stars: u32) {
        self.cues.push(PresentationCue::ScoreMeter { score, stars });
    }
}

/// Sink for headless runs: every cue becomes a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresentation;

impl PresentationSink for LogPresentation {
    fn show_intro(&mut self, summary: &GoalSummary) {
        info!(
            target: "presentation",
            "=== {} === {}",
            summary.level_name,
            summary.to_string().replace('\n', " ")
        );
    }
    fn show_result(&mut self, screen: &ResultScreen) {
        info!(
            target: "presentation",
            "{:?} [{:?}] {}",
            screen.kind,
            screen.icon,
            screen.caption.replace('\n', " ")
        );
    }
    fn fade_on(&mut self) {
        debug!(target: "presentation", "fader on");
    }
    fn fade_off(&mut self) {
        debug!(target: "presentation", "fader off");
    }
    fn fade_timer_off(&mut self) {
        debug!(target: "presentation", "timer hidden");
    }
    fn update_moves(&mut self, moves_left: u32) {
        debug!(target: "presentation", "moves left: {moves_left}");
    }
    fn update_timer(&mut self, seconds_left: u32) {
        debug!(target: "presentation", "time left: {seconds_left}s");
    }
    fn update_score_meter(&mut self, score: u32, stars: u32) {
        debug!(target: "presentation", "score {score} ({stars} stars)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_records_in_order() {
        let mut q = CueQueue::default();
        assert!(q.cues().is_empty());
        q.fade_off();
        q.update_moves(3);
        assert_eq!(q.cues(), [PresentationCue::FadeOff, PresentationCue::MovesLeft(3)]);
    }

    #[test]
    fn last_result_finds_most_recent_screen() {
        let mut q = CueQueue::default();
        assert!(q.last_result().is_none());
        q.show_result(&ResultScreen {
            kind: ResultKind::Lose,
            caption: "Out of moves!".into(),
            icon: ResultIcon::GoalFailed,
        });
        q.fade_on();
        assert_eq!(q.last_result().map(|r| r.kind), Some(ResultKind::Lose));
    }
}
