//! Host-facing game session
//!
//! Owns the run state and turns host frames into clamped simulation ticks.
//! Everything the host knows about its environment arrives once, as a
//! [`HostContext`], when the session is created.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Action, GameEvent, HazardStatus, RunState, SoundCue, apply, diff, sound_cues};
use crate::submission::ScoreSubmission;

/// Screen insets reserved by the host app (pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeAreaInsets {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Result of the host handshake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostContext {
    /// Account id of the signed-in player, if any
    pub fid: Option<u64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub safe_area: SafeAreaInsets,
}

impl HostContext {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Name shown on the game-over screen
    pub fn player_label(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if let Some(name) = self.username.as_deref().filter(|n| !n.is_empty()) {
            return format!("@{}", name);
        }
        match self.fid {
            Some(fid) => format!("#{}", fid),
            None => "Guest".to_string(),
        }
    }
}

/// A running game bound to one host
pub struct Session {
    host: HostContext,
    settings: Settings,
    state: RunState,
    last_frame_ms: Option<f64>,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    frames_seen: usize,
    fps: f32,
    /// Score of the current run already handed to the wallet layer
    submitted: bool,
}

impl Session {
    pub fn new(host: HostContext, settings: Settings, seed: u64) -> Self {
        let mut state = RunState::new(seed);
        state.particle_cap = settings.max_particles();
        state.muted = settings.start_muted;

        log::info!("Session for {} (seed {})", host.player_label(), seed);
        Self {
            host,
            settings,
            state,
            last_frame_ms: None,
            frame_times: [0.0; 60],
            frame_index: 0,
            frames_seen: 0,
            fps: 0.0,
            submitted: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Measured frames per second (0 until a full sample window)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Start a new run on a fresh seed. Preferences carry over.
    pub fn new_run(&mut self, seed: u64) -> Vec<GameEvent> {
        let mut state = RunState::new(seed);
        state.particle_cap = self.state.particle_cap;
        state.muted = self.state.muted;
        state.timestamp = self.state.timestamp;
        self.state = state;
        self.dispatch(Action::Start)
    }

    /// Apply one host action and report what changed
    pub fn dispatch(&mut self, action: Action) -> Vec<GameEvent> {
        let prev = self.state.clone();
        apply(&mut self.state, &action);
        let events = diff(&prev, &self.state);
        self.observe(&events);
        events
    }

    /// Advance to host time `now_ms` (one animation frame).
    ///
    /// Long frames are split into ticks of at most `MAX_TICK_MS`; anything
    /// beyond `MAX_SUBSTEPS` ticks is dropped.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if !now_ms.is_finite() {
            return Vec::new();
        }
        let delta = match self.last_frame_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        self.track_fps(now_ms);

        if !self.state.is_running() {
            return Vec::new();
        }

        let prev = self.state.clone();
        let max_step = MAX_TICK_MS as f64;
        let mut remaining = delta;
        let mut timestamp = now_ms - delta;
        let mut substeps = 0;
        while remaining > 0.0 && substeps < MAX_SUBSTEPS {
            let step = remaining.min(max_step);
            timestamp += step;
            apply(
                &mut self.state,
                &Action::Tick {
                    delta_ms: step,
                    timestamp,
                },
            );
            remaining -= step;
            substeps += 1;
        }
        if remaining > 0.0 {
            log::debug!("Dropped {:.0} ms of a stalled frame", remaining);
        }

        let events = diff(&prev, &self.state);
        self.observe(&events);
        events
    }

    /// Sounds for a batch of events (nothing while muted)
    pub fn cues(&self, events: &[GameEvent]) -> Vec<SoundCue> {
        sound_cues(events, self.state.muted)
    }

    /// Buffered hazards with their current lethal/warning flags
    pub fn hazards(&self) -> Vec<HazardStatus> {
        self.state.floors.hazard_statuses(self.state.elapsed_secs())
    }

    /// Shake to render, honoring the player's motion preferences
    pub fn screen_shake(&self) -> f32 {
        if self.settings.effective_screen_shake() {
            self.state.screen_shake
        } else {
            0.0
        }
    }

    /// Feed a frame rate measured by the host
    pub fn report_fps(&mut self, fps: f32) {
        if self.settings.degrade_for_fps(fps) {
            self.dispatch(Action::SetParticleCap {
                cap: self.settings.max_particles(),
            });
        }
    }

    /// Replace the preferences and push the new particle budget
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.dispatch(Action::SetParticleCap {
            cap: self.settings.max_particles(),
        });
    }

    /// Result of the finished run; available while game over
    pub fn score_submission(&self) -> Option<ScoreSubmission> {
        ScoreSubmission::from_state(&self.state).filter(ScoreSubmission::is_worth_submitting)
    }

    /// Hand the result to the wallet layer. Returns `Some` once per run.
    pub fn take_submission(&mut self) -> Option<ScoreSubmission> {
        if self.submitted {
            return None;
        }
        let submission = self.score_submission()?;
        self.submitted = true;
        log::info!("Submitting score {} (floor {})", submission.score, submission.max_floor);
        Some(submission)
    }

    fn observe(&mut self, events: &[GameEvent]) {
        if events.iter().any(|e| matches!(e, GameEvent::RunStarted { .. })) {
            self.submitted = false;
        }
    }

    fn track_fps(&mut self, now_ms: f64) {
        let len = self.frame_times.len();
        let oldest = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % len;
        self.frames_seen = self.frames_seen.saturating_add(1);

        if self.frames_seen > len {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (len as f64 * 1000.0 / elapsed) as f32;
                self.report_fps(self.fps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::RunStatus;

    fn session(seed: u64) -> Session {
        Session::new(HostContext::default(), Settings::default(), seed)
    }

    #[test]
    fn test_host_context_json() {
        let host = HostContext::from_json(
            r#"{"fid":42,"username":"climber","safeArea":{"top":24,"bottom":10}}"#,
        )
        .expect("valid json");
        assert_eq!(host.fid, Some(42));
        assert_eq!(host.safe_area.top, 24.0);
        assert_eq!(host.safe_area.left, 0.0);
        assert_eq!(host.player_label(), "@climber");

        assert_eq!(HostContext::default().player_label(), "Guest");
        assert!(HostContext::from_json("{fid").is_err());
    }

    #[test]
    fn test_settings_seed_the_state() {
        let settings = Settings {
            start_muted: true,
            ..Settings::from_preset(QualityPreset::Low)
        };
        let session = Session::new(HostContext::default(), settings, 3);
        assert!(session.state().muted);
        assert_eq!(session.state().particle_cap, 40);
        assert_eq!(session.state().status, RunStatus::Title);
    }

    #[test]
    fn test_frames_before_start_do_nothing() {
        let mut session = session(1);
        assert!(session.frame(0.0).is_empty());
        assert!(session.frame(16.0).is_empty());
        assert_eq!(session.state().time_ticks, 0);
    }

    #[test]
    fn test_long_frame_is_substepped() {
        let mut session = session(1);
        session.dispatch(Action::Start);
        session.frame(1000.0);
        session.frame(1120.0);
        // 120 ms -> 50 + 50 + 20
        assert_eq!(session.state().time_ticks, 3);
        assert_eq!(session.state().elapsed_ms, 120.0);
        assert_eq!(session.state().timestamp, 1120.0);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut session = session(1);
        session.dispatch(Action::Start);
        session.frame(0.0);
        session.frame(60_000.0);
        assert_eq!(session.state().time_ticks, MAX_SUBSTEPS as u64);
        assert_eq!(session.state().elapsed_ms, MAX_SUBSTEPS as f64 * MAX_TICK_MS as f64);

        // Clock is not rewound by a bogus timestamp
        session.frame(f64::NAN);
        session.frame(59_000.0);
        assert_eq!(session.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_pause_does_not_bank_time() {
        let mut session = session(1);
        session.dispatch(Action::Start);
        session.frame(0.0);
        assert_eq!(session.dispatch(Action::Pause), vec![GameEvent::Paused]);
        session.frame(5000.0);
        session.dispatch(Action::Resume);
        session.frame(5016.0);
        assert_eq!(session.state().elapsed_ms, 16.0);
    }

    #[test]
    fn test_new_run_keeps_preferences() {
        let mut session = session(1);
        session.dispatch(Action::ToggleMute);
        session.dispatch(Action::SetParticleCap { cap: 7 });
        let events = session.new_run(99);
        assert_eq!(events, vec![GameEvent::RunStarted { seed: 99 }]);
        assert!(session.state().muted);
        assert_eq!(session.state().particle_cap, 7);
        assert!(session.cues(&events).is_empty());
    }

    #[test]
    fn test_low_fps_lowers_particle_budget() {
        let mut session = session(1);
        session.dispatch(Action::Start);
        // 20 FPS
        for i in 0..=61 {
            session.frame(i as f64 * 50.0);
        }
        assert!(session.fps() < PARTICLE_REDUCE_THRESHOLD_FPS);
        assert_eq!(session.settings().quality, QualityPreset::Low);
        assert_eq!(session.state().particle_cap, QualityPreset::Low.max_particles());
    }

    #[test]
    fn test_reduced_motion_hides_shake() {
        let mut session = session(1);
        session.state.screen_shake = 3.0;
        assert_eq!(session.screen_shake(), 3.0);
        session.apply_settings(Settings {
            reduced_motion: true,
            ..Settings::default()
        });
        assert_eq!(session.screen_shake(), 0.0);
    }

    #[test]
    fn test_submission_fires_once_per_run() {
        let mut session = session(1);
        session.dispatch(Action::Start);
        assert!(session.take_submission().is_none());

        session.state.score = 1200;
        session.state.max_floor_reached = 12;
        session.state.player.hp = 0;
        session.frame(0.0);
        let events = session.frame(16.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        let submission = session.take_submission().expect("finished run");
        assert_eq!(submission, ScoreSubmission::new(1200, 12, 0));
        assert!(session.take_submission().is_none());

        session.new_run(2);
        assert!(session.take_submission().is_none());
    }
}
