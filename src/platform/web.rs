//! Browser bindings
//!
//! The JS shell owns the canvas, audio and wallet. It forwards input and
//! animation frames here and reads back JSON: snapshots for rendering, event
//! reports for audio and the score for submission.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::session::{HostContext, Session};
use crate::settings::Settings;
use crate::sim::{Action, GameEvent, SoundCue};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Gimmick Tower loaded");
}

/// What one frame or action produced
#[derive(Serialize)]
struct Report {
    events: Vec<GameEvent>,
    cues: Vec<SoundCue>,
    shake: f32,
}

fn to_js(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn fresh_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Session handle exported to JS
#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// `host_json` is the host handshake result (may be `"{}"` outside a host app)
    #[wasm_bindgen(constructor)]
    pub fn new(host_json: &str) -> Result<WebSession, JsValue> {
        let host = HostContext::from_json(host_json).map_err(to_js)?;
        let settings = Settings::load();
        Ok(Self {
            inner: Session::new(host, settings, fresh_seed()),
        })
    }

    /// Start (or restart) a run on a new seed
    pub fn start(&mut self) -> Result<String, JsValue> {
        let events = self.inner.new_run(fresh_seed());
        self.report(events)
    }

    pub fn jump(&mut self) -> Result<String, JsValue> {
        let events = self.inner.dispatch(Action::Jump);
        self.report(events)
    }

    pub fn pause(&mut self) -> Result<String, JsValue> {
        let events = self.inner.dispatch(Action::Pause);
        self.report(events)
    }

    pub fn resume(&mut self) -> Result<String, JsValue> {
        let events = self.inner.dispatch(Action::Resume);
        self.report(events)
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.inner.dispatch(Action::ToggleMute);
        self.inner.state().muted
    }

    pub fn set_particle_cap(&mut self, cap: u32) {
        self.inner.dispatch(Action::SetParticleCap { cap: cap as usize });
    }

    /// Advance to `now` (ms, from `requestAnimationFrame`)
    pub fn frame(&mut self, now: f64) -> Result<String, JsValue> {
        let events = self.inner.frame(now);
        self.report(events)
    }

    /// Full run state for the renderer
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.state()).map_err(to_js)
    }

    /// Per-floor hazard cycle, lethal and warning flags for the renderer
    pub fn hazards_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.hazards()).map_err(to_js)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.inner.settings().to_json().map_err(to_js)
    }

    /// Replace and persist the preferences
    pub fn apply_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(to_js)?;
        settings.save();
        self.inner.apply_settings(settings);
        Ok(())
    }

    /// Score to submit, once per finished run; `undefined` otherwise
    pub fn take_submission_json(&mut self) -> Result<Option<String>, JsValue> {
        match self.inner.take_submission() {
            Some(submission) => submission.to_json().map(Some).map_err(to_js),
            None => Ok(None),
        }
    }

    pub fn player_label(&self) -> String {
        self.inner.host().player_label()
    }
}

impl WebSession {
    fn report(&self, events: Vec<GameEvent>) -> Result<String, JsValue> {
        let report = Report {
            cues: self.inner.cues(&events),
            events,
            shake: self.inner.screen_shake(),
        };
        serde_json::to_string(&report).map_err(to_js)
    }
}
