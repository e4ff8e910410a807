//! Gimmick Tower entry point
//!
//! On the web the library's `platform::web` module is the entry point. The
//! native binary is a headless runner: it lets the autoplay bot climb seeded
//! towers and prints one JSON line per run plus a summary.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use clap::Parser;
    use serde::Serialize;

    use gimmick_tower::sim::autoplay::should_jump;
    use gimmick_tower::sim::{Action, GameEvent, RunStatus};
    use gimmick_tower::{HostContext, QualityPreset, Session, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Headless autoplay runs of Gimmick Tower")]
    struct Cli {
        /// Seed of the first run; run `i` uses `seed + i`
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Simulated time limit per run
        #[arg(long, default_value_t = 300.0)]
        max_seconds: f64,
        /// Low, Medium or High
        #[arg(long)]
        quality: Option<String>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct RunLine {
        seed: u64,
        finished: bool,
        duration_ms: f64,
        score: u64,
        max_floor: u32,
        max_combo: u32,
        chapter: u32,
        hits: u32,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Summary {
        runs: usize,
        finished: usize,
        best_score: u64,
        best_floor: u32,
        average_floor: f64,
    }

    fn play(session: &mut Session, seed: u64, max_seconds: f64) -> RunLine {
        let mut hits = 0;
        let mut now = 0.0;
        session.new_run(seed);
        session.frame(now);

        while session.state().status == RunStatus::Running && now < max_seconds * 1000.0 {
            if should_jump(session.state()) {
                session.dispatch(Action::Jump);
            }
            now += FRAME_MS;
            for event in session.frame(now) {
                if let GameEvent::HazardHit { .. } = event {
                    hits += 1;
                }
            }
        }

        let state = session.state();
        RunLine {
            seed,
            finished: state.status == RunStatus::GameOver,
            duration_ms: state.elapsed_ms,
            score: state.score,
            max_floor: state.max_floor_reached,
            max_combo: state.max_combo,
            chapter: state.chapter_index,
            hits,
        }
    }

    pub fn run() -> Result<(), serde_json::Error> {
        env_logger::init();
        let cli = Cli::parse();

        let quality = match cli.quality.as_deref() {
            Some(name) => QualityPreset::from_str(name).unwrap_or_else(|| {
                log::warn!("Unknown quality {:?}, using Medium", name);
                QualityPreset::Medium
            }),
            None => QualityPreset::Medium,
        };
        let mut session = Session::new(HostContext::default(), Settings::from_preset(quality), cli.seed);

        let mut lines = Vec::new();
        for i in 0..cli.runs {
            let seed = cli.seed.wrapping_add(i as u64);
            let line = play(&mut session, seed, cli.max_seconds);
            log::info!("Run {} (seed {}): floor {} score {}", i, seed, line.max_floor, line.score);
            println!("{}", serde_json::to_string(&line)?);
            lines.push(line);
        }

        let total_floors: u64 = lines.iter().map(|l| l.max_floor as u64).sum();
        let summary = Summary {
            runs: lines.len(),
            finished: lines.iter().filter(|l| l.finished).count(),
            best_score: lines.iter().map(|l| l.score).max().unwrap_or(0),
            best_floor: lines.iter().map(|l| l.max_floor).max().unwrap_or(0),
            average_floor: if lines.is_empty() {
                0.0
            } else {
                total_floors as f64 / lines.len() as f64
            },
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), serde_json::Error> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
