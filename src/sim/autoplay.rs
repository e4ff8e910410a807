//! Autoplay bot (attract mode and the headless runner)
//!
//! Reads the snapshot only; it never touches the generator, so a run driven
//! by the bot replays exactly from its seed.

use super::state::RunState;
use crate::consts::FRAME_MS;
use crate::floor_at_height;

/// Frames checked ahead of a jump. A jump reaches the mid-floor line in
/// about five frames; every lethal window lasts longer than this span.
const LOOKAHEAD_FRAMES: u32 = 10;

/// Whether the bot should press jump this frame
pub fn should_jump(state: &RunState) -> bool {
    let player = &state.player;
    if !state.is_running() || !player.grounded || player.knockback_timer > 0.0 {
        return false;
    }
    if player.invincible_timer > 0.0 {
        return true;
    }

    let Some(floor) = state.floors.get(floor_at_height(player.height)) else {
        return true;
    };
    match floor.hazard {
        None => true,
        // Leaving a crumbling floor is always safe
        Some(kind) if kind.grounded_only() => true,
        Some(_) => {
            let now = state.elapsed_secs();
            (0..=LOOKAHEAD_FRAMES).all(|i| !floor.is_lethal(now + i as f32 * FRAME_MS / 1000.0))
        }
    }
}
