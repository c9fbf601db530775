//! Level progression: one step up per tick once the score clears the
//! current level's threshold.

use tracing::info;

use wordkeep_core::config::DifficultyTable;
use wordkeep_core::enums::AlertLevel;
use wordkeep_core::events::{Alert, AudioEvent};

use crate::session::SessionState;

/// Advance at most one level. Returns true if the level changed.
pub fn run(
    session: &mut SessionState,
    table: &DifficultyTable,
    tick: u64,
    alerts: &mut Vec<Alert>,
    audio_events: &mut Vec<AudioEvent>,
) -> bool {
    if session.game_over || session.level >= table.last_level() {
        return false;
    }
    if session.score < table.level(session.level).score_threshold {
        return false;
    }

    session.level += 1;
    alerts.push(Alert {
        level: AlertLevel::Info,
        message: format!("Level {}", session.level),
        tick,
    });
    audio_events.push(AudioEvent::LevelUp {
        level: session.level,
    });
    info!(level = session.level, score = session.score, "level up");
    true
}
