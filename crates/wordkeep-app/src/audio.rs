//! Audio cues. The terminal bell stands in for a sound system.

use std::io::Write;

use wordkeep_core::events::AudioEvent;

const BELL: &str = "\x07";

/// Events that deserve the bell.
fn rings(event: &AudioEvent) -> bool {
    matches!(
        event,
        AudioEvent::Impact { .. } | AudioEvent::CastleFallen { .. }
    )
}

/// Ring once if any event this tick wants it.
pub fn play<W: Write>(out: &mut W, events: &[AudioEvent]) -> std::io::Result<bool> {
    if !events.iter().any(rings) {
        return Ok(false);
    }
    out.write_all(BELL.as_bytes())?;
    Ok(true)
}
