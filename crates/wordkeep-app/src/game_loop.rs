//! Game loop — runs the simulation engine at 60Hz and draws each snapshot.
//!
//! Keyboard events are read on a dedicated thread and arrive via an `mpsc`
//! channel. The loop measures real frame time and hands it to the engine,
//! which clamps it.

use std::io::{self, BufWriter, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event};
use crossterm::{terminal, QueueableCommand};
use tracing::{info, warn};

use wordkeep_core::constants::TICK_RATE;
use wordkeep_core::state::GameStateSnapshot;
use wordkeep_sim::engine::{SimConfig, SimulationEngine};

use crate::audio;
use crate::keymap::{self, LoopAction};
use crate::render;
use crate::terminal::TerminalSession;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// How long an alert stays on the message line.
const BANNER_DURATION: Duration = Duration::from_secs(2);

/// Spawns the keyboard reader thread.
///
/// Takes the raw-mode session so no key is read while the terminal is still
/// cooked. Returns the receiving end for the game loop to drain.
fn spawn_input_thread(_raw: &TerminalSession) -> anyhow::Result<mpsc::Receiver<Event>> {
    let (event_tx, event_rx) = mpsc::channel::<Event>();

    std::thread::Builder::new()
        .name("wordkeep-input".into())
        .spawn(move || loop {
            match event::read() {
                Ok(event) => {
                    if event_tx.send(event).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!(%err, "terminal input failed");
                    return;
                }
            }
        })
        .context("spawning input thread")?;

    Ok(event_rx)
}

/// Most recent alert message and when it expires.
#[derive(Debug, Default)]
struct Banner {
    message: Option<(String, Instant)>,
}

impl Banner {
    fn update(&mut self, snapshot: &GameStateSnapshot, now: Instant) {
        if let Some(alert) = snapshot.alerts.last() {
            self.message = Some((alert.message.clone(), now + BANNER_DURATION));
        }
        if matches!(&self.message, Some((_, until)) if *until <= now) {
            self.message = None;
        }
    }

    fn text(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }
}

/// Run the game until the player quits.
pub fn run(config: SimConfig) -> anyhow::Result<()> {
    let mut engine = SimulationEngine::new(config).context("invalid game configuration")?;

    let mut out = BufWriter::new(io::stdout());
    let session = TerminalSession::enter().context("entering raw terminal mode")?;
    let input = spawn_input_thread(&session)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut banner = Banner::default();
    let mut last_frame = Instant::now();
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending input
        loop {
            match input.try_recv() {
                Ok(event) => match keymap::map_event(&event, engine.phase()) {
                    Some(LoopAction::Player(command)) => engine.queue_command(command),
                    Some(LoopAction::Quit) => {
                        info!(score = engine.session().score, "player quit");
                        return Ok(());
                    }
                    None => {}
                },
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    return Err(anyhow::anyhow!("terminal input closed"));
                }
            }
        }

        // 2. Advance by real elapsed time (engine clamps and handles pause)
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        let snapshot = engine.tick(dt);

        // 3. Sound, then picture
        audio::play(&mut out, &snapshot.audio_events)?;
        banner.update(&snapshot, now);
        let frame = render::compose(&snapshot, &engine.config().rules, banner.text());
        render::draw(&mut out, &frame).context("drawing frame")?;

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordkeep_core::enums::AlertLevel;
    use wordkeep_core::events::Alert;

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.666ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_banner_shows_latest_alert_then_expires() {
        let start = Instant::now();
        let mut banner = Banner::default();
        let mut snap = GameStateSnapshot::default();
        snap.alerts.push(Alert {
            level: AlertLevel::Info,
            message: "Level 2".into(),
            tick: 10,
        });

        banner.update(&snap, start);
        assert_eq!(banner.text(), Some("Level 2"));

        let quiet = GameStateSnapshot::default();
        banner.update(&quiet, start + Duration::from_millis(500));
        assert_eq!(banner.text(), Some("Level 2"));

        banner.update(&quiet, start + BANNER_DURATION);
        assert_eq!(banner.text(), None);
    }

    #[test]
    fn test_frame_pipeline_headless() {
        let mut engine = SimulationEngine::new(SimConfig {
            seed: 5,
            ..Default::default()
        })
        .unwrap();
        engine.queue_command(wordkeep_core::commands::PlayerCommand::StartGame);

        let mut out = Vec::new();
        for _ in 0..300 {
            let snapshot = engine.tick(0.05);
            audio::play(&mut out, &snapshot.audio_events).unwrap();
            let frame = render::compose(&snapshot, &engine.config().rules, None);
            render::draw(&mut out, &frame).unwrap();
        }
        assert!(!out.is_empty());
    }
}
