//! Key bindings: crossterm key events to loop actions, per game phase.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use wordkeep_core::commands::PlayerCommand;
use wordkeep_core::enums::GamePhase;

/// What the game loop should do with an input event.
#[derive(Debug, Clone)]
pub enum LoopAction {
    /// Forward to the simulation engine.
    Player(PlayerCommand),
    /// Leave the game.
    Quit,
}

/// Map a terminal event. Releases, repeats, and non-key events map to nothing.
pub fn map_event(event: &Event, phase: GamePhase) -> Option<LoopAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key, phase),
        _ => None,
    }
}

fn map_key(key: &KeyEvent, phase: GamePhase) -> Option<LoopAction> {
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(LoopAction::Quit);
    }

    let command = match (phase, key.code) {
        (GamePhase::Title | GamePhase::GameOver, KeyCode::Enter) => PlayerCommand::StartGame,
        (GamePhase::Active, KeyCode::Tab) => PlayerCommand::Pause,
        (GamePhase::Paused, KeyCode::Tab) => PlayerCommand::Resume,
        (GamePhase::Active, KeyCode::Char(ch))
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            PlayerCommand::TypeChar { ch }
        }
        (GamePhase::GameOver, _) => return Some(LoopAction::Quit),
        _ => return None,
    };
    Some(LoopAction::Player(command))
}
