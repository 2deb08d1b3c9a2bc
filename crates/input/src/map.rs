//! Key mapping from terminal events to session commands.

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{Command, Player};

/// Commands produced by one key in duel mode.
pub type DuelCommands = ArrayVec<(Player, Command), 2>;

/// Single-player layout: arrows, WASD or hjkl to move and rotate.
pub fn handle_key_event(key: KeyEvent) -> Option<Command> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(Command::Left),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(Command::Right),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(Command::Down),

        // Rotation
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(Command::Rotate),

        // Actions
        KeyCode::Char(' ') | KeyCode::Enter => Some(Command::HardDrop),
        KeyCode::Char('p' | 'P') => Some(Command::Pause),
        KeyCode::Char('r' | 'R') => Some(Command::Restart),

        _ => None,
    }
}

/// Two-player layout: player one on WASD + Space, player two on the arrows +
/// Enter. Pause and restart apply to both boards.
pub fn handle_duel_key_event(key: KeyEvent) -> DuelCommands {
    let mut out = DuelCommands::new();
    let single = match key.code {
        KeyCode::Char('a' | 'A') => Some((Player::One, Command::Left)),
        KeyCode::Char('d' | 'D') => Some((Player::One, Command::Right)),
        KeyCode::Char('s' | 'S') => Some((Player::One, Command::Down)),
        KeyCode::Char('w' | 'W') => Some((Player::One, Command::Rotate)),
        KeyCode::Char(' ') => Some((Player::One, Command::HardDrop)),

        KeyCode::Left => Some((Player::Two, Command::Left)),
        KeyCode::Right => Some((Player::Two, Command::Right)),
        KeyCode::Down => Some((Player::Two, Command::Down)),
        KeyCode::Up => Some((Player::Two, Command::Rotate)),
        KeyCode::Enter => Some((Player::Two, Command::HardDrop)),

        KeyCode::Char('p' | 'P') => {
            out.extend(Player::ALL.map(|p| (p, Command::Pause)));
            None
        }
        KeyCode::Char('r' | 'R') => {
            out.extend(Player::ALL.map(|p| (p, Command::Restart)));
            None
        }
        _ => None,
    };
    if let Some(pair) = single {
        out.push(pair);
    }
    out
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(Command::Left)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('L'))),
            Some(Command::Right)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('s'))),
            Some(Command::Down)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Up)),
            Some(Command::Rotate)
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(Command::HardDrop)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('p'))),
            Some(Command::Pause)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('R'))),
            Some(Command::Restart)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_duel_keys_route_to_players() {
        assert_eq!(
            handle_duel_key_event(KeyEvent::from(KeyCode::Char('a'))).as_slice(),
            &[(Player::One, Command::Left)]
        );
        assert_eq!(
            handle_duel_key_event(KeyEvent::from(KeyCode::Char(' '))).as_slice(),
            &[(Player::One, Command::HardDrop)]
        );
        assert_eq!(
            handle_duel_key_event(KeyEvent::from(KeyCode::Left)).as_slice(),
            &[(Player::Two, Command::Left)]
        );
        assert_eq!(
            handle_duel_key_event(KeyEvent::from(KeyCode::Enter)).as_slice(),
            &[(Player::Two, Command::HardDrop)]
        );
        assert_eq!(
            handle_duel_key_event(KeyEvent::from(KeyCode::Char('p'))).as_slice(),
            &[(Player::One, Command::Pause), (Player::Two, Command::Pause)]
        );
        assert!(handle_duel_key_event(KeyEvent::from(KeyCode::Char('h'))).is_empty());
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
