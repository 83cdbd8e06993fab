//! Async input service: crossterm terminal events mapped onto console events.

mod async_service;
pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;

use console_events::{Event, InputEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKind, KeyModifiers as CMods,
};
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Translate one crossterm key event. Releases and keys the console has no
/// use for yield `None`; Ctrl-C becomes [`InputEvent::CtrlC`].
pub fn map_key_event(key: CKeyEvent) -> Option<InputEvent> {
    if key.kind == CKind::Release {
        return None;
    }
    let mods = map_mods(key.modifiers);
    let code = match key.code {
        CKeyCode::Char('c') if mods.contains(KeyModifiers::CTRL) => {
            return Some(InputEvent::CtrlC);
        }
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(InputEvent::Key(KeyEvent { code, mods }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_plain_and_modified_keys() {
        let up = map_key_event(CKeyEvent::new(CKeyCode::Up, CMods::NONE));
        assert_eq!(up, Some(InputEvent::Key(KeyEvent::plain(KeyCode::Up))));

        let home = map_key_event(CKeyEvent::new(CKeyCode::Home, CMods::CONTROL));
        assert_eq!(
            home,
            Some(InputEvent::Key(KeyEvent::new(KeyCode::Home, KeyModifiers::CTRL)))
        );
    }

    #[test]
    fn ctrl_c_is_interrupt() {
        let ev = map_key_event(CKeyEvent::new(CKeyCode::Char('c'), CMods::CONTROL));
        assert_eq!(ev, Some(InputEvent::CtrlC));
        let plain = map_key_event(CKeyEvent::new(CKeyCode::Char('c'), CMods::NONE));
        assert_eq!(plain, Some(InputEvent::Key(KeyEvent::plain(KeyCode::Char('c')))));
    }

    #[test]
    fn release_and_unmapped_keys_dropped() {
        let release =
            CKeyEvent::new_with_kind(CKeyCode::Char('a'), CMods::NONE, CKind::Release);
        assert_eq!(map_key_event(release), None);
        assert_eq!(map_key_event(CKeyEvent::new(CKeyCode::F(5), CMods::NONE)), None);
    }

    #[test]
    fn shift_alt_modifiers_carried() {
        let m = map_mods(CMods::SHIFT | CMods::ALT);
        assert!(m.contains(KeyModifiers::SHIFT));
        assert!(m.contains(KeyModifiers::ALT));
        assert!(!m.contains(KeyModifiers::CTRL));
    }
}
