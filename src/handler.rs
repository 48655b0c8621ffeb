use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::{Event, EventHandler};
use crate::nav::NavEvent;

/// What a key press means while a listing fetch is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Abandon the fetch and keep browsing.
    Cancel,
    /// Abandon the fetch and exit.
    Quit,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a key event onto a navigation event. Unmapped keys yield `None`.
pub fn map_key(key: KeyEvent) -> Option<NavEvent> {
    if is_ctrl_c(&key) {
        return Some(NavEvent::Quit);
    }
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => Some(NavEvent::MoveSelectionDown),
        KeyCode::Up | KeyCode::Char('k') => Some(NavEvent::MoveSelectionUp),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Some(NavEvent::Enter),
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('b') => {
            Some(NavEvent::GoBack)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(NavEvent::Quit),
        _ => None,
    }
}

/// Keys honoured while a fetch is outstanding; everything else is dropped.
pub fn map_interrupt(key: KeyEvent) -> Option<Interrupt> {
    if is_ctrl_c(&key) {
        return Some(Interrupt::Quit);
    }
    match key.code {
        KeyCode::Esc => Some(Interrupt::Cancel),
        KeyCode::Char('q') => Some(Interrupt::Quit),
        _ => None,
    }
}

/// Wait for the first interrupting key. A closed event channel counts as quit.
pub async fn next_interrupt(events: &mut EventHandler) -> Interrupt {
    loop {
        match events.next().await {
            Ok(Event::Key(key)) => {
                if let Some(interrupt) = map_interrupt(key) {
                    return interrupt;
                }
            }
            Ok(_) => {}
            Err(_) => return Interrupt::Quit,
        }
    }
}
