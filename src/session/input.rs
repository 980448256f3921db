use std::time::Instant;

use crate::session::state::SessionState;

/// Input the session engine understands. Special keys and modifier
/// combinations are filtered out before they get here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Char(char),
    Backspace,
}

#[derive(Clone, Debug)]
pub struct KeystrokeEvent {
    pub position: usize,
    pub expected: char,
    pub actual: char,
    pub timestamp: Instant,
    pub correct: bool,
}

pub fn process_char(session: &mut SessionState, ch: char) -> Option<KeystrokeEvent> {
    process_char_at(session, ch, Instant::now())
}

/// Match `ch` against the next position that needs input.
///
/// Returns `None` when the keystroke is not consumed: the session is already
/// complete, or only skip positions were left (which completes it).
pub fn process_char_at(session: &mut SessionState, ch: char, now: Instant) -> Option<KeystrokeEvent> {
    if session.completed {
        return None;
    }

    if session.started_at.is_none() {
        session.started_at = Some(now);
    }

    let target = session.next_target();
    if target >= session.target.len() {
        session.complete(now);
        return None;
    }

    let expected = session.target[target];
    let correct = ch == expected;

    session.typed.push(ch);
    if correct {
        session.errors.remove(&target);
        session.combo += 1;
        session.best_combo = session.best_combo.max(session.combo);
    } else {
        session.errors.insert(target);
        session.combo = 0;
    }
    session.cursor = target + 1;

    if session.next_target() >= session.target.len() {
        session.complete(now);
    }

    Some(KeystrokeEvent {
        position: target,
        expected,
        actual: ch,
        timestamp: now,
        correct,
    })
}

/// Undo the most recent consumed keystroke. Returns whether anything changed.
pub fn process_backspace(session: &mut SessionState) -> bool {
    if session.completed || session.cursor == 0 {
        return false;
    }

    let Some(position) = session.mask().prev_typeable(session.cursor) else {
        return false;
    };

    session.errors.remove(&position);
    session.typed.pop();
    session.cursor = session
        .mask()
        .prev_typeable(position)
        .map_or(0, |prev| prev + 1);
    true
}
