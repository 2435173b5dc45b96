use std::collections::HashMap;
use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::input::Command;

// --- Key mapping ---
pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left => Some(Command::RotateLeft),
        KeyCode::Right => Some(Command::RotateRight),
        KeyCode::Up => Some(Command::Thrust),
        KeyCode::Char(' ') => Some(Command::Fire),
        _ => None,
    }
}

/// Menu and application keys, outside the in-game command set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostAction {
    Play,
    Quit,
}

pub fn host_action_for_key(code: KeyCode) -> Option<HostAction> {
    match code {
        // Space stays Fire only, so a held trigger cannot restart a finished run.
        KeyCode::Enter => Some(HostAction::Play),
        KeyCode::Char('q') | KeyCode::Esc => Some(HostAction::Quit),
        _ => None,
    }
}

pub fn is_key_press(key_event: &KeyEvent) -> bool {
    key_event.kind != KeyEventKind::Release
}

// --- Held-key emulation ---
// Terminals only report presses and auto-repeats, so a steering or thrust key
// counts as held for a short window after its last event. Fire is only held
// on frames that actually saw a press.
pub struct KeyHoldTracker {
    remaining: HashMap<Command, f64>,
    fire_seen: bool,
    hold_window: f64,
}

impl KeyHoldTracker {
    pub fn new(hold_window: f64) -> Self {
        KeyHoldTracker {
            remaining: HashMap::new(),
            fire_seen: false,
            hold_window,
        }
    }

    pub fn record(&mut self, command: Command) {
        if command == Command::Fire {
            self.fire_seen = true;
        } else {
            self.remaining.insert(command, self.hold_window);
        }
    }

    /// Commands held this frame. Ages the hold windows by `dt`.
    pub fn end_frame(&mut self, dt: f64) -> Vec<Command> {
        let mut held: Vec<Command> = self
            .remaining
            .iter()
            .filter(|&(_, &left)| left > 0.0)
            .map(|(&command, _)| command)
            .collect();
        if self.fire_seen {
            held.push(Command::Fire);
        }
        self.fire_seen = false;
        self.remaining.retain(|_, left| {
            *left -= dt;
            *left > 0.0
        });
        held
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
        self.fire_seen = false;
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
    current_frame: u64,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events, current_frame: 0 }
    }

    /// A short scripted session: start a run, turn, thrust, shoot, then quit.
    pub fn demo_script(quit_frame: u64) -> Self {
        let key = |code: KeyCode| Event::Key(code.into());
        let mut events = HashMap::new();
        events.insert(1, vec![key(KeyCode::Enter)]);
        events.insert(3, vec![key(KeyCode::Up)]);
        events.insert(4, vec![key(KeyCode::Up), key(KeyCode::Right)]);
        events.insert(6, vec![key(KeyCode::Char(' '))]);
        events.insert(8, vec![key(KeyCode::Left)]);
        events.insert(9, vec![key(KeyCode::Char(' '))]);
        events.insert(quit_frame, vec![key(KeyCode::Char('q'))]);
        SimulatedInput::new(events)
    }

    pub fn poll(&mut self, frame_count: u64) -> io::Result<bool> {
        self.current_frame = frame_count;
        Ok(self.events.contains_key(&frame_count))
    }

    pub fn read(&mut self) -> io::Result<Vec<Event>> {
        Ok(self.events.remove(&self.current_frame).unwrap_or_default())
    }
}
