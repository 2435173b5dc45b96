//! Player commands and the held/pressed view of them the arena consumes.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    RotateLeft,
    RotateRight,
    Thrust,
    Fire,
}

impl Command {
    fn index(self) -> usize {
        match self {
            Command::RotateLeft => 0,
            Command::RotateRight => 1,
            Command::Thrust => 2,
            Command::Fire => 3,
        }
    }
}

pub trait InputSource {
    /// The command is held during the current tick.
    fn is_held(&self, command: Command) -> bool;
    /// The command went from released to held on the current tick.
    fn was_pressed(&self, command: Command) -> bool;
}

/// Held commands for the current and previous tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; 4],
    previous: [bool; 4],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new tick with exactly `held` commands down.
    pub fn update(&mut self, held: &[Command]) {
        self.previous = self.held;
        self.held = [false; 4];
        for command in held {
            self.held[command.index()] = true;
        }
    }

    pub fn release_all(&mut self) {
        self.update(&[]);
    }
}

impl InputSource for InputState {
    fn is_held(&self, command: Command) -> bool {
        self.held[command.index()]
    }

    fn was_pressed(&self, command: Command) -> bool {
        self.held[command.index()] && !self.previous[command.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_only_on_the_leading_edge() {
        let mut input = InputState::new();
        input.update(&[Command::Fire]);
        assert!(input.was_pressed(Command::Fire));
        input.update(&[Command::Fire]);
        assert!(input.is_held(Command::Fire));
        assert!(!input.was_pressed(Command::Fire));
        input.release_all();
        assert!(!input.is_held(Command::Fire));
        input.update(&[Command::Fire, Command::Thrust]);
        assert!(input.was_pressed(Command::Fire));
        assert!(input.was_pressed(Command::Thrust));
        assert!(!input.is_held(Command::RotateLeft));
    }
}
