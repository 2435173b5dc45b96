//! Hit flash: the ship alternates colors for a short while after losing a life.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipColor {
    White,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlashState {
    Idle,
    Flashing { elapsed: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashTimer {
    duration: f64,
    interval: f64,
    state: FlashState,
}

impl FlashTimer {
    pub fn new(duration: f64, interval: f64) -> Self {
        FlashTimer { duration, interval, state: FlashState::Idle }
    }

    /// Starts the flash, restarting it from the beginning if one is running.
    pub fn start(&mut self) {
        self.state = FlashState::Flashing { elapsed: 0.0 };
    }

    pub fn advance(&mut self, dt: f64) {
        if let FlashState::Flashing { elapsed } = self.state {
            let elapsed = elapsed + dt;
            self.state = if elapsed >= self.duration {
                FlashState::Idle
            } else {
                FlashState::Flashing { elapsed }
            };
        }
    }

    pub fn state(&self) -> FlashState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, FlashState::Flashing { .. })
    }

    /// Black on even intervals, white on odd ones, white once finished.
    pub fn color(&self) -> ShipColor {
        match self.state {
            FlashState::Idle => ShipColor::White,
            FlashState::Flashing { elapsed } => {
                let phase = if self.interval > 0.0 { (elapsed / self.interval) as u64 } else { 0 };
                if phase % 2 == 0 { ShipColor::Black } else { ShipColor::White }
            }
        }
    }
}
