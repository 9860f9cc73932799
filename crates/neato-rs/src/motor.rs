use serde::Serialize;
use tracing::trace;

/// Distance between the drive wheels, in millimeters.
pub const BASE_WIDTH_MM: i64 = 248;

/// Top wheel speed accepted by `setmotor`, in millimeters per second.
pub const MAX_SPEED_MM_S: i64 = 300;

/// One `setmotor` command: distance to travel per wheel, and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotorCommand {
    pub left_mm: i64,
    pub right_mm: i64,
    pub speed_mm_s: i64,
}

impl MotorCommand {
    pub const STOP: MotorCommand = MotorCommand::new(0, 0, 0);

    /// Sent instead of a zero command. The firmware keeps coasting for up to a
    /// second after `setmotor 0 0 0`, but halts at once after a tiny move.
    pub const NUDGE: MotorCommand = MotorCommand::new(1, 1, 1);

    pub const fn new(left_mm: i64, right_mm: i64, speed_mm_s: i64) -> Self {
        Self {
            left_mm,
            right_mm,
            speed_mm_s,
        }
    }

    /// Build a command from fractional values, truncating toward zero.
    pub fn from_f64(left_mm: f64, right_mm: f64, speed_mm_s: f64) -> Self {
        Self::new(left_mm as i64, right_mm as i64, speed_mm_s as i64)
    }

    pub fn is_stop(&self) -> bool {
        *self == Self::STOP
    }

    /// The command line as written to the control channel (without newline).
    pub fn to_wire(&self) -> String {
        format!("setmotor {} {} {}", self.left_mm, self.right_mm, self.speed_mm_s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Stopped,
    Moving,
}

/// Rewrites the stream of motor commands so the robot stops promptly.
///
/// The first stop while moving is replaced by [`MotorCommand::NUDGE`]; further
/// stops are dropped until the robot is commanded to move again.
#[derive(Debug, Clone)]
pub struct MotorDebouncer {
    state: MotionState,
    last: Option<MotorCommand>,
}

impl Default for MotorDebouncer {
    fn default() -> Self {
        Self {
            state: MotionState::Stopped,
            last: None,
        }
    }
}

impl MotorDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// What to actually send for `command`, if anything. Does not change state.
    pub fn plan(&self, command: MotorCommand) -> Option<MotorCommand> {
        match (command.is_stop(), self.state) {
            (true, MotionState::Moving) => Some(MotorCommand::NUDGE),
            (true, MotionState::Stopped) => {
                trace!("Suppressing redundant stop");
                None
            }
            (false, _) => Some(command),
        }
    }

    /// Record that the plan for `command` reached the robot.
    pub fn commit(&mut self, command: MotorCommand) {
        if command.is_stop() {
            if self.state == MotionState::Moving {
                self.state = MotionState::Stopped;
                self.last = Some(MotorCommand::STOP);
            }
        } else {
            self.state = MotionState::Moving;
            self.last = Some(command);
        }
    }

    /// Plan and commit in one step, for callers whose send cannot fail.
    pub fn debounce(&mut self, command: MotorCommand) -> Option<MotorCommand> {
        let planned = self.plan(command);
        self.commit(command);
        planned
    }

    /// The last command the caller asked for (a stop is recorded as a stop, not a nudge).
    pub fn last(&self) -> Option<MotorCommand> {
        self.last
    }

    pub fn state(&self) -> MotionState {
        self.state
    }
}
