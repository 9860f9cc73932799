use neato_proto::types::{motor_fields, Command, ValueKind};
use neato_proto::{Result, SensorState};
use serde::Serialize;

use super::sensor::Sensor;

/// Wheel odometry from `getmotors`.
pub struct Odometry;

/// Wheel travel and speed, both in millimeter units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OdometryReading {
    pub left_position_mm: i64,
    pub right_position_mm: i64,
    pub left_speed: i64,
    pub right_speed: i64,
}

impl Sensor for Odometry {
    type Reading = OdometryReading;

    fn command(&self) -> Command {
        Command::GetMotors
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    fn read(&self, state: &SensorState) -> Result<OdometryReading> {
        Ok(OdometryReading {
            left_position_mm: state.get_i64(motor_fields::LEFT_WHEEL_POSITION)?,
            right_position_mm: state.get_i64(motor_fields::RIGHT_WHEEL_POSITION)?,
            left_speed: state.get_i64(motor_fields::LEFT_WHEEL_SPEED)?,
            right_speed: state.get_i64(motor_fields::RIGHT_WHEEL_SPEED)?,
        })
    }
}
