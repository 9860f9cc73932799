use neato_proto::types::{digital_fields, Command, ValueKind};
use neato_proto::{Result, SensorState};
use serde::Serialize;

use super::sensor::Sensor;

/// Bumper switches, read with `getdigitalsensors`.
pub struct DigitalSensors;

/// `true` while the bumper switch is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DigitalReading {
    pub left_front: bool,
    pub left_side: bool,
    pub right_front: bool,
    pub right_side: bool,
}

impl Sensor for DigitalSensors {
    type Reading = DigitalReading;

    fn command(&self) -> Command {
        Command::GetDigitalSensors
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    fn read(&self, state: &SensorState) -> Result<DigitalReading> {
        Ok(DigitalReading {
            left_front: state.get_bool(digital_fields::LEFT_FRONT)?,
            left_side: state.get_bool(digital_fields::LEFT_SIDE)?,
            right_front: state.get_bool(digital_fields::RIGHT_FRONT)?,
            right_side: state.get_bool(digital_fields::RIGHT_SIDE)?,
        })
    }
}
