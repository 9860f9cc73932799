use neato_proto::types::{analog_fields, Command, ValueKind};
use neato_proto::{Result, SensorState};
use serde::Serialize;

use super::sensor::Sensor;

/// Wall, drop and magnetic-strip sensors plus battery voltage, from `getanalogsensors`.
pub struct AnalogSensors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalogReading {
    pub wall_mm: i64,
    pub battery_mv: i64,
    pub left_drop_mm: i64,
    pub right_drop_mm: i64,
    pub left_mag: i64,
    pub right_mag: i64,
}

impl Sensor for AnalogSensors {
    type Reading = AnalogReading;

    fn command(&self) -> Command {
        Command::GetAnalogSensors
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    fn read(&self, state: &SensorState) -> Result<AnalogReading> {
        Ok(AnalogReading {
            wall_mm: state.get_i64(analog_fields::WALL_SENSOR)?,
            battery_mv: state.get_i64(analog_fields::BATTERY_VOLTAGE)?,
            left_drop_mm: state.get_i64(analog_fields::LEFT_DROP)?,
            right_drop_mm: state.get_i64(analog_fields::RIGHT_DROP)?,
            left_mag: state.get_i64(analog_fields::LEFT_MAG)?,
            right_mag: state.get_i64(analog_fields::RIGHT_MAG)?,
        })
    }
}
