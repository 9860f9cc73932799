use neato_proto::types::{accel_fields, Command, ValueKind};
use neato_proto::{Result, SensorState};
use serde::Serialize;

use super::sensor::Sensor;

/// The tilt accelerometer, read with `getaccel`.
pub struct Accelerometer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccelReading {
    pub pitch_deg: f64,
    pub roll_deg: f64,
    pub x_g: f64,
    pub y_g: f64,
    pub z_g: f64,
    pub sum_g: f64,
}

impl Sensor for Accelerometer {
    type Reading = AccelReading;

    fn command(&self) -> Command {
        Command::GetAccel
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Float
    }

    fn read(&self, state: &SensorState) -> Result<AccelReading> {
        Ok(AccelReading {
            pitch_deg: state.get_f64(accel_fields::PITCH)?,
            roll_deg: state.get_f64(accel_fields::ROLL)?,
            x_g: state.get_f64(accel_fields::X)?,
            y_g: state.get_f64(accel_fields::Y)?,
            z_g: state.get_f64(accel_fields::Z)?,
            sum_g: state.get_f64(accel_fields::SUM)?,
        })
    }
}
