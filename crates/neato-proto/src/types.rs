use std::fmt;

use serde::Serialize;

/// A telemetry command understood by the robot in test mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    GetLdsScan,
    GetMotors,
    GetAccel,
    GetDigitalSensors,
    GetAnalogSensors,
    GetCharger,
}

/// How the tabular part of a response is introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preamble {
    /// Data starts after the first line beginning with this token.
    Header(&'static str),
    /// Data starts after the echoed command line.
    EchoLine,
}

impl Command {
    /// The command name as sent on the wire and echoed back in responses.
    pub fn name(self) -> &'static str {
        match self {
            Command::GetLdsScan => "getldsscan",
            Command::GetMotors => "getmotors",
            Command::GetAccel => "getaccel",
            Command::GetDigitalSensors => "getdigitalsensors",
            Command::GetAnalogSensors => "getanalogsensors",
            Command::GetCharger => "getcharger",
        }
    }

    /// Where the data rows of this command's response begin.
    pub fn preamble(self) -> Preamble {
        match self {
            Command::GetLdsScan => Preamble::Header("AngleInDegrees"),
            Command::GetMotors => Preamble::Header("Parameter,Value"),
            Command::GetAccel => Preamble::Header("Label,Value"),
            // The digital sensor table has no stable header token across
            // firmware versions; only the echo line is skipped.
            Command::GetDigitalSensors => Preamble::EchoLine,
            Command::GetAnalogSensors => Preamble::Header("SensorName"),
            Command::GetCharger => Preamble::Header("Label,Value"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker the robot puts in a response when it does not know the command.
pub const UNKNOWN_COMMAND_MARKER: &str = "Unknown Cmd";

/// A decoded telemetry value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
}

impl FieldValue {
    /// The value as an integer. Floats are truncated toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            FieldValue::Int(i) => i,
            FieldValue::Float(f) => f as i64,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::Int(i) => i as f64,
            FieldValue::Float(f) => f,
        }
    }

    /// Nonzero means set, matching the robot's 0/1 flags.
    pub fn as_bool(self) -> bool {
        match self {
            FieldValue::Int(i) => i != 0,
            FieldValue::Float(f) => f != 0.0,
        }
    }
}

/// How the value column of a table should be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Integers only; anything else makes the line malformed.
    Integer,
    /// Parse as float.
    Float,
    /// Try integer first, then fall back to float.
    Number,
}

impl ValueKind {
    /// Convert one value column, or `None` if it does not parse.
    pub fn parse(self, raw: &str) -> Option<FieldValue> {
        let raw = raw.trim();
        match self {
            ValueKind::Integer => raw.parse::<i64>().ok().map(FieldValue::Int),
            ValueKind::Float => raw.parse::<f64>().ok().map(FieldValue::Float),
            ValueKind::Number => raw
                .parse::<i64>()
                .ok()
                .map(FieldValue::Int)
                .or_else(|| raw.parse::<f64>().ok().map(FieldValue::Float)),
        }
    }
}

/// One `name,value` row of a tabular response.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub name: String,
    pub value: FieldValue,
}

/// Field names reported by `getmotors`.
pub mod motor_fields {
    pub const LEFT_WHEEL_POSITION: &str = "LeftWheel_PositionInMM";
    pub const RIGHT_WHEEL_POSITION: &str = "RightWheel_PositionInMM";
    pub const LEFT_WHEEL_SPEED: &str = "LeftWheel_Speed";
    pub const RIGHT_WHEEL_SPEED: &str = "RightWheel_Speed";
    pub const LEFT_WHEEL_RPM: &str = "LeftWheel_RPM";
    pub const RIGHT_WHEEL_RPM: &str = "RightWheel_RPM";
    pub const BRUSH_RPM: &str = "Brush_RPM";
    pub const VACUUM_RPM: &str = "Vacuum_RPM";
}

/// Field names reported by `getaccel`.
pub mod accel_fields {
    pub const PITCH: &str = "PitchInDegrees";
    pub const ROLL: &str = "RollInDegrees";
    pub const X: &str = "XInG";
    pub const Y: &str = "YInG";
    pub const Z: &str = "ZInG";
    pub const SUM: &str = "SumInG";
}

/// Field names reported by `getdigitalsensors`.
pub mod digital_fields {
    pub const DC_JACK_CONNECT: &str = "SNSR_DC_JACK_CONNECT";
    pub const DUSTBIN_IS_IN: &str = "SNSR_DUSTBIN_IS_IN";
    pub const LEFT_WHEEL_EXTENDED: &str = "SNSR_LEFT_WHEEL_EXTENDED";
    pub const RIGHT_WHEEL_EXTENDED: &str = "SNSR_RIGHT_WHEEL_EXTENDED";
    pub const LEFT_SIDE: &str = "LSIDEBIT";
    pub const LEFT_FRONT: &str = "LFRONTBIT";
    pub const RIGHT_SIDE: &str = "RSIDEBIT";
    pub const RIGHT_FRONT: &str = "RFRONTBIT";
}

/// Field names reported by `getanalogsensors`.
pub mod analog_fields {
    pub const WALL_SENSOR: &str = "WallSensorInMM";
    pub const BATTERY_VOLTAGE: &str = "BatteryVoltageInmV";
    pub const LEFT_DROP: &str = "LeftDropInMM";
    pub const RIGHT_DROP: &str = "RightDropInMM";
    pub const LEFT_MAG: &str = "LeftMagSensor";
    pub const RIGHT_MAG: &str = "RightMagSensor";
}

/// Field names reported by `getcharger`.
pub mod charger_fields {
    pub const FUEL_PERCENT: &str = "FuelPercent";
    pub const CHARGING_ACTIVE: &str = "ChargingActive";
    pub const CHARGING_ENABLED: &str = "ChargingEnabled";
    pub const EXT_PWR_PRESENT: &str = "ExtPwrPresent";
    pub const BATTERY_VOLTS: &str = "VBattV";
    pub const EXT_VOLTS: &str = "VExtV";
    pub const CHARGER_MAH: &str = "Charger_mAH";
}
