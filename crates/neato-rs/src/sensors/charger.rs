use neato_proto::types::{charger_fields, Command, ValueKind};
use neato_proto::{Result, SensorState};
use serde::Serialize;

use super::sensor::Sensor;

/// Battery and charging status from `getcharger`.
pub struct Charger;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargerReading {
    pub fuel_percent: i64,
    pub charging_active: bool,
    pub charging_enabled: bool,
    pub ext_power_present: bool,
    pub battery_volts: f64,
    pub ext_volts: f64,
    pub charger_mah: i64,
}

impl Sensor for Charger {
    type Reading = ChargerReading;

    fn command(&self) -> Command {
        Command::GetCharger
    }

    // Flags and counters are integers, voltages are decimals.
    fn value_kind(&self) -> ValueKind {
        ValueKind::Number
    }

    fn read(&self, state: &SensorState) -> Result<ChargerReading> {
        Ok(ChargerReading {
            fuel_percent: state.get_i64(charger_fields::FUEL_PERCENT)?,
            charging_active: state.get_bool(charger_fields::CHARGING_ACTIVE)?,
            charging_enabled: state.get_bool(charger_fields::CHARGING_ENABLED)?,
            ext_power_present: state.get_bool(charger_fields::EXT_PWR_PRESENT)?,
            battery_volts: state.get_f64(charger_fields::BATTERY_VOLTS)?,
            ext_volts: state.get_f64(charger_fields::EXT_VOLTS)?,
            charger_mah: state.get_i64(charger_fields::CHARGER_MAH)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::poll;
    use neato_proto::frame::split_datagram;

    #[test]
    fn test_decode_charger() {
        let datagram = b"getcharger\r\nLabel,Value\r\nFuelPercent,87\r\nBatteryOverTemp,0\r\n\
            ChargingActive,1\r\nChargingEnabled,1\r\nConfidentOnFuel,1\r\nExtPwrPresent,1\r\n\
            VBattV,16.12\r\nVExtV,22.50\r\nCharger_mAH,1240\r\nMaxPWM,65536\r\n";
        let reading = poll(&Charger, &split_datagram(datagram), &mut SensorState::new()).unwrap();

        assert_eq!(reading.fuel_percent, 87);
        assert!(reading.charging_active);
        assert!(reading.ext_power_present);
        assert_eq!(reading.battery_volts, 16.12);
        assert_eq!(reading.ext_volts, 22.5);
        assert_eq!(reading.charger_mah, 1240);
    }
}
