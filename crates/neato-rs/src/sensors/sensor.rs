use neato_proto::frame::Responses;
use neato_proto::tabular::decode_table;
use neato_proto::types::{Command, ValueKind};
use neato_proto::{Result, SensorState};

/// A telemetry block reported by one robot command as a `name,value` table.
pub trait Sensor {
    type Reading;

    /// The command whose response carries this block.
    fn command(&self) -> Command;

    /// How the value column is converted.
    fn value_kind(&self) -> ValueKind;

    /// Extract the reading from the accumulated state.
    fn read(&self, state: &SensorState) -> Result<Self::Reading>;
}

/// Fold the sensor's response (if `responses` has one) into `state`, then read it.
///
/// Without a fresh response the reading comes from the last known values. A
/// rejected or headerless response fails before `state` is touched.
pub fn poll<S: Sensor>(sensor: &S, responses: &Responses, state: &mut SensorState) -> Result<S::Reading> {
    if let Some(body) = responses.get(sensor.command()) {
        let entries = decode_table(sensor.command(), body, sensor.value_kind())?;
        state.apply(entries);
    }
    sensor.read(state)
}
