mod accel;
mod analog;
mod charger;
mod digital;
mod odometry;
mod sensor;

pub use accel::{AccelReading, Accelerometer};
pub use analog::{AnalogReading, AnalogSensors};
pub use charger::{Charger, ChargerReading};
pub use digital::{DigitalReading, DigitalSensors};
pub use odometry::{Odometry, OdometryReading};
pub use sensor::{poll, Sensor};
