pub mod api;
pub mod motor;
pub mod neato;
pub mod sensors;

pub use motor::{MotorCommand, MotorDebouncer, BASE_WIDTH_MM, MAX_SPEED_MM_S};
pub use neato::Neato;
pub use neato_proto::{DriverConfig, LaserScan, NeatoError, Result};
