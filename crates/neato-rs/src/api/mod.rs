mod control;
mod motor;

pub use control::ControlApi;
pub use motor::MotorApi;
