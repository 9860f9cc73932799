pub mod config;
pub mod connection;
pub mod error;
pub mod filter;
pub mod frame;
pub mod scan;
pub mod state;
pub mod tabular;
pub mod types;

pub use config::{DriverConfig, RetryPolicy};
pub use connection::Connection;
pub use error::{NeatoError, Result};
pub use filter::OutlierFilter;
pub use frame::Responses;
pub use scan::LaserScan;
pub use state::SensorState;
pub use types::{Command, FieldValue, ValueKind};
