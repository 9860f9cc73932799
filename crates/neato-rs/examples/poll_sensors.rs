//! Connect to a Neato, drive forward briefly while printing telemetry, then stop.
//!
//! Usage:
//!   cargo run --example poll_sensors -- 192.168.1.20
//!
//! Something on the robot side must keep requesting `getldsscan` / `getmotors`
//! so their replies are broadcast to the telemetry port (7777).

use std::time::Duration;

use neato_rs::{DriverConfig, Neato, MAX_SPEED_MM_S};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> neato_proto::Result<()> {
    tracing_subscriber::fmt::init();

    let host = std::env::args().nth(1).unwrap_or_else(|| "192.168.1.20".to_string());

    // Ctrl-C aborts the connect loop instead of waiting for the robot forever.
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        on_ctrl_c.cancel();
    });

    let mut neato = Neato::new(DriverConfig::new(host)).connect(&cancel).await?;
    println!("Connected.");

    neato
        .motor()
        .set(500.0, 500.0, (MAX_SPEED_MM_S / 2) as f64)
        .await?;

    for _ in 0..100 {
        neato.request_scan().await?;

        let scan = neato.scan();
        if !scan.is_empty() {
            let valid = scan.ranges.iter().filter(|r| **r > 0.0).count();
            println!("scan: {} slots, {valid} valid", scan.len());
        }
        match neato.motors() {
            Ok(odom) => println!("odometry: {odom:?}"),
            Err(e) => println!("odometry unavailable: {e}"),
        }
        if let Ok(bumpers) = neato.digital_sensors() {
            if bumpers.left_front || bumpers.right_front {
                println!("bumped, stopping");
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    neato.motor().stop().await?;
    neato.exit().await?;
    println!("Done!");
    Ok(())
}
