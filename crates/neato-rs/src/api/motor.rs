use neato_proto::Result;
use tracing::debug;

use crate::motor::MotorCommand;
use crate::neato::Neato;

/// Wheel motor control, routed through the stop debouncer.
pub struct MotorApi<'a> {
    pub(crate) neato: &'a mut Neato,
}

impl MotorApi<'_> {
    /// Drive each wheel the given distance (mm) at the given speed (mm/s).
    ///
    /// Values are truncated toward zero. A stop while moving is sent as a short
    /// nudge; repeated stops send nothing.
    pub async fn set(&mut self, left_mm: f64, right_mm: f64, speed_mm_s: f64) -> Result<()> {
        self.send(MotorCommand::from_f64(left_mm, right_mm, speed_mm_s))
            .await
    }

    /// Send `command` through the debouncer. State only advances once the write succeeds.
    pub async fn send(&mut self, command: MotorCommand) -> Result<()> {
        let Some(wire) = self.neato.motor.plan(command) else {
            return Ok(());
        };
        self.neato.conn()?.send_command(&wire.to_wire()).await?;
        self.neato.motor.commit(command);
        Ok(())
    }

    /// Replay the last requested command, e.g. after a dropped connection.
    pub async fn resend_last(&mut self) -> Result<()> {
        match self.neato.motor.last() {
            Some(last) => {
                debug!(?last, "Resending last motor command");
                self.send(last).await
            }
            None => Ok(()),
        }
    }

    /// Stop both wheels.
    pub async fn stop(&mut self) -> Result<()> {
        self.send(MotorCommand::STOP).await
    }

    pub fn last(&self) -> Option<MotorCommand> {
        self.neato.motor.last()
    }
}
