use neato_proto::Result;

use crate::neato::Neato;

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Mode switches of the robot. All commands are fire-and-forget.
pub struct ControlApi<'a> {
    pub(crate) neato: &'a mut Neato,
}

impl ControlApi<'_> {
    /// Enter or leave test mode. Motor and laser commands only work in test mode.
    pub async fn test_mode(&mut self, on: bool) -> Result<()> {
        self.neato
            .conn()?
            .send_command(&format!("testmode {}", on_off(on)))
            .await
    }

    /// Start or stop the laser distance sensor's rotation.
    pub async fn lds_rotation(&mut self, on: bool) -> Result<()> {
        self.neato
            .conn()?
            .send_command(&format!("setldsrotation {}", on_off(on)))
            .await
    }

    /// Switch the LCD backlight.
    pub async fn backlight(&mut self, on: bool) -> Result<()> {
        let led = if on { "backlighton" } else { "backlightoff" };
        self.neato
            .conn()?
            .send_command(&format!("setled {led}"))
            .await
    }
}
