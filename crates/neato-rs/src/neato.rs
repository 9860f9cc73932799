use neato_proto::frame::Responses;
use neato_proto::scan::decode_scan;
use neato_proto::types::Command;
use neato_proto::{Connection, DriverConfig, LaserScan, NeatoError, Result, SensorState};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::{ControlApi, MotorApi};
use crate::motor::MotorDebouncer;
use crate::sensors::{
    self, AccelReading, Accelerometer, AnalogReading, AnalogSensors, Charger, ChargerReading,
    DigitalReading, DigitalSensors, Odometry, OdometryReading, Sensor,
};

/// A driver session for one robot.
///
/// Telemetry is pulled in by [`request_scan()`](Self::request_scan), which
/// replaces the responses of the previous cycle; the readers then decode
/// whatever that datagram carried and fall back to last known values.
///
/// # Example
/// ```no_run
/// # async fn example() -> neato_proto::Result<()> {
/// use neato_rs::{DriverConfig, Neato};
/// use tokio_util::sync::CancellationToken;
///
/// let mut neato = Neato::new(DriverConfig::new("192.168.1.20"))
///     .connect(&CancellationToken::new())
///     .await?;
/// neato.request_scan().await?;
/// let scan = neato.scan();
/// let odom = neato.motors()?;
/// neato.motor().set(100.0, 100.0, 50.0).await?;
/// neato.exit().await?;
/// # Ok(())
/// # }
/// ```
pub struct Neato {
    config: DriverConfig,
    connection: Option<Connection>,
    responses: Responses,
    state: SensorState,
    pub(crate) motor: MotorDebouncer,
}

impl Neato {
    /// Create a session handle. Does not connect; call [`connect()`](Self::connect).
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            connection: None,
            responses: Responses::new(),
            state: SensorState::new(),
            motor: MotorDebouncer::new(),
        }
    }

    /// Create a session over an already-open connection, skipping the startup sequence.
    pub fn with_connection(config: DriverConfig, connection: Connection) -> Self {
        let mut neato = Self::new(config);
        neato.connection = Some(connection);
        neato
    }

    /// Connect, then put the robot in test mode and spin up the laser.
    ///
    /// Cancelling `cancel` aborts while the control channel is still being established.
    pub async fn connect(mut self, cancel: &CancellationToken) -> Result<Self> {
        let conn = Connection::open(&self.config, cancel).await?;
        self.connection = Some(conn);

        let delay = self.config.startup_delay();
        tokio::time::sleep(delay).await;
        self.control().test_mode(true).await?;
        tokio::time::sleep(delay).await;
        self.control().lds_rotation(true).await?;
        info!("Neato ready: test mode on, laser spinning");
        Ok(self)
    }

    /// Returns the connection, or an error if not connected.
    pub(crate) fn conn(&mut self) -> Result<&mut Connection> {
        self.connection
            .as_mut()
            .ok_or_else(|| NeatoError::Disconnected("Not connected to Neato".into()))
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Stop the laser and leave test mode. Nothing is awaited from the robot.
    ///
    /// Both writes are attempted; the first failure is returned.
    pub async fn exit(&mut self) -> Result<()> {
        let lds = self.control().lds_rotation(false).await;
        let test_mode = self.control().test_mode(false).await;
        lds.and(test_mode)?;
        info!("Neato released");
        Ok(())
    }

    /// Drop the connection without sending anything.
    pub fn disconnect(&mut self) {
        self.connection = None;
        info!("Disconnected from Neato");
    }

    // --- telemetry ---

    /// Pull one telemetry datagram. A quiet cycle leaves no responses.
    pub async fn request_scan(&mut self) -> Result<()> {
        self.responses = self.conn()?.poll_telemetry().await?;
        Ok(())
    }

    /// Ask the robot for `command` explicitly, for setups where nothing else schedules requests.
    pub async fn request(&mut self, command: Command) -> Result<()> {
        self.conn()?.send_command(command.name()).await
    }

    /// Responses from the last telemetry cycle.
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    /// Replace the current responses, e.g. with a datagram received elsewhere.
    pub fn set_responses(&mut self, responses: Responses) {
        self.responses = responses;
    }

    /// All field values seen so far.
    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// The filtered laser scan of the current cycle, or an empty scan if none arrived.
    pub fn scan(&self) -> LaserScan {
        let Some(body) = self.responses.get(Command::GetLdsScan) else {
            return LaserScan::default();
        };
        let mut scan = decode_scan(body);
        self.config.filter.apply(&mut scan);
        scan
    }

    /// Decode `sensor`'s response of this cycle, if any, and read it.
    pub fn read<S: Sensor>(&mut self, sensor: &S) -> Result<S::Reading> {
        sensors::poll(sensor, &self.responses, &mut self.state)
    }

    /// Wheel positions and speeds.
    pub fn motors(&mut self) -> Result<OdometryReading> {
        self.read(&Odometry)
    }

    pub fn accel(&mut self) -> Result<AccelReading> {
        self.read(&Accelerometer)
    }

    pub fn digital_sensors(&mut self) -> Result<DigitalReading> {
        self.read(&DigitalSensors)
    }

    pub fn analog_sensors(&mut self) -> Result<AnalogReading> {
        self.read(&AnalogSensors)
    }

    pub fn charger(&mut self) -> Result<ChargerReading> {
        self.read(&Charger)
    }

    // --- API accessors ---

    /// Access the mode switches (test mode, laser rotation, backlight).
    pub fn control(&mut self) -> ControlApi<'_> {
        ControlApi { neato: self }
    }

    /// Access the wheel motors.
    pub fn motor(&mut self) -> MotorApi<'_> {
        MotorApi { neato: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::{MotionState, MotorCommand};
    use neato_proto::RetryPolicy;
    use std::fmt::Write;
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, UdpSocket};

    fn test_config(port: u16) -> DriverConfig {
        DriverConfig {
            control_port: port,
            telemetry_bind: "127.0.0.1".into(),
            telemetry_port: 0,
            startup_delay_ms: 0,
            retry: RetryPolicy {
                interval_ms: 10,
                max_attempts: Some(3),
            },
            ..DriverConfig::default()
        }
    }

    /// A robot that records everything written to its control port.
    async fn mock_robot() -> (u16, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = String::new();
            stream.read_to_string(&mut received).await.unwrap();
            received
        });
        (port, handle)
    }

    fn scan_record() -> String {
        let mut body = String::from("getldsscan\r\nAngleInDegrees,DistInMM,Intensity,ErrorCodeHEX\r\n");
        for angle in 0..360 {
            let range = if angle == 90 { 6000 } else { 1500 };
            writeln!(body, "{angle},{range},200,0\r").unwrap();
        }
        body
    }

    async fn deliver(neato: &mut Neato, datagram: &[u8]) {
        let robot = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = neato.conn().unwrap().telemetry_addr();
        robot.send_to(datagram, addr).await.unwrap();
        for _ in 0..50 {
            neato.request_scan().await.unwrap();
            if !neato.responses().is_empty() {
                return;
            }
        }
        panic!("telemetry datagram never arrived");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (port, robot) = mock_robot().await;
        let mut neato = Neato::new(test_config(port))
            .connect(&CancellationToken::new())
            .await
            .unwrap();

        let mut datagram = scan_record().into_bytes();
        datagram.push(0x1a);
        datagram.extend_from_slice(b"getmotors\r\nParameter,Value\r\nLeftWheel_PositionInMM,10\r\nRightWheel_PositionInMM,12\r\nLeftWheel_Speed,5\r\nRightWheel_Speed,6\r\n");
        deliver(&mut neato, &datagram).await;

        let scan = neato.scan();
        assert_eq!(scan.len(), 360);
        assert_eq!(scan.ranges[0], 1.5);
        assert_eq!(scan.ranges[90], 0.0);
        assert_eq!(scan.intensities[90], 0.0);

        let odom = neato.motors().unwrap();
        assert_eq!((odom.left_position_mm, odom.right_speed), (10, 6));

        // Quiet cycle: no fresh data, stale odometry, empty scan.
        neato.request_scan().await.unwrap();
        assert!(neato.scan().is_empty());
        assert_eq!(neato.motors().unwrap(), odom);

        neato.motor().set(5.0, 5.0, 5.0).await.unwrap();
        neato.motor().stop().await.unwrap();
        neato.motor().set(0.0, 0.0, 0.0).await.unwrap();
        neato.motor().resend_last().await.unwrap();
        neato.motor().set(3.0, 3.0, 3.0).await.unwrap();
        neato.control().backlight(true).await.unwrap();
        neato.request(Command::GetCharger).await.unwrap();
        neato.exit().await.unwrap();
        drop(neato);

        assert_eq!(
            robot.await.unwrap(),
            "testmode on\n\
             setldsrotation on\n\
             setmotor 5 5 5\n\
             setmotor 1 1 1\n\
             setmotor 3 3 3\n\
             setled backlighton\n\
             getcharger\n\
             setldsrotation off\n\
             testmode off\n"
        );
    }

    async fn open_connection(port: u16) -> Connection {
        Connection::open(&test_config(port), &CancellationToken::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_stop_is_retried_after_reconnect() {
        let (port, robot) = mock_robot().await;
        let mut neato = Neato::new(test_config(port));
        neato.motor.debounce(MotorCommand::new(5, 5, 5));

        let err = neato.motor().stop().await.unwrap_err();
        assert!(matches!(err, NeatoError::Disconnected(_)));
        assert_eq!(neato.motor.state(), MotionState::Moving);
        assert_eq!(neato.motor().last(), Some(MotorCommand::new(5, 5, 5)));

        neato.connection = Some(open_connection(port).await);
        neato.motor().stop().await.unwrap();
        neato.motor().stop().await.unwrap();
        drop(neato);

        assert_eq!(robot.await.unwrap(), "setmotor 1 1 1\n");
    }

    #[tokio::test]
    async fn test_with_connection_skips_startup() {
        let (port, robot) = mock_robot().await;
        let mut neato = Neato::with_connection(test_config(port), open_connection(port).await);
        assert!(neato.is_connected());

        neato.motor().set(2.0, 2.0, 2.0).await.unwrap();
        neato.disconnect();
        assert!(!neato.is_connected());

        assert_eq!(robot.await.unwrap(), "setmotor 2 2 2\n");
    }

    #[tokio::test]
    async fn test_exit_disconnected() {
        let mut neato = Neato::new(DriverConfig::default());
        let err = neato.exit().await.unwrap_err();
        assert!(matches!(err, NeatoError::Disconnected(_)));
    }

    #[tokio::test]
    async fn test_not_connected() {
        let mut neato = Neato::new(DriverConfig::default());
        assert!(!neato.is_connected());
        let err = neato.motor().set(1.0, 1.0, 1.0).await.unwrap_err();
        assert!(matches!(err, NeatoError::Disconnected(_)));
        assert!(neato.scan().is_empty());
    }

    #[tokio::test]
    async fn test_readers_without_socket() {
        let mut neato = Neato::new(DriverConfig::default());
        neato.set_responses(neato_proto::frame::split_datagram(
            b"getaccel\r\nLabel,Value\r\nPitchInDegrees,0.5\r\nRollInDegrees,0.0\r\nXInG,0.0\r\nYInG,0.0\r\nZInG,1.0\r\nSumInG,1.0\r\n",
        ));
        assert_eq!(neato.accel().unwrap().pitch_deg, 0.5);
        assert!(matches!(neato.charger(), Err(NeatoError::FieldNotPopulated(_))));
    }
}
