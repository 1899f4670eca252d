use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::timeout;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info};

/// Default baud rate for the irradiance sensor's serial link.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Per-line read timeout, matching the device's 1 Hz-ish output cadence.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// One validated sample from the device: `<voltage>,<irradiance>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub voltage: f64,
    pub irradiance: f64,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: tokio_serial::Error,
    },
    #[error("device read timed out after {0:?}")]
    Timeout(Duration),
    #[error("device stream closed")]
    Disconnected,
    #[error("device i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads validated sensor samples from a serial device.
///
/// The port is opened lazily on the first read and reused across calls.
/// Any read failure drops the handle so the next call reconnects from
/// scratch. Retry cadence is the caller's responsibility.
pub struct SensorReader {
    port_path: String,
    baud_rate: u32,
    read_timeout: Duration,
    port: Option<BufReader<SerialStream>>,
}

impl SensorReader {
    pub fn new(port_path: String, baud_rate: u32) -> Self {
        Self {
            port_path,
            baud_rate,
            read_timeout: DEFAULT_READ_TIMEOUT,
            port: None,
        }
    }

    /// Reads lines until one parses as a valid `SensorReading`.
    ///
    /// Malformed lines are logged and skipped without surfacing to the
    /// caller; only device-level problems (open failure, timeout, stream
    /// end, i/o error) are returned.
    pub async fn read_reading(&mut self) -> Result<SensorReading, ReadError> {
        let result = self.next_valid_reading().await;
        if result.is_err() {
            // Force a reconnect on the next attempt
            self.port = None;
        }
        result
    }

    async fn next_valid_reading(&mut self) -> Result<SensorReading, ReadError> {
        if self.port.is_none() {
            let stream = tokio_serial::new(&self.port_path, self.baud_rate)
                .open_native_async()
                .map_err(|source| ReadError::Open {
                    path: self.port_path.clone(),
                    source,
                })?;
            info!(
                port = %self.port_path,
                baud = self.baud_rate,
                "opened serial connection to sensor"
            );
            self.port = Some(BufReader::new(stream));
        }

        let port = match self.port.as_mut() {
            Some(port) => port,
            None => return Err(ReadError::Disconnected),
        };
        next_reading_from(port, self.read_timeout).await
    }
}

/// Core read loop over any buffered line source.
///
/// Factored out of `SensorReader` so the skip-and-continue policy can be
/// exercised without hardware.
async fn next_reading_from<R>(
    source: &mut R,
    read_timeout: Duration,
) -> Result<SensorReading, ReadError>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let mut line = String::new();
        let bytes_read = timeout(read_timeout, source.read_line(&mut line))
            .await
            .map_err(|_| ReadError::Timeout(read_timeout))??;
        if bytes_read == 0 {
            return Err(ReadError::Disconnected);
        }

        let line = line.trim();
        debug!(raw = line, "device line");
        match parse_sensor_line(line) {
            Some(reading) => {
                debug!(
                    voltage = reading.voltage,
                    irradiance = reading.irradiance,
                    "parsed sensor reading"
                );
                return Ok(reading);
            }
            None => {
                debug!(raw = line, "skipping malformed device line");
            }
        }
    }
}

/// Parses one device line of the form `<voltage>,<irradiance>`.
///
/// Both fields must be non-negative decimals: digits with at most one
/// decimal point, no sign, no exponent. Anything else yields `None`.
pub fn parse_sensor_line(line: &str) -> Option<SensorReading> {
    let mut fields = line.trim().split(',');
    let (voltage, irradiance) = match (fields.next(), fields.next(), fields.next()) {
        (Some(voltage), Some(irradiance), None) => (voltage, irradiance),
        _ => return None,
    };
    if !is_unsigned_decimal(voltage) || !is_unsigned_decimal(irradiance) {
        return None;
    }
    Some(SensorReading {
        voltage: voltage.parse().ok()?,
        irradiance: irradiance.parse().ok()?,
    })
}

fn is_unsigned_decimal(field: &str) -> bool {
    field.chars().all(|c| c.is_ascii_digit() || c == '.')
        && field.chars().filter(|c| *c == '.').count() <= 1
        && field.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn parses_plain_integers() {
        let reading = parse_sensor_line("12,800").unwrap();
        assert_eq!(reading.voltage, 12.0);
        assert_eq!(reading.irradiance, 800.0);
    }

    #[test]
    fn parses_decimals() {
        let reading = parse_sensor_line("12.5,800.25").unwrap();
        assert_eq!(reading.voltage, 12.5);
        assert_eq!(reading.irradiance, 800.25);
    }

    #[test]
    fn parses_zero_values() {
        let reading = parse_sensor_line("0,0.0").unwrap();
        assert_eq!(reading.voltage, 0.0);
        assert_eq!(reading.irradiance, 0.0);
    }

    #[test]
    fn parses_bare_decimal_points() {
        // ".5" and "5." are still digits-plus-one-dot
        let reading = parse_sensor_line(".5,5.").unwrap();
        assert_eq!(reading.voltage, 0.5);
        assert_eq!(reading.irradiance, 5.0);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let reading = parse_sensor_line("  3.3,450\r\n").unwrap();
        assert_eq!(reading.voltage, 3.3);
        assert_eq!(reading.irradiance, 450.0);
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert_eq!(parse_sensor_line("abc,def"), None);
        assert_eq!(parse_sensor_line("12.5,watts"), None);
    }

    #[test]
    fn rejects_wrong_field_counts() {
        assert_eq!(parse_sensor_line("12.5"), None);
        assert_eq!(parse_sensor_line("1,2,3"), None);
        assert_eq!(parse_sensor_line(""), None);
    }

    #[test]
    fn rejects_empty_fields() {
        assert_eq!(parse_sensor_line("12.5,"), None);
        assert_eq!(parse_sensor_line(",800"), None);
        assert_eq!(parse_sensor_line(","), None);
        assert_eq!(parse_sensor_line(".,5"), None);
    }

    #[test]
    fn rejects_signs_and_exponents() {
        assert_eq!(parse_sensor_line("-1,5"), None);
        assert_eq!(parse_sensor_line("1,+5"), None);
        assert_eq!(parse_sensor_line("1e3,5"), None);
    }

    #[test]
    fn rejects_multiple_decimal_points() {
        assert_eq!(parse_sensor_line("1.2.3,5"), None);
    }

    #[test]
    fn rejects_inner_whitespace() {
        // Fields are not trimmed individually
        assert_eq!(parse_sensor_line("1, 2"), None);
    }

    #[tokio::test]
    async fn skips_garbage_until_valid_line() {
        let input = b"garbage\nabc,def\n1,2,3\n12.5,800\n" as &[u8];
        let mut source = BufReader::new(input);
        let reading = next_reading_from(&mut source, DEFAULT_READ_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(reading.voltage, 12.5);
        assert_eq!(reading.irradiance, 800.0);
    }

    #[tokio::test]
    async fn returns_disconnected_at_stream_end() {
        let input = b"not,a,reading\n" as &[u8];
        let mut source = BufReader::new(input);
        let err = next_reading_from(&mut source, DEFAULT_READ_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Disconnected));
    }

    #[tokio::test]
    async fn returns_disconnected_on_empty_stream() {
        let mut source = BufReader::new(b"" as &[u8]);
        let err = next_reading_from(&mut source, DEFAULT_READ_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Disconnected));
    }

    #[tokio::test]
    async fn returns_io_error_on_invalid_utf8() {
        let input = b"\xff\xfe\n" as &[u8];
        let mut source = BufReader::new(input);
        let err = next_reading_from(&mut source, DEFAULT_READ_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
    }

    #[tokio::test]
    async fn times_out_when_no_line_arrives() {
        let (_keep_open, silent) = tokio::io::duplex(64);
        let mut source = BufReader::new(silent);
        let err = next_reading_from(&mut source, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Timeout(_)));
    }
}
