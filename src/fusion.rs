use crate::error::Result;
use crate::output::{OutputKind, Outputs};
use log::{debug, warn};

/// How often the fusion engine schedules a measurement cycle
#[allow(dead_code)]
#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub enum SampleRate {
    /// One cycle every 300 seconds
    UltraLowPower,
    /// One cycle every 3 seconds
    #[default]
    LowPower,
    /// One cycle every second
    Continuous,
}

impl SampleRate {
    /// The engine's rate constant in Hz
    pub fn hz(self) -> f32 {
        match self {
            SampleRate::UltraLowPower => 1.0 / 300.0,
            SampleRate::LowPower => 1.0 / 3.0,
            SampleRate::Continuous => 1.0,
        }
    }
}

/// Paired status codes of the fusion engine and the sensor underneath it.
/// Negative codes are errors, positive codes warnings, zero is clean.
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq)]
pub struct FusionStatus {
    pub engine: i32,
    pub sensor: i32,
}

#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

fn classify(code: i32) -> Severity {
    match code {
        0 => Severity::Ok,
        c if c < 0 => Severity::Error,
        _ => Severity::Warning,
    }
}

impl FusionStatus {
    pub fn new(engine: i32, sensor: i32) -> Self {
        Self { engine, sensor }
    }

    pub fn severity(&self) -> Severity {
        classify(self.engine).max(classify(self.sensor))
    }

    /// Logs whichever side is unhealthy and keeps going
    pub fn log(&self) {
        match classify(self.engine) {
            Severity::Error => warn!("fusion engine error code: {}", self.engine),
            Severity::Warning => debug!("fusion engine warning code: {}", self.engine),
            Severity::Ok => {}
        }
        match classify(self.sensor) {
            Severity::Error => warn!("sensor error code: {}", self.sensor),
            Severity::Warning => debug!("sensor warning code: {}", self.sensor),
            Severity::Ok => {}
        }
    }
}

/// Seam for the closed-source sensor-fusion engine. Implementations wrap
/// the licensed vendor library, or pass raw driver signals straight
/// through where no engine is linked in.
pub trait FusionSensor {
    /// Request the given outputs at the given rate
    fn subscribe(&mut self, kinds: &[OutputKind], rate: SampleRate) -> Result<()>;

    /// Advance the engine once. An empty batch means no new data was due
    /// this tick.
    fn run(&mut self) -> Result<Outputs>;

    fn status(&self) -> FusionStatus;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clean_status_is_silent() {
        assert_eq!(FusionStatus::new(0, 0).severity(), Severity::Ok);
    }

    #[test]
    fn negative_codes_are_errors() {
        assert_eq!(FusionStatus::new(-2, 0).severity(), Severity::Error);
        assert_eq!(FusionStatus::new(0, -1).severity(), Severity::Error);
    }

    #[test]
    fn positive_codes_are_warnings() {
        assert_eq!(FusionStatus::new(14, 0).severity(), Severity::Warning);
        assert_eq!(FusionStatus::new(0, 1).severity(), Severity::Warning);
    }

    #[test]
    fn error_outranks_warning() {
        assert_eq!(FusionStatus::new(14, -1).severity(), Severity::Error);
    }

    #[test]
    fn rates_match_engine_cycle_periods() {
        assert_eq!(SampleRate::UltraLowPower.hz(), 1.0 / 300.0);
        assert_eq!(SampleRate::LowPower.hz(), 1.0 / 3.0);
        assert_eq!(SampleRate::Continuous.hz(), 1.0);
        assert_eq!(SampleRate::default(), SampleRate::LowPower);
    }
}
