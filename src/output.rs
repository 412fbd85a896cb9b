use crate::error::{Result, UplinkError};

/// Largest batch the fusion engine hands back in one step
pub const MAX_OUTPUTS: usize = 16;

const NS_PER_MS: i64 = 1_000_000;

/// Virtual-sensor outputs the station can subscribe to, carrying the
/// engine's numeric ids
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
#[repr(u8)]
pub enum OutputKind {
    Iaq = 1,
    RawTemperature = 6,
    RawPressure = 7,
    RawHumidity = 8,
    RawGasResistance = 9,
    StabilizationStatus = 12,
    RunInStatus = 13,
}

impl OutputKind {
    /// Maps an engine output id back to a kind. Ids the station never
    /// subscribes to yield `None` and are skipped by the caller.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Iaq),
            6 => Some(Self::RawTemperature),
            7 => Some(Self::RawPressure),
            8 => Some(Self::RawHumidity),
            9 => Some(Self::RawGasResistance),
            12 => Some(Self::StabilizationStatus),
            13 => Some(Self::RunInStatus),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// A single processed reading from the fusion engine
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Output {
    pub kind: OutputKind,
    pub signal: f32,
    pub accuracy: u8,
    pub timestamp_ns: i64,
}

impl Output {
    pub fn new(kind: OutputKind, signal: f32, accuracy: u8, timestamp_ns: i64) -> Self {
        Self {
            kind,
            signal,
            accuracy,
            timestamp_ns,
        }
    }

    /// Engine timestamps are nanoseconds; the wire carries milliseconds
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ns / NS_PER_MS
    }
}

/// One batch of outputs, in the order the engine produced them
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    items: Vec<Output>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, output: Output) -> Result<()> {
        if self.items.len() >= MAX_OUTPUTS {
            return Err(UplinkError::OutputOverflowError);
        }
        self.items.push(output);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Output> {
        self.items.first()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Output> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Outputs {
    type Item = &'a Output;
    type IntoIter = core::slice::Iter<'a, Output>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn id_round_trip() {
        for kind in [
            OutputKind::Iaq,
            OutputKind::RawTemperature,
            OutputKind::RawPressure,
            OutputKind::RawHumidity,
            OutputKind::RawGasResistance,
            OutputKind::StabilizationStatus,
            OutputKind::RunInStatus,
        ] {
            assert_eq!(OutputKind::from_id(kind.id()), Some(kind));
        }
    }

    #[test]
    fn unknown_ids_are_skipped() {
        assert_eq!(OutputKind::from_id(0), None);
        assert_eq!(OutputKind::from_id(2), None);
        assert_eq!(OutputKind::from_id(255), None);
    }

    #[test]
    fn timestamp_truncates_to_milliseconds() {
        let output = Output::new(OutputKind::Iaq, 25.0, 3, 1_234_567_890);
        assert_eq!(output.timestamp_ms(), 1_234);
    }

    #[test]
    fn batch_rejects_overflow() {
        let mut outputs = Outputs::new();
        for _ in 0..MAX_OUTPUTS {
            outputs
                .push(Output::new(OutputKind::Iaq, 0.0, 0, 0))
                .unwrap();
        }
        assert_eq!(
            outputs.push(Output::new(OutputKind::Iaq, 0.0, 0, 0)),
            Err(UplinkError::OutputOverflowError)
        );
        assert_eq!(outputs.len(), MAX_OUTPUTS);
    }
}
