pub mod bus;
pub mod error;
pub mod fusion;
pub mod output;
pub mod report;
pub mod transport;
pub mod wifi;

use error::Result;
use fusion::{FusionSensor, SampleRate};
use log::{debug, warn};
use output::OutputKind;
use report::Report;
use transport::Transport;

pub mod prelude {
    pub use super::{
        bus::Bme68xBus, bus::DeviceAddr, bus::Variant, error::UplinkError, fusion::FusionSensor,
        fusion::FusionStatus, fusion::SampleRate, output::Output, output::OutputKind,
        output::Outputs, report::Report, transport::HttpTransport, transport::Transport,
        wifi::Credentials, wifi::JoinPolicy, wifi::WifiStation, Uplink, DEFAULT_SUBSCRIPTION,
    };
}

/// The outputs the station subscribes to, in wire order
pub const DEFAULT_SUBSCRIPTION: [OutputKind; 7] = [
    OutputKind::Iaq,
    OutputKind::RawTemperature,
    OutputKind::RawPressure,
    OutputKind::RawHumidity,
    OutputKind::RawGasResistance,
    OutputKind::StabilizationStatus,
    OutputKind::RunInStatus,
];

/// Polls the fusion engine and uploads every reading batch to the
/// logging endpoint
#[derive(Debug)]
pub struct Uplink<S, T> {
    sensor: S,
    transport: T,
    endpoint: String,
    subscription: Vec<OutputKind>,
    rate: SampleRate,
}

impl<S, T> Uplink<S, T>
    where
        S: FusionSensor,
        T: Transport,
{
    pub fn new(sensor: S, transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            sensor,
            transport,
            endpoint: endpoint.into(),
            subscription: DEFAULT_SUBSCRIPTION.to_vec(),
            rate: SampleRate::default(),
        }
    }

    /// Replace the default subscription list
    pub fn with_subscription(mut self, kinds: &[OutputKind], rate: SampleRate) -> Self {
        self.subscription = kinds.to_vec();
        self.rate = rate;
        self
    }

    /// Requests the subscribed outputs from the engine
    pub fn begin(&mut self) -> Result<()> {
        self.sensor
            .subscribe(&self.subscription, self.rate)
            .map_err(|e| {
                self.sensor.status().log();
                e
            })
    }

    /// One pass of the polling loop: run the engine, serialize whatever
    /// arrived and dispatch it. `Ok(None)` means no new data was due.
    pub fn service(&mut self) -> Result<Option<u16>> {
        let outputs = self.sensor.run().map_err(|e| {
            self.sensor.status().log();
            e
        })?;

        let report = match Report::from_outputs(&outputs) {
            Some(report) => report,
            None => return Ok(None),
        };

        let url = report.url(&self.endpoint);
        debug!("url: {}", url);

        let status = self.transport.send(&url)?;
        Ok(Some(status))
    }

    /// The firmware main loop: faults are logged and polling continues
    /// regardless
    pub fn run_forever(&mut self) -> ! {
        loop {
            if let Err(e) = self.service() {
                warn!("uplink fault: {}", e);
            }
        }
    }

    /// Hands the sensor and transport back, the counterpart of
    /// `Bme68xBus::release` for reconfiguring or tearing down a station
    pub fn release(self) -> (S, T) {
        (self.sensor, self.transport)
    }
}
