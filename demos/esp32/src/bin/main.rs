use anyhow::Result;
use bosch_bme680::{Bme680, Configuration as BmeConfiguration, DeviceAddress};
use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::i2c::{config::Config as I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use iaq_uplink::prelude::*;
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};

const WIFI_SSID: &str = env!("WIFI_SSID");
const WIFI_PASS: &str = env!("WIFI_PASS");
const ENDPOINT_URL: &str = env!("ENDPOINT_URL");

/// Forwards the raw BME68X signals through the fusion seam. The licensed
/// engine plugs into the same trait and adds the IAQ outputs.
struct RawPassthrough<'d> {
    driver: Bme680<I2cDriver<'d>, Delay>,
    subscription: Vec<OutputKind>,
    interval_ms: u32,
    last_fault: i32,
}

impl<'d> RawPassthrough<'d> {
    fn new(driver: Bme680<I2cDriver<'d>, Delay>) -> Self {
        Self {
            driver,
            subscription: Vec::new(),
            interval_ms: 3000,
            last_fault: 0,
        }
    }
}

impl FusionSensor for RawPassthrough<'_> {
    fn subscribe(&mut self, kinds: &[OutputKind], rate: SampleRate) -> iaq_uplink::error::Result<()> {
        self.subscription = kinds.to_vec();
        self.interval_ms = (1000.0 / rate.hz()) as u32;
        Ok(())
    }

    fn run(&mut self) -> iaq_uplink::error::Result<Outputs> {
        FreeRtos::delay_ms(self.interval_ms);

        let data = self.driver.measure().map_err(|_| {
            self.last_fault = -1;
            UplinkError::FusionFaultError {
                engine: 0,
                sensor: -1,
            }
        })?;
        self.last_fault = 0;

        let timestamp_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);

        let mut outputs = Outputs::new();
        for kind in &self.subscription {
            let signal = match kind {
                OutputKind::RawTemperature => Some(data.temperature),
                OutputKind::RawPressure => Some(data.pressure),
                OutputKind::RawHumidity => Some(data.humidity),
                OutputKind::RawGasResistance => data.gas_resistance,
                // Needs the licensed engine
                _ => None,
            };
            if let Some(signal) = signal {
                outputs.push(Output::new(*kind, signal, 0, timestamp_ns))?;
            }
        }
        Ok(outputs)
    }

    fn status(&self) -> FusionStatus {
        FusionStatus::new(0, self.last_fault)
    }
}

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    iaq_uplink::wifi::join(
        &mut wifi,
        &Credentials::new(WIFI_SSID, WIFI_PASS),
        &JoinPolicy::new(),
    )?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(400.kHz().into()),
    )?;

    let mut probe = Bme68xBus::new(i2c);
    let variant = probe.probe()?;
    info!("found BME68X variant {:?}", variant);

    let driver = Bme680::new(
        probe.release(),
        DeviceAddress::Secondary,
        Delay::new_default(),
        &BmeConfiguration::default(),
        20,
    )
    .map_err(|e| anyhow::anyhow!("BME68X init failed: {:?}", e))?;

    let transport = HttpTransport::new(EspHttpConnection::new(&HttpConfiguration {
        crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
        ..Default::default()
    })?);

    let mut uplink = Uplink::new(RawPassthrough::new(driver), transport, ENDPOINT_URL);
    uplink.begin()?;
    uplink.run_forever()
}
