use thiserror::Error;

pub type Result<T> = core::result::Result<T, UplinkError>;

#[derive(Error, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum UplinkError {
    #[error("Write I2C Error")]
    WriteI2CError,
    #[error("Write Read I2C Error")]
    WriteReadI2CError,
    #[error("Chip id register returned {found:#x} instead of the BME68X id")]
    UnknownChipIdError { found: u8 },
    #[error("SSID or password does not fit the station configuration")]
    CredentialsError,
    #[error("Applying the station configuration failed")]
    WifiConfigError,
    #[error("Starting the WiFi driver failed")]
    WifiStartError,
    #[error("Association request failed")]
    WifiConnectError,
    #[error("No association after {polls} polls")]
    WifiTimeoutError { polls: u32 },
    #[error("Output subscription rejected by the fusion engine")]
    SubscriptionError,
    #[error("Fusion engine fault (engine {engine}, sensor {sensor})")]
    FusionFaultError { engine: i32, sensor: i32 },
    #[error("Output batch is full")]
    OutputOverflowError,
    #[error("HTTP request could not be dispatched")]
    RequestError,
}
