use crate::error::{Result, UplinkError};
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, Wifi};
use log::debug;
use std::thread::sleep;
use std::time::Duration;

/// Station credentials, fixed at compile time in the firmware image
#[derive(Copy, Clone, Debug)]
pub struct Credentials {
    ssid: &'static str,
    password: &'static str,
    auth_method: AuthMethod,
}

#[allow(dead_code)]
impl Credentials {
    pub fn new(ssid: &'static str, password: &'static str) -> Self {
        Self {
            ssid,
            password,
            auth_method: AuthMethod::WPA2Personal,
        }
    }

    /// Change the expected authentication method
    pub fn with_auth_method(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    pub fn client_configuration(&self) -> Result<ClientConfiguration> {
        Ok(ClientConfiguration {
            ssid: self
                .ssid
                .try_into()
                .map_err(|_| UplinkError::CredentialsError)?,
            password: self
                .password
                .try_into()
                .map_err(|_| UplinkError::CredentialsError)?,
            auth_method: self.auth_method,
            ..Default::default()
        })
    }
}

/// The slice of the platform WiFi driver the uplink needs. Every
/// `embedded_svc::wifi::Wifi` gets it for free.
pub trait WifiStation {
    type Error: core::fmt::Debug;

    fn configure(&mut self, config: &Configuration) -> core::result::Result<(), Self::Error>;
    fn start(&mut self) -> core::result::Result<(), Self::Error>;
    fn connect(&mut self) -> core::result::Result<(), Self::Error>;
    fn is_connected(&self) -> core::result::Result<bool, Self::Error>;
}

impl<W> WifiStation for W
    where
        W: Wifi,
{
    type Error = W::Error;

    fn configure(&mut self, config: &Configuration) -> core::result::Result<(), Self::Error> {
        self.set_configuration(config)
    }

    fn start(&mut self) -> core::result::Result<(), Self::Error> {
        Wifi::start(self)
    }

    fn connect(&mut self) -> core::result::Result<(), Self::Error> {
        Wifi::connect(self)
    }

    fn is_connected(&self) -> core::result::Result<bool, Self::Error> {
        Wifi::is_connected(self)
    }
}

/// Bounds the association wait instead of spinning forever
#[derive(Copy, Clone, Debug)]
pub struct JoinPolicy {
    max_polls: u32,
    poll_ms: u64,
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self {
            max_polls: 30,
            poll_ms: 1000,
        }
    }
}

#[allow(dead_code)]
impl JoinPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many times association is polled before giving up
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Sets the millisecond delay between association polls
    pub fn with_poll_interval(mut self, poll_ms: u64) -> Self {
        self.poll_ms = poll_ms;
        self
    }
}

/// Configures the station and blocks until it is associated or the
/// policy is exhausted
pub fn join<W>(wifi: &mut W, credentials: &Credentials, policy: &JoinPolicy) -> Result<()>
    where
        W: WifiStation,
{
    let config = Configuration::Client(credentials.client_configuration()?);

    wifi.configure(&config)
        .map_err(|_| UplinkError::WifiConfigError)?;
    wifi.start().map_err(|_| UplinkError::WifiStartError)?;
    wifi.connect().map_err(|_| UplinkError::WifiConnectError)?;

    for _ in 0..policy.max_polls {
        if wifi
            .is_connected()
            .map_err(|_| UplinkError::WifiConnectError)?
        {
            debug!("connected to the WiFi network");
            return Ok(());
        }
        debug!("waiting for association");
        sleep(Duration::from_millis(policy.poll_ms));
    }

    Err(UplinkError::WifiTimeoutError {
        polls: policy.max_polls,
    })
}
