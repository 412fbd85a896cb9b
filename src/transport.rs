use crate::error::{Result, UplinkError};
use embedded_svc::http::client::{Client, Connection};
use embedded_svc::http::Status;
use embedded_svc::io::Read;
use log::debug;

/// Seam for dispatching a finished report URL
pub trait Transport {
    /// Issues a GET for the URL and returns the HTTP status code
    fn send(&mut self, url: &str) -> Result<u16>;
}

/// GET dispatch over any `embedded-svc` HTTP client connection
pub struct HttpTransport<C>
    where
        C: Connection,
{
    client: Client<C>,
}

impl<C> HttpTransport<C>
    where
        C: Connection,
{
    pub fn new(connection: C) -> Self {
        Self {
            client: Client::wrap(connection),
        }
    }
}

impl<C> Transport for HttpTransport<C>
    where
        C: Connection,
{
    fn send(&mut self, url: &str) -> Result<u16> {
        let request = self.client.get(url).map_err(|_| UplinkError::RequestError)?;
        let mut response = request.submit().map_err(|_| UplinkError::RequestError)?;

        let status = response.status();
        debug!("http status code: {}", status);

        // Best effort, the endpoint's reply is only of debug interest
        let mut buffer = [0u8; 256];
        loop {
            match response.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(n) => debug!("payload: {}", String::from_utf8_lossy(&buffer[..n])),
            }
        }

        Ok(status)
    }
}
