#[cfg(feature = "genio-traits")]
use genio;

use crate::driver::SocketDriver;
use crate::socket::{Socket, SocketStatus};
use crate::Error;

/// Sends `buf` on a socket and checks that the chip actually sent it.
///
/// Shared by servers (where the socket is the listener, so the data goes to
/// every connected client) and by individual clients.
pub(crate) fn send_checked<D: SocketDriver>(
    driver: &mut D,
    socket: Socket,
    buf: &[u8],
) -> Result<usize, Error<D::Error>> {
    if buf.is_empty() {
        return Err(Error::NothingToWrite);
    }

    let written = driver.send(socket, buf).map_err(Error::driver)?;

    if written == 0 {
        log::warn!("{:?} accepted none of {} bytes", socket, buf.len());
        return Err(Error::NothingSent);
    }

    if !driver
        .confirm_send_complete(socket)
        .map_err(Error::driver)?
    {
        log::warn!("{:?} did not confirm sending {} bytes", socket, written);
        return Err(Error::SendNotConfirmed(written));
    }

    Ok(written)
}

/// A client connection handed out by a [`WifiServer`](struct.WifiServer.html).
///
/// This is just a socket number; it’s cheap to copy and holds no reference to
/// the driver. Pass the driver in to each call, or use
/// [`connect`](#method.connect) to bundle the two together.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WifiClient {
    socket: Socket,
}

impl WifiClient {
    pub fn new(socket: Socket) -> Self {
        WifiClient { socket }
    }

    pub fn socket(&self) -> Socket {
        self.socket
    }

    /// The TCP state of the client’s socket, as reported by the chip.
    pub fn status<D: SocketDriver>(&self, driver: &mut D) -> Result<SocketStatus, Error<D::Error>> {
        driver.client_state(self.socket).map_err(Error::driver)
    }

    /// Number of bytes waiting to be read.
    pub fn available<D: SocketDriver>(&self, driver: &mut D) -> Result<usize, Error<D::Error>> {
        driver.available_data(self.socket).map_err(Error::driver)
    }

    pub fn has_data_available<D: SocketDriver>(
        &self,
        driver: &mut D,
    ) -> Result<bool, Error<D::Error>> {
        Ok(self.available(driver)? > 0)
    }

    /// A client with unread data counts as connected even if the remote end
    /// has already hung up, so that the data can still be read.
    pub fn is_connected<D: SocketDriver>(&self, driver: &mut D) -> Result<bool, Error<D::Error>> {
        if self.has_data_available(driver)? {
            return Ok(true);
        }

        Ok(self.status(driver)?.is_connected())
    }

    /// Reads available data into `buf`.
    ///
    /// Returns `Ok(0)` once the socket is closed and drained, and
    /// [`WouldBlock`](nb::Error::WouldBlock) if the connection is still up but
    /// nothing has arrived yet.
    pub fn read<D: SocketDriver>(
        &self,
        driver: &mut D,
        buf: &mut [u8],
    ) -> Result<usize, nb::Error<Error<D::Error>>> {
        if !self.has_data_available(driver)? {
            return match self.status(driver)? {
                SocketStatus::Closed => Ok(0),
                _ => Err(nb::Error::WouldBlock),
            };
        }

        Ok(driver
            .receive(self.socket, buf)
            .map_err(Error::driver)?)
    }

    pub fn write<D: SocketDriver>(
        &self,
        driver: &mut D,
        buf: &[u8],
    ) -> Result<usize, Error<D::Error>> {
        send_checked(driver, self.socket, buf)
    }

    pub fn write_byte<D: SocketDriver>(
        &self,
        driver: &mut D,
        b: u8,
    ) -> Result<usize, Error<D::Error>> {
        self.write(driver, &[b])
    }

    /// IP address and port of the remote end of the connection.
    pub fn remote_endpoint<D: SocketDriver>(
        &self,
        driver: &mut D,
    ) -> Result<([u8; 4], u16), Error<D::Error>> {
        driver
            .remote_endpoint(self.socket)
            .map_err(Error::driver)
    }

    /// Closes the connection.
    pub fn stop<D: SocketDriver>(self, driver: &mut D) -> Result<(), Error<D::Error>> {
        driver.close(self.socket).map_err(Error::driver)
    }

    /// Pairs this client with the driver so it can be used as a stream.
    pub fn connect<D: SocketDriver>(self, driver: &mut D) -> ConnectedClient<'_, D> {
        ConnectedClient {
            driver,
            client: self,
        }
    }
}

/// A [`WifiClient`](struct.WifiClient.html) that has borrowed the driver, so
/// that it can implement [`core::fmt::Write`] and, with the `genio-traits`
/// feature, `genio::Read` and `genio::Write`.
///
/// Unlike a client socket you’d open yourself, this does not close the
/// connection when dropped. The server may hand the same client out again on
/// its next [`available`](struct.WifiServer.html#method.available) call. Use
/// [`close`](#method.close) when you’re done with it.
pub struct ConnectedClient<'a, D> {
    driver: &'a mut D,
    client: WifiClient,
}

impl<'a, D: SocketDriver> ConnectedClient<'a, D> {
    pub fn client(&self) -> WifiClient {
        self.client
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, nb::Error<Error<D::Error>>> {
        self.client.read(self.driver, buf)
    }

    pub fn write(&mut self, buf: &[u8]) -> Result<usize, Error<D::Error>> {
        self.client.write(self.driver, buf)
    }

    pub fn is_connected(&mut self) -> Result<bool, Error<D::Error>> {
        self.client.is_connected(self.driver)
    }

    pub fn close(self) -> Result<(), Error<D::Error>> {
        self.client.stop(self.driver)
    }
}

impl<'a, D: SocketDriver> core::fmt::Write for ConnectedClient<'a, D> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        // write! breaks strings up around format arguments, which can give us
        // empty pieces.
        if s.is_empty() {
            return Ok(());
        }

        match self.write(s.as_bytes()) {
            Ok(_) => Ok(()),
            Err(_) => Err(core::fmt::Error),
        }
    }
}

#[cfg(feature = "genio-traits")]
impl<'a, D: SocketDriver> genio::Read for ConnectedClient<'a, D> {
    type ReadError = nb::Error<Error<D::Error>>;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::ReadError> {
        ConnectedClient::read(self, buf)
    }
}

#[cfg(feature = "genio-traits")]
impl<'a, D: SocketDriver> genio::Write for ConnectedClient<'a, D> {
    type WriteError = Error<D::Error>;
    type FlushError = void::Void;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::WriteError> {
        ConnectedClient::write(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::FlushError> {
        Ok(())
    }

    fn size_hint(&mut self, _: usize) {}

    fn uses_size_hint(&self) -> bool {
        false
    }
}
