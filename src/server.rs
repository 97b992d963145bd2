use embedded_hal::timer::CountDown;
use fugit::MillisDurationU32;

use crate::client::{send_checked, WifiClient};
use crate::driver::SocketDriver;
use crate::socket::{Protocol, Socket, SocketStatus};
use crate::util::timeout_iter::IntoTimeoutIter;
use crate::Error;

/// A server that listens for connections on a port of the WiFiNINA chip.
///
/// Create one with the port to listen on, call [`begin`](#method.begin) to
/// start listening, and then poll [`available`](#method.available) from your
/// main loop to pick up clients as they connect and send data.
///
/// The server only keeps track of socket numbers. All of the connection state
/// lives on the chip, so every method takes the driver as an argument.
#[derive(Debug)]
pub struct WifiServer {
    port: u16,
    protocol: Protocol,
    /// Listening socket. `None` until `begin` succeeds.
    sock: Option<Socket>,
    /// Most recent client handed out by `available`.
    last_sock: Option<Socket>,
}

impl WifiServer {
    /// Creates a TCP server for the given port. Doesn’t talk to the chip until
    /// [`begin`](#method.begin) is called.
    pub fn new(port: u16) -> Self {
        WifiServer::with_protocol(port, Protocol::Tcp)
    }

    pub fn with_protocol(port: u16, protocol: Protocol) -> Self {
        WifiServer {
            port,
            protocol,
            sock: None,
            last_sock: None,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The listening socket, if the server has started.
    pub fn socket(&self) -> Option<Socket> {
        self.sock
    }

    /// The client most recently returned by [`available`](#method.available).
    pub fn last_client(&self) -> Option<WifiClient> {
        self.last_sock.map(WifiClient::new)
    }

    /// Allocates a socket on the chip and starts listening on the configured
    /// port.
    ///
    /// If the chip has no sockets left, this returns
    /// [`NoSocketAvailable`](enum.Error.html#variant.NoSocketAvailable) and the
    /// server stays closed. Calling `begin` on a server that is already
    /// listening closes the old listener first.
    pub fn begin<D: SocketDriver>(&mut self, driver: &mut D) -> Result<(), Error<D::Error>> {
        if let Some(old) = self.sock {
            log::debug!("Restarting server, closing listener {:?}", old);
            driver.close(old).map_err(Error::driver)?;

            self.sock = None;
            self.last_sock = None;
        }

        let sock = match driver.allocate_socket().map_err(Error::driver)? {
            Some(sock) => sock,
            None => {
                log::warn!("No socket available to listen on port {}", self.port);
                return Err(Error::NoSocketAvailable);
            }
        };

        if let Err(err) = driver.start_listener(sock, self.port, self.protocol) {
            // Hand the socket back so the slot isn’t lost. The listener error
            // is the one worth reporting.
            driver.close(sock).ok();
            return Err(Error::driver(err));
        }

        log::debug!("Listening on port {} with {:?}", self.port, sock);
        self.sock = Some(sock);

        Ok(())
    }

    /// Changes the port and then calls [`begin`](#method.begin).
    pub fn begin_on<D: SocketDriver>(
        &mut self,
        driver: &mut D,
        port: u16,
    ) -> Result<(), Error<D::Error>> {
        self.port = port;
        self.begin(driver)
    }

    /// Polls for a client with data to read.
    ///
    /// The client returned last time is handed out again as long as it is
    /// still connected and has more data waiting. Otherwise we ask the chip
    /// whether a new client has connected.
    ///
    /// Returns [`WouldBlock`](nb::Error::WouldBlock) when there’s nobody to
    /// serve right now, so this works with [`nb::block!`].
    pub fn available<D: SocketDriver>(
        &mut self,
        driver: &mut D,
    ) -> Result<WifiClient, nb::Error<Error<D::Error>>> {
        let listener = match self.sock {
            Some(sock) => sock,
            None => return Err(nb::Error::Other(Error::NotListening)),
        };

        let mut sock = None;

        if let Some(last) = self.last_sock {
            // Pending data counts as connected, so this covers both checks.
            if WifiClient::new(last).has_data_available(driver)? {
                log::trace!("Reusing client {:?}", last);
                sock = Some(last);
            }
        }

        if sock.is_none() {
            sock = driver
                .poll_new_client(listener)
                .map_err(Error::driver)?;
        }

        match sock {
            Some(sock) => {
                log::trace!("Client ready on {:?}", sock);
                self.last_sock = Some(sock);
                Ok(WifiClient::new(sock))
            }
            None => Err(nb::Error::WouldBlock),
        }
    }

    /// Like [`available`](#method.available), but also returns the client’s
    /// connection status.
    pub fn available_with_status<D: SocketDriver>(
        &mut self,
        driver: &mut D,
    ) -> Result<(WifiClient, SocketStatus), nb::Error<Error<D::Error>>> {
        let client = self.available(driver)?;
        let status = client.status(driver)?;

        Ok((client, status))
    }

    /// Polls [`available`](#method.available) until a client shows up or the
    /// timer runs out.
    pub fn accept_timeout<D, C, CT>(
        &mut self,
        driver: &mut D,
        timer: &mut C,
        timeout: MillisDurationU32,
    ) -> Result<WifiClient, Error<D::Error>>
    where
        D: SocketDriver,
        C: CountDown<Time = CT>,
        CT: From<MillisDurationU32>,
    {
        for _ in timer.timeout_iter(timeout) {
            match self.available(driver) {
                Ok(client) => return Ok(client),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(err)) => return Err(err),
            }
        }

        Err(Error::AcceptTimeout)
    }

    /// Returns [`Closed`](enum.SocketStatus.html#variant.Closed) if the server
    /// has never started listening, otherwise asks the chip for the state of
    /// the listening socket.
    pub fn status<D: SocketDriver>(&self, driver: &mut D) -> Result<SocketStatus, Error<D::Error>> {
        match self.sock {
            None => Ok(SocketStatus::Closed),
            Some(sock) => driver.listener_state(sock).map_err(Error::driver),
        }
    }

    /// Sends data to every client connected to this server.
    ///
    /// An empty `buf` is always an error, whether or not the server is
    /// listening.
    pub fn write<D: SocketDriver>(
        &mut self,
        driver: &mut D,
        buf: &[u8],
    ) -> Result<usize, Error<D::Error>> {
        if buf.is_empty() {
            return Err(Error::NothingToWrite);
        }

        let sock = self.sock.ok_or(Error::NotListening)?;
        send_checked(driver, sock, buf)
    }

    pub fn write_byte<D: SocketDriver>(
        &mut self,
        driver: &mut D,
        b: u8,
    ) -> Result<usize, Error<D::Error>> {
        self.write(driver, &[b])
    }

    /// Closes the listening socket. The server can be started again with
    /// [`begin`](#method.begin).
    pub fn stop<D: SocketDriver>(&mut self, driver: &mut D) -> Result<(), Error<D::Error>> {
        if let Some(sock) = self.sock {
            driver.close(sock).map_err(Error::driver)?;
        }

        self.sock = None;
        self.last_sock = None;

        Ok(())
    }
}
