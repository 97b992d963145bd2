//! This library provides Arduino-style TCP server and file storage objects
//! for WiFiNINA-based ESP32 Wi-Fi coprocessors.
//!
//! WiFiNINA originates in the Arduino project. These co-processors are also
//! marketed as “AirLift” by Adafruit and are found in the Adafruit PyPortal.
//!
//! This crate doesn’t speak SPI itself. Instead, it sits on top of a driver
//! that implements [`SocketDriver`](trait.SocketDriver.html) and/or
//! [`StorageDriver`](trait.StorageDriver.html), and turns those low-level
//! commands into:
//!
//! * [`WifiServer`](struct.WifiServer.html), which listens on a port and hands
//!   out [`WifiClient`](struct.WifiClient.html)s as clients connect
//! * [`WifiStorage`](struct.WifiStorage.html), which opens files kept in the
//!   co-processor’s flash as [`WifiStorageFile`](struct.WifiStorageFile.html)s
//!
//! Like the driver, every object here takes a mutable reference to the driver
//! when you call its methods rather than holding on to it.
//!
//! ```ignore
//! let mut server = WifiServer::new(80);
//! server.begin(&mut driver)?;
//!
//! loop {
//!     match server.available(&mut driver) {
//!         Ok(client) => {
//!             let mut client = client.connect(&mut driver);
//!             write!(client, "HTTP/1.1 200 OK\r\n\r\nHello!")?;
//!             client.close()?;
//!         }
//!         Err(nb::Error::WouldBlock) => {}
//!         Err(nb::Error::Other(err)) => return Err(err),
//!     }
//! }
//! ```
//!
//! If you use [`genio`](https://docs.rs/genio/)’s [`io`](std::io) replacements,
//! you can use the `genio-traits` feature to generate `Read` and `Write`
//! implementations for [`ConnectedClient`](struct.ConnectedClient.html) and
//! [`FileStream`](struct.FileStream.html).
//!
//! Diagnostics go through the [`log`](https://docs.rs/log/) facade.

#![cfg_attr(not(test), no_std)]

mod client;
mod driver;
mod server;
mod socket;
mod storage;
mod util;

#[cfg(test)]
mod test_support;

pub use client::{ConnectedClient, WifiClient};
pub use driver::{SocketDriver, StorageDriver};
pub use server::WifiServer;
pub use socket::{Protocol, Socket, SocketStatus};
pub use storage::{FileStream, WifiStorage, WifiStorageFile};

#[derive(Debug, PartialEq)]
pub enum Error<DriverError> {
    /// The WiFiNINA chip is out of internal sockets to give out, so a server
    /// could not start listening.
    NoSocketAvailable,
    /// The server was used before [`begin`](struct.WifiServer.html#method.begin)
    /// succeeded, or after it was stopped.
    NotListening,
    /// A write was attempted with an empty buffer.
    NothingToWrite,
    /// The chip accepted none of the bytes we asked it to send.
    NothingSent,
    /// The chip accepted this many bytes but could not confirm they were sent.
    SendNotConfirmed(usize),
    /// No client connected before the timeout passed to
    /// [`accept_timeout`](struct.WifiServer.html#method.accept_timeout) ran out.
    AcceptTimeout,
    /// The file name is longer than the 255 bytes the firmware can take.
    FilenameTooLong(usize),
    /// Writing this much at the current position would take the file past
    /// the 4GiB the firmware can address.
    FileTooLarge,
    /// The firmware refused to rename a file.
    RenameFailed,
    /// The firmware stored nothing for a download request.
    DownloadFailed,

    /// There was an error in the underlying driver.
    Driver(DriverError),
    /// Marker that a [`core::fmt::Error`](core::fmt::Error) occurred.
    /// Unfortunately, that error wraps any underlying error that might have
    /// been raised over the course of doing a write! to e.g. a
    /// [`ConnectedClient`](struct.ConnectedClient.html).
    FormatError,
}

impl<DriverError> Error<DriverError> {
    /// Convenience function for passing to [`map_err`](core::Result#map_err).
    /// (We can’t use the [`From`](core::convert::From) trait because
    /// `DriverError` is fully parameterized.)
    fn driver(err: DriverError) -> Error<DriverError> {
        Error::Driver(err)
    }
}

impl<DriverError> core::convert::From<core::fmt::Error> for Error<DriverError> {
    fn from(_: core::fmt::Error) -> Error<DriverError> {
        // All FormatErrors are the same (they indicate swallowing an I/O error)
        // so we don’t need to include the input argument in this output.
        Error::FormatError
    }
}
