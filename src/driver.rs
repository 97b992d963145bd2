//! Traits for the driver that actually talks to the WiFiNINA co-processor.
//!
//! Everything below this line (SPI framing, command encoding, the firmware’s
//! socket table) is the driver’s business. The facades in this crate only
//! ever call these methods, so any driver that can answer them will do.

use crate::socket::{Protocol, Socket, SocketStatus};

/// Socket commands of the WiFiNINA firmware, as seen by a TCP server.
pub trait SocketDriver {
    type Error;

    /// Asks the chip for an unused socket. `None` when it has run out.
    fn allocate_socket(&mut self) -> Result<Option<Socket>, Self::Error>;

    /// Starts listening on `port` using the given socket.
    fn start_listener(
        &mut self,
        socket: Socket,
        port: u16,
        protocol: Protocol,
    ) -> Result<(), Self::Error>;

    /// On a listening socket, hands out the socket of a client that is waiting
    /// to be served, if any.
    fn poll_new_client(&mut self, listener: Socket) -> Result<Option<Socket>, Self::Error>;

    /// State of a listening socket.
    fn listener_state(&mut self, listener: Socket) -> Result<SocketStatus, Self::Error>;

    /// State of a client socket.
    fn client_state(&mut self, socket: Socket) -> Result<SocketStatus, Self::Error>;

    /// Number of bytes waiting to be read from a client socket.
    fn available_data(&mut self, socket: Socket) -> Result<usize, Self::Error>;

    /// Reads waiting bytes into `buf`, returning how many were read.
    fn receive(&mut self, socket: Socket, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Queues `data` for sending, returning how many bytes the chip accepted.
    fn send(&mut self, socket: Socket, data: &[u8]) -> Result<usize, Self::Error>;

    /// Checks that the data from the last `send` actually went out.
    fn confirm_send_complete(&mut self, socket: Socket) -> Result<bool, Self::Error>;

    fn close(&mut self, socket: Socket) -> Result<(), Self::Error>;

    /// Remote IP address and port of a client socket.
    fn remote_endpoint(&mut self, socket: Socket) -> Result<([u8; 4], u16), Self::Error>;
}

/// File commands of the WiFiNINA firmware (1.4.0 and above), which keeps a
/// small filesystem in the ESP32’s flash.
pub trait StorageDriver {
    type Error;

    /// Size of the named file, or `None` if it doesn’t exist.
    fn query_size(&mut self, filename: &str) -> Result<Option<u32>, Self::Error>;

    /// Fills `buf` with the file’s contents starting at `offset`.
    fn read_file(&mut self, filename: &str, offset: u32, buf: &mut [u8])
        -> Result<(), Self::Error>;

    /// Writes `data` into the file at `offset`, creating the file if needed.
    fn write_file(&mut self, filename: &str, offset: u32, data: &[u8]) -> Result<(), Self::Error>;

    fn remove_file(&mut self, filename: &str) -> Result<(), Self::Error>;

    /// Returns false if the firmware refused the rename.
    fn rename_file(&mut self, old_name: &str, new_name: &str) -> Result<bool, Self::Error>;

    /// Has the chip fetch `url` into the named file. Returns the number of
    /// bytes stored, 0 on failure.
    fn download_file(&mut self, url: &str, filename: &str) -> Result<u32, Self::Error>;
}
