/// Number of a socket slot on the WiFiNINA chip.
///
/// The firmware uses 255 to mean "no socket." We never hand that value around
/// as a `Socket`; absence is an `Option<Socket>` instead.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Socket {
    num: u8,
}

impl Socket {
    /// The raw socket number the firmware replies with when it has no socket
    /// to give out, or no client waiting.
    pub const NONE_NUM: u8 = 255;

    /// Wraps a raw socket number. Driver implementations should prefer
    /// [`from_raw`](#method.from_raw) so that 255 doesn’t sneak through.
    pub const fn new(num: u8) -> Self {
        Socket { num }
    }

    /// Converts a raw firmware reply into a socket, mapping the 255 sentinel
    /// to `None`.
    pub fn from_raw(num: u8) -> Option<Self> {
        if num == Self::NONE_NUM {
            None
        } else {
            Some(Socket::new(num))
        }
    }

    pub fn num(&self) -> u8 {
        self.num
    }
}

impl core::fmt::Debug for Socket {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter<'_>,
    ) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "Socket[{}]", self.num)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Protocol {
    Tcp = 0,
    Udp = 1,
    Tls = 2,
    UdpMulticast = 3,
}

impl Into<u8> for Protocol {
    fn into(self) -> u8 {
        self as u8
    }
}

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SocketStatus {
    Closed = 0,
    Listen = 1,
    SynSent = 2,
    SynReceived = 3,
    Established = 4,
    FinWait1 = 5,
    FinWait2 = 6,
    CloseWait = 7,
    Closing = 8,
    LastAck = 9,
    TimeWait = 10,

    UnknownStatus = 255,
}

impl SocketStatus {
    /// Whether a socket in this state can still carry data for a client.
    ///
    /// Matches the firmware library’s notion of "connected": everything except
    /// the listening, handshaking, and tearing-down states.
    pub fn is_connected(self) -> bool {
        match self {
            SocketStatus::Listen
            | SocketStatus::Closed
            | SocketStatus::FinWait1
            | SocketStatus::FinWait2
            | SocketStatus::TimeWait
            | SocketStatus::SynSent
            | SocketStatus::SynReceived
            | SocketStatus::CloseWait => false,
            _ => true,
        }
    }
}

impl From<u8> for SocketStatus {
    fn from(s: u8) -> Self {
        match s {
            0 => SocketStatus::Closed,
            1 => SocketStatus::Listen,
            2 => SocketStatus::SynSent,
            3 => SocketStatus::SynReceived,
            4 => SocketStatus::Established,
            5 => SocketStatus::FinWait1,
            6 => SocketStatus::FinWait2,
            7 => SocketStatus::CloseWait,
            8 => SocketStatus::Closing,
            9 => SocketStatus::LastAck,
            10 => SocketStatus::TimeWait,

            _ => SocketStatus::UnknownStatus,
        }
    }
}

impl Into<u8> for SocketStatus {
    fn into(self) -> u8 {
        self as u8
    }
}
