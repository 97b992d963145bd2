//! In-memory stand-ins for the WiFiNINA driver and a `CountDown` timer, used by
//! the unit tests in each module.

use std::collections::{HashMap, VecDeque};

use embedded_hal::timer::CountDown;
use fugit::MillisDurationU32;
use void::Void;

use crate::driver::{SocketDriver, StorageDriver};
use crate::socket::{Protocol, Socket, SocketStatus};

#[derive(Debug, PartialEq)]
pub struct FakeError;

/// Timer that reports "not yet" a fixed number of times before firing.
pub struct FakeTimer {
    remaining: usize,
    pub started_with: Option<MillisDurationU32>,
}

impl FakeTimer {
    pub fn new(ticks: usize) -> Self {
        FakeTimer {
            remaining: ticks,
            started_with: None,
        }
    }
}

impl CountDown for FakeTimer {
    type Time = MillisDurationU32;

    fn start<T>(&mut self, count: T)
    where
        T: Into<Self::Time>,
    {
        self.started_with = Some(count.into());
    }

    fn wait(&mut self) -> nb::Result<(), Void> {
        if self.remaining == 0 {
            Ok(())
        } else {
            self.remaining -= 1;
            Err(nb::Error::WouldBlock)
        }
    }
}

/// A pretend co-processor. Tests poke at the public fields to set up the
/// chip’s state and to check which commands were issued.
pub struct FakeDriver {
    /// Every call returns `Err(FakeError)` while this is set.
    pub broken: bool,

    pub free_sockets: VecDeque<u8>,
    pub listeners: Vec<(u8, u16, Protocol)>,
    pub listener_states: HashMap<u8, SocketStatus>,
    pub client_states: HashMap<u8, SocketStatus>,
    /// Clients that will be handed out by `poll_new_client`, in order.
    pub waiting_clients: VecDeque<u8>,
    pub polls: usize,
    pub incoming: HashMap<u8, Vec<u8>>,
    pub data_queries: usize,
    pub sent: Vec<(u8, Vec<u8>)>,
    /// Caps how many bytes a single `send` accepts.
    pub send_limit: Option<usize>,
    pub confirm_sends: bool,
    pub closed: Vec<u8>,
    pub refuse_listen: bool,
    pub refuse_close: bool,

    pub files: HashMap<String, Vec<u8>>,
    pub downloads: HashMap<String, Vec<u8>>,
    pub size_queries: usize,
    pub refuse_renames: bool,
}

impl FakeDriver {
    pub fn new() -> Self {
        FakeDriver {
            broken: false,
            free_sockets: (0..4).collect(),
            listeners: Vec::new(),
            listener_states: HashMap::new(),
            client_states: HashMap::new(),
            waiting_clients: VecDeque::new(),
            polls: 0,
            incoming: HashMap::new(),
            data_queries: 0,
            sent: Vec::new(),
            send_limit: None,
            confirm_sends: true,
            closed: Vec::new(),
            refuse_listen: false,
            refuse_close: false,
            files: HashMap::new(),
            downloads: HashMap::new(),
            size_queries: 0,
            refuse_renames: false,
        }
    }

    /// Puts a client in the accept queue, already established and with the
    /// given bytes waiting to be read.
    pub fn connect_client(&mut self, num: u8, data: &[u8]) {
        self.waiting_clients.push_back(num);
        self.client_states.insert(num, SocketStatus::Established);
        self.incoming.insert(num, data.to_vec());
    }

    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(|f| f.as_slice())
    }

    pub fn put_file(&mut self, name: &str, contents: &[u8]) {
        self.files.insert(name.to_string(), contents.to_vec());
    }

    fn check(&self) -> Result<(), FakeError> {
        if self.broken {
            Err(FakeError)
        } else {
            Ok(())
        }
    }
}

impl SocketDriver for FakeDriver {
    type Error = FakeError;

    fn allocate_socket(&mut self) -> Result<Option<Socket>, FakeError> {
        self.check()?;
        Ok(self.free_sockets.pop_front().map(Socket::new))
    }

    fn start_listener(
        &mut self,
        socket: Socket,
        port: u16,
        protocol: Protocol,
    ) -> Result<(), FakeError> {
        self.check()?;
        if self.refuse_listen {
            return Err(FakeError);
        }
        self.listeners.push((socket.num(), port, protocol));
        self.listener_states
            .insert(socket.num(), SocketStatus::Listen);
        Ok(())
    }

    fn poll_new_client(&mut self, _listener: Socket) -> Result<Option<Socket>, FakeError> {
        self.check()?;
        self.polls += 1;
        Ok(self.waiting_clients.pop_front().map(Socket::new))
    }

    fn listener_state(&mut self, listener: Socket) -> Result<SocketStatus, FakeError> {
        self.check()?;
        Ok(*self
            .listener_states
            .get(&listener.num())
            .unwrap_or(&SocketStatus::Closed))
    }

    fn client_state(&mut self, socket: Socket) -> Result<SocketStatus, FakeError> {
        self.check()?;
        Ok(*self
            .client_states
            .get(&socket.num())
            .unwrap_or(&SocketStatus::Closed))
    }

    fn available_data(&mut self, socket: Socket) -> Result<usize, FakeError> {
        self.check()?;
        self.data_queries += 1;
        Ok(self.incoming.get(&socket.num()).map_or(0, |d| d.len()))
    }

    fn receive(&mut self, socket: Socket, buf: &mut [u8]) -> Result<usize, FakeError> {
        self.check()?;
        let data = self.incoming.entry(socket.num()).or_default();
        let len = buf.len().min(data.len());
        buf[..len].copy_from_slice(&data[..len]);
        *data = data.split_off(len);
        Ok(len)
    }

    fn send(&mut self, socket: Socket, data: &[u8]) -> Result<usize, FakeError> {
        self.check()?;
        let len = self.send_limit.map_or(data.len(), |l| l.min(data.len()));
        self.sent.push((socket.num(), data[..len].to_vec()));
        Ok(len)
    }

    fn confirm_send_complete(&mut self, _socket: Socket) -> Result<bool, FakeError> {
        self.check()?;
        Ok(self.confirm_sends)
    }

    fn close(&mut self, socket: Socket) -> Result<(), FakeError> {
        self.check()?;
        if self.refuse_close {
            return Err(FakeError);
        }
        self.closed.push(socket.num());
        self.listener_states.remove(&socket.num());
        self.client_states
            .insert(socket.num(), SocketStatus::Closed);
        Ok(())
    }

    fn remote_endpoint(&mut self, socket: Socket) -> Result<([u8; 4], u16), FakeError> {
        self.check()?;
        Ok(([192, 168, 1, socket.num()], 40_000 + socket.num() as u16))
    }
}

impl StorageDriver for FakeDriver {
    type Error = FakeError;

    fn query_size(&mut self, filename: &str) -> Result<Option<u32>, FakeError> {
        self.check()?;
        self.size_queries += 1;
        Ok(self.files.get(filename).map(|f| f.len() as u32))
    }

    fn read_file(&mut self, filename: &str, offset: u32, buf: &mut [u8]) -> Result<(), FakeError> {
        self.check()?;
        let file = self.files.get(filename).ok_or(FakeError)?;
        let start = offset as usize;
        let end = start + buf.len();
        if end > file.len() {
            return Err(FakeError);
        }
        buf.copy_from_slice(&file[start..end]);
        Ok(())
    }

    fn write_file(&mut self, filename: &str, offset: u32, data: &[u8]) -> Result<(), FakeError> {
        self.check()?;
        let file = self.files.entry(filename.to_string()).or_default();
        let start = offset as usize;
        if file.len() < start + data.len() {
            file.resize(start + data.len(), 0);
        }
        file[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn remove_file(&mut self, filename: &str) -> Result<(), FakeError> {
        self.check()?;
        self.files.remove(filename);
        Ok(())
    }

    fn rename_file(&mut self, old_name: &str, new_name: &str) -> Result<bool, FakeError> {
        self.check()?;
        if self.refuse_renames {
            return Ok(false);
        }
        match self.files.remove(old_name) {
            Some(contents) => {
                self.files.insert(new_name.to_string(), contents);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn download_file(&mut self, url: &str, filename: &str) -> Result<u32, FakeError> {
        self.check()?;
        match self.downloads.get(url) {
            Some(contents) => {
                let contents = contents.clone();
                let len = contents.len() as u32;
                self.files.insert(filename.to_string(), contents);
                Ok(len)
            }
            None => Ok(0),
        }
    }
}
