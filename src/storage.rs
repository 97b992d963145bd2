//! Files kept in the WiFiNINA co-processor’s flash.
//!
//! Available with firmware 1.4.0 and above. The firmware identifies files only
//! by name, and sends name lengths as a single byte, so names are limited to
//! 255 bytes.

#[cfg(feature = "genio-traits")]
use genio;

use core::convert::TryFrom;

use crate::driver::StorageDriver;
use crate::Error;

/// Longest file name the firmware accepts.
const MAX_FILENAME_LEN: usize = 255;

fn check_filename<E>(filename: &str) -> Result<(), Error<E>> {
    if filename.len() > MAX_FILENAME_LEN {
        Err(Error::FilenameTooLong(filename.len()))
    } else {
        Ok(())
    }
}

/// Operations on the co-processor’s filesystem.
///
/// There is no state here; each method takes the driver and passes the
/// request straight through after checking the file name.
pub struct WifiStorage;

impl WifiStorage {
    /// Opens a file, querying its size right away.
    ///
    /// Files that don’t exist yet can still be opened so that they can be
    /// created by writing to them. Check
    /// [`exists`](struct.WifiStorageFile.html#method.exists) to tell the
    /// difference.
    pub fn open<'a, D, N>(
        driver: &mut D,
        filename: &'a N,
    ) -> Result<WifiStorageFile<'a>, Error<D::Error>>
    where
        D: StorageDriver,
        N: AsRef<str> + ?Sized,
    {
        let mut file = WifiStorageFile::new::<D::Error>(filename.as_ref())?;
        file.refresh(driver)?;

        Ok(file)
    }

    /// Returns the size of the named file, or `None` if there isn’t one.
    pub fn exists<D: StorageDriver>(
        driver: &mut D,
        filename: &str,
    ) -> Result<Option<u32>, Error<D::Error>> {
        check_filename::<D::Error>(filename)?;
        driver.query_size(filename).map_err(Error::driver)
    }

    pub fn remove<D: StorageDriver>(driver: &mut D, filename: &str) -> Result<(), Error<D::Error>> {
        check_filename::<D::Error>(filename)?;
        driver.remove_file(filename).map_err(Error::driver)
    }

    pub fn rename<D: StorageDriver>(
        driver: &mut D,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), Error<D::Error>> {
        check_filename::<D::Error>(old_name)?;
        check_filename::<D::Error>(new_name)?;

        if driver
            .rename_file(old_name, new_name)
            .map_err(Error::driver)?
        {
            Ok(())
        } else {
            Err(Error::RenameFailed)
        }
    }

    /// Reads `buf.len()` bytes from the file starting at `offset`.
    pub fn read<D: StorageDriver>(
        driver: &mut D,
        filename: &str,
        offset: u32,
        buf: &mut [u8],
    ) -> Result<(), Error<D::Error>> {
        check_filename::<D::Error>(filename)?;
        driver
            .read_file(filename, offset, buf)
            .map_err(Error::driver)
    }

    pub fn write<D: StorageDriver>(
        driver: &mut D,
        filename: &str,
        offset: u32,
        data: &[u8],
    ) -> Result<(), Error<D::Error>> {
        check_filename::<D::Error>(filename)?;
        driver
            .write_file(filename, offset, data)
            .map_err(Error::driver)
    }

    /// Has the co-processor download `url` straight into a file. Returns the
    /// size of the downloaded file.
    pub fn download<D: StorageDriver>(
        driver: &mut D,
        url: &str,
        filename: &str,
    ) -> Result<u32, Error<D::Error>> {
        check_filename::<D::Error>(filename)?;

        match driver
            .download_file(url, filename)
            .map_err(Error::driver)?
        {
            0 => {
                log::warn!("Download of {} into {} failed", url, filename);
                Err(Error::DownloadFailed)
            }
            size => Ok(size),
        }
    }
}

/// Handle to a file on the co-processor, with a read/write position.
///
/// The size is recorded when the file is opened, and only updated when we
/// write past the end or call [`refresh`](#method.refresh). Changes to the
/// file made through other handles won’t show up until then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiStorageFile<'a> {
    filename: &'a str,
    offset: u32,
    length: u32,
    exists: bool,
}

impl<'a> WifiStorageFile<'a> {
    fn new<E>(filename: &'a str) -> Result<Self, Error<E>> {
        check_filename::<E>(filename)?;

        Ok(WifiStorageFile {
            filename,
            offset: 0,
            length: 0,
            exists: false,
        })
    }

    pub fn filename(&self) -> &'a str {
        self.filename
    }

    /// Size of the file when it was opened or last refreshed.
    pub fn size(&self) -> u32 {
        self.length
    }

    /// Whether the file existed when it was opened or last refreshed. Writing
    /// to the file also makes this true.
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn position(&self) -> u32 {
        self.offset
    }

    pub fn seek(&mut self, offset: u32) {
        self.offset = offset;
    }

    /// Whether there’s anything left to read past the current position.
    pub fn has_remaining(&self) -> bool {
        self.length > self.offset
    }

    /// Asks the co-processor for the current size of the file.
    pub fn refresh<D: StorageDriver>(&mut self, driver: &mut D) -> Result<u32, Error<D::Error>> {
        let size = driver.query_size(self.filename).map_err(Error::driver)?;

        self.exists = size.is_some();
        self.length = size.unwrap_or(0);

        Ok(self.length)
    }

    /// Reads from the current position, up to the end of the file as of the
    /// last size check. Returns 0 at the end of the file.
    pub fn read<D: StorageDriver>(
        &mut self,
        driver: &mut D,
        buf: &mut [u8],
    ) -> Result<usize, Error<D::Error>> {
        if self.offset >= self.length {
            return Ok(0);
        }

        let remaining = (self.length - self.offset) as usize;
        let len = core::cmp::min(remaining, buf.len());

        if len == 0 {
            return Ok(0);
        }

        driver
            .read_file(self.filename, self.offset, &mut buf[..len])
            .map_err(Error::driver)?;

        self.offset += len as u32;

        Ok(len)
    }

    /// Writes at the current position, extending the file if needed.
    pub fn write<D: StorageDriver>(
        &mut self,
        driver: &mut D,
        data: &[u8],
    ) -> Result<usize, Error<D::Error>> {
        if data.is_empty() {
            return Err(Error::NothingToWrite);
        }

        let end = u32::try_from(data.len())
            .ok()
            .and_then(|len| self.offset.checked_add(len))
            .ok_or(Error::FileTooLarge)?;

        driver
            .write_file(self.filename, self.offset, data)
            .map_err(Error::driver)?;

        self.offset = end;
        self.length = core::cmp::max(self.length, end);
        self.exists = true;

        Ok(data.len())
    }

    /// Deletes the file from the co-processor and rewinds this handle.
    pub fn erase<D: StorageDriver>(&mut self, driver: &mut D) -> Result<(), Error<D::Error>> {
        driver.remove_file(self.filename).map_err(Error::driver)?;

        self.offset = 0;
        self.length = 0;
        self.exists = false;

        Ok(())
    }

    /// Pairs this file with the driver so it can be used as a stream.
    pub fn stream<'d, D: StorageDriver>(self, driver: &'d mut D) -> FileStream<'a, 'd, D> {
        FileStream { file: self, driver }
    }
}

/// A [`WifiStorageFile`](struct.WifiStorageFile.html) that has borrowed the
/// driver, so that it can implement [`core::fmt::Write`] and, with the
/// `genio-traits` feature, `genio::Read` and `genio::Write`.
pub struct FileStream<'a, 'd, D> {
    file: WifiStorageFile<'a>,
    driver: &'d mut D,
}

impl<'a, 'd, D: StorageDriver> FileStream<'a, 'd, D> {
    pub fn file(&self) -> &WifiStorageFile<'a> {
        &self.file
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error<D::Error>> {
        self.file.read(self.driver, buf)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize, Error<D::Error>> {
        self.file.write(self.driver, data)
    }

    /// Gives back the file handle, with its position where the stream left it.
    pub fn into_file(self) -> WifiStorageFile<'a> {
        self.file
    }
}

impl<'a, 'd, D: StorageDriver> core::fmt::Write for FileStream<'a, 'd, D> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
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
impl<'a, 'd, D: StorageDriver> genio::Read for FileStream<'a, 'd, D> {
    type ReadError = Error<D::Error>;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::ReadError> {
        FileStream::read(self, buf)
    }
}

#[cfg(feature = "genio-traits")]
impl<'a, 'd, D: StorageDriver> genio::Write for FileStream<'a, 'd, D> {
    type WriteError = Error<D::Error>;
    type FlushError = void::Void;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::WriteError> {
        FileStream::write(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::FlushError> {
        Ok(())
    }

    fn size_hint(&mut self, _: usize) {}

    fn uses_size_hint(&self) -> bool {
        false
    }
}
