//! Byte-oriented serial transport the driver talks through.
//!
//! The driver only needs line framing: the transport collects received bytes,
//! counts complete lines (terminated by `\n`) and hands them out one at a
//! time. The line counter is the only state a receive interrupt may update
//! behind the driver's back; the driver just reads it.

use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;

use crate::client::TX_BUFFER_SIZE;
use crate::error::Error;

pub trait Transport {
    /// Write `data` to the modem.
    fn send(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Read up to `buf.len()` raw bytes, regardless of line framing.
    fn receive_raw(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Number of complete lines waiting to be dequeued.
    fn pending_lines(&mut self) -> u8;

    fn line_ready(&mut self) -> bool {
        self.pending_lines() > 0
    }

    /// Copy the oldest complete line, terminator included, into `buf`.
    ///
    /// Bytes beyond `buf.len()` are dropped. Returns the number of bytes
    /// copied, or 0 when no line is ready.
    fn dequeue_line(&mut self, buf: &mut [u8]) -> usize;

    /// Discard everything received so far.
    fn clear(&mut self);

    /// Stop accepting received bytes, e.g. while the modem is powered down.
    fn suspend(&mut self);

    fn resume(&mut self);

    fn receive_capacity(&self) -> usize;

    fn transmit_capacity(&self) -> usize;
}

/// [`Transport`] over any blocking `embedded-io` serial port, with an `N`
/// bytes receive ring.
///
/// The port is drained into the ring every time the driver polls for lines.
pub struct BufferedTransport<S, const N: usize> {
    serial: S,
    rx: Deque<u8, N>,
    lines: u8,
    suspended: bool,
}

impl<S, const N: usize> BufferedTransport<S, N>
where
    S: Read + Write + ReadReady,
{
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            rx: Deque::new(),
            lines: 0,
            suspended: false,
        }
    }

    pub fn release(self) -> S {
        self.serial
    }

    fn pump(&mut self) {
        let mut chunk = [0u8; 16];

        loop {
            match self.serial.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(_) => {
                    warn!("serial port read_ready failed");
                    break;
                }
            }

            let n = match self.serial.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(_) => {
                    warn!("serial port read failed");
                    break;
                }
            };

            if self.suspended {
                continue;
            }

            for &byte in &chunk[..n] {
                self.push(byte);
            }
        }
    }

    fn push(&mut self, byte: u8) {
        if self.rx.push_back(byte).is_ok() {
            if byte == b'\n' {
                self.lines = self.lines.saturating_add(1);
            }
            return;
        }

        // Ring full: keep the framing by truncating the current line
        if byte == b'\n' {
            if let Some(last) = self.rx.back_mut() {
                if *last != b'\n' {
                    *last = b'\n';
                    self.lines = self.lines.saturating_add(1);
                }
            }
        }
    }

    fn pop(&mut self) -> Option<u8> {
        let byte = self.rx.pop_front()?;
        if byte == b'\n' {
            self.lines = self.lines.saturating_sub(1);
        }
        Some(byte)
    }
}

impl<S, const N: usize> Transport for BufferedTransport<S, N>
where
    S: Read + Write + ReadReady,
{
    fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        self.serial.write_all(data).map_err(|_| Error::Transport)?;
        self.serial.flush().map_err(|_| Error::Transport)
    }

    fn receive_raw(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.pump();

        let mut len = 0;
        for slot in buf.iter_mut() {
            match self.pop() {
                Some(byte) => {
                    *slot = byte;
                    len += 1;
                }
                None => break,
            }
        }
        Ok(len)
    }

    fn pending_lines(&mut self) -> u8 {
        self.pump();
        self.lines
    }

    fn dequeue_line(&mut self, buf: &mut [u8]) -> usize {
        self.pump();
        if self.lines == 0 {
            return 0;
        }

        let mut len = 0;
        while let Some(byte) = self.pop() {
            if let Some(slot) = buf.get_mut(len) {
                *slot = byte;
                len += 1;
            }
            if byte == b'\n' {
                break;
            }
        }
        len
    }

    fn clear(&mut self) {
        self.pump();
        self.rx.clear();
        self.lines = 0;
    }

    fn suspend(&mut self) {
        self.suspended = true;
    }

    fn resume(&mut self) {
        self.suspended = false;
    }

    fn receive_capacity(&self) -> usize {
        N
    }

    fn transmit_capacity(&self) -> usize {
        TX_BUFFER_SIZE
    }
}
