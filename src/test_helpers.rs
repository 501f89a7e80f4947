//! Scripted modem and board doubles shared by the unit tests.

use core::cell::Cell;
use core::convert::Infallible;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use atat::AtatCmd;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::client::Modem;
use crate::config::ModemConfig;
use crate::error::Error;
use crate::transport::Transport;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wire text of a command, line terminator included.
pub fn serialize<A: AtatCmd>(cmd: &A) -> String {
    let mut buf = [0u8; 256];
    let len = cmd.write(&mut buf);
    String::from_utf8(buf[..len].to_vec()).unwrap()
}

/// Modem double answering commands from a script.
///
/// Every reply line is framed as `\r\n<line>\r\n`. Commands are echoed back
/// when echo is on, the same way a SIM900 interleaves echo and answer. `ATE0`
/// and `ATE1` toggle the echo, `AT&F` restores it.
#[derive(Default)]
pub struct MockTransport {
    rx: VecDeque<u8>,
    lines: u8,
    echo: bool,
    typed: Vec<u8>,
    replies: HashMap<String, VecDeque<Vec<String>>>,
    sent: Vec<u8>,
    commands: Vec<String>,
    clears: usize,
    suspended: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        init_logger();
        Self::default()
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Queue the answer to the next occurrence of `cmd`. The last queued
    /// answer is repeated for every further occurrence.
    pub fn reply(&mut self, cmd: &str, lines: &[&str]) {
        self.replies
            .entry(cmd.into())
            .or_default()
            .push_back(lines.iter().map(|l| String::from(*l)).collect());
    }

    /// Replace every queued answer to `cmd`.
    pub fn set_reply(&mut self, cmd: &str, lines: &[&str]) {
        self.replies.remove(cmd);
        self.reply(cmd, lines);
    }

    /// Unsolicited line, framed like a reply.
    pub fn push_line(&mut self, line: &str) {
        self.push_raw(b"\r\n");
        self.push_raw(line.as_bytes());
        self.push_raw(b"\r\n");
    }

    pub fn push_raw(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.rx.push_back(b);
            if b == b'\n' {
                self.lines += 1;
            }
        }
    }

    /// Everything written by the driver.
    pub fn sent(&self) -> String {
        String::from_utf8_lossy(&self.sent).into_owned()
    }

    /// Commands in the order they were issued, `+++` included.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn count(&self, cmd: &str) -> usize {
        self.commands.iter().filter(|c| *c == cmd).count()
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn execute(&mut self, cmd: String) {
        if self.echo {
            self.push_raw(cmd.as_bytes());
            self.push_raw(b"\r");
        }

        match cmd.as_str() {
            "ATE0" => self.echo = false,
            "ATE1" => self.echo = true,
            c if c.starts_with("AT&F") => self.echo = true,
            _ => {}
        }

        let answer = self.replies.get_mut(&cmd).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });
        for line in answer.unwrap_or_default() {
            self.push_line(&line);
        }

        self.commands.push(cmd);
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        self.sent.extend_from_slice(data);

        for &b in data {
            match b {
                b'\r' => {
                    if self.typed.is_empty() {
                        if self.echo {
                            self.push_raw(b"\r");
                        }
                    } else {
                        let cmd = String::from_utf8_lossy(&self.typed).into_owned();
                        self.typed.clear();
                        self.execute(cmd);
                    }
                }
                b'\n' => {
                    if self.echo {
                        self.push_raw(b"\n");
                    }
                }
                _ => {
                    self.typed.push(b);
                    if self.typed == b"+++" {
                        self.typed.clear();
                        if self.echo {
                            self.push_raw(b"+++");
                        }
                        self.commands.push("+++".into());
                    }
                }
            }
        }
        Ok(())
    }

    fn receive_raw(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    if b == b'\n' {
                        self.lines -= 1;
                    }
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn pending_lines(&mut self) -> u8 {
        self.lines
    }

    fn dequeue_line(&mut self, buf: &mut [u8]) -> usize {
        if self.lines == 0 {
            return 0;
        }
        let mut len = 0;
        while let Some(b) = self.rx.pop_front() {
            if len < buf.len() {
                buf[len] = b;
                len += 1;
            }
            if b == b'\n' {
                self.lines -= 1;
                break;
            }
        }
        len
    }

    fn clear(&mut self) {
        self.rx.clear();
        self.lines = 0;
        self.clears += 1;
    }

    fn suspend(&mut self) {
        self.suspended = true;
    }

    fn resume(&mut self) {
        self.suspended = false;
    }

    fn receive_capacity(&self) -> usize {
        64
    }

    fn transmit_capacity(&self) -> usize {
        64
    }
}

/// Delay provider counting virtual time instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    elapsed_ns: u64,
}

impl MockDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

/// GPIO double; clones share the same level and history.
#[derive(Clone, Default)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
    edges: Rc<Cell<usize>>,
}

impl MockPin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.level.set(high);
        pin
    }

    pub fn is_set_high(&self) -> bool {
        self.level.get()
    }

    /// Number of level changes driven through [`OutputPin`].
    pub fn edges(&self) -> usize {
        self.edges.get()
    }

    fn drive(&self, high: bool) {
        if self.level.get() != high {
            self.edges.set(self.edges.get() + 1);
        }
        self.level.set(high);
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

pub struct TestConfig<const E: bool = true> {
    pub power: Option<MockPin>,
    pub status: Option<MockPin>,
}

impl<const E: bool> Default for TestConfig<E> {
    fn default() -> Self {
        Self {
            power: Some(MockPin::new(false)),
            status: None,
        }
    }
}

impl<const E: bool> ModemConfig for TestConfig<E> {
    type PowerPin = MockPin;
    type StatusPin = MockPin;

    const ECHO: bool = E;

    fn power_pin(&mut self) -> Option<&mut Self::PowerPin> {
        self.power.as_mut()
    }

    fn status_pin(&mut self) -> Option<&mut Self::StatusPin> {
        self.status.as_mut()
    }
}

pub type TestModem<const E: bool = true> = Modem<MockTransport, MockDelay, TestConfig<E>>;

pub fn modem(transport: MockTransport) -> TestModem {
    Modem::new(transport, MockDelay::default(), TestConfig::default())
}

pub fn modem_with<const E: bool>(
    transport: MockTransport,
    config: TestConfig<E>,
) -> TestModem<E> {
    Modem::new(transport, MockDelay::default(), config)
}
