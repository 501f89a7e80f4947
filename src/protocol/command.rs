use atat::AtatCmd;
use embedded_hal::delay::DelayNs;

use super::MatchMode;
use crate::client::{Modem, TX_BUFFER_SIZE};
use crate::config::ModemConfig;
use crate::error::Error;
use crate::module_timing::{echo_settle_time, processing_time};
use crate::transport::Transport;

/// Expected answer shape of a command, together with the buffer receiving
/// the answer message where there is one.
pub enum Answer<'a> {
    /// Nothing is read back.
    None,
    /// A line starting with `OK`.
    Ok,
    /// One message into the buffer, then a line starting with `OK`.
    MsgOk(&'a mut [u8]),
    /// One message into the buffer, no `OK` follows.
    Msg(&'a mut [u8]),
}

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Send `cmd` terminated by a carriage return and collect its answer.
    ///
    /// With echo enabled the command must first come back verbatim. Returns
    /// true only when every expected piece of the answer was received; an
    /// `ERROR` line fails the exchange.
    pub fn send_at(&mut self, cmd: &str, answer: Answer<'_>) -> bool {
        debug!("-> {}", cmd);

        if let Err(e) = self
            .port
            .transport
            .send(cmd.as_bytes())
            .and_then(|_| self.port.transport.send(b"\r"))
        {
            error!("failed to send {}: {}", cmd, e);
            return false;
        }

        let mut answer = answer;
        let mut ok = true;
        let mut captured = false;

        if self.state.status.echo {
            if self.port.transport.send(b"\n").is_err() {
                return false;
            }
            self.port.pause(echo_settle_time());
            let keep = match &mut answer {
                Answer::MsgOk(msg) => Some(&mut **msg),
                _ => None,
            };
            (ok, captured) = self.check_echo(cmd, keep);
        }

        self.port.pause(processing_time());

        match answer {
            Answer::None => {}
            Answer::Ok => {
                let count = self.pending_count();
                ok = ok && self.search_for("OK", count, None, MatchMode::ErrorEqual);
            }
            Answer::MsgOk(msg) => {
                // After a lost echo the first line read already was the
                // message; it is kept in the caller's buffer.
                let received = captured || {
                    let count = self.pending_count();
                    self.port.read_message(msg, count) > 0
                };
                if ok && received {
                    let count = self.pending_count();
                    ok = self.search_for("OK", count, None, MatchMode::ErrorEqual);
                } else {
                    ok = false;
                }
            }
            Answer::Msg(msg) => {
                let count = self.pending_count();
                ok = ok && self.port.read_message(msg, count) > 0;
            }
        }

        if !ok {
            warn!("command {} failed", cmd);
        }
        ok
    }

    /// Serialize an AT command and run it through [`Modem::send_at`].
    pub fn send_cmd<A: AtatCmd>(&mut self, cmd: &A, answer: Answer<'_>) -> Result<bool, Error> {
        let mut buf = [0u8; TX_BUFFER_SIZE];
        let text = serialize(cmd, &mut buf)?;
        Ok(self.send_at(text, answer))
    }

    /// Look for the echo of `cmd`. When it never shows up, the first line
    /// read instead is copied into `keep`.
    ///
    /// Returns whether the echo was found and whether `keep` got a line.
    fn check_echo(&mut self, cmd: &str, mut keep: Option<&mut [u8]>) -> (bool, bool) {
        let count = self.pending_count();
        let mut first: Option<usize> = None;

        let found = self.port.search_with(
            cmd.as_bytes(),
            count,
            &mut self.scratch,
            MatchMode::ErrorEqual,
            |message| {
                if let (None, Some(msg)) = (first, keep.as_deref_mut()) {
                    let len = message.len().min(msg.len().saturating_sub(1));
                    msg[..len].copy_from_slice(&message[..len]);
                    if let Some(end) = msg.get_mut(len) {
                        *end = 0;
                    }
                    first = Some(len);
                }
            },
        );

        if found {
            if let (Some(_), Some(msg)) = (first, keep) {
                if let Some(start) = msg.first_mut() {
                    *start = 0;
                }
            }
        }

        (found, !found && first.is_some())
    }

    /// Lines already waiting plus one, used as the attempt count when
    /// looking for an answer.
    fn pending_count(&mut self) -> u8 {
        self.port.transport.pending_lines().saturating_add(1)
    }
}

/// Command text without its line terminator.
pub(crate) fn serialize<'b, A: AtatCmd>(
    cmd: &A,
    buf: &'b mut [u8; TX_BUFFER_SIZE],
) -> Result<&'b str, Error> {
    if A::MAX_LEN > buf.len() {
        error!("command needs {} bytes", A::MAX_LEN);
        return Err(Error::BufferTooSmall);
    }

    let len = cmd.write(buf);
    let text = core::str::from_utf8(&buf[..len]).map_err(|_| Error::BufferTooSmall)?;
    Ok(text.trim_end_matches(|c| c == '\r' || c == '\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::device_lock::GetPinStatus;
    use crate::command::ip_transport_layer::{types::TransparentMode, SetTransparentMode};
    use crate::command::AT;
    use crate::protocol::line;
    use crate::test_helpers::{modem, MockTransport};

    #[test]
    fn ok_answer_without_echo() {
        let mut transport = MockTransport::new();
        transport.reply("AT+CIPMODE=1", &["OK"]);
        let mut m = modem(transport);

        let sent = m
            .send_cmd(
                &SetTransparentMode {
                    mode: TransparentMode::Transparent,
                },
                Answer::Ok,
            )
            .unwrap();
        assert!(sent);
        assert_eq!(m.port.transport.sent(), "AT+CIPMODE=1\r");
    }

    #[test]
    fn ok_answer_with_echo() {
        let mut transport = MockTransport::new();
        transport.set_echo(true);
        transport.reply("AT", &["OK"]);
        let mut m = modem(transport);
        m.state.status.echo = true;

        assert!(m.send_cmd(&AT, Answer::Ok).unwrap());
        assert_eq!(m.port.transport.sent(), "AT\r\n");
    }

    #[test]
    fn missing_echo_fails() {
        let mut transport = MockTransport::new();
        transport.reply("AT", &["OK"]);
        let mut m = modem(transport);
        m.state.status.echo = true;

        assert!(!m.send_cmd(&AT, Answer::Ok).unwrap());
    }

    #[test]
    fn error_answer_fails() {
        let mut transport = MockTransport::new();
        transport.reply("AT+CPIN?", &["ERROR"]);
        let mut m = modem(transport);

        assert!(!m.send_at("AT+CPIN?", Answer::Ok));
    }

    #[test]
    fn message_then_ok() {
        let mut transport = MockTransport::new();
        transport.set_echo(true);
        transport.reply("AT+CPIN?", &["+CPIN: READY", "OK"]);
        let mut m = modem(transport);
        m.state.status.echo = true;

        let mut buf = [0u8; 20];
        assert!(m
            .send_cmd(&GetPinStatus, Answer::MsgOk(&mut buf))
            .unwrap());
        assert_eq!(line(&buf), b"+CPIN: READY");
    }

    #[test]
    fn message_is_kept_when_ok_is_missing() {
        let mut transport = MockTransport::new();
        transport.reply("AT+CGSN", &["861234567890123"]);
        let mut m = modem(transport);

        let mut buf = [0u8; 18];
        assert!(!m.send_at("AT+CGSN", Answer::MsgOk(&mut buf)));
        assert_eq!(line(&buf), b"861234567890123");
    }

    #[test]
    fn message_survives_lost_echo() {
        let mut transport = MockTransport::new();
        transport.reply("AT+CGSN", &["861234567890123", "OK"]);
        let mut m = modem(transport);
        m.state.status.echo = true;

        let mut buf = [0u8; 19];
        assert!(!m.send_at("AT+CGSN", Answer::MsgOk(&mut buf)));
        assert_eq!(line(&buf), b"861234567890123");
    }

    #[test]
    fn stray_line_before_echo_is_not_the_message() {
        let mut transport = MockTransport::new();
        transport.set_echo(true);
        transport.push_line("RING");
        transport.reply("AT+CGSN", &["861234567890123", "OK"]);
        let mut m = modem(transport);
        m.state.status.echo = true;

        let mut buf = [0u8; 19];
        assert!(m.send_at("AT+CGSN", Answer::MsgOk(&mut buf)));
        assert_eq!(line(&buf), b"861234567890123");
    }

    #[test]
    fn bare_message() {
        let mut transport = MockTransport::new();
        transport.reply("AT+CIFSR", &["10.170.3.14"]);
        let mut m = modem(transport);

        let mut buf = [0u8; 30];
        assert!(m.send_at("AT+CIFSR", Answer::Msg(&mut buf)));
        assert_eq!(line(&buf), b"10.170.3.14");
    }

    #[test]
    fn no_answer_expected() {
        let mut m = modem(MockTransport::new());
        assert!(m.send_at("AT+COPS?", Answer::None));
        assert!(!m.send_at("AT+COPS?", Answer::Ok));
    }
}
