// Rust guideline compliant 2026-02-06

//! HTML mail delivery over plain SMTP.

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

/// SMTP server used when none is given.
pub const DEFAULT_SMTP_SERVER: &str = "localhost";

const DEFAULT_SMTP_PORT: u16 = 25;
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Bytes of text per RFC 2047 encoded word, keeping each word within 75 chars.
const ENCODED_WORD_BYTES: usize = 45;

/// An HTML mail message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mail {
    /// Sender address.
    pub from: String,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients, listed in the `Cc` header.
    pub cc: Vec<String>,
    /// Blind-copy recipients, never listed in a header.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body: String,
}

impl Mail {
    /// Creates a message without cc or bcc recipients.
    pub fn new(
        from: impl Into<String>,
        to: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to,
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Sets the cc recipients.
    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    /// Sets the bcc recipients.
    pub fn with_bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    /// Envelope recipients: to, then cc, then bcc.
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .collect()
    }

    /// Renders the message with CRLF line endings, headers first.
    ///
    /// A non-ASCII subject is sent as RFC 2047 encoded words.
    ///
    /// # Errors
    ///
    /// Returns an error if a header value contains a line break.
    pub fn to_message(&self) -> Result<String> {
        let mut headers = vec![
            format!("Subject: {}", encode_header(header_value("Subject", &self.subject)?)),
            format!("From: {}", header_value("From", &self.from)?),
            format!("To: {}", header_value("To", &self.to.join(","))?),
        ];
        if !self.cc.is_empty() {
            headers.push(format!("Cc: {}", header_value("Cc", &self.cc.join(","))?));
        }
        headers.push(format!("Date: {}", chrono::Local::now().to_rfc2822()));
        headers.push("MIME-Version: 1.0".to_string());
        headers.push("Content-Type: text/html; charset=\"utf-8\"".to_string());
        headers.push("Content-Transfer-Encoding: 8bit".to_string());

        let body: Vec<&str> = self.body.lines().collect();
        Ok(format!("{}\r\n\r\n{}\r\n", headers.join("\r\n"), body.join("\r\n")))
    }
}

fn header_value<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.contains(['\r', '\n']) {
        return Err(Error::Smtp(format!("line break in {} header", name)));
    }
    Ok(value)
}

/// Base64 encoded words for non-ASCII text, folded one word per line.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }
    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in value.chars() {
        if chunk.len() + c.len_utf8() > ENCODED_WORD_BYTES {
            words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(&chunk)));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(&chunk)));
    }
    words.join("\r\n ")
}

/// Sends `mail` through the SMTP server at `smtp_server` (`host` or `host:port`).
///
/// # Errors
///
/// Returns an error if:
/// - The message has no recipients
/// - The server cannot be reached
/// - The server rejects any step of the conversation
pub fn send_mail(mail: &Mail, smtp_server: &str) -> Result<()> {
    let recipients = mail.recipients();
    if recipients.is_empty() {
        return Err(Error::Smtp("no recipients".to_string()));
    }
    for address in std::iter::once(mail.from.as_str()).chain(recipients.iter().copied()) {
        header_value("address", address)?;
    }
    let message = mail.to_message()?;

    let (host, port) = split_server(smtp_server)?;
    let stream = TcpStream::connect((host, port))?;
    stream.set_read_timeout(Some(SMTP_TIMEOUT))?;
    stream.set_write_timeout(Some(SMTP_TIMEOUT))?;

    let mut session = Session {
        reader: BufReader::new(stream.try_clone()?),
        writer: stream,
    };

    session.expect_reply(220)?;
    if session.command("EHLO localhost", 250).is_err() {
        session.command("HELO localhost", 250)?;
    }
    session.command(&format!("MAIL FROM:<{}>", mail.from), 250)?;
    for rcpt in &recipients {
        session.command(&format!("RCPT TO:<{}>", rcpt), 250)?;
    }
    session.command("DATA", 354)?;
    session.send_data(&message)?;
    session.expect_reply(250)?;
    let _ = session.command("QUIT", 221);

    tracing::info!(
        "Sent mail '{}' to {} recipient(s) via {}",
        mail.subject,
        recipients.len(),
        smtp_server
    );
    Ok(())
}

/// Splits `host`, `host:port` or `[v6addr]:port`; a bare IPv6 address keeps the default port.
fn split_server(server: &str) -> Result<(&str, u16)> {
    let invalid = || Error::Smtp(format!("invalid SMTP port in '{}'", server));
    if let Some(rest) = server.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| Error::Smtp(format!("unclosed '[' in '{}'", server)))?;
        return match tail.strip_prefix(':') {
            Some(port) => Ok((host, port.parse().map_err(|_| invalid())?)),
            None if tail.is_empty() => Ok((host, DEFAULT_SMTP_PORT)),
            None => Err(invalid()),
        };
    }
    match server.split_once(':') {
        Some((host, port)) if !port.contains(':') => {
            Ok((host, port.parse().map_err(|_| invalid())?))
        }
        _ => Ok((server, DEFAULT_SMTP_PORT)),
    }
}

struct Session {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Session {
    /// Reads one (possibly multi-line) reply and checks its code class.
    fn expect_reply(&mut self, code: u16) -> Result<String> {
        let mut text = String::new();
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(Error::Smtp("connection closed by server".to_string()));
            }
            let line = line.trim_end();
            let reply: u16 = line
                .get(..3)
                .and_then(|c| c.parse().ok())
                .ok_or_else(|| Error::Smtp(format!("malformed reply: {}", line)))?;
            text.push_str(line.get(4..).unwrap_or(""));
            if line.as_bytes().get(3) == Some(&b'-') {
                text.push('\n');
                continue;
            }
            // 250 and 251 are both positive completions for RCPT.
            if reply / 100 != code / 100 {
                return Err(Error::Smtp(format!("expected {}, got {}: {}", code, reply, text)));
            }
            return Ok(text);
        }
    }

    fn command(&mut self, line: &str, code: u16) -> Result<String> {
        write!(self.writer, "{}\r\n", line)?;
        self.writer.flush()?;
        self.expect_reply(code)
    }

    fn send_data(&mut self, message: &str) -> Result<()> {
        for line in message.split("\r\n") {
            if line.starts_with('.') {
                self.writer.write_all(b".")?;
            }
            write!(self.writer, "{}\r\n", line)?;
        }
        self.writer.write_all(b".\r\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    /// Minimal SMTP server recording every line it receives.
    fn fake_server(reject_rcpt: bool) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;
            let mut seen = Vec::new();
            writer.write_all(b"220 fake ready\r\n").unwrap();
            let mut in_data = false;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                let line = line.trim_end_matches("\r\n").to_string();
                seen.push(line.clone());
                if in_data {
                    if line == "." {
                        in_data = false;
                        writer.write_all(b"250 queued\r\n").unwrap();
                    }
                    continue;
                }
                let reply: &[u8] = if line.starts_with("EHLO") {
                    b"250-fake\r\n250 SIZE 1000\r\n"
                } else if line.starts_with("RCPT") && reject_rcpt {
                    b"550 no such user\r\n"
                } else if line == "DATA" {
                    in_data = true;
                    b"354 go ahead\r\n"
                } else if line == "QUIT" {
                    writer.write_all(b"221 bye\r\n").unwrap();
                    break;
                } else {
                    b"250 ok\r\n"
                };
                writer.write_all(reply).unwrap();
            }
            seen
        });
        (addr, handle)
    }

    fn sample_mail() -> Mail {
        Mail::new(
            "unittest@example.com",
            vec!["user1@example.com".to_string()],
            "Unit Test Email Subject",
            "<p>Unit Test Email Body</p>\n.hidden dot line",
        )
        .with_cc(vec!["user2@example.com".to_string()])
        .with_bcc(vec!["user3@example.com".to_string()])
    }

    #[test]
    fn test_recipients_order() {
        assert_eq!(
            sample_mail().recipients(),
            vec!["user1@example.com", "user2@example.com", "user3@example.com"]
        );
    }

    #[test]
    fn test_message_headers() {
        let message = sample_mail().to_message().unwrap();
        assert!(message.contains("Subject: Unit Test Email Subject\r\n"));
        assert!(message.contains("To: user1@example.com\r\n"));
        assert!(message.contains("Cc: user2@example.com\r\n"));
        assert!(message.contains("Content-Type: text/html"));
        assert!(!message.contains("user3@example.com"));
    }

    #[test]
    fn test_line_break_in_header_is_rejected() {
        let mut mail = sample_mail();
        mail.subject = "Deploy\r\nBcc: leak@example.com".to_string();
        assert!(matches!(mail.to_message(), Err(Error::Smtp(_))));

        let mail = sample_mail().with_cc(vec!["a@example.com\nX-Injected: 1".to_string()]);
        assert!(matches!(mail.to_message(), Err(Error::Smtp(_))));
    }

    #[test]
    fn test_line_break_in_envelope_address_is_rejected() {
        let mut mail = sample_mail();
        mail.bcc = vec!["user3@example.com>\r\nRCPT TO:<other@example.com".to_string()];
        assert!(matches!(send_mail(&mail, "localhost:1"), Err(Error::Smtp(_))));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let mut mail = sample_mail();
        mail.subject = "Déploiement terminé".to_string();
        let message = mail.to_message().unwrap();
        let encoded = format!("Subject: =?utf-8?b?{}?=\r\n", STANDARD.encode("Déploiement terminé"));
        assert!(message.contains(&encoded), "message: {}", message);
        assert!(message.split("\r\n\r\n").next().unwrap().is_ascii());
    }

    #[test]
    fn test_long_non_ascii_subject_is_folded() {
        let subject = "é".repeat(60);
        let encoded = encode_header(&subject);
        let words: Vec<&str> = encoded.split("\r\n ").collect();
        assert_eq!(words.len(), 3);
        assert!(words.iter().all(|w| w.len() <= 75 && w.starts_with("=?utf-8?b?")));
        let decoded: String = words
            .iter()
            .map(|w| {
                let payload = &w["=?utf-8?b?".len()..w.len() - 2];
                String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
            })
            .collect();
        assert_eq!(decoded, subject);
    }

    #[test]
    fn test_split_server() {
        assert_eq!(split_server("mail.example.com").unwrap(), ("mail.example.com", 25));
        assert_eq!(split_server("mail.example.com:2525").unwrap(), ("mail.example.com", 2525));
        assert_eq!(split_server("::1").unwrap(), ("::1", 25));
        assert_eq!(split_server("[::1]:2525").unwrap(), ("::1", 2525));
        assert_eq!(split_server("[fe80::1]").unwrap(), ("fe80::1", 25));
        assert!(split_server("[::1]x").is_err());
        assert!(split_server("[::1").is_err());
        assert!(split_server("host:smtp").is_err());
    }

    #[test]
    fn test_send_mail_conversation() {
        let (addr, server) = fake_server(false);
        send_mail(&sample_mail(), &addr).unwrap();
        let seen = server.join().unwrap();

        let rcpts: Vec<&String> = seen.iter().filter(|l| l.starts_with("RCPT TO")).collect();
        assert_eq!(
            rcpts,
            vec![
                "RCPT TO:<user1@example.com>",
                "RCPT TO:<user2@example.com>",
                "RCPT TO:<user3@example.com>",
            ]
        );
        assert_eq!(seen[1], "MAIL FROM:<unittest@example.com>");
        assert!(seen.contains(&"..hidden dot line".to_string()));
        assert_eq!(seen.last().map(String::as_str), Some("QUIT"));
    }

    #[test]
    fn test_rejected_recipient_is_an_error() {
        let (addr, server) = fake_server(true);
        let err = send_mail(&sample_mail(), &addr).unwrap_err();
        assert!(err.to_string().contains("550"), "got: {}", err);
        drop(server);
    }

    #[test]
    fn test_invalid_port() {
        assert!(send_mail(&sample_mail(), "localhost:smtp").is_err());
    }

    #[test]
    fn test_no_recipients() {
        let mail = Mail::new("a@example.com", Vec::new(), "s", "b");
        assert!(matches!(send_mail(&mail, DEFAULT_SMTP_SERVER), Err(Error::Smtp(_))));
    }
}
