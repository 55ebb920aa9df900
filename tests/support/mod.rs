//! In-process SMTP server that records each session
//!
//! Speaks just enough ESMTP for lettre: EHLO with AUTH capabilities,
//! AUTH PLAIN, MAIL, RCPT, DATA, RSET, NOOP and QUIT. Every command line and
//! the DATA payload are sent to a channel when the client disconnects.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Everything a client did in one connection
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Command lines in arrival order, without CRLF
    pub commands: Vec<String>,
    /// The DATA payload with dot-stuffing removed, lines joined by CRLF
    pub data: Option<String>,
}

impl Transcript {
    /// Command verbs in order, e.g. `["EHLO", "AUTH", "MAIL", ...]`
    pub fn verbs(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|line| {
                line.split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_uppercase()
            })
            .collect()
    }

    pub fn find(&self, prefix: &str) -> Option<&str> {
        self.commands
            .iter()
            .find(|line| line.to_uppercase().starts_with(&prefix.to_uppercase()))
            .map(String::as_str)
    }
}

/// A reply line sent back to the client
struct Reply {
    code: &'static str,
    lines: Vec<String>,
}

impl Reply {
    fn new(code: &'static str, message: &str) -> Self {
        Self {
            code,
            lines: vec![message.to_owned()],
        }
    }

    fn multiline(code: &'static str, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    fn format(&self) -> String {
        let last = self.lines.len().saturating_sub(1);
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let sep = if i == last { ' ' } else { '-' };
                format!("{}{}{}\r\n", self.code, sep, line)
            })
            .collect()
    }
}

/// How the server answers DATA
#[derive(Debug, Clone)]
pub enum DataPolicy {
    Accept,
    Reject { code: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct RecordingServer {
    hostname: String,
    data_policy: DataPolicy,
}

impl RecordingServer {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_owned(),
            data_policy: DataPolicy::Accept,
        }
    }

    pub fn reject_data(mut self, code: &'static str, message: &str) -> Self {
        self.data_policy = DataPolicy::Reject {
            code,
            message: message.to_owned(),
        };
        self
    }

    /// Bind an ephemeral port and serve connections in the background
    pub fn spawn(self) -> (u16, mpsc::Receiver<Transcript>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => match self.handle_client(stream) {
                        Ok(transcript) => {
                            // Errors when the test already finished.
                            let _ = tx.send(transcript);
                        }
                        Err(e) => eprintln!("Error handling client: {e}"),
                    },
                    Err(_) => break,
                }
            }
        });

        (port, rx)
    }

    fn handle_client(&self, mut stream: TcpStream) -> std::io::Result<Transcript> {
        stream.set_read_timeout(Some(Duration::from_secs(5)))?;
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut transcript = Transcript::default();

        write_reply(
            &mut stream,
            &Reply::new("220", &format!("{} ESMTP ready", self.hostname)),
        )?;

        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buffer)
                .trim_end_matches(['\r', '\n'])
                .to_owned();
            if line.is_empty() {
                continue;
            }

            transcript.commands.push(line.clone());
            let verb = line
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_uppercase();

            let reply = match verb.as_str() {
                "EHLO" | "HELO" => {
                    let client = line.split_whitespace().nth(1).unwrap_or("unknown");
                    Reply::multiline(
                        "250",
                        vec![
                            format!("{} Hello {client}", self.hostname),
                            "AUTH PLAIN LOGIN".to_owned(),
                            "8BITMIME".to_owned(),
                        ],
                    )
                }
                "AUTH" => Reply::new("235", "Authentication succeeded"),
                "MAIL" | "RCPT" | "RSET" | "NOOP" => Reply::new("250", "OK"),
                "STARTTLS" => Reply::new("454", "TLS not available"),
                "DATA" => match &self.data_policy {
                    DataPolicy::Reject { code, message } => Reply::new(*code, message),
                    DataPolicy::Accept => {
                        write_reply(
                            &mut stream,
                            &Reply::new("354", "End data with <CR><LF>.<CR><LF>"),
                        )?;
                        transcript.data = Some(read_data(&mut reader)?);
                        Reply::new("250", "OK queued")
                    }
                },
                "QUIT" => {
                    write_reply(&mut stream, &Reply::new("221", "Bye"))?;
                    break;
                }
                _ => Reply::new("500", "Syntax error, command unrecognized"),
            };

            write_reply(&mut stream, &reply)?;
        }

        Ok(transcript)
    }
}

fn read_data(reader: &mut BufReader<TcpStream>) -> std::io::Result<String> {
    let mut lines = Vec::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buffer)
            .trim_end_matches(['\r', '\n'])
            .to_owned();
        if line == "." {
            break;
        }

        lines.push(line.strip_prefix('.').unwrap_or(&line).to_owned());
    }

    Ok(lines.join("\r\n"))
}

fn write_reply(stream: &mut TcpStream, reply: &Reply) -> std::io::Result<()> {
    stream.write_all(reply.format().as_bytes())?;
    stream.flush()
}

/// A port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub fn recv(rx: &mpsc::Receiver<Transcript>) -> Transcript {
    rx.recv_timeout(Duration::from_secs(2))
        .expect("no SMTP session recorded")
}
