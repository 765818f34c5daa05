//! PowerDNS pipe protocol (ABI version 2) front-end.
//!
//! A blocking, line-oriented request/response loop: one handshake, then one
//! batch of `DATA` lines terminated by `END` per query. The host serializes
//! queries on the pipe, so there is no multiplexing to deal with.

use crate::backend::Backend;
use crate::errors::ProtocolError;
use crate::types::{Class, Message, Type};
use std::io::{self, BufRead, Write};
use std::net::IpAddr;
use std::str::FromStr;

const HELLO_ABI_VERSION_2: &str = "HELO\t2";
const HELLO_REPLY: &str = "OK\tdns-pdns\n";
const END_REPLY: &str = "END\n";
const FAIL_REPLY: &str = "FAIL\n";

/// Longest request line accepted. An overlong line is drained to its end
/// and the request fails, keeping the stream in sync.
const MAX_LINE: usize = 8192;

enum Request {
    Query(Message),
    Axfr,
    Ping,
}

enum Line {
    Eof,
    TooLong,
    Text(String),
}

/// The pipe server: parses requests, fans them out over the configured
/// backends and marshals the answers back.
pub struct Pdns {
    backends: Vec<Backend>,
}

impl Pdns {
    pub fn new(backends: Vec<Backend>) -> Pdns {
        Pdns { backends }
    }

    /// Drive the read-parse-dispatch-write loop until EOF on the reader.
    /// Only read errors propagate; everything else answers `FAIL` and
    /// keeps going.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<()> {
        info!("starting pdns pipe backend");
        let mut handshake = true;

        loop {
            let line = match read_line(&mut reader)? {
                Line::Eof => {
                    info!("terminating pdns pipe backend");
                    return Ok(());
                }
                Line::TooLong => {
                    warn!("failed reading request: {}", ProtocolError::LineTooLong);
                    write_reply(&mut writer, FAIL_REPLY);
                    continue;
                }
                Line::Text(line) => line,
            };

            if handshake {
                if line == HELLO_ABI_VERSION_2 {
                    handshake = false;
                    write_reply(&mut writer, HELLO_REPLY);
                } else {
                    warn!("handshake failed: {:?}", line);
                    write_reply(&mut writer, FAIL_REPLY);
                }
                continue;
            }

            match parse_request(&line) {
                Ok(Request::Query(query)) => {
                    for answer in self.dispatch(&query) {
                        write_reply(&mut writer, &marshal(&answer));
                    }
                    write_reply(&mut writer, END_REPLY);
                }
                Ok(Request::Axfr) | Ok(Request::Ping) => {
                    write_reply(&mut writer, END_REPLY);
                }
                Err(e) => {
                    warn!("failed parsing request: {}", e);
                    write_reply(&mut writer, FAIL_REPLY);
                }
            }
        }
    }

    /// Send the query to every backend in order and concatenate the
    /// answers, preserving (backend, record) order.
    fn dispatch(&self, query: &Message) -> Vec<Message> {
        let mut answers = Vec::new();
        for backend in &self.backends {
            answers.extend(backend.query(query));
        }
        answers
    }
}

/// Read one `\n`-terminated line, enforcing the length guard.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Line> {
    let mut line = Vec::new();
    let mut overflow = false;

    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            // EOF. A trailing unterminated line still counts.
            return Ok(if overflow {
                Line::TooLong
            } else if line.is_empty() {
                Line::Eof
            } else {
                Line::Text(String::from_utf8_lossy(&line).into_owned())
            });
        }

        match available.iter().position(|&b| b == b'\n') {
            Some(position) => {
                if !overflow {
                    line.extend_from_slice(&available[..position]);
                }
                reader.consume(position + 1);
                return Ok(if overflow || line.len() > MAX_LINE {
                    Line::TooLong
                } else {
                    Line::Text(String::from_utf8_lossy(&line).into_owned())
                });
            }
            None => {
                if !overflow {
                    line.extend_from_slice(available);
                }
                let consumed = available.len();
                reader.consume(consumed);
                if line.len() > MAX_LINE {
                    overflow = true;
                    line.clear();
                }
            }
        }
    }
}

fn parse_request(line: &str) -> Result<Request, ProtocolError> {
    let tokens: Vec<&str> = line.split('\t').collect();

    match tokens[0] {
        "Q" => {
            if tokens.len() < 7 {
                return Err(ProtocolError::BadRequest);
            }

            let class = Class::from_str(tokens[2])
                .map_err(|_| ProtocolError::UnknownClass(tokens[2].to_string()))?;
            let r#type = Type::from_str(tokens[3])
                .map_err(|_| ProtocolError::UnknownType(tokens[3].to_string()))?;

            // DNS names are case-insensitive; normalize here so the
            // backends compare apples to apples.
            Ok(Request::Query(Message {
                name: tokens[1].to_lowercase(),
                class,
                r#type,
                id: tokens[4].to_string(),
                remote_addr: tokens[5].parse::<IpAddr>().ok(),
                local_addr: tokens[6].parse::<IpAddr>().ok(),
                ..Message::default()
            }))
        }
        "AXFR" => Ok(Request::Axfr),
        "PING" => Ok(Request::Ping),
        _ => Err(ProtocolError::BadRequest),
    }
}

/// One `DATA` answer line. Marshalling cannot fail: class and type come
/// from the registry enums.
fn marshal(message: &Message) -> String {
    format!(
        "DATA\t{name}\t{class}\t{type}\t{ttl}\t{id}\t{content}\n",
        name = message.name,
        class = message.class,
        r#type = message.r#type,
        ttl = message.ttl,
        id = message.id,
        content = message.content,
    )
}

fn write_reply<W: Write>(writer: &mut W, reply: &str) {
    if let Err(e) = writer.write_all(reply.as_bytes()).and_then(|_| writer.flush()) {
        warn!("write failed: {}", e);
    }
}
