// -*- coding: utf-8 -*-
//
// Echo CGI
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::{fmt, io::Write};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HttpStatus {
    #[default]
    Ok = 200,
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let text = match self {
            Self::Ok => "OK",
        };
        write!(f, "{} {}", *self as u16, text)
    }
}

/// A complete CGI response, built in memory before anything is written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    status: HttpStatus,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: HttpStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    #[cfg(test)]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Append one `\n` terminated line to the body.
    pub fn add_line(&mut self, line: &[u8]) {
        self.body.extend_from_slice(line);
        self.body.push(b'\n');
    }

    pub fn write_to(&self, w: &mut impl Write) -> std::io::Result<()> {
        w.write_all(format!("HTTP/1.1 {}\n", self.status).as_bytes())?;
        for (name, value) in &self.headers {
            w.write_all(format!("{name}: {value}\n").as_bytes())?;
        }
        w.write_all(b"\n")?;
        w.write_all(&self.body)?;
        w.flush()
    }

    #[cfg(test)]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.body.len() + 64);
        // Writing to a Vec does not fail.
        let _ = self.write_to(&mut buf);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(HttpStatus::Ok.to_string(), "200 OK");
    }

    #[test]
    fn test_write() {
        let mut resp = Response::new(HttpStatus::Ok);
        assert_eq!(resp.to_bytes(), b"HTTP/1.1 200 OK\n\n");

        resp.add_header("Content-type", "text/plain");
        resp.add_header("X-Test", "1");
        resp.add_line(b"first");
        resp.add_line(b"");
        assert_eq!(
            resp.to_bytes(),
            b"HTTP/1.1 200 OK\nContent-type: text/plain\nX-Test: 1\n\nfirst\n\n"
        );
        assert_eq!(resp.headers().len(), 2);
    }
}

// vim: ts=4 sw=4 expandtab
