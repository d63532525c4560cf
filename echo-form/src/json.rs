// -*- coding: utf-8 -*-
//
// Echo CGI
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde_json::ser::Formatter;
use std::io::{self, Write};

/// JSON formatter producing the widespread "spaced" single line layout:
/// `{"a": "1", "b": ["x", "y"]}`.
///
/// Every character outside of printable ASCII is written as `\uXXXX` escape,
/// so the output is always pure ASCII.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompatFormatter;

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

impl Formatter for CompatFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if is_printable_ascii(c) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0_u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn encode<T: Serialize>(value: &T) -> String {
        let mut buf = vec![];
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, CompatFormatter);
        value.serialize(&mut ser).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_separators() {
        assert_eq!(encode(&Vec::<String>::new()), "[]");
        assert_eq!(encode(&vec!["x", "y", "z"]), r#"["x", "y", "z"]"#);
        assert_eq!(encode(&(1, Some("a"), None::<&str>)), r#"[1, "a", null]"#);
    }

    #[test]
    fn test_escape() {
        assert_eq!(encode(&"plain text"), r#""plain text""#);
        assert_eq!(encode(&"caf\u{e9}"), r#""caf\u00e9""#);
        assert_eq!(encode(&"\u{20ac}1"), r#""\u20ac1""#);
        assert_eq!(encode(&"\u{1f600}"), r#""\ud83d\ude00""#);
        assert_eq!(encode(&"a\u{7f}b"), r#""a\u007fb""#);
        assert_eq!(encode(&"t\tn\n\u{1}"), r#""t\tn\n\u0001""#);
        assert_eq!(encode(&"q\"b\\"), r#""q\"b\\""#);
    }
}

// vim: ts=4 sw=4 expandtab
