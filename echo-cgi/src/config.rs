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

use anyhow::{self as ah, format_err as err};
use configparser::ini::Ini;
use std::{fs, path::Path};

pub const CONF_PATH: &str = "/opt/echo-cgi/etc/echo-cgi.conf";
const SECT: &str = "ECHO-CGI";

/// No limit.
const DEFAULT_MAX_BODY_LEN: u32 = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EchoConfig {
    /// Maximum accepted POST body length, in bytes. 0 means unlimited.
    pub max_body_len: u32,
    /// Keep URL-encoded fields with empty values.
    pub keep_blank_values: bool,
    /// Append the fields of `QUERY_STRING` to the POST data.
    pub post_include_query: bool,
    /// Log request details and send a runtime header.
    pub debug: bool,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            max_body_len: DEFAULT_MAX_BODY_LEN,
            keep_blank_values: false,
            post_include_query: true,
            debug: false,
        }
    }
}

impl EchoConfig {
    /// Load the configuration file.
    /// A file that does not exist results in the default configuration.
    pub fn new(path: &Path) -> ah::Result<Self> {
        if !path.exists() {
            return Ok(Default::default());
        }
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) => Err(err!("Failed to load configuration {}: {e}", path.display())),
        }
    }

    pub fn parse(text: &str) -> ah::Result<Self> {
        let mut ini = Ini::new_cs();
        if let Err(e) = ini.read(text.to_string()) {
            return Err(err!("Failed to parse configuration: {e}"));
        }
        Self::from_ini(&ini)
    }

    /// The POST body length limit, if any.
    pub fn body_limit(&self) -> Option<u32> {
        if self.max_body_len == 0 {
            None
        } else {
            Some(self.max_body_len)
        }
    }

    fn from_ini(ini: &Ini) -> ah::Result<Self> {
        let dflt = Self::default();

        let getbool = |key: &str, default: bool| -> ah::Result<bool> {
            match ini.getbool(SECT, key) {
                Ok(v) => Ok(v.unwrap_or(default)),
                Err(e) => Err(err!("Configuration '{key}': {e}")),
            }
        };

        let max_body_len = match ini.getuint(SECT, "max-body-len") {
            Ok(Some(v)) => v
                .try_into()
                .map_err(|_| err!("Configuration 'max-body-len' is too big."))?,
            Ok(None) => dflt.max_body_len,
            Err(e) => return Err(err!("Configuration 'max-body-len': {e}")),
        };

        Ok(Self {
            max_body_len,
            keep_blank_values: getbool("keep-blank-values", dflt.keep_blank_values)?,
            post_include_query: getbool("post-include-query", dflt.post_include_query)?,
            debug: getbool("debug", dflt.debug)?,
        })
    }
}


// vim: ts=4 sw=4 expandtab
