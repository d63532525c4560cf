// -*- coding: utf-8 -*-
//
// Echo CGI
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::error::EchoError;
use std::{env, ffi::OsString};

const MAX_CGIENV_LEN: usize = 1024 * 4;
const MAX_CGIENV_U32_LEN: usize = 10;

/// Source of CGI meta-variables.
pub trait CgiEnv {
    fn var_os(&self, name: &str) -> Option<OsString>;
}

/// The environment of this process, as set up by the webserver.
pub struct ProcessEnv;

impl CgiEnv for ProcessEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        env::var_os(name)
    }
}

fn get_cgienv_checked(env: &impl CgiEnv, name: &'static str) -> Result<Option<String>, EchoError> {
    let Some(value) = env.var_os(name) else {
        return Ok(None);
    };
    if value.len() > MAX_CGIENV_LEN {
        return Err(EchoError::EnvironmentInvalid(name, "is too long"));
    }
    match value.into_string() {
        Ok(s) => Ok(Some(s)),
        Err(_) => Err(EchoError::EnvironmentInvalid(name, "is not valid UTF-8")),
    }
}

fn get_cgienv_raw(env: &impl CgiEnv, name: &str) -> OsString {
    env.var_os(name).unwrap_or_default()
}

/// Parse a CGI number variable.
/// Empty, negative, oversized and malformed values all mean "not set".
pub fn parse_cgienv_u32(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || value.len() > MAX_CGIENV_U32_LEN {
        None
    } else {
        value.parse::<u32>().ok()
    }
}

/// Snapshot of the CGI request meta-variables.
///
/// Only `REQUEST_METHOD` is validated up front.
/// The body related variables are kept raw and decoded on use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    method: Option<String>,
    content_type: OsString,
    content_length: OsString,
    query: OsString,
}

impl RequestContext {
    pub fn new(env: &impl CgiEnv) -> Result<Self, EchoError> {
        Ok(Self {
            method: get_cgienv_checked(env, "REQUEST_METHOD")?,
            content_type: get_cgienv_raw(env, "CONTENT_TYPE"),
            content_length: get_cgienv_raw(env, "CONTENT_LENGTH"),
            query: get_cgienv_raw(env, "QUERY_STRING"),
        })
    }

    /// The request method. `None`, if the webserver did not set `REQUEST_METHOD`.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn content_type(&self) -> String {
        self.content_type.to_string_lossy().into_owned()
    }

    /// The announced body length. `None`, if it is not set or not usable.
    pub fn content_length(&self) -> Option<u32> {
        parse_cgienv_u32(&self.content_length.to_string_lossy())
    }

    pub fn query(&self) -> String {
        self.query.to_string_lossy().into_owned()
    }
}


// vim: ts=4 sw=4 expandtab
