// -*- coding: utf-8 -*-
//
// Echo CGI
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use echo_form::FormError;
use std::io;

/// Errors that abort the request.
/// Nothing is written to the response, if one of these occurs.
#[derive(thiserror::Error, Debug)]
pub enum EchoError {
    #[error("Environment variable '{0}' is not set.")]
    EnvironmentMissing(&'static str),
    #[error("Environment variable '{0}' {1}.")]
    EnvironmentInvalid(&'static str, &'static str),
    #[error("POST body: {0}")]
    BodyParseError(String),
    #[error("POST body read failed: {0}")]
    BodyRead(#[from] io::Error),
}

impl From<FormError> for EchoError {
    fn from(e: FormError) -> Self {
        Self::BodyParseError(e.to_string())
    }
}

// vim: ts=4 sw=4 expandtab
