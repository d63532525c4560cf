// -*- coding: utf-8 -*-
//
// Echo CGI
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    cgi::RequestContext,
    config::EchoConfig,
    error::EchoError,
    response::{HttpStatus, Response},
};
use echo_form::{is_multipart, parse_form, parse_query, FormData, FormOptions};
use std::{io::Read, time::Instant};

const MIME_JSON: &str = "application/json";
const MAX_BODY_PREALLOC: usize = 64 * 1024;

/// Read the POST body from the CGI input stream.
///
/// Reads `content_length` bytes, or up to EOF if the length is unknown.
/// `max_len` of `None` means unlimited.
fn read_body(
    input: impl Read,
    content_length: Option<u32>,
    max_len: Option<u32>,
) -> Result<Vec<u8>, EchoError> {
    let too_large = || EchoError::BodyParseError("Maximum content length exceeded.".to_string());
    let prealloc = (content_length.unwrap_or(0) as usize).min(MAX_BODY_PREALLOC);
    let mut body = Vec::with_capacity(prealloc);
    match (content_length, max_len) {
        (Some(len), Some(max_len)) if len > max_len => return Err(too_large()),
        (Some(len), _) => {
            input.take(u64::from(len)).read_to_end(&mut body)?;
        }
        (None, Some(max_len)) => {
            input.take(u64::from(max_len) + 1).read_to_end(&mut body)?;
            if body.len() as u64 > u64::from(max_len) {
                return Err(too_large());
            }
        }
        (None, None) => {
            let mut input = input;
            input.read_to_end(&mut body)?;
        }
    }
    Ok(body)
}

/// Echoes the request method and, for POST, the submitted form fields.
pub struct EchoHandler<'a> {
    ctx: &'a RequestContext,
    conf: &'a EchoConfig,
}

impl<'a> EchoHandler<'a> {
    pub fn new(ctx: &'a RequestContext, conf: &'a EchoConfig) -> Self {
        Self { ctx, conf }
    }

    fn form_options(&self) -> FormOptions {
        FormOptions {
            keep_blank_values: self.conf.keep_blank_values,
        }
    }

    async fn post_data(&self, input: impl Read) -> Result<FormData, EchoError> {
        let body = read_body(input, self.ctx.content_length(), self.conf.body_limit())?;
        if self.conf.debug {
            eprintln!("POST body: {} bytes", body.len());
        }
        let opts = self.form_options();
        let content_type = self.ctx.content_type();
        let form = parse_form(&body, &content_type, &opts).await?;
        if !self.conf.post_include_query {
            return Ok(form);
        }
        let query = parse_query(&self.ctx.query(), &opts);
        // Query fields precede multipart parts, but follow URL-encoded fields.
        let (mut first, second) = if is_multipart(&content_type) {
            (query, form)
        } else {
            (form, query)
        };
        first.merge(second);
        Ok(first)
    }

    /// Build the response.
    ///
    /// `input` is only read for POST requests.
    pub async fn handle(&self, input: impl Read) -> Result<Response, EchoError> {
        let start_stamp = self.conf.debug.then(Instant::now);

        let mut resp = Response::new(HttpStatus::Ok);
        resp.add_header("Content-type", MIME_JSON);

        let meth = self
            .ctx
            .method()
            .ok_or(EchoError::EnvironmentMissing("REQUEST_METHOD"))?;
        if self.conf.debug {
            eprintln!("REQUEST_METHOD: '{meth}'");
        }
        resp.add_line(format!("Request Method: {meth}").as_bytes());

        if meth == "POST" {
            let json = self.post_data(input).await?.to_json()?;
            let mut line = b"POST DATA: ".to_vec();
            line.extend_from_slice(&json);
            resp.add_line(&line);
        }

        if let Some(start_stamp) = start_stamp {
            let runtime = (Instant::now() - start_stamp).as_micros();
            resp.add_header("X-Echo-Cgi-Runtime", &format!("{runtime} us"));
        }
        Ok(resp)
    }
}


// vim: ts=4 sw=4 expandtab
