// -*- coding: utf-8 -*-
//
// Echo CGI
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

mod cgi;
mod config;
mod error;
mod handler;
mod response;

use crate::{
    cgi::{ProcessEnv, RequestContext},
    config::{EchoConfig, CONF_PATH},
    handler::EchoHandler,
};
use anyhow::{self as ah, Context as _};
use clap::Parser;
use echo_seccomp::{seccomp_compile, seccomp_install, Action, Allow};
use std::{io, path::PathBuf};
use tokio::runtime;

#[derive(Parser, Debug, Clone)]
struct Opts {
    /// The configuration file.
    #[arg(long, default_value = CONF_PATH)]
    config: PathBuf,

    /// Do not install the seccomp sandbox.
    #[arg(long, default_value = "false")]
    no_seccomp: bool,

    /// Only log denied syscalls instead of killing the process.
    #[arg(long, default_value = "false")]
    seccomp_log: bool,
}

fn install_seccomp(opts: &Opts) -> ah::Result<()> {
    let action = if opts.seccomp_log {
        Action::Log
    } else {
        Action::Kill
    };
    let filter = seccomp_compile(
        &[
            Allow::Mmap,
            Allow::Read,
            Allow::Write,
            Allow::Futex,
            Allow::SignalMask,
            Allow::SignalReturn,
        ],
        action,
    )?;
    seccomp_install(filter)
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();
    let conf = EchoConfig::new(&opts.config).context("echo-cgi.conf")?;

    let rt = runtime::Builder::new_current_thread()
        .build()
        .context("Tokio runtime builder")?;

    if !opts.no_seccomp {
        install_seccomp(&opts).context("Install seccomp filter")?;
    }

    let ctx = RequestContext::new(&ProcessEnv)?;
    let resp = rt.block_on(EchoHandler::new(&ctx, &conf).handle(io::stdin().lock()))?;

    resp.write_to(&mut io::stdout().lock())
        .context("CGI stdout write failed")?;
    Ok(())
}

// vim: ts=4 sw=4 expandtab
