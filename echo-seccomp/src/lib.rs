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

#![forbid(unsafe_code)]

use anyhow::{self as ah, Context as _};
use seccompiler::{apply_filter_all_threads, BpfProgram, SeccompAction, SeccompFilter};
use std::{collections::BTreeMap, env::consts::ARCH};

/// Syscall groups that can be allowed in addition to the always-allowed base set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Allow {
    Mmap,
    Read,
    Write,
    Futex,
    SignalMask,
    SignalReturn,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Action {
    #[default]
    Kill,
    Log,
}

pub struct Filter(BpfProgram);

impl Filter {
    /// Number of BPF instructions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn syscalls(allow: Allow) -> &'static [i64] {
    match allow {
        Allow::Mmap => &[
            libc::SYS_mmap,
            libc::SYS_mremap,
            libc::SYS_munmap,
            libc::SYS_mprotect,
        ],
        Allow::Read => &[libc::SYS_read, libc::SYS_readv],
        Allow::Write => &[libc::SYS_write, libc::SYS_writev],
        Allow::Futex => &[
            libc::SYS_futex,
            libc::SYS_get_robust_list,
            libc::SYS_set_robust_list,
        ],
        Allow::SignalMask => &[libc::SYS_rt_sigprocmask],
        Allow::SignalReturn => &[libc::SYS_rt_sigreturn],
    }
}

pub fn seccomp_compile(allow: &[Allow], deny_action: Action) -> ah::Result<Filter> {
    let mut rules: BTreeMap<_, _> = [
        (libc::SYS_brk, vec![]),
        (libc::SYS_close, vec![]),
        (libc::SYS_exit, vec![]),
        (libc::SYS_exit_group, vec![]),
        (libc::SYS_getpid, vec![]),
        (libc::SYS_getrandom, vec![]),
        (libc::SYS_gettid, vec![]),
        (libc::SYS_madvise, vec![]),
        (libc::SYS_sched_getaffinity, vec![]),
        (libc::SYS_sigaltstack, vec![]),
    ]
    .into();

    for allow in allow {
        for syscall in syscalls(*allow) {
            rules.insert(*syscall, vec![]);
        }
    }

    let filter = SeccompFilter::new(
        rules,
        match deny_action {
            Action::Kill => SeccompAction::KillProcess,
            Action::Log => SeccompAction::Log,
        },
        SeccompAction::Allow,
        ARCH.try_into().context("Unsupported CPU ARCH")?,
    )
    .context("Create seccomp filter")?;

    let filter: BpfProgram = filter.try_into().context("Seccomp to BPF")?;

    Ok(Filter(filter))
}

pub fn seccomp_install(filter: Filter) -> ah::Result<()> {
    apply_filter_all_threads(&filter.0).context("Apply seccomp filter")
}


// vim: ts=4 sw=4 expandtab
