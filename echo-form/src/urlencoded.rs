// -*- coding: utf-8 -*-
//
// Echo CGI
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

fn decode_component(text: &str) -> String {
    let text = text.replace('+', " ");
    url_escape::decode(&text).into_owned()
}

/// Split `a=1&b=2` into decoded name/value pairs.
///
/// Pairs with an empty value and pairs without `=` are skipped,
/// unless `keep_blank_values` is set.
pub fn parse_urlencoded(
    data: &str,
    keep_blank_values: bool,
) -> impl Iterator<Item = (String, String)> + '_ {
    data.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(move |pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            if value.is_empty() && !keep_blank_values {
                None
            } else {
                Some((decode_component(name), decode_component(value)))
            }
        })
}


// vim: ts=4 sw=4 expandtab
