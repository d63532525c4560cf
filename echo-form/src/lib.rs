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

mod json;
mod multipart;
mod urlencoded;

pub use crate::json::CompatFormatter;

use crate::{multipart::parse_multipart, urlencoded::parse_urlencoded};
use serde::{ser::SerializeMap as _, Serialize, Serializer};

pub const MIME_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MIME_MULTIPART: &str = "multipart/form-data";

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("Unsupported form content type: '{0}'")]
    UnsupportedContentType(String),
    #[error("Multipart form decoding failed: {0}")]
    Multipart(#[from] multer::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormOptions {
    /// Keep URL-encoded fields with an empty value (or without `=`) as `""`.
    pub keep_blank_values: bool,
}

/// Form fields in submission order.
///
/// Each field name occurs at most once. The first submitted value wins.
/// A value of `None` is a field without a textual value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    items: Vec<(String, Option<String>)>,
}

impl FormData {
    pub fn new() -> Self {
        Default::default()
    }

    /// Insert a field, unless a field with this name already exists.
    /// Returns `true`, if the field was inserted.
    pub fn insert(&mut self, name: String, value: Option<String>) -> bool {
        if self.contains(&name) {
            false
        } else {
            self.items.push((name, value));
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|(n, _)| n == name)
    }

    /// Get the value of a field.
    /// The outer `Option` is `None` if the field does not exist.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.items
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.items.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Append all fields of `other` that are not present, yet.
    pub fn merge(&mut self, other: FormData) {
        for (name, value) in other.items {
            self.insert(name, value);
        }
    }

    /// Encode as JSON object with `", "` and `": "` separators
    /// and all non-printable-ASCII characters escaped.
    pub fn to_json(&self) -> Result<Vec<u8>, FormError> {
        let mut buf = Vec::with_capacity(self.items.len() * 16 + 2);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, CompatFormatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}

impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (name, value) in &self.items {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, Option<String>)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (name, value) in iter {
            form.insert(name, value);
        }
        form
    }
}

/// Get the lower case media type of a `Content-Type` value without parameters.
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Check whether a `Content-Type` value announces a multipart body.
pub fn is_multipart(content_type: &str) -> bool {
    media_type(content_type) == MIME_MULTIPART
}

/// Decode a request body.
///
/// An empty `content_type` is treated as URL-encoded.
pub async fn parse_form(
    body: &[u8],
    content_type: &str,
    opts: &FormOptions,
) -> Result<FormData, FormError> {
    let mime = media_type(content_type);
    match &mime[..] {
        "" | MIME_URLENCODED => Ok(parse_query(&String::from_utf8_lossy(body), opts)),
        MIME_MULTIPART => Ok(parse_multipart(body, content_type).await?.into_iter().collect()),
        _ => Err(FormError::UnsupportedContentType(mime)),
    }
}

/// Decode a URL-encoded query string.
pub fn parse_query(query: &str, opts: &FormOptions) -> FormData {
    parse_urlencoded(query, opts.keep_blank_values)
        .map(|(n, v)| (n, Some(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(form: &FormData) -> String {
        String::from_utf8(form.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_insert_first_wins() {
        let mut form = FormData::new();
        assert!(form.insert("a".to_string(), Some("1".to_string())));
        assert!(form.insert("b".to_string(), None));
        assert!(!form.insert("a".to_string(), Some("2".to_string())));
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("a"), Some(Some("1")));
        assert_eq!(form.get("b"), Some(None));
        assert_eq!(form.get("c"), None);
    }

    #[test]
    fn test_merge() {
        let mut a = parse_query("x=1&y=2", &Default::default());
        let b = parse_query("y=3&z=4", &Default::default());
        a.merge(b);
        let items: Vec<_> = a.iter().collect();
        assert_eq!(
            items,
            vec![("x", Some("1")), ("y", Some("2")), ("z", Some("4"))]
        );
    }

    #[test]
    fn test_json() {
        assert_eq!(json(&FormData::new()), "{}");

        let form = parse_query("name=Alice&age=30", &Default::default());
        assert_eq!(json(&form), r#"{"name": "Alice", "age": "30"}"#);

        let form: FormData = [("f".to_string(), None)].into_iter().collect();
        assert_eq!(json(&form), r#"{"f": null}"#);

        let form = parse_query("q=%22a%5Cb%22%0A", &Default::default());
        assert_eq!(json(&form), r#"{"q": "\"a\\b\"\n"}"#);
    }

    #[test]
    fn test_media_type() {
        assert_eq!(media_type(""), "");
        assert_eq!(
            media_type("Multipart/Form-Data; boundary=xyz"),
            MIME_MULTIPART
        );
        assert_eq!(media_type(" application/x-www-form-urlencoded "), MIME_URLENCODED);
        assert!(is_multipart("multipart/form-data; boundary=\"a;b\""));
        assert!(!is_multipart(MIME_URLENCODED));
        assert!(!is_multipart(""));
    }

    #[tokio::test]
    async fn test_parse_form_urlencoded() {
        let opts = FormOptions::default();

        let form = parse_form(b"name=Alice&age=30", "", &opts).await.unwrap();
        assert_eq!(json(&form), r#"{"name": "Alice", "age": "30"}"#);

        let form = parse_form(b"a=1&a=2", MIME_URLENCODED, &opts).await.unwrap();
        assert_eq!(form.get("a"), Some(Some("1")));

        let form = parse_form(b"", MIME_URLENCODED, &opts).await.unwrap();
        assert!(form.is_empty());

        let form = parse_form(b"a=&b", MIME_URLENCODED, &opts).await.unwrap();
        assert!(form.is_empty());

        let opts = FormOptions {
            keep_blank_values: true,
        };
        let form = parse_form(b"a=&b", MIME_URLENCODED, &opts).await.unwrap();
        assert_eq!(json(&form), r#"{"a": "", "b": ""}"#);
    }

    #[tokio::test]
    async fn test_parse_form_unsupported() {
        let res = parse_form(b"{}", "application/json", &Default::default()).await;
        assert!(matches!(
            res,
            Err(FormError::UnsupportedContentType(m)) if m == "application/json"
        ));
    }

    #[tokio::test]
    async fn test_parse_form_multipart() {
        let body = b"--XyZ\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\
            \r\n\
            Alice\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\
            \r\n\
            Bob\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"empty\"\r\n\
            \r\n\
            \r\n\
            --XyZ--\r\n";
        let form = parse_form(body, "multipart/form-data; boundary=XyZ", &Default::default())
            .await
            .unwrap();
        assert_eq!(json(&form), r#"{"name": "Alice", "empty": ""}"#);
    }

    #[tokio::test]
    async fn test_parse_form_multipart_no_boundary() {
        let res = parse_form(b"", "multipart/form-data", &Default::default()).await;
        assert!(matches!(res, Err(FormError::Multipart(_))));
    }
}

// vim: ts=4 sw=4 expandtab
