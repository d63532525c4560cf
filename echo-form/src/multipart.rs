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

use multer::{parse_boundary, Multipart};

/// Decode a `multipart/form-data` body into name/value pairs.
/// The body size is bounded by the caller.
///
/// Parts without a name are skipped.
/// Uploaded files keep their content, if it is valid UTF-8. Otherwise the value is `None`.
/// All other parts are decoded lossily.
pub async fn parse_multipart(
    body: &[u8],
    content_type: &str,
) -> Result<Vec<(String, Option<String>)>, multer::Error> {
    let boundary = parse_boundary(content_type)?;
    let mut multipart = Multipart::with_reader(body, boundary);
    let mut items = vec![];
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let is_file = field.file_name().is_some();
        let data = field.bytes().await?;
        let value = if is_file {
            String::from_utf8(data.to_vec()).ok()
        } else {
            Some(String::from_utf8_lossy(&data).into_owned())
        };
        items.push((name, value));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CT: &str = "multipart/form-data; boundary=b0undary";

    #[tokio::test]
    async fn test_files() {
        let mut body = b"--b0undary\r\n\
            Content-Disposition: form-data; name=\"text\"; filename=\"a.txt\"\r\n\
            Content-Type: text/plain\r\n\
            \r\n\
            hello\r\n\
            --b0undary\r\n\
            Content-Disposition: form-data; name=\"bin\"; filename=\"a.bin\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n"
            .to_vec();
        body.extend_from_slice(&[0xFF, 0xFE, 0x00]);
        body.extend_from_slice(b"\r\n--b0undary--\r\n");

        let items = parse_multipart(&body, CT).await.unwrap();
        assert_eq!(
            items,
            vec![
                ("text".to_string(), Some("hello".to_string())),
                ("bin".to_string(), None),
            ]
        );
    }

    #[tokio::test]
    async fn test_unnamed_and_lossy() {
        let mut body = b"--b0undary\r\n\
            Content-Disposition: form-data\r\n\
            \r\n\
            skipped\r\n\
            --b0undary\r\n\
            Content-Disposition: form-data; name=\"t\"\r\n\
            \r\n"
            .to_vec();
        body.extend_from_slice(&[b'x', 0xFF]);
        body.extend_from_slice(b"\r\n--b0undary--\r\n");

        let items = parse_multipart(&body, CT).await.unwrap();
        assert_eq!(items, vec![("t".to_string(), Some("x\u{fffd}".to_string()))]);
    }

    #[tokio::test]
    async fn test_truncated() {
        let body = b"--b0undary\r\n\
            Content-Disposition: form-data; name=\"t\"\r\n\
            \r\n\
            no end";
        assert!(parse_multipart(body, CT).await.is_err());
    }
}

// vim: ts=4 sw=4 expandtab
