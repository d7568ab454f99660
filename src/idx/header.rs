use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{AppError, Result};

// Width of every header field in an IDX stream
pub const FIELD_SIZE: usize = 4;

/// One 4-byte big-endian header field, optionally pinned to an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    pub expected: Option<u32>,
}

impl HeaderField {
    // Read and record the field without constraining it
    pub fn read(name: impl Into<String>) -> Self {
        HeaderField {
            name: name.into(),
            expected: None,
        }
    }

    // Read the field and require it to equal `value`
    pub fn exact(name: impl Into<String>, value: u32) -> Self {
        HeaderField {
            name: name.into(),
            expected: Some(value),
        }
    }
}

/// Parsed header values of a stream plus the bytes that follow the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedStream<'a> {
    pub headers: HashMap<String, u32>,
    pub data: &'a [u8],
}

impl DecodedStream<'_> {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.headers.get(name).copied()
    }

    // Like get, but a field the header spec never declared is a format error
    pub fn require(&self, name: &'static str) -> Result<u32> {
        self.get(name).ok_or_else(|| AppError::MissingHeader(name).into())
    }
}

/// Parse `fields` in order from the start of `bytes`.
///
/// Fails on the first field whose value differs from its expected value,
/// without reading any later field.
pub fn read_headers<'a>(fields: &[HeaderField], bytes: &'a [u8]) -> Result<DecodedStream<'a>> {
    let mut headers = HashMap::with_capacity(fields.len());
    let mut offset = 0;
    for field in fields {
        let end = offset + FIELD_SIZE;
        if end > bytes.len() {
            return Err(AppError::TruncatedHeader {
                name: field.name.clone(),
                offset,
                len: bytes.len(),
            }
            .into());
        }
        let value = BigEndian::read_u32(&bytes[offset..end]);
        if let Some(expected) = field.expected {
            if value != expected {
                return Err(AppError::HeaderValue {
                    name: field.name.clone(),
                    expected,
                    actual: value,
                }
                .into());
            }
        }
        headers.insert(field.name.clone(), value);
        offset = end;
    }
    Ok(DecodedStream {
        headers,
        data: &bytes[offset..],
    })
}
