//! Minimal RLP support for the trie codec.
//!
//! Trie nodes and account records only ever use two RLP shapes: byte
//! strings, and lists of already-encoded items. Both directions go through
//! a single header parser / emitter rather than one decoder per tag range.

/// A parsed RLP item header: where the payload sits and what it is.
struct Header {
    /// Payload offset from the start of the item. Zero for single-byte
    /// literals, which are their own payload.
    offset: usize,
    /// Payload length in bytes.
    len: usize,
    is_list: bool,
}

/// Reads the header of the item at the start of `data`, validating that the
/// whole payload is in bounds.
fn read_header(data: &[u8]) -> Option<Header> {
    let tag = *data.first()?;
    let header = match tag {
        0x00..=0x7f => Header {
            offset: 0,
            len: 1,
            is_list: false,
        },
        0x80..=0xb7 => Header {
            offset: 1,
            len: (tag - 0x80) as usize,
            is_list: false,
        },
        0xb8..=0xbf => long_header(data, tag - 0xb7, false)?,
        0xc0..=0xf7 => Header {
            offset: 1,
            len: (tag - 0xc0) as usize,
            is_list: true,
        },
        0xf8..=0xff => long_header(data, tag - 0xf7, true)?,
    };
    if data.len() < header.offset + header.len {
        return None;
    }
    Some(header)
}

/// Header of a long-form item, whose payload length follows the tag as
/// `width` big-endian bytes. `width` is at most 8 by construction of the
/// tag ranges.
fn long_header(data: &[u8], width: u8, is_list: bool) -> Option<Header> {
    let width = width as usize;
    let len_bytes = data.get(1..1 + width)?;
    let mut buf = [0u8; 8];
    buf[8 - width..].copy_from_slice(len_bytes);
    let len = usize::try_from(u64::from_be_bytes(buf)).ok()?;
    Some(Header {
        offset: 1 + width,
        len,
        is_list,
    })
}

/// Emits the header for a payload of `len` bytes. `base` is 0x80 for
/// strings and 0xc0 for lists; long payloads shift the tag by 55 plus the
/// width of the big-endian length that follows it.
fn header(base: u8, len: usize) -> Vec<u8> {
    if len < 56 {
        return vec![base + len as u8];
    }
    let be = len.to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();
    let mut out = vec![base + 55 + (be.len() - skip) as u8];
    out.extend_from_slice(&be[skip..]);
    out
}

/// Encodes a byte string.
pub(crate) fn encode_bytes(payload: &[u8]) -> Vec<u8> {
    match payload {
        // A lone byte below 0x80 is its own encoding
        [b] if *b < 0x80 => vec![*b],
        _ => {
            let mut out = header(0x80, payload.len());
            out.extend_from_slice(payload);
            out
        }
    }
}

/// Encodes a list of already-encoded items.
pub(crate) fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len = items.iter().map(Vec::len).sum();
    let mut out = header(0xc0, payload_len);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// Decodes a byte string. Fails on lists, truncation and garbage.
pub(crate) fn decode_bytes(data: &[u8]) -> Option<Vec<u8>> {
    let header = read_header(data)?;
    if header.is_list {
        return None;
    }
    Some(data[header.offset..header.offset + header.len].to_vec())
}

/// Decodes a list into its items, each kept in encoded form.
pub(crate) fn decode_list(data: &[u8]) -> Option<Vec<Vec<u8>>> {
    let header = read_header(data)?;
    if !header.is_list {
        return None;
    }

    let mut payload = &data[header.offset..header.offset + header.len];
    let mut items = Vec::new();
    while !payload.is_empty() {
        // read_header bounds-checks against the remaining payload, so a
        // nested item can never claim bytes past the end of the list
        let item = read_header(payload)?;
        let (encoded, rest) = payload.split_at(item.offset + item.len);
        items.push(encoded.to_vec());
        payload = rest;
    }
    Some(items)
}
