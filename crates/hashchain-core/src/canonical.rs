//! Canonical serialization of a block header.
//!
//! A block's hash is the digest of this encoding, so the exact bytes matter:
//!
//! ```text
//! {"merkle_root": "ab..", "previous_hash": "0", "timestamp": 1700000000.25}
//! ```
//!
//! * keys are written in lexicographic order;
//! * separators are `", "` between members and `": "` after keys;
//! * `merkle_root` is `null` for a block without transactions;
//! * `timestamp` uses the shortest decimal that round-trips the `f64`. For
//!   epoch-second values (1 up to 1e16) that is plain decimal notation with a
//!   fractional part (`1700000000.0`); outside that range exponent forms such
//!   as `1e+16` or `1.5e-7` appear. Non-finite values are written as `null`;
//! * every character outside printable ASCII is written as a lowercase
//!   `\uXXXX` escape, using surrogate pairs above U+FFFF.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

// Field order is the key order on the wire.
#[derive(Serialize)]
struct Header<'a> {
    merkle_root: Option<&'a str>,
    previous_hash: &'a str,
    timestamp: f64,
}

/// JSON formatter with spaced separators and ASCII-only string output.
struct HeaderFormatter;

impl Formatter for HeaderFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Encode the hashed header fields of a block.
pub fn encode_header(previous_hash: &str, timestamp: f64, merkle_root: Option<&str>) -> String {
    let header = Header {
        merkle_root,
        previous_hash,
        timestamp,
    };
    let mut out = Vec::with_capacity(160);
    let mut ser = Serializer::with_formatter(&mut out, HeaderFormatter);
    header
        .serialize(&mut ser)
        .expect("header serialization into memory is infallible");
    String::from_utf8(out).expect("header encoding is ASCII")
}
