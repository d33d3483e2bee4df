//! Reusable record fixtures wider than a primitive.
//!
//! [`Record`] is a 12-byte struct (id, score, flags) encoded by hand so
//! tests can exercise element widths that match no primitive type.

use std::cmp::Ordering;

/// Encoded width of a [`Record`].
pub const RECORD_WIDTH: usize = 12;

/// A small fixed-width record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    pub score: i32,
    pub flags: u32,
}

impl Record {
    pub fn new(id: u32, score: i32, flags: u32) -> Self {
        Self { id, score, flags }
    }

    /// Little-endian encoding: id, score, flags.
    pub fn encode(&self) -> [u8; RECORD_WIDTH] {
        let mut out = [0u8; RECORD_WIDTH];
        out[0..4].copy_from_slice(&self.id.to_le_bytes());
        out[4..8].copy_from_slice(&self.score.to_le_bytes());
        out[8..12].copy_from_slice(&self.flags.to_le_bytes());
        out
    }

    /// Inverse of [`encode`](Record::encode).
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not [`RECORD_WIDTH`] bytes long.
    pub fn decode(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), RECORD_WIDTH, "record slot width");
        let word = |i: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[i..i + 4]);
            raw
        };
        Self {
            id: u32::from_le_bytes(word(0)),
            score: i32::from_le_bytes(word(4)),
            flags: u32::from_le_bytes(word(8)),
        }
    }
}

/// Orders encoded records by score, ignoring id and flags.
pub fn by_score(a: &[u8], b: &[u8]) -> Ordering {
    Record::decode(a).score.cmp(&Record::decode(b).score)
}

/// A handful of records with distinct ids and one duplicated score.
pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new(1, 40, 0),
        Record::new(2, -5, 1),
        Record::new(3, 17, 0),
        Record::new(4, 40, 2),
        Record::new(5, 0, 0),
    ]
}
