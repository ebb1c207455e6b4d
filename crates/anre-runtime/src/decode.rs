//! Output decoding for the external server's standard streams.
//!
//! The server writes its console output in the system's legacy code page
//! (GBK on the machines it targets) or in UTF-8, and nothing tells us which.
//! Decoding walks an ordered list of strategies; each may refuse the input,
//! the last one never does.

use std::borrow::Cow;

use encoding_rs::GBK;

/// A single decoding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Strict GBK, refuses malformed or truncated sequences.
    Gbk,
    /// Strict UTF-8.
    Utf8,
    /// UTF-8 with U+FFFD for every invalid sequence. Never fails.
    Lossy,
}

impl DecodeStrategy {
    /// Try to decode `bytes`, returning `None` when the strategy refuses them.
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Self::Gbk => GBK.decode_without_bom_handling_and_without_replacement(bytes),
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            Self::Lossy => Some(String::from_utf8_lossy(bytes)),
        }
    }
}

/// Strategies in the order they are tried.
pub const DECODE_ORDER: [DecodeStrategy; 3] = [
    DecodeStrategy::Gbk,
    DecodeStrategy::Utf8,
    DecodeStrategy::Lossy,
];

/// Decode a chunk of server output. Always produces some text.
pub fn decode_output(bytes: &[u8]) -> String {
    DECODE_ORDER
        .iter()
        .find_map(|strategy| strategy.decode(bytes))
        .map_or_else(|| String::from_utf8_lossy(bytes).into_owned(), Cow::into_owned)
}
