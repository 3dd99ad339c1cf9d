use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error returned when an input string can't be turned into the bytes to digest.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Thrown for hex input of odd length or with a character outside `[0-9a-fA-F]`.
    ///
    /// Legacy clients parsed such input permissively and digested whatever numbers came out;
    /// here it is rejected instead.
    #[error("invalid hex input: {0}")]
    InvalidHexInput(#[from] hex::FromHexError),
    /// The legacy text expansion works on 16-bit code units and has no byte form for
    /// characters above U+FFFF.
    #[error("character {ch:?} at byte offset {offset} lies outside the basic multilingual plane")]
    UnsupportedCodepoint { ch: char, offset: usize },
}
