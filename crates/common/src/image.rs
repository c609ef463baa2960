//! Program images.
//!
//! An image file is a raw sequence of little-endian 16-bit words with no
//! header, length prefix, or checksum. Word `n` of the file is loaded at
//! address `n`.

use crate::error::DecodeError;
use crate::word::{Word, ADDRESS_SPACE};

/// A program image: the initial contents of memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// Words in address order.
    pub words: Vec<Word>,
}

impl Image {
    /// Create an image from words.
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Encode the image to bytes. The result length is always
    /// `words.len() * 2`.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 2);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Decode a byte slice into an image.
    ///
    /// The length must be even and describe at most 65536 words.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() % 2 != 0 {
            return Err(DecodeError::TruncatedImage(bytes.len()));
        }
        let count = bytes.len() / 2;
        if count > ADDRESS_SPACE {
            return Err(DecodeError::ImageTooLarge(count));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self { words })
    }

    /// Number of words in the image.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the image has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<Word>> for Image {
    fn from(words: Vec<Word>) -> Self {
        Self::new(words)
    }
}
