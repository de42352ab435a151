//! Program images.
//!
//! An image is a raw sequence of little-endian 16-bit words with no header.
//! It is loaded verbatim into memory starting at address 0.

use crate::error::DecodeError;
use crate::word::ADDRESS_SPACE;

/// A decoded program image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    /// The image words, address 0 first.
    pub words: Vec<u16>,
}

impl Image {
    /// Create an image from words.
    pub fn new(words: Vec<u16>) -> Self {
        Self { words }
    }

    /// Decode a byte slice into an image.
    ///
    /// The byte count must be even and the word count must fit the 15-bit
    /// address space.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if !bytes.len().is_multiple_of(2) {
            return Err(DecodeError::InvalidLength(bytes.len()));
        }

        let word_count = bytes.len() / 2;
        if word_count > ADDRESS_SPACE {
            return Err(DecodeError::ImageTooLarge(word_count));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self { words })
    }

    /// Encode the image to bytes, two per word.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 2);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Build initial memory, zero-padded up to `size` words.
    ///
    /// Images longer than `size` are kept whole; memory never truncates the
    /// program.
    pub fn into_memory(self, size: usize) -> Vec<u16> {
        let mut memory = self.words;
        if memory.len() < size {
            memory.resize(size, 0);
        }
        memory
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
