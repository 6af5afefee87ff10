//! StatusList2021 bitstrings.
use crate::errors::RevocationError;
use ack_keys::encoding::{base64_to_bytes, bytes_to_base64};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Number of credentials tracked by one status list.
pub const STATUS_LIST_MAX_SIZE: usize = 8192;

/// Largest decompressed `encodedList` accepted, in bytes. Room for a
/// million entries, well above the 16KB lists other issuers publish.
pub const MAX_DECODED_STATUS_LIST_BYTES: usize = 128 * STATUS_LIST_MAX_SIZE / 8;

/// The status list and offset within it for a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusListPosition {
    pub id: u64,
    pub index: usize,
}

/// Maps a 1-based global credential index to its status list position.
pub fn get_status_list_position(global_index: i64) -> Result<StatusListPosition, RevocationError> {
    if global_index < 1 {
        return Err(RevocationError::InvalidStatusListIndex(global_index));
    }
    let zero_indexed = (global_index - 1) as u64;
    let size = STATUS_LIST_MAX_SIZE as u64;
    Ok(StatusListPosition {
        id: zero_indexed / size,
        index: (zero_indexed % size) as usize,
    })
}

/// A fixed length bitstring. Bit `i` is the most significant bit of byte
/// `i / 8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusList {
    bytes: Vec<u8>,
    len: usize,
}

impl Default for StatusList {
    fn default() -> Self {
        Self::new(STATUS_LIST_MAX_SIZE)
    }
}

impl StatusList {
    /// Creates a list of `len` unset bits.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn locate(&self, index: usize) -> Result<(usize, u8), RevocationError> {
        if index >= self.len {
            return Err(RevocationError::IndexOutOfRange(index, self.len));
        }
        Ok((index / 8, 0x80 >> (index % 8)))
    }

    pub fn set(&mut self, index: usize) -> Result<(), RevocationError> {
        let (byte, mask) = self.locate(index)?;
        self.bytes[byte] |= mask;
        Ok(())
    }

    pub fn unset(&mut self, index: usize) -> Result<(), RevocationError> {
        let (byte, mask) = self.locate(index)?;
        self.bytes[byte] &= !mask;
        Ok(())
    }

    /// Tests a bit. Bits past the end of the list are unset.
    pub fn test(&self, index: usize) -> bool {
        self.locate(index)
            .map(|(byte, mask)| self.bytes[byte] & mask != 0)
            .unwrap_or(false)
    }

    pub fn from_indices(indices: &[usize], len: usize) -> Result<Self, RevocationError> {
        let mut list = Self::new(len);
        for index in indices {
            list.set(*index)?;
        }
        Ok(list)
    }

    /// Parses a literal string of `0` and `1` characters.
    pub fn from_bit_string(bits: &str) -> Result<Self, RevocationError> {
        let mut list = Self::new(bits.len());
        for (index, c) in bits.chars().enumerate() {
            match c {
                '0' => {}
                '1' => list.set(index)?,
                other => {
                    return Err(RevocationError::InvalidBitString(format!(
                        "unexpected character '{other}' at {index}"
                    )))
                }
            }
        }
        Ok(list)
    }

    pub fn to_bit_string(&self) -> String {
        (0..self.len)
            .map(|i| if self.test(i) { '1' } else { '0' })
            .collect()
    }

    /// GZIP compresses the bitstring and encodes it as base64url.
    pub fn encode(&self) -> Result<String, RevocationError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&self.bytes)
            .map_err(|e| RevocationError::Encoding(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| RevocationError::Encoding(e.to_string()))?;
        Ok(bytes_to_base64(&compressed))
    }

    /// Decodes an `encodedList`. The length is the decompressed byte count
    /// times eight. Lists over [`MAX_DECODED_STATUS_LIST_BYTES`] are rejected.
    pub fn decode(encoded: &str) -> Result<Self, RevocationError> {
        let compressed =
            base64_to_bytes(encoded).map_err(|e| RevocationError::Decoding(e.to_string()))?;
        let mut bytes = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .take(MAX_DECODED_STATUS_LIST_BYTES as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| RevocationError::Decoding(e.to_string()))?;
        if bytes.len() > MAX_DECODED_STATUS_LIST_BYTES {
            return Err(RevocationError::Decoding(format!(
                "status list exceeds {MAX_DECODED_STATUS_LIST_BYTES} bytes"
            )));
        }
        let len = bytes.len() * 8;
        Ok(Self { bytes, len })
    }
}

/// Compresses a literal `"0101..."` bitstring into an `encodedList`.
pub fn compress_bit_string(bits: &str) -> Result<String, RevocationError> {
    StatusList::from_bit_string(bits)?.encode()
}
