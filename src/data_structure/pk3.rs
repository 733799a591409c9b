//! PK3 payload codec: encryption, substructure shuffling, and the internal
//! checksum.
use byteorder::{ByteOrder, LittleEndian};

use crate::error::{CodecError, Result};

pub const PAYLOAD_SIZE: usize = 48;
pub const SUBSTRUCTURE_SIZE: usize = 12;

/// `ORDER_TABLE[key][logical]` gives the physical chunk index (within the
/// encrypted payload) holding substructure `logical`, where logical indices
/// are `0=Growth, 1=Attacks, 2=EVs&Contest, 3=Misc`. Indexed by
/// `personality mod 24`. The 24 rows are exactly the 24 permutations of
/// `(0,1,2,3)`.
pub const ORDER_TABLE: [[usize; 4]; 24] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 1, 3],
    [0, 3, 1, 2],
    [0, 2, 3, 1],
    [0, 3, 2, 1],
    [1, 0, 2, 3],
    [1, 0, 3, 2],
    [2, 0, 1, 3],
    [3, 0, 1, 2],
    [2, 0, 3, 1],
    [3, 0, 2, 1],
    [1, 2, 0, 3],
    [1, 3, 0, 2],
    [2, 1, 0, 3],
    [3, 1, 0, 2],
    [2, 3, 0, 1],
    [3, 2, 0, 1],
    [1, 2, 3, 0],
    [1, 3, 2, 0],
    [2, 1, 3, 0],
    [3, 1, 2, 0],
    [2, 3, 1, 0],
    [3, 2, 1, 0],
];

/// XORs every 32-bit little-endian word of a 48-byte payload with `key`.
/// Self-inverse: calling this twice with the same key reproduces the input.
pub fn crypt_payload(payload: &[u8], key: u32) -> Result<[u8; PAYLOAD_SIZE]> {
    if payload.len() != PAYLOAD_SIZE {
        return Err(CodecError::InvalidSize {
            expected: PAYLOAD_SIZE,
            found: payload.len(),
        });
    }

    let mut out = [0u8; PAYLOAD_SIZE];
    for (chunk_idx, chunk) in payload.chunks(4).enumerate() {
        let word = LittleEndian::read_u32(chunk) ^ key;
        let offset = chunk_idx * 4;
        out[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
    }
    Ok(out)
}

/// Splits a decrypted 48-byte payload into the four plaintext substructure
/// chunks, routed to their logical positions via `ORDER_TABLE`.
pub fn unshuffle(payload: &[u8; PAYLOAD_SIZE], personality: u32) -> [[u8; SUBSTRUCTURE_SIZE]; 4] {
    let order = ORDER_TABLE[(personality % 24) as usize];
    let mut logical = [[0u8; SUBSTRUCTURE_SIZE]; 4];
    for (i, &physical) in order.iter().enumerate() {
        let start = physical * SUBSTRUCTURE_SIZE;
        logical[i].copy_from_slice(&payload[start..start + SUBSTRUCTURE_SIZE]);
    }
    logical
}

/// Inverse of [`unshuffle`]: arranges the four plaintext substructure chunks
/// back into physical payload order for the given personality value.
pub fn shuffle(chunks: &[[u8; SUBSTRUCTURE_SIZE]; 4], personality: u32) -> [u8; PAYLOAD_SIZE] {
    let order = ORDER_TABLE[(personality % 24) as usize];
    let mut payload = [0u8; PAYLOAD_SIZE];
    for (logical, &physical) in order.iter().enumerate() {
        let start = physical * SUBSTRUCTURE_SIZE;
        payload[start..start + SUBSTRUCTURE_SIZE].copy_from_slice(&chunks[logical]);
    }
    payload
}

/// Sums the four plaintext substructures as a sequence of little-endian
/// 16-bit words, wrapping modulo 2^16.
pub fn checksum(chunks: &[[u8; SUBSTRUCTURE_SIZE]; 4]) -> u16 {
    let mut sum: u16 = 0;
    for chunk in chunks {
        for word in chunk.chunks(2) {
            sum = sum.wrapping_add(LittleEndian::read_u16(word));
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_table_contains_every_permutation_once() {
        let mut seen = std::collections::HashSet::new();
        for row in ORDER_TABLE {
            let mut sorted = row;
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3]);
            assert!(seen.insert(row), "duplicate row {:?}", row);
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn crypt_is_self_inverse() {
        let payload = [0x5A; PAYLOAD_SIZE];
        let key = 0xDEAD_BEEF;
        let encrypted = crypt_payload(&payload, key).unwrap();
        assert_ne!(encrypted, payload);
        let decrypted = crypt_payload(&encrypted, key).unwrap();
        assert_eq!(decrypted, payload);
    }

    #[test]
    fn crypt_rejects_wrong_size() {
        let payload = [0u8; 10];
        assert!(crypt_payload(&payload, 1).is_err());
    }

    #[test]
    fn shuffle_unshuffle_is_involution() {
        let mut payload = [0u8; PAYLOAD_SIZE];
        for (i, b) in payload.iter_mut().enumerate() {
            *b = i as u8;
        }
        for personality in [0u32, 1, 23, 24, 48, 0xFFFF_FFFF] {
            let chunks = unshuffle(&payload, personality);
            let restored = shuffle(&chunks, personality);
            assert_eq!(restored, payload, "personality {personality}");
        }
    }

    #[test]
    fn checksum_of_all_zero_substructures_is_zero() {
        let chunks = [[0u8; SUBSTRUCTURE_SIZE]; 4];
        assert_eq!(checksum(&chunks), 0);
    }

    #[test]
    fn checksum_wraps_modulo_2_16() {
        let mut chunks = [[0u8; SUBSTRUCTURE_SIZE]; 4];
        chunks[0][0..2].copy_from_slice(&0xFFFFu16.to_le_bytes());
        chunks[0][2..4].copy_from_slice(&2u16.to_le_bytes());
        assert_eq!(checksum(&chunks), 1);
    }
}
