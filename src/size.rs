//! Size normalization and generation auto-detection for raw save bytes.
use crate::data_structure::bytes;
use crate::data_structure::save_data::SAVE_IMAGE_SIZE;
use crate::error::{CodecError, Result};
use crate::gen12::GEN12_SIZE;

const OVER_ALLOWANCE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Gen1,
    Gen2,
    Gen3,
}

/// Trims header/footer padding to the canonical target length.
///
/// - Exact match: passed through.
/// - Up to 512 bytes over: truncated from the front.
/// - Exactly double (a doubled backup dump): truncated from the front.
/// - Anything else is `InvalidSize`.
pub fn normalize(raw: &[u8], target: usize) -> Result<Vec<u8>> {
    let len = raw.len();
    if len == target {
        return Ok(raw.to_vec());
    }
    if len > target && len - target <= OVER_ALLOWANCE {
        return Ok(bytes::slice(raw, 0, target)?.to_vec());
    }
    if len == target * 2 {
        return Ok(bytes::slice(raw, 0, target)?.to_vec());
    }
    Err(CodecError::InvalidSize {
        expected: target,
        found: len,
    })
}

/// Auto-detects the generation from raw length, then normalizes. Gen 1
/// vs Gen 2 disambiguation (the checksum probe) happens inside
/// [`crate::gen12::decode_gen12`]; this only distinguishes the ~32 KiB
/// legacy range from the ~128 KiB Generation III range.
pub fn detect_and_normalize(raw: &[u8]) -> Result<(SaveKind, Vec<u8>)> {
    let len = raw.len();
    let gen3_distance = (len as i64 - SAVE_IMAGE_SIZE as i64).unsigned_abs() as usize;
    let gen12_distance = (len as i64 - GEN12_SIZE as i64).unsigned_abs() as usize;

    if gen12_distance <= gen3_distance {
        let normalized = normalize(raw, GEN12_SIZE)?;
        log::debug!("{len} bytes normalized to {GEN12_SIZE} (legacy range)");
        Ok((SaveKind::Gen1, normalized))
    } else {
        let normalized = normalize(raw, SAVE_IMAGE_SIZE)?;
        log::debug!("{len} bytes normalized to {SAVE_IMAGE_SIZE} (Gen 3 range)");
        Ok((SaveKind::Gen3, normalized))
    }
}
