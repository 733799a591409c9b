//! Generation I/II box parser.
//!
//! After size normalization to 32 KiB (see [`crate::size`]), tries a
//! Gen-2 checksum probe and falls back to Gen 1. Box layout constants
//! here are a documented simplification: real hardware keeps species,
//! stat blocks, and name tables in separate parallel arrays, but nothing
//! downstream of this parser (the PCCS conversion) cares about on-disk
//! byte position, only about field values, so box slots are laid out as
//! one contiguous record per slot.
use crate::data_structure::bytes;
use crate::data_structure::save_data::SAVE_IMAGE_SIZE;
use crate::data_structure::text_gen12;
use crate::error::{CodecError, Result};

pub const GEN12_SIZE: usize = 32_768;

const GEN1_BOX_COUNT: usize = 12;
const GEN2_BOX_COUNT: usize = 14;
const SLOTS_PER_BOX: usize = 20;
const NICKNAME_WIDTH: usize = 11;
const OT_NAME_WIDTH: usize = 11;
const PK12_BASE_SIZE: usize = 32;
const PK12_SLOT_SIZE: usize = PK12_BASE_SIZE + NICKNAME_WIDTH + OT_NAME_WIDTH;
const BOX_HEADER_SIZE: usize = 1;
const BOX_AREA_START: usize = 0x4000;

const GEN1_CHECKSUM_RANGE: std::ops::RangeInclusive<usize> = 0x2598..=0x3522;
const GEN1_CHECKSUM_OFFSET: usize = 0x3523;
const GEN2_CHECKSUM_RANGE: std::ops::RangeInclusive<usize> = 0x2009..=0x2D0C;
const GEN2_CHECKSUM_OFFSET: usize = 0x2D0D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyGeneration {
    Gen1,
    Gen2,
}

impl LegacyGeneration {
    fn box_count(self) -> usize {
        match self {
            LegacyGeneration::Gen1 => GEN1_BOX_COUNT,
            LegacyGeneration::Gen2 => GEN2_BOX_COUNT,
        }
    }
}

/// Six 4-bit determinant values, unpacked from their packed 16-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dvs {
    pub attack: u8,
    pub defense: u8,
    pub speed: u8,
    pub special: u8,
    pub hp: u8,
}

impl Dvs {
    fn unpack(raw: u16) -> Self {
        let attack = ((raw >> 12) & 0xF) as u8;
        let defense = ((raw >> 8) & 0xF) as u8;
        let speed = ((raw >> 4) & 0xF) as u8;
        let special = (raw & 0xF) as u8;
        let hp = ((attack & 1) << 3) | ((defense & 1) << 2) | ((speed & 1) << 1) | (special & 1);
        Dvs {
            attack,
            defense,
            speed,
            special,
            hp,
        }
    }

    /// The Generation II shiny rule: fixed special/speed/defense DVs and
    /// an attack DV drawn from the odd-or-{2,3,6,7} bucket.
    pub fn is_gen2_shiny(&self) -> bool {
        self.defense == 10
            && self.speed == 10
            && self.special == 10
            && matches!(self.attack, 2 | 3 | 6 | 7 | 10 | 11 | 14 | 15)
    }
}

/// An abstract Generation I/II box record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pk12 {
    pub species: u8,
    pub level: u8,
    pub nickname: String,
    pub ot_name: String,
    pub ot_id: u16,
    pub experience: u32,
    pub stat_exp: [u16; 5],
    pub dvs: Dvs,
    pub moves: [u8; 4],
    pub pp: [u8; 4],
    pub friendship: Option<u8>,
}

impl Pk12 {
    fn parse(bytes_in: &[u8], generation: LegacyGeneration) -> Result<Self> {
        if bytes_in.len() != PK12_SLOT_SIZE {
            return Err(CodecError::InvalidSize {
                expected: PK12_SLOT_SIZE,
                found: bytes_in.len(),
            });
        }

        let species = bytes::read_u8(bytes_in, 0)?;
        let level = bytes::read_u8(bytes_in, 1)?;
        let mut moves = [0u8; 4];
        moves.copy_from_slice(bytes::slice(bytes_in, 6, 4)?);
        let ot_id = bytes::read_u16(bytes_in, 10)?;
        let experience = bytes::read_u24(bytes_in, 12)?;

        let mut stat_exp = [0u16; 5];
        for (i, slot) in stat_exp.iter_mut().enumerate() {
            *slot = bytes::read_u16(bytes_in, 15 + i * 2)?;
        }

        let dvs = Dvs::unpack(bytes::read_u16(bytes_in, 25)?);

        let mut pp = [0u8; 4];
        pp.copy_from_slice(bytes::slice(bytes_in, 27, 4)?);

        let friendship = match generation {
            LegacyGeneration::Gen1 => None,
            LegacyGeneration::Gen2 => Some(bytes::read_u8(bytes_in, 31)?),
        };

        let nickname = text_gen12::decode_gen12(bytes::slice(
            bytes_in,
            PK12_BASE_SIZE,
            NICKNAME_WIDTH,
        )?);
        let ot_name = text_gen12::decode_gen12(bytes::slice(
            bytes_in,
            PK12_BASE_SIZE + NICKNAME_WIDTH,
            OT_NAME_WIDTH,
        )?);

        Ok(Pk12 {
            species,
            level,
            nickname,
            ot_name,
            ot_id,
            experience,
            stat_exp,
            dvs,
            moves,
            pp,
            friendship,
        })
    }
}

/// Probes for a valid Gen-2 checksum at the documented location;
/// mismatches there (including all-zero or all-`0xFFFF` placeholders)
/// mean the dump is Gen 1.
fn is_gen2(bytes_in: &[u8]) -> Result<bool> {
    let region = bytes::slice(bytes_in, *GEN2_CHECKSUM_RANGE.start(), GEN2_CHECKSUM_RANGE.count())?;
    let mut sum: u16 = 0;
    for &b in region {
        sum = sum.wrapping_add(b as u16);
    }
    let stored = bytes::read_u16(bytes_in, GEN2_CHECKSUM_OFFSET)?;
    Ok(stored != 0 && stored != 0xFFFF && stored == sum)
}

/// Computes the documented Gen-1 8-bit two's-complement checksum.
/// Mismatches are a warning, never a parse failure — returns
/// `(ok, computed, stored)`.
pub fn gen1_checksum_report(bytes_in: &[u8]) -> Result<(bool, u8, u8)> {
    let region = bytes::slice(bytes_in, *GEN1_CHECKSUM_RANGE.start(), GEN1_CHECKSUM_RANGE.count())?;
    let sum: u8 = region.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    let computed = (!sum).wrapping_add(1);
    let stored = bytes::read_u8(bytes_in, GEN1_CHECKSUM_OFFSET)?;
    Ok((computed == stored, computed, stored))
}

/// Detects Gen 1 vs Gen 2 and decodes every non-empty box slot. Returns
/// the detected generation alongside the records so callers can label
/// them correctly instead of guessing.
pub fn decode_gen12(bytes_in: &[u8]) -> Result<(LegacyGeneration, Vec<Pk12>)> {
    if bytes_in.len() == SAVE_IMAGE_SIZE {
        return Err(CodecError::UnsupportedGeneration(format!(
            "{} bytes matches the Generation III save size; use SaveFile::load instead",
            bytes_in.len()
        )));
    }
    if bytes_in.len() != GEN12_SIZE {
        return Err(CodecError::InvalidSize {
            expected: GEN12_SIZE,
            found: bytes_in.len(),
        });
    }

    let generation = if is_gen2(bytes_in)? {
        LegacyGeneration::Gen2
    } else {
        let (ok, computed, stored) = gen1_checksum_report(bytes_in)?;
        if !ok {
            log::warn!("Gen 1 checksum mismatch: computed 0x{computed:02x}, stored 0x{stored:02x}");
        }
        LegacyGeneration::Gen1
    };
    log::debug!("detected legacy generation {generation:?}");

    let mut records = Vec::new();
    let mut offset = BOX_AREA_START;
    for _ in 0..generation.box_count() {
        let count = bytes::read_u8(bytes_in, offset)? as usize;
        let count = count.min(SLOTS_PER_BOX);
        let slots_start = offset + BOX_HEADER_SIZE;
        for slot in 0..count {
            let slot_offset = slots_start + slot * PK12_SLOT_SIZE;
            let raw = bytes::slice(bytes_in, slot_offset, PK12_SLOT_SIZE)?;
            if bytes::is_all_zero(raw) {
                continue;
            }
            records.push(Pk12::parse(raw, generation)?);
        }
        offset += BOX_HEADER_SIZE + SLOTS_PER_BOX * PK12_SLOT_SIZE;
    }

    Ok((generation, records))
}
