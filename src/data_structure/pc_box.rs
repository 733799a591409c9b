//! PC storage: a flat byte stream spanning the data regions of sections
//! 5..=13, holding a 4-byte header followed by 14 boxes of 30 PK3 slots.
//!
//! This is the flat-stream model: slot `k = 30*box + slot` begins at
//! byte `4 + 80*k` of the concatenated region and may straddle a section
//! boundary. It does not assume 14 Pokémon fit neatly inside any single
//! section.
use crate::data_structure::bytes;
use crate::data_structure::pk3_record::{Pk3Record, RECORD_SIZE};
use crate::data_structure::save_data::SECTION_DATA_SIZE;
use crate::error::{CodecError, Result};

pub const BOXES: usize = 14;
pub const SLOTS_PER_BOX: usize = 30;
pub const HEADER_SIZE: usize = 4;
pub const LOGICAL_REGION_SIZE: usize = HEADER_SIZE + BOXES * SLOTS_PER_BOX * RECORD_SIZE;
const FIRST_PC_SECTION_ID: u16 = 5;

fn slot_offset(box_index: usize, slot_index: usize) -> usize {
    HEADER_SIZE + RECORD_SIZE * (SLOTS_PER_BOX * box_index + slot_index)
}

/// One extracted box slot: its coordinates, the decoded record, and
/// whether its stored checksum verifies.
#[derive(Debug, Clone)]
pub struct PcEntry {
    pub box_index: usize,
    pub slot_index: usize,
    pub record: Pk3Record,
    pub valid: bool,
}

/// Reads the leading box-index header from the PC region.
pub fn current_box_index(pc_region: &[u8]) -> Result<u16> {
    bytes::read_u16(pc_region, 0)
}

/// Walks all 420 logical slots, skipping empty ones, and decodes the
/// rest into [`PcEntry`] records.
pub fn extract_all(pc_region: &[u8]) -> Result<Vec<PcEntry>> {
    let mut entries = Vec::new();
    for box_index in 0..BOXES {
        for slot_index in 0..SLOTS_PER_BOX {
            let offset = slot_offset(box_index, slot_index);
            let raw = bytes::slice(pc_region, offset, RECORD_SIZE)?;
            if bytes::is_all_zero(raw) {
                continue;
            }
            let record = Pk3Record::parse(raw)?;
            let valid = record.verify_checksum().unwrap_or(false);
            entries.push(PcEntry {
                box_index,
                slot_index,
                record,
                valid,
            });
        }
    }
    Ok(entries)
}

/// Which 4,084-byte section data region (by section id) a PC-region byte
/// offset falls inside.
fn section_id_for_offset(offset: usize) -> u16 {
    FIRST_PC_SECTION_ID + (offset / SECTION_DATA_SIZE) as u16
}

/// Overwrites the given `((box, slot), record)` targets in the PC region.
/// Overlapping targets are applied in order, so the last one wins.
/// Returns the new region plus the sorted, deduplicated set of section
/// ids whose data was touched, for the caller to recompute checksums on.
pub fn inject(pc_region: &[u8], writes: &[((usize, usize), Pk3Record)]) -> Result<(Vec<u8>, Vec<u16>)> {
    let mut region = pc_region.to_vec();
    let mut touched = std::collections::BTreeSet::new();

    for ((box_index, slot_index), record) in writes {
        if *box_index >= BOXES {
            return Err(CodecError::OutOfRange {
                what: "box",
                index: *box_index,
                bound: BOXES,
            });
        }
        if *slot_index >= SLOTS_PER_BOX {
            return Err(CodecError::OutOfRange {
                what: "slot",
                index: *slot_index,
                bound: SLOTS_PER_BOX,
            });
        }

        let offset = slot_offset(*box_index, *slot_index);
        bytes::copy_bytes(&mut region, offset, &record.emit())?;

        let first_id = section_id_for_offset(offset);
        let last_id = section_id_for_offset(offset + RECORD_SIZE - 1);
        for id in first_id..=last_id {
            touched.insert(id);
        }
    }

    let touched: Vec<u16> = touched.into_iter().collect();
    log::info!("injected {} record(s), touched sections {touched:?}", writes.len());
    Ok((region, touched))
}
