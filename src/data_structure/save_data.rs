//! Generation III save file: two redundant 57,344-byte slots of 14
//! 4,096-byte sections, each ending in a 12-byte footer
//! `(id, checksum, signature, save_counter)`.
//!
//! | Offset   | Size   | Contents |
//! |----------|--------|----------|
//! | 0x000000 | 57,344 | Slot A   |
//! | 0x00E000 | 57,344 | Slot B   |
//!
//! Within a slot, each of the 14 sections is 4,096 bytes: 4,084 bytes of
//! data followed by the footer. The section's role is determined by its
//! `id`, not its position in the file — sections are free to rotate
//! position on every save.
use byteorder::{ByteOrder, LittleEndian};

use crate::data_structure::bytes;
use crate::error::{CodecError, Result};
use crate::gen12::GEN12_SIZE;

pub const SECTION_SIZE: usize = 0x1000;
pub const SECTION_DATA_SIZE: usize = 0x0FF4;
pub const SECTIONS_PER_SLOT: usize = 14;
pub const SLOT_SIZE: usize = SECTION_SIZE * SECTIONS_PER_SLOT;
pub const SLOT_A_OFFSET: usize = 0x0000;
pub const SLOT_B_OFFSET: usize = 0xE000;
pub const SAVE_IMAGE_SIZE: usize = 131_072;
pub const SECTION_SIGNATURE: u32 = 0x0801_2025;
pub const PC_SECTION_FIRST_ID: u16 = 5;
pub const PC_SECTION_LAST_ID: u16 = 13;

/// Sums a section's 4,084-byte data region as 1,021 little-endian u32
/// words with 32-bit wrapping addition, then folds to 16 bits.
pub fn section_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    for word in data.chunks(4) {
        sum = sum.wrapping_add(LittleEndian::read_u32(word));
    }
    let (folded, _) = ((sum & 0xFFFF) as u16).overflowing_add((sum >> 16) as u16);
    folded
}

/// One parsed 4,096-byte section: an owned copy of its data region plus
/// its footer fields.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: u16,
    pub checksum: u16,
    pub signature: u32,
    pub save_counter: u32,
    pub data: Vec<u8>,
}

impl Section {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() != SECTION_SIZE {
            return Err(CodecError::InvalidSize {
                expected: SECTION_SIZE,
                found: raw.len(),
            });
        }
        let data = bytes::slice(raw, 0, SECTION_DATA_SIZE)?.to_vec();
        let id = bytes::read_u16(raw, SECTION_DATA_SIZE)?;
        let checksum = bytes::read_u16(raw, SECTION_DATA_SIZE + 2)?;
        let signature = bytes::read_u32(raw, SECTION_DATA_SIZE + 4)?;
        let save_counter = bytes::read_u32(raw, SECTION_DATA_SIZE + 8)?;
        Ok(Section {
            id,
            checksum,
            signature,
            save_counter,
            data,
        })
    }

    pub fn computed_checksum(&self) -> u16 {
        section_checksum(&self.data)
    }

    pub fn has_valid_id(&self) -> bool {
        self.id <= PC_SECTION_LAST_ID
    }

    pub fn has_valid_signature(&self) -> bool {
        self.signature == SECTION_SIGNATURE
    }

    pub fn has_valid_checksum(&self) -> bool {
        self.computed_checksum() == self.checksum
    }

    pub fn is_valid(&self) -> bool {
        self.has_valid_id() && self.has_valid_signature() && self.has_valid_checksum()
    }
}

/// 14 sections forming one save slot, in raw file order (not necessarily
/// sorted by id — sections rotate position on every save).
#[derive(Debug, Clone)]
pub struct Slot {
    pub sections: Vec<Section>,
}

impl Slot {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() != SLOT_SIZE {
            return Err(CodecError::InvalidSize {
                expected: SLOT_SIZE,
                found: raw.len(),
            });
        }
        let mut sections = Vec::with_capacity(SECTIONS_PER_SLOT);
        for chunk in raw.chunks(SECTION_SIZE) {
            sections.push(Section::parse(chunk)?);
        }
        Ok(Slot { sections })
    }

    /// The slot's nominal counter: the maximum across its sections,
    /// tolerating disagreement between them.
    pub fn counter(&self) -> u32 {
        self.sections.iter().map(|s| s.save_counter).max().unwrap_or(0)
    }

    pub fn section(&self, id: u16) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn duplicate_ids(&self) -> Vec<u16> {
        let mut seen = std::collections::HashSet::new();
        let mut dupes = Vec::new();
        for section in &self.sections {
            if !seen.insert(section.id) && !dupes.contains(&section.id) {
                dupes.push(section.id);
            }
        }
        dupes
    }

    fn missing_ids(&self) -> Vec<u16> {
        let present: std::collections::HashSet<u16> = self.sections.iter().map(|s| s.id).collect();
        (0..SECTIONS_PER_SLOT as u16)
            .filter(|id| !present.contains(id))
            .collect()
    }

    /// Every structural problem with this slot, as the typed errors from
    /// §7's taxonomy rather than ad-hoc strings. A caller diagnosing one
    /// slot on its own (outside the two-slot election in
    /// [`elect_active_slot`]) can match on these directly.
    pub fn invalid_sections(&self) -> Vec<CodecError> {
        let mut problems = Vec::new();
        let dupes = self.duplicate_ids();
        if !dupes.is_empty() {
            problems.push(CodecError::DuplicateSections(dupes));
        }
        let missing = self.missing_ids();
        if !missing.is_empty() {
            problems.push(CodecError::MissingSections(missing));
        }
        for section in &self.sections {
            if !section.has_valid_signature() {
                problems.push(CodecError::BadSignature {
                    section_id: section.id,
                    expected: SECTION_SIGNATURE,
                    found: section.signature,
                });
            } else if !section.has_valid_checksum() {
                problems.push(CodecError::BadChecksum {
                    section_id: section.id,
                    expected: section.checksum,
                    found: section.computed_checksum(),
                });
            }
        }
        problems
    }

    /// Human-readable diagnoses of every way this slot fails validation,
    /// used to build a [`CodecError::CorruptSave`] when both slots fail.
    pub fn invalid_section_descriptions(&self) -> Vec<String> {
        self.invalid_sections().iter().map(ToString::to_string).collect()
    }

    /// Valid iff every section passes its own checks and the 14 ids form
    /// exactly the set `{0..13}` with no duplicates and no gaps.
    pub fn is_valid(&self) -> bool {
        self.sections.len() == SECTIONS_PER_SLOT
            && self.duplicate_ids().is_empty()
            && self.missing_ids().is_empty()
            && self.sections.iter().all(Section::is_valid)
    }

    /// Concatenates sections 5..=13's data regions in id order to form the
    /// logical PC region.
    pub fn pc_region(&self) -> Result<Vec<u8>> {
        let mut region = Vec::with_capacity(SECTION_DATA_SIZE * 9);
        for id in PC_SECTION_FIRST_ID..=PC_SECTION_LAST_ID {
            let section = self
                .section(id)
                .ok_or_else(|| CodecError::MissingSections(vec![id]))?;
            region.extend_from_slice(&section.data);
        }
        Ok(region)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSlot {
    A,
    B,
}

impl ActiveSlot {
    fn file_offset(self) -> usize {
        match self {
            ActiveSlot::A => SLOT_A_OFFSET,
            ActiveSlot::B => SLOT_B_OFFSET,
        }
    }
}

/// Picks the newer slot using the wrap-tolerant unsigned "sequence number
/// greater-than" test, or fails if neither slot is valid.
pub fn elect_active_slot(slot_a: &Slot, slot_b: &Slot) -> Result<ActiveSlot> {
    let a_valid = slot_a.is_valid();
    let b_valid = slot_b.is_valid();

    match (a_valid, b_valid) {
        (true, false) => Ok(ActiveSlot::A),
        (false, true) => Ok(ActiveSlot::B),
        (false, false) => Err(CodecError::CorruptSave {
            slot_a: slot_a.invalid_section_descriptions(),
            slot_b: slot_b.invalid_section_descriptions(),
        }),
        (true, true) => {
            let diff = slot_a.counter().wrapping_sub(slot_b.counter());
            let active = if diff > 0 && diff < 0x8000_0000 {
                ActiveSlot::A
            } else {
                ActiveSlot::B
            };
            log::debug!(
                "slot counters A={} B={}, active slot {active:?}",
                slot_a.counter(),
                slot_b.counter()
            );
            Ok(active)
        }
    }
}

/// Owns a loaded Generation III save image. Exclusively owns the decoded
/// bytes; extracted records are value copies, so the handle can be
/// dropped independently of anything read out of it.
#[derive(Debug, Clone)]
pub struct SaveFile {
    raw: Vec<u8>,
    slot_a: Slot,
    slot_b: Slot,
    active: ActiveSlot,
}

impl SaveFile {
    pub fn load(raw: &[u8]) -> Result<Self> {
        if raw.len() == GEN12_SIZE {
            return Err(CodecError::UnsupportedGeneration(format!(
                "{} bytes matches the Generation I/II save size; use gen12::decode_gen12 instead",
                raw.len()
            )));
        }
        if raw.len() != SAVE_IMAGE_SIZE {
            return Err(CodecError::InvalidSize {
                expected: SAVE_IMAGE_SIZE,
                found: raw.len(),
            });
        }
        let slot_a = Slot::parse(&raw[SLOT_A_OFFSET..SLOT_A_OFFSET + SLOT_SIZE])?;
        let slot_b = Slot::parse(&raw[SLOT_B_OFFSET..SLOT_B_OFFSET + SLOT_SIZE])?;
        let active = match elect_active_slot(&slot_a, &slot_b) {
            Ok(active) => active,
            Err(err) => {
                log::error!("no usable save slot: {err}");
                return Err(err);
            }
        };

        Ok(SaveFile {
            raw: raw.to_vec(),
            slot_a,
            slot_b,
            active,
        })
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn active(&self) -> ActiveSlot {
        self.active
    }

    pub fn active_slot(&self) -> &Slot {
        match self.active {
            ActiveSlot::A => &self.slot_a,
            ActiveSlot::B => &self.slot_b,
        }
    }

    pub fn other_counter(&self) -> u32 {
        match self.active {
            ActiveSlot::A => self.slot_b.counter(),
            ActiveSlot::B => self.slot_a.counter(),
        }
    }

    pub fn pc_region(&self) -> Result<Vec<u8>> {
        self.active_slot().pc_region()
    }

    /// Writes a new PC region back into the active slot, recomputing the
    /// checksum of every touched section and bumping every section's
    /// `save_counter` in that slot to `max(cA, cB) + 1`. Never mutates
    /// `self`; returns a freshly assembled 131,072-byte image.
    pub fn reassemble(&self, new_pc_region: &[u8], touched_ids: &[u16]) -> Result<Vec<u8>> {
        if new_pc_region.len() != SECTION_DATA_SIZE * 9 {
            return Err(CodecError::InvalidSize {
                expected: SECTION_DATA_SIZE * 9,
                found: new_pc_region.len(),
            });
        }

        let mut out = self.raw.clone();
        let slot_offset = self.active.file_offset();
        let next_counter = self.active_slot().counter().max(self.other_counter()) + 1;

        for (position, section) in self.active_slot().sections.iter().enumerate() {
            let section_offset = slot_offset + position * SECTION_SIZE;

            if PC_SECTION_FIRST_ID <= section.id && section.id <= PC_SECTION_LAST_ID {
                if touched_ids.contains(&section.id) {
                    let pc_start = ((section.id - PC_SECTION_FIRST_ID) as usize) * SECTION_DATA_SIZE;
                    let new_data = &new_pc_region[pc_start..pc_start + SECTION_DATA_SIZE];
                    out[section_offset..section_offset + SECTION_DATA_SIZE].copy_from_slice(new_data);
                    let checksum = section_checksum(new_data);
                    log::trace!("recomputed checksum 0x{checksum:04x} for section {}", section.id);
                    bytes::write_u16(&mut out, section_offset + SECTION_DATA_SIZE + 2, checksum)?;
                }
            }

            bytes::write_u32(
                &mut out,
                section_offset + SECTION_DATA_SIZE + 8,
                next_counter,
            )?;
        }

        Ok(out)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn section_round_trips_footer_fields() {
        let raw = section_bytes(5, 12, 0xAB);
        let section = Section::parse(&raw).unwrap();
        assert_eq!(section.id, 5);
        assert_eq!(section.save_counter, 12);
        assert!(section.is_valid());
    }

    #[test]
    fn slot_detects_duplicate_and_missing_ids() {
        let mut raw = slot_bytes(1);
        // Overwrite section 13's id with a duplicate of section 12.
        let last_offset = 13 * SECTION_SIZE + SECTION_DATA_SIZE;
        LittleEndian::write_u16(&mut raw[last_offset..], 12);
        let slot = Slot::parse(&raw).unwrap();
        assert!(!slot.is_valid());
        assert_eq!(slot.duplicate_ids(), vec![12]);
        assert_eq!(slot.missing_ids(), vec![13]);
        assert!(matches!(
            slot.invalid_sections().as_slice(),
            [CodecError::DuplicateSections(ids), CodecError::MissingSections(_)] if ids == &[12]
        ));
    }

    #[test]
    fn slot_reports_bad_signature_and_bad_checksum_as_typed_errors() {
        let mut raw = slot_bytes(1);
        // Corrupt section 0's signature.
        let sig_offset = SECTION_DATA_SIZE + 4;
        LittleEndian::write_u32(&mut raw[sig_offset..], 0xBAD5_1699);
        // Corrupt section 1's data without touching its checksum field.
        let section1_offset = SECTION_SIZE;
        raw[section1_offset] ^= 0xFF;

        let slot = Slot::parse(&raw).unwrap();
        assert!(!slot.is_valid());
        let problems = slot.invalid_sections();
        assert!(problems.iter().any(|e| matches!(
            e,
            CodecError::BadSignature { section_id: 0, .. }
        )));
        assert!(problems.iter().any(|e| matches!(
            e,
            CodecError::BadChecksum { section_id: 1, .. }
        )));
    }

    #[test]
    fn load_rejects_a_legacy_sized_buffer_as_unsupported_generation() {
        use crate::gen12::GEN12_SIZE;
        let raw = vec![0u8; GEN12_SIZE];
        assert!(matches!(
            SaveFile::load(&raw),
            Err(CodecError::UnsupportedGeneration(_))
        ));
    }

    #[test]
    fn higher_counter_slot_wins_plain_comparison() {
        let image = save_image(500, 400);
        let save = SaveFile::load(&image).unwrap();
        assert_eq!(save.active(), ActiveSlot::A);
    }

    #[test]
    fn counter_wrap_selects_the_correct_slot() {
        let image = save_image(0xFFFF_FFFE, 0x0000_0001);
        let save = SaveFile::load(&image).unwrap();
        assert_eq!(save.active(), ActiveSlot::B);
    }

    #[test]
    fn invalid_slot_a_falls_back_to_slot_b() {
        let mut image = save_image(100, 50);
        // Corrupt slot A's section 0 signature.
        let sig_offset = SLOT_A_OFFSET + SECTION_DATA_SIZE + 4;
        image[sig_offset] ^= 0xFF;
        let save = SaveFile::load(&image).unwrap();
        assert_eq!(save.active(), ActiveSlot::B);
    }

    #[test]
    fn both_slots_invalid_is_corrupt_save() {
        let mut image = save_image(1, 1);
        image[SECTION_DATA_SIZE + 4] ^= 0xFF;
        image[SLOT_B_OFFSET + SECTION_DATA_SIZE + 4] ^= 0xFF;
        let err = SaveFile::load(&image).unwrap_err();
        assert!(matches!(err, CodecError::CorruptSave { .. }));
    }

    #[test]
    fn round_trip_without_modification_is_byte_exact() {
        let image = save_image(10, 5);
        let save = SaveFile::load(&image).unwrap();
        let pc_region = save.pc_region().unwrap();
        let reassembled = save.reassemble(&pc_region, &[]).unwrap();

        // No section data changed, but every counter in the active slot
        // must have advanced past the highest existing counter.
        let resaved = SaveFile::load(&reassembled).unwrap();
        assert_eq!(resaved.active_slot().counter(), 11);
        assert_eq!(resaved.pc_region().unwrap(), pc_region);
    }

    #[test]
    fn reassemble_only_recomputes_touched_section_checksums() {
        let image = save_image(1, 0);
        let save = SaveFile::load(&image).unwrap();
        let mut pc_region = save.pc_region().unwrap();
        pc_region[0] ^= 0xFF;
        let reassembled = save.reassemble(&pc_region, &[5]).unwrap();
        let resaved = SaveFile::load(&reassembled).unwrap();
        assert!(resaved.active_slot().section(5).unwrap().is_valid());
        assert_eq!(resaved.active_slot().counter(), 2);
    }
}
