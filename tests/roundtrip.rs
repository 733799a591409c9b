//! End-to-end coverage: build a structurally valid save image from public
//! constants only, inject a record into a PC slot, and check the result
//! survives a fresh parse byte-for-byte outside the touched bytes.
use byteorder::{ByteOrder, LittleEndian};

use pk3_codec::data_structure::pc_box;
use pk3_codec::data_structure::pk3_record::Pk3Record;
use pk3_codec::data_structure::save_data::{
    self, SaveFile, SECTIONS_PER_SLOT, SECTION_DATA_SIZE, SECTION_SIGNATURE, SECTION_SIZE, SLOT_A_OFFSET,
    SLOT_B_OFFSET, SAVE_IMAGE_SIZE,
};
use pk3_codec::data_structure::substructures::{Attacks, EvsContest, Growth, IvEggAbility, Misc, Origins};
use pk3_codec::data_structure::pk3_record::Substructures;

fn section_bytes(id: u16, save_counter: u32) -> Vec<u8> {
    let mut raw = vec![0u8; SECTION_SIZE];
    let data = vec![0u8; SECTION_DATA_SIZE];
    let checksum = save_data::section_checksum(&data);
    raw[0..SECTION_DATA_SIZE].copy_from_slice(&data);
    LittleEndian::write_u16(&mut raw[SECTION_DATA_SIZE..], id);
    LittleEndian::write_u16(&mut raw[SECTION_DATA_SIZE + 2..], checksum);
    LittleEndian::write_u32(&mut raw[SECTION_DATA_SIZE + 4..], SECTION_SIGNATURE);
    LittleEndian::write_u32(&mut raw[SECTION_DATA_SIZE + 8..], save_counter);
    raw
}

fn slot_bytes(save_counter: u32) -> Vec<u8> {
    let mut slot = Vec::new();
    for id in 0..SECTIONS_PER_SLOT as u16 {
        slot.extend_from_slice(&section_bytes(id, save_counter));
    }
    slot
}

fn blank_save_image() -> Vec<u8> {
    let mut image = vec![0u8; SAVE_IMAGE_SIZE];
    image[SLOT_A_OFFSET..SLOT_A_OFFSET + slot_bytes(3).len()].copy_from_slice(&slot_bytes(3));
    image[SLOT_B_OFFSET..SLOT_B_OFFSET + slot_bytes(1).len()].copy_from_slice(&slot_bytes(1));
    image
}

fn sample_record(personality: u32, ot_id: u32, species: u16) -> Pk3Record {
    let parts = Substructures {
        growth: Growth {
            species,
            held_item: 0,
            experience: 0,
            pp_bonuses: 0,
            friendship: 70,
            reserved: 0,
        },
        attacks: Attacks {
            moves: [1, 0, 0, 0],
            pp: [35, 0, 0, 0],
        },
        evs: EvsContest::default(),
        misc: Misc {
            pokerus: 0,
            met_location: 0,
            origins: Origins {
                met_level: 5,
                game_origin: 3,
                ball: 4,
                ot_gender: false,
            },
            ivs: IvEggAbility::default(),
            ribbons: 0,
        },
    };
    Pk3Record::from_parts(personality, ot_id, *b"SAMPLE\xFF\xFF\xFF\xFF", 2, *b"ASH\xFF\xFF\xFF\xFF", 0, 0, &parts).unwrap()
}

#[test]
fn load_inject_and_reload_preserves_everything_untouched() {
    let image = blank_save_image();
    let save = SaveFile::load(&image).unwrap();
    assert_eq!(save.active_slot().counter(), 3);

    let pc_region = save.pc_region().unwrap();
    let record = sample_record(0x1111_2222, 0x3333_4444, 25);
    let (new_region, touched) = pc_box::inject(&pc_region, &[((2, 10), record.clone())]).unwrap();

    let new_image = save.reassemble(&new_region, &touched).unwrap();
    assert_eq!(new_image.len(), SAVE_IMAGE_SIZE);

    let reloaded = SaveFile::load(&new_image).unwrap();
    assert_eq!(reloaded.active_slot().counter(), 4);

    let entries = pc_box::extract_all(&reloaded.pc_region().unwrap()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].box_index, 2);
    assert_eq!(entries[0].slot_index, 10);
    assert_eq!(entries[0].record, record);
    assert!(entries[0].valid);

    let decoded = entries[0].record.decode_substructures().unwrap();
    assert_eq!(decoded.growth.species, 25);
}

#[test]
fn reassembled_save_round_trips_through_a_file() {
    use std::io::{Read, Write};

    let image = blank_save_image();
    let save = SaveFile::load(&image).unwrap();
    let pc_region = save.pc_region().unwrap();
    let record = sample_record(0xAAAA_BBBB, 0xCCCC_DDDD, 1);
    let (new_region, touched) = pc_box::inject(&pc_region, &[((5, 3), record.clone())]).unwrap();
    let new_image = save.reassemble(&new_region, &touched).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&new_image).unwrap();

    let mut read_back = Vec::new();
    std::fs::File::open(file.path())
        .unwrap()
        .read_to_end(&mut read_back)
        .unwrap();

    let reloaded = SaveFile::load(&read_back).unwrap();
    let entries = pc_box::extract_all(&reloaded.pc_region().unwrap()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].record, record);
}

#[test]
fn untouched_sections_survive_reassembly_byte_for_byte() {
    let image = blank_save_image();
    let save = SaveFile::load(&image).unwrap();
    let pc_region = save.pc_region().unwrap();

    let record = sample_record(1, 2, 1);
    let (new_region, touched) = pc_box::inject(&pc_region, &[((0, 0), record)]).unwrap();
    let new_image = save.reassemble(&new_region, &touched).unwrap();

    // Slot B (the inactive slot) is untouched by reassembly.
    assert_eq!(
        &new_image[SLOT_B_OFFSET..SLOT_B_OFFSET + SECTION_SIZE * SECTIONS_PER_SLOT],
        &image[SLOT_B_OFFSET..SLOT_B_OFFSET + SECTION_SIZE * SECTIONS_PER_SLOT],
    );
}
