//! The 80-byte PK3 record: the unencrypted header plus the encrypted,
//! shuffled substructure payload.
use crate::data_structure::bytes;
use crate::data_structure::character_set;
use crate::data_structure::pk3::{self, PAYLOAD_SIZE};
use crate::data_structure::substructures::{Attacks, EvsContest, Growth, Misc, OtId};
use crate::error::{CodecError, Result};

pub const RECORD_SIZE: usize = 80;

/// The four plaintext substructures a record decodes into once decrypted
/// and unshuffled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Substructures {
    pub growth: Growth,
    pub attacks: Attacks,
    pub evs: EvsContest,
    pub misc: Misc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pk3Record {
    pub personality: u32,
    pub ot_id: u32,
    pub nickname: [u8; 10],
    pub language: u16,
    pub ot_name: [u8; 7],
    pub markings: u8,
    pub checksum: u16,
    pub unknown: u16,
    pub payload: [u8; PAYLOAD_SIZE],
}

impl Pk3Record {
    pub fn parse(bytes_in: &[u8]) -> Result<Self> {
        if bytes_in.len() != RECORD_SIZE {
            return Err(CodecError::InvalidSize {
                expected: RECORD_SIZE,
                found: bytes_in.len(),
            });
        }

        let personality = bytes::read_u32(bytes_in, 0)?;
        let ot_id = bytes::read_u32(bytes_in, 4)?;
        let mut nickname = [0u8; 10];
        nickname.copy_from_slice(bytes::slice(bytes_in, 8, 10)?);
        let language = bytes::read_u16(bytes_in, 18)?;
        let mut ot_name = [0u8; 7];
        ot_name.copy_from_slice(bytes::slice(bytes_in, 20, 7)?);
        let markings = bytes::read_u8(bytes_in, 27)?;
        let checksum = bytes::read_u16(bytes_in, 28)?;
        let unknown = bytes::read_u16(bytes_in, 30)?;
        let mut payload = [0u8; PAYLOAD_SIZE];
        payload.copy_from_slice(bytes::slice(bytes_in, 32, PAYLOAD_SIZE)?);

        Ok(Pk3Record {
            personality,
            ot_id,
            nickname,
            language,
            ot_name,
            markings,
            checksum,
            unknown,
            payload,
        })
    }

    pub fn emit(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        bytes::write_u32(&mut out, 0, self.personality).unwrap();
        bytes::write_u32(&mut out, 4, self.ot_id).unwrap();
        bytes::copy_bytes(&mut out, 8, &self.nickname).unwrap();
        bytes::write_u16(&mut out, 18, self.language).unwrap();
        bytes::copy_bytes(&mut out, 20, &self.ot_name).unwrap();
        bytes::write_u8(&mut out, 27, self.markings).unwrap();
        bytes::write_u16(&mut out, 28, self.checksum).unwrap();
        bytes::write_u16(&mut out, 30, self.unknown).unwrap();
        bytes::copy_bytes(&mut out, 32, &self.payload).unwrap();
        out
    }

    /// A record is "empty" when every one of its 80 bytes is zero.
    pub fn is_empty(&self) -> bool {
        bytes::is_all_zero(&self.emit())
    }

    fn crypt_key(&self) -> u32 {
        self.personality ^ self.ot_id
    }

    /// Decrypts and unshuffles the payload into its four typed
    /// substructures. Empty records never decode: callers must check
    /// [`Pk3Record::is_empty`] first.
    pub fn decode_substructures(&self) -> Result<Substructures> {
        if self.is_empty() {
            return Err(CodecError::EmptyPayload);
        }
        let decrypted = pk3::crypt_payload(&self.payload, self.crypt_key())?;
        let chunks = pk3::unshuffle(&decrypted, self.personality);
        Ok(Substructures {
            growth: Growth::parse(&chunks[0]),
            attacks: Attacks::parse(&chunks[1]),
            evs: EvsContest::parse(&chunks[2]),
            misc: Misc::parse(&chunks[3]),
        })
    }

    /// Recomputes the internal checksum from the decrypted substructures
    /// and compares it against the stored value. Errs on an empty record
    /// rather than reporting a pass/fail verdict.
    pub fn verify_checksum(&self) -> Result<bool> {
        if self.is_empty() {
            return Err(CodecError::EmptyPayload);
        }
        let decrypted = pk3::crypt_payload(&self.payload, self.crypt_key())?;
        let chunks = pk3::unshuffle(&decrypted, self.personality);
        Ok(pk3::checksum(&chunks) == self.checksum)
    }

    /// Builds a record from its header fields and plaintext substructures:
    /// computes the checksum, shuffles, and encrypts.
    pub fn from_parts(
        personality: u32,
        ot_id: u32,
        nickname: [u8; 10],
        language: u16,
        ot_name: [u8; 7],
        markings: u8,
        unknown: u16,
        parts: &Substructures,
    ) -> Result<Self> {
        let chunks = [
            parts.growth.emit(),
            parts.attacks.emit(),
            parts.evs.emit(),
            parts.misc.emit(),
        ];
        let checksum = pk3::checksum(&chunks);
        let shuffled = pk3::shuffle(&chunks, personality);
        let key = personality ^ ot_id;
        let payload = pk3::crypt_payload(&shuffled, key)?;

        Ok(Pk3Record {
            personality,
            ot_id,
            nickname,
            language,
            ot_name,
            markings,
            checksum,
            unknown,
            payload,
        })
    }

    pub fn ot_id_parts(&self) -> OtId {
        OtId::unpack(self.ot_id)
    }

    pub fn nickname_str(&self) -> String {
        character_set::decode_gen3(&self.nickname)
    }

    pub fn ot_name_str(&self) -> String {
        character_set::decode_gen3(&self.ot_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structure::substructures::{IvEggAbility, Origins};

    fn sample_substructures() -> Substructures {
        Substructures {
            growth: Growth {
                species: 25,
                held_item: 0,
                experience: 1000,
                pp_bonuses: 0,
                friendship: 70,
                reserved: 0,
            },
            attacks: Attacks {
                moves: [84, 45, 0, 0],
                pp: [15, 35, 0, 0],
            },
            evs: EvsContest {
                hp: 0,
                attack: 0,
                defense: 0,
                speed: 0,
                sp_attack: 0,
                sp_defense: 0,
                contest: [0; 6],
            },
            misc: Misc {
                pokerus: 0,
                met_location: 0,
                origins: Origins {
                    met_level: 5,
                    game_origin: 3,
                    ball: 4,
                    ot_gender: false,
                },
                ivs: IvEggAbility {
                    hp: 31,
                    attack: 20,
                    defense: 20,
                    speed: 31,
                    sp_attack: 15,
                    sp_defense: 15,
                    is_egg: false,
                    ability_slot: false,
                },
                ribbons: 0,
            },
        }
    }

    #[test]
    fn from_parts_round_trips_through_decode() {
        let parts = sample_substructures();
        let record = Pk3Record::from_parts(
            0x1234_5678,
            0xABCD_1234,
            *b"PIKACHU\xFF\xFF\xFF",
            2,
            *b"ASH\xFF\xFF\xFF\xFF",
            0,
            0,
            &parts,
        )
        .unwrap();

        assert!(record.verify_checksum().unwrap());
        let decoded = record.decode_substructures().unwrap();
        assert_eq!(decoded, parts);
    }

    #[test]
    fn parse_emit_round_trips_raw_bytes() {
        let parts = sample_substructures();
        let record = Pk3Record::from_parts(
            1,
            2,
            *b"MEW\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
            0,
            *b"A\xFF\xFF\xFF\xFF\xFF\xFF",
            0,
            0,
            &parts,
        )
        .unwrap();
        let bytes_out = record.emit();
        let reparsed = Pk3Record::parse(&bytes_out).unwrap();
        assert_eq!(reparsed, record);
        assert_eq!(reparsed.emit(), bytes_out);
    }

    #[test]
    fn empty_record_reports_empty_and_rejects_decode() {
        let record = Pk3Record::parse(&[0u8; RECORD_SIZE]).unwrap();
        assert!(record.is_empty());
        assert!(matches!(
            record.decode_substructures(),
            Err(CodecError::EmptyPayload)
        ));
        assert!(matches!(
            record.verify_checksum(),
            Err(CodecError::EmptyPayload)
        ));
    }

    #[test]
    fn parse_rejects_wrong_size() {
        assert!(matches!(
            Pk3Record::parse(&[0u8; 79]),
            Err(CodecError::InvalidSize { .. })
        ));
    }

    #[test]
    fn tampered_checksum_fails_verification() {
        let parts = sample_substructures();
        let mut record = Pk3Record::from_parts(7, 9, [0xFF; 10], 0, [0xFF; 7], 0, 0, &parts).unwrap();
        record.checksum = record.checksum.wrapping_add(1);
        assert_eq!(record.verify_checksum().unwrap(), false);
    }

    #[test]
    fn nickname_and_ot_decode_through_gen3_table() {
        let parts = sample_substructures();
        let record = Pk3Record::from_parts(
            1,
            2,
            character_set::encode_gen3("MEW", 10).try_into().unwrap(),
            0,
            character_set::encode_gen3("RED", 7).try_into().unwrap(),
            0,
            0,
            &parts,
        )
        .unwrap();
        assert_eq!(record.nickname_str(), "MEW");
        assert_eq!(record.ot_name_str(), "RED");
    }
}
