//! The "storage record" handed to the external vault collaborator: the
//! raw 80-byte PK3 blob plus a handful of redundantly denormalized
//! fields for display and indexing. The vault treats the blob as
//! authoritative; everything else here is cache-only.
use serde::{Deserialize, Serialize};

use crate::data_structure::pk3_record::Pk3Record;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceGeneration {
    Gen1,
    Gen2,
    Gen3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRecord {
    #[serde(with = "blob_as_hex")]
    pub blob: [u8; 80],
    pub species: u16,
    pub nickname: String,
    pub ot_name: String,
    pub level: u8,
    pub tid: u16,
    pub sid: u16,
    pub personality: u32,
    pub valid: bool,
    pub source_generation: SourceGeneration,
}

impl StorageRecord {
    pub fn from_record(record: &Pk3Record, source_generation: SourceGeneration) -> Result<Self> {
        let ids = record.ot_id_parts();
        let valid = record.verify_checksum().unwrap_or(false);
        let (species, level) = if valid {
            let parts = record.decode_substructures()?;
            (parts.growth.species, parts.misc.origins.met_level)
        } else {
            (0, 0)
        };

        Ok(StorageRecord {
            blob: record.emit(),
            species,
            nickname: record.nickname_str(),
            ot_name: record.ot_name_str(),
            level,
            tid: ids.tid,
            sid: ids.sid,
            personality: record.personality,
            valid,
            source_generation,
        })
    }
}

mod blob_as_hex {
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(blob: &[u8; 80], serializer: S) -> Result<S::Ok, S::Error> {
        let hex: String = blob.iter().map(|b| format!("{:02x}", b)).collect();
        hex.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 80], D::Error> {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 160 {
            return Err(D::Error::custom("expected 160 hex characters for an 80-byte blob"));
        }
        let mut blob = [0u8; 80];
        for (i, byte) in blob.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(D::Error::custom)?;
        }
        Ok(blob)
    }
}
