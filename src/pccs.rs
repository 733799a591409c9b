//! PCCS: the community-named Gen-1/2 → PK3 conversion rules. Takes a
//! [`Pk12`] and produces a fully encoded [`Pk3Record`].
use crate::data_structure::character_set;
use crate::data_structure::pk3_record::{Pk3Record, Substructures};
use crate::data_structure::substructures::{Attacks, EvsContest, Growth, IvEggAbility, Misc, Origins};
use crate::error::Result;
use crate::gen12::{Dvs, Pk12};

const DEFAULT_FRIENDSHIP: u8 = 70;
const PCCS_BALL: u8 = 4;
const PCCS_GAME_ORIGIN: u8 = 15;

/// `iv = min(31, 2*dv + 1)`; guarantees `dv = floor(iv/2)` is recoverable.
pub fn convert_iv(dv: u8) -> u8 {
    std::cmp::min(31, 2 * dv + 1)
}

fn isqrt_floor(value: u16) -> u8 {
    let root = (value as f64).sqrt().floor() as u32;
    root.min(255) as u8
}

/// Compresses the five Stat-Experience values (hp, atk, def, spd, spc)
/// into the six EV slots (hp, atk, def, spe, spa, spd), scaling
/// proportionally if their sum would exceed 510.
pub fn compress_evs(stat_exp: &[u16; 5]) -> [u8; 6] {
    let hp = isqrt_floor(stat_exp[0]);
    let atk = isqrt_floor(stat_exp[1]);
    let def = isqrt_floor(stat_exp[2]);
    let spd = isqrt_floor(stat_exp[3]);
    let spc = isqrt_floor(stat_exp[4]);

    let mut evs = [hp, atk, def, spd, spc, spc];
    let sum: u32 = evs.iter().map(|&e| e as u32).sum();
    if sum > 510 {
        for ev in evs.iter_mut() {
            *ev = ((*ev as u32 * 510) / sum) as u8;
        }
    }
    evs
}

/// `(dv.atk + dv.def + dv.spd + dv.spc) mod 25`. Informational: Gen 3
/// has no stored nature field, it derives from `personality mod 25`.
pub fn nature_index(dvs: &Dvs) -> u8 {
    ((dvs.attack as u32 + dvs.defense as u32 + dvs.speed as u32 + dvs.special as u32) % 25) as u8
}

/// The G3 shiny predicate: `(hi XOR lo XOR tid XOR sid) < 8`.
pub fn is_shiny(personality: u32, tid: u16, sid: u16) -> bool {
    let hi = personality >> 16;
    let lo = personality & 0xFFFF;
    (hi ^ lo ^ tid as u32 ^ sid as u32) < 8
}

/// Builds the 32-bit base value from DVs, then nudges `lo`'s bits so the
/// resulting personality's shininess (against `(tid, sid=0)`) matches
/// `want_shiny`.
///
/// The base construction makes `hi == lo` before any adjustment, so
/// `hi XOR lo XOR tid XOR sid` collapses to `tid XOR sid` alone unless the
/// adjustment accounts for `tid`/`sid` directly — nudging only `lo`'s low
/// 3 bits (as the naive reading of the conversion rule suggests) only
/// works when `tid XOR sid`'s upper 13 bits are already zero. This folds
/// `tid`/`sid` into the comparison target so the shininess guarantee
/// holds for every trainer id, not just small ones.
pub fn synthesize_personality(dvs: &Dvs, tid: u16, want_shiny: bool) -> u32 {
    let atk = dvs.attack as u32;
    let def = dvs.defense as u32;
    let spd = dvs.speed as u32;
    let spc = dvs.special as u32;

    let base: u32 = (atk << 28)
        | (def << 24)
        | (spd << 20)
        | (spc << 16)
        | (atk << 12)
        | (def << 8)
        | (spd << 4)
        | spc;
    let hi = base >> 16;
    let lo = base & 0xFFFF;
    let sid: u32 = 0;
    let target = hi ^ tid as u32 ^ sid;

    let currently_shiny = (target ^ lo) < 8;
    let lo_prime = match (want_shiny, currently_shiny) {
        (true, true) | (false, false) => lo,
        (true, false) => target,
        (false, true) => target ^ 8,
    };

    ((hi << 16) | lo_prime) & 0xFFFF_FFFF
}

fn substructures_from_pk12(pk12: &Pk12) -> Substructures {
    let dvs = &pk12.dvs;
    let evs = compress_evs(&pk12.stat_exp);

    Substructures {
        growth: Growth {
            species: pk12.species as u16,
            held_item: 0,
            experience: pk12.experience,
            pp_bonuses: 0,
            friendship: pk12.friendship.unwrap_or(DEFAULT_FRIENDSHIP),
            reserved: 0,
        },
        attacks: Attacks {
            moves: [
                pk12.moves[0] as u16,
                pk12.moves[1] as u16,
                pk12.moves[2] as u16,
                pk12.moves[3] as u16,
            ],
            pp: pk12.pp,
        },
        evs: EvsContest {
            hp: evs[0],
            attack: evs[1],
            defense: evs[2],
            speed: evs[3],
            sp_attack: evs[4],
            sp_defense: evs[5],
            contest: [0; 6],
        },
        misc: Misc {
            pokerus: 0,
            met_location: 0,
            origins: Origins {
                met_level: pk12.level,
                game_origin: PCCS_GAME_ORIGIN,
                ball: PCCS_BALL,
                ot_gender: false,
            },
            ivs: IvEggAbility {
                hp: convert_iv(dvs.hp),
                attack: convert_iv(dvs.attack),
                defense: convert_iv(dvs.defense),
                speed: convert_iv(dvs.speed),
                sp_attack: convert_iv(dvs.special),
                sp_defense: convert_iv(dvs.special),
                is_egg: false,
                ability_slot: false,
            },
            ribbons: 0,
        },
    }
}

/// Converts a PK12 record to a fully encoded PK3 record, preserving its
/// Generation II shininess in the synthesized personality value.
pub fn convert_pccs(pk12: &Pk12) -> Result<Pk3Record> {
    let tid = pk12.ot_id;
    let want_shiny = pk12.dvs.is_gen2_shiny();
    let personality = synthesize_personality(&pk12.dvs, tid, want_shiny);
    let ot_id = tid as u32;

    let nickname: [u8; 10] = character_set::encode_gen3(&pk12.nickname, 10)
        .try_into()
        .expect("encode_gen3 always returns exactly `width` bytes");
    let ot_name: [u8; 7] = character_set::encode_gen3(&pk12.ot_name, 7)
        .try_into()
        .expect("encode_gen3 always returns exactly `width` bytes");

    let parts = substructures_from_pk12(pk12);
    Pk3Record::from_parts(personality, ot_id, nickname, 0, ot_name, 0, 0, &parts)
}
