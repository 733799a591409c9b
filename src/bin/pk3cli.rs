use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pk3_codec::data_structure::pc_box;
use pk3_codec::data_structure::save_data::SaveFile;
use pk3_codec::gen12::{self, LegacyGeneration};
use pk3_codec::pccs;
use pk3_codec::storage::{SourceGeneration, StorageRecord};

#[derive(Parser)]
#[command(name = "pk3cli", about = "Codec tools for Generation III saves and PK3 records")]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Loads a save, re-serializes it without modification, and writes it back out.
    Roundtrip {
        #[arg(long)]
        sav: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Extracts every non-empty PC slot as JSON storage records.
    Import {
        #[arg(long)]
        sav: PathBuf,
        #[arg(long, name = "box")]
        box_index: Option<usize>,
    },
    /// Injects a standalone 80-byte PK3 file into one PC slot.
    Inject {
        #[arg(long)]
        sav: PathBuf,
        #[arg(long)]
        pk3: PathBuf,
        #[arg(long, name = "box")]
        box_index: usize,
        #[arg(long)]
        slot: usize,
        #[arg(long)]
        dest: PathBuf,
    },
    /// Converts a legacy Gen 1/2 save into storage records for every box slot.
    Convert {
        #[arg(long, name = "in")]
        input: PathBuf,
        /// Asserted generation; checked against auto-detection, not a
        /// substitute for it.
        #[arg(long)]
        gen: Option<u8>,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    match opts.command {
        Command::Roundtrip { sav, out } => roundtrip(&sav, &out),
        Command::Import { sav, box_index } => import(&sav, box_index),
        Command::Inject {
            sav,
            pk3,
            box_index,
            slot,
            dest,
        } => inject(&sav, &pk3, box_index, slot, &dest),
        Command::Convert { input, gen, out } => convert(&input, gen, &out),
    }
}

fn roundtrip(sav_path: &PathBuf, out_path: &PathBuf) -> Result<()> {
    let raw = fs::read(sav_path).with_context(|| format!("reading {}", sav_path.display()))?;
    let save = SaveFile::load(&raw).context("loading save")?;
    fs::write(out_path, save.raw()).with_context(|| format!("writing {}", out_path.display()))?;
    log::info!("round-tripped {} bytes, active slot {:?}", raw.len(), save.active());
    Ok(())
}

fn import(sav_path: &PathBuf, box_filter: Option<usize>) -> Result<()> {
    let raw = fs::read(sav_path).with_context(|| format!("reading {}", sav_path.display()))?;
    let save = SaveFile::load(&raw).context("loading save")?;
    let pc_region = save.pc_region().context("reading PC region")?;
    let entries = pc_box::extract_all(&pc_region).context("extracting PC entries")?;

    let records: Vec<StorageRecord> = entries
        .iter()
        .filter(|entry| box_filter.map_or(true, |b| b == entry.box_index))
        .map(|entry| StorageRecord::from_record(&entry.record, SourceGeneration::Gen3))
        .collect::<std::result::Result<_, _>>()
        .context("building storage records")?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn inject(sav_path: &PathBuf, pk3_path: &PathBuf, box_index: usize, slot: usize, dest: &PathBuf) -> Result<()> {
    use pk3_codec::data_structure::pk3_record::{Pk3Record, RECORD_SIZE};

    let sav_raw = fs::read(sav_path).with_context(|| format!("reading {}", sav_path.display()))?;
    let pk3_raw = fs::read(pk3_path).with_context(|| format!("reading {}", pk3_path.display()))?;
    if pk3_raw.len() != RECORD_SIZE {
        bail!("expected an {RECORD_SIZE}-byte PK3 file, found {} bytes", pk3_raw.len());
    }
    let record = Pk3Record::parse(&pk3_raw).context("parsing PK3 file")?;

    let save = SaveFile::load(&sav_raw).context("loading save")?;
    let pc_region = save.pc_region().context("reading PC region")?;
    let (new_region, touched) = pc_box::inject(&pc_region, &[((box_index, slot), record)]).context("injecting PK3")?;
    let new_image = save.reassemble(&new_region, &touched).context("reassembling save")?;

    fs::write(dest, &new_image).with_context(|| format!("writing {}", dest.display()))?;
    log::info!("injected into box {box_index} slot {slot}, touched sections {touched:?}");
    Ok(())
}

fn convert(input_path: &PathBuf, asserted_gen: Option<u8>, out_path: &PathBuf) -> Result<()> {
    let raw = fs::read(input_path).with_context(|| format!("reading {}", input_path.display()))?;
    let (_kind, normalized) = pk3_codec::size::detect_and_normalize(&raw).context("normalizing legacy save")?;
    let (detected, pk12_records) = gen12::decode_gen12(&normalized).context("decoding Gen 1/2 boxes")?;

    if let Some(asserted) = asserted_gen {
        let matches = matches!(
            (asserted, detected),
            (1, LegacyGeneration::Gen1) | (2, LegacyGeneration::Gen2)
        );
        if !matches {
            bail!("--gen {asserted} was given but the save was detected as {detected:?}");
        }
    }

    let source_generation = match detected {
        LegacyGeneration::Gen1 => SourceGeneration::Gen1,
        LegacyGeneration::Gen2 => SourceGeneration::Gen2,
    };

    let storage_records: Vec<StorageRecord> = pk12_records
        .iter()
        .map(|pk12| {
            let record = pccs::convert_pccs(pk12)?;
            StorageRecord::from_record(&record, source_generation)
        })
        .collect::<std::result::Result<_, _>>()
        .context("converting PK12 records")?;

    fs::write(out_path, serde_json::to_string_pretty(&storage_records)?)
        .with_context(|| format!("writing {}", out_path.display()))?;
    log::info!("converted {} legacy {detected:?} records", storage_records.len());
    Ok(())
}
