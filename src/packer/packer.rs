//! `IndexPacker` — the chain algorithm that produces the full snapshot,
//! optional incremental chunks, and the `.properties` publication state.
//!
//! Modelled on a `RecoveryManager`/`Checkpoint` pair: load existing
//! state, decide what changed since, write-then-rename. The
//! delta itself is computed from a persisted baseline `UINFO` set
//! (`packer::baseline`) rather than `docId` ordering, recorded as an
//! open-question decision in `DESIGN.md`, because this crate's `docId`s
//! (snapshot vector positions) are not stable across `optimize`.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::core::error::Result;
use crate::core::hex;
use crate::index::IndexingContext;
use crate::packer::baseline::{self, Baseline};
use crate::packer::format;
use crate::packer::properties::{self, PublicationState};
use crate::packer::zip_writer;
use crate::schema::FieldRegistry;
use crate::storage::StoredDocument;

pub const INDEX_FILE_STEM: &str = "nexus-maven-repository-index";

#[derive(Debug, Clone)]
pub struct PackOptions {
    pub create_checksum_files: bool,
    pub create_incremental_chunks: bool,
    pub max_index_chunks: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        PackOptions {
            create_checksum_files: true,
            create_incremental_chunks: true,
            max_index_chunks: 20,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IndexPacker;

impl IndexPacker {
    pub fn new() -> Self {
        IndexPacker
    }

    pub fn pack(&self, ctx: &IndexingContext, output_dir: &Path, options: &PackOptions) -> Result<()> {
        fs::create_dir_all(output_dir)?;

        let properties_path = output_dir.join(format!("{INDEX_FILE_STEM}.properties"));
        let baseline_path = output_dir.join(format!("{INDEX_FILE_STEM}.baseline"));
        let full_gz_path = output_dir.join(format!("{INDEX_FILE_STEM}.gz"));
        let full_zip_path = output_dir.join(format!("{INDEX_FILE_STEM}.zip"));

        let documents = ctx.snapshot()?;
        let fields = ctx.creators().fields();
        let context_timestamp = ctx.timestamp();

        let prev_state = properties::load(&properties_path)?;
        let prev_baseline = baseline::load(&baseline_path)?;
        let chain_reset = match (&prev_state, &prev_baseline) {
            (Some(_), Some(b)) => b.generation != ctx.generation(),
            _ => true,
        };

        if !chain_reset {
            if let Some(prev_state) = &prev_state {
                if context_timestamp <= prev_state.timestamp {
                    write_full_snapshot(&full_gz_path, &full_zip_path, context_timestamp, &documents, fields, options)?;
                    return Ok(());
                }
            }
        }

        write_full_snapshot(&full_gz_path, &full_zip_path, context_timestamp, &documents, fields, options)?;

        let live_uinfo: HashSet<String> = documents
            .iter()
            .filter_map(|d| d.uinfo().map(str::to_string))
            .collect();

        if chain_reset {
            prune_chunks(output_dir, &HashSet::new())?;
            properties::save(
                &properties_path,
                &PublicationState {
                    id: ctx.id().to_string(),
                    timestamp: context_timestamp,
                    chain_id: mint_chain_id(),
                    last_incremental: 0,
                    incrementals: Vec::new(),
                },
            )?;
            baseline::save(
                &baseline_path,
                &Baseline {
                    generation: ctx.generation(),
                    uinfo: live_uinfo.into_iter().collect(),
                },
            )?;
            return Ok(());
        }

        let prev_state = prev_state.expect("chain_reset false implies prior state present");
        let prev_baseline = prev_baseline.expect("chain_reset false implies prior baseline present");

        if !options.create_incremental_chunks {
            properties::save(
                &properties_path,
                &PublicationState {
                    timestamp: context_timestamp,
                    ..prev_state
                },
            )?;
            baseline::save(
                &baseline_path,
                &Baseline {
                    generation: ctx.generation(),
                    uinfo: live_uinfo.into_iter().collect(),
                },
            )?;
            return Ok(());
        }

        let prev_uinfo = prev_baseline.uinfo_set();
        let added = documents.iter().filter(|d| match d {
            StoredDocument::Live(doc) => doc.get("u").map(|u| !prev_uinfo.contains(u)).unwrap_or(false),
            _ => false,
        });
        let removed = prev_uinfo
            .iter()
            .filter(|u| !live_uinfo.contains(*u))
            .map(|u| StoredDocument::Tombstone { uinfo: u.clone() });
        let delta: Vec<StoredDocument> = added.cloned().chain(removed).collect();

        let new_counter = prev_state.last_incremental + 1;
        let chunk_path = output_dir.join(format!("{INDEX_FILE_STEM}.{new_counter}.gz"));
        write_gz(&chunk_path, context_timestamp, &delta, fields)?;
        if options.create_checksum_files {
            write_checksums(&chunk_path)?;
        }

        let mut incrementals = vec![new_counter];
        incrementals.extend(prev_state.incrementals);
        incrementals.truncate(options.max_index_chunks);
        let retained: HashSet<u64> = incrementals.iter().copied().collect();
        prune_chunks(output_dir, &retained)?;

        properties::save(
            &properties_path,
            &PublicationState {
                id: ctx.id().to_string(),
                timestamp: context_timestamp,
                chain_id: prev_state.chain_id,
                last_incremental: new_counter,
                incrementals,
            },
        )?;
        baseline::save(
            &baseline_path,
            &Baseline {
                generation: ctx.generation(),
                uinfo: live_uinfo.into_iter().collect(),
            },
        )?;

        Ok(())
    }
}

fn write_full_snapshot(
    gz_path: &Path,
    zip_path: &Path,
    timestamp: chrono::DateTime<chrono::Utc>,
    documents: &[StoredDocument],
    fields: &FieldRegistry,
    options: &PackOptions,
) -> Result<()> {
    write_gz(gz_path, timestamp, documents, fields)?;
    if options.create_checksum_files {
        write_checksums(gz_path)?;
    }

    let mut frame = Vec::new();
    format::write_snapshot(&mut frame, timestamp, documents, fields)?;
    let tmp = PathBuf::from(format!("{}.tmp", zip_path.display()));
    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        zip_writer::write_zip(&mut writer, &[(&format!("{INDEX_FILE_STEM}.index"), &frame)])?;
    }
    fs::rename(&tmp, zip_path)?;
    Ok(())
}

fn write_gz(
    path: &Path,
    timestamp: chrono::DateTime<chrono::Utc>,
    documents: &[StoredDocument],
    fields: &FieldRegistry,
) -> Result<()> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    {
        let file = File::create(&tmp)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        format::write_snapshot(&mut encoder, timestamp, documents, fields)?;
        encoder.finish()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_checksums(path: &Path) -> Result<()> {
    use md5::{Digest as Md5Digest, Md5};
    use sha1::{Digest as Sha1Digest, Sha1};

    let bytes = fs::read(path)?;
    fs::write(
        format!("{}.sha1", path.display()),
        format!("{}\n", hex::encode(&Sha1::digest(&bytes))),
    )?;
    fs::write(
        format!("{}.md5", path.display()),
        format!("{}\n", hex::encode(&Md5::digest(&bytes))),
    )?;
    Ok(())
}

/// Deletes `<INDEX_FILE>.<n>.gz` chunk files (and their checksum
/// siblings) whose counter is not in `retained`.
fn prune_chunks(output_dir: &Path, retained: &HashSet<u64>) -> Result<()> {
    let prefix = format!("{INDEX_FILE_STEM}.");
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(rest) = name.strip_prefix(&prefix) else {
            continue;
        };
        let Some(counter_str) = rest.strip_suffix(".gz") else {
            continue;
        };
        let Ok(counter) = counter_str.parse::<u64>() else {
            continue;
        };
        if !retained.contains(&counter) {
            let _ = fs::remove_file(entry.path());
            let _ = fs::remove_file(format!("{}.sha1", entry.path().display()));
            let _ = fs::remove_file(format!("{}.md5", entry.path().display()));
        }
    }
    Ok(())
}

fn mint_chain_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
