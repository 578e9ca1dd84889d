//! Snapshot persistence for whole runs.
//!
//! A snapshot captures everything reproduction depends on: the
//! configuration, the genome-id counter, the current generation, and the
//! running best. Genomes carry their mutators, so a resumed run continues
//! neuron-id allocation where it left off. Snapshots are JSON files; the
//! format exists for snapshot/resume only and is not versioned.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::genome::{Genome, GenomeIndexer};
use crate::population::Population;

/// On-disk form of a [`Population`].
#[derive(Debug, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    /// When the snapshot was written.
    pub saved_at: DateTime<Utc>,
    /// Configuration the run breeds under.
    pub config: Config,
    /// Genome-id counter, so resumed offspring get fresh ids.
    pub indexer: GenomeIndexer,
    /// The current generation.
    pub genomes: Vec<Genome>,
    /// Running best, if any generation has been evaluated.
    pub best: Option<Genome>,
}

impl<R: Rng> Population<R> {
    /// Writes the population to `path` as JSON.
    ///
    /// # Errors
    /// [`Error::Io`] when the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let snapshot = PopulationSnapshot {
            saved_at: Utc::now(),
            config: self.config().clone(),
            indexer: self.indexer().clone(),
            genomes: self.genomes().to_vec(),
            best: self.best_genome().cloned(),
        };
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &snapshot)
            .map_err(|e| Error::Io(std::io::Error::other(e)))
    }

    /// Restores a population saved with [`save`](Self::save), resuming with
    /// the provided generator.
    ///
    /// # Errors
    /// [`Error::Io`] when the file cannot be read,
    /// [`Error::InvalidArgument`] when it does not decode as a snapshot.
    pub fn load<P: AsRef<Path>>(path: P, rng: R) -> Result<Self> {
        let file = File::open(path)?;
        let snapshot: PopulationSnapshot = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::InvalidArgument(format!("malformed snapshot: {e}")))?;
        Ok(Population::from_parts(
            snapshot.config,
            rng,
            snapshot.indexer,
            snapshot.genomes,
            snapshot.best,
        ))
    }
}
