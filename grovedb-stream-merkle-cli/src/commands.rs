use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use grovedb_stream_merkle_tree::{
    Blake3Hasher, Proof, SegmentHasher, Sha256Hasher, build_reader_proof, reader_root,
};
use tracing::{debug, info};

use crate::cli::{HashAlgorithm, SegmentArgs};

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Merkle root of `file`, `None` when the file is empty.
pub fn root(file: &Path, segments: SegmentArgs) -> Result<Option<Vec<u8>>> {
    let reader = open(file)?;
    let root = match segments.hash {
        HashAlgorithm::Blake3 => reader_root(reader, Blake3Hasher::new(), segments.segment_size),
        HashAlgorithm::Sha256 => reader_root(reader, Sha256Hasher::new(), segments.segment_size),
    }
    .with_context(|| format!("failed to hash {}", file.display()))?;
    debug!(file = %file.display(), empty = root.is_none(), "computed root");
    Ok(root)
}

/// Proof for segment `index` of `file`, optionally written to `out`.
pub fn prove(file: &Path, index: u64, out: Option<&Path>, segments: SegmentArgs) -> Result<Proof> {
    let reader = open(file)?;
    let proof = match segments.hash {
        HashAlgorithm::Blake3 => {
            build_reader_proof(reader, Blake3Hasher::new(), segments.segment_size, index)
        }
        HashAlgorithm::Sha256 => {
            build_reader_proof(reader, Sha256Hasher::new(), segments.segment_size, index)
        }
    }
    .with_context(|| format!("failed to prove segment {} of {}", index, file.display()))?;

    if let Some(out) = out {
        let file =
            File::create(out).with_context(|| format!("failed to create {}", out.display()))?;
        let mut writer = BufWriter::new(file);
        proof.write_to(&mut writer)?;
        writer.flush()?;
        info!(out = %out.display(), path_len = proof.path().len(), "wrote proof");
    }
    Ok(proof)
}

fn check<H: SegmentHasher>(mut hasher: H, proof: &Proof, leaf: Option<&[u8]>) -> bool {
    match leaf {
        Some(data) => proof.verify_leaf(&mut hasher, data),
        None => proof.verify(&mut hasher),
    }
}

/// Whether the framed proof in `proof_file` verifies, optionally against
/// the contents of `leaf_file`.
pub fn verify(proof_file: &Path, leaf_file: Option<&Path>, hash: HashAlgorithm) -> Result<bool> {
    let proof = Proof::read_from(&mut open(proof_file)?)
        .with_context(|| format!("failed to read proof {}", proof_file.display()))?;
    let leaf = leaf_file
        .map(|path| fs::read(path).with_context(|| format!("failed to read {}", path.display())))
        .transpose()?;
    let valid = match hash {
        HashAlgorithm::Blake3 => check(Blake3Hasher::new(), &proof, leaf.as_deref()),
        HashAlgorithm::Sha256 => check(Sha256Hasher::new(), &proof, leaf.as_deref()),
    };
    debug!(
        target_index = proof.target_index(),
        leaf_count = proof.leaf_count(),
        valid,
        "verified proof"
    );
    Ok(valid)
}

/// Human-readable rendering of a proof.
pub fn describe(proof: &Proof) -> String {
    let mut out = format!(
        "root: {}\nindex: {}\nleaves: {}\n",
        hex::encode(proof.root()),
        proof.target_index(),
        proof.leaf_count()
    );
    for (i, elem) in proof.path().iter().enumerate() {
        out.push_str(&format!("path[{}]: {}\n", i, hex::encode(elem)));
    }
    out
}
