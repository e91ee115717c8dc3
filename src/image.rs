//! Binary images: a flat run of 16-bit words, no header. Each word is stored
//! high byte first, i.e. byte-swapped relative to a little-endian host.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::decoder::Word;

#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn words_from_bytes(bytes: &[u8]) -> Vec<Word> {
    let chunks = bytes.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        warn!(len = bytes.len(), "image has an odd byte count, ignoring the trailing byte");
    }
    chunks.map(|c| Word::from_be_bytes([c[0], c[1]])).collect()
}

pub fn words_to_bytes(words: &[Word]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

pub fn read_image(path: &Path) -> Result<Vec<Word>, ImageError> {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(words_from_bytes(&bytes))
}

pub fn write_image(path: &Path, words: &[Word]) -> Result<(), ImageError> {
    std::fs::write(path, words_to_bytes(words)).map_err(|source| ImageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
