use std::time::Instant;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HashDataInput {
    pub data: String,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashDataResult {
    pub hash: String,
    pub algorithm: HashAlgorithm,
    pub input_length: usize,
    pub computation_time_ms: u64,
}

/// Hex digest of the UTF-8 bytes of `data`.
pub async fn hash_data(input: &HashDataInput) -> eyre::Result<HashDataResult> {
    let started = Instant::now();
    let bytes = input.data.as_bytes();

    let hash = match input.algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
    };

    Ok(HashDataResult {
        hash,
        algorithm: input.algorithm,
        input_length: bytes.len(),
        computation_time_ms: started.elapsed().as_millis() as u64,
    })
}
