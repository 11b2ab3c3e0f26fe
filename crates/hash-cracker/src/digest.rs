use sha2::{Digest, Sha256};

/// Digest algorithms a target can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// 128-bit, 32 hex chars
    Md5,
    /// 256-bit, 64 hex chars
    Sha256,
}

impl Algorithm {
    /// Order in which candidates are checked against the targets.
    pub const ALL: [Algorithm; 2] = [Algorithm::Md5, Algorithm::Sha256];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha256 => "sha256",
        }
    }

    pub fn hex_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha256 => 64,
        }
    }

    pub fn from_hex_len(len: usize) -> Option<Algorithm> {
        Algorithm::ALL
            .into_iter()
            .find(|algo| algo.hex_len() == len)
    }
}

/// Lowercase hex digest of `bytes`, no separators.
///
/// Targets are normalized to this exact encoding, any other rendering makes
/// every comparison miss.
pub fn hex_digest(algorithm: Algorithm, bytes: &[u8]) -> String {
    match algorithm {
        Algorithm::Md5 => format!("{:x}", md5::compute(bytes)),
        Algorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
    }
}
