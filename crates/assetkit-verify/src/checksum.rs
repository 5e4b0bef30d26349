use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::{Hasher, Md5Hasher, Result, Sha256Hasher, VerifyError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Md5,
    Sha256,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }

    fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha256 => 32,
        }
    }

    /// Hash everything `reader` yields.
    pub fn digest_reader<R: Read>(self, mut reader: R) -> io::Result<Vec<u8>> {
        match self {
            Self::Md5 => drain(&mut reader, Md5Hasher::new()),
            Self::Sha256 => drain(&mut reader, Sha256Hasher::new()),
        }
    }
}

fn drain<R: Read, H: Hasher>(reader: &mut R, mut hasher: H) -> io::Result<Vec<u8>> {
    let mut buffer = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize())
}

/// An expected digest, stored decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checksum {
    algorithm: Algorithm,
    digest: Vec<u8>,
}

impl Checksum {
    /// Parse a hex digest for `algorithm`. Surrounding whitespace is ignored
    /// and case does not matter.
    pub fn parse(algorithm: Algorithm, hex_digest: &str) -> Result<Self> {
        let trimmed = hex_digest.trim();
        let malformed = || VerifyError::MalformedDigest {
            algorithm: algorithm.name(),
            digest: trimmed.to_string(),
        };
        let digest = hex::decode(trimmed).map_err(|_| malformed())?;
        if digest.len() != algorithm.digest_len() {
            return Err(malformed());
        }
        Ok(Self { algorithm, digest })
    }

    pub fn md5(hex_digest: &str) -> Result<Self> {
        Self::parse(Algorithm::Md5, hex_digest)
    }

    pub fn sha256(hex_digest: &str) -> Result<Self> {
        Self::parse(Algorithm::Sha256, hex_digest)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.digest)
    }

    pub fn matches_bytes(&self, data: &[u8]) -> bool {
        let actual = match self.algorithm {
            Algorithm::Md5 => Md5Hasher::digest(data),
            Algorithm::Sha256 => Sha256Hasher::digest(data),
        };
        actual == self.digest
    }

    /// Hash the file at `path` and compare.
    pub fn verify_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let read_err = |e| VerifyError::Read {
            path: path.to_path_buf(),
            source: e,
        };
        let file = File::open(path).map_err(read_err)?;
        let actual = self.algorithm.digest_reader(file).map_err(read_err)?;
        if actual == self.digest {
            Ok(())
        } else {
            Err(VerifyError::Mismatch {
                expected: self.to_hex(),
                actual: hex::encode(actual),
            })
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.name(), self.to_hex())
    }
}
