use sha2::Digest;

pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

pub struct Md5Hasher(md5::Context);

impl Hasher for Md5Hasher {
    fn update(&mut self, data: &[u8]) { self.0.consume(data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().0.to_vec() }
}

impl Default for Md5Hasher {
    fn default() -> Self { Self::new() }
}

impl Md5Hasher {
    pub fn new() -> Self { Self(md5::Context::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { md5::compute(data).0.to_vec() }
}

pub struct Sha256Hasher(sha2::Sha256);

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { sha2::Sha256::digest(data).to_vec() }
}
