use crc32fast::Hasher;

/// Derive a short hex seed from an arbitrary key using CRC32
pub fn seed_from_key(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Sequential ID generator for element nodes within an editing session
///
/// Ids have the form `<seed>-<n>`. The counter only moves forward, so an id
/// handed out once is never produced again even after its node is deleted.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(session_key: &str) -> Self {
        Self {
            seed: seed_from_key(session_key),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Move the counter past every `<seed>-<n>` id in `ids` that carries
    /// this generator's seed
    pub fn advance_past<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            let issued = id
                .strip_prefix(self.seed.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(n) = issued {
                self.count = self.count.max(n);
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.count
    }
}
