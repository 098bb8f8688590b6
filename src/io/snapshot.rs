use std::fs::File;
use std::io::{BufReader, BufWriter, Read};

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use crate::container::VectorSiteContainer;

const MAGIC: [u8; 4] = *b"SQST";
const FORMAT_VERSION: u32 = 1;

/// 文件开头是否为快照魔数；读不到 4 字节时返回 false
pub fn is_snapshot_file(path: &str) -> Result<bool> {
    let mut f = File::open(path).map_err(|e| anyhow!("cannot open '{}': {}", path, e))?;
    let mut head = [0u8; 4];
    match f.read_exact(&mut head) {
        Ok(()) => Ok(head == MAGIC),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// 快照的来源信息，便于追溯
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub source_file: Option<String>,
    pub build_args: Option<String>,
    /// RFC 3339
    pub build_timestamp: Option<String>,
}

impl SnapshotMeta {
    /// 记录当前命令行与时间
    pub fn now(source_file: Option<&str>) -> Self {
        Self {
            source_file: source_file.map(str::to_string),
            build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
            build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// 比对的二进制快照（bincode）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    magic: [u8; 4],
    version: u32,
    pub meta: SnapshotMeta,
    pub alignment: VectorSiteContainer,
}

impl Snapshot {
    pub fn new(alignment: VectorSiteContainer, meta: SnapshotMeta) -> Self {
        Self { magic: MAGIC, version: FORMAT_VERSION, meta, alignment }
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = File::create(path).map_err(|e| anyhow!("cannot create snapshot '{}': {}", path, e))?;
        bincode::serialize_into(BufWriter::new(f), self)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = File::open(path).map_err(|e| anyhow!("cannot open snapshot '{}': {}", path, e))?;
        let snap: Self = bincode::deserialize_from(BufReader::new(f))
            .map_err(|e| anyhow!("'{}' is not a valid snapshot: {}", path, e))?;
        snap.check()?;
        Ok(snap)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snap: Self = bincode::deserialize(bytes)?;
        snap.check()?;
        Ok(snap)
    }

    fn check(&self) -> Result<()> {
        if self.magic != MAGIC {
            bail!("bad snapshot magic {:?}", self.magic);
        }
        if self.version != FORMAT_VERSION {
            bail!("unsupported snapshot version {} (expected {})", self.version, FORMAT_VERSION);
        }
        Ok(())
    }
}
