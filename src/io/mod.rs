//! 比对文件读写：FASTA 适配器与二进制快照。

pub mod fasta;
pub mod snapshot;

pub use fasta::{
    read_alignment, read_alignment_file, read_sequences, read_sequences_file, write_alignment, write_alignment_to,
    FastaReader, FastaRecord,
};
pub use snapshot::{is_snapshot_file, Snapshot, SnapshotMeta};
