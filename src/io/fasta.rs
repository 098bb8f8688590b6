use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use anyhow::{anyhow, bail, Result};
use log::{debug, info};

use crate::container::{MutableSequenceContainer, SequenceContainer, SiteContainer, VectorSiteContainer};
use crate::seq::Sequence;
use crate::util::alphabet::Alphabet;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

impl FastaRecord {
    /// 按字母表编码；描述行作为序列注释保留
    pub fn into_sequence(self, alphabet: Alphabet) -> Result<Sequence> {
        let text = String::from_utf8_lossy(&self.seq);
        let seq = Sequence::from_text(self.id.as_str(), &text, alphabet)
            .map_err(|e| anyhow!("sequence '{}': {}", self.id, e))?;
        Ok(seq.with_comments(self.desc.into_iter().collect()))
    }
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), done: false, peek_header: None }
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                self.buf.clear();
                let n = self.reader.read_line(&mut self.buf)?;
                if n == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if let Some(h) = self.buf.strip_prefix('>') {
                    break h.trim().to_string();
                }
                if !self.buf.trim().is_empty() {
                    bail!("sequence data before the first FASTA header: '{}'", self.buf.trim());
                }
            }
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        // 比对文件中的 gap 原样保留，大小写交给字母表处理
        let mut seq: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if let Some(h) = self.buf.strip_prefix('>') {
                self.peek_header = Some(h.trim().to_string());
                break;
            }
            seq.extend(self.buf.bytes().filter(|b| !b.is_ascii_whitespace()));
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

/// 读取未比对的序列，长度可以不同
pub fn read_sequences<R: BufRead>(reader: R, alphabet: Alphabet) -> Result<Vec<Sequence>> {
    let mut fasta = FastaReader::new(reader);
    let mut out = Vec::new();
    while let Some(rec) = fasta.next_record()? {
        out.push(rec.into_sequence(alphabet)?);
    }
    Ok(out)
}

pub fn read_sequences_file(path: &str, alphabet: Alphabet) -> Result<Vec<Sequence>> {
    let fh = File::open(path).map_err(|e| anyhow!("cannot open FASTA '{}': {}", path, e))?;
    read_sequences(BufReader::new(fh), alphabet).map_err(|e| anyhow!("'{}': {}", path, e))
}

/// 读取比对 FASTA：逐条 `add_sequence`，第一条序列决定列数，重名报错
pub fn read_alignment<R: BufRead>(reader: R, alphabet: Alphabet) -> Result<VectorSiteContainer> {
    let mut fasta = FastaReader::new(reader);
    let mut out = VectorSiteContainer::new(alphabet);
    while let Some(rec) = fasta.next_record()? {
        let id = rec.id.clone();
        let seq = rec.into_sequence(alphabet)?;
        out.add_sequence(seq, true).map_err(|e| anyhow!("sequence '{}': {}", id, e))?;
    }
    debug!("read {} sequences x {} sites", out.num_sequences(), out.num_sites());
    Ok(out)
}

pub fn read_alignment_file(path: &str, alphabet: Alphabet) -> Result<VectorSiteContainer> {
    let fh = File::open(path).map_err(|e| anyhow!("cannot open alignment FASTA '{}': {}", path, e))?;
    let c = read_alignment(BufReader::new(fh), alphabet).map_err(|e| anyhow!("'{}': {}", path, e))?;
    if c.num_sequences() == 0 {
        bail!("FASTA file '{}' contains no sequences", path);
    }
    info!("{}: {} sequences, {} sites ({})", path, c.num_sequences(), c.num_sites(), alphabet);
    Ok(c)
}

/// 按 `line_width` 个字符折行写出（0 表示不折行）
pub fn write_alignment<W, C>(out: &mut W, c: &C, line_width: usize) -> Result<()>
where
    W: Write,
    C: SiteContainer + ?Sized,
{
    for i in 0..c.num_sequences() {
        let seq = c.sequence(i)?;
        match seq.comments().first() {
            Some(desc) => writeln!(out, ">{} {}", seq.name(), desc)?,
            None => writeln!(out, ">{}", seq.name())?,
        }
        let text = seq.to_text();
        if line_width == 0 || text.is_empty() {
            writeln!(out, "{}", text)?;
            continue;
        }
        for chunk in text.as_bytes().chunks(line_width) {
            out.write_all(chunk)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// 写到文件；`path` 为 `None` 时写到标准输出
pub fn write_alignment_to<C: SiteContainer + ?Sized>(path: Option<&str>, c: &C, line_width: usize) -> Result<()> {
    let mut out: Box<dyn Write> = match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).map_err(|e| anyhow!("cannot create '{}': {}", p, e))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    write_alignment(&mut out, c, line_width)?;
    out.flush()?;
    Ok(())
}
