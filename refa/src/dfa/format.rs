//! Byte-exact on-disk persistence: a small tagged header followed by one flags byte and 256
//! `u64` transition targets per state (always `u64` on disk, independent of the in-memory packed
//! width), optionally gzip-compressed.
//!
//! Missing transitions have no sentinel of their own on disk: saving appends one extra explicit
//! sink state (self-loop on every byte, non-accepting) and points every otherwise-missing edge at
//! it; loading collapses that state back into the implicit `None` DEADEND used everywhere else in
//! this crate.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{Error, Result};

use super::packed::{PackedTable, Width};
use super::Dfa;

const MAGIC: [u8; 8] = [0x57, b'D', b'F', b'A', 0x16, 0x16, 0x16, 0x16];
const VERSION: [u8; 4] = [0x00, 0x01, 0x00, 0x02];
const TAG_VER: &[u8; 4] = b"ver#";
const TAG_CNT: &[u8; 4] = b"cnt#";
const TAG_FST: &[u8; 4] = b"fst#";
const ALG_FLAT: &[u8; 8] = b"alg:flat";
const ALG_GZIP: &[u8; 8] = b"alg:gzip";

const FLAG_FINAL: u8 = 1 << 0;
const FLAG_DEADEND: u8 = 1 << 1;

/// `Flat` stores the per-state payload byte-for-byte; `Gzip` runs it through a gzip stream first.
/// Both are read back the same way the matching writer produced them — loading a flat file is not
/// an error path, just the other branch of the same format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Flat,
    Gzip,
}

fn bps_of(width: Width) -> u32 {
    match width {
        Width::W8 => 8,
        Width::W16 => 16,
        Width::W32 => 32,
        Width::W64 => 64,
    }
}

fn width_for_bps(bps: u32) -> Result<Width> {
    match bps {
        8 => Ok(Width::W8),
        16 => Ok(Width::W16),
        32 => Ok(Width::W32),
        64 => Ok(Width::W64),
        other => Err(Error::FormatMismatch(format!("unsupported bps {other}"))),
    }
}

pub fn save<W: Write>(dfa: &Dfa, algorithm: Algorithm, mut out: W) -> Result<()> {
    let n = dfa.state_count();
    let deadend = n; // one extra state appended below, self-looping and never accepting.
    let state_cnt = n + 1;

    out.write_all(&MAGIC)?;
    out.write_all(TAG_VER)?;
    out.write_all(&VERSION)?;
    out.write_all(TAG_CNT)?;
    out.write_all(&(state_cnt as u64).to_le_bytes())?;
    out.write_all(&bps_of(dfa.width()).to_le_bytes())?;
    out.write_all(TAG_FST)?;
    out.write_all(&(dfa.start() as u64).to_le_bytes())?;
    let comment = dfa.comment().as_bytes();
    out.write_all(&(comment.len() as u64).to_le_bytes())?;
    out.write_all(comment)?;

    let mut payload = Vec::with_capacity(state_cnt * (1 + 256 * 8));
    for s in 0..n {
        let mut flags = 0u8;
        if dfa.is_accepting(s) {
            flags |= FLAG_FINAL;
        }
        payload.push(flags);
        for b in 0u16..256 {
            let target = dfa.step(s, b as u8).unwrap_or(deadend);
            payload.extend_from_slice(&(target as u64).to_le_bytes());
        }
    }
    payload.push(FLAG_DEADEND);
    for _ in 0u16..256 {
        payload.extend_from_slice(&(deadend as u64).to_le_bytes());
    }

    match algorithm {
        Algorithm::Flat => {
            out.write_all(ALG_FLAT)?;
            out.write_all(&payload)?;
        }
        Algorithm::Gzip => {
            out.write_all(ALG_GZIP)?;
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&payload)?;
            out.write_all(&encoder.finish()?)?;
        }
    }
    Ok(())
}

pub fn load<R: Read>(mut input: R) -> Result<Dfa> {
    let mut magic = [0u8; 8];
    input.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(Error::FormatMismatch("bad magic bytes".into()));
    }

    expect_tag(&mut input, TAG_VER)?;
    let mut version = [0u8; 4];
    input.read_exact(&mut version)?;
    if version != VERSION {
        return Err(Error::FormatMismatch(format!("unsupported format version {version:?}")));
    }

    expect_tag(&mut input, TAG_CNT)?;
    let state_cnt = read_u64(&mut input)? as usize;
    let bps = read_u32(&mut input)?;
    let width = width_for_bps(bps)?;

    expect_tag(&mut input, TAG_FST)?;
    let first_index = read_u64(&mut input)? as usize;
    let comment_size = read_u64(&mut input)? as usize;
    let mut comment_bytes = vec![0u8; comment_size];
    input.read_exact(&mut comment_bytes)?;
    let comment = String::from_utf8(comment_bytes)
        .map_err(|_| Error::FormatMismatch("comment is not valid utf-8".into()))?;

    let mut alg_tag = [0u8; 8];
    input.read_exact(&mut alg_tag)?;
    let per_state = 1 + 256 * 8;
    let expected_len = state_cnt * per_state;

    let payload = if alg_tag == *ALG_FLAT {
        let mut buf = vec![0u8; expected_len];
        input.read_exact(&mut buf)?;
        buf
    } else if alg_tag == *ALG_GZIP {
        let mut decoder = GzDecoder::new(input);
        let mut buf = Vec::with_capacity(expected_len);
        decoder.read_to_end(&mut buf)?;
        buf
    } else {
        return Err(Error::FormatMismatch("unknown algorithm tag".into()));
    };

    if payload.len() != expected_len {
        return Err(Error::FormatMismatch(format!(
            "payload is {} bytes, expected {expected_len}",
            payload.len()
        )));
    }

    let mut accepting = vec![false; state_cnt];
    let mut targets = vec![[0usize; 256]; state_cnt];
    let mut deadend: Option<usize> = None;
    for s in 0..state_cnt {
        let base = s * per_state;
        let flags = payload[base];
        accepting[s] = flags & FLAG_FINAL != 0;
        if flags & FLAG_DEADEND != 0 && deadend.is_none() {
            deadend = Some(s);
        }
        for b in 0..256 {
            let off = base + 1 + b * 8;
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&payload[off..off + 8]);
            targets[s][b] = u64::from_le_bytes(raw) as usize;
        }
    }

    // Collapse the flagged sink state back into the implicit `None` DEADEND, and drop it from
    // the live table the way the rest of this crate represents a missing edge.
    let (live_count, remap): (usize, Vec<Option<usize>>) = match deadend {
        None => (state_cnt, (0..state_cnt).map(Some).collect()),
        Some(d) => {
            let mut remap = vec![None; state_cnt];
            let mut next = 0;
            for s in 0..state_cnt {
                if s != d {
                    remap[s] = Some(next);
                    next += 1;
                }
            }
            (next, remap)
        }
    };

    let mut table = PackedTable::new(live_count, live_count.saturating_sub(1));
    table.resize_width(width);
    let mut live_accepting = Vec::with_capacity(live_count);
    for s in 0..state_cnt {
        let Some(new_s) = remap[s] else { continue };
        live_accepting.push(accepting[s]);
        for b in 0..256 {
            let t = targets[s][b];
            let mapped = remap.get(t).copied().flatten();
            table.set(new_s, b as u8, mapped);
        }
    }

    let start = remap
        .get(first_index)
        .copied()
        .flatten()
        .ok_or_else(|| Error::FormatMismatch("start state is the deadend sink".into()))?;

    Ok(Dfa::from_parts_with_comment(table, live_accepting, start, comment))
}

fn expect_tag<R: Read>(input: &mut R, tag: &[u8; 4]) -> Result<()> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    if &buf != tag {
        return Err(Error::FormatMismatch(format!(
            "expected tag {:?}, found {buf:?}",
            std::str::from_utf8(tag).unwrap_or("?")
        )));
    }
    Ok(())
}

fn read_u64<R: Read>(input: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_u32<R: Read>(input: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
