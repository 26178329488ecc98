//! Plain-text inputs and outputs of the `ghcube` binary.
//!
//! * sizes: `genome<TAB>sequence<TAB>length`, the first genome is the reference
//! * occurrences: `kmer<TAB>genome<TAB>sequence<TAB>position<TAB>strand`, rows
//!   sharing a k-mer form one occurrence group
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::libs::cube::Cube;
use crate::libs::ids::{IdMapping, SequenceLengths};
use crate::libs::link::Link;
use crate::libs::occurrence::Occurrence;
use anyhow::{anyhow, bail, Context};
use indexmap::IndexMap;
use std::io::BufRead;

fn fields(line: &str) -> Option<Vec<&str>> {
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.split('\t').collect())
}

/// ```
/// let (ids, lengths) = ghcube::libs::io::read_sizes("tests/ghcube/sizes.tsv").unwrap();
/// assert_eq!(ids.genome_count(), 5);
/// assert_eq!(ids.sequence_count(), 10);
/// assert_eq!(ids.genome_name(0).unwrap(), "species1");
/// assert_eq!(lengths[&ids.sequence_id("s4_3", "species4").unwrap()], 1000);
/// ```
pub fn read_sizes(infile: &str) -> anyhow::Result<(IdMapping, SequenceLengths)> {
    let reader = intspan::reader(infile);
    let mut ids = IdMapping::new();
    let mut lengths = SequenceLengths::default();

    for line in reader.lines() {
        let line = line?;
        let Some(parts) = fields(&line) else {
            continue;
        };
        if parts.len() < 3 {
            bail!("expect genome, sequence and length: {}", line);
        }
        let sid = ids.query_sequence_id(parts[1], parts[0])?;
        let length: u64 = parts[2]
            .parse()
            .with_context(|| format!("invalid length in line: {}", line))?;
        lengths.insert(sid, length);
    }
    if ids.genome_count() == 0 {
        bail!("no sequences in {}", infile);
    }

    Ok((ids, lengths))
}

/// Reads occurrences grouped by k-mer, groups in order of first appearance
pub fn read_occurrence_groups(
    infile: &str,
    ids: &IdMapping,
) -> anyhow::Result<Vec<Vec<Occurrence>>> {
    let reader = intspan::reader(infile);
    let mut groups: IndexMap<String, Vec<Occurrence>> = IndexMap::new();

    for line in reader.lines() {
        let line = line?;
        let Some(parts) = fields(&line) else {
            continue;
        };
        if parts.len() < 5 {
            bail!("expect kmer, genome, sequence, position and strand: {}", line);
        }
        let genome = ids.genome_id(parts[1])?;
        let sequence = ids.sequence_id(parts[2], parts[1])?;
        let position: u64 = parts[3]
            .parse()
            .with_context(|| format!("invalid position in line: {}", line))?;
        let reverse = match parts[4] {
            "+" => false,
            "-" => true,
            s => return Err(anyhow!("invalid strand {} in line: {}", s, line)),
        };

        groups
            .entry(parts[0].to_string())
            .or_default()
            .push(Occurrence::new(genome, sequence, position, reverse));
    }

    Ok(groups.into_values().collect())
}

fn strand(reverse: bool) -> char {
    if reverse {
        '-'
    } else {
        '+'
    }
}

/// `genome:sequence:distance:strand` entries joined by `,`
pub fn format_cube(cube: &Cube, ids: &IdMapping) -> anyhow::Result<String> {
    let parts: Vec<String> = cube
        .tiles()
        .iter()
        .map(|t| -> anyhow::Result<String> {
            Ok(format!(
                "{}:{}:{}:{}",
                ids.genome_name(t.genome)?,
                ids.sequence_name(t.sequence)?,
                t.distance(),
                strand(t.reverse)
            ))
        })
        .collect::<anyhow::Result<_>>()?;
    Ok(parts.join(","))
}

/// `genome:sequence:position:strand` entries joined by `,`
pub fn format_link(link: &Link, ids: &IdMapping) -> anyhow::Result<String> {
    let parts: Vec<String> = link
        .occurrences()
        .iter()
        .map(|o| -> anyhow::Result<String> {
            Ok(format!(
                "{}:{}:{}:{}",
                ids.genome_name(o.genome)?,
                ids.sequence_name(o.sequence)?,
                o.position,
                strand(o.reverse)
            ))
        })
        .collect::<anyhow::Result<_>>()?;
    Ok(parts.join(","))
}
