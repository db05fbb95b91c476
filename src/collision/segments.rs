//! Named Buffer Segments
//!
//! Upload staging for the GPU engine. Bodies and line collections are flattened
//! into contiguous record runs, and each named group maps to a range of slots.
//! A stage either commits whole or leaves the previous upload untouched.

use thiserror::Error;

use crate::collision::records::{BodyPartRecord, BodyRecord, LineCollectionRecord, LineRecord};
use crate::geometry::body::Body;
use crate::geometry::line::LineCollection;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SegmentError {
    #[error("{kind} capacity exceeded: {needed} needed, {capacity} allocated")]
    Capacity {
        kind: &'static str,
        needed: usize,
        capacity: usize,
    },
    #[error("unknown segment '{0}'")]
    UnknownSegment(String),
    #[error("duplicate segment '{0}'")]
    DuplicateSegment(String),
    #[error("nothing uploaded yet")]
    NothingUploaded,
}

/// Contiguous run of buffer slots belonging to one named group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start: u32,
    pub len: u32,
}

impl SegmentRange {
    pub fn end(&self) -> u32 {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Name-to-range map for one upload, in insertion order.
///
/// Uploads hold a handful of groups, so lookup is a linear scan.
#[derive(Debug, Default)]
struct SegmentTable {
    entries: Vec<(String, SegmentRange)>,
}

impl SegmentTable {
    fn insert(&mut self, name: &str, range: SegmentRange) -> Result<(), SegmentError> {
        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(SegmentError::DuplicateSegment(name.to_string()));
        }
        self.entries.push((name.to_string(), range));
        Ok(())
    }

    fn get(&self, name: &str) -> Result<SegmentRange, SegmentError> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|&(_, range)| range)
            .ok_or_else(|| SegmentError::UnknownSegment(name.to_string()))
    }

    fn iter(&self) -> impl Iterator<Item = (&str, SegmentRange)> {
        self.entries
            .iter()
            .map(|&(ref name, range)| (name.as_str(), range))
    }
}

/// Staged body records plus the segment table describing them.
#[derive(Debug)]
pub struct BodyArena {
    records: Vec<BodyRecord>,
    parts: Vec<BodyPartRecord>,
    body_capacity: usize,
    part_capacity: usize,
    table: SegmentTable,
    staged: bool,
}

impl BodyArena {
    pub fn new(body_capacity: usize, part_capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(body_capacity),
            parts: Vec::with_capacity(part_capacity),
            body_capacity,
            part_capacity,
            table: SegmentTable::default(),
            staged: false,
        }
    }

    /// Flatten the named groups into record runs, replacing any previous
    /// stage. On error the previous stage is left intact.
    pub fn stage(&mut self, groups: &[(&str, &[Body])]) -> Result<(), SegmentError> {
        let mut records = Vec::new();
        let mut parts = Vec::new();
        let mut table = SegmentTable::default();

        for &(name, bodies) in groups {
            let start = records.len() as u32;
            for body in bodies {
                if records.len() == self.body_capacity {
                    return Err(SegmentError::Capacity {
                        kind: "body",
                        needed: records.len() + 1,
                        capacity: self.body_capacity,
                    });
                }
                let part_start = parts.len();
                let body_slot = records.len();
                for part in body.parts() {
                    if parts.len() == self.part_capacity {
                        return Err(SegmentError::Capacity {
                            kind: "body part",
                            needed: parts.len() + 1,
                            capacity: self.part_capacity,
                        });
                    }
                    parts.push(BodyPartRecord::encode(part, body_slot));
                }
                records.push(BodyRecord::encode(body, part_start, body.parts().len()));
            }
            let range = SegmentRange {
                start,
                len: records.len() as u32 - start,
            };
            table.insert(name, range)?;
        }

        self.records = records;
        self.parts = parts;
        self.table = table;
        self.staged = true;
        Ok(())
    }

    /// Range of a named segment, or the whole upload when `name` is `None`.
    pub fn range(&self, name: Option<&str>) -> Result<SegmentRange, SegmentError> {
        if !self.staged {
            return Err(SegmentError::NothingUploaded);
        }
        match name {
            Some(name) => self.table.get(name),
            None => Ok(SegmentRange {
                start: 0,
                len: self.records.len() as u32,
            }),
        }
    }

    pub fn records(&self) -> &[BodyRecord] {
        &self.records
    }

    pub fn parts(&self) -> &[BodyPartRecord] {
        &self.parts
    }

    pub fn segments(&self) -> impl Iterator<Item = (&str, SegmentRange)> {
        self.table.iter()
    }
}

/// Staged line collection records plus the segment table describing them.
#[derive(Debug)]
pub struct LineArena {
    records: Vec<LineCollectionRecord>,
    lines: Vec<LineRecord>,
    collection_capacity: usize,
    line_capacity: usize,
    table: SegmentTable,
    staged: bool,
}

impl LineArena {
    pub fn new(collection_capacity: usize, line_capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(collection_capacity),
            lines: Vec::with_capacity(line_capacity),
            collection_capacity,
            line_capacity,
            table: SegmentTable::default(),
            staged: false,
        }
    }

    pub fn stage(&mut self, groups: &[(&str, &[LineCollection])]) -> Result<(), SegmentError> {
        let mut records = Vec::new();
        let mut lines = Vec::new();
        let mut table = SegmentTable::default();

        for &(name, collections) in groups {
            let start = records.len() as u32;
            for collection in collections {
                if records.len() == self.collection_capacity {
                    return Err(SegmentError::Capacity {
                        kind: "line collection",
                        needed: records.len() + 1,
                        capacity: self.collection_capacity,
                    });
                }
                let line_start = lines.len();
                for line in &collection.lines {
                    if lines.len() == self.line_capacity {
                        return Err(SegmentError::Capacity {
                            kind: "line",
                            needed: lines.len() + 1,
                            capacity: self.line_capacity,
                        });
                    }
                    lines.push(LineRecord::encode(line));
                }
                records.push(LineCollectionRecord::encode(
                    collection,
                    line_start,
                    collection.lines.len(),
                ));
            }
            let range = SegmentRange {
                start,
                len: records.len() as u32 - start,
            };
            table.insert(name, range)?;
        }

        self.records = records;
        self.lines = lines;
        self.table = table;
        self.staged = true;
        Ok(())
    }

    pub fn range(&self, name: Option<&str>) -> Result<SegmentRange, SegmentError> {
        if !self.staged {
            return Err(SegmentError::NothingUploaded);
        }
        match name {
            Some(name) => self.table.get(name),
            None => Ok(SegmentRange {
                start: 0,
                len: self.records.len() as u32,
            }),
        }
    }

    pub fn records(&self) -> &[LineCollectionRecord] {
        &self.records
    }

    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    pub fn segments(&self) -> impl Iterator<Item = (&str, SegmentRange)> {
        self.table.iter()
    }
}
