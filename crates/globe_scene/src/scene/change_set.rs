//! # Change Sets
//!
//! Managers never touch the [`Scene`](super::Scene) directly. They append
//! [`ChangeRecord`]s to a [`ChangeSet`], and the scene applies the whole set at
//! a frame boundary.
//!
//! ## Ordering
//!
//! Records are kept in emission order. Nothing in this module sorts, merges or
//! drops records: an add followed by a disable for the same id must reach the
//! scene in that order.

use crate::billboard::BillboardDrawable;
use crate::foundation::ids::{BillboardId, ObjectId, ShaderId};

/// A single scene mutation
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeRequest {
    /// Create billboard objects
    AddBillboards {
        /// Ids of the new objects, parallel to `drawables`
        ids: Vec<BillboardId>,
        /// Geometry and draw state per billboard
        drawables: Vec<BillboardDrawable>,
        /// Shader the batch draws with
        shader: ShaderId,
        /// Initial enable state
        enabled: bool,
    },
    /// Turn objects on or off
    SetEnable {
        /// Target objects
        ids: Vec<ObjectId>,
        /// New state
        enabled: bool,
    },
    /// Delete objects
    Remove {
        /// Target objects
        ids: Vec<ObjectId>,
    },
}

impl ChangeRequest {
    /// Number of objects the request touches
    pub fn id_count(&self) -> usize {
        match self {
            Self::AddBillboards { ids, .. } => ids.len(),
            Self::SetEnable { ids, .. } | Self::Remove { ids } => ids.len(),
        }
    }

    /// Short name for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddBillboards { .. } => "AddBillboards",
            Self::SetEnable { .. } => "SetEnable",
            Self::Remove { .. } => "Remove",
        }
    }
}

/// A request plus the earliest scene time it may be applied
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    /// The mutation
    pub request: ChangeRequest,
    /// Scene clock time before which the record is held back; `None` applies at once
    pub when: Option<f64>,
}

impl ChangeRecord {
    /// Record applied at the next `apply_changes`
    pub const fn immediate(request: ChangeRequest) -> Self {
        Self { request, when: None }
    }

    /// Record held back until the scene clock reaches `when`
    ///
    /// A NaN time has no place on the clock and makes the record immediate.
    pub fn at(when: f64, request: ChangeRequest) -> Self {
        Self {
            request,
            when: (!when.is_nan()).then_some(when),
        }
    }

    /// Whether the record may be applied at scene time `now`
    ///
    /// NaN counts as due, so records built by hand with a NaN time are not
    /// parked forever.
    pub fn is_due(&self, now: f64) -> bool {
        self.when.map_or(true, |when| when.is_nan() || when <= now)
    }
}

/// Ordered, append-only buffer of pending scene mutations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    records: Vec<ChangeRecord>,
}

impl ChangeSet {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a change set with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Append a record at the tail
    pub fn append(&mut self, record: ChangeRecord) {
        self.records.push(record);
    }

    /// Append a request with no delay
    pub fn push(&mut self, request: ChangeRequest) {
        self.append(ChangeRecord::immediate(request));
    }

    /// Append a request held back until scene time `when`
    pub fn push_at(&mut self, when: f64, request: ChangeRequest) {
        self.append(ChangeRecord::at(when, request));
    }

    /// Move every record of `other` to the tail of this set
    pub fn extend_from(&mut self, other: &mut Self) {
        self.records.append(&mut other.records);
    }

    /// Take all records in emission order, leaving the set empty
    pub fn drain(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.records)
    }

    /// Records in emission order
    pub fn iter(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter()
    }

    /// Last appended record
    pub fn last(&self) -> Option<&ChangeRecord> {
        self.records.last()
    }

    /// Number of pending records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are pending
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
