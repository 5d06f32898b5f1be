//! The scene: authoritative registry of renderable objects
//!
//! The object map only changes inside [`Scene::apply_changes`] and
//! [`Scene::advance_to`]. Both take `&mut self`, so no render pass can be
//! reading the map while a change set is half applied.

use super::change_set::{ChangeRecord, ChangeRequest, ChangeSet};
use super::scene_object::SceneObject;
use super::shader_registry::{SceneError, ShaderProgram, SharedShaderRegistry};
use crate::config::SceneConfig;
use crate::foundation::collections::IndexedSlotMap;
use crate::foundation::ids::{ObjectId, ShaderId};
use crate::foundation::runtime;
use std::cmp::Ordering;

/// Outcome of applying change records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Records applied
    pub applied: usize,
    /// Records parked until their time comes
    pub deferred: usize,
    /// Ids named by enable/remove records that the scene did not hold
    pub missing_ids: usize,
}

impl ApplyReport {
    fn merge(&mut self, other: Self) {
        self.applied += other.applied;
        self.deferred += other.deferred;
        self.missing_ids += other.missing_ids;
    }
}

/// A record waiting for the scene clock, with its arrival order
#[derive(Debug)]
struct TimedRecord {
    sequence: u64,
    record: ChangeRecord,
}

impl TimedRecord {
    fn when(&self) -> f64 {
        self.record.when.unwrap_or(f64::NEG_INFINITY)
    }

    /// Queue order: time first, then arrival
    fn cmp_key(&self, when: f64, sequence: u64) -> Ordering {
        self.when()
            .total_cmp(&when)
            .then(self.sequence.cmp(&sequence))
    }
}

/// Mutable registry of every renderable object, keyed by identifier
pub struct Scene {
    config: SceneConfig,
    objects: IndexedSlotMap<ObjectId, SceneObject>,
    shaders: SharedShaderRegistry,
    /// Sorted by (when, arrival)
    timed: Vec<TimedRecord>,
    next_sequence: u64,
    time: f64,
}

impl Scene {
    /// Create a scene with default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a scene with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        runtime::ensure_initialized();
        log::debug!("Creating scene at t={}", config.start_time);
        Self {
            time: config.start_time,
            config,
            objects: IndexedSlotMap::new(),
            shaders: SharedShaderRegistry::default(),
            timed: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Shader registry shared with managers bound to this scene
    pub fn shaders(&self) -> &SharedShaderRegistry {
        &self.shaders
    }

    /// Register a shader program under a fresh handle
    pub fn register_shader(&mut self, program: ShaderProgram) -> ShaderId {
        let name = program.name.clone();
        let id = self.shaders.write().add(program);
        log::info!("Registered shader '{}' as {}", name, id);
        id
    }

    /// Register a shader program under a handle chosen by the renderer
    pub fn register_shader_with_id(&mut self, id: ShaderId, program: ShaderProgram) -> Result<(), SceneError> {
        self.shaders.write().insert(id, program)?;
        log::info!("Registered shader {}", id);
        Ok(())
    }

    /// Unregister a shader program
    pub fn remove_shader(&mut self, id: ShaderId) -> Option<ShaderProgram> {
        self.shaders.write().remove(id)
    }

    /// Whether `id` names a registered shader
    pub fn has_shader(&self, id: ShaderId) -> bool {
        self.shaders.read().contains(id)
    }

    /// Current scene clock (seconds)
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Records waiting for the scene clock
    pub fn pending_timed(&self) -> usize {
        self.timed.len()
    }

    /// Apply and clear a change set
    ///
    /// Parked records that have come due run first since they were emitted
    /// earlier, then the new records in emission order. Records stamped
    /// later than the scene clock are parked.
    pub fn apply_changes(&mut self, changes: &mut ChangeSet) -> ApplyReport {
        let mut report = self.flush_due();

        for record in changes.drain() {
            if record.is_due(self.time) {
                report.merge(self.apply_request(record.request));
            } else {
                self.park(record);
                report.deferred += 1;
            }
        }

        log::trace!(
            "Applied {} records ({} deferred, {} missing ids)",
            report.applied,
            report.deferred,
            report.missing_ids
        );
        report
    }

    /// Move the scene clock forward and apply records that have come due
    ///
    /// The clock never runs backwards; an earlier `time` only flushes.
    pub fn advance_to(&mut self, time: f64) -> ApplyReport {
        if time > self.time {
            self.time = time;
        }
        self.flush_due()
    }

    fn park(&mut self, record: ChangeRecord) {
        let timed = TimedRecord {
            sequence: self.next_sequence,
            record,
        };
        self.next_sequence += 1;
        let (when, sequence) = (timed.when(), timed.sequence);
        let position = self
            .timed
            .partition_point(|r| r.cmp_key(when, sequence) == Ordering::Less);
        self.timed.insert(position, timed);
    }

    fn flush_due(&mut self) -> ApplyReport {
        let due_count = self.timed.partition_point(|r| r.record.is_due(self.time));
        let due: Vec<TimedRecord> = self.timed.drain(..due_count).collect();

        let mut report = ApplyReport::default();
        for timed in due {
            log::trace!("Applying timed record #{}", timed.sequence);
            report.merge(self.apply_request(timed.record.request));
        }
        report
    }

    fn apply_request(&mut self, request: ChangeRequest) -> ApplyReport {
        let mut report = ApplyReport {
            applied: 1,
            ..ApplyReport::default()
        };

        match request {
            ChangeRequest::AddBillboards { ids, drawables, shader, enabled } => {
                if ids.len() != drawables.len() {
                    log::error!(
                        "AddBillboards record has {} ids but {} drawables, applying the common prefix",
                        ids.len(),
                        drawables.len()
                    );
                }
                if !self.has_shader(shader) {
                    log::warn!("AddBillboards references unregistered {}", shader);
                }
                for (id, drawable) in ids.into_iter().zip(drawables) {
                    let id = ObjectId::from(id);
                    let object = SceneObject { id, shader, enabled, drawable };
                    if self.objects.insert(id, object).is_some() {
                        log::warn!("Object {} added twice, keeping the newer one", id);
                    }
                }
            }
            ChangeRequest::SetEnable { ids, enabled } => {
                for id in ids {
                    match self.objects.get_mut(&id) {
                        Some(object) => object.enabled = enabled,
                        None => report.missing_ids += 1,
                    }
                }
            }
            ChangeRequest::Remove { ids } => {
                for id in ids {
                    if self.objects.remove(&id).is_none() {
                        report.missing_ids += 1;
                    }
                }
            }
        }

        if report.missing_ids > 0 && self.config.warn_on_missing_ids {
            log::warn!("{} ids in change record not present in scene", report.missing_ids);
        }
        report
    }

    /// Look an object up
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Enabled objects in draw order
    pub fn enabled_objects(&self) -> Vec<&SceneObject> {
        let mut objects: Vec<_> = self
            .objects
            .iter()
            .map(|(_, object)| object)
            .filter(|object| object.enabled)
            .collect();
        objects.sort_by_key(|object| object.sort_key());
        objects
    }

    /// Enabled objects inside their visibility band for a viewer at `height`, in draw order
    pub fn visible_objects(&self, height: f64) -> Vec<&SceneObject> {
        self.enabled_objects()
            .into_iter()
            .filter(|object| object.is_visible_at(height))
            .collect()
    }

    /// Ids of objects that take part in selection
    pub fn selectable_ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<_> = self
            .objects
            .iter()
            .filter(|(_, object)| object.drawable.selectable)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        log::debug!(
            "Tearing down scene with {} objects and {} timed records",
            self.objects.len(),
            self.timed.len()
        );
    }
}
