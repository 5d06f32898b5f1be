//! Billboard Manager
//!
//! Turns billboard-level intent into scene change records. The manager owns
//! billboard identifier allocation and remembers which ids are live and which
//! batch they came from; it never mutates the [`Scene`] itself.
//!
//! # Identifier lifecycle
//!
//! ```text
//! Unallocated ──add──► Active ◄──enable/disable──► Disabled
//!                        │                            │
//!                        └───────────remove───────────┴──► Removed
//! ```
//!
//! Anything else (enabling a removed id, removing twice) is a logged no-op so
//! batched callers can replay or reorder requests without failing.

use super::drawable::BillboardDrawable;
use super::error::{BillboardError, BillboardResult};
use super::types::{Billboard, BillboardInfo};
use crate::config::BillboardConfig;
use crate::foundation::ids::{BatchId, BillboardId, ObjectId, ShaderId};
use crate::foundation::runtime;
use crate::scene::{ChangeRequest, ChangeSet, Scene, WeakShaderRegistry};
use std::collections::{HashMap, HashSet};

/// Enable state the manager last requested for a billboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillboardState {
    /// Drawn by the renderer
    Active,
    /// Kept in the scene but not drawn
    Disabled,
}

impl BillboardState {
    const fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Active
        } else {
            Self::Disabled
        }
    }
}

/// Ids allocated by one successful `add_billboards` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillboardBatch {
    /// Batch handle; enable/remove accept it in place of the member ids
    pub id: BatchId,
    /// Per-billboard ids, in input order
    pub billboards: Vec<BillboardId>,
}

#[derive(Debug, Clone, Copy)]
struct TrackedBillboard {
    batch: BatchId,
    state: BillboardState,
}

/// Creates, toggles and removes billboards by emitting change records
///
/// All operations take `&mut self` and are meant to run on the thread that
/// drives scene mutation.
pub struct BillboardManager {
    config: BillboardConfig,
    shaders: WeakShaderRegistry,
    billboards: HashMap<BillboardId, TrackedBillboard>,
    batches: HashMap<BatchId, Vec<BillboardId>>,
}

impl BillboardManager {
    /// Create a manager bound to `scene` with default configuration
    pub fn new(scene: &Scene) -> Self {
        Self::with_config(scene, BillboardConfig::default())
    }

    /// Create a manager bound to `scene` with custom configuration
    pub fn with_config(scene: &Scene, config: BillboardConfig) -> Self {
        runtime::ensure_initialized();
        Self {
            config,
            shaders: scene.shaders().downgrade(),
            billboards: HashMap::new(),
            batches: HashMap::new(),
        }
    }

    /// Manager configuration
    pub const fn config(&self) -> &BillboardConfig {
        &self.config
    }

    /// Batch parameters from the configuration
    pub const fn default_info(&self) -> &BillboardInfo {
        &self.config.default_info
    }

    /// Add a batch of billboards
    ///
    /// Appends exactly one `AddBillboards` record to `changes`. `info.shader`,
    /// when set, takes precedence over `shader`. Validation runs before
    /// anything is allocated, so on error neither the manager nor `changes`
    /// is modified.
    pub fn add_billboards(
        &mut self,
        billboards: &[Billboard],
        info: &BillboardInfo,
        shader: ShaderId,
        changes: &mut ChangeSet,
    ) -> BillboardResult<BillboardBatch> {
        let shader = self.validate_add(billboards, info, shader)?;

        let batch_id = BatchId::allocate();
        let mut ids = Vec::with_capacity(billboards.len());
        let mut drawables = Vec::with_capacity(billboards.len());
        let state = BillboardState::from_enabled(info.enable);

        for billboard in billboards {
            let id = BillboardId::allocate();
            drawables.push(BillboardDrawable::build(id, billboard, info));
            self.billboards.insert(id, TrackedBillboard { batch: batch_id, state });
            ids.push(id);
        }
        self.batches.insert(batch_id, ids.clone());

        log::debug!(
            "Adding {} billboards as {} with {}",
            ids.len(),
            batch_id,
            shader
        );
        changes.push(ChangeRequest::AddBillboards {
            ids: ids.clone(),
            drawables,
            shader,
            enabled: info.enable,
        });

        Ok(BillboardBatch {
            id: batch_id,
            billboards: ids,
        })
    }

    /// Check everything `add_billboards` needs, returning the shader to draw with
    fn validate_add(
        &self,
        billboards: &[Billboard],
        info: &BillboardInfo,
        shader: ShaderId,
    ) -> BillboardResult<ShaderId> {
        if billboards.is_empty() {
            return Err(BillboardError::InvalidInput("billboard list is empty".into()));
        }
        let limit = self.config.max_batch_size;
        if limit > 0 && billboards.len() > limit {
            return Err(BillboardError::InvalidInput(format!(
                "batch of {} billboards exceeds the limit of {}",
                billboards.len(),
                limit
            )));
        }
        info.validate()?;
        for (index, billboard) in billboards.iter().enumerate() {
            billboard.validate().map_err(|e| match e {
                BillboardError::InvalidInput(reason) => {
                    BillboardError::InvalidInput(format!("billboard {index}: {reason}"))
                }
                other => other,
            })?;
        }

        let registry = self.shaders.upgrade().ok_or(BillboardError::SceneReleased)?;
        let shader = info.shader.unwrap_or(shader);
        if !registry.read().contains(shader) {
            return Err(BillboardError::UnknownShader(shader));
        }
        Ok(shader)
    }

    /// Enable or disable billboards
    ///
    /// `ids` may mix batch ids and billboard ids. Unknown ids are dropped from
    /// the record. One `SetEnable` record is always appended, even when no id
    /// survives the filtering.
    pub fn enable_billboards<I>(&mut self, ids: &[I], enable: bool, changes: &mut ChangeSet)
    where
        I: Copy + Into<u64>,
    {
        let targets = self.resolve(ids);
        let state = BillboardState::from_enabled(enable);

        for id in &targets {
            if let Some(tracked) = self.billboards.get_mut(id) {
                tracked.state = state;
            }
        }

        changes.push(ChangeRequest::SetEnable {
            ids: targets.into_iter().map(ObjectId::from).collect(),
            enabled: enable,
        });
    }

    /// Remove billboards
    ///
    /// `ids` may mix batch ids and billboard ids. Known ids are forgotten
    /// immediately and never handed out again. One `Remove` record is always
    /// appended.
    pub fn remove_billboards<I>(&mut self, ids: &[I], changes: &mut ChangeSet)
    where
        I: Copy + Into<u64>,
    {
        let targets = self.resolve(ids);
        for id in &targets {
            self.forget(*id);
        }

        log::debug!("Removing {} billboards", targets.len());
        changes.push(ChangeRequest::Remove {
            ids: targets.into_iter().map(ObjectId::from).collect(),
        });
    }

    /// Remove every billboard this manager still tracks
    pub fn remove_all(&mut self, changes: &mut ChangeSet) {
        let mut ids: Vec<BillboardId> = self.billboards.keys().copied().collect();
        ids.sort_unstable();
        self.billboards.clear();
        self.batches.clear();

        log::debug!("Removing all {} billboards", ids.len());
        changes.push(ChangeRequest::Remove {
            ids: ids.into_iter().map(ObjectId::from).collect(),
        });
    }

    /// Expand batch ids into their live members and drop unknown ids
    fn resolve<I>(&self, ids: &[I]) -> Vec<BillboardId>
    where
        I: Copy + Into<u64>,
    {
        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(ids.len());
        let mut unknown = 0_usize;

        for raw in ids.iter().map(|id| (*id).into()) {
            if let Some(members) = self.batches.get(&BatchId(raw)) {
                targets.extend(members.iter().copied().filter(|id| seen.insert(*id)));
            } else if self.billboards.contains_key(&BillboardId(raw)) {
                if seen.insert(BillboardId(raw)) {
                    targets.push(BillboardId(raw));
                }
            } else {
                unknown += 1;
            }
        }

        if unknown > 0 {
            log::debug!("Ignoring {} unknown billboard ids", unknown);
        }
        targets
    }

    fn forget(&mut self, id: BillboardId) {
        let Some(tracked) = self.billboards.remove(&id) else {
            return;
        };
        if let Some(members) = self.batches.get_mut(&tracked.batch) {
            members.retain(|member| *member != id);
            if members.is_empty() {
                self.batches.remove(&tracked.batch);
            }
        }
    }

    /// Whether `id` (batch or billboard) is still tracked
    pub fn is_tracked(&self, id: impl Into<u64>) -> bool {
        let raw = id.into();
        self.batches.contains_key(&BatchId(raw)) || self.billboards.contains_key(&BillboardId(raw))
    }

    /// Last requested state of a billboard, `None` once removed or never added
    pub fn billboard_state(&self, id: BillboardId) -> Option<BillboardState> {
        self.billboards.get(&id).map(|tracked| tracked.state)
    }

    /// Live members of a batch
    pub fn batch_members(&self, batch: BatchId) -> Option<&[BillboardId]> {
        self.batches.get(&batch).map(Vec::as_slice)
    }

    /// Number of live billboards
    pub fn billboard_count(&self) -> usize {
        self.billboards.len()
    }

    /// Number of batches with at least one live billboard
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}

impl Drop for BillboardManager {
    fn drop(&mut self) {
        if !self.billboards.is_empty() {
            log::debug!(
                "Releasing billboard manager still tracking {} billboards in {} batches",
                self.billboards.len(),
                self.batches.len()
            );
        }
        self.billboards.clear();
        self.batches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billboard::BillboardOrientation;
    use crate::foundation::math::{Point3d, Vec2};
    use crate::scene::{ChangeRecord, ShaderProgram};

    fn setup() -> (Scene, ShaderId) {
        let mut scene = Scene::new();
        let shader = scene.register_shader(ShaderProgram::new("billboard", "b.vert.spv", "b.frag.spv"));
        (scene, shader)
    }

    fn billboards(count: usize) -> Vec<Billboard> {
        (0..count)
            .map(|i| Billboard::new(Point3d::new(1.0, 0.0, i as f64 * 0.01), Vec2::new(0.05, 0.05)))
            .collect()
    }

    fn record_ids(record: Option<&ChangeRecord>) -> Vec<u64> {
        match record.map(|r| &r.request) {
            Some(ChangeRequest::SetEnable { ids, .. } | ChangeRequest::Remove { ids }) => {
                ids.iter().map(|id| id.raw()).collect()
            }
            Some(ChangeRequest::AddBillboards { ids, .. }) => ids.iter().map(|id| id.raw()).collect(),
            None => panic!("no record"),
        }
    }

    #[test]
    fn test_add_emits_one_record() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();

        let batch = manager
            .add_billboards(&billboards(3), &BillboardInfo::default(), shader, &mut changes)
            .unwrap();

        assert!(!batch.id.is_empty());
        assert_eq!(batch.billboards.len(), 3);
        assert_eq!(changes.len(), 1);
        match &changes.last().unwrap().request {
            ChangeRequest::AddBillboards { ids, drawables, shader: s, enabled } => {
                assert_eq!(ids, &batch.billboards);
                assert_eq!(drawables.len(), 3);
                assert_eq!(*s, shader);
                assert!(*enabled);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(manager.batch_members(batch.id), Some(batch.billboards.as_slice()));
        assert_eq!(manager.billboard_state(batch.billboards[0]), Some(BillboardState::Active));
    }

    #[test]
    fn test_add_failures_leave_state_untouched() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();

        let empty = manager.add_billboards(&[], &BillboardInfo::default(), shader, &mut changes);
        assert!(matches!(empty, Err(BillboardError::InvalidInput(_))));

        let mut bad = billboards(2);
        bad[1].size = Vec2::new(0.0, 1.0);
        let invalid = manager.add_billboards(&bad, &BillboardInfo::default(), shader, &mut changes);
        assert!(matches!(invalid, Err(BillboardError::InvalidInput(ref msg)) if msg.contains("billboard 1")));

        let unknown =
            manager.add_billboards(&billboards(1), &BillboardInfo::default(), ShaderId(u64::MAX), &mut changes);
        assert_eq!(unknown, Err(BillboardError::UnknownShader(ShaderId(u64::MAX))));

        assert!(changes.is_empty());
        assert_eq!(manager.billboard_count(), 0);
        assert_eq!(manager.batch_count(), 0);
    }

    #[test]
    fn test_info_shader_overrides_argument() {
        let (mut scene, shader) = setup();
        let ground = scene.register_shader(ShaderProgram::new("ground", "g.vert.spv", "g.frag.spv"));
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();

        let info = BillboardInfo {
            shader: Some(ground),
            orientation: BillboardOrientation::Ground,
            ..Default::default()
        };
        manager.add_billboards(&billboards(1), &info, shader, &mut changes).unwrap();
        assert!(matches!(
            changes.last().map(|r| &r.request),
            Some(ChangeRequest::AddBillboards { shader: s, .. }) if *s == ground
        ));

        // An unregistered override is rejected even if the argument is valid
        let info = BillboardInfo { shader: Some(ShaderId(u64::MAX)), ..Default::default() };
        assert!(manager.add_billboards(&billboards(1), &info, shader, &mut changes).is_err());
    }

    #[test]
    fn test_batch_size_limit() {
        let (scene, shader) = setup();
        let config = BillboardConfig { max_batch_size: 2, ..Default::default() };
        let mut manager = BillboardManager::with_config(&scene, config);
        let mut changes = ChangeSet::new();

        let info = manager.default_info().clone();
        assert!(manager.add_billboards(&billboards(2), &info, shader, &mut changes).is_ok());
        assert!(manager.add_billboards(&billboards(3), &BillboardInfo::default(), shader, &mut changes).is_err());
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_disabled_batch_starts_disabled() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();

        let info = BillboardInfo { enable: false, ..Default::default() };
        let batch = manager.add_billboards(&billboards(1), &info, shader, &mut changes).unwrap();
        assert_eq!(manager.billboard_state(batch.billboards[0]), Some(BillboardState::Disabled));
    }

    #[test]
    fn test_enable_by_batch_and_by_id() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();
        let batch = manager
            .add_billboards(&billboards(2), &BillboardInfo::default(), shader, &mut changes)
            .unwrap();

        manager.enable_billboards(&[batch.id], false, &mut changes);
        assert_eq!(changes.len(), 2);
        let expected: Vec<u64> = batch.billboards.iter().map(|id| id.raw()).collect();
        assert_eq!(record_ids(changes.last()), expected);
        assert!(batch
            .billboards
            .iter()
            .all(|id| manager.billboard_state(*id) == Some(BillboardState::Disabled)));

        manager.enable_billboards(&[batch.billboards[1]], true, &mut changes);
        assert_eq!(record_ids(changes.last()), [batch.billboards[1].raw()]);
        assert_eq!(manager.billboard_state(batch.billboards[0]), Some(BillboardState::Disabled));
        assert_eq!(manager.billboard_state(batch.billboards[1]), Some(BillboardState::Active));
    }

    #[test]
    fn test_enable_deduplicates_targets() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();
        let batch = manager
            .add_billboards(&billboards(2), &BillboardInfo::default(), shader, &mut changes)
            .unwrap();

        let raw = [batch.id.raw(), batch.billboards[0].raw(), batch.billboards[0].raw()];
        manager.enable_billboards(&raw, true, &mut changes);
        assert_eq!(record_ids(changes.last()).len(), 2);
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let (scene, _) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();

        manager.enable_billboards(&[999_u64], false, &mut changes);
        assert_eq!(changes.len(), 1);
        assert!(record_ids(changes.last()).is_empty());

        manager.remove_billboards(&[999_u64], &mut changes);
        assert_eq!(changes.len(), 2);
        assert!(record_ids(changes.last()).is_empty());
    }

    #[test]
    fn test_remove_single_member_keeps_batch() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();
        let batch = manager
            .add_billboards(&billboards(2), &BillboardInfo::default(), shader, &mut changes)
            .unwrap();

        manager.remove_billboards(&[batch.billboards[0]], &mut changes);
        assert!(!manager.is_tracked(batch.billboards[0]));
        assert_eq!(manager.batch_members(batch.id), Some(&batch.billboards[1..]));

        manager.remove_billboards(&[batch.billboards[1]], &mut changes);
        assert!(!manager.is_tracked(batch.id));
        assert_eq!(manager.batch_count(), 0);
    }

    #[test]
    fn test_remove_all() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        let mut changes = ChangeSet::new();
        manager.add_billboards(&billboards(2), &BillboardInfo::default(), shader, &mut changes).unwrap();
        manager.add_billboards(&billboards(1), &BillboardInfo::default(), shader, &mut changes).unwrap();

        manager.remove_all(&mut changes);
        assert_eq!(record_ids(changes.last()).len(), 3);
        assert_eq!(manager.billboard_count(), 0);
        assert_eq!(manager.batch_count(), 0);
    }

    #[test]
    fn test_scene_released() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        drop(scene);

        let mut changes = ChangeSet::new();
        let result = manager.add_billboards(&billboards(1), &BillboardInfo::default(), shader, &mut changes);
        assert_eq!(result, Err(BillboardError::SceneReleased));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_input_errors_win_over_released_scene() {
        let (scene, shader) = setup();
        let mut manager = BillboardManager::new(&scene);
        drop(scene);

        let mut changes = ChangeSet::new();
        let result = manager.add_billboards(&[], &BillboardInfo::default(), shader, &mut changes);
        assert!(matches!(result, Err(BillboardError::InvalidInput(_))));
        assert!(changes.is_empty());
    }
}
