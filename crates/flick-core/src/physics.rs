//! Physics simulation using `Rapier2D` with deterministic behavior.
//!
//! Every collider carries an [`EntityTag`] in its `user_data`, so collision events
//! can be resolved to level entities without keeping handle maps in sync.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;
use rapier2d::prelude::*;

use crate::config::FIXED_STEP;

/// Kind of level entity a collider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hero,
    Wall,
    Coin,
    Goal,
    Spike,
    Attractor,
}

impl EntityKind {
    fn tag(self) -> u64 {
        match self {
            Self::Hero => 1,
            Self::Wall => 2,
            Self::Coin => 3,
            Self::Goal => 4,
            Self::Spike => 5,
            Self::Attractor => 6,
        }
    }

    fn from_tag(tag: u64) -> Option<Self> {
        Some(match tag {
            1 => Self::Hero,
            2 => Self::Wall,
            3 => Self::Coin,
            4 => Self::Goal,
            5 => Self::Spike,
            6 => Self::Attractor,
            _ => return None,
        })
    }
}

/// Identity of a level entity, unique across level builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    /// Level build this entity belongs to.
    pub generation: u32,
    /// Index within its kind (coin number, wall segment number, ...).
    pub index: u32,
}

impl EntityId {
    pub const fn new(generation: u32, index: u32) -> Self {
        Self { generation, index }
    }

    fn to_bits(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.index)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_bits(bits: u64) -> Self {
        Self {
            generation: (bits >> 32) as u32,
            index: bits as u32,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.index)
    }
}

/// Kind plus identity, as stored in collider `user_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityTag {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityTag {
    pub const fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// Encodes the kind in the upper 64 bits and the id in the lower 64 bits.
    pub fn encode(self) -> u128 {
        (u128::from(self.kind.tag()) << 64) | u128::from(self.id.to_bits())
    }

    /// Zero and unknown kinds decode to `None`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode(user_data: u128) -> Option<Self> {
        let kind = EntityKind::from_tag((user_data >> 64) as u64)?;
        Some(Self {
            kind,
            id: EntityId::from_bits(user_data as u64),
        })
    }
}

/// Contact between two tagged entities that started during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub body1: EntityTag,
    pub body2: EntityTag,
}

impl Collision {
    /// Returns the side that is not `kind`, if `kind` takes part.
    pub fn other_than(&self, kind: EntityKind) -> Option<EntityTag> {
        if self.body1.kind == kind {
            Some(self.body2)
        } else if self.body2.kind == kind {
            Some(self.body1)
        } else {
            None
        }
    }
}

/// Collects started collision events while the pipeline runs.
#[derive(Default)]
struct CollisionCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl EventHandler for CollisionCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if event.started() {
            self.events.lock().push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

/// Physics world containing all `Rapier2D` components for deterministic simulation.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub gravity: Vector,
    pub frame: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("frame", &self.frame)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .field("gravity", &self.gravity)
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    /// Creates a top-down world without gravity.
    pub fn new() -> Self {
        Self::with_gravity(Vector::new(0.0, 0.0), FIXED_STEP)
    }

    pub fn with_gravity(gravity: Vector, dt: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity,
            frame: 0,
        }
    }

    /// Advances the simulation by one fixed timestep and returns the collisions
    /// that started during it, resolved to entity tags.
    ///
    /// Pre-step work (forces) must be applied before calling this.
    pub fn step_with_events(&mut self) -> Vec<Collision> {
        let collector = CollisionCollector::default();
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &collector,
        );
        self.frame += 1;

        collector
            .events
            .into_inner()
            .into_iter()
            .filter_map(|event| {
                let body1 = self.entity_of(event.collider1())?;
                let body2 = self.entity_of(event.collider2())?;
                Some(Collision { body1, body2 })
            })
            .collect()
    }

    /// Runs `n` steps, discarding collisions.
    pub fn step_n(&mut self, n: u32) {
        for _ in 0..n {
            self.step_with_events();
        }
    }

    /// Resolves a collider to the entity tagged on it.
    pub fn entity_of(&self, handle: ColliderHandle) -> Option<EntityTag> {
        let collider = self.collider_set.get(handle)?;
        EntityTag::decode(collider.user_data)
    }

    pub fn add_rigid_body(&mut self, rigid_body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(rigid_body)
    }

    /// Adds a collider attached to a rigid body, tagged with `tag`.
    pub fn add_collider(
        &mut self,
        mut collider: Collider,
        parent: RigidBodyHandle,
        tag: EntityTag,
    ) -> ColliderHandle {
        collider.user_data = tag.encode();
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Adds a collider without a parent (static collider), tagged with `tag`.
    pub fn add_static_collider(&mut self, mut collider: Collider, tag: EntityTag) -> ColliderHandle {
        collider.user_data = tag.encode();
        self.collider_set.insert(collider)
    }

    /// Removes a collider. Returns false if it was already gone.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        self.collider_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            )
            .is_some()
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Tags of every collider currently in the world.
    pub fn entity_tags(&self) -> impl Iterator<Item = EntityTag> + '_ {
        self.collider_set
            .iter()
            .filter_map(|(_, collider)| EntityTag::decode(collider.user_data))
    }

    /// Computes a deterministic hash of the current physics state.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.frame.hash(&mut hasher);

        for (handle, body) in self.rigid_body_set.iter() {
            let (index, generation) = handle.into_raw_parts();
            index.hash(&mut hasher);
            generation.hash(&mut hasher);

            let pos = body.translation();
            hash_f32(pos.x, &mut hasher);
            hash_f32(pos.y, &mut hasher);
            hash_f32(body.rotation().angle(), &mut hasher);

            let linvel = body.linvel();
            hash_f32(linvel.x, &mut hasher);
            hash_f32(linvel.y, &mut hasher);
            hash_f32(body.angvel(), &mut hasher);
        }

        hasher.finish()
    }

    pub fn current_frame(&self) -> u64 {
        self.frame
    }
}

fn hash_f32(value: f32, hasher: &mut impl Hasher) {
    value.to_bits().hash(hasher);
}
