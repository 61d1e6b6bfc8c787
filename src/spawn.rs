use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Goal,
    Monster,
    /// The agent that hunts the player down once the arrival countdown runs out.
    Reaper,
}

/// Opaque handle to an entity created by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u64);

/// Whatever creates actual entities in the world the maze lives in.
pub trait Spawner {
    fn spawn(&mut self, kind: EntityKind, location: Vec3) -> EntityHandle;
}

impl<F: FnMut(EntityKind, Vec3) -> EntityHandle> Spawner for F {
    fn spawn(&mut self, kind: EntityKind, location: Vec3) -> EntityHandle {
        self(kind, location)
    }
}

/// A spawner that creates nothing, for hosts that never arm an arrival countdown.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSpawner;

impl Spawner for NoSpawner {
    fn spawn(&mut self, kind: EntityKind, location: Vec3) -> EntityHandle {
        log::warn!("Ignored spawn of {kind:?} at {location}");
        EntityHandle(0)
    }
}
