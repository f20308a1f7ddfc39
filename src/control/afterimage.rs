//! Afterimage trail: transient echoes of the player spawned during a dash.
//!
//! The trail is the only owner of each marker. A marker's visual handle leaves the trail by
//! value when the marker is evicted, so it is released exactly once.

use bevy::math::Vec2;

use super::body::FrameSnapshot;
use super::tuning::PlayerTuning;

/// Creates and destroys whatever draws an afterimage (a sprite entity in the game).
pub trait AfterimageVisuals {
    type Handle;

    fn spawn_visual(&mut self, position: Vec2, snapshot: &FrameSnapshot, alpha: f32) -> Self::Handle;
    fn release_visual(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Afterimage<H> {
    pub position: Vec2,
    pub snapshot: FrameSnapshot,
    /// Age in ticks.
    pub age: u32,
    pub alpha: f32,
    handle: H,
}

impl<H> Afterimage<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

#[derive(Debug, Clone)]
pub struct AfterimageTrail<H> {
    // Oldest first. Everything ages in lockstep, so expired markers are always a prefix.
    images: Vec<Afterimage<H>>,
    lifetime: u32,
    capacity: usize,
}

impl<H> AfterimageTrail<H> {
    pub fn new(lifetime: u32, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { images: Vec::with_capacity(capacity), lifetime, capacity }
    }

    /// Capacity fits every marker a single dash can keep alive at once.
    pub fn from_tuning(tuning: &PlayerTuning) -> Self {
        let cadence = tuning.afterimage_cadence.max(1);
        Self::new(tuning.afterimage_lifetime, (tuning.afterimage_lifetime / cadence + 1) as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[inline]
    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn iter(&self) -> impl Iterator<Item = &Afterimage<H>> {
        self.images.iter()
    }

    /// Append a fresh marker (age 0). When full, the oldest marker is released first.
    pub fn spawn<V>(&mut self, position: Vec2, snapshot: FrameSnapshot, alpha: f32, visuals: &mut V)
    where
        V: AfterimageVisuals<Handle = H>,
    {
        if self.images.len() >= self.capacity {
            let oldest = self.images.remove(0);
            visuals.release_visual(oldest.handle);
        }
        let handle = visuals.spawn_visual(position, &snapshot, alpha);
        self.images.push(Afterimage { position, snapshot, age: 0, alpha, handle });
    }

    /// Age every marker by one tick and evict those past the lifetime.
    /// Returns the number of evicted markers.
    pub fn advance<V>(&mut self, visuals: &mut V) -> usize
    where
        V: AfterimageVisuals<Handle = H>,
    {
        for image in &mut self.images {
            image.age += 1;
        }
        let lifetime = self.lifetime;
        let expired = self.images.iter().take_while(|i| i.age > lifetime).count();
        for image in self.images.drain(..expired) {
            visuals.release_visual(image.handle);
        }
        expired
    }

    /// Release every marker.
    pub fn clear<V>(&mut self, visuals: &mut V)
    where
        V: AfterimageVisuals<Handle = H>,
    {
        for image in self.images.drain(..) {
            visuals.release_visual(image.handle);
        }
    }
}
