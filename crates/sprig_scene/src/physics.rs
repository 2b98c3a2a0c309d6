//! Registry of live colliders answering overlap queries.
//!
//! Membership tracks graph membership: a collider node registers when the
//! scene activates it and unregisters when it is torn down. Registration
//! order is preserved so query results are deterministic.

use crate::collider::WorldShape;
use crate::node::NodeId;

#[derive(Debug, Default)]
pub struct Physics {
    colliders: Vec<NodeId>,
}

impl Physics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_collider(&mut self, id: NodeId) {
        if !self.colliders.contains(&id) {
            self.colliders.push(id);
            log::debug!("Collider {:?} registered ({} live)", id, self.colliders.len());
        }
    }

    pub(crate) fn remove_collider(&mut self, id: NodeId) {
        if let Some(index) = self.colliders.iter().position(|&c| c == id) {
            self.colliders.remove(index);
            log::debug!("Collider {:?} unregistered ({} live)", id, self.colliders.len());
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.colliders.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.colliders.iter().copied()
    }

    /// Every other registered collider whose world shape intersects the
    /// shape of `collider`. Brute force, one pairwise test per live collider.
    /// `resolve` maps a collider to its world-space shape.
    ///
    /// An unregistered collider (queued, torn down or not a collider at all)
    /// overlaps nothing.
    pub fn overlap<F>(&self, collider: NodeId, resolve: F) -> Vec<NodeId>
    where
        F: Fn(NodeId) -> Option<WorldShape>,
    {
        if !self.contains(collider) {
            log::trace!("overlap queried for unregistered collider {:?}", collider);
            return Vec::new();
        }
        let Some(shape) = resolve(collider) else {
            return Vec::new();
        };

        self.colliders
            .iter()
            .copied()
            .filter(|&other| other != collider)
            .filter(|&other| resolve(other).is_some_and(|o| shape.intersects(&o)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use slotmap::SlotMap;
    use std::collections::HashMap;

    fn ids(n: usize) -> Vec<NodeId> {
        let mut map: SlotMap<NodeId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn circle_at(x: f32) -> WorldShape {
        WorldShape::Circle {
            center: Vec2::new(x, 0.0),
            radius: 5.0,
        }
    }

    #[test]
    fn overlap_excludes_self_and_keeps_registration_order() {
        let ids = ids(4);
        let shapes: HashMap<NodeId, WorldShape> = [
            (ids[0], circle_at(0.0)),
            (ids[1], circle_at(8.0)),
            (ids[2], circle_at(100.0)),
            (ids[3], circle_at(-6.0)),
        ]
        .into_iter()
        .collect();

        let mut physics = Physics::new();
        for &id in &ids {
            physics.add_collider(id);
        }

        let hits = physics.overlap(ids[0], |id| shapes.get(&id).copied());
        assert_eq!(hits, vec![ids[1], ids[3]]);
    }

    #[test]
    fn lone_collider_overlaps_nothing() {
        let ids = ids(1);
        let mut physics = Physics::new();
        physics.add_collider(ids[0]);
        let hits = physics.overlap(ids[0], |_| Some(circle_at(0.0)));
        assert!(hits.is_empty());
    }

    #[test]
    fn unregistered_collider_overlaps_nothing() {
        let ids = ids(2);
        let mut physics = Physics::new();
        physics.add_collider(ids[0]);
        let hits = physics.overlap(ids[1], |_| Some(circle_at(0.0)));
        assert!(hits.is_empty());
        assert!(physics.overlap(ids[0], |_| Some(circle_at(0.0))).is_empty());
    }

    #[test]
    fn double_registration_is_idempotent() {
        let ids = ids(2);
        let mut physics = Physics::new();
        physics.add_collider(ids[0]);
        physics.add_collider(ids[0]);
        physics.add_collider(ids[1]);
        assert_eq!(physics.len(), 2);

        physics.remove_collider(ids[0]);
        assert!(!physics.contains(ids[0]));
        assert!(physics.contains(ids[1]));
        physics.remove_collider(ids[0]);
        assert_eq!(physics.len(), 1);
    }
}
