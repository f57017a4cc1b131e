//! Collision layer system for filtering collision detection
//!
//! Each collider sits on one or more layers and carries a mask of the layers
//! it reacts to. A pair is tested only when both sides accept each other.
//! Colliders default to every layer with a full mask, which tests every pair.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Projectiles (bullets, missiles, etc.)
        const PROJECTILE = 1 << 2;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes
        const TRIGGER = 1 << 4;
        /// Pickups and collectibles
        const PICKUP = 1 << 5;

        // Bits 8-31 are free for game-specific layers
        const _ = !0;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

impl CollisionLayers {
    /// Check if two colliders should be tested against each other
    ///
    /// Symmetric: A must accept B's layer and B must accept A's layer.
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        mask_a.intersects(layer_b) && mask_b.intersects(layer_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collides_with_everything() {
        let all = CollisionLayers::default();
        assert!(CollisionLayers::should_collide(all, all, CollisionLayers::ENEMY, all));
    }

    #[test]
    fn test_mask_filters_both_ways() {
        let player = CollisionLayers::PLAYER;
        let only_enemies = CollisionLayers::ENEMY;
        let wall = CollisionLayers::ENVIRONMENT;
        let all = CollisionLayers::all();

        assert!(!CollisionLayers::should_collide(player, only_enemies, wall, all));
        assert!(!CollisionLayers::should_collide(wall, all, player, only_enemies));
        assert!(CollisionLayers::should_collide(player, only_enemies, CollisionLayers::ENEMY, all));
    }

    #[test]
    fn test_custom_bits_are_kept() {
        let custom = CollisionLayers::from_bits_retain(1 << 12);
        assert_eq!(custom.bits(), 1 << 12);
        assert!(CollisionLayers::all().contains(custom));
    }
}
