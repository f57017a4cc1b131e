//! Physics system scenario tests

use crate::ecs::components::{ColliderComponent, TransformComponent};
use crate::ecs::systems::PhysicsSystem;
use crate::ecs::{EntityId, FixedTimeStepSystem, Scene};
use crate::foundation::math::constants::PI;
use crate::foundation::math::Vec3;

fn spawn(scene: &mut Scene, name: &str, transform: TransformComponent, collider: ColliderComponent) -> EntityId {
    let id = scene.spawn(name);
    scene.add_component(id, transform).unwrap();
    scene.add_component(id, collider).unwrap();
    id
}

fn collider(scene: &Scene, id: EntityId) -> &ColliderComponent {
    scene.entity(id).unwrap().get_component::<ColliderComponent>().unwrap()
}

fn move_to(scene: &mut Scene, id: EntityId, x: f32, y: f32) {
    scene
        .entity_mut(id)
        .unwrap()
        .get_component_mut::<TransformComponent>()
        .unwrap()
        .translation = Vec3::new(x, y, 0.0);
}

#[test]
fn test_circle_pairs_match_sat_examples() {
    let mut scene = Scene::new("circles");
    let origin = spawn(&mut scene, "origin", TransformComponent::from_xy(0.0, 0.0), ColliderComponent::circle(1.0));
    let near = spawn(&mut scene, "near", TransformComponent::from_xy(1.5, 0.0), ColliderComponent::circle(1.0));
    let far = spawn(&mut scene, "far", TransformComponent::from_xy(-2.5, 0.0), ColliderComponent::circle(1.0));
    let touching = spawn(&mut scene, "touching", TransformComponent::from_xy(0.0, 2.0), ColliderComponent::circle(1.0));

    PhysicsSystem::new().fixed_update(&mut scene).unwrap();

    let at_origin = collider(&scene, origin);
    assert!(at_origin.is_colliding_with(near));
    assert!(at_origin.is_colliding_with(touching));
    assert!(!at_origin.is_colliding_with(far));
    assert!(!collider(&scene, far).is_colliding());
}

#[test]
fn test_colliding_sets_are_symmetric() {
    let mut scene = Scene::new("mixed");
    let ids = [
        spawn(&mut scene, "a", TransformComponent::from_xy(0.0, 0.0), ColliderComponent::rectangle(2.0, 2.0)),
        spawn(&mut scene, "b", TransformComponent::from_xy(1.7, 0.3).with_angle(PI / 6.0), ColliderComponent::rectangle(1.0, 3.0)),
        spawn(&mut scene, "c", TransformComponent::from_xy(2.6, 1.4), ColliderComponent::circle(0.7)),
        spawn(&mut scene, "d", TransformComponent::from_xy(-1.8, -1.8), ColliderComponent::circle(0.5)),
        spawn(&mut scene, "e", TransformComponent::from_xy(8.0, 8.0).with_uniform_scale(2.0), ColliderComponent::circle(1.0)),
    ];

    PhysicsSystem::new().fixed_update(&mut scene).unwrap();

    for &a in &ids {
        assert!(!collider(&scene, a).is_colliding_with(a));
        for &b in &ids {
            assert_eq!(
                collider(&scene, a).is_colliding_with(b),
                collider(&scene, b).is_colliding_with(a)
            );
        }
    }
    assert!(collider(&scene, ids[0]).is_colliding_with(ids[1]));
    assert!(!collider(&scene, ids[4]).is_colliding());
}

#[test]
fn test_results_reset_after_separation() {
    let mut scene = Scene::new("reset");
    let a = spawn(&mut scene, "a", TransformComponent::from_xy(0.0, 0.0), ColliderComponent::circle(1.0));
    let b = spawn(&mut scene, "b", TransformComponent::from_xy(1.0, 0.0), ColliderComponent::circle(1.0));
    let mut physics = PhysicsSystem::new();

    physics.fixed_update(&mut scene).unwrap();
    assert!(collider(&scene, a).is_colliding_with(b));
    assert!(collider(&scene, b).is_colliding_with(a));

    move_to(&mut scene, b, 5.0, 0.0);
    physics.fixed_update(&mut scene).unwrap();
    assert!(!collider(&scene, a).is_colliding());
    assert!(!collider(&scene, b).is_colliding());
}

#[test]
fn test_repeated_ticks_do_not_duplicate() {
    let mut scene = Scene::new("repeat");
    let a = spawn(&mut scene, "a", TransformComponent::from_xy(0.0, 0.0), ColliderComponent::circle(1.0));
    let b = spawn(&mut scene, "b", TransformComponent::from_xy(0.5, 0.0), ColliderComponent::circle(1.0));
    let mut physics = PhysicsSystem::new();

    for _ in 0..3 {
        physics.fixed_update(&mut scene).unwrap();
    }
    assert_eq!(collider(&scene, a).colliding_entities().len(), 1);
    assert_eq!(collider(&scene, b).colliding_entities().len(), 1);
    assert_eq!(physics.collision_pairs().len(), 1);
}

#[test]
fn test_nested_and_detached_entities() {
    let mut scene = Scene::new("tree");
    let parent = spawn(&mut scene, "parent", TransformComponent::from_xy(0.0, 0.0), ColliderComponent::circle(1.0));
    let child = scene.spawn_child(parent, "child").unwrap();
    scene.add_component(child, TransformComponent::from_xy(0.5, 0.0)).unwrap();
    scene.add_component(child, ColliderComponent::circle(1.0)).unwrap();
    let loose = scene.create_entity("loose");
    scene.add_component(loose, TransformComponent::from_xy(0.0, 0.0)).unwrap();
    scene.add_component(loose, ColliderComponent::circle(1.0)).unwrap();

    PhysicsSystem::new().fixed_update(&mut scene).unwrap();

    assert!(collider(&scene, parent).is_colliding_with(child));
    assert!(!collider(&scene, parent).is_colliding_with(loose));
    assert!(!collider(&scene, loose).is_colliding());
}

#[test]
fn test_rotated_rectangle_against_circle() {
    let mut scene = Scene::new("rotated");
    let bar = spawn(
        &mut scene,
        "bar",
        TransformComponent::from_xy(0.0, 0.0).with_angle(PI / 2.0),
        ColliderComponent::rectangle(6.0, 1.0),
    );
    // The bar now spans y in [-3, 3]; unrotated it would miss this circle
    let above = spawn(&mut scene, "above", TransformComponent::from_xy(0.0, 3.5), ColliderComponent::circle(1.0));
    let beside = spawn(&mut scene, "beside", TransformComponent::from_xy(2.5, 0.0), ColliderComponent::circle(1.0));

    PhysicsSystem::new().fixed_update(&mut scene).unwrap();

    assert!(collider(&scene, bar).is_colliding_with(above));
    assert!(!collider(&scene, bar).is_colliding_with(beside));
}

#[test]
fn test_collapsed_rectangles_far_apart() {
    let mut scene = Scene::new("points");
    let a = spawn(&mut scene, "a", TransformComponent::from_xy(0.0, 0.0), ColliderComponent::rectangle(0.0, 0.0));
    let b = spawn(&mut scene, "b", TransformComponent::from_xy(100.0, 100.0), ColliderComponent::rectangle(0.0, 0.0));
    let mut physics = PhysicsSystem::new();

    physics.fixed_update(&mut scene).unwrap();

    assert!(physics.collision_pairs().is_empty());
    assert!(!collider(&scene, a).is_colliding_with(b));
}

#[test]
fn test_child_collider_follows_parent_transform() {
    let mut scene = Scene::new("tree");
    let ship = scene.spawn("ship");
    scene.add_component(ship, TransformComponent::from_xy(10.0, 0.0)).unwrap();
    let shield = scene.spawn_child(ship, "shield").unwrap();
    scene.add_component(shield, TransformComponent::identity()).unwrap();
    scene.add_component(shield, ColliderComponent::circle(1.0)).unwrap();
    let at_origin = spawn(&mut scene, "at_origin", TransformComponent::from_xy(0.0, 0.0), ColliderComponent::circle(1.0));
    let beside_ship = spawn(&mut scene, "beside_ship", TransformComponent::from_xy(11.5, 0.0), ColliderComponent::circle(1.0));

    PhysicsSystem::new().fixed_update(&mut scene).unwrap();

    let shield_collider = collider(&scene, shield);
    assert!(!shield_collider.is_colliding_with(at_origin));
    assert!(shield_collider.is_colliding_with(beside_ship));
}
