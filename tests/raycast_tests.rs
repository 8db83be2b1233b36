use approx::assert_relative_eq;
use rigid_contact::{
    collision::projection::build_ray_from_screen_point, Camera, CollisionWorld, EntityId, Ray,
    RayCollision, Raycast, RaycastQuery, RigidBody, Transform, Vec2, Vec3, Volume,
};

fn add_sphere(world: &mut CollisionWorld, position: Vec3, radius: f32) -> EntityId {
    world
        .add_body(
            RigidBody::default()
                .with_volume(Volume::sphere(radius))
                .with_position(position),
        )
        .unwrap()
}

#[test]
fn ray_meets_unit_sphere_at_its_near_pole() {
    let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
    let hit = Raycast::ray_intersect(&ray, &Volume::sphere(1.0), &Transform::default()).unwrap();

    assert_relative_eq!(hit.distance, 9.0, epsilon = 1e-5);
    assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
}

#[test]
fn aabb_hit_reports_entry_face() {
    let ray = Ray::new(Vec3::new(0.2, -0.3, -5.0), Vec3::Z);
    let transform = Transform::from_position(Vec3::new(0.0, 0.0, 2.0));
    let hit = Raycast::ray_intersect(&ray, &Volume::aabb(Vec3::ONE), &transform).unwrap();

    assert_relative_eq!(hit.distance, 6.0, epsilon = 1e-5);
    assert!(hit.point.abs_diff_eq(Vec3::new(0.2, -0.3, 1.0), 1e-5));
}

#[test]
fn capsule_is_hit_on_barrel_or_cap() {
    let capsule = Volume::capsule(1.0, 0.5);
    let transform = Transform::default();

    let side = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
    let hit = Raycast::ray_intersect(&side, &capsule, &transform).unwrap();
    assert_relative_eq!(hit.distance, 4.5, epsilon = 1e-4);

    let above = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
    let hit = Raycast::ray_intersect(&above, &capsule, &transform).unwrap();
    assert_relative_eq!(hit.distance, 3.5, epsilon = 1e-4);
    assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 1.5, 0.0), 1e-4));

    let miss = Ray::new(Vec3::new(-5.0, 0.0, 2.0), Vec3::X);
    assert!(Raycast::ray_intersect(&miss, &capsule, &transform).is_none());
}

#[test]
fn ray_starting_inside_a_sphere_reports_where_it_leaves() {
    let mut world = CollisionWorld::default();
    let enclosing = add_sphere(&mut world, Vec3::ZERO, 2.0);
    let ahead = add_sphere(&mut world, Vec3::new(0.0, 0.0, 10.0), 1.0);

    let hits = world.raycast(&RaycastQuery::new(Ray::new(Vec3::ZERO, Vec3::Z)));
    let order: Vec<EntityId> = hits.iter().map(|hit| hit.body).collect();
    assert_eq!(order, vec![enclosing, ahead]);
    assert_relative_eq!(hits[0].distance, 2.0, epsilon = 1e-4);
    assert!(hits[0].point.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-4));
    assert!(hits.iter().all(|hit| hit.distance >= 0.0));
}

#[test]
fn bodies_without_volume_are_transparent() {
    let body = RigidBody::default();
    let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
    assert!(Raycast::test_ray(&ray, &body).is_none());
}

#[test]
fn world_raycast_sorts_filters_and_ignores() {
    let mut world = CollisionWorld::default();
    let far = add_sphere(&mut world, Vec3::new(0.0, 0.0, 20.0), 1.0);
    let near = add_sphere(&mut world, Vec3::new(0.0, 0.0, 5.0), 1.0);
    let mid = add_sphere(&mut world, Vec3::new(0.0, 0.0, 10.0), 1.0);
    add_sphere(&mut world, Vec3::new(5.0, 0.0, 10.0), 1.0);

    let ray = Ray::new(Vec3::ZERO, Vec3::Z);

    let hits: Vec<EntityId> = world
        .raycast(&RaycastQuery::new(ray))
        .iter()
        .map(|hit| hit.body)
        .collect();
    assert_eq!(hits, vec![near, mid, far]);

    let closest: Option<RayCollision> = world.raycast_closest(&ray);
    assert_eq!(closest.map(|hit| hit.body), Some(near));

    let skipped = world.raycast(&RaycastQuery::new(ray).ignoring(near).closest());
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].body, mid);

    let limited = world.raycast(&RaycastQuery::new(ray).with_max_distance(12.0));
    assert_eq!(limited.len(), 2);
}

#[test]
fn screen_centre_picks_the_body_in_front() {
    let mut world = CollisionWorld::default();
    let target = add_sphere(&mut world, Vec3::ZERO, 1.0);

    let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), 0.0, 0.0);
    let viewport = Vec2::new(1280.0, 720.0);
    let ray = build_ray_from_screen_point(viewport * 0.5, &camera, viewport);

    let hit = world.raycast_closest(&ray).expect("sphere straight ahead");
    assert_eq!(hit.body, target);
    assert_relative_eq!(hit.distance, 9.0, epsilon = 1e-3);
}
