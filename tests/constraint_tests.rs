use rigid_contact::{
    CollisionWorld, Constraint, EntityId, OrientationConstraint, PositionConstraint, Quat,
    RigidBody, Transform, Vec3, WorldConfig,
};

const DT: f32 = 1.0 / 60.0;

fn rope_world(anchor_immovable: bool) -> (CollisionWorld, EntityId, EntityId) {
    let mut world = CollisionWorld::new(WorldConfig::default().with_time_step(DT));
    let anchor = if anchor_immovable {
        RigidBody::default().immovable()
    } else {
        RigidBody::default()
    };
    let a = world.add_body(anchor).unwrap();
    let b = world
        .add_body(RigidBody::default().with_position(Vec3::new(15.0, 0.0, 0.0)))
        .unwrap();
    world.add_constraint(PositionConstraint::new(a, b, 10.0)).unwrap();
    (world, a, b)
}

fn separation(world: &CollisionWorld, a: EntityId, b: EntityId) -> f32 {
    let pa = world.body(a).unwrap().transform.position;
    let pb = world.body(b).unwrap().transform.position;
    (pb - pa).length()
}

fn kinetic_energy(world: &CollisionWorld) -> f32 {
    world.bodies().map(|(_, body)| body.linear_kinetic_energy()).sum()
}

#[test]
fn stretched_rope_converges_without_gaining_energy() {
    let (mut world, a, b) = rope_world(false);

    world.step(DT);
    let mut previous_energy = kinetic_energy(&world);
    let mut previous_separation = separation(&world, a, b);
    assert!(previous_energy > 0.0);

    for _ in 0..1200 {
        world.step(DT);
        let energy = kinetic_energy(&world);
        let distance = separation(&world, a, b);

        assert!(energy <= previous_energy + 1e-6, "energy grew: {previous_energy} -> {energy}");
        assert!(distance <= previous_separation + 1e-5);
        assert!(distance >= 9.9, "overshot to {distance}");

        previous_energy = energy;
        previous_separation = distance;
    }

    assert!(separation(&world, a, b) <= 10.001);
}

#[test]
fn immovable_anchor_never_moves() {
    let (mut world, a, b) = rope_world(true);

    for _ in 0..1200 {
        world.step(DT);
    }

    assert_eq!(world.body(a).unwrap().transform.position, Vec3::ZERO);
    let distance = separation(&world, a, b);
    assert!(distance <= 10.001 && distance >= 9.9, "{distance}");
}

#[test]
fn slack_rope_applies_nothing() {
    let mut a = RigidBody::default();
    let mut b = RigidBody::default().with_position(Vec3::new(4.0, 0.0, 0.0));
    let constraint = PositionConstraint::new(a.id, b.id, 10.0);

    assert!(constraint.update_constraint(&mut a, &mut b, DT).is_none());
    assert_eq!(a.velocity.linear, Vec3::ZERO);
    assert_eq!(b.velocity.linear, Vec3::ZERO);
}

#[test]
fn two_immovable_bodies_are_left_alone() {
    let mut a = RigidBody::default().immovable();
    let mut b = RigidBody::default()
        .with_position(Vec3::new(20.0, 0.0, 0.0))
        .immovable();

    let position = Constraint::from(PositionConstraint::new(a.id, b.id, 10.0));
    assert!(position.update_constraint(&mut a, &mut b, DT).is_none());

    b.transform =
        Transform::from_position_orientation(b.transform.position, Quat::from_rotation_y(1.0));
    let orientation = Constraint::from(OrientationConstraint::new(a.id, b.id, Vec3::Y));
    assert!(orientation.update_constraint(&mut a, &mut b, DT).is_none());
    assert_eq!(b.velocity.angular, Vec3::ZERO);
}

#[test]
fn shuffled_worlds_with_equal_seeds_agree() {
    let build = || {
        let mut world = CollisionWorld::new(WorldConfig::shuffled(99).with_time_step(DT));
        let ids: Vec<_> = (0..6)
            .map(|i| {
                let position = Vec3::new(i as f32 * 3.0, 0.0, 0.0);
                world.add_body(RigidBody::default().with_position(position)).unwrap()
            })
            .collect();
        for pair in ids.windows(2) {
            world.add_constraint(PositionConstraint::new(pair[0], pair[1], 2.0)).unwrap();
        }
        (world, ids)
    };

    let (mut first, ids) = build();
    let (mut second, _) = build();
    for _ in 0..120 {
        first.step(DT);
        second.step(DT);
    }

    for id in ids {
        assert_eq!(
            first.body(id).unwrap().transform.position,
            second.body(id).unwrap().transform.position
        );
    }
}
