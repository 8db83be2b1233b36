use rigid_contact::*;

fn main() -> Result<()> {
    let mut world = CollisionWorld::default();
    world.add_body(RigidBody::default().with_volume(Volume::sphere(1.0)))?;
    world.add_body(
        RigidBody::default()
            .with_volume(Volume::obb(Vec3::new(1.0, 0.5, 0.5)))
            .with_transform(Transform::from_position_orientation(
                Vec3::new(3.0, 0.0, 0.0),
                Quat::from_rotation_y(0.7),
            )),
    )?;
    world.add_body(
        RigidBody::default()
            .with_volume(Volume::capsule(1.0, 0.4))
            .with_position(Vec3::new(-3.0, 0.0, 0.0)),
    )?;

    let camera = Camera::new(Vec3::new(0.0, 2.0, 12.0), -10.0, 0.0);
    let viewport = Vec2::new(1280.0, 720.0);

    for x in [240.0, 640.0, 1040.0] {
        let ray = build_ray_from_screen_point(Vec2::new(x, 400.0), &camera, viewport);
        match world.raycast_closest(&ray) {
            Some(hit) => println!(
                "pixel ({x}, 400) -> body {:?} at {:.3} ({:.2}, {:.2}, {:.2})",
                hit.body, hit.distance, hit.point.x, hit.point.y, hit.point.z
            ),
            None => println!("pixel ({x}, 400) -> nothing"),
        }
    }

    Ok(())
}
