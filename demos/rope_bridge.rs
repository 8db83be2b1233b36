use rigid_contact::*;

const PLANKS: usize = 8;
const LINK_LENGTH: f32 = 1.2;
const PLANK_MASS: f32 = 2.0;

fn main() -> Result<()> {
    let mut world = CollisionWorld::new(WorldConfig::shuffled(42).with_damping(0.1, 0.1));

    let mut ids = Vec::with_capacity(PLANKS + 2);
    ids.push(world.add_body(RigidBody::default().immovable())?);
    for i in 1..=PLANKS {
        let plank = RigidBody::default()
            .with_volume(Volume::obb(Vec3::new(0.5, 0.1, 1.0)))
            .with_position(Vec3::new(i as f32 * 1.5, 0.0, 0.0))
            .with_mass(PLANK_MASS);
        ids.push(world.add_body(plank)?);
    }
    ids.push(world.add_body(
        RigidBody::default()
            .immovable()
            .with_position(Vec3::new((PLANKS + 1) as f32 * 1.5, 0.0, 0.0)),
    )?);

    for pair in ids.windows(2) {
        world.add_constraint(PositionConstraint::new(pair[0], pair[1], LINK_LENGTH))?;
        world.add_constraint(OrientationConstraint::new(pair[0], pair[1], Vec3::Y))?;
    }

    for frame in 0..240 {
        for id in &ids {
            if let Some(body) = world.body_mut(*id) {
                if !body.is_immovable() {
                    body.add_force(Vec3::NEG_Y * 9.81 * PLANK_MASS);
                }
            }
        }
        world.step(1.0 / 60.0);

        if frame % 60 == 0 {
            let sag = ids
                .iter()
                .filter_map(|id| world.body(*id))
                .map(|body| body.transform.position.y)
                .fold(0.0f32, f32::min);
            let contacts = world.find_contacts().len();
            println!("frame {frame}: lowest plank at y = {sag:.3}, contacts = {contacts}");
        }
    }

    Ok(())
}
