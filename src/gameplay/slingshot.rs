//! Bevy host for the launch controller: pivot + ball entities, Rapier spring
//! joints and the per-frame driver system.
use bevy::prelude::*;
use bevy::window::AppLifecycle;
use bevy_rapier2d::prelude::*;

use crate::core::components::{Ball, MainCamera, Pivot};
use crate::core::config::GameConfig;
use crate::core::system::system_order::{PointerCollectSet, PrePhysicsSet};
use crate::interaction::input::input_interaction::ActivePointers;
use crate::launcher::{LaunchController, LaunchWorld, Tether};

const PIVOT_Z: f32 = 0.0;
const BALL_Z: f32 = 1.0;
const PIVOT_VISUAL_RADIUS: f32 = 4.0;

pub struct SlingshotPlugin;

impl Plugin for SlingshotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActivePointers>()
            .add_event::<AppLifecycle>()
            .add_systems(
                Startup,
                (setup_ball_visuals, spawn_pivot, start_slingshot).chain(),
            )
            .add_systems(
                Update,
                (
                    handle_lifecycle,
                    drive_slingshot
                        .in_set(PrePhysicsSet)
                        .after(PointerCollectSet),
                )
                    .chain(),
            );
    }
}

/// The live controller plus the pivot entity it is anchored to.
#[derive(Resource, Debug)]
pub struct Slingshot {
    pub controller: LaunchController<Entity>,
    pub pivot: Entity,
}

/// Shared render handles for balls; absent in headless runs.
#[derive(Resource, Clone, Debug)]
pub struct BallVisuals {
    pub mesh: Handle<Mesh>,
    pub material: Handle<ColorMaterial>,
}

pub fn ball_color(cfg: &GameConfig) -> Color {
    let [r, g, b] = cfg.ball.color;
    Color::srgb(r, g, b)
}

fn setup_ball_visuals(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<ColorMaterial>>>,
    cfg: Res<GameConfig>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        debug!("no mesh/material assets; balls spawn without visuals");
        return;
    };
    commands.insert_resource(BallVisuals {
        mesh: meshes.add(Circle::new(cfg.ball.radius)),
        material: materials.add(ball_color(&cfg)),
    });
}

fn spawn_pivot(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<ColorMaterial>>>,
    cfg: Res<GameConfig>,
) {
    let pos = cfg.pivot.position();
    let mut pivot = commands.spawn((
        Name::new("Pivot"),
        Pivot,
        RigidBody::Fixed,
        Transform::from_translation(pos.extend(PIVOT_Z)),
    ));
    if let (Some(mut meshes), Some(mut materials)) = (meshes, materials) {
        pivot.insert((
            Mesh2d(meshes.add(Circle::new(PIVOT_VISUAL_RADIUS))),
            MeshMaterial2d(materials.add(Color::srgb(0.8, 0.8, 0.85))),
        ));
    }
}

fn start_slingshot(world: &mut World, pivots: &mut QueryState<Entity, With<Pivot>>) {
    let Some(pivot) = pivots.iter(world).next() else {
        error!("no Pivot entity at startup; slingshot disabled");
        return;
    };
    let timings = world.resource::<GameConfig>().launch.timings();
    let mut controller = LaunchController::new(timings);
    controller.start(&mut EcsLaunchWorld {
        world,
        pivot,
        projection: CameraProjection(None),
    });
    info!(?timings, "slingshot ready");
    world.insert_resource(Slingshot { controller, pivot });
}

/// Suspending the app stops touch handling; resuming turns it back on.
fn handle_lifecycle(mut events: EventReader<AppLifecycle>, slingshot: Option<ResMut<Slingshot>>) {
    let Some(mut slingshot) = slingshot else {
        events.clear();
        return;
    };
    for ev in events.read() {
        match ev {
            AppLifecycle::Suspended | AppLifecycle::WillSuspend => {
                slingshot.controller.disable();
            }
            AppLifecycle::WillResume | AppLifecycle::Running => {
                slingshot.controller.enable();
            }
            _ => {}
        }
    }
}

/// Per-frame tick: pointers then due timers. Despawning the pivot tears the
/// slingshot down and drops every pending timer.
pub fn drive_slingshot(world: &mut World, cameras: &mut QueryState<Entity, With<MainCamera>>) {
    let Some(pivot) = world.get_resource::<Slingshot>().map(|s| s.pivot) else {
        return;
    };
    if world.get_entity(pivot).is_err() {
        warn!(?pivot, "pivot despawned; tearing down slingshot");
        if let Some(mut slingshot) = world.remove_resource::<Slingshot>() {
            slingshot.controller.teardown();
        }
        return;
    }
    let now = world.resource::<Time>().elapsed();
    let pointers = world
        .get_resource::<ActivePointers>()
        .map(|p| p.0.clone())
        .unwrap_or_default();
    let camera = cameras.iter(world).next();
    world.resource_scope(|world, mut slingshot: Mut<Slingshot>| {
        slingshot.controller.tick(
            &mut EcsLaunchWorld {
                world,
                pivot,
                projection: CameraProjection(camera),
            },
            now,
            &pointers,
        );
    });
}

/// Maps a screen position to a world point.
trait ScreenProjection {
    fn project(&self, world: &World, screen: Vec2) -> Option<Vec3>;
}

/// Ray origin through the `MainCamera` viewport; `None` without a camera.
struct CameraProjection(Option<Entity>);

impl ScreenProjection for CameraProjection {
    fn project(&self, world: &World, screen: Vec2) -> Option<Vec3> {
        let cam = self.0?;
        let camera = world.get::<Camera>(cam)?;
        let cam_tf = world.get::<GlobalTransform>(cam)?;
        camera
            .viewport_to_world(cam_tf, screen)
            .ok()
            .map(|ray| ray.origin)
    }
}

/// `LaunchWorld` over the ECS. Balls carry their own `ImpulseJoint`, so the
/// joint handle and the ball handle are the same entity.
struct EcsLaunchWorld<'w, P = CameraProjection> {
    world: &'w mut World,
    pivot: Entity,
    projection: P,
}

impl<P: ScreenProjection> LaunchWorld for EcsLaunchWorld<'_, P> {
    type Handle = Entity;

    fn pivot_position(&self) -> Vec2 {
        self.world
            .get::<Transform>(self.pivot)
            .map(|t| t.translation.truncate())
            .unwrap_or_default()
    }

    fn spawn_tethered_ball(&mut self, at: Vec2) -> Tether<Entity> {
        let cfg = self.world.resource::<GameConfig>();
        let radius = cfg.ball.radius;
        let restitution = cfg.ball.restitution;
        let spring = SpringJointBuilder::new(
            cfg.tether.rest_length,
            cfg.tether.stiffness,
            cfg.tether.damping,
        );
        let visuals = self.world.get_resource::<BallVisuals>().cloned();
        let mut ball = self.world.spawn((
            Name::new("Ball"),
            Ball,
            RigidBody::Dynamic,
            Collider::ball(radius),
            Restitution::coefficient(restitution),
            Velocity::zero(),
            ImpulseJoint::new(self.pivot, spring),
            Transform::from_translation(at.extend(BALL_Z)),
        ));
        if let Some(v) = visuals {
            ball.insert((Mesh2d(v.mesh), MeshMaterial2d(v.material)));
        }
        let id = ball.id();
        Tether { ball: id, joint: id }
    }

    fn set_kinematic(&mut self, ball: Entity, kinematic: bool) {
        let Ok(mut e) = self.world.get_entity_mut(ball) else {
            return;
        };
        if kinematic {
            e.insert((RigidBody::KinematicPositionBased, Velocity::zero()));
        } else {
            e.insert(RigidBody::Dynamic);
        }
    }

    fn set_ball_position(&mut self, ball: Entity, position: Vec2) {
        if let Some(mut tf) = self.world.get_mut::<Transform>(ball) {
            tf.translation.x = position.x;
            tf.translation.y = position.y;
        }
    }

    fn screen_to_world(&self, screen: Vec2) -> Option<Vec3> {
        self.projection.project(self.world, screen)
    }

    fn release_tether(&mut self, joint: Entity) {
        if let Ok(mut e) = self.world.get_entity_mut(joint) {
            e.remove::<ImpulseJoint>();
        }
    }

    fn is_alive(&self, ball: Entity) -> bool {
        self.world.get_entity(ball).is_ok()
    }

    fn despawn_ball(&mut self, ball: Entity) {
        self.world.despawn(ball);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .add_plugins(SlingshotPlugin);
        app
    }

    #[test]
    fn startup_spawns_pivot_and_tethered_ball() {
        let mut app = headless_app();
        app.update();
        let slingshot = app.world().resource::<Slingshot>();
        let ball = slingshot.controller.active_ball().expect("ball spawned");
        let pivot = slingshot.pivot;
        let joint = app.world().get::<ImpulseJoint>(ball).expect("spring joint");
        assert_eq!(joint.parent, pivot);
        let pivot_pos = app.world().get::<Transform>(pivot).unwrap().translation;
        let ball_pos = app.world().get::<Transform>(ball).unwrap().translation;
        assert_eq!(ball_pos.truncate(), pivot_pos.truncate());
        assert!(app.world().get::<Ball>(ball).is_some());
        assert!(app.world().get::<Mesh2d>(ball).is_none());
    }

    #[test]
    fn suspend_disables_pointer_handling() {
        let mut app = headless_app();
        app.update();
        app.world_mut().send_event(AppLifecycle::Suspended);
        app.update();
        assert!(!app.world().resource::<Slingshot>().controller.is_enabled());
        app.world_mut().send_event(AppLifecycle::Running);
        app.update();
        assert!(app.world().resource::<Slingshot>().controller.is_enabled());
    }

    /// Screen y grows downward; world y grows upward around `origin`.
    struct FlipY {
        origin: Vec2,
    }

    impl ScreenProjection for FlipY {
        fn project(&self, _world: &World, screen: Vec2) -> Option<Vec3> {
            Some(Vec3::new(
                screen.x - self.origin.x,
                self.origin.y - screen.y,
                -7.0,
            ))
        }
    }

    fn drag(app: &mut App, pointers: &[Vec2]) -> Entity {
        let world = app.world_mut();
        world.resource_scope(|world, mut slingshot: Mut<Slingshot>| {
            let pivot = slingshot.pivot;
            let now = world.resource::<Time>().elapsed();
            slingshot.controller.tick(
                &mut EcsLaunchWorld {
                    world,
                    pivot,
                    projection: FlipY {
                        origin: Vec2::new(400.0, 300.0),
                    },
                },
                now,
                pointers,
            );
            slingshot.controller.active_ball().expect("ball still held")
        })
    }

    #[test]
    fn drag_moves_ball_to_projected_pointer_mean() {
        let mut app = headless_app();
        app.update();
        let ball = drag(
            &mut app,
            &[Vec2::new(500.0, 200.0), Vec2::new(700.0, 300.0), Vec2::new(600.0, 100.0)],
        );
        let tf = app.world().get::<Transform>(ball).unwrap();
        assert_eq!(tf.translation, Vec3::new(200.0, 100.0, BALL_Z));
        assert_eq!(
            app.world().get::<RigidBody>(ball),
            Some(&RigidBody::KinematicPositionBased)
        );
        assert!(app.world().resource::<Slingshot>().controller.is_dragging());
    }

    #[test]
    fn drag_without_camera_keeps_ball_in_place() {
        let mut app = headless_app();
        app.update();
        let ball = app
            .world()
            .resource::<Slingshot>()
            .controller
            .active_ball()
            .unwrap();
        let before = app.world().get::<Transform>(ball).unwrap().translation;
        app.world_mut().resource_scope(|world, mut slingshot: Mut<Slingshot>| {
            let pivot = slingshot.pivot;
            slingshot.controller.tick(
                &mut EcsLaunchWorld {
                    world,
                    pivot,
                    projection: CameraProjection(None),
                },
                std::time::Duration::ZERO,
                &[Vec2::new(10.0, 10.0)],
            );
        });
        assert_eq!(app.world().get::<Transform>(ball).unwrap().translation, before);
        assert_eq!(
            app.world().get::<RigidBody>(ball),
            Some(&RigidBody::KinematicPositionBased)
        );
    }

    #[test]
    fn missing_pivot_disables_slingshot() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .add_systems(Startup, start_slingshot);
        app.update();
        assert!(app.world().get_resource::<Slingshot>().is_none());
    }
}
