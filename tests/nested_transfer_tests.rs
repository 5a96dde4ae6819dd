//! Szenario-Tests für das Nested-Space-System: Raum-Transfer, Preview,
//! Multi-Pocket-Contention und Pocket-Zerstörung.

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};
use vr_scene_coordinator::{
    Aabb, AppIntent, Coordinator, CoordinatorState, DefaultToolFactory, DeviceId, EntityHandle,
    GrabOwner, Intersection, IntersectionProvider, PocketId, PointerRole, PointerSample,
    PointerSource, Pose, SceneEntityOps, TickContext,
};

// ── Test-Kollaborateure ──────────────────────────────────────────

#[derive(Default)]
struct FakeScene {
    poses: HashMap<EntityHandle, Pose>,
    scales: HashMap<EntityHandle, Vec3>,
    bounds: HashMap<EntityHandle, Aabb>,
    suspended: HashSet<EntityHandle>,
}

impl FakeScene {
    fn with_entity(mut self, entity: EntityHandle, position: Vec3, extent: f32) -> Self {
        self.poses.insert(entity, Pose::from_position(position));
        self.scales.insert(entity, Vec3::ONE);
        self.bounds.insert(
            entity,
            Aabb::from_center_half_extents(position, Vec3::splat(extent * 0.5)),
        );
        self
    }
}

impl SceneEntityOps for FakeScene {
    fn set_pose(&mut self, entity: EntityHandle, pose: &Pose) {
        self.poses.insert(entity, *pose);
    }

    fn set_scale(&mut self, entity: EntityHandle, scale: Vec3) {
        self.scales.insert(entity, scale);
    }

    fn reparent(&mut self, _entity: EntityHandle, _parent: Option<EntityHandle>) {}

    fn destroy(&mut self, entity: EntityHandle) {
        self.poses.remove(&entity);
    }

    fn set_grab_suspended(&mut self, entity: EntityHandle, suspended: bool) {
        if suspended {
            self.suspended.insert(entity);
        } else {
            self.suspended.remove(&entity);
        }
    }

    fn entity_pose(&self, entity: EntityHandle) -> Option<Pose> {
        self.poses.get(&entity).copied()
    }

    fn entity_scale(&self, entity: EntityHandle) -> Option<Vec3> {
        self.scales.get(&entity).copied()
    }

    fn entity_bounds(&self, entity: EntityHandle) -> Option<Aabb> {
        self.bounds.get(&entity).copied()
    }
}

#[derive(Default)]
struct FakePointers {
    samples: Vec<PointerSample>,
}

impl PointerSource for FakePointers {
    fn enumerate_active_pointers(&mut self) -> Vec<PointerSample> {
        self.samples.clone()
    }
}

struct FakeIntersection {
    entities: Vec<(EntityHandle, Vec3)>,
}

impl IntersectionProvider for FakeIntersection {
    fn query(&self, pose: &Pose, max_distance: f32) -> Option<Intersection> {
        self.entities
            .iter()
            .map(|(entity, position)| (*entity, *position, pose.position.distance(*position)))
            .filter(|(_, _, distance)| *distance <= max_distance)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(entity, position, distance)| Intersection {
                entity: Some(entity),
                contact_point: position,
                distance,
            })
    }
}

/// Eine Test-Welt: Koordinator + Zustand + Kollaborateure.
struct Rig {
    coordinator: Coordinator,
    state: CoordinatorState,
    scene: FakeScene,
    source: FakePointers,
    factory: DefaultToolFactory,
    intersection: FakeIntersection,
}

impl Rig {
    fn new(scene: FakeScene, hits: Vec<(EntityHandle, Vec3)>) -> Self {
        Self {
            coordinator: Coordinator::new(),
            state: CoordinatorState::new(),
            scene,
            source: FakePointers::default(),
            factory: DefaultToolFactory,
            intersection: FakeIntersection { entities: hits },
        }
    }

    fn tick(&mut self, samples: Vec<PointerSample>, now: f64) {
        self.source.samples = samples;
        let mut ctx = TickContext {
            pointer_source: Some(&mut self.source),
            intersection: Some(&self.intersection),
            scene: &mut self.scene,
            tool_factory: &mut self.factory,
            menu_factory: None,
        };
        self.coordinator
            .tick(&mut self.state, &mut ctx, now)
            .expect("Tick sollte ohne Fehler durchlaufen");
    }

    fn intent(&mut self, intent: AppIntent) {
        let mut ctx = TickContext {
            pointer_source: Some(&mut self.source),
            intersection: Some(&self.intersection),
            scene: &mut self.scene,
            tool_factory: &mut self.factory,
            menu_factory: None,
        };
        self.coordinator
            .handle_intent(&mut self.state, &mut ctx, intent)
            .expect("Intent sollte ohne Fehler durchlaufen");
    }

    fn spawn_pocket_at(&mut self, center: Vec3, scale: f32, reference: Vec3) -> PocketId {
        self.intent(AppIntent::PocketSpawnRequested {
            world_pose: Pose::new(center, Quat::IDENTITY, scale),
            reference_pose: Pose::from_position(reference),
            volume: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE),
            excluded: Vec::new(),
        });
        *self
            .state
            .nested
            .pockets
            .keys()
            .last()
            .expect("Pocket wurde angelegt")
    }
}

fn sample(id: u32, position: Vec3) -> PointerSample {
    PointerSample {
        device: DeviceId(id),
        role: PointerRole::Primary,
        pose: Pose::new(position, Quat::IDENTITY, 1.0),
        reach: 0.5,
        select_down: false,
        select_pressed: false,
        select_released: false,
    }
}

fn pressed(mut s: PointerSample) -> PointerSample {
    s.select_down = true;
    s.select_pressed = true;
    s
}

fn held(mut s: PointerSample) -> PointerSample {
    s.select_down = true;
    s
}

fn released(mut s: PointerSample) -> PointerSample {
    s.select_released = true;
    s
}

// Die Miniatur bei (5, 0, 0) im Maßstab 1:10 spiegelt den Bereich um
// (100, 0, 0). Pointer-Reichweite 0.5: Pose (5, 0, 0.5) legt die Spitze
// exakt ins Miniatur-Zentrum.
const POCKET_CENTER: Vec3 = Vec3::new(5.0, 0.0, 0.0);
const REFERENCE: Vec3 = Vec3::new(100.0, 0.0, 0.0);
const INSIDE_POSE: Vec3 = Vec3::new(5.0, 0.0, 0.5);

// ── Tests ────────────────────────────────────────────────────────

#[test]
fn scenario_a_world_grab_transfers_into_pocket() {
    let entity = EntityHandle(7);
    let scene = FakeScene::default().with_entity(entity, Vec3::new(0.0, 0.0, -0.5), 0.2);
    let mut rig = Rig::new(scene, vec![(entity, Vec3::new(0.0, 0.0, -0.5))]);

    rig.tick(vec![sample(1, Vec3::ZERO)], 0.0);
    let pocket = rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);

    // Außerhalb greifen …
    rig.tick(vec![pressed(sample(1, Vec3::ZERO))], 0.1);
    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::World(DeviceId(1)))
    );

    // … und die Spitze in die Miniatur bewegen.
    rig.tick(vec![held(sample(1, INSIDE_POSE))], 0.2);

    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::Pocket(DeviceId(1), pocket))
    );
    rig.state.grab.validate_exclusive().expect("kein Doppelbesitz");

    // Volle Pose folgt der Schatten-Ableitung: Spitze im Miniatur-Zentrum
    // entspricht dem Referenz-Ursprung, der Halteversatz bleibt erhalten.
    let pose = rig.scene.entity_pose(entity).expect("Entity existiert");
    assert!((pose.position - REFERENCE).length() < 1e-3);
}

#[test]
fn scenario_b_first_pocket_in_order_wins_contention() {
    let entity = EntityHandle(7);
    let scene = FakeScene::default().with_entity(entity, Vec3::new(0.0, 0.0, -0.5), 0.2);
    let mut rig = Rig::new(scene, vec![(entity, Vec3::new(0.0, 0.0, -0.5))]);

    rig.tick(vec![sample(1, Vec3::ZERO)], 0.0);
    // Zwei deckungsgleiche Pockets: beide beanspruchen die Spitze.
    let first = rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);
    let second = rig.spawn_pocket_at(POCKET_CENTER, 0.1, Vec3::new(200.0, 0.0, 0.0));

    rig.tick(vec![pressed(sample(1, Vec3::ZERO))], 0.1);
    rig.tick(vec![held(sample(1, INSIDE_POSE))], 0.2);

    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::Pocket(DeviceId(1), first))
    );
    assert!(!rig
        .state
        .grab
        .holds_any(GrabOwner::Pocket(DeviceId(1), second)));
    rig.state.grab.validate_exclusive().expect("kein Doppelbesitz");
}

#[test]
fn preview_round_trip_restores_exact_scale() {
    let entity = EntityHandle(7);
    // Entity im Referenzbereich, 2 m Kantenlänge.
    let scene = FakeScene::default().with_entity(entity, REFERENCE, 2.0);
    let mut rig = Rig::new(scene, vec![(entity, POCKET_CENTER)]);

    rig.tick(vec![sample(1, INSIDE_POSE)], 0.0);
    let pocket = rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);

    // In der Miniatur greifen (Schatten-Besitz) …
    rig.tick(vec![pressed(sample(1, INSIDE_POSE))], 0.1);
    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::Pocket(DeviceId(1), pocket))
    );

    // … und die Spitze herausziehen: Preview-Modus.
    rig.tick(vec![held(sample(1, Vec3::new(3.0, 0.0, 0.5)))], 0.2);

    assert!(rig.state.nested.previews.contains_key(&DeviceId(1)));
    assert_eq!(rig.state.grab.owner_of(entity), None);
    assert!(rig.scene.suspended.contains(&entity));
    let preview_scale = rig.scene.entity_scale(entity).expect("Entity existiert");
    // Faktor 0.25 / 2.0 = 0.125
    assert!((preview_scale.x - 0.125).abs() < 1e-6);

    // Zurück in die Ursprungs-Pocket: exakte Skalierung, voller Besitz.
    rig.tick(vec![held(sample(1, INSIDE_POSE))], 0.3);

    assert!(!rig.state.nested.previews.contains_key(&DeviceId(1)));
    assert_eq!(rig.scene.entity_scale(entity), Some(Vec3::ONE));
    assert!(!rig.scene.suspended.contains(&entity));
    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::Pocket(DeviceId(1), pocket))
    );
}

#[test]
fn release_outside_pockets_finalizes_at_pointer() {
    let entity = EntityHandle(7);
    let scene = FakeScene::default().with_entity(entity, REFERENCE, 2.0);
    let mut rig = Rig::new(scene, vec![(entity, POCKET_CENTER)]);

    rig.tick(vec![sample(1, INSIDE_POSE)], 0.0);
    rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);

    rig.tick(vec![pressed(sample(1, INSIDE_POSE))], 0.1);
    rig.tick(vec![held(sample(1, Vec3::new(3.0, 0.0, 0.5)))], 0.2);
    assert!(rig.state.nested.previews.contains_key(&DeviceId(1)));

    // Loslassen weit weg von Pocket und Körpernahzone (Blickpunkt am
    // Ursprung): finale Platzierung am Pointer, Originalgröße.
    rig.tick(vec![released(held(sample(1, Vec3::new(3.0, 0.0, 0.5))))], 0.3);

    assert!(!rig.state.nested.previews.contains_key(&DeviceId(1)));
    assert_eq!(rig.scene.entity_scale(entity), Some(Vec3::ONE));
    assert!(!rig.scene.suspended.contains(&entity));
    let pose = rig.scene.entity_pose(entity).expect("Entity existiert");
    // Am Pointer verankert, nicht mehr im Referenzbereich.
    assert!(pose.position.distance(Vec3::new(3.0, 0.0, 0.5)) < 2.0);
    assert!(pose.position.x < 50.0);
}

#[test]
fn pocket_destruction_returns_held_set_to_real_pointer() {
    let entity = EntityHandle(7);
    let scene = FakeScene::default().with_entity(entity, REFERENCE, 2.0);
    let mut rig = Rig::new(scene, vec![(entity, POCKET_CENTER)]);

    rig.tick(vec![sample(1, INSIDE_POSE)], 0.0);
    let pocket = rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);

    rig.tick(vec![pressed(sample(1, INSIDE_POSE))], 0.1);
    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::Pocket(DeviceId(1), pocket))
    );

    rig.intent(AppIntent::PocketDestroyRequested { pocket });

    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::World(DeviceId(1)))
    );
    assert!(rig.state.nested.shadow(DeviceId(1), pocket).is_none());
    assert_eq!(rig.state.nested.pocket_count(), 0);

    // Ein weiterer Tick findet keinen Schatten mehr als Transfer-Ziel.
    rig.tick(vec![held(sample(1, INSIDE_POSE))], 0.2);
    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::World(DeviceId(1)))
    );
}

#[test]
fn degenerate_pocket_scale_freezes_containment() {
    let scene = FakeScene::default();
    let mut rig = Rig::new(scene, Vec::new());

    rig.tick(vec![sample(1, INSIDE_POSE)], 0.0);
    let pocket = rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);

    rig.tick(vec![sample(1, INSIDE_POSE)], 0.1);
    assert!(
        rig.state
            .nested
            .shadow(DeviceId(1), pocket)
            .expect("Schatten existiert")
            .is_contained
    );

    // Maßstab degeneriert: Containment friert ein, kein NaN-Durchschlag.
    rig.state
        .nested
        .pockets
        .get_mut(&pocket)
        .expect("Pocket existiert")
        .world_pose
        .scale = 0.0;
    rig.tick(vec![sample(1, INSIDE_POSE)], 0.2);

    let shadow = rig
        .state
        .nested
        .shadow(DeviceId(1), pocket)
        .expect("Schatten existiert");
    assert!(shadow.is_contained);
    assert!(shadow.pose.is_finite());
}

#[test]
fn containment_only_changes_with_pointer_motion() {
    let scene = FakeScene::default();
    let mut rig = Rig::new(scene, Vec::new());

    rig.tick(vec![sample(1, Vec3::ZERO)], 0.0);
    let pocket = rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);

    for step in 1..=5 {
        rig.tick(vec![sample(1, Vec3::ZERO)], step as f64 * 0.1);
        assert!(
            !rig.state
                .nested
                .shadow(DeviceId(1), pocket)
                .expect("Schatten existiert")
                .is_contained
        );
    }

    rig.tick(vec![sample(1, INSIDE_POSE)], 1.0);
    assert!(
        rig.state
            .nested
            .shadow(DeviceId(1), pocket)
            .expect("Schatten existiert")
            .is_contained
    );
}

#[test]
fn exiting_into_second_pocket_transfers_shadow_to_shadow() {
    let entity = EntityHandle(7);
    let scene = FakeScene::default().with_entity(entity, REFERENCE, 2.0);
    let mut rig = Rig::new(scene, vec![(entity, POCKET_CENTER)]);

    rig.tick(vec![sample(1, INSIDE_POSE)], 0.0);
    let first = rig.spawn_pocket_at(POCKET_CENTER, 0.1, REFERENCE);
    // Zweite Miniatur direkt daneben; die Volumina stoßen aneinander.
    let second_center = Vec3::new(5.2, 0.0, 0.0);
    let second = rig.spawn_pocket_at(second_center, 0.1, Vec3::new(200.0, 0.0, 0.0));

    rig.tick(vec![pressed(sample(1, INSIDE_POSE))], 0.1);
    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::Pocket(DeviceId(1), first))
    );

    // Spitze wandert in einem Tick aus der ersten in die zweite Miniatur:
    // direkter Schatten → Schatten-Transfer ohne Umweg über die Szene.
    rig.tick(vec![held(sample(1, Vec3::new(5.2, 0.0, 0.5)))], 0.2);

    assert_eq!(
        rig.state.grab.owner_of(entity),
        Some(GrabOwner::Pocket(DeviceId(1), second))
    );
    assert!(!rig.state.nested.previews.contains_key(&DeviceId(1)));
    rig.state.grab.validate_exclusive().expect("kein Doppelbesitz");
}
