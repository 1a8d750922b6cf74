//! End-to-end session scenarios

use std::collections::HashMap;

use approx::assert_relative_eq;

use super::*;
use crate::animation::GlassPhase;
use crate::camera::{CameraAnchor, TransitionState};
use crate::foundation::math::{utils, Quat};
use crate::presets::PresetRegistry;
use crate::render::{DeferredTextureLoader, MaterialAppearance};
use crate::scene::Aabb;

const DT: f32 = 1.0 / 60.0;

fn box_at(x: f32) -> Aabb {
    Aabb::from_center_extents(Vec3::new(x, 0.0, 0.0), Vec3::repeat(0.5))
}

fn model() -> SceneGraph {
    let mut scene = SceneGraph::new();
    scene.add_mesh("frame_up", Some("Frame"), box_at(-1.0));
    scene.add_mesh("frame_down", Some("Frame"), box_at(1.0));
    scene.add_mesh("Lens_L", Some("Glass"), box_at(-0.5));
    scene.add_mesh("Lens_R", Some("Glass"), box_at(0.5));
    scene.add_camera("Cam_Front", Vec3::new(0.0, 0.0, 10.0), Quat::identity(), 30.0);
    scene.add_camera(
        "Cam_Side",
        Vec3::new(10.0, 0.0, 0.0),
        Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2),
        35.0,
    );
    scene.add_camera("Cam_Lenses", Vec3::new(0.0, 0.0, 4.0), Quat::identity(), 25.0);
    scene.add_camera("Cam_Free", Vec3::new(0.0, 2.0, 12.0), Quat::identity(), 45.0);
    scene
}

fn session() -> ViewerSession {
    ViewerSession::new(ViewerSettings::default(), Box::new(DeferredTextureLoader))
}

fn loaded(preset_name: &str) -> (ViewerSession, PresetRegistry) {
    let presets = PresetRegistry::builtin().unwrap();
    let mut session = session();
    session.load_model(model(), presets.get(preset_name).unwrap()).unwrap();
    (session, presets)
}

fn run(session: &mut ViewerSession, seconds: f32) {
    let steps = (seconds / DT).round() as usize;
    for _ in 0..steps {
        let now = session.clock() + DT;
        session.advance(DT, now);
    }
}

fn anchor(session: &ViewerSession, name: &str) -> CameraAnchor {
    session.binding().unwrap().anchors[name].clone()
}

fn lens(session: &ViewerSession) -> (Vec3, f32) {
    let id = session.binding().unwrap().lens_materials[0];
    let material = session.materials().get(id).unwrap();
    (material.color(), material.opacity())
}

fn appearances(session: &ViewerSession) -> HashMap<String, MaterialAppearance> {
    session
        .scene()
        .unwrap()
        .nodes()
        .iter()
        .filter_map(|node| {
            let id = node.mesh()?.material?;
            Some((node.name.clone(), session.materials().get(id)?.appearance()))
        })
        .collect()
}

#[test]
fn test_three_node_scenario() {
    let presets = PresetRegistry::builtin().unwrap();
    let mut preset = presets.first().unwrap().clone();
    preset.frame.base_color = [0.02, 0.02, 0.02];
    preset.frame.up_color = None;
    preset.frame.down_color = None;
    preset.lens.color = [0.9, 0.5, 0.2];
    preset.lens.opacity = 0.9;

    let mut scene = SceneGraph::new();
    scene.add_mesh("frame_up", None, box_at(-1.0));
    scene.add_mesh("frame_down", None, box_at(1.0));
    scene.add_mesh("lens", None, box_at(0.0));

    let mut session = session();
    session.load_model(scene, &preset).unwrap();

    let scene = session.scene().unwrap();
    let color_of = |name: &str| session.materials().get(scene.material_of(name).unwrap()).unwrap().color();
    assert_eq!(color_of("frame_up"), Vec3::new(0.02, 0.02, 0.02));
    assert_eq!(color_of("frame_down"), Vec3::new(0.02, 0.02, 0.02));
    assert_eq!(color_of("lens"), Vec3::new(0.9, 0.5, 0.2));
    let lens = session.materials().get(scene.material_of("lens").unwrap()).unwrap();
    assert_eq!(lens.opacity(), 0.9);
    assert_eq!(session.binding().unwrap().lens_materials.len(), 1);
}

#[test]
fn test_applying_a_preset_twice_is_idempotent() {
    let (mut session, presets) = loaded("Black Prizm Road");

    for preset in presets.iter() {
        session.apply_preset(preset).unwrap();
        let once = appearances(&session);
        session.apply_preset(preset).unwrap();
        let twice = appearances(&session);

        assert_eq!(once.len(), 4, "{}", preset.name);
        assert_eq!(once, twice, "{}", preset.name);
    }
}

#[test]
fn test_transition_endpoints_are_exact() {
    let (mut session, _) = loaded("Black Prizm Road");
    assert!(session.transition().is_transitioning());
    assert_eq!(session.active_anchor(), Some("Cam_Front"));

    session.advance(0.0, 0.0);
    assert_relative_eq!(session.camera().position, Vec3::new(0.0, 0.0, 5.0));

    session.advance(0.8, 0.8);
    let front = anchor(&session, "Cam_Front");
    assert_eq!(session.transition().state(), &TransitionState::Idle);
    assert_eq!(session.camera().position, front.position);
    assert_eq!(session.camera().orientation, front.orientation);
    assert_eq!(session.camera().fov_degrees, 30.0);
    assert!(!session.camera().orbit_enabled);
}

#[test]
fn test_orientation_stays_unit_during_transition() {
    let (mut session, _) = loaded("Black Prizm Road");
    run(&mut session, 1.0);
    session.switch_to("Cam_Side").unwrap();

    for _ in 0..60 {
        let now = session.clock() + DT;
        session.advance(DT, now);
        assert_relative_eq!(session.camera().orientation.norm(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_mid_flight_switch_does_not_snap_back() {
    let (mut session, _) = loaded("Black Prizm Road");
    run(&mut session, 0.4);
    let before = session.camera().position;

    session.switch_to("Cam_Side").unwrap();
    let now = session.clock();
    session.advance(0.0, now);
    assert_relative_eq!(session.camera().position, before, epsilon = 1e-5);

    run(&mut session, 0.1);
    let side = anchor(&session, "Cam_Side").position;
    assert!((session.camera().position - side).norm() < (before - side).norm());
}

#[test]
fn test_free_anchor_cancels_transition() {
    let (mut session, _) = loaded("Black Prizm Road");
    run(&mut session, 0.2);
    assert!(session.transition().is_transitioning());

    session.switch_to("Cam_Free").unwrap();
    assert_eq!(session.transition().state(), &TransitionState::Idle);
    assert_eq!(session.camera().position, Vec3::new(0.0, 2.0, 12.0));
    assert!(session.camera().orbit_enabled);

    // the cancelled move never resumes
    run(&mut session, 1.0);
    assert_eq!(session.camera().position, Vec3::new(0.0, 2.0, 12.0));
}

#[test]
fn test_glass_runs_only_on_reveal_anchor() {
    let (mut session, presets) = loaded("Black Prizm Road");
    let original = utils::rgb(presets.get("Black Prizm Road").unwrap().lens.color);

    run(&mut session, 3.0);
    assert_eq!(session.glass().phase(), GlassPhase::WaitTinted);
    assert_eq!(lens(&session), (original, 0.9));

    session.switch_to("Cam_Lenses").unwrap();
    run(&mut session, 2.0);
    assert_eq!(session.glass().phase(), GlassPhase::ToClear);
    assert!(lens(&session).1 < 0.9);
}

#[test]
fn test_glass_full_cycle_round_trip() {
    let (mut session, presets) = loaded("Black Prizm Road");
    let original = utils::rgb(presets.get("Black Prizm Road").unwrap().lens.color);
    session.switch_to("Cam_Lenses").unwrap();

    run(&mut session, 2.0);
    assert_ne!(session.glass().phase(), GlassPhase::WaitTinted);
    // dwell + fade + dwell + fade, plus a frame per phase change
    run(&mut session, 3.1);
    assert_eq!(session.glass().phase(), GlassPhase::WaitTinted);
    assert_eq!(lens(&session), (original, 0.9));
}

#[test]
fn test_gate_loss_restores_lenses_within_one_step() {
    let (mut session, presets) = loaded("Black Prizm Road");
    let original = utils::rgb(presets.get("Black Prizm Road").unwrap().lens.color);
    session.switch_to("Cam_Lenses").unwrap();
    run(&mut session, 3.0);
    assert_ne!(lens(&session), (original, 0.9));

    session.switch_to("Cam_Front").unwrap();
    run(&mut session, DT);
    assert_eq!(session.glass().phase(), GlassPhase::WaitTinted);
    assert_eq!(lens(&session), (original, 0.9));
}

#[test]
fn test_preset_change_mid_animation_takes_new_tint() {
    let (mut session, presets) = loaded("Black Prizm Road");
    session.switch_to("Cam_Lenses").unwrap();
    run(&mut session, 2.0);
    assert_eq!(session.glass().phase(), GlassPhase::ToClear);

    let sapphire = presets.get("White Prizm Sapphire").unwrap();
    session.apply_preset(sapphire).unwrap();
    assert_eq!(session.glass().phase(), GlassPhase::WaitTinted);
    assert_eq!(lens(&session), (utils::rgb(sapphire.lens.color), sapphire.lens.opacity));

    // sapphire does not animate, so the lenses stay put
    run(&mut session, 3.0);
    assert_eq!(lens(&session), (utils::rgb(sapphire.lens.color), sapphire.lens.opacity));
}

#[test]
fn test_operations_before_load_fail() {
    let presets = PresetRegistry::builtin().unwrap();
    let mut session = session();

    assert_eq!(session.apply_preset(presets.first().unwrap()), Err(SessionError::NoModelLoaded));
    assert_eq!(session.switch_to("Cam_Front"), Err(SessionError::NoModelLoaded));
    assert!(session.preset().is_none());
    assert!(session.materials().is_empty());

    session.advance(DT, DT);
    assert_eq!(session.camera().position, Vec3::new(0.0, 0.0, 5.0));
}

#[test]
fn test_unknown_anchor_is_a_no_op() {
    let (mut session, _) = loaded("Black Prizm Road");
    run(&mut session, 0.3);
    let state = session.transition().state().clone();

    assert_eq!(
        session.switch_to("Cam_Missing"),
        Err(SessionError::AnchorNotFound("Cam_Missing".to_string()))
    );
    assert_eq!(session.active_anchor(), Some("Cam_Front"));
    assert_eq!(session.transition().state(), &state);
}

#[test]
fn test_missing_start_anchor_keeps_camera() {
    let presets = PresetRegistry::builtin().unwrap();
    let mut scene = SceneGraph::new();
    scene.add_mesh("Lens_L", Some("Glass"), box_at(0.0));

    let mut session = session();
    session.load_model(scene, presets.first().unwrap()).unwrap();
    assert!(session.active_anchor().is_none());
    assert!(!session.transition().is_transitioning());
}

#[test]
fn test_reload_stops_move_towards_old_anchor() {
    let (mut session, presets) = loaded("Black Prizm Road");
    run(&mut session, 0.2);
    assert!(session.transition().is_transitioning());

    let mut scene = SceneGraph::new();
    scene.add_mesh("Lens_L", Some("Glass"), box_at(0.0));
    session.load_model(scene, presets.first().unwrap()).unwrap();
    let held = session.camera().position;

    assert!(!session.transition().is_transitioning());
    run(&mut session, 1.0);
    assert_eq!(session.camera().position, held);
    assert!(session.active_anchor().is_none());
}

#[test]
fn test_reloading_disposes_previous_materials() {
    let (mut session, presets) = loaded("Black Prizm Road");
    let old: Vec<MaterialId> = session.binding().unwrap().all_materials().collect();
    session.drain_disposed();

    session.load_model(model(), presets.get("Black Prizm 24k").unwrap()).unwrap();
    let disposed = session.drain_disposed();
    assert_eq!(disposed.len(), old.len());
    assert!(old.iter().all(|id| !session.materials().contains(*id)));
    assert_eq!(session.materials().len(), session.binding().unwrap().all_materials().count());
}

#[test]
fn test_compile_materials_runs_once() {
    let (mut session, _) = loaded("Black Prizm Road");
    let host = HostPipeline::standard();

    let compiled = session.compile_materials(&host);
    assert_eq!(compiled, session.materials().len());
    assert_eq!(session.compile_materials(&host), 0);
}
