//! Showroom demo application
//!
//! Drives a viewer session headlessly through a scripted tour: the built-in
//! presets are applied in turn while the camera visits every anchor of a
//! synthetic sunglasses model. The log shows what a renderer would draw.
//!
//! Usage: `showroom [settings.toml] [assets-dir]`

use std::path::PathBuf;

use eyewear_viewer::config::ConfigError;
use eyewear_viewer::foundation::logging;
use eyewear_viewer::prelude::*;
use eyewear_viewer::render::TextureLoader;
use thiserror::Error;

const FRAME_STEP: f32 = 1.0 / 60.0;

#[derive(Error, Debug)]
enum AppError {
    #[error("settings: {0}")]
    Settings(#[from] ConfigError),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("session: {0}")]
    Session(#[from] SessionError),
    #[error("no presets available")]
    NoPresets,
}

/// One step of the scripted tour
enum Action {
    Camera(&'static str),
    Preset(&'static str),
    Wait(f32),
}

const TOUR: &[Action] = &[
    Action::Wait(1.0),
    Action::Camera("Cam_Side"),
    Action::Wait(0.4),
    // re-targeted mid-flight
    Action::Camera("Cam_Lenses"),
    Action::Wait(4.0),
    Action::Preset("White Prizm Sapphire"),
    Action::Wait(1.0),
    Action::Preset("Black Prizm Road"),
    Action::Wait(2.5),
    Action::Camera("Cam_Free"),
    Action::Wait(0.5),
    Action::Preset("Black Prizm 24k"),
    Action::Camera("Cam_Front"),
    Action::Wait(1.0),
    Action::Preset("White Prizm Black"),
    Action::Camera("Cam_Nowhere"),
    Action::Wait(0.5),
];

struct ShowroomApp {
    presets: PresetRegistry,
    session: ViewerSession,
    host: HostPipeline,
    timer: Timer,
}

impl ShowroomApp {
    fn new(settings_path: PathBuf, assets: Option<PathBuf>) -> Result<Self, AppError> {
        let settings = ViewerSettings::load_or_default(&settings_path)?;
        settings.validate().map_err(AppError::InvalidSettings)?;
        logging::init_with_level(&settings.log_level);
        log::info!("Settings from {}: {:?}", settings_path.display(), settings);

        let presets = PresetRegistry::builtin()?;
        log::info!("Presets: {}", presets.names().collect::<Vec<_>>().join(", "));

        let loader: Box<dyn TextureLoader> = match assets {
            Some(root) => {
                log::info!("Decoding textures from {}", root.display());
                Box::new(ImageTextureLoader::new(root))
            }
            None => Box::new(DeferredTextureLoader),
        };

        Ok(Self {
            presets,
            session: ViewerSession::new(settings, loader),
            host: HostPipeline::standard(),
            timer: Timer::new(),
        })
    }

    fn initialize(&mut self) -> Result<(), AppError> {
        let preset = self.presets.first().ok_or(AppError::NoPresets)?;
        let model = sunglasses();
        if let Some(bounds) = model.bounds() {
            log::info!("Model spans {:?} to {:?}", bounds.min, bounds.max);
        }
        self.session.load_model(model, preset)?;
        self.session.compile_materials(&self.host);
        Ok(())
    }

    fn run(&mut self) -> Result<(), AppError> {
        for action in TOUR {
            match action {
                Action::Camera(name) => {
                    if let Err(e) = self.session.switch_to(name) {
                        log::warn!("{e}");
                    }
                }
                Action::Preset(name) => match self.presets.get(name) {
                    Some(preset) => self.session.apply_preset(preset)?,
                    None => log::warn!("Unknown preset '{name}'"),
                },
                Action::Wait(seconds) => self.wait(*seconds),
            }
        }

        log::info!(
            "Tour finished after {} frames ({:.1}s)",
            self.timer.frame_count(),
            self.timer.total_time()
        );
        Ok(())
    }

    fn wait(&mut self, seconds: f32) {
        let frames = (seconds / FRAME_STEP).round() as usize;
        for _ in 0..frames {
            self.frame();
        }
        self.report();
    }

    fn frame(&mut self) {
        self.timer.step(FRAME_STEP);
        self.session.advance(self.timer.delta_time(), self.timer.total_time());
        self.session.compile_materials(&self.host);

        let released = self.session.drain_disposed();
        if !released.is_empty() {
            log::debug!("Renderer releases {} materials", released.len());
        }
    }

    fn report(&self) {
        let camera = self.session.camera();
        log::info!(
            "t={:.2}s anchor={:?} camera=({:.2}, {:.2}, {:.2}) fov={:.0} orbit={} glass={:?}",
            self.timer.total_time(),
            self.session.active_anchor(),
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.fov_degrees,
            camera.orbit_enabled,
            self.session.glass().phase()
        );

        if let Some(id) = self.session.binding().and_then(|b| b.lens_materials.first()) {
            if let Some(lens) = self.session.materials().get(*id) {
                let color = lens.color();
                log::info!(
                    "  lens color=({:.2}, {:.2}, {:.2}) opacity={:.2}",
                    color.x,
                    color.y,
                    color.z,
                    lens.opacity()
                );
            }
        }
    }
}

/// A stand-in for the Vanguard model's node layout
fn sunglasses() -> SceneGraph {
    let part = |center: Vec3, extents: Vec3| Aabb::from_center_extents(center, extents);
    let mut scene = SceneGraph::new();

    scene.add_group("Vanguard");
    scene.add_mesh("frame_up", Some("Frame_Mat"), part(Vec3::new(0.0, 0.25, 0.0), Vec3::new(7.0, 0.5, 0.6)));
    scene.add_mesh("frame_down", Some("Frame_Mat"), part(Vec3::new(0.0, -1.5, 0.0), Vec3::new(7.0, 0.4, 0.6)));
    scene.add_mesh("Arm_L", Some("Frame_Mat"), part(Vec3::new(-7.0, 0.0, -7.0), Vec3::new(0.3, 0.6, 7.0)));
    scene.add_mesh("Arm_R", Some("Frame_Mat"), part(Vec3::new(7.0, 0.0, -7.0), Vec3::new(0.3, 0.6, 7.0)));
    scene.add_mesh("Arm_Text_L", Some("Temple_Print"), part(Vec3::new(-7.1, 0.0, -5.0), Vec3::new(0.1, 0.3, 3.0)));
    scene.add_mesh("Lens_L", Some("Glass_Prizm"), part(Vec3::new(-3.5, -0.5, 0.3), Vec3::new(3.2, 1.5, 0.3)));
    scene.add_mesh("Lens_R", Some("Glass_Prizm"), part(Vec3::new(3.5, -0.5, 0.3), Vec3::new(3.2, 1.5, 0.3)));
    scene.add_mesh("GlasBack", Some("Glass_Back"), part(Vec3::new(0.0, -0.5, 0.1), Vec3::new(6.8, 1.5, 0.2)));
    scene.add_mesh("Logo_L", Some("Logo_Mat"), part(Vec3::new(-6.5, 0.4, 0.5), Vec3::new(0.3, 0.1, 0.05)));
    scene.add_mesh("Interior", Some("fake"), part(Vec3::new(0.0, 0.0, -6.0), Vec3::new(6.5, 0.5, 6.0)));
    scene.add_mesh("Nose_Pad", Some("Rubber"), part(Vec3::new(0.0, -1.0, -0.5), Vec3::new(0.5, 0.5, 0.3)));

    let facing = |eye: Vec3| {
        eyewear_viewer::foundation::math::utils::look_rotation(&eye, &Vec3::zeros(), &Vec3::y())
    };
    for (name, eye, fov) in [
        ("Cam_Front", Vec3::new(0.0, 0.0, 25.0), 35.0),
        ("Cam_Side", Vec3::new(25.0, 2.0, -4.0), 40.0),
        ("Cam_Lenses", Vec3::new(0.0, -0.5, 12.0), 30.0),
        ("Cam_Free", Vec3::new(12.0, 8.0, 20.0), 45.0),
    ] {
        scene.add_camera(name, eye, facing(eye), fov);
    }
    scene
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map_or_else(|| PathBuf::from("showroom.toml"), PathBuf::from);
    let assets = args.next().map(PathBuf::from);

    let mut app = ShowroomApp::new(settings_path, assets)?;
    app.initialize()?;
    app.run()?;
    Ok(())
}
