//! Headless pod interior session.
//!
//! Builds a lander with a transparent command pod, a crew cabin and a plain
//! pod, then scripts a flight: exterior view, first person in each cabin,
//! docking to a station while inside, undocking and a pause. Every frame runs
//! the three host phases and the outcome is logged.

mod config;

use anyhow::{Context, Result};
use config::PodviewConfig;
use engine_core::{PartId, Vec2, Vec3, Vec4};
use interior::host::{FlightState, InteriorModels};
use interior::{HorizonDisplay, InteriorSystem, PodConfig, RenderTarget, SimHost, StartState};
use std::path::PathBuf;

/// Render target that only counts what was drawn.
#[derive(Default)]
struct NullScreen {
    quads: u64,
}

impl RenderTarget for NullScreen {
    fn clear(&mut self, _color: Vec4) {}

    fn draw_quad(&mut self, _texture: &str, _corners: [Vec3; 4], _uvs: [Vec2; 4]) {
        self.quads += 1;
    }
}

struct Session {
    host: SimHost,
    system: InteriorSystem,
    display: HorizonDisplay,
    screen: NullScreen,
    frames_per_step: u32,
    command: PartId,
    cabin: PartId,
    plain: PartId,
}

impl Session {
    fn new(config: &PodviewConfig) -> Self {
        let mut host = SimHost::new();
        host.add_shader(&config.pod.transparent_shader_name);
        if let Some(name) = config.pod.opaque_shader_name() {
            host.add_shader(name);
        }

        let surfaces = config.pod.surface_names();
        let lander = host.add_vessel();
        let command = host.add_part(lander, Vec3::ZERO, 3, &surfaces);
        let cabin = host.add_part(lander, Vec3::new(0.0, -2.5, 0.0), 4, &surfaces);
        let plain = host.add_part(lander, Vec3::new(0.0, -5.0, 0.0), 1, &[]);
        host.set_active_vessel(Some(lander));
        for seat in 0..3 {
            host.add_crew(command, seat);
        }
        host.add_crew(cabin, 0);
        host.add_crew(plain, 0);
        if let Err(e) = host.spawn_crew(plain) {
            log::error!("Plain pod has no interior: {}", e);
        }

        let mut system = InteriorSystem::new(config.gate.clone());
        system.add_pod(&mut host, command, &config.pod, StartState::Flight);
        let cabin_config = PodConfig {
            opaque_shader_name: String::new(),
            ..config.pod.clone()
        };
        system.add_pod(&mut host, cabin, &cabin_config, StartState::Flight);
        system.add_follower(plain);

        Self {
            host,
            system,
            display: HorizonDisplay::new("horizon"),
            screen: NullScreen::default(),
            frames_per_step: config.frames_per_step.max(1),
            command,
            cabin,
            plain,
        }
    }

    fn frame(&mut self) -> Result<()> {
        let placed = self.system.update(&mut self.host)?;
        self.display.update();
        self.system.gui_draw(&mut self.host)?;
        self.display.render(Some(&mut self.screen));
        self.system.post_render(&mut self.host)?;
        for (part, context) in placed {
            log::debug!("frame {}: {} {:?}", self.system.frame_count(), part, context);
        }
        Ok(())
    }

    fn step(&mut self, label: &str) -> Result<()> {
        for _ in 0..self.frames_per_step {
            self.frame().with_context(|| format!("while {}", label))?;
        }
        self.report(label);
        Ok(())
    }

    fn report(&self, label: &str) {
        let host = &self.host;
        let describe = |part: PartId| {
            let parent = host.model_parent(part);
            let placement = if parent == host.part_node(part) {
                "exterior"
            } else if parent == Some(host.internal_space()) {
                "internal"
            } else {
                "absent"
            };
            format!(
                "{} visible={:?} placement={} seats={}",
                part,
                host.model_visible(part),
                placement,
                host.seat_occupants(part).iter().flatten().count()
            )
        };
        log::info!("== {} (frame {})", label, self.system.frame_count());
        log::info!("   gate open: {}", self.system.gate().shows_interior());
        log::info!("   roster: {:?}", self.system.roster().members());
        log::info!("   {}", describe(self.command));
        log::info!("   {}", describe(self.cabin));
        log::info!("   {} (follower)", describe(self.plain));
    }

    fn run(&mut self) -> Result<()> {
        self.step("exterior view")?;

        self.host.enter_first_person(self.command);
        self.step("first person in command pod")?;

        self.host.enter_first_person(self.cabin);
        self.step("first person in crew cabin")?;

        self.host.enter_first_person(self.command);
        self.step("back in command pod")?;

        let lander = self
            .host
            .vessel_of(self.command)
            .context("command pod lost its vessel")?;
        let station = self.host.add_vessel();
        self.host.add_part(station, Vec3::new(0.0, 12.0, 0.0), 0, &[]);
        self.host.dock(lander, station);
        self.step("docked to station while inside")?;

        self.host.fail_next_constructions(self.cabin, 1);
        let lander = self
            .host
            .undock(&[self.command, self.cabin, self.plain])
            .context("undocking produced no vessel")?;
        self.host.set_active_vessel(Some(lander));
        self.step("undocked, cabin rebuild failing once")?;

        self.system.on_pause(&mut self.host);
        log::info!("paused: gate open = {}", self.system.gate().shows_interior());
        log::info!("instrument quads drawn: {}", self.screen.quads);
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting podview");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = PodviewConfig::load(config_path.as_deref());
    let mut session = Session::new(&config);
    session.run()?;

    Ok(())
}
