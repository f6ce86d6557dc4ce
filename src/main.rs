//! Climb Curves entry point
//!
//! Headless drivers for the three simulations. Output goes through `log`;
//! run with `RUST_LOG=info` (or `debug`) to see it.
//!
//! ```text
//! climb-curves spline <control.obj> [model.obj]
//! climb-curves climb [settings.json] [--seed N] [--ticks N]
//! climb-curves snow [--seed N] [--ticks N]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, anyhow, bail};
    use glam::Vec2;

    use climb_curves::Settings;
    use climb_curves::assets::{load_control_points, load_mesh};
    use climb_curves::sim::{GameEvent, World, autopilot, tick};
    use climb_curves::snow::{DepthLayer, Pointer, Snowfield};
    use climb_curves::spline::{CameraRig, SplinePath};

    const DEFAULT_TICKS: u64 = 3600;
    const DEFAULT_SEED: u64 = 12345;

    /// Flags shared by the simulation commands
    struct RunArgs {
        positional: Vec<String>,
        seed: u64,
        ticks: u64,
    }

    fn parse_run_args(args: &[String]) -> Result<RunArgs> {
        let mut parsed = RunArgs {
            positional: Vec::new(),
            seed: DEFAULT_SEED,
            ticks: DEFAULT_TICKS,
        };
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                    parsed.seed = value.parse().with_context(|| format!("invalid seed {value:?}"))?;
                }
                "--ticks" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--ticks needs a value"))?;
                    parsed.ticks = value.parse().with_context(|| format!("invalid tick count {value:?}"))?;
                }
                _ => parsed.positional.push(arg.clone()),
            }
        }
        Ok(parsed)
    }

    pub fn run() -> Result<()> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let Some((command, rest)) = args.split_first() else {
            bail!("usage: climb-curves <spline|climb|snow> [args]");
        };
        match command.as_str() {
            "spline" => run_spline(rest),
            "climb" => run_climb(&parse_run_args(rest)?),
            "snow" => run_snow(&parse_run_args(rest)?),
            other => bail!("unknown command {other:?} (expected spline, climb or snow)"),
        }
    }

    /// Animate one full cycle along the control polygon
    fn run_spline(args: &[String]) -> Result<()> {
        let control = args
            .first()
            .ok_or_else(|| anyhow!("usage: climb-curves spline <control.obj> [model.obj]"))?;
        let points =
            load_control_points(control).with_context(|| format!("loading control points from {control}"))?;

        if let Some(model) = args.get(1) {
            let mesh = load_mesh(model).with_context(|| format!("loading model from {model}"))?;
            log::info!(
                "Model: {} vertices, {} triangles ({} bytes of vertex data)",
                mesh.vertices.len(),
                mesh.faces.len(),
                mesh.vertex_bytes().len()
            );
        }

        let mut path = SplinePath::new(points);
        let camera = CameraRig::looking_at(&path);
        log::info!("Camera eye {:?} looking at {:?}", camera.eye, camera.target);

        let steps = path.segment_count() * path.samples_per_segment();
        for _ in 0..steps {
            if let Some(position) = path.current_position() {
                match path.orientation() {
                    Some(o) => log::info!(
                        "segment {} sample {}: {:?} rotate {:.2} deg about {:?}",
                        path.cursor.segment,
                        path.cursor.sample,
                        position,
                        o.angle_degrees,
                        o.axis
                    ),
                    None => log::info!(
                        "segment {} sample {}: {:?}",
                        path.cursor.segment,
                        path.cursor.sample,
                        position
                    ),
                }
            }
            path.tick();
        }
        log::info!("Animated {} steps over {} segments", steps, path.segment_count());
        Ok(())
    }

    fn load_or_create_settings(path: &Path) -> Result<Settings> {
        if path.exists() {
            return Settings::load(path).with_context(|| format!("loading settings from {}", path.display()));
        }
        let settings = Settings::default();
        settings
            .save(path)
            .with_context(|| format!("writing default settings to {}", path.display()))?;
        log::info!("Wrote default settings to {}", path.display());
        Ok(settings)
    }

    /// Let the autopilot play a run
    fn run_climb(args: &RunArgs) -> Result<()> {
        let settings = match args.positional.first() {
            Some(path) => load_or_create_settings(&PathBuf::from(path))?,
            None => Settings::default(),
        };

        let mut world = World::new(settings, args.seed);
        for _ in 0..args.ticks {
            let input = autopilot(&world);
            let report = tick(&mut world, &input, 1.0);
            for event in &world.events {
                if matches!(event, GameEvent::ComboResolved { .. } | GameEvent::SpeedLevelUp { .. }) {
                    log::info!("tick {}: {:?}", world.time_ticks, event);
                }
            }
            if report.game_over {
                break;
            }
        }

        log::info!(
            "Finished after {} ticks: score {}, max floor {}, speed level {}",
            world.time_ticks,
            world.state.score,
            world.player.max_floor,
            world.state.speed_level
        );
        Ok(())
    }

    /// Snow with a pointer sweeping across the middle of the field
    fn run_snow(args: &RunArgs) -> Result<()> {
        let mut field = Snowfield::new(args.seed);
        let dt = 1.0 / 60.0;
        let (width, height) = (field.config().width, field.config().height);

        for i in 0..args.ticks {
            let phase = i as f32 * dt * 0.5;
            let pointer = Pointer {
                pressed: (i / 120) % 2 == 1,
                pos: Vec2::new(width * (0.5 + 0.4 * phase.sin()), height * 0.5),
            };
            field.step(dt, &pointer);
            if i % 600 == 0 {
                log::info!(
                    "t={:.1}s flakes {} (far {}, middle {}, close {})",
                    i as f32 * dt,
                    field.len(),
                    field.layer(DepthLayer::Far).count(),
                    field.layer(DepthLayer::Middle).count(),
                    field.layer(DepthLayer::Close).count()
                );
            }
        }
        log::info!("Snowfield holds {} flakes after {} ticks", field.len(), args.ticks);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Climb Curves (native) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
