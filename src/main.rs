//! CLI binary: load a scene, render one frame on all cores, write a PNG.

use std::path::PathBuf;
use std::time::Instant;

use umbra::renderer::{Framebuffer, PixelBuffer, RayKind, Renderer};
use umbra::scene::{ComponentFamily, ComponentKey, Filter, Scene};
use umbra::{loader, UmbraError, WaitStrategy, WorkQueue};

struct Args {
    scene: PathBuf,
    width: u32,
    height: u32,
    output: PathBuf,
    /// Overrides the scene camera's filter when given.
    filter: Option<Filter>,
    /// Worker thread count; defaults to the logical CPU count.
    threads: Option<usize>,
    wait: WaitStrategy,
}

fn usage() -> String {
    "usage: umbra <scene.toml> [-w width] [-h height] [-o output.png] \
     [-f color|depth|normal] [-j threads] [--wait spin|yield]"
        .to_owned()
}

fn next_value(
    args: &mut dyn Iterator<Item = String>,
    name: &str,
) -> Result<String, UmbraError> {
    args.next()
        .ok_or_else(|| UmbraError::Usage(format!("{name} needs a value")))
}

fn next_count(
    args: &mut dyn Iterator<Item = String>,
    name: &str,
) -> Result<usize, UmbraError> {
    let value: usize = next_value(args, name)?
        .parse()
        .map_err(|_| UmbraError::Usage(format!("{name} expects an integer")))?;
    if value == 0 {
        return Err(UmbraError::Usage(format!("{name} must be nonzero")));
    }
    Ok(value)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, UmbraError> {
    let mut scene = None;
    let mut width = 1280_u32;
    let mut height = 720_u32;
    let mut output = PathBuf::from("umbra.png");
    let mut filter = None;
    let mut threads = None;
    let mut wait = WaitStrategy::Yield;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-w" | "--width" => width = next_count(&mut args, "-w")? as u32,
            "-h" | "--height" => height = next_count(&mut args, "-h")? as u32,
            "-o" | "--output" => output = PathBuf::from(next_value(&mut args, "-o")?),
            "-f" | "--filter" => {
                filter = Some(match next_value(&mut args, "-f")?.as_str() {
                    "color" => Filter::Color,
                    "depth" => Filter::Depth,
                    "normal" => Filter::Normal,
                    other => {
                        return Err(UmbraError::Usage(format!(
                            "-f expects color|depth|normal, got '{other}'"
                        )));
                    }
                });
            }
            "-j" | "--threads" => threads = Some(next_count(&mut args, "-j")?),
            "--wait" => {
                wait = match next_value(&mut args, "--wait")?.as_str() {
                    "spin" => WaitStrategy::BusySpin,
                    "yield" => WaitStrategy::Yield,
                    other => {
                        return Err(UmbraError::Usage(format!(
                            "--wait expects spin|yield, got '{other}'"
                        )));
                    }
                };
            }
            other if other.starts_with('-') => {
                return Err(UmbraError::Usage(format!("unknown flag '{other}'")));
            }
            other => {
                if scene.replace(PathBuf::from(other)).is_some() {
                    return Err(UmbraError::Usage(
                        "more than one scene file given".to_owned(),
                    ));
                }
            }
        }
    }

    let Some(scene) = scene else {
        return Err(UmbraError::Usage(usage()));
    };
    Ok(Args {
        scene,
        width,
        height,
        output,
        filter,
        threads,
        wait,
    })
}

/// Override the view camera's output filter in a loaded scene.
fn override_filter(scene: &mut Scene, filter: Filter) -> Result<(), UmbraError> {
    let Some(view) = scene.view() else {
        return Err(UmbraError::SceneParse("scene has no view node".to_owned()));
    };
    let Some(ComponentKey::Camera(camera)) =
        scene.find_any_component(view, ComponentFamily::Camera)
    else {
        return Err(UmbraError::SceneParse(
            "view node carries no camera".to_owned(),
        ));
    };
    let Some(camera) = scene.camera_mut(camera) else {
        return Err(UmbraError::SceneParse(
            "view camera was released".to_owned(),
        ));
    };
    camera.filter = filter;
    Ok(())
}

fn run() -> Result<(), UmbraError> {
    let args = parse_args(std::env::args().skip(1))?;
    let mut scene = loader::load_scene(&args.scene)?;
    if let Some(filter) = args.filter {
        override_filter(&mut scene, filter)?;
    }

    let workers = args.threads.unwrap_or_else(|| {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    });
    let capacity = (workers * workers).next_power_of_two();
    let queue = WorkQueue::new(workers, capacity, args.wait)?;

    let buffer = PixelBuffer::new(args.width, args.height);
    let framebuffer = Framebuffer {
        width: args.width,
        height: args.height,
        target: &buffer,
    };

    let mut renderer = Renderer::new(&queue);
    let frame_start = Instant::now();
    renderer.draw(&scene, &framebuffer);
    let frame_ms = frame_start.elapsed().as_secs_f64() * 1000.0;

    let counters = renderer.counters();
    log::info!(
        "frame {}x{} in {frame_ms:.1}ms | camera:{} reflect:{} refract:{} shadow:{}",
        args.width,
        args.height,
        counters.get(RayKind::Camera),
        counters.get(RayKind::Reflection),
        counters.get(RayKind::Refraction),
        counters.get(RayKind::Shadow),
    );

    image::save_buffer(
        &args.output,
        &buffer.to_rgba(),
        args.width,
        args.height,
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| UmbraError::ImageEncode(e.to_string()))?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        if matches!(e, UmbraError::Usage(_)) {
            log::error!("{}", usage());
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, UmbraError> {
        parse_args(list.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn defaults_cover_every_flag() {
        let parsed = args(&["scene.toml"]).expect("parse");
        assert_eq!(parsed.width, 1280);
        assert_eq!(parsed.height, 720);
        assert_eq!(parsed.output, PathBuf::from("umbra.png"));
        assert!(parsed.filter.is_none());
        assert!(parsed.threads.is_none());
        assert_eq!(parsed.wait, WaitStrategy::Yield);
    }

    #[test]
    fn flags_parse_in_any_order() {
        let parsed = args(&[
            "-h", "480", "scene.toml", "-w", "640", "-f", "normal", "-j", "2", "--wait", "spin",
            "-o", "frame.png",
        ])
        .expect("parse");
        assert_eq!(parsed.width, 640);
        assert_eq!(parsed.height, 480);
        assert_eq!(parsed.filter, Some(Filter::Normal));
        assert_eq!(parsed.threads, Some(2));
        assert_eq!(parsed.wait, WaitStrategy::BusySpin);
        assert_eq!(parsed.output, PathBuf::from("frame.png"));
    }

    #[test]
    fn missing_scene_is_a_usage_error() {
        assert!(matches!(args(&["-w", "64"]), Err(UmbraError::Usage(_))));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            args(&["scene.toml", "-w", "0"]),
            Err(UmbraError::Usage(_))
        ));
    }

    #[test]
    fn bad_filter_is_rejected() {
        assert!(matches!(
            args(&["scene.toml", "-f", "albedo"]),
            Err(UmbraError::Usage(_))
        ));
    }

    #[test]
    fn filter_override_reaches_the_view_camera() {
        let text = r#"
view = "v"

[[cameras]]
name = "cam"
filter = "color"
[cameras.projection.perspective]
aspect_ratio = 1.0
yfov = 60.0

[[nodes]]
name = "v"
components = ["cam"]
"#;
        let mut scene = loader::parse_scene(text).expect("scene");
        override_filter(&mut scene, Filter::Depth).expect("override");

        let view = scene.view().expect("view");
        let Some(ComponentKey::Camera(camera)) =
            scene.find_any_component(view, ComponentFamily::Camera)
        else {
            panic!("camera expected");
        };
        assert_eq!(scene.camera(camera).expect("payload").filter, Filter::Depth);
    }
}
