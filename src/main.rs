use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use projector::config::SceneConfig;
use projector::render::PixelBuffer;

const DEFAULT_SCENE: &str = "demos/scene.ron";

fn main() -> Result<(), Box<dyn Error>> {
    let scene_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENE));

    let config = SceneConfig::load(&scene_path)?;
    let base_dir = scene_path.parent().unwrap_or_else(|| Path::new("."));
    let mut scene = config.build(base_dir)?;

    if let Some(dir) = Path::new(&config.output).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let background = config.background_color();
    let mut frame = PixelBuffer::new(config.width, config.height, background);

    for n in 0..config.frames {
        frame.clear(background);
        let stats = scene.camera.render_with_stats(&scene.models, &mut frame);

        let path = format!("{}_{:03}.png", config.output, n);
        frame.save(&path)?;
        println!(
            "{}: {} faces, {} culled, {} degenerate, {} pixels",
            path, stats.faces, stats.culled, stats.degenerate, stats.pixels
        );

        scene.advance();
    }

    Ok(())
}
