//=========================================================================
// Screenshots
//=========================================================================
//
// Timestamped frame captures with a bounded history.
//
//   <dir>/screenshot_<scene>_<YYYY-mm-dd_HH-MM-SS>.png
//
// After every capture the oldest files beyond `MAX_SCREENSHOTS` are removed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::render::RenderSurface;

//=== Constants ===========================================================

pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";
pub const MAX_SCREENSHOTS: usize = 100;

const PREFIX: &str = "screenshot_";
const EXTENSION: &str = "png";

//=== Capture =============================================================

/// File name for a capture of `scene` taken at `when`.
pub(crate) fn file_name(scene: &str, when: DateTime<Local>) -> String {
    format!("{}{}_{}.{}", PREFIX, scene, when.format("%Y-%m-%d_%H-%M-%S"), EXTENSION)
}

/// Saves the surface into `dir` and prunes old captures.
pub(crate) fn capture(
    surface: &dyn RenderSurface,
    dir: &Path,
    scene: &str,
) -> Result<PathBuf, EngineError> {
    fs::create_dir_all(dir)?;

    let path = dir.join(file_name(scene, Local::now()));
    surface.save_snapshot(&path)?;
    info!(target: "engine", "Saved screenshot {}", path.display());

    let removed = prune(dir, MAX_SCREENSHOTS)?;
    if removed > 0 {
        debug!(target: "engine", "Removed {} old screenshot(s)", removed);
    }
    Ok(path)
}

/// Deletes the oldest captures in `dir` until at most `keep` remain.
///
/// Only files named like captures are considered. Returns how many were
/// removed.
pub(crate) fn prune(dir: &Path, keep: usize) -> io::Result<usize> {
    let mut captures: Vec<(SystemTime, PathBuf)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !is_capture(&path) {
            continue;
        }
        let modified = entry.metadata()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        captures.push((modified, path));
    }

    if captures.len() <= keep {
        return Ok(0);
    }

    captures.sort();
    let excess = captures.len() - keep;
    for (_, path) in &captures[..excess] {
        fs::remove_file(path)?;
    }
    Ok(excess)
}

fn is_capture(path: &Path) -> bool {
    let named = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(PREFIX));
    let typed = path.extension().is_some_and(|ext| ext == EXTENSION);
    named && typed
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Canvas, Size};
    use chrono::TimeZone;

    #[test]
    fn file_name_has_scene_and_timestamp() {
        let when = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(file_name("Menu", when), "screenshot_Menu_2024-03-09_14-05-07.png");
    }

    #[test]
    fn capture_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("shots");
        let canvas = Canvas::new(Size::new(4, 4));

        let path = capture(&canvas, &dir, "Splash").unwrap();

        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("screenshot_Splash_"));
        assert_eq!(image::open(&path).unwrap().to_rgb8().dimensions(), (4, 4));
    }

    #[test]
    fn prune_keeps_newest_and_ignores_other_files() {
        let tmp = tempfile::tempdir().unwrap();
        for second in 0..5 {
            let name = format!("screenshot_A_2024-01-01_00-00-0{}.png", second);
            fs::write(tmp.path().join(name), b"stub").unwrap();
        }
        fs::write(tmp.path().join("notes.txt"), b"keep me").unwrap();

        let removed = prune(tmp.path(), 2).unwrap();

        assert_eq!(removed, 3);
        let mut left: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(
            left,
            vec![
                "notes.txt",
                "screenshot_A_2024-01-01_00-00-03.png",
                "screenshot_A_2024-01-01_00-00-04.png",
            ]
        );
    }

    #[test]
    fn prune_under_limit_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("screenshot_A_x.png"), b"stub").unwrap();
        assert_eq!(prune(tmp.path(), MAX_SCREENSHOTS).unwrap(), 0);
    }
}
