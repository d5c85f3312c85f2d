//! Integration tests for the script -> load -> render -> artifact pipeline

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use manimator_core::{Error, Result};
use manimator_engine::{
    LoadedScene, RenderConfig, RenderOutcome, SceneBackend, SceneRunner, Workspace,
};
use parking_lot::Mutex;

#[derive(Clone)]
enum Behavior {
    /// Write `<media_dir>/<subdir>/<Class>.mp4`
    Deposit(&'static str),
    /// Render succeeds but writes nothing
    Nothing,
    FailLoad(&'static str),
    FailRender(&'static str),
    Panic,
}

#[derive(Default)]
struct Calls {
    loads: Vec<String>,
    renders: Vec<RenderConfig>,
}

struct FakeBackend {
    behavior: Behavior,
    calls: Arc<Mutex<Calls>>,
}

impl FakeBackend {
    fn new(behavior: Behavior) -> (Self, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        (
            Self {
                behavior,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl SceneBackend for FakeBackend {
    fn load(&self, script: &Path, class_name: &str) -> Result<LoadedScene> {
        self.calls.lock().loads.push(class_name.to_string());
        if let Behavior::FailLoad(msg) = self.behavior {
            return Err(Error::Load(msg.to_string()));
        }
        Ok(LoadedScene {
            script: script.to_path_buf(),
            class_name: class_name.to_string(),
        })
    }

    fn render(&self, scene: &LoadedScene, config: &RenderConfig) -> Result<()> {
        self.calls.lock().renders.push(config.clone());
        match self.behavior {
            Behavior::Deposit(subdir) => {
                let dir = config.media_dir.join(subdir);
                fs::create_dir_all(&dir)?;
                fs::write(dir.join(format!("{}.mp4", scene.class_name)), b"video")?;
                Ok(())
            }
            Behavior::Nothing | Behavior::FailLoad(_) => Ok(()),
            Behavior::FailRender(msg) => Err(Error::Render(msg.to_string())),
            Behavior::Panic => panic!("renderer crashed"),
        }
    }
}

const CIRCLE_GROW: &str = "from manim import *\n\n\
class CircleGrow(Scene):\n    \
def construct(self):\n        \
self.play(GrowFromCenter(Circle(color=BLUE)))\n";

fn runner(root: &Path, behavior: Behavior) -> (SceneRunner<FakeBackend>, Arc<Mutex<Calls>>) {
    let (backend, calls) = FakeBackend::new(behavior);
    let runner = SceneRunner::new(Workspace::new(root), backend, RenderConfig::new("defaults"));
    (runner, calls)
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn circle_grow_renders_to_workspace() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("manim_tmp");
    let (runner, calls) = runner(&ws, Behavior::Deposit(""));

    let outcome = runner.execute(CIRCLE_GROW);

    assert_eq!(outcome, RenderOutcome::Rendered(ws.join("CircleGrow.mp4")));
    assert_eq!(
        outcome.to_string(),
        format!("Success:{}/CircleGrow.mp4", ws.display())
    );

    let calls = calls.lock();
    assert_eq!(calls.loads, ["CircleGrow"]);
    assert_eq!(calls.renders.len(), 1);
    assert_eq!(calls.renders[0].media_dir, ws);
    assert_eq!(fs::read_to_string(ws.join("scene.py")).unwrap(), CIRCLE_GROW);
}

#[test]
fn nested_artifact_is_discovered() {
    let tmp = tempfile::tempdir().unwrap();
    let (runner, _) = runner(tmp.path(), Behavior::Deposit("videos/scene/480p15"));

    let outcome = runner.execute(CIRCLE_GROW);

    assert_eq!(
        outcome.artifact(),
        Some(tmp.path().join("videos/scene/480p15/CircleGrow.mp4").as_path())
    );
    assert!(outcome.to_string().starts_with("Success:"));
}

#[test]
fn missing_scene_class_fails_before_load() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    let (runner, calls) = runner(&ws, Behavior::Deposit(""));

    let outcome = runner.execute("print(\"hello\")");

    assert_eq!(outcome.to_string(), "Failed: no scene subclass found");
    assert!(calls.lock().loads.is_empty());
    assert!(calls.lock().renders.is_empty());
    assert_eq!(files_in(&ws), [ws.join("scene.py")]);
}

#[test]
fn stale_artifacts_never_leak_into_a_new_run() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().to_path_buf();
    fs::write(ws.join("Previous.mp4"), b"old video").unwrap();

    let (runner, _) = runner(&ws, Behavior::Nothing);
    let outcome = runner.execute(CIRCLE_GROW);

    assert_eq!(outcome, RenderOutcome::no_mp4(&ws));
    assert_eq!(
        outcome.to_string(),
        format!("Success:{} (no mp4 found)", ws.display())
    );
    assert!(!ws.join("Previous.mp4").exists());
}

#[test]
fn load_failure_skips_render() {
    let tmp = tempfile::tempdir().unwrap();
    let (runner, calls) = runner(
        tmp.path(),
        Behavior::FailLoad("SyntaxError: invalid syntax (scene.py, line 3)"),
    );

    let outcome = runner.execute(CIRCLE_GROW);

    assert_eq!(
        outcome,
        RenderOutcome::Failed("SyntaxError: invalid syntax (scene.py, line 3)".into())
    );
    assert!(calls.lock().renders.is_empty());
}

#[test]
fn render_failure_restores_config() {
    let tmp = tempfile::tempdir().unwrap();
    let (runner, calls) = runner(tmp.path(), Behavior::FailRender("ValueError: bad color"));

    let outcome = runner.execute(CIRCLE_GROW);

    assert_eq!(outcome.to_string(), "Failed: ValueError: bad color");
    assert_eq!(calls.lock().renders[0].media_dir, tmp.path());
    assert_eq!(runner.settings().current(), RenderConfig::new("defaults"));
}

#[test]
fn panicking_backend_is_contained() {
    let tmp = tempfile::tempdir().unwrap();
    let (runner, _) = runner(tmp.path(), Behavior::Panic);

    let outcome = runner.execute(CIRCLE_GROW);

    assert_eq!(outcome, RenderOutcome::Failed("renderer crashed".into()));
    assert_eq!(runner.settings().current(), RenderConfig::new("defaults"));
}

#[test]
fn cleanup_reports_not_found_after_removal() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    let (runner, _) = runner(&ws, Behavior::Deposit(""));
    runner.execute(CIRCLE_GROW);

    let first = runner.cleanup(&ws);
    let second = runner.cleanup(&ws);

    assert!(first.to_string().starts_with("Cleanup successful for directory:"));
    assert_eq!(second.to_string(), format!("Directory not found: {}", ws.display()));
}
