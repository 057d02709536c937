//! # Controls Replay
//!
//! Host-side harness for controls-core.
//!
//! Loads an event script (surface geometry, controller options, widgets
//! and a list of input events) from JSON, feeds the events through a
//! [`SurfaceController`] and reports the final transform together with
//! how often each widget callback fired.
//!
//! ## Script format
//!
//! ```json
//! {
//!   "surface": { "left": 0, "top": 0, "width": 800, "height": 600, "viewportHeight": 600 },
//!   "profile": "touch",
//!   "options": { "dragEnabled": true, "pinchEnabled": true },
//!   "widgets": [ { "name": "button", "x": 10, "y": 10, "dx": 40, "dy": 20 } ],
//!   "events": [ { "type": "Touch", "data": { "phase": "start", "touches": [], "timestamp_ms": 0 } } ]
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use controls_core::{
    ControlsOptions, DeviceProfile, GesturePhase, InputEvent, Surface, SurfaceController,
    WidgetHandler, WidgetOptions,
};

/// Command-line arguments for controls-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "controls-replay")]
#[command(about = "Replay input event scripts through a controlled surface")]
#[command(version)]
pub struct CliArgs {
    /// Event script (JSON)
    #[arg(long, env = "CONTROLS_SCRIPT")]
    pub script: PathBuf,

    /// Controller options (JSON), replacing the script's own options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Device profile, overriding the script's profile
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Device profile as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Mouse, pen or trackpad.
    Pointer,
    /// Touch screen.
    Touch,
}

impl From<ProfileArg> for DeviceProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Pointer => Self::Pointer,
            ProfileArg::Touch => Self::Touch,
        }
    }
}

/// A widget declared in a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptWidget {
    /// Name used in logs and the report.
    pub name: String,
    /// Geometry and flags.
    #[serde(flatten)]
    pub options: WidgetOptions,
    /// Whether the widget's click stops propagation.
    #[serde(default = "default_stop")]
    pub stop_click: bool,
}

fn default_stop() -> bool {
    true
}

/// A replayable event script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Surface geometry; 800x600 at the origin if omitted.
    #[serde(default)]
    pub surface: Option<Surface>,
    /// Device profile; pointer if omitted.
    #[serde(default)]
    pub profile: DeviceProfile,
    /// Controller options.
    #[serde(default)]
    pub options: ControlsOptions,
    /// Widgets to register, in order.
    #[serde(default)]
    pub widgets: Vec<ScriptWidget>,
    /// Events to replay, in order.
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

impl Script {
    /// Load a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

/// Callback counts of one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetReport {
    /// Script name.
    pub name: String,
    /// Assigned widget id.
    pub id: u64,
    /// Number of focus callbacks.
    pub focus: u32,
    /// Number of blur callbacks.
    pub blur: u32,
    /// Number of click callbacks.
    pub click: u32,
}

/// Result of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Final translation.
    pub translation: [f64; 2],
    /// Final scale.
    pub scale: [f64; 2],
    /// Final gesture phase.
    pub phase: GesturePhase,
    /// Events in the script.
    pub events: usize,
    /// Events the adapter routed to the dispatcher.
    pub routed: usize,
    /// Routed events whose default action should be suppressed.
    pub prevented: usize,
    /// Routed events a widget stopped.
    pub stopped: usize,
    /// Per-widget callback counts.
    pub widgets: Vec<WidgetReport>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "translation: ({:.3}, {:.3})",
            self.translation[0], self.translation[1]
        )?;
        writeln!(f, "scale:       ({:.3}, {:.3})", self.scale[0], self.scale[1])?;
        writeln!(f, "phase:       {:?}", self.phase)?;
        writeln!(
            f,
            "events:      {} ({} routed, {} prevented, {} stopped)",
            self.events, self.routed, self.prevented, self.stopped
        )?;
        for widget in &self.widgets {
            writeln!(
                f,
                "  {} (#{}): focus={} blur={} click={}",
                widget.name, widget.id, widget.focus, widget.blur, widget.click
            )?;
        }
        Ok(())
    }
}

/// Widget handler that counts callbacks into a shared report entry.
struct CountingHandler {
    report: Rc<RefCell<WidgetReport>>,
    stop_click: bool,
}

impl WidgetHandler for CountingHandler {
    fn on_focus(&mut self, point: [f64; 2]) -> bool {
        let mut report = self.report.borrow_mut();
        report.focus += 1;
        tracing::info!("{} focused at {point:?}", report.name);
        false
    }

    fn on_blur(&mut self, point: [f64; 2]) -> bool {
        let mut report = self.report.borrow_mut();
        report.blur += 1;
        tracing::info!("{} blurred at {point:?}", report.name);
        true
    }

    fn on_click(&mut self, point: [f64; 2]) -> bool {
        let mut report = self.report.borrow_mut();
        report.click += 1;
        tracing::info!("{} clicked at {point:?}", report.name);
        self.stop_click
    }
}

/// Replay `script` and report the outcome.
///
/// # Errors
///
/// Returns an error if the surface, options or widgets are invalid.
pub fn replay(script: &Script) -> anyhow::Result<Report> {
    let surface = match script.surface {
        Some(surface) => surface,
        None => Surface::new(800.0, 600.0)?,
    };
    let mut controller = SurfaceController::from_options(surface, &script.options, script.profile)
        .context("Invalid controller setup")?;

    let mut entries = Vec::with_capacity(script.widgets.len());
    for widget in &script.widgets {
        let report = Rc::new(RefCell::new(WidgetReport {
            name: widget.name.clone(),
            ..WidgetReport::default()
        }));
        let handler = CountingHandler {
            report: Rc::clone(&report),
            stop_click: widget.stop_click,
        };
        let id = controller
            .add_widget_options(&widget.options, handler)
            .with_context(|| format!("Invalid widget {}", widget.name))?;
        report.borrow_mut().id = id.get();
        entries.push(report);
    }

    let (mut routed, mut prevented, mut stopped) = (0, 0, 0);
    for event in &script.events {
        let Some(outcome) = controller.on_event(event) else {
            tracing::debug!("Skipped unbound {:?} event", event.kind());
            continue;
        };
        routed += 1;
        prevented += usize::from(outcome.prevent_default);
        stopped += usize::from(outcome.propagation_stopped);
    }

    let view = controller.view();
    let report = Report {
        translation: view.translation(),
        scale: view.scale(),
        phase: controller.phase(),
        events: script.events.len(),
        routed,
        prevented,
        stopped,
        widgets: entries.iter().map(|entry| entry.borrow().clone()).collect(),
    };
    tracing::info!(
        "Replayed {} events ({} routed)",
        report.events,
        report.routed
    );
    Ok(report)
}

/// Load the files named by `args` and replay them.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or the replay fails.
pub fn run(args: &CliArgs) -> anyhow::Result<Report> {
    let mut script = Script::load(&args.script)?;
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        script.options = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
    }
    if let Some(profile) = args.profile {
        script.profile = profile.into();
    }
    replay(&script)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const TAP_SCRIPT: &str = r#"{
        "profile": "touch",
        "options": { "dragEnabled": true },
        "widgets": [
            { "name": "under", "x": 0, "y": 0, "dx": 100, "dy": 100 },
            { "name": "over", "x": 0, "y": 0, "dx": 100, "dy": 100, "stop_click": false }
        ],
        "events": [
            { "type": "Touch", "data": { "phase": "start", "touches": [{ "id": 1, "x": 50, "y": 50 }], "timestamp_ms": 0 } },
            { "type": "Touch", "data": { "phase": "end", "touches": [{ "id": 1, "x": 50, "y": 50 }], "timestamp_ms": 120 } },
            { "type": "Wheel", "data": { "x": 50, "y": 50, "delta_y": -10 } }
        ]
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn replay_counts_callbacks() {
        let script: Script = serde_json::from_str(TAP_SCRIPT).expect("script");
        let report = replay(&script).expect("replay");

        assert_eq!(report.events, 3);
        assert_eq!(report.routed, 2);
        assert_eq!(report.stopped, 1);
        assert_eq!(report.phase, GesturePhase::Idle);

        let over = &report.widgets[1];
        assert_eq!((over.focus, over.click), (1, 1));
        let under = &report.widgets[0];
        assert_eq!((under.focus, under.click), (1, 1));
    }

    #[test]
    fn run_loads_script_and_config_files() {
        let script = write_temp(TAP_SCRIPT);
        let config = write_temp(r#"{ "wheelEnabled": true }"#);
        let args = CliArgs {
            script: script.path().to_path_buf(),
            config: Some(config.path().to_path_buf()),
            profile: Some(ProfileArg::Pointer),
            json: false,
        };

        let report = run(&args).expect("run");
        assert_eq!(report.routed, 1);
        assert!(report.scale[0] > 1.0);
        assert!(report.to_string().contains("1 routed"));
    }

    #[test]
    fn missing_script_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let args = CliArgs {
            script: dir.path().join("absent.json"),
            config: None,
            profile: None,
            json: true,
        };
        let err = run(&args).expect_err("missing file");
        assert!(err.to_string().contains("Failed to read script"));
    }

    #[test]
    fn invalid_options_fail_the_replay() {
        let script: Script =
            serde_json::from_str(r#"{ "options": { "translationBounds": [0, 0] } }"#)
                .expect("script");
        assert!(replay(&script).is_err());
    }

    #[test]
    fn cli_parses_profile() {
        let args = CliArgs::parse_from([
            "controls-replay",
            "--script",
            "events.json",
            "--profile",
            "touch",
            "--json",
        ]);
        assert_eq!(args.profile, Some(ProfileArg::Touch));
        assert!(args.json);
    }
}
