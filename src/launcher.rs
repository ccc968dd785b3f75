//! The launch sequence: clean, configure, build, run.
//!
//! Steps run strictly in order and each blocks until its process exits.
//! A failed configure or build stops the sequence unless
//! [`LaunchSettings::keep_going`] is set, in which case the failure is
//! logged and recorded in the [`LaunchReport`].

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::backend::{Backend, BACKEND_VARIABLE};
use crate::config::{BuildConfig, LaunchSettings};
use crate::error::LaunchError;
use crate::layout::{BuildLayout, TargetPlatform};
use crate::process::{CommandRunner, Invocation, StepStatus, SystemRunner};

/// External steps of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Generate build files.
    Configure,
    /// Compile from generated build files.
    Build,
    /// Execute the produced binary.
    Run,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure => f.write_str("configure"),
            Self::Build => f.write_str("build"),
            Self::Run => f.write_str("run"),
        }
    }
}

/// What happened during a completed launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    /// Backend actually used after resolution.
    pub backend: Backend,
    /// Build directory relative to the project root.
    pub build_dir: PathBuf,
    /// Executable path relative to the project root.
    pub executable: PathBuf,
    /// Exit status of the app, `None` when it was not launched.
    pub app_status: Option<StepStatus>,
    /// Steps that failed but were tolerated under `keep_going`.
    pub failed_steps: Vec<Step>,
}

impl LaunchReport {
    /// Process exit code the launcher should finish with.
    ///
    /// Mirrors the app's exit code; a signal-terminated app maps to `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.app_status.map_or(0, |status| status.code().unwrap_or(1))
    }
}

/// Configure command: `<cmake> . -B build-<backend> -D WEBGPU_BACKEND=<BACKEND>`.
#[must_use]
pub fn configure_invocation(cmake: &str, layout: &BuildLayout) -> Invocation {
    Invocation::new(cmake, layout.project_root())
        .arg(".")
        .arg("-B")
        .arg(layout.build_dir())
        .arg("-D")
        .arg(format!("{BACKEND_VARIABLE}={}", layout.backend().cmake_value()))
}

/// Build command: `<cmake> --build build-<backend>`.
#[must_use]
pub fn build_invocation(cmake: &str, layout: &BuildLayout) -> Invocation {
    Invocation::new(cmake, layout.project_root())
        .arg("--build")
        .arg(layout.build_dir())
}

/// Runs the produced executable with no arguments.
#[must_use]
pub fn run_invocation(layout: &BuildLayout) -> Invocation {
    // A relative program path would be resolved again after the child
    // changes into `cwd`, so the layout root must already be absolute.
    Invocation::new(
        layout.project_root().join(layout.executable_path()),
        layout.project_root(),
    )
}

/// Removes `dir` and everything in it. A missing directory is fine.
///
/// # Errors
/// Returns [`LaunchError::Clean`] for any failure other than `NotFound`.
pub fn clean_build_dir(dir: &Path) -> Result<(), LaunchError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            info!("removed {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist; nothing to clean", dir.display());
            Ok(())
        }
        Err(source) => Err(LaunchError::Clean {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Runs the launch sequence with real processes on the host platform.
///
/// # Errors
/// See [`launch_with`].
pub fn launch(settings: &LaunchSettings) -> Result<LaunchReport, LaunchError> {
    launch_with(&SystemRunner, settings, TargetPlatform::host())
}

/// Runs the launch sequence through `runner`.
///
/// # Errors
/// Returns [`LaunchError`] when the project root cannot be resolved,
/// cleaning fails, a program cannot be started, a configure or build step
/// fails without `keep_going`, or the executable is missing when it is time
/// to run it.
pub fn launch_with(
    runner: &dyn CommandRunner,
    settings: &LaunchSettings,
    platform: TargetPlatform,
) -> Result<LaunchReport, LaunchError> {
    let BuildConfig { backend, clean } = settings.build_config();
    let project_root = std::path::absolute(&settings.project_root).map_err(|source| {
        LaunchError::ProjectRoot {
            path: settings.project_root.clone(),
            source,
        }
    })?;
    let layout = BuildLayout::new(
        project_root,
        backend,
        platform,
        settings.executable.as_str(),
    );
    let mut report = LaunchReport {
        backend,
        build_dir: layout.build_dir(),
        executable: layout.executable_path(),
        app_status: None,
        failed_steps: Vec::new(),
    };

    if clean {
        clean_build_dir(&layout.build_path())?;
    }

    info!("creating build files with {backend} backend");
    let configure = configure_invocation(&settings.cmake, &layout);
    check_step(runner, Step::Configure, &configure, settings, &mut report)?;

    info!("building app for {platform}");
    let build = build_invocation(&settings.cmake, &layout);
    check_step(runner, Step::Build, &build, settings, &mut report)?;

    if !settings.run {
        info!(
            "skipping launch; build output is in {}",
            layout.build_dir().display()
        );
        return Ok(report);
    }

    let run = run_invocation(&layout);
    if !Path::new(run.program()).exists() {
        return Err(LaunchError::MissingExecutable {
            path: PathBuf::from(run.program()),
        });
    }
    info!("running {}", layout.executable_path().display());
    let status = execute(runner, &run)?;
    debug!("{} finished with {status}", Step::Run);
    report.app_status = Some(status);
    Ok(report)
}

fn check_step(
    runner: &dyn CommandRunner,
    step: Step,
    invocation: &Invocation,
    settings: &LaunchSettings,
    report: &mut LaunchReport,
) -> Result<(), LaunchError> {
    let status = execute(runner, invocation)?;
    if status.success() {
        return Ok(());
    }
    if settings.keep_going {
        warn!("{step} step failed with {status}; continuing");
        report.failed_steps.push(step);
        return Ok(());
    }
    Err(LaunchError::StepFailed { step, status })
}

fn execute(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
) -> Result<StepStatus, LaunchError> {
    debug!("$ {invocation}");
    runner.run(invocation).map_err(|source| LaunchError::Spawn {
        program: invocation.program().to_string_lossy().into_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockCommandRunner;
    use mockall::predicate::function;
    use mockall::Sequence;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn project() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn settings_for(root: &Path, backend: &str) -> LaunchSettings {
        LaunchSettings {
            backend: backend.to_owned(),
            project_root: root.to_path_buf(),
            ..LaunchSettings::default()
        }
    }

    fn place_executable(root: &Path, backend: &str) {
        let dir = root.join(format!("build-{backend}"));
        fs::create_dir_all(&dir).expect("create build dir");
        fs::write(dir.join("LearnWebGPU"), b"").expect("write executable");
    }

    fn args_of(inv: &Invocation) -> Vec<String> {
        inv.args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[rstest]
    fn configure_command_encodes_backend() {
        let layout = BuildLayout::new(".", Backend::Dawn, TargetPlatform::Unix, "LearnWebGPU");
        let inv = configure_invocation("cmake", &layout);
        assert_eq!(inv.to_string(), "cmake . -B build-dawn -D WEBGPU_BACKEND=DAWN");
        assert_eq!(inv.cwd(), Path::new("."));
    }

    #[rstest]
    fn build_command_targets_build_dir() {
        let layout = BuildLayout::new(".", Backend::Wgpu, TargetPlatform::Unix, "LearnWebGPU");
        assert_eq!(
            build_invocation("cmake", &layout).to_string(),
            "cmake --build build-wgpu"
        );
    }

    #[rstest]
    fn run_command_is_rooted_in_project() {
        let layout =
            BuildLayout::new("/p", Backend::Dawn, TargetPlatform::Windows, "LearnWebGPU");
        let inv = run_invocation(&layout);
        assert_eq!(
            inv.program(),
            Path::new("/p")
                .join("build-dawn")
                .join("Debug")
                .join("LearnWebGPU.exe")
                .as_os_str()
        );
        assert!(inv.args().is_empty());
    }

    #[rstest]
    fn steps_run_in_order(project: TempDir) {
        place_executable(project.path(), "dawn");
        let mut runner = MockCommandRunner::new();
        let mut seq = Sequence::new();
        runner
            .expect_run()
            .with(function(|inv: &Invocation| {
                args_of(inv) == [".", "-B", "build-dawn", "-D", "WEBGPU_BACKEND=DAWN"]
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(StepStatus::exited(0)));
        runner
            .expect_run()
            .with(function(|inv: &Invocation| args_of(inv) == ["--build", "build-dawn"]))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(StepStatus::exited(0)));
        runner
            .expect_run()
            .with(function(|inv: &Invocation| inv.args().is_empty()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(StepStatus::exited(0)));

        let report = launch_with(
            &runner,
            &settings_for(project.path(), "dawn"),
            TargetPlatform::Unix,
        )
        .expect("launch should succeed");

        assert_eq!(report.backend, Backend::Dawn);
        assert_eq!(report.build_dir, PathBuf::from("build-dawn"));
        assert_eq!(report.app_status, Some(StepStatus::exited(0)));
        assert_eq!(report.exit_code(), 0);
    }

    #[rstest]
    fn configure_failure_stops_before_build(project: TempDir) {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(StepStatus::exited(1)));

        let err = launch_with(
            &runner,
            &settings_for(project.path(), "wgpu"),
            TargetPlatform::Unix,
        )
        .expect_err("configure failure must abort");

        assert!(matches!(
            err,
            LaunchError::StepFailed {
                step: Step::Configure,
                ..
            }
        ));
    }

    #[rstest]
    fn keep_going_tolerates_failed_steps(project: TempDir) {
        place_executable(project.path(), "wgpu");
        let mut runner = MockCommandRunner::new();
        let mut calls = 0;
        runner.expect_run().times(3).returning(move |_| {
            calls += 1;
            Ok(StepStatus::exited(if calls < 3 { 2 } else { 0 }))
        });
        let settings = LaunchSettings {
            keep_going: true,
            ..settings_for(project.path(), "wgpu")
        };

        let report =
            launch_with(&runner, &settings, TargetPlatform::Unix).expect("keep going");

        assert_eq!(report.failed_steps, [Step::Configure, Step::Build]);
        assert_eq!(report.app_status, Some(StepStatus::exited(0)));
    }

    #[rstest]
    fn missing_executable_is_reported(project: TempDir) {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(2)
            .returning(|_| Ok(StepStatus::exited(0)));

        let err = launch_with(
            &runner,
            &settings_for(project.path(), "wgpu"),
            TargetPlatform::Unix,
        )
        .expect_err("nothing was built");

        match err {
            LaunchError::MissingExecutable { path } => {
                assert_eq!(path, project.path().join("build-wgpu").join("LearnWebGPU"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn no_run_stops_after_build(project: TempDir) {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(2)
            .returning(|_| Ok(StepStatus::exited(0)));
        let settings = LaunchSettings {
            run: false,
            ..settings_for(project.path(), "dawn")
        };

        let report = launch_with(&runner, &settings, TargetPlatform::Unix).expect("build only");

        assert_eq!(report.app_status, None);
        assert_eq!(report.exit_code(), 0);
    }

    #[rstest]
    fn relative_root_is_made_absolute_for_every_step(project: TempDir) {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .with(function(|inv: &Invocation| inv.cwd().is_absolute()))
            .times(2)
            .returning(|_| Ok(StepStatus::exited(0)));
        let settings = LaunchSettings {
            project_root: PathBuf::from("relative-project"),
            run: false,
            ..settings_for(project.path(), "wgpu")
        };

        launch_with(&runner, &settings, TargetPlatform::Unix).expect("build only");
    }

    #[rstest]
    fn empty_root_cannot_be_resolved() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);
        let settings = LaunchSettings {
            project_root: PathBuf::new(),
            ..LaunchSettings::default()
        };

        let err = launch_with(&runner, &settings, TargetPlatform::Unix).expect_err("empty root");

        assert!(matches!(err, LaunchError::ProjectRoot { .. }));
    }

    #[rstest]
    fn spawn_failure_names_program(project: TempDir) {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Err(io::Error::from(io::ErrorKind::NotFound)));
        let settings = LaunchSettings {
            cmake: "cmake-missing".to_owned(),
            keep_going: true,
            ..settings_for(project.path(), "wgpu")
        };

        let err = launch_with(&runner, &settings, TargetPlatform::Unix).expect_err("no cmake");

        match err {
            LaunchError::Spawn { program, .. } => assert_eq!(program, "cmake-missing"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn clean_removes_existing_dir(project: TempDir) {
        let dir = project.path().join("build-wgpu");
        fs::create_dir_all(dir.join("CMakeFiles")).expect("create build dir");
        clean_build_dir(&dir).expect("clean");
        assert!(!dir.exists());
    }

    #[rstest]
    fn clean_tolerates_missing_dir(project: TempDir) {
        clean_build_dir(&project.path().join("build-dawn")).expect("missing dir is fine");
    }

    #[rstest]
    #[case(Some(StepStatus::exited(7)), 7)]
    #[case(Some(StepStatus::terminated()), 1)]
    #[case(None, 0)]
    fn exit_code_follows_app(#[case] app_status: Option<StepStatus>, #[case] expected: i32) {
        let report = LaunchReport {
            backend: Backend::Wgpu,
            build_dir: PathBuf::from("build-wgpu"),
            executable: PathBuf::from("build-wgpu/LearnWebGPU"),
            app_status,
            failed_steps: Vec::new(),
        };
        assert_eq!(report.exit_code(), expected);
    }
}
