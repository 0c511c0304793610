// Launcher session: install check, missing files, patch update, launch

use crate::config::LauncherConfig;
use crate::install::{self, InstallState};
use crate::patch::{self, PatchOutcome};
use crate::prompt::{Decider, Decision, Question};
use crate::ui;
use anyhow::Context;
use log::{debug, info};
use std::fs;
use std::process::{Command, Stdio};

#[cfg(windows)]
use std::os::windows::process::CommandExt;

/// Steps of a session, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    VerifyInstallation,
    MissingFiles,
    PatchUpdate,
    Launch,
}

/// Whether a failed step ends the session or only warns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Advisory,
}

impl Step {
    pub fn severity(self) -> Severity {
        match self {
            Step::VerifyInstallation | Step::Launch => Severity::Fatal,
            Step::MissingFiles | Step::PatchUpdate => Severity::Advisory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    /// Turned off in the config.
    Skipped,
    /// The user answered no.
    Declined,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Launched { pid: u32 },
    LaunchFailed(String),
    /// The user declined at this step; nothing failed.
    Declined(Step),
    /// A fatal step failed.
    Aborted(Step),
}

#[derive(Debug, Clone)]
pub struct SessionReport {
    pub steps: Vec<StepReport>,
    pub install_state: InstallState,
    pub outcome: SessionOutcome,
}

impl SessionReport {
    pub fn is_success(&self) -> bool {
        matches!(
            self.outcome,
            SessionOutcome::Launched { .. } | SessionOutcome::Declined(_)
        )
    }

    pub fn status_of(&self, step: Step) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.status)
    }
}

pub struct Orchestrator<'a> {
    config: &'a LauncherConfig,
    steps: Vec<StepReport>,
    install_state: InstallState,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a LauncherConfig) -> Self {
        Self {
            config,
            steps: Vec::new(),
            install_state: InstallState::NotChecked,
        }
    }

    /// Run one session. Each question goes to `decider`. Errors are returned
    /// only for unexpected failures (e.g. the prompt itself failing); step
    /// failures are reported in the `SessionReport`.
    pub async fn run(mut self, decider: &mut dyn Decider) -> anyhow::Result<SessionReport> {
        ui::banner("WoW Custom Launcher - Progressive Systems");
        self.setup_paths()?;

        if let Some(outcome) = self.verify_installation(decider).await? {
            return Ok(self.finish(outcome));
        }
        if let Some(outcome) = self.missing_files(decider).await? {
            return Ok(self.finish(outcome));
        }
        if let Some(outcome) = self.patch_update().await {
            return Ok(self.finish(outcome));
        }

        let outcome = self.launch(decider)?;
        Ok(self.finish(outcome))
    }

    fn setup_paths(&self) -> anyhow::Result<()> {
        for dir in [&self.config.temp_path, &self.config.wow_path] {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    fn record(&mut self, step: Step, status: StepStatus) {
        debug!("{:?} -> {:?}", step, status);
        self.steps.push(StepReport { step, status });
    }

    /// Record a failure. Returns the session outcome if the step is fatal.
    fn fail(&mut self, step: Step, reason: String) -> Option<SessionOutcome> {
        self.record(step, StepStatus::Failed(reason));
        match step.severity() {
            Severity::Fatal => Some(SessionOutcome::Aborted(step)),
            Severity::Advisory => None,
        }
    }

    fn set_install_state(&mut self, state: InstallState) {
        debug!("Install state {:?} -> {:?}", self.install_state, state);
        self.install_state = state;
    }

    async fn verify_installation(
        &mut self,
        decider: &mut dyn Decider,
    ) -> anyhow::Result<Option<SessionOutcome>> {
        let step = Step::VerifyInstallation;
        let root = self.config.wow_path.clone();
        self.set_install_state(InstallState::Checking);

        if install::check_installed(self.config) {
            ui::success(&format!("WoW found at: {}", root.display()));
            self.set_install_state(InstallState::Installed);
            self.record(step, StepStatus::Passed);
            return Ok(None);
        }

        ui::error(&format!("WoW not found at: {}", root.display()));
        self.set_install_state(InstallState::NeedsInstall);
        ui::line("WoW is not installed.");

        if decider.decide(&Question::InstallClient)? == Decision::Abort {
            ui::line("Exiting...");
            self.record(step, StepStatus::Declined);
            return Ok(Some(SessionOutcome::Declined(step)));
        }

        match install::install(self.config, &root).await {
            Ok(()) => {
                self.set_install_state(InstallState::Installed);
                self.record(step, StepStatus::Passed);
                Ok(None)
            }
            Err(e) => {
                self.set_install_state(InstallState::InstallFailed);
                ui::error(&format!("Installation failed: {:#}", e));
                Ok(self.fail(step, format!("{:#}", e)))
            }
        }
    }

    async fn missing_files(
        &mut self,
        decider: &mut dyn Decider,
    ) -> anyhow::Result<Option<SessionOutcome>> {
        let step = Step::MissingFiles;
        if !self.config.check_missing_files {
            self.record(step, StepStatus::Skipped);
            return Ok(None);
        }

        let required = self.config.required_files();
        let ok =
            install::check_missing_files(self.config, &self.config.wow_path, &required, decider)
                .await?;
        if ok {
            self.record(step, StepStatus::Passed);
            return Ok(None);
        }

        ui::warning("Some files are missing. Game may not work correctly.");
        Ok(self.fail(step, "required files missing".to_string()))
    }

    async fn patch_update(&mut self) -> Option<SessionOutcome> {
        let step = Step::PatchUpdate;
        if !self.config.auto_update {
            self.record(step, StepStatus::Skipped);
            return None;
        }

        match patch::run_patch_update(self.config, &self.config.wow_path).await {
            Ok(PatchOutcome::UpToDate { .. }) | Ok(PatchOutcome::Updated { .. }) => {
                self.record(step, StepStatus::Passed);
                None
            }
            Ok(PatchOutcome::Unreachable { reason }) => self.fail(step, reason),
            Err(e) => {
                ui::warning(&format!(
                    "Patch update failed, but game can still run: {:#}",
                    e
                ));
                self.fail(step, format!("{:#}", e))
            }
        }
    }

    fn launch(&mut self, decider: &mut dyn Decider) -> anyhow::Result<SessionOutcome> {
        let step = Step::Launch;
        ui::line("");
        ui::line(&"=".repeat(60));

        if decider.decide(&Question::LaunchNow)? == Decision::Abort {
            ui::line("Exiting...");
            self.record(step, StepStatus::Declined);
            return Ok(SessionOutcome::Declined(step));
        }

        match launch_game(self.config) {
            Ok(pid) => {
                self.record(step, StepStatus::Passed);
                Ok(SessionOutcome::Launched { pid })
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                ui::error(&format!("Error launching WoW: {}", reason));
                self.record(step, StepStatus::Failed(reason.clone()));
                Ok(SessionOutcome::LaunchFailed(reason))
            }
        }
    }

    fn finish(self, outcome: SessionOutcome) -> SessionReport {
        info!("Session finished: {:?}", outcome);
        SessionReport {
            steps: self.steps,
            install_state: self.install_state,
            outcome,
        }
    }
}

/// Start the game executable as a detached process rooted at the install
/// directory. Returns the child's process id; the child is not waited on.
pub fn launch_game(config: &LauncherConfig) -> anyhow::Result<u32> {
    ui::header("Launching WoW");

    let exe = config.exe_path();
    if !exe.exists() {
        anyhow::bail!("WoW executable not found: {}", exe.display());
    }
    let exe = std::path::absolute(&exe)?;
    ui::action(&format!("Launching: {}", exe.display()));

    let mut cmd = Command::new(&exe);
    cmd.current_dir(&config.wow_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    configure_detached(&mut cmd);

    debug!("Command: {:?}", cmd);
    let child = cmd
        .spawn()
        .with_context(|| format!("Failed to start {}", exe.display()))?;

    ui::success("WoW launched!");
    Ok(child.id())
}

#[cfg(windows)]
fn configure_detached(cmd: &mut Command) {
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(windows))]
fn configure_detached(_cmd: &mut Command) {}
