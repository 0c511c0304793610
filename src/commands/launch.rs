// Launch command: one interactive launcher session

use crate::config::{self, LauncherConfig};
use crate::install::InstallState;
use crate::orchestrator::{Orchestrator, SessionOutcome, SessionReport, Severity, Step, StepStatus};
use crate::prompt::{Decider, Decision, FixedDecider, TerminalDecider};
use crate::ui;
use log::debug;

pub async fn launch(yes: bool) -> anyhow::Result<bool> {
    let path = config::config_path();
    let (config, created) = LauncherConfig::load_or_init(&path)?;
    if created {
        ui::dim(&format!("Created default config at {}", path.display()));
    }

    let mut decider: Box<dyn Decider> = if yes {
        Box::new(FixedDecider(Decision::Proceed))
    } else {
        Box::new(TerminalDecider::default())
    };

    let report = Orchestrator::new(&config).run(decider.as_mut()).await?;

    match &report.outcome {
        SessionOutcome::Launched { pid } => debug!("Game started with pid {}", pid),
        SessionOutcome::LaunchFailed(reason) => debug!("Launch failed: {}", reason),
        SessionOutcome::Declined(step) => debug!("Declined at {:?}", step),
        SessionOutcome::Aborted(step) => {
            ui::error(&format!("Launcher stopped: {:?} failed", step));
        }
    }
    for hint in follow_up_hints(&report) {
        ui::dim(&hint);
    }

    Ok(report.is_success())
}

/// Suggestions printed after the session, based on how it went.
fn follow_up_hints(report: &SessionReport) -> Vec<String> {
    let mut hints = Vec::new();

    if report.install_state == InstallState::InstallFailed {
        hints.push(
            "The client was not installed. Check game_zip_url and run `pslauncher launch` again."
                .to_string(),
        );
    }

    if let Some(StepStatus::Failed(reason)) = report.status_of(Step::PatchUpdate) {
        hints.push(format!(
            "Patch not updated ({}). Run `pslauncher update` once the server is back.",
            reason
        ));
    }

    let warnings = report
        .steps
        .iter()
        .filter(|r| r.step.severity() == Severity::Advisory)
        .filter(|r| matches!(r.status, StepStatus::Failed(_)))
        .count();
    if warnings > 0 && report.is_success() {
        hints.push(format!("Finished with {} warning(s)", warnings));
    }

    hints
}
