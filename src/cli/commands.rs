//! Command implementations

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::toml_config::Settings;
use crate::adapters::{ScriptedConsole, TerminalConsole};
use crate::app::container::AppContainer;
use crate::app::edit_interactor::EditRequest;
use crate::app::extract_interactor::ExtractRequest;
use crate::app::inspect_interactor::InspectRequest;
use crate::app::remux_interactor::RemuxRequest;
use crate::app::verify_interactor::VerifyRequest;
use crate::cli::args::{EditArgs, ExtractArgs, InspectArgs, RemuxArgs, VerifyArgs};
use crate::cli::Commands;
use crate::domain::model::OutputAction;
use crate::ports::Console;
use crate::reconciler::ReconcileOptions;

/// Dispatch a parsed command
pub async fn run(command: Commands, container: &dyn AppContainer, settings: &Settings) -> Result<()> {
    match command {
        Commands::Remux(args) => remux(args, container, settings).await,
        Commands::Edit(args) => edit(args, container).await,
        Commands::Extract(args) => extract(args, container).await,
        Commands::Verify(args) => verify(args, container, settings).await,
        Commands::Inspect(args) => inspect(args, container).await,
    }
}

/// Scripted answers when a file is given, the terminal otherwise
fn open_console(answers: Option<&std::path::Path>) -> Result<Box<dyn Console>> {
    match answers {
        Some(path) => {
            let console = ScriptedConsole::from_file(path).context("Failed to load answers file")?;
            info!("Answering prompts from {}", path.display());
            Ok(Box::new(console))
        }
        None => Ok(Box::new(TerminalConsole::new())),
    }
}

/// Execute the remux command
pub async fn remux(args: RemuxArgs, container: &dyn AppContainer, settings: &Settings) -> Result<()> {
    let mut console = open_console(args.answers.as_deref())?;
    let request = RemuxRequest {
        directory: args.directory,
        second_directory: args.second_directory,
        options: ReconcileOptions {
            force_language_prompt: args.force_language_prompt,
            additional_flags: args.prompt_additional_tags,
            allow_reordering: true,
        },
        subtitle_delay_ms: settings.remux.subtitle_delay_ms,
        refresh_library: args.refresh_library,
    };

    let report = container
        .remux_interactor()
        .execute(request, console.as_mut())
        .await
        .context("Remux failed")?;

    for outcome in &report.written {
        let verb = match outcome.action {
            OutputAction::Copy => "Copied",
            OutputAction::Remux => "Remuxed",
        };
        console.print(&format!("{} {}", verb, outcome.output.display()));
        if outcome.failed_edits > 0 {
            console.print(&format!(
                "  {} property edit(s) failed on {}",
                outcome.failed_edits,
                outcome.output.display()
            ));
        }
    }
    for skipped in &report.skipped {
        console.print(&format!("Skipped {}: {}", skipped.primary.display(), skipped.reason));
    }
    console.print(&format!(
        "Finished: {} written, {} skipped.",
        report.written.len(),
        report.skipped.len()
    ));
    Ok(())
}

/// Execute the edit command
pub async fn edit(args: EditArgs, container: &dyn AppContainer) -> Result<()> {
    let mut console = open_console(args.answers.as_deref())?;
    let request = EditRequest {
        directory: args.directory,
        force_language_prompt: args.force_language_prompt,
        additional_flags: args.prompt_additional_tags,
    };

    let report = container
        .edit_interactor()
        .execute(request, console.as_mut())
        .await
        .context("Edit failed")?;

    for path in &report.skipped {
        console.print(&format!("Skipped {}", path.display()));
    }
    console.print(&format!(
        "Edited {} file(s), {} skipped, {} failed edit(s).",
        report.edited.len(),
        report.skipped.len(),
        report.failed_edits
    ));
    Ok(())
}

/// Execute the extract command
pub async fn extract(args: ExtractArgs, container: &dyn AppContainer) -> Result<()> {
    let request = ExtractRequest {
        directory: args.directory,
        track_type: args.track_type.into(),
        language: args.language,
    };

    let report = container
        .extract_interactor()
        .execute(request)
        .await
        .context("Extraction failed")?;

    for path in &report.extracted {
        println!("Extracted {}", path.display());
    }
    println!(
        "Finished extracting: {} file(s) written, {} track(s) skipped.",
        report.extracted.len(),
        report.skipped_tracks
    );
    if !report.failed_files.is_empty() {
        anyhow::bail!("Extraction failed for {} file(s)", report.failed_files.len());
    }
    Ok(())
}

/// Execute the verify command
pub async fn verify(args: VerifyArgs, container: &dyn AppContainer, settings: &Settings) -> Result<()> {
    let request = VerifyRequest {
        directory: args.directory,
        timeout: Duration::from_secs(settings.validation.timeout_secs),
    };

    let report = container
        .verify_interactor()
        .execute(request)
        .await
        .context("Verification failed")?;

    let invalid: Vec<_> = report.invalid().collect();
    if invalid.is_empty() {
        println!("All {} file(s) appear to be valid.", report.reports.len());
        return Ok(());
    }

    println!("Invalid files:");
    for entry in &invalid {
        println!("  {}", entry.path.display());
        if !entry.details.is_empty() {
            println!("    {}", entry.details);
        }
    }
    warn!("{} of {} file(s) are invalid", invalid.len(), report.reports.len());
    anyhow::bail!("{} invalid file(s)", invalid.len())
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, container: &dyn AppContainer) -> Result<()> {
    let request = InspectRequest {
        input_path: args.file,
        format: args.format,
    };

    let response = container
        .inspect_interactor()
        .execute(request)
        .await
        .context("Failed to inspect input file")?;

    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}
