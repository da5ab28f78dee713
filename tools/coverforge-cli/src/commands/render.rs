//! Replay an edit script against a session and export the result.

use std::path::{Path, PathBuf};

use anyhow::Context;
use coverforge_common::config::AppConfig;
use coverforge_project_model::event::{Field, FormAction, InputEvent};
use coverforge_project_model::script::{parse_script, ScriptStep};
use coverforge_render_engine::assets::LoadedAssets;
use coverforge_render_engine::{DirectorySink, Session};

pub struct RenderArgs {
    pub script: Option<PathBuf>,
    pub background: Option<PathBuf>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub color: Option<String>,
    pub fit: bool,
    pub output: Option<PathBuf>,
}

pub async fn run(config: AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());

    let mut session = Session::from_config(&config, Box::new(DirectorySink::new(&output_dir)))?;
    let geometry = session.compositor().geometry();
    session.install_assets(LoadedAssets::load(&config.assets, geometry).await);

    if let Some(background) = &args.background {
        session.load_background(Some(background.as_path())).await?;
    }
    for (field, value) in [
        (Field::TitleText, args.title),
        (Field::SuperText, args.subtitle),
        (Field::ClearColor, args.color),
    ] {
        if let Some(value) = value {
            session.handle(InputEvent::field(field, value))?;
        }
    }
    if args.fit {
        session.handle(InputEvent::Action(FormAction::FitImage))?;
    }

    let mut downloaded = false;
    if let Some(script_path) = &args.script {
        let content = tokio::fs::read_to_string(script_path)
            .await
            .with_context(|| format!("Failed to read script {}", script_path.display()))?;
        let steps = parse_script(&content)?;
        let base_dir = script_path.parent().unwrap_or_else(|| Path::new("."));
        println!("Replaying {} steps from {}", steps.len(), script_path.display());

        for step in &steps {
            downloaded |= replay_step(&mut session, step, base_dir).await?;
        }
    }

    if finish(&mut session, downloaded)? == Finish::ReExported {
        println!("  Note: the script changed the cover after its download, exported again");
    }

    println!(
        "Cover written: {}",
        output_dir.join(&config.export.file_name).display()
    );
    println!("  Frames painted: {}", session.frames_painted());
    println!(
        "  Image scale: {:.3}, offset: ({:.1}, {:.1})",
        session.params().image_scale,
        session.params().image_offset.x,
        session.params().image_offset.y
    );

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Finish {
    /// Nothing downloaded during replay, so the final state was exported.
    Exported,
    /// Edits followed the last download and the cover was exported again.
    ReExported,
    /// The last download already holds the final state.
    Unchanged,
}

/// Make sure the written file matches the session's final state.
fn finish(session: &mut Session, downloaded: bool) -> anyhow::Result<Finish> {
    let outcome = if !downloaded {
        Finish::Exported
    } else if session.store().render_requested() {
        Finish::ReExported
    } else {
        Finish::Unchanged
    };
    if outcome == Finish::Unchanged {
        session.frame();
    } else {
        session.export()?;
    }
    Ok(outcome)
}

/// Apply one step. Returns whether the step exported.
async fn replay_step(session: &mut Session, step: &ScriptStep, base_dir: &Path) -> anyhow::Result<bool> {
    tracing::debug!(?step, "Replaying step");
    match step {
        ScriptStep::Background { path } => {
            let resolved = path.as_ref().map(|p| resolve(base_dir, p));
            session.load_background(resolved.as_deref()).await?;
        }
        other => {
            if let Some(event) = other.to_event() {
                session.handle(event)?;
            }
        }
    }
    Ok(step.is_download())
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
