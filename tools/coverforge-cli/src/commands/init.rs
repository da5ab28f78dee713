//! Write a sample edit script.

use std::path::PathBuf;

use coverforge_project_model::event::{Field, FormAction};
use coverforge_project_model::script::{serialize_script, ScriptStep};

const HEADER: &str = "\
# Coverforge edit script: one JSON step per line.
# Pointer and wheel coordinates are in on-screen pixels of the declared size.
# Replay with: coverforge render --script <this file>
";

fn sample_steps() -> Vec<ScriptStep> {
    vec![
        ScriptStep::Resize {
            width: 1280.0,
            height: 720.0,
        },
        ScriptStep::Background {
            path: Some(PathBuf::from("background.png")),
        },
        ScriptStep::Action {
            action: FormAction::FitImage,
        },
        ScriptStep::Wheel {
            x: 640,
            y: 360,
            delta: -120.0,
        },
        ScriptStep::Field {
            field: Field::SuperText,
            value: "Release notes".to_string(),
        },
        ScriptStep::Field {
            field: Field::TitleText,
            value: "Hello, world".to_string(),
        },
        ScriptStep::Field {
            field: Field::ClearColor,
            value: "#112233".to_string(),
        },
        ScriptStep::Action {
            action: FormAction::Download,
        },
    ]
}

pub fn run(path: PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let script = format!("{HEADER}{}", serialize_script(&sample_steps())?);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, script)?;

    println!("Sample script written: {}", path.display());
    println!("  Place a background.png next to it, then run:");
    println!("  coverforge render --script {}", path.display());

    Ok(())
}
