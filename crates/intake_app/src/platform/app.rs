use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{bail, Context};
use engine_logging::{engine_info, engine_warn};
use intake_core::{update, AppState, Msg, Phase};
use intake_engine::{FileDescriptor, FileSource, RawFile};

use super::config::{load_config, AppConfig};
use super::effects::EffectRunner;
use super::ui::render;

const USAGE: &str = "usage: intake_app <file.xlsx|file.xls|file.csv> [--config <intake.ron>]";

struct Args {
    file: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut file = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => bail!(USAGE),
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {arg:?}\n{USAGE}"),
        }
    }
    Ok(Args {
        file: file.context(USAGE)?,
        config,
    })
}

pub fn run_app() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    let (config, config_error) = match load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    engine_logging::initialize(config.log_destination, config.log_level);
    if let Some(err) = config_error {
        engine_warn!("Using default configuration: {}", err);
    }

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(
        msg_tx.clone(),
        config.engine.clone(),
        config.output_dir.clone(),
    );

    let mut state = AppState::with_settings(config.workflow.clone());
    let _ = msg_tx.send(Msg::FileSubmitted(raw_file_for(&args.file)));

    while let Ok(msg) = msg_rx.recv() {
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if state.consume_dirty() {
            for line in render::render(&state.view()) {
                println!("{line}");
            }
        }

        match state.phase() {
            Phase::Preview if config.auto_confirm => {
                let _ = msg_tx.send(Msg::ConfirmClicked);
            }
            Phase::Preview => {
                engine_info!("Preview ready; auto_confirm is off, stopping here");
                break;
            }
            Phase::Completed => break,
            Phase::Error => {
                let reason = state
                    .last_error()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "unknown error".to_string());
                bail!(reason);
            }
            Phase::Idle | Phase::Uploading | Phase::Processing => {}
        }
    }

    for entry in state.log().iter().rev() {
        engine_info!("{}", render::log_line(entry));
    }
    Ok(())
}

fn raw_file_for(path: &Path) -> RawFile {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    // Size is informational; a missing file surfaces as a read failure later.
    let size = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    RawFile {
        descriptor: FileDescriptor::new(name, None, size),
        source: FileSource::Path(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_args, raw_file_for};

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn file_and_config_are_parsed() {
        let parsed = parse_args(args(&["book.xlsx", "--config", "alt.ron"])).unwrap();
        assert_eq!(parsed.file, PathBuf::from("book.xlsx"));
        assert_eq!(parsed.config, Some(PathBuf::from("alt.ron")));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["a.csv", "b.csv"])).is_err());
        assert!(parse_args(args(&["a.csv", "--config"])).is_err());
    }

    #[test]
    fn raw_file_uses_base_name() {
        let file = raw_file_for(&PathBuf::from("/no/such/dir/data.csv"));
        assert_eq!(file.descriptor.name, "data.csv");
        assert_eq!(file.descriptor.size, 0);
        assert!(file.descriptor.media_type.is_none());
    }
}
