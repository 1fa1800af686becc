//! Block-shot runner (default binary).
//!
//! Loads a level, fires a list of shots through a [`Session`] and shows each
//! frame in the terminal. With `--headless` nothing is drawn; one JSON line
//! per shot is printed instead.
//!
//! ```text
//! blockshot [LEVEL.json] [--shots color:count,...] [--headless]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::info;

use blockshot::core::{GridSnapshot, LevelPattern};
use blockshot::runtime::{FrameSink, Session, SessionConfig, ShotReport};
use blockshot::term::{FrameBuffer, GridView, HudState, TerminalRenderer, Viewport};
use blockshot::types::BlockColor;

const DEFAULT_SHOTS: &str = "red:3,blue:3,green:3,yellow:3,red:3,blue:3,green:3,yellow:3";
const SHOT_PAUSE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    level: Option<PathBuf>,
    shots: Vec<(BlockColor, u32)>,
    headless: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut level = None;
    let mut shots = None;
    let mut headless = false;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--shots" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --shots"))?;
                shots = Some(parse_shots(v)?);
            }
            "--headless" => headless = true,
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown argument: {}", other));
            }
            path => {
                if level.is_some() {
                    return Err(anyhow!("more than one level given: {}", path));
                }
                level = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(Args {
        level,
        shots: match shots {
            Some(shots) => shots,
            None => parse_shots(DEFAULT_SHOTS)?,
        },
        headless,
    })
}

/// `red:3,blue:2` -> `[(Red, 3), (Blue, 2)]`
fn parse_shots(s: &str) -> Result<Vec<(BlockColor, u32)>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (color, count) = part
                .split_once(':')
                .ok_or_else(|| anyhow!("shot must be color:count: {}", part))?;
            let color = BlockColor::from_str(color.trim())
                .ok_or_else(|| anyhow!("unknown color: {}", color))?;
            let count = count
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("invalid bullet count: {}", count))?;
            Ok((color, count))
        })
        .collect()
}

fn demo_level() -> LevelPattern {
    LevelPattern::from_rows(&[
        &[(1, 0), (3, 0), (1, 2), (4, 0), (3, 0), (1, 0)],
        &[(3, 0), (1, 0), (4, 0), (1, 0), (2, 0), (4, 0)],
        &[(2, 0), (4, 0), (3, 1), (2, 0), (1, 0), (3, 0)],
        &[(4, 0), (2, 0), (1, 0), (3, 0), (4, 0), (2, 0)],
    ])
}

fn hud_state(session: &Session) -> HudState {
    HudState {
        bullets_left: session.resolver().bullets_left(),
        target: session.resolver().target_color(),
        progress: session.progress(),
        level_complete: session.level_complete(),
    }
}

struct TermSink {
    renderer: TerminalRenderer,
    view: GridView,
    fb: FrameBuffer,
    snap: GridSnapshot,
}

impl FrameSink for TermSink {
    fn frame(&mut self, session: &Session) -> Result<()> {
        session.grid().snapshot_into(&mut self.snap);
        let (w, h) = self.renderer.size_or((80, 24));
        self.view
            .render_into(&self.snap, &hud_state(session), Viewport::new(w, h), &mut self.fb);
        self.renderer.draw(&self.fb)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv)?;

    let mut config = SessionConfig::from_env();
    if let Some(path) = args.level.clone() {
        config.level_path = Some(path);
    }
    let mut session = Session::from_config(config, Some(demo_level()))?;

    if args.headless {
        return run_headless(&mut session, &args.shots).await;
    }

    let mut sink = TermSink {
        renderer: TerminalRenderer::new(),
        view: GridView::default(),
        fb: FrameBuffer::new(0, 0),
        snap: session.grid().snapshot(),
    };
    sink.renderer.enter()?;
    let result = run_terminal(&mut session, &args.shots, &mut sink).await;

    // Always try to restore terminal state.
    let _ = sink.renderer.exit();
    let report = result?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

async fn run_headless(session: &mut Session, shots: &[(BlockColor, u32)]) -> Result<()> {
    for &(color, bullets) in shots {
        let report = session.shoot(bullets, color, None).await?;
        let line = serde_json::json!({
            "shot": report,
            "grid": session.grid().snapshot(),
        });
        println!("{}", serde_json::to_string(&line)?);
        if report.level_complete {
            break;
        }
    }
    Ok(())
}

async fn run_terminal(
    session: &mut Session,
    shots: &[(BlockColor, u32)],
    sink: &mut TermSink,
) -> Result<Option<ShotReport>> {
    sink.frame(session)?;
    let mut last = None;
    for &(color, bullets) in shots {
        let frames: &mut dyn FrameSink = &mut *sink;
        let report = session.shoot(bullets, color, Some(frames)).await?;
        sink.frame(session)?;
        info!(
            "{} x{}: removed {}, {} left",
            report.color, report.bullets, report.removed, report.remaining
        );
        last = Some(report);
        tokio::time::sleep(SHOT_PAUSE).await;
        if report.level_complete {
            break;
        }
    }
    tokio::time::sleep(SHOT_PAUSE * 3).await;
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_level_shots_and_headless() {
        let parsed = parse_args(&args(&["lvl.json", "--shots", "red:2, light-blue:1", "--headless"]))
            .unwrap();
        assert_eq!(parsed.level, Some(PathBuf::from("lvl.json")));
        assert_eq!(
            parsed.shots,
            vec![(BlockColor::Red, 2), (BlockColor::LightBlue, 1)]
        );
        assert!(parsed.headless);
    }

    #[test]
    fn defaults_to_demo_shots() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed.level, None);
        assert!(!parsed.headless);
        assert_eq!(parsed.shots.len(), 8);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["--shots"])).is_err());
        assert!(parse_args(&args(&["--fast"])).is_err());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_err());
        assert!(parse_shots("red").is_err());
        assert!(parse_shots("magenta:1").is_err());
        assert!(parse_shots("red:many").is_err());
    }

    #[test]
    fn demo_level_is_valid() {
        use blockshot::core::LevelSource;
        let level = demo_level();
        assert!(level.validate().is_ok());
        assert_eq!((level.width(), level.height()), (6, 4));
    }
}
