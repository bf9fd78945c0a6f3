use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use tracing::{info, warn};

use retouch_core::{Args, Dispatcher, Outcome, Session, SessionConfig, Viewer};

use crate::paths::{expand_path, list_images, resolve_image_path};

const HELP: &str = "\
commands:
  load <path>              open an image (jpg, png, bmp, gif, tiff)
  save <path>              write the image; format follows the extension
  display [title]          render the current image
  invert                   invert colors
  crop <l> <t> <r> <b>     keep the box [l, r) x [t, b)
  resize <w> <h>           resample to exactly w x h
  rotate <degrees>         rotate counter-clockwise, growing the canvas
  swap [a b c]             reorder RGB channels (default: 2 1 0)
  histogram                per-channel value histogram
  info                     show the loaded image
  ls                       list images in the working directory
  new                      start over with an empty session
  help                     this text
  quit                     leave";

#[derive(Debug, PartialEq)]
pub enum Command {
    /// An operation for the dispatcher, by name with named arguments.
    Op { name: String, args: Args },
    Info,
    List,
    New,
    Help,
    Quit,
}

/// Parse one line of user input. Blank lines yield `None`.
///
/// Positional values are checked and converted here; anything that is not
/// a shell word is passed through as an operation name so the dispatcher
/// can reject it.
pub fn parse_line(line: &str, cwd: &Path) -> Result<Option<Command>> {
    let line = line.trim();
    let Some(word) = line.split_whitespace().next() else {
        return Ok(None);
    };
    let rest = line[word.len()..].trim();
    let numbers: Vec<&str> = rest.split_whitespace().collect();

    let (name, args) = match word.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(Some(Command::Quit)),
        "help" | "?" => return Ok(Some(Command::Help)),
        "info" => return Ok(Some(Command::Info)),
        "ls" => return Ok(Some(Command::List)),
        "new" => return Ok(Some(Command::New)),
        "load" => {
            let path = resolve_image_path(rest, cwd)?;
            ("load", json!({ "filepath": path.to_string_lossy() }))
        }
        "save" => {
            if rest.is_empty() {
                bail!("usage: save <path>");
            }
            let path = expand_path(rest, cwd)?;
            ("save", json!({ "output_path": path.to_string_lossy() }))
        }
        "display" => {
            let title = (!rest.is_empty()).then_some(rest);
            ("display", json!({ "title": title }))
        }
        "crop" => {
            let coords = integers::<4>(&numbers, "crop <l> <t> <r> <b>")?;
            ("crop", json!({ "box": coords }))
        }
        "resize" => {
            let size = integers::<2>(&numbers, "resize <w> <h>")?;
            ("resize", json!({ "size": size }))
        }
        "rotate" => {
            let [angle] = numbers[..] else {
                bail!("usage: rotate <degrees>");
            };
            let angle: f64 = angle
                .parse()
                .with_context(|| format!("not a number: {angle}"))?;
            ("rotate", json!({ "angle": angle }))
        }
        "swap" => {
            // Accept both `swap 2 1 0` and `swap 2,1,0`.
            let tokens: Vec<&str> = numbers
                .iter()
                .flat_map(|s| s.split(','))
                .filter(|s| !s.is_empty())
                .collect();
            let order = if tokens.is_empty() {
                Value::Null
            } else {
                json!(integers::<3>(&tokens, "swap [a b c]")?)
            };
            ("swap", json!({ "order": order }))
        }
        "histogram" => ("histogram", json!({})),
        "invert" => ("invert", json!({})),
        _ => {
            return Ok(Some(Command::Op {
                name: word.to_string(),
                args: Args::new(),
            }));
        }
    };

    let Value::Object(args) = args else {
        bail!("arguments for {name} are not an object");
    };
    Ok(Some(Command::Op {
        name: name.to_string(),
        args,
    }))
}

fn integers<const N: usize>(tokens: &[&str], usage: &str) -> Result<[i64; N]> {
    if tokens.len() != N {
        bail!("usage: {usage}");
    }
    let mut out = [0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token
            .parse()
            .with_context(|| format!("not an integer: {token}"))?;
    }
    Ok(out)
}

/// Read commands line by line and run them against one session.
pub struct Shell<V> {
    session: Session,
    dispatcher: Dispatcher<V>,
    cwd: PathBuf,
}

impl<V: Viewer> Shell<V> {
    pub fn new(config: SessionConfig, viewer: V, cwd: PathBuf) -> Self {
        Self {
            session: Session::with_config(config),
            dispatcher: Dispatcher::new(viewer),
            cwd,
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        writeln!(out, "retouch: type `help` for commands")?;
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line.context("read command")?;
            match parse_line(&line, &self.cwd) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command, &mut out)?,
                Err(err) => {
                    warn!(%err, "invalid input");
                    writeln!(out, "error: {err:#}")?;
                }
            }
            write!(out, "> ")?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Op { name, args } => {
                match self.dispatcher.run_named(&mut self.session, &name, &args) {
                    Ok(outcome) => self.report(&name, outcome, out)?,
                    Err(err) => {
                        warn!(operation = %name, %err, "operation failed");
                        writeln!(out, "error: {err}")?;
                    }
                }
            }
            Command::Info => self.describe(out)?,
            Command::List => match list_images(&self.cwd) {
                Ok(images) if images.is_empty() => {
                    writeln!(out, "no image files in {}", self.cwd.display())?;
                }
                Ok(images) => {
                    for path in images {
                        let name = path.file_name().unwrap_or_default().to_string_lossy();
                        writeln!(out, "  {name}")?;
                    }
                }
                Err(err) => {
                    warn!(%err, "listing failed");
                    writeln!(out, "error: {err:#}")?;
                }
            },
            Command::New => {
                self.session = Session::with_config(self.session.config().clone());
                info!("started new session");
                writeln!(out, "session cleared")?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn report<W: Write>(&self, name: &str, outcome: Outcome, out: &mut W) -> Result<()> {
        match outcome {
            Outcome::Applied if name == "load" => self.describe(out)?,
            Outcome::Applied if name == "save" => writeln!(out, "saved")?,
            Outcome::Applied => {
                if let Some(image) = self.session.image() {
                    let (w, h) = image.dimensions();
                    writeln!(out, "{name}: ok ({w}x{h})")?;
                }
            }
            Outcome::Displayed => writeln!(out, "displayed")?,
            Outcome::Histogram(hist) => writeln!(
                out,
                "histogram: {} channel(s), {} pixels, peak bucket {}",
                hist.channel_count(),
                hist.total(),
                hist.max_count()
            )?,
        }
        Ok(())
    }

    fn describe<W: Write>(&self, out: &mut W) -> Result<()> {
        match (self.session.image(), self.session.source_name()) {
            (Some(image), name) => {
                let (w, h) = image.dimensions();
                writeln!(
                    out,
                    "{}: {w}x{h}, {:?}",
                    name.unwrap_or("image"),
                    image.layout()
                )?;
            }
            (None, _) => writeln!(out, "no image loaded")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use retouch_core::{Histogram, Raster, SessionState};

    #[derive(Default)]
    struct CountingViewer {
        shown: usize,
    }

    impl Viewer for CountingViewer {
        fn show_image(&mut self, _image: &Raster, _title: Option<&str>) -> Result<()> {
            self.shown += 1;
            Ok(())
        }

        fn show_histogram(&mut self, _histogram: &Histogram) -> Result<()> {
            self.shown += 1;
            Ok(())
        }
    }

    fn op(line: &str, cwd: &Path) -> (String, Value) {
        match parse_line(line, cwd).unwrap() {
            Some(Command::Op { name, args }) => (name, Value::Object(args)),
            other => panic!("expected an operation, got {other:?}"),
        }
    }

    #[test]
    fn parses_numeric_commands() {
        let cwd = Path::new("/work");
        assert_eq!(
            op("crop 0 0 5 5", cwd),
            ("crop".into(), json!({"box": [0, 0, 5, 5]}))
        );
        assert_eq!(
            op("resize 640 480", cwd),
            ("resize".into(), json!({"size": [640, 480]}))
        );
        assert_eq!(
            op("rotate -12.5", cwd),
            ("rotate".into(), json!({"angle": -12.5}))
        );
        assert_eq!(op("swap", cwd), ("swap".into(), json!({"order": null})));
        assert_eq!(
            op("swap 2,1,0", cwd),
            ("swap".into(), json!({"order": [2, 1, 0]}))
        );
        assert_eq!(
            op("swap 0 2 1", cwd),
            ("swap".into(), json!({"order": [0, 2, 1]}))
        );
    }

    #[test]
    fn parses_paths_and_titles() {
        let cwd = Path::new("/work");
        assert_eq!(
            op("save out/edited.png", cwd),
            ("save".into(), json!({"output_path": "/work/out/edited.png"}))
        );
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            op("save ~/edited.png", cwd),
            (
                "save".into(),
                json!({"output_path": home.join("edited.png").to_string_lossy()})
            )
        );
        assert_eq!(
            op("display My Photo", cwd),
            ("display".into(), json!({"title": "My Photo"}))
        );
        assert_eq!(op("display", cwd), ("display".into(), json!({"title": null})));
    }

    #[test]
    fn shell_words() {
        let cwd = Path::new("/work");
        assert_eq!(parse_line("   ", cwd).unwrap(), None);
        assert_eq!(parse_line("quit", cwd).unwrap(), Some(Command::Quit));
        assert_eq!(parse_line("EXIT", cwd).unwrap(), Some(Command::Quit));
        assert_eq!(parse_line("help", cwd).unwrap(), Some(Command::Help));
        assert_eq!(parse_line("ls", cwd).unwrap(), Some(Command::List));
    }

    #[test]
    fn unknown_words_reach_the_dispatcher() {
        let cwd = Path::new("/work");
        assert_eq!(op("flip", cwd), ("flip".into(), json!({})));
    }

    #[test]
    fn rejects_bad_numbers() {
        let cwd = Path::new("/work");
        assert!(parse_line("crop 0 0 5", cwd).is_err());
        assert!(parse_line("crop 0 0 five 5", cwd).is_err());
        assert!(parse_line("resize 10", cwd).is_err());
        assert!(parse_line("rotate", cwd).is_err());
        assert!(parse_line("rotate left", cwd).is_err());
        assert!(parse_line("swap 0 1", cwd).is_err());
        assert!(parse_line("save", cwd).is_err());
    }

    #[test]
    fn session_survives_errors() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(20, 20, Rgb([255, 0, 0]))
            .save(dir.path().join("red.png"))
            .unwrap();

        let script = "\
invert
flip
load red.png
crop 0 0 50 50
crop 0 0 5 5
display
histogram
save out/small.png
quit
rotate 90
";
        let mut shell = Shell::new(
            SessionConfig::default(),
            CountingViewer::default(),
            dir.path().to_path_buf(),
        );
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("error: no image loaded"));
        assert!(out.contains("error: unknown operation: flip"));
        assert!(out.contains("red.png: 20x20, Rgb"));
        assert!(out.contains("error: invalid crop region"));
        assert!(out.contains("crop: ok (5x5)"));
        assert!(out.contains("histogram: 3 channel(s), 25 pixels, peak bucket 25"));

        assert_eq!(shell.session.state(), SessionState::Loaded);
        assert_eq!(shell.session.image().unwrap().dimensions(), (5, 5));
        assert!(dir.path().join("out").join("small.png").exists());
        assert_eq!(shell.dispatcher.viewer().shown, 2);
    }

    #[test]
    fn new_clears_the_session() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]))
            .save(dir.path().join("a.png"))
            .unwrap();
        let mut shell = Shell::new(
            SessionConfig::default(),
            CountingViewer::default(),
            dir.path().to_path_buf(),
        );
        let mut out = Vec::new();
        shell
            .run("load a.png\nnew\ninfo\n".as_bytes(), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("session cleared"));
        assert!(out.contains("no image loaded"));
        assert_eq!(shell.session.state(), SessionState::Empty);
    }
}
