use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EditError, Result};
use crate::histogram::Histogram;
use crate::ops::ChannelOrder;
use crate::session::{Session, SessionState};
use crate::view::Viewer;

/// Named arguments for an operation, e.g. `{"box": [0, 0, 5, 5]}`.
pub type Args = Map<String, Value>;

/// Every operation a session can be asked to perform, with its arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Load {
        path: PathBuf,
    },
    Save {
        path: PathBuf,
    },
    Display {
        title: Option<String>,
    },
    Invert,
    Crop {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    },
    Resize {
        width: u32,
        height: u32,
    },
    Rotate {
        degrees: f64,
    },
    Swap {
        order: ChannelOrder,
    },
    Histogram,
}

impl Operation {
    pub const NAMES: [&'static str; 9] = [
        "load",
        "save",
        "display",
        "invert",
        "crop",
        "resize",
        "rotate",
        "swap",
        "histogram",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::Save { .. } => "save",
            Self::Display { .. } => "display",
            Self::Invert => "invert",
            Self::Crop { .. } => "crop",
            Self::Resize { .. } => "resize",
            Self::Rotate { .. } => "rotate",
            Self::Swap { .. } => "swap",
            Self::Histogram => "histogram",
        }
    }

    /// Build an operation from its name and named arguments.
    ///
    /// Recognised keys: `filepath` (load), `output_path` (save), `title`
    /// (display), `box` (crop, `[left, top, right, bottom]`), `size`
    /// (resize, `[width, height]`), `angle` (rotate), `order` (swap,
    /// optional).
    pub fn from_args(name: &str, args: &Args) -> Result<Self> {
        let op = match name {
            "load" => Self::Load {
                path: path_arg("load", "filepath", args)?,
            },
            "save" => Self::Save {
                path: path_arg("save", "output_path", args)?,
            },
            "display" => Self::Display {
                title: match args.get("title") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                },
            },
            "invert" => Self::Invert,
            "crop" => {
                let [left, top, right, bottom] = int_array_arg::<4>("crop", "box", args)?;
                let coord = |v: i64| {
                    u32::try_from(v).map_err(|_| {
                        EditError::InvalidRegion(format!(
                            "({left}, {top}, {right}, {bottom}) has a coordinate outside 0..={}",
                            u32::MAX
                        ))
                    })
                };
                Self::Crop {
                    left: coord(left)?,
                    top: coord(top)?,
                    right: coord(right)?,
                    bottom: coord(bottom)?,
                }
            }
            "resize" => {
                let [w, h] = int_array_arg::<2>("resize", "size", args)?;
                let invalid = || EditError::InvalidDimensions {
                    width: w,
                    height: h,
                };
                Self::Resize {
                    width: u32::try_from(w).map_err(|_| invalid())?,
                    height: u32::try_from(h).map_err(|_| invalid())?,
                }
            }
            "rotate" => {
                let value = required("rotate", "angle", args)?;
                let degrees = value.as_f64().ok_or_else(|| EditError::InvalidArgument {
                    operation: "rotate",
                    name: "angle",
                    reason: format!("expected a number, got {value}"),
                })?;
                Self::Rotate { degrees }
            }
            "swap" => Self::Swap {
                order: match args.get("order") {
                    None | Some(Value::Null) => ChannelOrder::default(),
                    Some(value) => {
                        let indices = value
                            .as_array()
                            .and_then(|items| {
                                items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>()
                            })
                            .ok_or_else(|| EditError::InvalidArgument {
                                operation: "swap",
                                name: "order",
                                reason: format!("expected three channel indices, got {value}"),
                            })?;
                        ChannelOrder::from_indices(&indices)?
                    }
                },
            },
            "histogram" => Self::Histogram,
            other => return Err(EditError::UnknownOperation(other.to_string())),
        };
        Ok(op)
    }
}

/// Result of a successfully dispatched operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The session's image was loaded, saved or edited.
    Applied,
    /// The image was handed to the viewer.
    Displayed,
    Histogram(Histogram),
}

/// Routes operations to a [`Session`], sending anything visual to `V`.
pub struct Dispatcher<V> {
    viewer: V,
}

impl<V: Viewer> Dispatcher<V> {
    pub fn new(viewer: V) -> Self {
        Self { viewer }
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn into_viewer(self) -> V {
        self.viewer
    }

    /// Resolve `name` and `args`, then run the operation.
    ///
    /// An unknown name fails first. Any operation other than `load` then
    /// fails with [`EditError::NoImageLoaded`] on an empty session, before
    /// its arguments are looked at.
    pub fn run_named(
        &mut self,
        session: &mut Session,
        name: &str,
        args: &Args,
    ) -> Result<Outcome> {
        if !Operation::NAMES.contains(&name) {
            return Err(EditError::UnknownOperation(name.to_string()));
        }
        if name != "load" && session.state() == SessionState::Empty {
            return Err(EditError::NoImageLoaded);
        }
        let op = Operation::from_args(name, args)?;
        self.run(session, op)
    }

    pub fn run(&mut self, session: &mut Session, op: Operation) -> Result<Outcome> {
        debug!(operation = op.name(), "dispatching");
        match op {
            Operation::Load { path } => session.load(path).map(|()| Outcome::Applied),
            Operation::Save { path } => session.save(path).map(|()| Outcome::Applied),
            Operation::Display { title } => {
                let view = session.display_view()?;
                self.viewer
                    .show_image(&view, title.as_deref())
                    .map_err(|err| EditError::Render { source: err.into() })?;
                Ok(Outcome::Displayed)
            }
            Operation::Invert => session.invert_colors().map(|()| Outcome::Applied),
            Operation::Crop {
                left,
                top,
                right,
                bottom,
            } => session
                .crop(left, top, right, bottom)
                .map(|()| Outcome::Applied),
            Operation::Resize { width, height } => {
                session.resize(width, height).map(|()| Outcome::Applied)
            }
            Operation::Rotate { degrees } => session.rotate(degrees).map(|()| Outcome::Applied),
            Operation::Swap { order } => session.swap_channels(order).map(|()| Outcome::Applied),
            Operation::Histogram => {
                let histogram = session.histogram()?;
                self.viewer
                    .show_histogram(&histogram)
                    .map_err(|err| EditError::Render { source: err.into() })?;
                Ok(Outcome::Histogram(histogram))
            }
        }
    }
}

fn required<'a>(
    operation: &'static str,
    name: &'static str,
    args: &'a Args,
) -> Result<&'a Value> {
    match args.get(name) {
        None | Some(Value::Null) => Err(EditError::InvalidArgument {
            operation,
            name,
            reason: "missing".into(),
        }),
        Some(value) => Ok(value),
    }
}

fn path_arg(operation: &'static str, name: &'static str, args: &Args) -> Result<PathBuf> {
    match required(operation, name, args)? {
        Value::String(s) if !s.is_empty() => Ok(PathBuf::from(s)),
        other => Err(EditError::InvalidArgument {
            operation,
            name,
            reason: format!("expected a non-empty path, got {other}"),
        }),
    }
}

fn int_array_arg<const N: usize>(
    operation: &'static str,
    name: &'static str,
    args: &Args,
) -> Result<[i64; N]> {
    let value = required(operation, name, args)?;
    value
        .as_array()
        .and_then(|items| items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>())
        .and_then(|ints| <[i64; N]>::try_from(ints).ok())
        .ok_or_else(|| EditError::InvalidArgument {
            operation,
            name,
            reason: format!("expected {} integers, got {value}", N),
        })
}
