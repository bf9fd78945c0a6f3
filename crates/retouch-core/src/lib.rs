//! Single-image editing session.
//!
//! A [`Session`] holds at most one [`Raster`] and edits it in place through
//! a fixed set of operations. [`Dispatcher`] resolves operations by name,
//! passing anything visual to a [`Viewer`].

pub mod config;
pub mod dispatch;
pub mod error;
pub mod histogram;
pub mod io;
pub mod ops;
pub mod raster;
pub mod session;
pub mod view;

pub use config::{Resample, SessionConfig};
pub use dispatch::{Args, Dispatcher, Operation, Outcome};
pub use error::{EditError, Result};
pub use histogram::Histogram;
pub use ops::ChannelOrder;
pub use raster::{PixelLayout, Raster};
pub use session::{Session, SessionState};
pub use view::{Viewer, display_view};
