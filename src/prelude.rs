#![allow(unused_imports)]

pub use anyhow::{Context, Error, anyhow, bail, ensure};
pub use tracing::{Level, debug, info, instrument, warn};

pub type Result<T = (), E = Error> = anyhow::Result<T, E>;
