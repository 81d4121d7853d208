//! Client-side embed lifecycle.
//!
//! Each tab moves through `Uninitialized -> Pending -> Instantiated`, or to
//! `Failed` and back to `Pending` on the next selection. A tab is fetched and
//! connected at most once per page lifetime; later selections only toggle
//! visibility, so hidden tabs keep their embedded state.

mod controller;
mod ports;
mod state;


pub use controller::{EMBED_CLASS_NAME, EmbedHostController, EmbedSourceMode, EmbedTab};
pub use ports::{EmbedBuildRequest, EmbedSdk, EmbedSource, EmbedSurface, SignedUrlSource};
pub use state::{TabPhase, TabSelection};
