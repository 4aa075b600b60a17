//! Platform implementations that need no network.

mod recording;

pub use recording::{PlatformCall, RecordingPlatform};
