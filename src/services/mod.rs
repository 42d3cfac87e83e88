pub mod channel_loader;
pub mod pipeline;

pub use channel_loader::{list_channel_files, load_channels, ChannelFile};
pub use pipeline::{Pipeline, RunReport, UpscaledStatistics, STATISTICS_FILE};
