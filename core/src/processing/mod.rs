pub mod cluster;
pub mod frame_history;
pub mod pipeline;
pub mod preprocess;
pub mod smoother;
pub mod zone;

pub use cluster::{cluster, cluster_count, cluster_with, ClusterEngine};
pub use frame_history::FrameHistory;
pub use pipeline::Pipeline;
pub use preprocess::{preprocess, ScanPreprocessor};
pub use smoother::FrameSmoother;
pub use zone::{in_danger_zone, intruding_clusters};
