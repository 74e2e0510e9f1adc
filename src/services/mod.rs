// Service exports
pub mod appwrite;
pub mod feed;
pub mod refresh;
pub mod snapshot_file;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use feed::{decode_documents, FeedError, MatchSink, SnapshotSource};
pub use refresh::{IntervalTrigger, ManualTrigger, RefreshHandle, RefreshTrigger};
pub use snapshot_file::SnapshotFile;
