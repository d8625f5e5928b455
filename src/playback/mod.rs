mod store;

pub use store::PlaybackStateStore;
