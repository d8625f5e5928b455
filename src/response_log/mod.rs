mod log;
mod row;

pub use log::{ResponseLog, READ_TAIL_MAX_LIMIT};
pub use row::{ResponseRow, MOOD_PREFIX};
