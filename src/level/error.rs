// src/level/error.rs

/// Everything that can stop a level from being generated.
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    #[error("Level grid must be at least 2x2 cells (got {width}x{depth})")]
    DimensionTooSmall { width: u32, depth: u32 },
    #[error("{room_count} rooms do not fit a grid {width} cells wide (max {max})")]
    TooManyRooms { room_count: u32, width: u32, max: u32 },
    #[error("Level grid {width}x{depth} has more vertices than u32 indices can address")]
    GridTooLarge { width: u32, depth: u32 },
    #[error("I/O while reading level config: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
}
