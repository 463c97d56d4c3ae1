//! Layout constants shared by the windows

pub const ITEM_SPACING: f32 = 4.0;
pub const SECTION_SPACING: f32 = 10.0;

/// Width reserved for a Browse button next to a path entry
pub const BROWSE_BUTTON_WIDTH: f32 = 110.0;
pub const SPIN_ENTRY_WIDTH: f32 = 120.0;

/// Repaint interval while a worker thread is producing output
pub const WORKER_REPAINT_MS: u64 = 100;
