// Button count range (inclusive)
pub const MIN_BUTTONS: u8 = 3;
pub const MAX_BUTTONS: u8 = 7;
pub const DEFAULT_BUTTON_COUNT: u8 = 4;

// Round timing
pub const DISPLAY_MS_PER_BUTTON: u64 = 1000;
pub const SCRAMBLE_INTERVAL_MS: u64 = 2000;

// Button footprint in terminal cells, used until the view has measured one
pub const DEFAULT_BUTTON_WIDTH: u16 = 10;
pub const DEFAULT_BUTTON_HEIGHT: u16 = 3;
// Configured footprints are clamped to this range; 3x3 is the smallest
// bordered box with room for a label
pub const MIN_BUTTON_WIDTH: u16 = 3;
pub const MIN_BUTTON_HEIGHT: u16 = 3;
pub const MAX_BUTTON_WIDTH: u16 = 16;
pub const MAX_BUTTON_HEIGHT: u16 = 5;

// Gap between buttons in the initial left-to-right layout
pub const BUTTON_GAP: u16 = 2;

// Container size assumed before the first frame is drawn
pub const FALLBACK_CONTAINER_WIDTH: u16 = 60;
pub const FALLBACK_CONTAINER_HEIGHT: u16 = 16;

// Notes
pub const NOTES_KEY: &str = "notes";
pub const NOTES_SYNC_INTERVAL_MS: u64 = 2000;
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";

// Files under ~/.recall/
pub const SETTINGS_FILE: &str = "settings.json";
pub const LOG_FILE: &str = "recall.log";

// Main loop
pub const FRAME_POLL_MS: u64 = 50;
/// Elapsed time is clamped per frame so a suspended terminal doesn't fast-forward a round.
pub const MAX_FRAME_DT_MS: u64 = 500;
