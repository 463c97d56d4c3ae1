//! Application-wide constants

pub mod config {
    pub const APP_DIR: &str = "utility-hub";
    pub const FILENAME: &str = "utility-hub.toml";
    pub const PLUGIN_DIR: &str = "plugins";

    pub const ENV_LOG_LEVEL: &str = "UTILITY_HUB_LOG";
    pub const ENV_PLUGIN_DIRS: &str = "UTILITY_HUB_PLUGIN_DIRS";

    pub const DEFAULT_LOG_LEVEL: &str = "info";
    pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
}

pub mod hub {
    /// File name prefix shared by all utility modules
    pub const MODULE_PREFIX: &str = "util";
    pub const MANIFEST_EXTENSION: &str = ".toml";
    pub const NO_DESCRIPTION: &str = "No description available";

    pub const INT_RANGE: (i64, i64) = (-1000, 1000);
    pub const FLOAT_RANGE: (f64, f64) = (-1000.0, 1000.0);
    pub const FLOAT_STEP: f64 = 0.1;
}

pub mod window {
    pub const HUB_TITLE: &str = "Utility Hub";
    pub const HUB_SIZE: [f32; 2] = [800.0, 600.0];

    pub const COPIER_TITLE: &str = "Empty File Copier";
    pub const COPIER_SIZE: [f32; 2] = [800.0, 200.0];

    pub const LISTER_TITLE: &str = "Datei-Namen Exporter";
    pub const LISTER_SIZE: [f32; 2] = [600.0, 400.0];
    pub const LISTER_MIN_SIZE: [f32; 2] = [500.0, 300.0];
}
