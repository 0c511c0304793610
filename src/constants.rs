// Constants module for shared paths, names and limits

pub const CONFIG_FILE: &str = "launcher_config.json";

/// Environment variable naming the directory that holds the config file.
pub const CONFIG_DIR_ENV: &str = "PSL_DIR";

/// Patch archive destination, relative to the installation root.
pub const PATCH_DEST: &str = "Data/patch-Z.MPQ";

/// Local patch version marker, relative to the installation root.
pub const VERSION_MARKER: &str = "Interface/AddOns/ProgressiveSystems/patch_version.txt";

/// Version assumed when no marker file exists yet.
pub const DEFAULT_LOCAL_VERSION: &str = "0";

/// Internal MPQ directory that client database files are packed under.
pub const DBC_ARCHIVE_PREFIX: &str = "DBFilesClient\\";
pub const DBC_EXTENSION: &str = "dbc";

/// Client files that must exist for the game to start cleanly.
/// The executable itself is checked separately from the config.
pub const REQUIRED_DATA_FILES: &[&str] = &[
    "Data/enUS/patch-enUS.MPQ",
    "Data/enUS/patch-enUS-2.MPQ",
    "Data/enUS/patch-enUS-3.MPQ",
    "Data/patch.MPQ",
    "Data/patch-2.MPQ",
    "Data/patch-3.MPQ",
];

pub const VERSION_CHECK_TIMEOUT_SECS: u64 = 5;
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Extraction progress is reported once per this many entries.
pub const EXTRACT_PROGRESS_INTERVAL: usize = 100;
