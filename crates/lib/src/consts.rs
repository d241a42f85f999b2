//! Names and sentinels shared across cstore.

/// Application name, used for per-user directories.
pub const APP_NAME: &str = "cstore";

/// Default catalog file name.
pub const CATALOG_FILENAME: &str = "cstore.yml";

/// Ghost marker file name.
pub const GHOST_FILENAME: &str = ".cstore";

/// Pull-time record file name.
pub const PULLS_FILENAME: &str = "pulls.yml";

/// User configuration file name, inside the config directory.
pub const CONFIG_FILENAME: &str = "config.yml";

/// Catalog schema tag written by this version.
pub const CATALOG_VERSION: &str = "v4";

/// Catalog schema tags this version can read.
pub const SUPPORTED_VERSIONS: &[&str] = &["v1", "v2", "v3", "v4"];

/// Value reported for a token without a known value.
pub const NOT_FOUND: &str = "[NOT_FOUND]";

/// Marker stored in `entry.data` for a property kept in a secrets vault.
pub const SECRET: &str = "SECRET";

/// Suffix of the sibling file holding injected secrets.
pub const SECRETS_SUFFIX: &str = ".secrets";

/// Length of the hex entry key.
pub const ENTRY_KEY_LEN: usize = 32;

/// Deepest chain of linked catalogs a walk follows.
pub const MAX_REF_DEPTH: usize = 16;

/// Built-in default content store.
pub const DEFAULT_STORE: &str = "file";

/// Built-in default access vault.
pub const DEFAULT_ACCESS_VAULT: &str = "env";

/// Built-in default secrets vault.
pub const DEFAULT_SECRETS_VAULT: &str = "file";
