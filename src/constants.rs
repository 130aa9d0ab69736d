//! Centralized constants for alphabets, limits, and file locations.

/// Lowercase alphabet.
pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Uppercase alphabet.
pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Digit alphabet.
pub const DIGITS: &[u8] = b"0123456789";

/// Fixed 29-character symbol set.
pub const SYMBOLS: &[u8] = b"!@#$%^&*()_+~`|}{[]:;?><,./-=";

/// Exact number of characters in a record key.
pub const KEY_LENGTH: usize = 4;

/// Target length of a strong preset password.
pub const STRONG_LENGTH: usize = 12;

/// Target length of a medium preset password.
pub const MEDIUM_LENGTH: usize = 8;

/// Target length of a weak preset password.
pub const WEAK_LENGTH: usize = 6;

/// Largest number of characters drawn for one class in custom mode.
pub const MAX_CLASS_COUNT: usize = 1024;

/// Separator between the key and the rest of a record line.
pub const RECORD_SEPARATOR: &str = " - ";

/// Store file name under the default directory.
pub const DEFAULT_STORE_FILE: &str = "passwords.txt";

/// Directory under `$HOME` holding the default store.
pub const DEFAULT_STORE_DIR: &str = "Desktop";

/// Config file location relative to `$HOME`.
pub const DEFAULT_CONFIG_PATH: &str = ".config/passgen/config.toml";

/// Permission mode for the store file and its audit log.
pub const STORE_FILE_MODE: u32 = 0o600;
