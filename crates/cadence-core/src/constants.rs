/// Application name shared across crates
pub const APP_NAME: &str = "cadence";

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "CADENCE";
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Optional configuration file read from the working directory
pub const CONFIG_FILE: &str = const_str::concat!(APP_NAME, ".toml");

/// Last calendar year the expansion loop will enter.
pub const MAX_YEAR: i32 = 9999;

/// Upper bound on materialized occurrences when no other limit applies.
pub const DEFAULT_MAX_INSTANCES: usize = 10_000;
