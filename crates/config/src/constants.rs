//! Fixed names shared between the config loader and the CLI

pub const CONFIG_DIR_NAME: &str = "exbuild";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_OUTPUT_PREFIX: &str = "out";

pub const ENV_OUTPUT_PREFIX: &str = "EXBUILD_OUTPUT_PREFIX";
pub const ENV_REPOSITORY_ROOT: &str = "EXBUILD_REPOSITORY_ROOT";
pub const ENV_DRY_RUN: &str = "EXBUILD_DRY_RUN";
