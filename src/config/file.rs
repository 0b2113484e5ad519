//
//  fryends-client
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O
//!
//! Small helpers shared by [`Config`](super::Config) and the file-backed
//! [`FileStore`](crate::auth::FileStore). Writes create missing parent
//! directories.

use std::path::Path;

use anyhow::Result;

/// Reads a whole file into a string.
///
/// # Errors
///
/// Fails if the file does not exist, cannot be opened, or is not UTF-8.
pub fn read_config_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Writes `content` to `path`, replacing any existing file.
///
/// Parent directories are created first.
///
/// ```rust,no_run
/// use std::path::Path;
/// use fryends_client::config::write_config_file;
///
/// write_config_file(Path::new("/tmp/fryends/config.toml"), "environment = \"staging\"\n")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Returns `true` if a file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}
