//! Default executable locations inside a project checkout.

use std::path::{Path, PathBuf};

/// `selenium-server` npm package launcher, relative to the project root.
const SELENIUM_RELATIVE: &str = "node_modules/selenium-server/bin/selenium";

/// Composer-installed Codeception launcher, relative to the project root.
const CODECEPT_RELATIVE: &str = "vendor/bin/codecept";

/// Selenium launcher under `root`. Also the default match pattern.
pub fn selenium_executable(root: &Path) -> PathBuf {
    root.join(SELENIUM_RELATIVE)
}

/// Codeception launcher under `root`.
pub fn codecept_executable(root: &Path) -> PathBuf {
    root.join(CODECEPT_RELATIVE)
}
