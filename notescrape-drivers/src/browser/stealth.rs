use std::path::{Path, PathBuf};

/// Everything needed to start a Chrome session through WebDriver.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub webdriver_url: String,
    /// Chrome `--user-data-dir`; relative paths are resolved against the
    /// current directory before launch.
    pub profile_dir: PathBuf,
    pub headless: bool,
    pub extra_args: Vec<String>,
}

/// Resolve `dir` to an absolute path without requiring it to exist.
pub fn absolute_profile_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir.to_path_buf(),
    }
}

/// Construct Chrome command-line arguments for a persistent-profile session.
pub fn build_chrome_arguments(options: &LaunchOptions) -> Vec<String> {
    let profile = absolute_profile_dir(&options.profile_dir);
    let mut args = vec![
        format!("--user-data-dir={}", profile.display()),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];
    if options.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args.extend(options.extra_args.iter().cloned());
    args
}

/// JavaScript evasions applied after navigation to reduce automation signals.
pub struct StealthScripts;

impl StealthScripts {
    pub fn core_evasions() -> &'static str {
        r#"
            Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
            if (!window.chrome) window.chrome = { runtime: {} };
        "#
    }
}
