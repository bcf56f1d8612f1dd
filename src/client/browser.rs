use std::env;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Browsers tried before falling back to the OS default handler.
const BROWSER_CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "chromium",
    "chromium-browser",
];

/// Open the URL in the first available candidate browser, falling back to the
/// OS default opener. Launch failures are logged, never surfaced.
pub fn open_website(url: &str) {
    for name in BROWSER_CANDIDATES {
        let Some(path) = find_in_path(name) else {
            continue;
        };
        match spawn_detached(path.as_os_str().to_string_lossy().as_ref(), url) {
            Ok(()) => {
                info!("Opened {} in {} ({})", url, name, path.display());
                return;
            }
            Err(err) => warn!("Failed to launch {}: {}", name, err),
        }
    }

    match spawn_detached(default_opener(), url) {
        Ok(()) => info!("Opened {} in the default browser", url),
        Err(err) => warn!("Failed to open browser for {}: {}", url, err),
    }
}

fn spawn_detached(program: &str, url: &str) -> std::io::Result<()> {
    Command::new(program)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_in_path_misses_nonsense() {
        assert!(find_in_path("definitely-not-a-real-browser-binary").is_none());
    }
}
