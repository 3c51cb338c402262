use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::ActionError;

/// Opens local programs and web pages on behalf of the assistant.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn open(&self, target: &str) -> Result<(), ActionError>;
    async fn open_url(&self, url: &str) -> Result<(), ActionError>;
}

/// Spawns processes on the host. Children are detached, not awaited.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn spawn(program: &str, args: &[&str], target: &str) -> Result<(), ActionError> {
        match Command::new(program).args(args).spawn() {
            Ok(_child) => {
                info!(resource = target, "Launched");
                Ok(())
            }
            Err(e) => {
                warn!(resource = target, error = %e, "Launch failed");
                Err(ActionError::Launch {
                    target: target.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn open(&self, target: &str) -> Result<(), ActionError> {
        if target.trim().is_empty() {
            return Err(ActionError::Launch {
                target: target.to_string(),
                reason: "no program named".to_string(),
            });
        }
        Self::spawn(target, &[], target)
    }

    async fn open_url(&self, url: &str) -> Result<(), ActionError> {
        if cfg!(target_os = "macos") {
            Self::spawn("open", &[url], url)
        } else if cfg!(target_os = "windows") {
            Self::spawn("cmd", &["/C", "start", "", url], url)
        } else {
            Self::spawn("xdg-open", &[url], url)
        }
    }
}

/// Google results page for `query`.
pub fn search_url(query: &str) -> String {
    match reqwest::Url::parse_with_params("https://www.google.com/search", &[("q", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => "https://www.google.com/search".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        assert_eq!(
            search_url("rust async traits"),
            "https://www.google.com/search?q=rust+async+traits"
        );
    }

    #[tokio::test]
    async fn missing_program_is_an_action_error() {
        let err = SystemLauncher
            .open("definitely-not-a-real-program-7f3a")
            .await
            .unwrap_err();
        match err {
            ActionError::Launch { target, .. } => assert_eq!(target, "definitely-not-a-real-program-7f3a"),
        }
    }
}
