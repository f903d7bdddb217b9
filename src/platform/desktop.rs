// src/platform/desktop.rs

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{
    config::AppConfig,
    models::export::{Notice, PrintJob, SharePayload},
    platform::{Platform, PlatformError, ShareCapabilities},
};

/// Runs on a workstation: prints, opens links and copies through external
/// commands, and saves downloads into a directory. There is no share sheet.
pub struct DesktopPlatform {
    download_dir: PathBuf,
    spool_dir: PathBuf,
    print_command: Vec<String>,
    open_command: Vec<String>,
    clipboard_command: Vec<String>,
}

impl DesktopPlatform {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            download_dir: config.download_dir.clone(),
            spool_dir: config.spool_dir.clone(),
            print_command: split_command(&config.print_command),
            open_command: split_command(&config.open_command),
            clipboard_command: split_command(&config.clipboard_command),
        }
    }
}

#[async_trait]
impl Platform for DesktopPlatform {
    fn share_capabilities(&self) -> ShareCapabilities {
        ShareCapabilities { text: false, files: false }
    }

    async fn print(&self, job: PrintJob) -> Result<(), PlatformError> {
        tokio::fs::create_dir_all(&self.spool_dir).await?;

        // The spooled page lives until the print command returns.
        let page = tempfile::Builder::new()
            .prefix("receipt-")
            .suffix(".html")
            .tempfile_in(&self.spool_dir)?;
        tokio::fs::write(page.path(), job.html.as_bytes()).await?;

        let path = page.path().display().to_string();
        tracing::info!("Printing \"{}\" from {}", job.title, path);
        run(&self.print_command, Some(&path), None).await
    }

    async fn share(&self, _payload: SharePayload) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported)
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        run(&self.clipboard_command, None, Some(text)).await
    }

    async fn save_download(&self, staged: &Path, file_name: &str) -> Result<PathBuf, PlatformError> {
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let (target, mut file) = claim_target(&self.download_dir, file_name).await?;

        let mut source = tokio::fs::File::open(staged).await?;
        tokio::io::copy(&mut source, &mut file).await?;
        file.flush().await?;

        tracing::info!("Saved download to {}", target.display());
        Ok(target)
    }

    async fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        run(&self.open_command, Some(url), None).await
    }

    fn notify(&self, notice: &Notice) {
        if notice.is_error() {
            eprintln!("! {notice}");
        } else {
            println!("* {notice}");
        }
    }
}

const MAX_DUPLICATES: u32 = 1000;

/// Creates the first free `name.ext`, `name (1).ext`, `name (2).ext`, ...
/// Earlier downloads are never overwritten.
async fn claim_target(dir: &Path, file_name: &str) -> Result<(PathBuf, tokio::fs::File), PlatformError> {
    let name = Path::new(file_name);
    let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
    let extension = name.extension().and_then(|s| s.to_str());

    for n in 0..MAX_DUPLICATES {
        let candidate = match (n, extension) {
            (0, _) => file_name.to_string(),
            (n, Some(ext)) => format!("{stem} ({n}).{ext}"),
            (n, None) => format!("{stem} ({n})"),
        };
        let path = dir.join(candidate);
        match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(PlatformError::Command {
        command: "save".into(),
        reason: format!("too many copies of {file_name} in {}", dir.display()),
    })
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

async fn run(command: &[String], arg: Option<&str>, stdin: Option<&str>) -> Result<(), PlatformError> {
    let Some((program, args)) = command.split_first() else {
        return Err(PlatformError::Unsupported);
    };

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(arg) = arg {
        cmd.arg(arg);
    }
    cmd.stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let failed = |reason: String| PlatformError::Command {
        command: command.join(" "),
        reason,
    };

    let mut child = cmd.spawn().map_err(|e| failed(e.to_string()))?;

    if let (Some(text), Some(mut pipe)) = (stdin, child.stdin.take()) {
        // A command that exits early closes the pipe; its exit status tells the story.
        if let Err(e) = pipe.write_all(text.as_bytes()).await {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        // Closing stdin lets the command finish.
        drop(pipe);
    }

    let output = child.wait_with_output().await?;
    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(failed(format!("{} {}", output.status, stderr)))
    }
}
