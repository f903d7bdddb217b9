// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::bail;

use crate::{
    common::fonts::FontSet,
    models::preview::{Organization, DEFAULT_ORG_ADDRESS, DEFAULT_ORG_CONTACT, DEFAULT_ORG_NAME},
    platform::{DesktopPlatform, HeadlessPlatform, Platform},
    services::{DocumentService, DownloadService, PreviewService, PrintService, ShareService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Desktop,
    Headless,
}

impl FromStr for PlatformKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(PlatformKind::Desktop),
            "headless" => Ok(PlatformKind::Headless),
            other => bail!("PLATFORM must be `desktop` or `headless`, got `{}`", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub download_dir: PathBuf,
    pub spool_dir: PathBuf,
    pub platform: PlatformKind,
    pub print_command: String,
    pub open_command: String,
    pub clipboard_command: String,
    pub organization: Organization,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("./fonts"),
            font_family: "DejaVuSans".to_string(),
            download_dir: PathBuf::from("./downloads"),
            spool_dir: env::temp_dir().join("chitfund-invoice"),
            platform: PlatformKind::Desktop,
            print_command: "lp".to_string(),
            open_command: "xdg-open".to_string(),
            clipboard_command: "xclip -selection clipboard".to_string(),
            organization: Organization::default(),
        }
    }
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment over the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let var = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());

        let platform = match var("PLATFORM") {
            Some(kind) => kind.parse()?,
            None => defaults.platform,
        };

        Ok(Self {
            fonts_dir: var("FONTS_DIR").map(PathBuf::from).unwrap_or(defaults.fonts_dir),
            font_family: var("FONT_FAMILY").unwrap_or(defaults.font_family),
            download_dir: var("DOWNLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.download_dir),
            spool_dir: var("SPOOL_DIR").map(PathBuf::from).unwrap_or(defaults.spool_dir),
            platform,
            print_command: var("PRINT_COMMAND").unwrap_or(defaults.print_command),
            open_command: var("OPEN_COMMAND").unwrap_or(defaults.open_command),
            clipboard_command: var("CLIPBOARD_COMMAND").unwrap_or(defaults.clipboard_command),
            organization: Organization {
                name: var("ORG_NAME").unwrap_or_else(|| DEFAULT_ORG_NAME.to_string()),
                address: var("ORG_ADDRESS").unwrap_or_else(|| DEFAULT_ORG_ADDRESS.to_string()),
                contact: var("ORG_CONTACT").unwrap_or_else(|| DEFAULT_ORG_CONTACT.to_string()),
                logo_path: var("LOGO_PATH").map(PathBuf::from),
            },
        })
    }

    pub fn font_hint(&self) -> String {
        self.fonts_dir
            .join(format!("{}-*.ttf", self.font_family))
            .display()
            .to_string()
    }
}

/// Everything a widget needs, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub platform: Arc<dyn Platform>,
    pub preview_service: PreviewService,
    pub print_service: PrintService,
    pub document_service: DocumentService,
    pub download_service: DownloadService,
    pub share_service: ShareService,
}

impl AppState {
    pub fn new(config: AppConfig, platform: Arc<dyn Platform>) -> Self {
        // Missing fonts only disable the PDF export; the rest keeps working.
        let fonts = match FontSet::load(&config.fonts_dir, &config.font_family) {
            Ok(fonts) => Some(Arc::new(fonts)),
            Err(e) => {
                tracing::warn!("PDF export disabled: {}", e);
                None
            }
        };

        // --- Builds the service graph ---
        let download_service = DownloadService::new(platform.clone(), config.spool_dir.clone());
        let preview_service = PreviewService::new(config.organization.clone());
        let print_service = PrintService::new(platform.clone());
        let document_service = DocumentService::new(fonts, config.font_hint());
        let share_service = ShareService::new(platform.clone(), download_service.clone());

        Self {
            config: Arc::new(config),
            platform,
            preview_service,
            print_service,
            document_service,
            download_service,
            share_service,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let platform: Arc<dyn Platform> = match config.platform {
            PlatformKind::Desktop => Arc::new(DesktopPlatform::new(&config)),
            PlatformKind::Headless => Arc::new(HeadlessPlatform::default()),
        };
        tracing::info!("Using {:?} platform", config.platform);

        Ok(Self::new(config, platform))
    }
}
