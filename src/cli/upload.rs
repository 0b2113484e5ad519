//
//  fryends-client
//  cli/upload.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Media upload command

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::MediaKind;

use super::GlobalOptions;

/// Upload a photo or video to a pre-signed URL
#[derive(Args, Debug)]
pub struct UploadCommand {
    /// Pre-signed upload URL
    pub url: String,

    /// File to upload
    pub file: PathBuf,

    /// Media kind; guessed from the file extension when omitted
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Photo,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Photo => MediaKind::Photo,
            KindArg::Video => MediaKind::Video,
        }
    }
}

impl UploadCommand {
    fn media_kind(&self) -> Result<MediaKind> {
        match self.kind {
            Some(kind) => Ok(kind.into()),
            None => MediaKind::from_path(&self.file).with_context(|| {
                format!(
                    "Cannot tell the media kind of {}; pass --kind photo|video",
                    self.file.display()
                )
            }),
        }
    }

    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let kind = self.media_kind()?;
        let data = std::fs::read(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let size = data.len();
        let client = global.client()?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}]")
                .context("Invalid progress template")?,
        );
        spinner.set_message(format!("Uploading {} ({} bytes)", self.file.display(), size));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let uploaded = client.upload_media(&self.url, data, kind).await;
        spinner.finish_and_clear();

        if global.json {
            let result = serde_json::json!({
                "success": uploaded,
                "file": self.file.display().to_string(),
                "size": size,
                "content_type": kind.mime_type(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if uploaded {
            println!("{} Uploaded {}", style("✓").green(), self.file.display());
        }

        if !uploaded {
            anyhow::bail!("Upload of {} failed", self.file.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(file: &str, kind: Option<KindArg>) -> UploadCommand {
        UploadCommand {
            url: "https://bucket.example.com/key".into(),
            file: PathBuf::from(file),
            kind,
        }
    }

    #[test]
    fn test_kind_from_flag_wins() {
        let cmd = command("clip.jpg", Some(KindArg::Video));
        assert_eq!(cmd.media_kind().unwrap(), MediaKind::Video);
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(command("me.jpeg", None).media_kind().unwrap(), MediaKind::Photo);
        assert_eq!(command("me.MP4", None).media_kind().unwrap(), MediaKind::Video);
        assert!(command("notes.txt", None).media_kind().is_err());
    }
}
