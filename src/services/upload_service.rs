//! 图片上传与清理
//!
//! 文件保存为 `{upload_dir}/{icons|categories|banners}/{prefix}_{millis}.{ext}`，
//! 对外地址为 `/uploads/{dir}/{file}`。

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::UploadConfig;
use crate::errors::{AinavError, Result};

/// 对外访问前缀
pub const PUBLIC_PREFIX: &str = "/uploads/";

pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// 上传用途，决定子目录与文件名前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Icon,
    Category,
    Banner,
}

impl UploadKind {
    /// `service` 与未知值都按 icon 处理
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("category") => UploadKind::Category,
            Some("banner") => UploadKind::Banner,
            _ => UploadKind::Icon,
        }
    }

    pub fn dir(&self) -> &'static str {
        match self {
            UploadKind::Icon => "icons",
            UploadKind::Category => "categories",
            UploadKind::Banner => "banners",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            UploadKind::Icon => "icon",
            UploadKind::Category => "category",
            UploadKind::Banner => "banner",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub url: String,
    pub path: String,
}

pub struct UploadService {
    root: PathBuf,
    max_file_size: usize,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>, max_file_size: usize) -> Self {
        Self {
            root: root.into(),
            max_file_size,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.dir, config.max_file_size)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn check_mime(mime: &str) -> Result<()> {
        if ALLOWED_MIME_TYPES.contains(&mime) {
            Ok(())
        } else {
            Err(AinavError::unsupported_media(
                "Unsupported file type, please upload a JPG, PNG, GIF, WEBP or SVG image",
            ))
        }
    }

    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_file_size {
            return Err(AinavError::file_too_large(format!(
                "File size cannot exceed {}MB",
                self.max_file_size / (1024 * 1024)
            )));
        }
        Ok(())
    }

    /// 校验通过后才落盘；写入失败时删除残留文件
    pub async fn save(
        &self,
        kind: UploadKind,
        mime: &str,
        original_name: Option<&str>,
        data: &[u8],
    ) -> Result<UploadedFile> {
        Self::check_mime(mime)?;
        self.check_size(data.len())?;
        if data.is_empty() {
            return Err(AinavError::validation("File is empty"));
        }

        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;

        let ext = file_extension(original_name, mime);
        let mut millis = chrono::Utc::now().timestamp_millis();
        // create_new 保证同一毫秒内的并发上传不会互相覆盖
        let (file_name, file_path, mut file) = loop {
            let name = format!("{}_{}.{}", kind.prefix(), millis, ext);
            let path = dir.join(&name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (name, path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let written = match file.write_all(data).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        drop(file);
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&file_path).await {
                debug!("No partial upload to clean at {:?}: {}", file_path, cleanup);
            }
            return Err(e.into());
        }

        let url = format!("{}{}/{}", PUBLIC_PREFIX, kind.dir(), file_name);
        info!("Uploaded {} ({} bytes)", url, data.len());
        Ok(UploadedFile {
            path: url.clone(),
            url,
        })
    }

    /// 把 `/uploads/...` 地址映射到磁盘路径；外部地址或越界路径返回 None
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(PUBLIC_PREFIX)?;
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// 删除上传的文件，失败只记录日志
    pub async fn remove_by_url(&self, url: Option<&str>) {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return;
        };
        let Some(path) = self.resolve(url) else {
            debug!("Skip removing non-upload url: {}", url);
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Removed uploaded file {:?}", path),
            Err(e) => warn!("Failed to remove uploaded file {:?}: {}", path, e),
        }
    }
}

/// 扩展名优先取原文件名（仅字母数字），否则按 MIME 推断
fn file_extension(original_name: Option<&str>, mime: &str) -> String {
    let from_name = original_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.unwrap_or_else(|| {
        match mime {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "jpg",
        }
        .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_kind_parse() {
        assert_eq!(UploadKind::parse(None), UploadKind::Icon);
        assert_eq!(UploadKind::parse(Some("service")), UploadKind::Icon);
        assert_eq!(UploadKind::parse(Some("category")), UploadKind::Category);
        assert_eq!(UploadKind::parse(Some("banner")), UploadKind::Banner);
        assert_eq!(UploadKind::parse(Some("weird")), UploadKind::Icon);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Some("logo.PNG"), "image/png"), "png");
        assert_eq!(file_extension(Some("noext"), "image/webp"), "webp");
        assert_eq!(file_extension(Some("a.ph p"), "image/gif"), "gif");
        assert_eq!(file_extension(None, "image/jpeg"), "jpg");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let service = UploadService::new("/srv/uploads", 1024);
        assert_eq!(
            service.resolve("/uploads/icons/icon_1.png"),
            Some(PathBuf::from("/srv/uploads/icons/icon_1.png"))
        );
        assert_eq!(service.resolve("/uploads/../etc/passwd"), None);
        assert_eq!(service.resolve("https://cdn.example.com/a.png"), None);
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path(), 1024);

        let saved = service
            .save(UploadKind::Banner, "image/png", Some("hero.png"), b"png-bytes")
            .await
            .unwrap();
        assert!(saved.url.starts_with("/uploads/banners/banner_"));
        assert!(saved.url.ends_with(".png"));

        let path = service.resolve(&saved.url).unwrap();
        assert!(path.exists());

        service.remove_by_url(Some(&saved.url)).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_rejected_upload_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path(), 4);

        let too_big = service
            .save(UploadKind::Icon, "image/png", Some("a.png"), b"12345")
            .await;
        assert!(matches!(too_big, Err(AinavError::FileTooLarge(_))));

        let bad_mime = service
            .save(UploadKind::Icon, "application/pdf", Some("a.pdf"), b"1")
            .await;
        assert!(matches!(bad_mime, Err(AinavError::UnsupportedMedia(_))));

        assert!(!dir.path().join("icons").exists());
    }

    #[tokio::test]
    async fn test_same_millisecond_uploads_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path(), 1024);

        let (a, b) = tokio::join!(
            service.save(UploadKind::Icon, "image/png", Some("a.png"), b"first"),
            service.save(UploadKind::Icon, "image/png", Some("b.png"), b"second"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.url, b.url);

        let mut contents = vec![
            std::fs::read(service.resolve(&a.url).unwrap()).unwrap(),
            std::fs::read(service.resolve(&b.url).unwrap()).unwrap(),
        ];
        contents.sort();
        assert_eq!(contents, vec![b"first".to_vec(), b"second".to_vec()]);
    }
}
