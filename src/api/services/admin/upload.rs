//! 图片上传
//!
//! multipart 字段：`file`（必填）与 `type`（icon / service / category / banner）。
//! 文件先读入内存，类型与大小校验通过后才落盘。

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{Responder, Result as ActixResult, web};
use futures_util::StreamExt;
use tracing::{error, trace};

use crate::errors::AinavError;
use crate::services::{UploadKind, UploadService};

use super::guard::AdminSession;
use super::helpers::success_with_message;

struct FilePart {
    mime: String,
    file_name: Option<String>,
    data: Vec<u8>,
}

pub async fn upload_image(
    _session: AdminSession,
    mut payload: Multipart,
    uploads: web::Data<Arc<UploadService>>,
) -> ActixResult<impl Responder> {
    let mut file: Option<FilePart> = None;
    let mut kind_raw: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            error!("Failed to parse multipart field: {}", e);
            AinavError::validation(format!("Invalid multipart data: {}", e))
        })?;

        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let mime = field
                    .content_type()
                    .map(|m| m.essence_str().to_string())
                    .unwrap_or_default();
                // 先校验类型，避免读取不支持的文件
                UploadService::check_mime(&mime)?;

                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let bytes = chunk.map_err(|e| {
                        error!("Failed to read file chunk: {}", e);
                        AinavError::validation(format!("Failed to read file: {}", e))
                    })?;
                    // 超过上限立即拒绝，不再继续读取
                    uploads.check_size(data.len() + bytes.len())?;
                    data.extend_from_slice(&bytes);
                }
                trace!("Received upload part: {} bytes, {}", data.len(), mime);

                file = Some(FilePart {
                    mime,
                    file_name,
                    data,
                });
            }
            "type" => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let bytes = chunk.map_err(|e| {
                        error!("Failed to read upload type field: {}", e);
                        AinavError::validation(format!("Failed to read upload type: {}", e))
                    })?;
                    data.extend_from_slice(&bytes);
                    if data.len() > 64 {
                        break;
                    }
                }
                kind_raw = Some(String::from_utf8_lossy(&data).to_string());
            }
            _ => {}
        }
    }

    let Some(file) = file else {
        return Err(AinavError::validation("No file uploaded").into());
    };

    let kind = UploadKind::parse(kind_raw.as_deref());
    let saved = uploads
        .save(kind, &file.mime, file.file_name.as_deref(), &file.data)
        .await?;

    Ok(success_with_message("Upload successful", saved))
}
