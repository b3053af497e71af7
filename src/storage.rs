//! 图库输出目录管理模块
//!
//! # 设计思路
//!
//! 统一管理合成结果的持久化存储路径，支持用户自定义目录，
//! 并在目录不存在时自动创建。
//!
//! # 实现思路
//!
//! - 优先使用用户在设置中配置的自定义目录。
//! - 未设置时回退到系统图片目录（再退到数据目录）下的 `wallpaper-editor` 子目录。
//! - 目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::error::AppError;

const APP_DIR_NAME: &str = "wallpaper-editor";

/// 存储目录信息
#[derive(Debug, Clone, Serialize)]
pub struct GalleryInfo {
    pub path: String,
    pub total_size: u64,
    pub file_count: u64,
}

/// 获取图库输出目录
///
/// # 参数
/// * `custom_dir` - 用户自定义目录（可选）
///
/// # 返回
/// - `Ok(PathBuf)` — 可用的图库输出目录
/// - `Err(AppError::Storage)` — 无法获取或创建目录
pub fn gallery_dir(custom_dir: Option<String>) -> Result<PathBuf, AppError> {
    // 优先使用用户自定义目录
    if let Some(dir) = custom_dir {
        if !dir.is_empty() {
            let path = PathBuf::from(&dir);
            if !path.exists() {
                fs::create_dir_all(&path).map_err(|e| {
                    AppError::Storage(format!("创建自定义目录 '{}' 失败: {}", dir, e))
                })?;
            }
            return Ok(path);
        }
    }

    // 使用系统图片目录，无图片目录的环境退回数据目录
    let base_dir = dirs::picture_dir()
        .or_else(dirs::data_dir)
        .ok_or_else(|| AppError::Storage("无法获取系统图片目录".to_string()))?;

    let gallery = base_dir.join(APP_DIR_NAME);
    if !gallery.exists() {
        fs::create_dir_all(&gallery)
            .map_err(|e| AppError::Storage(format!("创建图库目录失败: {}", e)))?;
    }
    Ok(gallery)
}

/// 获取图库目录信息（路径 + 占用大小 + 文件数）
pub fn gallery_info(custom_dir: Option<String>) -> Result<GalleryInfo, AppError> {
    let dir = gallery_dir(custom_dir)?;
    let mut total_size: u64 = 0;
    let mut file_count: u64 = 0;

    if dir.exists() {
        if let Ok(entries) = fs::read_dir(&dir) {
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_file() {
                        total_size += metadata.len();
                        file_count += 1;
                    }
                }
            }
        }
    }

    Ok(GalleryInfo {
        path: dir.to_string_lossy().to_string(),
        total_size,
        file_count,
    })
}
