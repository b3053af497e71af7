use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 编辑器设置：上次使用的参数与目录偏好。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// 上次使用的蒙版不透明度。
    pub last_opacity: f32,
    /// 上次使用的缩放目标高度。
    pub last_target_height: u32,
    /// 自定义图库输出目录（为空时使用系统默认）。
    pub custom_gallery_dir: Option<String>,
    /// 缩放质量档位（quality / balanced / speed）。
    pub quality_profile: String,
    /// 最近一次保存时间，保存时自动盖章。
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            last_opacity: 0.0,
            last_target_height: 1920,
            custom_gallery_dir: None,
            quality_profile: "balanced".to_string(),
            updated_at: None,
        }
    }
}

fn settings_file_path() -> Result<PathBuf, AppError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Settings("无法获取系统配置目录".to_string()))?
        .join("wallpaper-editor");

    fs::create_dir_all(&config_dir)
        .map_err(|e| AppError::Settings(format!("创建配置目录失败: {}", e)))?;

    Ok(config_dir.join("settings.json"))
}

fn read_settings(path: &Path) -> Result<Option<AppSettings>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let parsed = serde_json::from_str::<AppSettings>(&content)
        .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;

    Ok(Some(parsed))
}

fn write_settings(path: &Path, settings: &AppSettings) -> Result<(), AppError> {
    let mut stamped = settings.clone();
    stamped.updated_at = Some(Utc::now());

    let content = serde_json::to_string_pretty(&stamped)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}

/// 读取编辑器设置；文件不存在时返回 `None`。
pub fn load_app_settings() -> Result<Option<AppSettings>, AppError> {
    read_settings(&settings_file_path()?)
}

/// 保存编辑器设置，保存时自动更新 `updated_at`。
pub fn save_app_settings(settings: &AppSettings) -> Result<(), AppError> {
    write_settings(&settings_file_path()?, settings)
}
