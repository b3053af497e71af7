//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理源文件的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 存在性检查 + metadata 体积限制 + 读取。
//! - 读取后用魔数签名确认内容确实是图片，拒绝伪装成图片的任意文件。
//! - 源侧的缺失与损坏统一映射到 `ComposeError::Decode`，
//!   体积超限归入内存不足分类，便于上层按既定口径提示。

use std::path::Path;

use super::source::RawImageData;
use super::{ComposeConfig, ComposeError, ComposeHandler};

impl ComposeHandler {
    /// 从本地路径加载图片原始字节。
    pub(super) fn load_from_file(
        &self,
        path: &Path,
        config: &ComposeConfig,
    ) -> Result<RawImageData, ComposeError> {
        log::info!("📁 开始读取源图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(ComposeError::Decode(format!(
                "源文件不存在：{}",
                path.display()
            )));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ComposeError::Decode(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_source_file_size {
            return Err(ComposeError::MemoryExhausted(format!(
                "源文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_source_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ComposeError::Decode(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "file",
        })
    }

    /// 校验字节流的图片签名。
    ///
    /// 在完整解码之前用魔数快速拒绝非图片内容。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), ComposeError> {
        if !infer::is_image(bytes) {
            return Err(ComposeError::Decode(
                "不是受支持的图片格式（签名不匹配）".to_string(),
            ));
        }
        Ok(())
    }
}
