//! # 编码与写出模块
//!
//! ## 设计思路
//!
//! 输出文件承诺“成功则恰好一个完整文件，失败则不留半成品”。
//! 因此编码先落到同目录的临时文件，成功后再原子替换到固定文件名；
//! 任何一步失败，临时文件随句柄销毁自动清理。
//!
//! ## 实现思路
//!
//! - JPEG 不携带 Alpha，编码前将 RGBA 扁平化为 RGB。
//! - 质量由配置给出（默认 90）。
//! - 固定文件名 `final_dim_image.jpg`，重复合成总是覆盖。

use std::path::{Path, PathBuf};

use image::ImageBuffer;
use image::Rgba;
use image::codecs::jpeg::JpegEncoder;

use super::config::OUTPUT_FILE_NAME;
use super::source::MaskedFrame;
use super::{ComposeConfig, ComposeError, ComposeHandler};

impl ComposeHandler {
    /// 将最终光栅编码为 JPEG 并原子写入输出目录。
    ///
    /// 返回输出文件的完整路径。
    pub(super) fn write_jpeg(
        &self,
        frame: MaskedFrame,
        output_dir: &Path,
        config: &ComposeConfig,
    ) -> Result<PathBuf, ComposeError> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| ComposeError::Write(format!("无法创建输出目录：{}", e)))?;

        let rgba = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(frame.width, frame.height, frame.bytes)
            .ok_or_else(|| ComposeError::Encode("输出缓冲长度异常".to_string()))?;
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

        let mut temp_file = tempfile::NamedTempFile::new_in(output_dir)
            .map_err(|e| ComposeError::Write(format!("无法创建临时文件：{}", e)))?;

        let encoder = JpegEncoder::new_with_quality(&mut temp_file, config.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| ComposeError::Encode(format!("JPEG 编码失败：{}", e)))?;

        let output_path = output_dir.join(OUTPUT_FILE_NAME);
        temp_file
            .persist(&output_path)
            .map_err(|e| ComposeError::Write(format!("无法落盘输出文件：{}", e)))?;

        let written = std::fs::metadata(&output_path).map(|m| m.len()).unwrap_or(0);
        log::info!(
            "💾 输出写入完成 - 路径: {} 尺寸: {}x{} 大小: {}KB",
            output_path.display(),
            frame.width,
            frame.height,
            written / 1024
        );

        Ok(output_path)
    }
}
