//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ComposeHandler` 只负责流程编排与配置管理，不感知调用方形态。
//! 处理链路固定为：
//! 1. 校验请求入参
//! 2. 读取配置快照
//! 3. 加载源文件原始字节
//! 4. 解码并等比缩放到目标高度
//! 5. 叠加黑色蒙版
//! 6. 编码为 JPEG 并原子写入输出目录
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ComposeConfig>>` 支持运行时动态切档。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/decode/scale/mask/encode/total` 阶段耗时，便于性能诊断。

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::source::ComposeRequest;
use super::{ComposeConfig, ComposeError, ScaleQualityProfile};

/// 蒙版合成处理器。
///
/// 封装了配置状态，并编排各子模块实现完整流程。
pub struct ComposeHandler {
    pub(super) config: Arc<RwLock<ComposeConfig>>,
}

impl ComposeHandler {
    /// 根据初始配置创建处理器。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use wallpaper_editor::compositor::{ComposeConfig, ComposeHandler};
    ///
    /// let handler = ComposeHandler::new(ComposeConfig::default())?;
    /// # Ok::<(), wallpaper_editor::compositor::ComposeError>(())
    /// ```
    pub fn new(config: ComposeConfig) -> Result<Self, ComposeError> {
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub(super) fn config_snapshot(&self) -> Result<ComposeConfig, ComposeError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ComposeError::Busy("配置读取锁已中毒".to_string()))
    }

    /// 设置缩放质量档位。
    pub fn set_quality_profile(&self, profile: ScaleQualityProfile) -> Result<(), ComposeError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ComposeError::Busy("配置写入锁已中毒".to_string()))?;
        config.apply_quality_profile(profile);

        log::info!(
            "⚙️ 已切换缩放质量档位：{:?}（filter={:?}）",
            profile,
            config.resize_filter
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn get_quality_profile(&self) -> Result<ScaleQualityProfile, ComposeError> {
        let config = self
            .config
            .read()
            .map_err(|_| ComposeError::Busy("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_quality_profile())
    }

    /// 设置体积与内存限制等高级配置。
    pub fn set_advanced_config(
        &self,
        max_source_file_size: u64,
        max_decoded_pixels: u64,
        max_raster_bytes: u64,
        jpeg_quality: u8,
    ) -> Result<(), ComposeError> {
        if max_source_file_size < 1024 * 1024 {
            return Err(ComposeError::InvalidInput(
                "max_source_file_size 不能小于 1MB".to_string(),
            ));
        }
        if max_decoded_pixels < 1_000_000 {
            return Err(ComposeError::InvalidInput(
                "max_decoded_pixels 不能小于 100 万像素".to_string(),
            ));
        }
        if max_raster_bytes < 8 * 1024 * 1024 {
            return Err(ComposeError::InvalidInput(
                "max_raster_bytes 不能小于 8MB".to_string(),
            ));
        }
        if !(1..=100).contains(&jpeg_quality) {
            return Err(ComposeError::InvalidInput(
                "jpeg_quality 必须在 1~100 之间".to_string(),
            ));
        }

        let mut config = self
            .config
            .write()
            .map_err(|_| ComposeError::Busy("配置写入锁已中毒".to_string()))?;

        config.max_source_file_size = max_source_file_size;
        config.max_decoded_pixels = max_decoded_pixels;
        config.max_raster_bytes = max_raster_bytes;
        config.jpeg_quality = jpeg_quality;

        Ok(())
    }

    /// 获取高级配置快照。
    pub fn get_advanced_config(&self) -> Result<(u64, u64, u64, u8), ComposeError> {
        let config = self
            .config
            .read()
            .map_err(|_| ComposeError::Busy("配置读取锁已中毒".to_string()))?;

        Ok((
            config.max_source_file_size,
            config.max_decoded_pixels,
            config.max_raster_bytes,
            config.jpeg_quality,
        ))
    }

    /// 处理主入口：执行一次完整的蒙版合成。
    ///
    /// 阻塞执行，调用方负责将其派发到工作线程（见 `service.rs`）。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use wallpaper_editor::compositor::{ComposeConfig, ComposeHandler, ComposeRequest};
    ///
    /// let handler = ComposeHandler::new(ComposeConfig::default())?;
    /// let output = handler.compose(&ComposeRequest {
    ///     source_path: "C:/tmp/source.png".into(),
    ///     output_dir: "C:/tmp/gallery".into(),
    ///     target_height: 1920,
    ///     opacity: 0.35,
    /// })?;
    /// # Ok::<(), wallpaper_editor::compositor::ComposeError>(())
    /// ```
    pub fn compose(&self, request: &ComposeRequest) -> Result<PathBuf, ComposeError> {
        request.validate()?;

        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = self.load_from_file(&request.source_path, &config)?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let decoded = self.decode_image(raw, &config)?;
        let decode_elapsed = decode_start.elapsed();

        let scale_start = Instant::now();
        let scaled = self.scale_to_height(decoded, request.target_height, &config)?;
        let scale_elapsed = scale_start.elapsed();

        let mask_start = Instant::now();
        let masked = Self::apply_dim_mask(&scaled, request.opacity)?;
        drop(scaled);
        let mask_elapsed = mask_start.elapsed();

        let encode_start = Instant::now();
        let output_path = self.write_jpeg(masked, &request.output_dir, &config)?;
        let encode_elapsed = encode_start.elapsed();

        let total_elapsed = total_start.elapsed();
        log::info!(
            "✅ 蒙版合成完成 - load={}ms decode={}ms scale={}ms mask={}ms encode={}ms total={}ms",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            scale_elapsed.as_millis(),
            mask_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_elapsed.as_millis()
        );

        Ok(output_path)
    }
}
