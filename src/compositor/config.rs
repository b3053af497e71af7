//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ComposeConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中缩放质量档位（quality / balanced / speed）作为高层语义，映射到底层滤镜选择。
//!
//! 三个档位都只在平滑类卷积滤镜之间切换，最近邻不在候选之列：
//! 壁纸缩放对锯齿非常敏感，速度档也必须保持平滑采样。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `ScaleQualityProfile` 负责档位字符串解析与反向输出。
//! - `apply_quality_profile` 将档位转换为具体滤镜。
//! - `infer_quality_profile` 用于从当前配置反推档位（给上层展示状态）。

use image::imageops::FilterType;

use super::ComposeError;

/// 输出文件固定名称，重复合成总是覆盖同一文件。
pub(crate) const OUTPUT_FILE_NAME: &str = "final_dim_image.jpg";

/// 蒙版合成配置。
///
/// 字段覆盖了加载、解码缩放与编码写出三个阶段。
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// 读取源文件时允许的最大体积（字节）。
    pub max_source_file_size: u64,
    /// 解码后的像素上限（`width * height`），头信息与实际尺寸都会检查。
    pub max_decoded_pixels: u64,
    /// 单个光栅缓冲允许的预计内存上限（按 RGBA 估算，字节），
    /// 源图、缩放结果、蒙版输出三块缓冲分别受此约束。
    pub max_raster_bytes: u64,
    /// 缩放滤镜策略，只允许平滑类滤镜。
    pub resize_filter: FilterType,
    /// JPEG 编码质量（1~100）。
    pub jpeg_quality: u8,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            max_source_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_raster_bytes: 160 * 1024 * 1024,
            resize_filter: FilterType::CatmullRom,
            jpeg_quality: 90,
        }
    }
}

/// 缩放质量档位（面向产品/用户语义）。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与耗时平衡
/// - `Speed`：优先合成速度
#[derive(Debug, Clone, Copy)]
pub enum ScaleQualityProfile {
    Quality,
    Balanced,
    Speed,
}

impl ScaleQualityProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use wallpaper_editor::compositor::ScaleQualityProfile;
    ///
    /// let p = ScaleQualityProfile::from_str("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), wallpaper_editor::compositor::ComposeError>(())
    /// ```
    pub(crate) fn from_str(profile: &str) -> Result<Self, ComposeError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ComposeError::InvalidInput(format!(
                "未知质量档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，供上层展示与持久化。
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl ComposeConfig {
    /// 基于当前滤镜反推质量档位。
    ///
    /// 用于“后端当前生效档位”查询场景。
    pub(crate) fn infer_quality_profile(&self) -> ScaleQualityProfile {
        match self.resize_filter {
            FilterType::Lanczos3 => ScaleQualityProfile::Quality,
            FilterType::Triangle => ScaleQualityProfile::Speed,
            _ => ScaleQualityProfile::Balanced,
        }
    }

    /// 应用指定质量档位到实际滤镜。
    ///
    /// 保持“档位语义稳定”，便于上层按档位切换而无需了解底层细节。
    pub(crate) fn apply_quality_profile(&mut self, profile: ScaleQualityProfile) {
        match profile {
            ScaleQualityProfile::Quality => {
                self.resize_filter = FilterType::Lanczos3;
            }
            ScaleQualityProfile::Balanced => {
                self.resize_filter = FilterType::CatmullRom;
            }
            ScaleQualityProfile::Speed => {
                self.resize_filter = FilterType::Triangle;
            }
        }
    }
}
