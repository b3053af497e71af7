//! # 请求与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入语义”和“流水线中间结果”解耦：
//! - `ComposeRequest` 表示一次合成请求的完整入参
//! - `RawImageData` 表示已加载但未解码的字节
//! - `ScaledFrame` 表示缩放后的 RGBA 像素数据
//! - `MaskedFrame` 表示叠加蒙版后的最终像素数据
//!
//! 入参校验放在请求模型上，保证“越界的不透明度在任何解码发生之前被拒绝”。

use std::path::PathBuf;

use super::ComposeError;

/// 一次蒙版合成请求。
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    /// 源图片文件路径。
    pub source_path: PathBuf,
    /// 输出目录（通常为图库目录，见 `storage` 模块）。
    pub output_dir: PathBuf,
    /// 缩放目标高度（像素），必须大于 0。
    pub target_height: u32,
    /// 蒙版不透明度，取值范围 [0.0, 1.0]。
    pub opacity: f32,
}

impl ComposeRequest {
    /// 校验请求入参。
    ///
    /// 必须在任何文件读取与解码之前调用；
    /// 非法不透明度与非法目标高度都在这里被拒绝。
    pub fn validate(&self) -> Result<(), ComposeError> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(ComposeError::InvalidInput(format!(
                "不透明度必须在 0.0~1.0 之间：{}",
                self.opacity
            )));
        }

        if self.target_height == 0 {
            return Err(ComposeError::InvalidInput(
                "目标高度必须大于 0".to_string(),
            ));
        }

        if self.source_path.as_os_str().is_empty() {
            return Err(ComposeError::InvalidInput("源文件路径为空".to_string()));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ComposeError::InvalidInput("输出目录为空".to_string()));
        }

        Ok(())
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 缩放阶段输出：目标尺寸的 RGBA 像素数据。
pub(crate) struct ScaledFrame {
    /// 图像宽度（像素）。
    pub(crate) width: u32,
    /// 图像高度（像素）。
    pub(crate) height: u32,
    /// RGBA 字节数组（`width * height * 4`）。
    pub(crate) bytes: Vec<u8>,
}

/// 蒙版合成输出：与 `ScaledFrame` 同尺寸的最终像素数据。
///
/// 不变式：`width/height` 恒等于生成它的 `ScaledFrame` 的尺寸。
pub(crate) struct MaskedFrame {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// RGBA 字节数组，Alpha 通道恒为 255。
    pub(crate) bytes: Vec<u8>,
}
