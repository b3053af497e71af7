//! # 解码·缩放·蒙版流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → 缩放 → 蒙版”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//! 缩放完成后立即释放全尺寸解码缓冲，保证同一时刻不会并存两块全尺寸光栅。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素与内存上限快速拒绝
//! 3. 完整解码
//! 4. 等比缩放到目标高度（宽度四舍五入，最小 1 像素）
//! 5. 在缩放结果上以 src-over 方式叠加 `alpha = round(255 * opacity)` 的黑色矩形
//! 6. 校验输出字节长度一致性

use fast_image_resize as fr;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

use super::source::{MaskedFrame, RawImageData, ScaledFrame};
use super::{ComposeConfig, ComposeError, ComposeHandler};

impl ComposeHandler {
    /// 将原始字节解码为全尺寸图像。
    pub(super) fn decode_image(
        &self,
        raw: RawImageData,
        config: &ComposeConfig,
    ) -> Result<DynamicImage, ComposeError> {
        let _format: ImageFormat = image::guess_format(&raw.bytes)
            .map_err(|e| ComposeError::Decode(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_raster_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ComposeError::Decode(format!("图片解码失败：{}", e)))?;

        let (raw_width, raw_height) = decoded.dimensions();
        Self::validate_pixel_limits(config, raw_width, raw_height)?;
        Self::validate_raster_memory_limits(config, raw_width, raw_height)?;

        log::info!(
            "🖼️ 源图片解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            raw_width,
            raw_height
        );

        Ok(decoded)
    }

    /// 等比缩放到目标高度。
    ///
    /// 消费传入的全尺寸图像；返回时原始解码缓冲已释放，
    /// 后续蒙版阶段只持有缩放结果这一块光栅。
    pub(super) fn scale_to_height(
        &self,
        decoded: DynamicImage,
        target_height: u32,
        config: &ComposeConfig,
    ) -> Result<ScaledFrame, ComposeError> {
        let (source_width, source_height) = decoded.dimensions();
        let (target_width, target_height) =
            Self::scaled_dimensions(source_width, source_height, target_height);

        Self::validate_pixel_limits(config, target_width, target_height)?;
        Self::validate_raster_memory_limits(config, target_width, target_height)?;

        log::info!(
            "🧩 等比缩放：{}x{} -> {}x{}（filter={:?}）",
            source_width,
            source_height,
            target_width,
            target_height,
            config.resize_filter
        );

        let bytes = match Self::resize_with_fast_image_resize(
            &decoded,
            target_width,
            target_height,
            config.resize_filter,
        ) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
                decoded
                    .resize_exact(target_width, target_height, config.resize_filter)
                    .into_rgba8()
                    .into_raw()
            }
        };

        let expected_len = Self::raster_len(target_width, target_height)?;
        if bytes.len() != expected_len {
            return Err(ComposeError::Scale("缩放后像素数据长度异常".to_string()));
        }

        Ok(ScaledFrame {
            width: target_width,
            height: target_height,
            bytes,
        })
    }

    /// 计算等比缩放后的目标尺寸。
    ///
    /// 宽度按 `round(target_height * width / height)` 取整，最小 1 像素。
    /// 比例用 f64 计算，宽高比偏差严格小于 `1 / target_height`。
    pub(super) fn scaled_dimensions(
        source_width: u32,
        source_height: u32,
        target_height: u32,
    ) -> (u32, u32) {
        let ratio = source_width as f64 / source_height as f64;
        let target_width = ((target_height as f64 * ratio).round() as u32).max(1);
        (target_width, target_height)
    }

    /// 在缩放结果上叠加黑色蒙版。
    ///
    /// 蒙版等价于一块覆盖全图、`alpha = round(255 * opacity)` 的黑色矩形，
    /// 以 src-over 方式压在不透明的缩放结果上：
    /// `out = src * (255 - alpha) / 255`（四舍五入），Alpha 通道保持 255。
    ///
    /// `opacity = 0` 时输出与输入逐字节一致；`opacity = 1` 时输出为纯黑。
    pub(super) fn apply_dim_mask(
        scaled: &ScaledFrame,
        opacity: f32,
    ) -> Result<MaskedFrame, ComposeError> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(ComposeError::InvalidInput(format!(
                "不透明度必须在 0.0~1.0 之间：{}",
                opacity
            )));
        }

        let expected_len = Self::raster_len(scaled.width, scaled.height)?;
        if scaled.bytes.len() != expected_len {
            return Err(ComposeError::Scale("缩放数据长度异常".to_string()));
        }

        let mask_alpha = (255.0 * opacity).round() as u32;

        let mut bytes: Vec<u8> = Vec::new();
        bytes
            .try_reserve_exact(expected_len)
            .map_err(|_| ComposeError::MemoryExhausted("蒙版输出缓冲分配失败".to_string()))?;

        if mask_alpha == 0 {
            bytes.extend_from_slice(&scaled.bytes);
        } else {
            let inverse = 255 - mask_alpha;
            for pixel in scaled.bytes.chunks_exact(4) {
                bytes.push(Self::blend_over_black(pixel[0], inverse));
                bytes.push(Self::blend_over_black(pixel[1], inverse));
                bytes.push(Self::blend_over_black(pixel[2], inverse));
                bytes.push(255);
            }
        }

        if bytes.len() != expected_len {
            return Err(ComposeError::Scale("蒙版输出数据长度异常".to_string()));
        }

        Ok(MaskedFrame {
            width: scaled.width,
            height: scaled.height,
            bytes,
        })
    }

    /// 单通道 src-over 混合：黑色蒙版下只剩源值按比例衰减。
    fn blend_over_black(channel: u8, inverse_alpha: u32) -> u8 {
        ((channel as u32 * inverse_alpha + 127) / 255) as u8
    }

    /// 计算 RGBA 光栅的字节长度，乘法溢出视为内存风险。
    fn raster_len(width: u32, height: u32) -> Result<usize, ComposeError> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ComposeError::MemoryExhausted("图片尺寸导致内存溢出风险".to_string()))
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ComposeError> {
        let cursor = Cursor::new(bytes);
        let reader = ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| ComposeError::Decode(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ComposeError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        config: &ComposeConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ComposeError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ComposeError::MemoryExhausted("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(ComposeError::MemoryExhausted(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_raster_memory_limits(
        config: &ComposeConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ComposeError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ComposeError::MemoryExhausted("光栅内存估算溢出".to_string()))?;

        if estimated > config.max_raster_bytes {
            return Err(ComposeError::MemoryExhausted(format!(
                "光栅缓冲预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_raster_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        target_width: u32,
        target_height: u32,
        filter: image::imageops::FilterType,
    ) -> Result<Vec<u8>, ComposeError> {
        let src = image.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| ComposeError::Scale(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(
            Self::to_fast_filter(filter),
        ));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| ComposeError::Scale(format!("fast_image_resize 执行失败：{}", e)))?;

        Ok(dst_image.into_vec())
    }

    fn to_fast_filter(filter: image::imageops::FilterType) -> fr::FilterType {
        match filter {
            image::imageops::FilterType::Nearest => fr::FilterType::Box,
            image::imageops::FilterType::Triangle => fr::FilterType::Bilinear,
            image::imageops::FilterType::CatmullRom => fr::FilterType::CatmullRom,
            image::imageops::FilterType::Gaussian => fr::FilterType::Mitchell,
            image::imageops::FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use proptest::prelude::*;

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x % 255) as u8;
            let g = (y % 255) as u8;
            let b = ((x + y) % 255) as u8;
            Rgba([r, g, b, 255])
        });

        let dyn_img = DynamicImage::ImageRgba8(img);
        let mut cursor = Cursor::new(Vec::new());
        dyn_img
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn gradient_frame(width: u32, height: u32) -> ScaledFrame {
        let mut bytes = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                bytes.push((x % 255) as u8);
                bytes.push((y % 255) as u8);
                bytes.push(((x + y) % 255) as u8);
                bytes.push(255);
            }
        }
        ScaledFrame { width, height, bytes }
    }

    fn handler() -> ComposeHandler {
        ComposeHandler::new(ComposeConfig::default()).expect("handler init failed")
    }

    #[test]
    fn mask_with_zero_opacity_is_bit_exact() {
        let frame = gradient_frame(64, 48);
        let masked =
            ComposeHandler::apply_dim_mask(&frame, 0.0).expect("mask should succeed");

        assert_eq!(masked.width, frame.width);
        assert_eq!(masked.height, frame.height);
        assert_eq!(masked.bytes, frame.bytes);
    }

    #[test]
    fn mask_with_full_opacity_is_pure_black() {
        let frame = gradient_frame(32, 32);
        let masked =
            ComposeHandler::apply_dim_mask(&frame, 1.0).expect("mask should succeed");

        for pixel in masked.bytes.chunks_exact(4) {
            assert_eq!(pixel, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn mask_with_half_opacity_matches_blend_formula() {
        let frame = gradient_frame(16, 16);
        let masked =
            ComposeHandler::apply_dim_mask(&frame, 0.5).expect("mask should succeed");

        // alpha = round(255 * 0.5) = 128，inverse = 127
        let inverse = 127u32;
        for (src, out) in frame.bytes.chunks_exact(4).zip(masked.bytes.chunks_exact(4)) {
            for channel in 0..3 {
                let expected = ((src[channel] as u32 * inverse + 127) / 255) as u8;
                assert_eq!(out[channel], expected);
            }
            assert_eq!(out[3], 255);
        }
    }

    #[test]
    fn mask_rejects_out_of_range_opacity() {
        let frame = gradient_frame(4, 4);

        let too_high = ComposeHandler::apply_dim_mask(&frame, 1.01);
        assert!(matches!(too_high, Err(ComposeError::InvalidInput(_))));

        let negative = ComposeHandler::apply_dim_mask(&frame, -0.01);
        assert!(matches!(negative, Err(ComposeError::InvalidInput(_))));

        let nan = ComposeHandler::apply_dim_mask(&frame, f32::NAN);
        assert!(matches!(nan, Err(ComposeError::InvalidInput(_))));
    }

    #[test]
    fn scale_produces_target_height_and_rounded_width() {
        let handler = handler();
        let config = handler.config_snapshot().expect("config snapshot failed");

        let decoded = image::load_from_memory(&create_png_bytes(1000, 500))
            .expect("test image should decode");
        let scaled = handler
            .scale_to_height(decoded, 500, &config)
            .expect("scale should succeed");

        assert_eq!(scaled.width, 1000);
        assert_eq!(scaled.height, 500);
        assert_eq!(scaled.bytes.len(), 1000 * 500 * 4);
    }

    #[test]
    fn scale_clamps_width_to_one_pixel_minimum() {
        let (width, height) = ComposeHandler::scaled_dimensions(1, 4000, 100);
        assert_eq!(width, 1);
        assert_eq!(height, 100);
    }

    #[test]
    fn decode_rejects_too_many_pixels() {
        let handler = handler();
        let mut config = handler.config_snapshot().expect("config snapshot failed");
        config.max_decoded_pixels = 1_000_000;

        let result = handler.decode_image(
            RawImageData {
                bytes: create_png_bytes(2000, 2000),
                source_hint: "test",
            },
            &config,
        );

        assert!(matches!(result, Err(ComposeError::MemoryExhausted(_))));
    }

    #[test]
    fn scale_rejects_target_over_memory_budget() {
        let handler = handler();
        let mut config = handler.config_snapshot().expect("config snapshot failed");
        config.max_raster_bytes = 8 * 1024 * 1024;

        let decoded =
            image::load_from_memory(&create_png_bytes(800, 600)).expect("test image should decode");

        // 800x600 本身在预算内，但放大到高度 4000 后约 81.4MB，必须在分配前被拒绝
        let result = handler.scale_to_height(decoded, 4000, &config);
        assert!(matches!(result, Err(ComposeError::MemoryExhausted(_))));
    }

    #[test]
    fn decode_rejects_corrupted_bytes() {
        let handler = handler();
        let config = handler.config_snapshot().expect("config snapshot failed");

        let result = handler.decode_image(
            RawImageData {
                bytes: vec![0x89, b'P', b'N', b'G', 1, 2, 3, 4],
                source_hint: "test",
            },
            &config,
        );

        assert!(matches!(result, Err(ComposeError::Decode(_))));
    }

    proptest! {
        #[test]
        fn scaled_dimensions_keep_aspect_ratio_within_rounding(
            source_width in 1u32..4000,
            source_height in 1u32..4000,
            target_height in 1u32..2000,
        ) {
            let (width, height) =
                ComposeHandler::scaled_dimensions(source_width, source_height, target_height);

            prop_assert_eq!(height, target_height);

            let source_ratio = source_width as f64 / source_height as f64;
            let output_ratio = width as f64 / target_height as f64;
            prop_assert!((output_ratio - source_ratio).abs() < 1.0 / target_height as f64);
        }

        #[test]
        fn mask_never_brightens_any_channel(opacity in 0.0f32..=1.0) {
            let frame = gradient_frame(8, 8);
            let masked = ComposeHandler::apply_dim_mask(&frame, opacity)
                .expect("mask should succeed");

            for (src, out) in frame.bytes.chunks_exact(4).zip(masked.bytes.chunks_exact(4)) {
                for channel in 0..3 {
                    prop_assert!(out[channel] <= src[channel]);
                }
                prop_assert_eq!(out[3], 255);
            }
        }
    }
}
