//! 进度环模型模块
//!
//! 该模块承载进度环控件的全部可计算状态：进度值钳制与圆弧几何，
//! 为上层绘制代码提供统一、轻量、可复用的纯数值接口。
//!
//! # 设计思路
//!
//! - 将“数值与几何”从绘制流程中抽离，形成稳定的基础能力。
//! - 使用简单值对象承载状态，避免上层直接依赖绘制细节。
//! - 钳制规则集中在 setter 内，任何写入路径都经过同一条规则。
//!
//! # 实现思路
//!
//! - 进度低于 5 时钳制到 5，保证圆弧始终可见；高于 100 的值原样保留，
//!   这是既有观察到的行为，保持原样而不做额外解释。
//! - 圆弧从 12 点方向（-90°）起始，扫过角度按整数度截断。

/// 圆弧描边宽度（与绘制单位一致）。
pub const RING_STROKE_WIDTH: f32 = 5.0;

/// 进度最小可见值：低于该值一律钳制。
pub const MIN_VISIBLE_PROGRESS: i32 = 5;

/// 圆弧外接矩形。
///
/// 与绘制 API 的矩形语义一致：`left/top` 为左上角，`right/bottom` 为右下角。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// 进度环状态。
///
/// # 示例
/// ```
/// use wallpaper_editor::progress::RingProgress;
///
/// let mut ring = RingProgress::default();
/// ring.set_progress(50);
/// assert_eq!(ring.sweep_angle(), 180.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingProgress {
    progress: i32,
}

impl Default for RingProgress {
    /// 初始进度为 10，与控件首次出现时的占位弧长一致。
    fn default() -> Self {
        Self { progress: 10 }
    }
}

impl RingProgress {
    /// 以指定初始进度创建，初始值同样经过钳制。
    pub fn new(initial: i32) -> Self {
        let mut ring = Self::default();
        ring.set_progress(initial);
        ring
    }

    /// 写入进度值。
    ///
    /// 低于 [`MIN_VISIBLE_PROGRESS`] 的输入被钳制到下限；
    /// 高于 100 的输入原样保留（扫过角度相应超过 360°）。
    pub fn set_progress(&mut self, value: i32) {
        self.progress = value.max(MIN_VISIBLE_PROGRESS);
    }

    /// 当前进度值（钳制后）。
    pub fn progress(&self) -> i32 {
        self.progress
    }

    /// 圆弧起始角度：12 点方向。
    pub fn start_angle(&self) -> f32 {
        -90.0
    }

    /// 圆弧扫过角度（度），按整数度截断。
    pub fn sweep_angle(&self) -> f32 {
        ((360 * self.progress) as f32 / 100.0) as i32 as f32
    }

    /// 给定正方形边长，计算圆弧外接矩形。
    ///
    /// 圆心取边长一半（向下取整），半径向内收缩半个描边宽度，
    /// 保证描边不会越出控件边界。
    pub fn arc_bounds(&self, size: f32) -> ArcBounds {
        let center = (size / 2.0) as i32;
        let radius = (center as f32 - RING_STROKE_WIDTH / 2.0) as i32;

        ArcBounds {
            left: (center - radius) as f32,
            top: (center - radius) as f32,
            right: (center + radius) as f32,
            bottom: (center + radius) as f32,
        }
    }
}
