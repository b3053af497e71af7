//! 预览叠层状态机模块
//!
//! # 设计思路
//!
//! 预览叠层的“显示中/隐藏中”过去常用一个布尔值加一个 `animating`
//! 标志位来守护，切换逻辑分散且容易在动画中途被打断。
//! 这里改为显式有限状态值：非法切换（动画期间再次切换）在类型层面
//! 就没有对应转移，只能被拒绝。
//!
//! # 实现思路
//!
//! 状态与转移：
//!
//! ```text
//!            toggle                finish_animation
//!  Hidden ──────────▶ FadingIn ──────────────────▶ Shown
//!    ▲                                               │
//!    │ finish_animation                       toggle │
//!    └─────────────── FadingOut ◀────────────────────┘
//!
//!  FadingIn / FadingOut 期间的 toggle 一律拒绝（返回 false）。
//! ```

/// 预览叠层的显示状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// 完全隐藏。
    Hidden,
    /// 淡入动画进行中。
    FadingIn,
    /// 完全显示。
    Shown,
    /// 淡出动画进行中。
    FadingOut,
}

/// 预览叠层切换器。
///
/// # 示例
/// ```
/// use wallpaper_editor::preview::{PreviewState, PreviewToggle};
///
/// let mut toggle = PreviewToggle::new();
/// assert!(toggle.toggle());
/// assert_eq!(toggle.state(), PreviewState::FadingIn);
///
/// // 动画期间的再次切换被拒绝
/// assert!(!toggle.toggle());
///
/// toggle.finish_animation();
/// assert_eq!(toggle.state(), PreviewState::Shown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewToggle {
    state: PreviewState,
}

impl Default for PreviewToggle {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewToggle {
    /// 初始为隐藏状态。
    pub fn new() -> Self {
        Self {
            state: PreviewState::Hidden,
        }
    }

    /// 请求切换显示/隐藏。
    ///
    /// 仅在稳定状态（`Hidden` / `Shown`）下生效并返回 `true`；
    /// 动画期间返回 `false` 且状态不变。
    pub fn toggle(&mut self) -> bool {
        match self.state {
            PreviewState::Hidden => {
                self.state = PreviewState::FadingIn;
                true
            }
            PreviewState::Shown => {
                self.state = PreviewState::FadingOut;
                true
            }
            PreviewState::FadingIn | PreviewState::FadingOut => false,
        }
    }

    /// 动画结束回调：把过渡状态推进到对应的稳定状态。
    ///
    /// 稳定状态下调用是无害的空操作。
    pub fn finish_animation(&mut self) {
        self.state = match self.state {
            PreviewState::FadingIn => PreviewState::Shown,
            PreviewState::FadingOut => PreviewState::Hidden,
            stable => stable,
        };
    }

    /// 当前状态。
    pub fn state(&self) -> PreviewState {
        self.state
    }

    /// 目标可见性：淡入中与已显示都视为“可见方向”。
    pub fn is_visible(&self) -> bool {
        matches!(self.state, PreviewState::FadingIn | PreviewState::Shown)
    }

    /// 是否处于动画过渡中。
    pub fn is_animating(&self) -> bool {
        matches!(self.state, PreviewState::FadingIn | PreviewState::FadingOut)
    }
}
