// geometry/mod.rs
// 坐标变换与屏幕空间插值
pub mod interpolation;
pub mod transform;
