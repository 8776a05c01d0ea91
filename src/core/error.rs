use std::fmt;

/// 句柄或索引所指的缓冲类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Position,
    Index,
    Color,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferKind::Position => "position",
            BufferKind::Index => "index",
            BufferKind::Color => "color",
        };
        f.write_str(name)
    }
}

/// 光栅化管线错误。
///
/// `InvalidHandle` 和 `IndexOutOfRange` 在修改任何缓冲之前中止整个绘制调用。
/// `DegenerateTriangle` 和 `DivisionSingularity` 只针对单个三角形，绘制循环跳过它继续执行。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RasterError {
    #[error("未知的 {kind} 缓冲句柄 {id}")]
    InvalidHandle { kind: BufferKind, id: usize },

    #[error("三角形 {triangle} 引用了 {kind} 索引 {index}，但只加载了 {len} 个")]
    IndexOutOfRange {
        triangle: usize,
        kind: BufferKind,
        index: usize,
        len: usize,
    },

    #[error("三角形 {triangle} 的屏幕面积为零")]
    DegenerateTriangle { triangle: usize },

    #[error("三角形 {triangle}: 顶点 {vertex} 的裁剪空间 w = {w} 不可用")]
    DivisionSingularity {
        triangle: usize,
        vertex: usize,
        w: f32,
    },
}
