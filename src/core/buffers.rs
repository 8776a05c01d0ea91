use crate::core::error::{BufferKind, RasterError};
use nalgebra::Vector3;
use std::collections::HashMap;

/// 顶点位置缓冲句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PosBufId(pub(crate) usize);

/// 索引缓冲句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndBufId(pub(crate) usize);

/// 颜色缓冲句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColBufId(pub(crate) usize);

impl PosBufId {
    pub fn id(&self) -> usize {
        self.0
    }
}

impl IndBufId {
    pub fn id(&self) -> usize {
        self.0
    }
}

impl ColBufId {
    pub fn id(&self) -> usize {
        self.0
    }
}

/// 渲染器持有的全部几何数据。
///
/// 三类缓冲共用一个 id 计数器，某一类的句柄不会指向另一类的缓冲，id 也不会复用。
#[derive(Debug, Default)]
pub struct GeometryBuffers {
    next_id: usize,
    positions: HashMap<usize, Vec<Vector3<f32>>>,
    indices: HashMap<usize, Vec<[usize; 3]>>,
    colors: HashMap<usize, Vec<Vector3<f32>>>,
}

impl GeometryBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn load_positions(&mut self, positions: Vec<Vector3<f32>>) -> PosBufId {
        let id = self.next_id();
        self.positions.insert(id, positions);
        PosBufId(id)
    }

    pub fn load_indices(&mut self, indices: Vec<[usize; 3]>) -> IndBufId {
        let id = self.next_id();
        self.indices.insert(id, indices);
        IndBufId(id)
    }

    pub fn load_colors(&mut self, colors: Vec<Vector3<f32>>) -> ColBufId {
        let id = self.next_id();
        self.colors.insert(id, colors);
        ColBufId(id)
    }

    pub fn positions(&self, handle: PosBufId) -> Result<&[Vector3<f32>], RasterError> {
        self.positions
            .get(&handle.0)
            .map(Vec::as_slice)
            .ok_or(RasterError::InvalidHandle {
                kind: BufferKind::Position,
                id: handle.0,
            })
    }

    pub fn indices(&self, handle: IndBufId) -> Result<&[[usize; 3]], RasterError> {
        self.indices
            .get(&handle.0)
            .map(Vec::as_slice)
            .ok_or(RasterError::InvalidHandle {
                kind: BufferKind::Index,
                id: handle.0,
            })
    }

    pub fn colors(&self, handle: ColBufId) -> Result<&[Vector3<f32>], RasterError> {
        self.colors
            .get(&handle.0)
            .map(Vec::as_slice)
            .ok_or(RasterError::InvalidHandle {
                kind: BufferKind::Color,
                id: handle.0,
            })
    }
}

/// 检查每个索引三元组是否在位置和颜色数组范围内
pub fn validate_indices(
    indices: &[[usize; 3]],
    position_count: usize,
    color_count: usize,
) -> Result<(), RasterError> {
    for (triangle, triple) in indices.iter().enumerate() {
        for &index in triple {
            if index >= position_count {
                return Err(RasterError::IndexOutOfRange {
                    triangle,
                    kind: BufferKind::Position,
                    index,
                    len: position_count,
                });
            }
            if index >= color_count {
                return Err(RasterError::IndexOutOfRange {
                    triangle,
                    kind: BufferKind::Color,
                    index,
                    len: color_count,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_fresh_across_kinds() {
        let mut buffers = GeometryBuffers::new();
        let p = buffers.load_positions(vec![Vector3::zeros()]);
        let i = buffers.load_indices(vec![[0, 0, 0]]);
        let c = buffers.load_colors(vec![Vector3::zeros()]);
        assert_eq!((p.id(), i.id(), c.id()), (0, 1, 2));

        // 索引句柄的 id 不是合法的位置句柄
        let forged = PosBufId(i.id());
        assert_eq!(
            buffers.positions(forged),
            Err(RasterError::InvalidHandle {
                kind: BufferKind::Position,
                id: 1
            })
        );
    }

    #[test]
    fn loaded_data_is_returned_unchanged() {
        let mut buffers = GeometryBuffers::new();
        let data = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 5.5, 0.25)];
        let p = buffers.load_positions(data.clone());
        assert_eq!(buffers.positions(p).unwrap(), data.as_slice());
    }

    #[test]
    fn index_validation_reports_first_offender() {
        let err = validate_indices(&[[0, 1, 2], [1, 2, 7]], 3, 8).unwrap_err();
        assert_eq!(
            err,
            RasterError::IndexOutOfRange {
                triangle: 1,
                kind: BufferKind::Position,
                index: 7,
                len: 3
            }
        );

        let err = validate_indices(&[[0, 1, 2]], 3, 2).unwrap_err();
        assert!(matches!(
            err,
            RasterError::IndexOutOfRange {
                kind: BufferKind::Color,
                index: 2,
                ..
            }
        ));

        assert!(validate_indices(&[[0, 1, 2]], 3, 3).is_ok());
    }
}
