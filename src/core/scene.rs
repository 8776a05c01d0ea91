use crate::core::error::RasterError;
use crate::core::renderer::{DrawStats, Primitive, Renderer};
use crate::geometry::transform::TransformFactory;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// 场景文件中的一个三角形列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMesh {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<[usize; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl SceneMesh {
    pub fn positions(&self) -> Vec<Vector3<f32>> {
        self.positions.iter().map(|p| Vector3::from(*p)).collect()
    }

    pub fn colors(&self) -> Vec<Vector3<f32>> {
        self.colors.iter().map(|c| Vector3::from(*c)).collect()
    }
}

/// 相机参数，用于构建视图和投影矩阵
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCamera {
    pub eye: Point3<f32>,
    pub fov_y_deg: f32,
    pub aspect_ratio: f32,
    pub z_near: f32,
    pub z_far: f32,
}

/// 网格及其绘制变换
#[derive(Debug, Clone)]
pub struct Scene {
    pub meshes: Vec<SceneMesh>,
    pub camera: SceneCamera,
    /// 模型绕 z 轴旋转角度（度）
    pub angle_deg: f32,
}

impl Scene {
    /// 两个相互重叠的三角形，近的在 z = -2，远的在 z = -5
    pub fn default_meshes() -> Vec<SceneMesh> {
        vec![SceneMesh {
            positions: vec![
                [2.0, 0.0, -2.0],
                [0.0, 2.0, -2.0],
                [-2.0, 0.0, -2.0],
                [3.5, -1.0, -5.0],
                [2.5, 1.5, -5.0],
                [-1.0, 0.5, -5.0],
            ],
            indices: vec![[0, 1, 2], [3, 4, 5]],
            colors: vec![
                [217.0, 238.0, 185.0],
                [217.0, 238.0, 185.0],
                [217.0, 238.0, 185.0],
                [185.0, 217.0, 238.0],
                [185.0, 217.0, 238.0],
                [185.0, 217.0, 238.0],
            ],
        }]
    }

    /// 上传所有网格、设置变换并绘制，遇到第一个校验失败的网格即停止
    pub fn draw(&self, renderer: &mut Renderer) -> Result<DrawStats, RasterError> {
        renderer.set_model(TransformFactory::rotation_z(self.angle_deg));
        renderer.set_view(TransformFactory::view_from_eye(&self.camera.eye));
        renderer.set_projection(TransformFactory::perspective(
            self.camera.fov_y_deg,
            self.camera.aspect_ratio,
            self.camera.z_near,
            self.camera.z_far,
        ));

        let mut total = DrawStats::default();
        for mesh in &self.meshes {
            let pos = renderer.load_positions(mesh.positions());
            let ind = renderer.load_indices(mesh.indices.clone());
            let col = renderer.load_colors(mesh.colors());

            let stats = renderer.draw(pos, ind, col, Primitive::Triangle)?;
            total.drawn += stats.drawn;
            total.degenerate += stats.degenerate;
            total.singular += stats.singular;
            total.pixels_written += stats.pixels_written;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame_buffer::ClearMask;

    fn default_scene(width: usize, height: usize) -> Scene {
        Scene {
            meshes: Scene::default_meshes(),
            camera: SceneCamera {
                eye: Point3::new(0.0, 0.0, 5.0),
                fov_y_deg: 45.0,
                aspect_ratio: width as f32 / height as f32,
                z_near: 0.1,
                z_far: 50.0,
            },
            angle_deg: 0.0,
        }
    }

    #[test]
    fn default_scene_shows_near_triangle_in_front() {
        let mut renderer = Renderer::new(100, 100);
        renderer.clear(ClearMask::ALL);
        let stats = default_scene(100, 100).draw(&mut renderer).unwrap();
        assert_eq!(stats.drawn, 2);

        // (1.0, 0.5, -2) 的投影落在两个三角形内，z = -2 的更近
        let x = (50.0 * (1.0 + 2.4142 * 1.0 / 7.0)) as i64;
        let y = (50.0 * (1.0 + 2.4142 * 0.5 / 7.0)) as i64;
        let near_color = Vector3::new(217.0, 238.0, 185.0);
        assert_eq!(renderer.frame_buffer.color_at(x, y), Some(near_color));
    }

    #[test]
    fn invalid_mesh_is_reported() {
        let mut scene = default_scene(10, 10);
        scene.meshes[0].indices.push([0, 1, 6]);
        let mut renderer = Renderer::new(10, 10);
        assert!(matches!(
            scene.draw(&mut renderer),
            Err(RasterError::IndexOutOfRange { index: 6, .. })
        ));
    }
}
