use nalgebra::{Matrix4, Point3, Vector3, Vector4};

const W_RELATIVE_EPSILON: f32 = 1e-7;

/// 模型/视图/投影矩阵工厂
pub struct TransformFactory;

impl TransformFactory {
    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    /// 绕 z 轴旋转，角度制
    pub fn rotation_z(angle_deg: f32) -> Matrix4<f32> {
        Matrix4::from_euler_angles(0.0, 0.0, angle_deg.to_radians())
    }

    /// 相机位于 `eye`，朝 -z 看，+y 向上
    pub fn view_from_eye(eye: &Point3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(&-eye.coords)
    }

    /// 右手系透视投影。近平面映射到 NDC z = -1，远平面到 +1，
    /// 深度重映射后数值越小越近。
    pub fn perspective(fov_y_deg: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect_ratio, fov_y_deg.to_radians(), near, far)
    }
}

/// NDC 到屏幕空间的视口变换，深度重映射到固定的 near/far 区间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    depth_scale: f32,
    depth_offset: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize, z_near: f32, z_far: f32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            depth_scale: (z_far - z_near) / 2.0,
            depth_offset: (z_far + z_near) / 2.0,
        }
    }

    /// NDC -> (屏幕 x, 屏幕 y, 重映射深度)
    #[inline]
    pub fn ndc_to_screen(&self, ndc: &Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            0.5 * self.width * (ndc.x + 1.0),
            0.5 * self.height * (ndc.y + 1.0),
            ndc.z * self.depth_scale + self.depth_offset,
        )
    }
}

/// 单个顶点依次经过 MVP、透视除法和视口变换。
///
/// 结果的 x/y 为屏幕坐标，z 为重映射深度，w 保留除法前的裁剪空间 w，
/// 供之后的透视校正插值使用。
/// w 相对裁剪坐标的量级可视为零，或中间结果非有限时返回 `Err(w)`。
pub fn transform_vertex(
    mvp: &Matrix4<f32>,
    position: &Vector3<f32>,
    viewport: &Viewport,
) -> Result<Vector4<f32>, f32> {
    let clip = mvp * position.push(1.0);
    let w = clip.w;
    let magnitude = clip.amax();
    if !w.is_finite() || w.abs() <= magnitude * W_RELATIVE_EPSILON {
        return Err(w);
    }

    let ndc = clip.xyz() / w;
    let screen = viewport.ndc_to_screen(&ndc);
    if !screen.iter().all(|c| c.is_finite()) {
        return Err(w);
    }

    Ok(screen.push(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_ndc_corners_to_screen_corners() {
        let viewport = Viewport::new(100, 50, 0.1, 50.0);
        let mvp = Matrix4::identity();

        let v = transform_vertex(&mvp, &Vector3::new(-1.0, -1.0, -1.0), &viewport).unwrap();
        assert!((v - Vector4::new(0.0, 0.0, 0.1, 1.0)).norm() < 1e-5);

        let v = transform_vertex(&mvp, &Vector3::new(1.0, 1.0, 1.0), &viewport).unwrap();
        assert!((v - Vector4::new(100.0, 50.0, 50.0, 1.0)).norm() < 1e-4);
    }

    #[test]
    fn clip_w_is_preserved() {
        let viewport = Viewport::new(10, 10, 0.1, 50.0);
        let projection = TransformFactory::perspective(90.0, 1.0, 0.1, 50.0);
        let v = transform_vertex(&projection, &Vector3::new(0.0, 0.0, -4.0), &viewport).unwrap();
        assert!((v.w - 4.0).abs() < 1e-5);
        assert!((v.x - 5.0).abs() < 1e-5);
        assert!((v.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn nearer_points_get_smaller_depth() {
        let viewport = Viewport::new(10, 10, 0.1, 50.0);
        let mvp = TransformFactory::perspective(45.0, 1.0, 0.1, 50.0)
            * TransformFactory::view_from_eye(&Point3::new(0.0, 0.0, 5.0));
        let near = transform_vertex(&mvp, &Vector3::new(0.0, 0.0, -2.0), &viewport).unwrap();
        let far = transform_vertex(&mvp, &Vector3::new(0.0, 0.0, -5.0), &viewport).unwrap();
        assert!(near.z < far.z);
    }

    #[test]
    fn zero_w_is_rejected() {
        let viewport = Viewport::new(10, 10, 0.1, 50.0);
        let projection = TransformFactory::perspective(45.0, 1.0, 0.1, 50.0);
        // 位于相机平面上的点 w = 0
        let result = transform_vertex(&projection, &Vector3::new(1.0, 1.0, 0.0), &viewport);
        assert_eq!(result, Err(0.0));
    }

    #[test]
    fn uniform_scale_of_the_mvp_is_not_singular() {
        let viewport = Viewport::new(16, 16, 0.1, 50.0);
        let position = Vector3::new(0.5, -0.5, 0.25);
        let base = transform_vertex(&Matrix4::identity(), &position, &viewport).unwrap();
        for scale in [2e6_f32, 1e-8] {
            let v = transform_vertex(&(Matrix4::identity() * scale), &position, &viewport).unwrap();
            assert!((v.xyz() - base.xyz()).norm() < 1e-4, "scale {}", scale);
            assert_eq!(v.w, scale);
        }
    }

    #[test]
    fn rotation_z_turns_x_into_y() {
        let r = TransformFactory::rotation_z(90.0);
        let p = r * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p - Vector4::new(0.0, 1.0, 0.0, 1.0)).norm() < 1e-6);
    }
}
