use nalgebra::{Point2, Vector2, Vector3, Vector4};

const EPSILON: f32 = 1e-6; // 零面积阈值

#[inline(always)]
fn cross_2d(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// 屏幕空间有向面积的两倍（逆时针为正）
#[inline]
pub fn signed_area_x2(v: &[Vector4<f32>; 3]) -> f32 {
    cross_2d(v[1].xy() - v[0].xy(), v[2].xy() - v[0].xy())
}

/// 严格符号的覆盖测试。
///
/// 对每条边 (v0->v1, v1->v2, v2->v0) 计算边向量与起点到 `p` 向量的二维叉积，
/// 三个叉积全部严格为正或全部严格为负时点在三角形内，两种环绕方向都接受。
/// 恰好落在边上的点视为在外部，零面积三角形不覆盖任何点。
pub fn inside_triangle(p: Point2<f32>, v: &[Vector4<f32>; 3]) -> bool {
    let mut sign_sum = 0;
    for i in 0..3 {
        let start = v[i].xy();
        let end = v[(i + 1) % 3].xy();
        let cross = cross_2d(end - start, p.coords - start);
        if cross > 0.0 {
            sign_sum += 1;
        } else if cross < 0.0 {
            sign_sum -= 1;
        }
    }
    sign_sum == 3 || sign_sum == -3
}

/// `p` 在屏幕空间的重心坐标 (alpha, beta, gamma)，退化三角形返回 None
pub fn barycentric_2d(p: Point2<f32>, v: &[Vector4<f32>; 3]) -> Option<Vector3<f32>> {
    let area_x2 = signed_area_x2(v);
    if area_x2.abs() < EPSILON {
        return None;
    }

    // 每个权重 = 对顶点的子三角形面积 / 整个三角形面积
    let sub_area = |a: Vector2<f32>, b: Vector2<f32>| cross_2d(b - a, p.coords - a);
    let alpha = sub_area(v[1].xy(), v[2].xy()) / area_x2;
    let beta = sub_area(v[2].xy(), v[0].xy()) / area_x2;
    let gamma = sub_area(v[0].xy(), v[1].xy()) / area_x2;

    Some(Vector3::new(alpha, beta, gamma))
}

/// 透视校正插值。
///
/// `w` 为各顶点的裁剪空间 w。屏幕空间权重先除以 w，再归一化后作用于属性。
/// 只在 1/w 之和为零或非有限值时失败，因此对 MVP 的整体缩放不敏感。
pub fn perspective_correct<T>(bary: Vector3<f32>, w: [f32; 3], attributes: [T; 3]) -> Option<T>
where
    T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T> + Copy,
{
    let weights = [bary.x / w[0], bary.y / w[1], bary.z / w[2]];
    let inv_w_sum = weights[0] + weights[1] + weights[2];
    if inv_w_sum == 0.0 || !inv_w_sum.is_finite() {
        return None;
    }
    let w_reciprocal = 1.0 / inv_w_sum;
    if !w_reciprocal.is_finite() {
        return None;
    }

    let value = (attributes[0] * weights[0] + attributes[1] * weights[1] + attributes[2] * weights[2])
        * w_reciprocal;
    Some(value)
}

/// 深度插值 `w_rec * (a*z0/w0 + b*z1/w1 + c*z2/w2)`
#[inline]
pub fn interpolate_depth(bary: Vector3<f32>, v: &[Vector4<f32>; 3]) -> Option<f32> {
    perspective_correct(bary, [v[0].w, v[1].w, v[2].w], [v[0].z, v[1].z, v[2].z])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(points: [(f32, f32); 3]) -> [Vector4<f32>; 3] {
        points.map(|(x, y)| Vector4::new(x, y, 0.0, 1.0))
    }

    #[test]
    fn coverage_accepts_both_windings() {
        let ccw = tri([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let cw = tri([(0.0, 0.0), (0.0, 4.0), (4.0, 0.0)]);
        let p = Point2::new(1.0, 1.0);
        assert!(inside_triangle(p, &ccw));
        assert!(inside_triangle(p, &cw));
        assert!(!inside_triangle(Point2::new(3.0, 3.0), &ccw));
    }

    #[test]
    fn points_on_edges_and_vertices_are_outside() {
        let t = tri([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        assert!(!inside_triangle(Point2::new(2.0, 0.0), &t));
        assert!(!inside_triangle(Point2::new(2.0, 2.0), &t));
        assert!(!inside_triangle(Point2::new(0.0, 0.0), &t));
    }

    #[test]
    fn pixel_center_count_of_right_triangle() {
        let t = tri([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let mut covered = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                if inside_triangle(Point2::new(x as f32 + 0.5, y as f32 + 0.5), &t) {
                    covered.push((x, y));
                }
            }
        }
        // 满足 x + y + 1 < 4 的像素中心；x + y == 3 正好在斜边上
        assert_eq!(
            covered,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (0, 2)]
        );
    }

    #[test]
    fn shared_edge_is_owned_exactly_once_off_the_edge() {
        // 4x3 矩形沿 (0,0)-(4,3) 对角线切成两半
        let lower = tri([(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)]);
        let upper = tri([(0.0, 0.0), (4.0, 3.0), (0.0, 3.0)]);
        for sy in 1..12 {
            for sx in 1..16 {
                let p = Point2::new(sx as f32 * 0.25, sy as f32 * 0.25);
                let on_diagonal = (3.0 * p.x - 4.0 * p.y).abs() < 1e-6;
                let hits = inside_triangle(p, &lower) as u32 + inside_triangle(p, &upper) as u32;
                if on_diagonal {
                    assert_eq!(hits, 0, "diagonal sample {:?}", p);
                } else {
                    assert_eq!(hits, 1, "sample {:?}", p);
                }
            }
        }
    }

    #[test]
    fn degenerate_triangle_covers_nothing() {
        let t = tri([(0.0, 0.0), (2.0, 2.0), (4.0, 4.0)]);
        assert!(barycentric_2d(Point2::new(1.0, 1.0), &t).is_none());
        for sy in 0..8 {
            for sx in 0..8 {
                let p = Point2::new(sx as f32 * 0.5, sy as f32 * 0.5);
                assert!(!inside_triangle(p, &t));
            }
        }
    }

    #[test]
    fn barycentric_weights_sum_to_one_and_hit_vertices() {
        let t = tri([(1.0, 1.0), (6.0, 2.0), (2.0, 5.0)]);
        let b = barycentric_2d(Point2::new(6.0, 2.0), &t).unwrap();
        assert!((b - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-5);

        let b = barycentric_2d(Point2::new(3.0, 2.5), &t).unwrap();
        assert!((b.x + b.y + b.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_correct_differs_from_affine() {
        let v = [
            Vector4::new(0.0, 0.0, 0.2, 1.0),
            Vector4::new(8.0, 0.0, 0.6, 4.0),
            Vector4::new(0.0, 8.0, 0.9, 2.0),
        ];
        let bary = Vector3::new(0.25, 0.5, 0.25);

        let z = interpolate_depth(bary, &v).unwrap();
        let inv_w = 0.25 / 1.0 + 0.5 / 4.0 + 0.25 / 2.0;
        let expected = (0.25 * 0.2 / 1.0 + 0.5 * 0.6 / 4.0 + 0.25 * 0.9 / 2.0) / inv_w;
        let affine = 0.25 * 0.2 + 0.5 * 0.6 + 0.25 * 0.9;

        assert!((z - expected).abs() < 1e-6);
        assert!((z - affine).abs() > 1e-2);
    }

    #[test]
    fn perspective_correct_with_equal_w_is_affine() {
        let colors = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let bary = Vector3::new(0.2, 0.3, 0.5);
        let c = perspective_correct(bary, [3.0, 3.0, 3.0], colors).unwrap();
        assert!((c - Vector3::new(0.2, 0.3, 0.5)).norm() < 1e-6);
    }

    #[test]
    fn large_and_small_w_still_interpolate() {
        let bary = Vector3::new(0.2, 0.3, 0.5);
        for w in [3e6, 4e7, 1e-8] {
            let z = perspective_correct(bary, [w, w, w], [0.4, 0.4, 0.4]).unwrap();
            assert!((z - 0.4).abs() < 1e-5, "w = {}", w);
        }
        assert_eq!(perspective_correct(bary, [0.0, 0.0, 0.0], [0.4, 0.4, 0.4]), None);
    }
}
