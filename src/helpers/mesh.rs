use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};
use globecore::starfield::StarPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Front faces point away from the center
    Outward,
    /// Front faces point toward the center, so only the far side of the shell is drawn
    Inward,
}

/// Direction for a UV coordinate. The shaders rebuild normals with the same mapping.
pub fn uv_to_direction(u: f32, v: f32) -> [f32; 3] {
    let theta = u * std::f32::consts::TAU;
    let phi = v * std::f32::consts::PI;
    [-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin()]
}

/// UV sphere with `segments` slices and stacks; v = 0 is the north pole.
pub fn uv_sphere(radius: f32, segments: u32, winding: Winding) -> Mesh {
    let size = segments.max(3);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for y in 0..=size {
        for x in 0..=size {
            let u = x as f32 / size as f32;
            let v = y as f32 / size as f32;
            let normal = uv_to_direction(u, v);

            positions.push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            normals.push(normal);
            uvs.push([u, v]);
        }
    }

    for y in 0..size {
        for x in 0..size {
            let i0 = y * (size + 1) + x;
            let i1 = i0 + 1;
            let i2 = i0 + (size + 1);
            let i3 = i2 + 1;

            match winding {
                Winding::Outward => indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]),
                Winding::Inward => indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]),
            }
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Point list; color carries (opacity, blink speed, blink offset, 1).
pub fn star_points(stars: &[StarPoint]) -> Mesh {
    let positions: Vec<[f32; 3]> = stars.iter().map(|star| star.position.to_array()).collect();
    let colors: Vec<[f32; 4]> = stars
        .iter()
        .map(|star| [star.opacity, star.blink_speed, star.blink_offset, 1.0])
        .collect();

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;
    use bevy::mesh::VertexAttributeValues;

    fn triangle_normal(positions: &[[f32; 3]], tri: &[u32]) -> (Vec3, Vec3) {
        let a = Vec3::from_array(positions[tri[0] as usize]);
        let b = Vec3::from_array(positions[tri[1] as usize]);
        let c = Vec3::from_array(positions[tri[2] as usize]);
        ((b - a).cross(c - a), (a + b + c) / 3.0)
    }

    fn facing(winding: Winding) -> Vec<f32> {
        let mesh = uv_sphere(2.0, 16, winding);
        let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
            panic!("positions missing");
        };
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("indices missing");
        };
        indices
            .chunks(3)
            .filter_map(|tri| {
                let (normal, center) = triangle_normal(positions, tri);
                // Pole triangles collapse to zero area
                (normal.length() > 1e-6).then(|| normal.normalize().dot(center.normalize()))
            })
            .collect()
    }

    #[test]
    fn test_outward_winding_faces_out() {
        assert!(facing(Winding::Outward).iter().all(|dot| *dot > 0.0));
    }

    #[test]
    fn test_inward_winding_faces_in() {
        assert!(facing(Winding::Inward).iter().all(|dot| *dot < 0.0));
    }

    #[test]
    fn test_vertices_sit_on_radius() {
        let mesh = uv_sphere(2.1, 8, Winding::Outward);
        let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
            panic!("positions missing");
        };
        assert_eq!(positions.len(), 81);
        for position in positions {
            assert!((Vec3::from_array(*position).length() - 2.1).abs() < 1e-5);
        }
    }

    #[test]
    fn test_uv_mapping_poles_and_equator() {
        let north = Vec3::from_array(uv_to_direction(0.3, 0.0));
        assert!(north.abs_diff_eq(Vec3::Y, 1e-6));
        let start = Vec3::from_array(uv_to_direction(0.0, 0.5));
        assert!(start.abs_diff_eq(-Vec3::X, 1e-6));
    }
}
