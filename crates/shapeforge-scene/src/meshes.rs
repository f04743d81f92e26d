//! Mesh construction for the primitive shape catalog
//!
//! Most shapes map onto Bevy's primitive mesh builders. The torus knot and the
//! four platonic solids have no Bevy counterpart and are generated here, flat
//! shaded like their Three.js equivalents with detail 0.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use shapeforge_core::{GeometryDescriptor, PrimitiveShape};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Build the renderable mesh for a resolved geometry
pub fn build_mesh(geometry: &GeometryDescriptor) -> Mesh {
    let arg = |i: usize, default: f64| geometry.arg(i, default) as f32;
    let segments = |i: usize, default: f64| geometry.arg(i, default).max(1.0) as u32;

    match geometry.shape {
        PrimitiveShape::Box => Mesh::from(Cuboid::new(arg(0, 2.0), arg(1, 2.0), arg(2, 2.0))),
        PrimitiveShape::Sphere => Sphere::new(arg(0, 1.5))
            .mesh()
            .uv(segments(1, 32.0), segments(2, 32.0)),
        PrimitiveShape::Plane => Mesh::from(Rectangle::new(arg(0, 4.0), arg(1, 4.0))),
        PrimitiveShape::Circle => Circle::new(arg(0, 2.0))
            .mesh()
            .resolution(segments(1, 32.0))
            .build(),
        PrimitiveShape::Cone => Cone {
            radius: arg(0, 1.5),
            height: arg(1, 3.0),
        }
        .mesh()
        .resolution(segments(2, 32.0))
        .build(),
        // Three.js takes top and bottom radii; Bevy's cylinder has one
        PrimitiveShape::Cylinder => Cylinder::new(arg(0, 1.0), arg(2, 3.0))
            .mesh()
            .resolution(segments(3, 32.0))
            .build(),
        PrimitiveShape::Torus => {
            let radius = arg(0, 1.0);
            let tube = arg(1, 0.4);
            Torus::new(radius - tube, radius + tube)
                .mesh()
                .minor_resolution(segments(2, 16.0) as _)
                .major_resolution(segments(3, 100.0) as _)
                .build()
                // Bevy's torus lies in XZ, Three.js's in XY
                .rotated_by(Quat::from_rotation_x(FRAC_PI_2))
        }
        PrimitiveShape::TorusKnot => torus_knot(
            arg(0, 1.0),
            arg(1, 0.3),
            segments(2, 100.0),
            segments(3, 16.0),
            2,
            3,
        ),
        PrimitiveShape::Dodecahedron => flat_mesh(&dodecahedron(arg(0, 1.0))),
        PrimitiveShape::Icosahedron => flat_mesh(&icosahedron(arg(0, 1.0))),
        PrimitiveShape::Octahedron => flat_mesh(&octahedron(arg(0, 1.0))),
        PrimitiveShape::Tetrahedron => flat_mesh(&tetrahedron(arg(0, 1.0))),
        PrimitiveShape::Ring => Annulus::new(arg(0, 1.0), arg(1, 2.0))
            .mesh()
            .resolution(segments(2, 32.0))
            .build(),
        PrimitiveShape::Capsule => Capsule3d::new(arg(0, 1.0), arg(1, 2.0))
            .mesh()
            .latitudes((segments(2, 8.0) * 2) as _)
            .longitudes(segments(3, 16.0) as _)
            .build(),
    }
}

/// Torus knot following the (p, q) parametrization with a tube swept along it
fn torus_knot(radius: f32, tube: f32, tubular: u32, radial: u32, p: u32, q: u32) -> Mesh {
    let (p, q) = (p as f32, q as f32);
    let curve = |u: f32| {
        let q_over_p = q / p * u;
        let cs = q_over_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * u.sin() * 0.5,
            radius * q_over_p.sin() * 0.5,
        )
    };

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();

    for j in 0..=tubular {
        let u = j as f32 / tubular as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        let t = p2 - p1;
        let n = p2 + p1;
        let b = t.cross(n).normalize();
        let n = b.cross(t).normalize();

        for i in 0..=radial {
            let v = i as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let vertex = p1 + n * cx + b * cy;

            positions.push(vertex.to_array());
            normals.push((vertex - p1).normalize_or_zero().to_array());
            uvs.push([j as f32 / tubular as f32, i as f32 / radial as f32]);
        }
    }

    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = (radial + 1) * (j - 1) + (i - 1);
            let b = (radial + 1) * j + (i - 1);
            let c = (radial + 1) * j + i;
            let d = (radial + 1) * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

/// Convex polyhedron as vertices and outward-wound polygon faces
#[derive(Debug, Clone)]
pub struct Polyhedron {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Vec<usize>>,
}

/// Every triple of vertices whose pairwise distances equal the edge length
fn triangles_by_edge(vertices: &[Vec3], edge: f32) -> Vec<Vec<usize>> {
    let is_edge = |a: usize, b: usize| (vertices[a].distance(vertices[b]) - edge).abs() < 1e-3;
    let mut faces = Vec::new();
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if !is_edge(i, j) {
                continue;
            }
            for k in (j + 1)..vertices.len() {
                if is_edge(i, k) && is_edge(j, k) {
                    faces.push(vec![i, j, k]);
                }
            }
        }
    }
    faces
}

/// Project every vertex onto the sphere of `radius` and wind faces outward
fn finish(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>, radius: f32) -> Polyhedron {
    let vertices: Vec<Vec3> = vertices.into_iter().map(|v| v.normalize() * radius).collect();
    let faces = faces
        .into_iter()
        .map(|mut face| {
            let centroid = face.iter().map(|&i| vertices[i]).sum::<Vec3>() / face.len() as f32;
            let normal = (vertices[face[1]] - vertices[face[0]])
                .cross(vertices[face[2]] - vertices[face[0]]);
            if normal.dot(centroid) < 0.0 {
                face.reverse();
            }
            face
        })
        .collect();
    Polyhedron { vertices, faces }
}

pub fn tetrahedron(radius: f32) -> Polyhedron {
    let vertices = vec![
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];
    let faces = triangles_by_edge(&vertices, 8.0_f32.sqrt());
    finish(vertices, faces, radius)
}

pub fn octahedron(radius: f32) -> Polyhedron {
    let vertices = vec![
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let faces = triangles_by_edge(&vertices, 2.0_f32.sqrt());
    finish(vertices, faces, radius)
}

pub fn icosahedron(radius: f32) -> Polyhedron {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let vertices = vec![
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    let faces = triangles_by_edge(&vertices, 2.0);
    finish(vertices, faces, radius)
}

/// Dual of the icosahedron: one vertex per icosahedron face, one pentagon per
/// icosahedron vertex
pub fn dodecahedron(radius: f32) -> Polyhedron {
    let ico = icosahedron(1.0);
    let vertices: Vec<Vec3> = ico
        .faces
        .iter()
        .map(|face| face.iter().map(|&i| ico.vertices[i]).sum::<Vec3>() / 3.0)
        .collect();

    let faces = (0..ico.vertices.len())
        .map(|corner| {
            let axis = ico.vertices[corner].normalize();
            // Any vector not parallel to the axis gives a tangent basis
            let reference = if axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
            let u = axis.cross(reference).normalize();
            let v = axis.cross(u);

            let mut around: Vec<(f32, usize)> = ico
                .faces
                .iter()
                .enumerate()
                .filter(|(_, face)| face.contains(&corner))
                .map(|(index, _)| {
                    let d = vertices[index];
                    (d.dot(v).atan2(d.dot(u)), index)
                })
                .collect();
            around.sort_by(|a, b| a.0.total_cmp(&b.0));
            around.into_iter().map(|(_, index)| index).collect()
        })
        .collect();

    finish(vertices, faces, radius)
}

/// Flat-shaded mesh: every face gets its own vertices and normal
pub fn flat_mesh(polyhedron: &Polyhedron) -> Mesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();

    for face in &polyhedron.faces {
        let corners: Vec<Vec3> = face.iter().map(|&i| polyhedron.vertices[i]).collect();
        let normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .normalize_or_zero();
        // Fan triangulation; faces are convex
        for k in 1..corners.len() - 1 {
            for corner in [corners[0], corners[k], corners[k + 1]] {
                positions.push(corner.to_array());
                normals.push(normal.to_array());
                let dir = corner.normalize_or_zero();
                uvs.push([
                    0.5 + dir.z.atan2(dir.x) / TAU,
                    0.5 - dir.y.asin() / std::f32::consts::PI,
                ]);
            }
        }
    }

    let indices: Vec<u32> = (0..positions.len() as u32).collect();
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeforge_core::resolve;

    fn assert_outward(poly: &Polyhedron) {
        for face in &poly.faces {
            let c: Vec3 = face.iter().map(|&i| poly.vertices[i]).sum::<Vec3>() / face.len() as f32;
            let n = (poly.vertices[face[1]] - poly.vertices[face[0]])
                .cross(poly.vertices[face[2]] - poly.vertices[face[0]]);
            assert!(n.dot(c) > 0.0);
        }
    }

    #[test]
    fn test_platonic_face_counts() {
        let cases = [
            (tetrahedron(1.0), 4, 4, 3),
            (octahedron(1.0), 6, 8, 3),
            (icosahedron(1.0), 12, 20, 3),
            (dodecahedron(1.0), 20, 12, 5),
        ];
        for (poly, vertices, faces, sides) in cases {
            assert_eq!(poly.vertices.len(), vertices);
            assert_eq!(poly.faces.len(), faces);
            assert!(poly.faces.iter().all(|f| f.len() == sides));
            assert_outward(&poly);
        }
    }

    #[test]
    fn test_vertices_on_radius() {
        let poly = dodecahedron(2.5);
        for v in &poly.vertices {
            assert!((v.length() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dodecahedron_faces_are_planar_pentagons() {
        let poly = dodecahedron(1.0);
        for face in &poly.faces {
            let normal = (poly.vertices[face[1]] - poly.vertices[face[0]])
                .cross(poly.vertices[face[2]] - poly.vertices[face[0]])
                .normalize();
            for &i in face {
                let offset = poly.vertices[i] - poly.vertices[face[0]];
                assert!(offset.dot(normal).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_torus_knot_vertex_count() {
        let mesh = torus_knot(1.0, 0.3, 100, 16, 2, 3);
        assert_eq!(mesh.count_vertices(), 101 * 17);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices.len(), 100 * 16 * 6),
            _ => panic!("expected u32 indices"),
        }
    }

    #[test]
    fn test_every_shape_builds() {
        for shape in PrimitiveShape::ALL {
            let mesh = build_mesh(&resolve(shape.name()));
            assert!(mesh.count_vertices() > 0, "{} has no vertices", shape);
        }
    }
}
