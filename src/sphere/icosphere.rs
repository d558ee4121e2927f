//! Subdivided icosahedron vertex sets.
//!
//! The regular icosahedron is centrally symmetric and midpoint subdivision
//! keeps that property, so every level is an antipodally paired sphere.

use ndarray::Array2;
use std::collections::HashMap;

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Vertices of an icosahedron subdivided `levels` times, projected onto the
/// unit sphere. Level `k` has `10 · 4^k + 2` vertices (12, 42, 162, 642, ...).
pub fn icosphere_vertices(levels: usize) -> Array2<f64> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut vertices: Vec<[f64; 3]> = [
        [-1.0, phi, 0.0], [1.0, phi, 0.0], [-1.0, -phi, 0.0], [1.0, -phi, 0.0],
        [0.0, -1.0, phi], [0.0, 1.0, phi], [0.0, -1.0, -phi], [0.0, 1.0, -phi],
        [phi, 0.0, -1.0], [phi, 0.0, 1.0], [-phi, 0.0, -1.0], [-phi, 0.0, 1.0],
    ]
    .iter()
    .map(|&v| project(v))
    .collect();
    let mut faces = ICOSAHEDRON_FACES.to_vec();

    for _ in 0..levels {
        faces = subdivide(&mut vertices, &faces);
    }

    let mut result = Array2::zeros((vertices.len(), 3));
    for (mut row, v) in result.rows_mut().into_iter().zip(&vertices) {
        row[0] = v[0];
        row[1] = v[1];
        row[2] = v[2];
    }
    result
}

fn project(v: [f64; 3]) -> [f64; 3] {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / norm, v[1] / norm, v[2] / norm]
}

// Splits every face into four, sharing edge midpoints between neighbours.
fn subdivide(vertices: &mut Vec<[f64; 3]>, faces: &[[usize; 3]]) -> Vec<[usize; 3]> {
    let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
    let mut midpoint = |a: usize, b: usize, vertices: &mut Vec<[f64; 3]>| -> usize {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            let (p, q) = (vertices[a], vertices[b]);
            vertices.push(project([p[0] + q[0], p[1] + q[1], p[2] + q[2]]));
            vertices.len() - 1
        })
    };

    let mut refined = Vec::with_capacity(faces.len() * 4);
    for &[a, b, c] in faces {
        let ab = midpoint(a, b, vertices);
        let bc = midpoint(b, c, vertices);
        let ca = midpoint(c, a, vertices);
        refined.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
    }
    refined
}
