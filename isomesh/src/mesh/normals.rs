//! Normal strategies
//!
//! None of these normalize their output; face normals are the raw cross
//! product `(b - a) × (c - a)`, whose length is twice the triangle's area.
use nalgebra::Vector3;

/// Computes the unnormalized normal of a triangle
#[inline]
pub fn face_normal(
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
) -> Vector3<f32> {
    (b - a).cross(&(c - a))
}

/// Flat normals for an unwelded mesh, where every 3 vertices form a triangle
pub fn duplicated(vertices: &[Vector3<f32>]) -> Vec<Vector3<f32>> {
    debug_assert_eq!(vertices.len() % 3, 0);
    vertices
        .chunks_exact(3)
        .flat_map(|t| {
            let n = face_normal(t[0], t[1], t[2]);
            [n; 3]
        })
        .collect()
}

/// Per-face normals written through to shared vertices
///
/// Each triangle stores its face normal into all three of its vertices, so a
/// shared vertex ends up holding the normal of the last triangle to touch it.
pub fn per_face(
    vertices: &[Vector3<f32>],
    triangles: &[Vector3<u32>],
) -> Vec<Vector3<f32>> {
    let mut out = vec![Vector3::zeros(); vertices.len()];
    for t in triangles {
        let [a, b, c] = [t.x, t.y, t.z].map(|i| i as usize);
        let n = face_normal(vertices[a], vertices[b], vertices[c]);
        out[a] = n;
        out[b] = n;
        out[c] = n;
    }
    out
}

/// Per-vertex normals, accumulated over every adjacent triangle
pub fn per_vertex(
    vertices: &[Vector3<f32>],
    triangles: &[Vector3<u32>],
) -> Vec<Vector3<f32>> {
    let mut out = vec![Vector3::zeros(); vertices.len()];
    for t in triangles {
        let [a, b, c] = [t.x, t.y, t.z].map(|i| i as usize);
        let n = face_normal(vertices[a], vertices[b], vertices[c]);
        out[a] += n;
        out[b] += n;
        out[c] += n;
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn quad() -> (Vec<Vector3<f32>>, Vec<Vector3<u32>>) {
        let verts = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let tris = vec![Vector3::new(0, 1, 2), Vector3::new(0, 2, 3)];
        (verts, tris)
    }

    #[test]
    fn test_face_normal() {
        let n = face_normal(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        );
        assert_eq!(n, Vector3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_per_vertex() {
        let (verts, tris) = quad();
        let n = per_vertex(&verts, &tris);
        assert_eq!(n[0], Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(n[1], Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(n[2], Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(n[3], Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_per_face() {
        let (mut verts, tris) = quad();
        verts[3].z = 1.0; // tilt the second triangle
        let n = per_face(&verts, &tris);
        let second = face_normal(verts[0], verts[2], verts[3]);
        assert_eq!(n[0], second);
        assert_eq!(n[1], Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(n[2], second);
        assert_eq!(n[3], second);
    }

    #[test]
    fn test_duplicated() {
        let (verts, _) = quad();
        let n = duplicated(&verts[..3]);
        assert_eq!(n, vec![Vector3::new(0.0, 0.0, 1.0); 3]);
    }
}
