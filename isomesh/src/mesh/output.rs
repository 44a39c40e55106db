//! Mesh output implementation
use super::{normals::face_normal, Mesh};
use std::io::{BufWriter, Write};

impl Mesh {
    /// Writes a binary STL to the given output
    ///
    /// Facet normals are recomputed from vertex positions, so the mesh's own
    /// normals (and color) are not written.
    pub fn write_stl<F: std::io::Write>(
        &self,
        out: &mut F,
    ) -> Result<(), crate::Error> {
        // Many small writes, typically to a file
        let mut out = BufWriter::new(out);
        const HEADER: &[u8] = b"Binary STL exported by isomesh";
        static_assertions::const_assert!(HEADER.len() <= 80);
        out.write_all(HEADER)?;
        out.write_all(&[0u8; 80 - HEADER.len()])?;
        out.write_all(&(self.triangle_count() as u32).to_le_bytes())?;
        for [a, b, c] in self.triangles() {
            let normal = face_normal(a, b, c);
            for p in &normal {
                out.write_all(&p.to_le_bytes())?;
            }
            for v in [a, b, c] {
                for p in &v {
                    out.write_all(&p.to_le_bytes())?;
                }
            }
            out.write_all(&[0u8; std::mem::size_of::<u16>()])?; // attributes
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_stl_layout() {
        let mesh = Mesh {
            coords: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            connections: None,
            normals: vec![Vector3::new(0.0, 0.0, 1.0); 3],
            color: [255, 0, 0],
        };
        let mut buf = vec![];
        mesh.write_stl(&mut buf).unwrap();
        assert_eq!(buf.len(), 80 + 4 + 50);
        assert_eq!(&buf[80..84], &1u32.to_le_bytes());

        let normal_z = f32::from_le_bytes(buf[92..96].try_into().unwrap());
        assert_eq!(normal_z, 1.0);
        let second_x = f32::from_le_bytes(buf[108..112].try_into().unwrap());
        assert_eq!(second_x, 1.0);
    }
}
