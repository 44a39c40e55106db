//! Structured scalar grids
//!
//! A [`StructuredGrid`] is a regular 3D array of samples, stored as a flat
//! buffer with `x` varying fastest:
//! ```text
//! index(x, y, z) = x + y * nx + z * nx * ny
//! ```
//!
//! Samples may be any of ten numeric element types; they are stored in a
//! closed [`Values`] variant so that algorithms can be written once over a
//! generic [`Sample`] and dispatched a single time at the grid boundary.
use std::sync::OnceLock;

use num_traits::AsPrimitive;

use crate::Error;

/// Tag for the element type of a [`Values`] buffer
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum ElementType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ElementType {
    /// Size of a single sample, in bytes
    pub fn size(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::U64 | ElementType::F64 => 8,
        }
    }
}

/// A numeric sample type which may be stored in a grid
///
/// Every sample is compared and interpolated in double precision, regardless
/// of its storage type.
pub trait Sample: Copy + Send + Sync + AsPrimitive<f64> + 'static {
    /// Tag associated with this type
    const TYPE: ElementType;

    /// Decodes a sample from exactly `TYPE.size()` little-endian bytes
    fn from_le(bytes: &[u8]) -> Self;

    /// Converts to `f64`
    #[inline]
    fn to_f64(self) -> f64 {
        self.as_()
    }
}

macro_rules! impl_sample {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Sample for $t {
                const TYPE: ElementType = ElementType::$tag;
                fn from_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(bytes);
                    <$t>::from_le_bytes(buf)
                }
            }

            impl From<Vec<$t>> for Values {
                fn from(v: Vec<$t>) -> Self {
                    Values::$tag(v)
                }
            }
        )*
    };
}

impl_sample!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
);

/// Flat sample buffer, tagged by element type
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Values {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Binds the typed slice inside a [`Values`] and evaluates `$body` for it
///
/// `$body` is expanded once per element type, so it may call generic code.
macro_rules! with_values {
    ($values:expr, |$v:ident| $body:expr) => {
        match $values {
            $crate::grid::Values::I8($v) => $body,
            $crate::grid::Values::I16($v) => $body,
            $crate::grid::Values::I32($v) => $body,
            $crate::grid::Values::I64($v) => $body,
            $crate::grid::Values::U8($v) => $body,
            $crate::grid::Values::U16($v) => $body,
            $crate::grid::Values::U32($v) => $body,
            $crate::grid::Values::U64($v) => $body,
            $crate::grid::Values::F32($v) => $body,
            $crate::grid::Values::F64($v) => $body,
        }
    };
}
pub(crate) use with_values;

impl Values {
    /// Returns the element type of this buffer
    pub fn element_type(&self) -> ElementType {
        fn tag<T: Sample>(_: &[T]) -> ElementType {
            T::TYPE
        }
        with_values!(self, |v| tag(v))
    }

    /// Returns the number of samples
    pub fn len(&self) -> usize {
        with_values!(self, |v| v.len())
    }

    /// Checks whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the sample at the given index, cast to `f64`
    ///
    /// # Panics
    /// If `i` is out of bounds
    pub fn get(&self, i: usize) -> f64 {
        with_values!(self, |v| v[i].to_f64())
    }

    /// Decodes a buffer of little-endian samples
    pub fn from_le_bytes(ty: ElementType, bytes: &[u8]) -> Result<Self, Error> {
        fn decode<T: Sample>(bytes: &[u8]) -> Vec<T> {
            bytes
                .chunks_exact(T::TYPE.size())
                .map(T::from_le)
                .collect()
        }
        if bytes.len() % ty.size() != 0 {
            return Err(Error::BadByteLength(bytes.len(), ty.size()));
        }
        let out = match ty {
            ElementType::I8 => decode::<i8>(bytes).into(),
            ElementType::I16 => decode::<i16>(bytes).into(),
            ElementType::I32 => decode::<i32>(bytes).into(),
            ElementType::I64 => decode::<i64>(bytes).into(),
            ElementType::U8 => decode::<u8>(bytes).into(),
            ElementType::U16 => decode::<u16>(bytes).into(),
            ElementType::U32 => decode::<u32>(bytes).into(),
            ElementType::U64 => decode::<u64>(bytes).into(),
            ElementType::F32 => decode::<f32>(bytes).into(),
            ElementType::F64 => decode::<f64>(bytes).into(),
        };
        Ok(out)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A structured volume of samples on an integer lattice
///
/// Samples sit at integer coordinates `(x, y, z)`; there is no spacing or
/// origin, so callers which need world coordinates should transform the
/// resulting geometry.
#[derive(Debug)]
pub struct StructuredGrid {
    resolution: [usize; 3],
    veclen: usize,
    values: Values,

    /// Cached `(min, max)`, computed on first use
    min_max: OnceLock<(f64, f64)>,
}

impl StructuredGrid {
    /// Builds a new grid, checking that the value count matches
    pub fn new(
        resolution: [usize; 3],
        veclen: usize,
        values: impl Into<Values>,
    ) -> Result<Self, Error> {
        let values = values.into();
        if resolution.contains(&0) {
            return Err(Error::BadResolution(resolution));
        }
        if veclen == 0 {
            return Err(Error::ZeroVeclen);
        }
        let expected = resolution.iter().product::<usize>() * veclen;
        if values.len() != expected {
            return Err(Error::BadValueCount {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            resolution,
            veclen,
            values,
            min_max: OnceLock::new(),
        })
    }

    /// Builds a scalar grid (`veclen = 1`)
    pub fn scalar(
        resolution: [usize; 3],
        values: impl Into<Values>,
    ) -> Result<Self, Error> {
        Self::new(resolution, 1, values)
    }

    /// Builds a grid from raw little-endian bytes
    ///
    /// `type_name` must be one of `i8`, `i16`, `i32`, `i64`, `u8`, `u16`,
    /// `u32`, `u64`, `f32`, or `f64`; anything else is rejected.
    pub fn from_bytes(
        resolution: [usize; 3],
        veclen: usize,
        type_name: &str,
        bytes: &[u8],
    ) -> Result<Self, Error> {
        let ty: ElementType = type_name
            .parse()
            .map_err(|_| Error::UnsupportedType(type_name.to_owned()))?;
        let values = Values::from_le_bytes(ty, bytes)?;
        Self::new(resolution, veclen, values)
    }

    /// Overrides the cached min / max values
    pub fn with_min_max(self, min: f64, max: f64) -> Self {
        let min_max = OnceLock::new();
        let _ = min_max.set((min, max));
        Self { min_max, ..self }
    }

    /// Sample counts along each axis
    pub fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    /// Number of components per node
    pub fn veclen(&self) -> usize {
        self.veclen
    }

    /// Raw sample buffer
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Number of nodes along a line (`nx`)
    pub fn line_size(&self) -> usize {
        self.resolution[0]
    }

    /// Number of nodes in an XY slice (`nx * ny`)
    pub fn slice_size(&self) -> usize {
        self.resolution[0] * self.resolution[1]
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.resolution.iter().product()
    }

    /// Linear node index of `(x, y, z)`
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.resolution[0]);
        debug_assert!(y < self.resolution[1]);
        debug_assert!(z < self.resolution[2]);
        x + y * self.line_size() + z * self.slice_size()
    }

    /// Minimum value (or vector magnitude, if `veclen > 1`)
    pub fn min_value(&self) -> f64 {
        self.min_max().0
    }

    /// Maximum value (or vector magnitude, if `veclen > 1`)
    pub fn max_value(&self) -> f64 {
        self.min_max().1
    }

    /// Recomputes the cached min / max values from the samples
    pub fn update_min_max_values(&mut self) {
        self.min_max = OnceLock::new();
        self.min_max();
    }

    /// Returns the per-node scalar used for min / max and coloring
    ///
    /// This is the sample itself for scalar grids, or the magnitude of the
    /// node's vector otherwise.
    pub fn node_value(&self, node: usize) -> f64 {
        if self.veclen == 1 {
            self.values.get(node)
        } else {
            let start = node * self.veclen;
            (start..start + self.veclen)
                .map(|i| self.values.get(i).powi(2))
                .sum::<f64>()
                .sqrt()
        }
    }

    fn min_max(&self) -> (f64, f64) {
        *self.min_max.get_or_init(|| {
            fn scan<T: Sample>(v: &[T]) -> (f64, f64) {
                v.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, s| {
                    let s = s.to_f64();
                    (acc.0.min(s), acc.1.max(s))
                })
            }
            if self.veclen == 1 {
                with_values!(&self.values, |v| scan(v))
            } else {
                (0..self.node_count()).map(|n| self.node_value(n)).fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |acc, m| (acc.0.min(m), acc.1.max(m)),
                )
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_value_count() {
        assert!(StructuredGrid::scalar([2, 2, 2], vec![0u8; 8]).is_ok());
        assert!(matches!(
            StructuredGrid::scalar([2, 2, 2], vec![0u8; 7]),
            Err(Error::BadValueCount {
                expected: 8,
                actual: 7
            })
        ));
        assert!(matches!(
            StructuredGrid::new([2, 2, 2], 3, vec![0f32; 8]),
            Err(Error::BadValueCount { .. })
        ));
        assert!(matches!(
            StructuredGrid::scalar([0, 2, 2], Vec::<f32>::new()),
            Err(Error::BadResolution(..))
        ));
        assert!(matches!(
            StructuredGrid::new([1, 1, 1], 0, Vec::<f32>::new()),
            Err(Error::ZeroVeclen)
        ));
    }

    #[test]
    fn test_indexing() {
        let g = StructuredGrid::scalar([3, 4, 5], vec![0i16; 60]).unwrap();
        assert_eq!(g.line_size(), 3);
        assert_eq!(g.slice_size(), 12);
        assert_eq!(g.index(1, 2, 3), 1 + 2 * 3 + 3 * 12);
        assert_eq!(g.node_count(), 60);
    }

    #[test]
    fn test_min_max() {
        let mut g =
            StructuredGrid::scalar([2, 1, 1], vec![-3i32, 7]).unwrap();
        assert_eq!(g.min_value(), -3.0);
        assert_eq!(g.max_value(), 7.0);

        let g2 = StructuredGrid::scalar([2, 1, 1], vec![-3i32, 7])
            .unwrap()
            .with_min_max(-10.0, 10.0);
        assert_eq!(g2.min_value(), -10.0);
        assert_eq!(g2.max_value(), 10.0);

        g.update_min_max_values();
        assert_eq!(g.max_value(), 7.0);
    }

    #[test]
    fn test_vector_magnitude() {
        let g = StructuredGrid::new([2, 1, 1], 2, vec![3.0f64, 4.0, 0.0, 1.0])
            .unwrap();
        assert_eq!(g.node_value(0), 5.0);
        assert_eq!(g.min_value(), 1.0);
        assert_eq!(g.max_value(), 5.0);
    }

    #[test]
    fn test_from_bytes() {
        for ty in ElementType::iter() {
            let bytes = vec![0u8; ty.size() * 8];
            let name: &'static str = ty.into();
            let g = StructuredGrid::from_bytes([2, 2, 2], 1, name, &bytes)
                .unwrap();
            assert_eq!(g.values().element_type(), ty);
        }
        let bytes = 1234u16.to_le_bytes();
        let g = StructuredGrid::from_bytes([1, 1, 1], 1, "u16", &bytes)
            .unwrap();
        assert_eq!(g.values().get(0), 1234.0);

        assert!(matches!(
            StructuredGrid::from_bytes([1, 1, 1], 1, "string", b"abcd"),
            Err(Error::UnsupportedType(..))
        ));
        assert!(matches!(
            StructuredGrid::from_bytes([1, 1, 1], 1, "u32", b"abc"),
            Err(Error::BadByteLength(3, 4))
        ));
    }
}
