//! Module containing the universal error type
use thiserror::Error;

/// Universal error type for `isomesh`
#[derive(Error, Debug)]
pub enum Error {
    /// Isosurfaces can only be extracted from scalar fields
    #[error("input volume is not scalar field data (veclen = {0})")]
    NotScalar(usize),

    /// Vector length must be at least 1
    #[error("vector length must be at least 1")]
    ZeroVeclen,

    /// Element type is not one of the supported numeric kinds
    #[error("unsupported data type '{0}'")]
    UnsupportedType(String),

    /// Grid resolution does not describe any nodes
    #[error("bad grid resolution {0:?}")]
    BadResolution([usize; 3]),

    /// Value count does not match the resolution and vector length
    #[error("value count ({actual}) does not match expected count ({expected})")]
    BadValueCount {
        /// Number of values implied by the resolution and vector length
        expected: usize,
        /// Number of values actually provided
        actual: usize,
    },

    /// Raw byte buffer is not a whole number of samples
    #[error("byte length ({0}) is not a multiple of the sample size ({1})")]
    BadByteLength(usize, usize),

    /// Color maps need at least two entries
    #[error("color map resolution must be in 2..=256 (got {0})")]
    BadColorMapResolution(usize),

    /// IO error; see inner code for details
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            Error::NotScalar(3).to_string(),
            "input volume is not scalar field data (veclen = 3)"
        );
        assert_eq!(
            Error::UnsupportedType("string".to_owned()).to_string(),
            "unsupported data type 'string'"
        );
        assert_eq!(
            Error::BadValueCount {
                expected: 8,
                actual: 7
            }
            .to_string(),
            "value count (7) does not match expected count (8)"
        );
    }
}
