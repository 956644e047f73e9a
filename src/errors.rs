// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two ways this crate can fail: a caller handed us a configuration
//! value that cannot describe a render, or the filesystem/encoder
//! collaborator failed underneath us.  The render loops themselves are
//! total (every iteration is cap-bounded and works on finite floats),
//! so there is no "render error" variant.

use std::io;

/// Crate-wide result alias.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Everything the library and its binaries can report.
#[derive(Debug, Fail)]
pub enum Error {
    /// A construction-time parameter was unusable: an empty palette, a
    /// zero-sized worker pool.  Carries a human-readable reason.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfiguration(String),

    /// Creating or writing the output file failed.  Not retried.
    #[fail(display = "i/o failure: {}", _0)]
    Io(#[fail(cause)] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        match err {
            Error::Io(_) => {}
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn display_carries_the_reason() {
        let err = Error::InvalidConfiguration("zero workers".to_string());
        assert_eq!(format!("{}", err), "invalid configuration: zero workers");
    }
}
