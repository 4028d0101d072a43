//! Text form of vectors.
use core::convert::Infallible;
use core::str::FromStr;

use crate::{DynVector, Real};

/// Parses a vector literal such as `1, 2.5, -inf` or `1 2 3`.
///
/// Tokens are separated by any run of whitespace or commas. Parsing never
/// fails: a token that is not a number becomes zero, so the result always has
/// one element per token. The [`Display`](core::fmt::Display) form of a vector
/// parses back to the same values.
pub fn parse_vector<T: Real>(s: &str) -> DynVector<T> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(T::parse_token)
        .collect()
}

impl<T: Real> FromStr for DynVector<T> {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_vector(s))
    }
}
