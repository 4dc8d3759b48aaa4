//! Scalar coercion.
//!
//! [`Coerce`] converts one text token into a scalar. [`BindField`] applies
//! the multiplicity rules of a field type on top of it: scalars take at most
//! one token, `Vec<T>` appends every token, `[T; N]` fills up to `N`, and
//! `Option<T>` / `Box<T>` allocate then recurse.
//!
//! A tagged field whose type implements neither trait fails to compile.
//!
//! # Example
//!
//! ```rust
//! use junction_bind::{BindField, Coerce};
//!
//! assert_eq!(i32::coerce("-7").unwrap(), -7);
//! assert_eq!(
//!     u8::coerce("300").unwrap_err().to_string(),
//!     "300 is not a valid uint8: value out of range"
//! );
//!
//! let mut ids: Vec<u64> = vec![1];
//! ids.bind_tokens(&["2", "3"]).unwrap();
//! assert_eq!(ids, [1, 2, 3]);
//! ```

use std::num::{IntErrorKind, ParseIntError};

use chrono::{DateTime, FixedOffset, Utc};
use num_complex::{Complex32, Complex64};

use crate::error::CoerceError;

const INVALID_SYNTAX: &str = "invalid syntax";
const OUT_OF_RANGE: &str = "value out of range";

/// Converts a single text token into `Self`.
pub trait Coerce: Sized {
    /// Kind label used in error messages.
    const KIND: &'static str;

    /// Parses `token`.
    fn coerce(token: &str) -> Result<Self, CoerceError>;
}

/// Binds a list of tokens into a field, honoring its multiplicity.
///
/// Callers pass at least one token; an empty list leaves the field alone.
pub trait BindField {
    /// Applies `tokens` to `self`.
    fn bind_tokens(&mut self, tokens: &[&str]) -> Result<(), CoerceError>;
}

/// Binds at most one token into a scalar slot.
///
/// Use this to implement [`BindField`] for your own [`Coerce`] types.
pub fn bind_single<T: Coerce>(slot: &mut T, tokens: &[&str]) -> Result<(), CoerceError> {
    match tokens {
        [] => Ok(()),
        [token] => {
            *slot = T::coerce(token)?;
            Ok(())
        }
        _ => Err(CoerceError::TooManyValues {
            count: tokens.len(),
        }),
    }
}

fn int_cause(err: &ParseIntError) -> &'static str {
    match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => OUT_OF_RANGE,
        _ => INVALID_SYNTAX,
    }
}

macro_rules! coerce_int {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl Coerce for $ty {
                const KIND: &'static str = $kind;

                fn coerce(token: &str) -> Result<Self, CoerceError> {
                    token
                        .parse::<$ty>()
                        .map_err(|e| CoerceError::invalid(token, Self::KIND, int_cause(&e)))
                }
            }
        )*
    };
}

// `str::parse` takes a leading `+` for unsigned types; only digits are accepted here.
macro_rules! coerce_uint {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl Coerce for $ty {
                const KIND: &'static str = $kind;

                fn coerce(token: &str) -> Result<Self, CoerceError> {
                    if !token.starts_with(|c: char| c.is_ascii_digit()) {
                        return Err(CoerceError::invalid(token, Self::KIND, INVALID_SYNTAX));
                    }
                    token
                        .parse::<$ty>()
                        .map_err(|e| CoerceError::invalid(token, Self::KIND, int_cause(&e)))
                }
            }
        )*
    };
}

coerce_int! {
    isize => "int",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
}

coerce_uint! {
    usize => "uint",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
}

fn is_infinity_literal(token: &str) -> bool {
    let unsigned = token.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

macro_rules! coerce_float {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl Coerce for $ty {
                const KIND: &'static str = $kind;

                fn coerce(token: &str) -> Result<Self, CoerceError> {
                    let value = token
                        .parse::<$ty>()
                        .map_err(|_| CoerceError::invalid(token, Self::KIND, INVALID_SYNTAX))?;
                    if value.is_infinite() && !is_infinity_literal(token) {
                        return Err(CoerceError::invalid(token, Self::KIND, OUT_OF_RANGE));
                    }
                    Ok(value)
                }
            }
        )*
    };
}

coerce_float! {
    f32 => "float32",
    f64 => "float64",
}

/// Strips one level of enclosing parentheses, as in `(1+2i)`.
fn strip_parens(token: &str) -> &str {
    token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(token)
}

impl Coerce for Complex32 {
    const KIND: &'static str = "complex64";

    fn coerce(token: &str) -> Result<Self, CoerceError> {
        strip_parens(token)
            .parse()
            .map_err(|_| CoerceError::invalid(token, Self::KIND, INVALID_SYNTAX))
    }
}

impl Coerce for Complex64 {
    const KIND: &'static str = "complex128";

    fn coerce(token: &str) -> Result<Self, CoerceError> {
        strip_parens(token)
            .parse()
            .map_err(|_| CoerceError::invalid(token, Self::KIND, INVALID_SYNTAX))
    }
}

impl Coerce for bool {
    const KIND: &'static str = "bool";

    fn coerce(token: &str) -> Result<Self, CoerceError> {
        match token {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(CoerceError::invalid(token, Self::KIND, INVALID_SYNTAX)),
        }
    }
}

impl Coerce for String {
    const KIND: &'static str = "string";

    fn coerce(token: &str) -> Result<Self, CoerceError> {
        Ok(token.to_string())
    }
}

impl Coerce for DateTime<FixedOffset> {
    const KIND: &'static str = "time";

    fn coerce(token: &str) -> Result<Self, CoerceError> {
        DateTime::parse_from_rfc3339(token)
            .map_err(|e| CoerceError::invalid(token, Self::KIND, e.to_string()))
    }
}

impl Coerce for DateTime<Utc> {
    const KIND: &'static str = "time";

    fn coerce(token: &str) -> Result<Self, CoerceError> {
        DateTime::<FixedOffset>::coerce(token).map(|t| t.with_timezone(&Utc))
    }
}

macro_rules! bind_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BindField for $ty {
                fn bind_tokens(&mut self, tokens: &[&str]) -> Result<(), CoerceError> {
                    bind_single(self, tokens)
                }
            }
        )*
    };
}

bind_scalar! {
    isize, i8, i16, i32, i64,
    usize, u8, u16, u32, u64,
    f32, f64,
    Complex32, Complex64,
    bool,
    String,
    DateTime<FixedOffset>, DateTime<Utc>,
}

impl<T: Coerce> BindField for Vec<T> {
    fn bind_tokens(&mut self, tokens: &[&str]) -> Result<(), CoerceError> {
        self.reserve(tokens.len());
        for token in tokens {
            self.push(T::coerce(token)?);
        }
        Ok(())
    }
}

impl<T: Coerce, const N: usize> BindField for [T; N] {
    fn bind_tokens(&mut self, tokens: &[&str]) -> Result<(), CoerceError> {
        if tokens.len() > N {
            return Err(CoerceError::CapacityExceeded {
                count: tokens.len(),
                capacity: N,
            });
        }
        for (slot, token) in self.iter_mut().zip(tokens) {
            *slot = T::coerce(token)?;
        }
        Ok(())
    }
}

impl<T: BindField + Default> BindField for Option<T> {
    fn bind_tokens(&mut self, tokens: &[&str]) -> Result<(), CoerceError> {
        if tokens.is_empty() {
            return Ok(());
        }
        self.get_or_insert_with(T::default).bind_tokens(tokens)
    }
}

impl<T: BindField + ?Sized> BindField for Box<T> {
    fn bind_tokens(&mut self, tokens: &[&str]) -> Result<(), CoerceError> {
        (**self).bind_tokens(tokens)
    }
}
