//! Scalar representations and numeric equivalence for leaf differs.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Serialize a leaf value into the representation carried by results.
///
/// Serialization failures do not fail the comparison: the error text is
/// carried instead.
pub fn json_repr<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        warn!(
            type_name = std::any::type_name::<T>(),
            error = %err,
            "leaf value not serializable, carrying error text"
        );
        Value::String(format!("<unserializable: {err}>"))
    })
}

/// Equivalence of numeric values.
///
/// Floats are equivalent when they compare equal or are both NaN, so a NaN
/// compared with itself is a match.
pub trait NumericEquiv {
    fn num_equiv(&self, other: &Self) -> bool;
}

macro_rules! int_equiv {
    ($($t:ty),*) => {
        $(
            impl NumericEquiv for $t {
                fn num_equiv(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

macro_rules! float_equiv {
    ($($t:ty),*) => {
        $(
            impl NumericEquiv for $t {
                fn num_equiv(&self, other: &Self) -> bool {
                    self == other || (self.is_nan() && other.is_nan())
                }
            }
        )*
    };
}

int_equiv!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
float_equiv!(f32, f64);
