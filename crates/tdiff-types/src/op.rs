//! Reconfiguration commands applied at the end of an [`UpdatePath`](crate::UpdatePath).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::{UpdateError, UpdateResult};

/// Runtime identity of a type, compared by value.
#[derive(Clone, Copy, Debug)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ---------------------------------------------------------------------------
// Match keys
// ---------------------------------------------------------------------------

/// A type-erased key derived from an element, compared by equality.
///
/// Implemented for every `PartialEq + Debug + Send + Sync + 'static` type.
/// Keys of different concrete types never compare equal.
pub trait MatchKey: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn key_eq(&self, other: &dyn MatchKey) -> bool;
}

impl<K> MatchKey for K
where
    K: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn key_eq(&self, other: &dyn MatchKey) -> bool {
        other
            .as_any()
            .downcast_ref::<K>()
            .is_some_and(|other| self == other)
    }
}

/// A key function whose input type has been checked to be `T`.
pub struct Keyer<T> {
    f: Arc<dyn Fn(&T) -> Box<dyn MatchKey> + Send + Sync>,
}

impl<T> Keyer<T> {
    /// Derive the match key of `item`.
    pub fn key_of(&self, item: &T) -> Box<dyn MatchKey> {
        (self.f)(item)
    }
}

impl<T> Clone for Keyer<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Keyer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyer").finish_non_exhaustive()
    }
}

/// A key function with its declared input and key types.
///
/// The input type is erased so that a `KeyFn` can travel through an
/// [`UpdatePath`](crate::UpdatePath) of heterogeneous differs. The differ it
/// finally reaches recovers a typed [`Keyer`] with [`KeyFn::typed`], which
/// fails with [`UpdateError::MatchByTypeMismatch`] when the declared input type
/// is not the differ's element type.
#[derive(Clone)]
pub struct KeyFn {
    input: TypeTag,
    key: TypeTag,
    keyer: Arc<dyn Any + Send + Sync>,
}

impl KeyFn {
    pub fn new<A, K>(f: impl Fn(&A) -> K + Send + Sync + 'static) -> Self
    where
        A: 'static,
        K: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        let keyer = Keyer::<A> {
            f: Arc::new(move |a: &A| Box::new(f(a)) as Box<dyn MatchKey>),
        };
        Self {
            input: TypeTag::of::<A>(),
            key: TypeTag::of::<K>(),
            keyer: Arc::new(keyer),
        }
    }

    /// The declared input type.
    pub fn input_type(&self) -> TypeTag {
        self.input
    }

    /// The declared key type.
    pub fn key_type(&self) -> TypeTag {
        self.key
    }

    /// Recover the key function for elements of type `T`.
    pub fn typed<T: 'static>(&self) -> UpdateResult<Keyer<T>> {
        let mismatch = || UpdateError::MatchByTypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
            actual: self.input.name().to_string(),
        };
        if self.input != TypeTag::of::<T>() {
            return Err(mismatch());
        }
        self.keyer
            .downcast_ref::<Keyer<T>>()
            .cloned()
            .ok_or_else(mismatch)
    }
}

impl fmt::Debug for KeyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFn")
            .field("input", &self.input.name())
            .field("key", &self.key.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// DifferOp
// ---------------------------------------------------------------------------

/// How elements of a collection are paired for comparison.
#[derive(Clone, Debug)]
pub enum MatchBy {
    /// Pair elements by position.
    Index,
    /// Pair elements whose derived keys are equal.
    ByFunc(KeyFn),
}

impl MatchBy {
    /// Match by a key derived from each element.
    pub fn func<A, K>(f: impl Fn(&A) -> K + Send + Sync + 'static) -> Self
    where
        A: 'static,
        K: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        Self::ByFunc(KeyFn::new(f))
    }
}

/// A reconfiguration command for the differ at the end of a path.
#[derive(Clone, Debug)]
pub enum DifferOp {
    SetIgnored(bool),
    MatchBy(MatchBy),
}

impl DifferOp {
    pub fn ignore() -> Self {
        Self::SetIgnored(true)
    }

    pub fn unignore() -> Self {
        Self::SetIgnored(false)
    }

    pub fn match_by_index() -> Self {
        Self::MatchBy(MatchBy::Index)
    }

    pub fn match_by<A, K>(f: impl Fn(&A) -> K + Send + Sync + 'static) -> Self
    where
        A: 'static,
        K: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        Self::MatchBy(MatchBy::func(f))
    }
}

impl fmt::Display for DifferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetIgnored(flag) => write!(f, "SetIgnored({flag})"),
            Self::MatchBy(MatchBy::Index) => f.write_str("MatchBy(Index)"),
            Self::MatchBy(MatchBy::ByFunc(key_fn)) => write!(
                f,
                "MatchBy(ByFunc({} -> {}))",
                key_fn.input.name(),
                key_fn.key.name()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Person {
        id: u32,
        name: String,
    }

    #[test]
    fn keys_compare_by_value() {
        let a: Box<dyn MatchKey> = Box::new(7u32);
        let b: Box<dyn MatchKey> = Box::new(7u32);
        let c: Box<dyn MatchKey> = Box::new(8u32);
        assert!(a.as_ref().key_eq(b.as_ref()));
        assert!(!a.as_ref().key_eq(c.as_ref()));
    }

    #[test]
    fn keys_of_different_types_never_match() {
        let a: Box<dyn MatchKey> = Box::new(7u32);
        let b: Box<dyn MatchKey> = Box::new(7u64);
        assert!(!a.as_ref().key_eq(b.as_ref()));
    }

    #[test]
    fn typed_recovers_key_function() {
        let key_fn = KeyFn::new(|p: &Person| p.id);
        assert_eq!(key_fn.input_type(), TypeTag::of::<Person>());
        assert_eq!(key_fn.key_type(), TypeTag::of::<u32>());

        let keyer = key_fn.typed::<Person>().unwrap();
        let alice = Person { id: 1, name: "alice".into() };
        let alicia = Person { id: 1, name: "alicia".into() };
        assert_ne!(alice.name, alicia.name);
        assert!(keyer.key_of(&alice).as_ref().key_eq(keyer.key_of(&alicia).as_ref()));
    }

    #[test]
    fn typed_rejects_other_input_type() {
        let key_fn = KeyFn::new(|p: &Person| p.id);
        let err = key_fn.typed::<String>().unwrap_err();
        assert!(matches!(err, UpdateError::MatchByTypeMismatch { .. }));
    }

    #[test]
    fn op_display_names_types() {
        assert_eq!(DifferOp::ignore().to_string(), "SetIgnored(true)");
        assert_eq!(DifferOp::match_by_index().to_string(), "MatchBy(Index)");
        let op = DifferOp::match_by(|s: &String| s.len());
        assert_eq!(
            op.to_string(),
            "MatchBy(ByFunc(alloc::string::String -> usize))"
        );
    }
}
