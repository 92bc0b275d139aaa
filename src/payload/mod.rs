//! Copy-on-write, type-erased message payloads.
//!
//! A [`Payload`] is an immutable-by-default tuple of heterogeneous, typed
//! fields shared through an `Arc`. Cloning a payload is O(1) — it shares the
//! same backing storage — and mutation only deep-clones the whole tuple the
//! moment the storage is actually shared, matching the copy-on-write
//! discipline the rest of the runtime assumes when it hands payloads to more
//! than one reader (fan-out sends, the stash, delegation).

// Layer 1: Standard library imports
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// 16-bit external type tag. Zero means "unregistered user type" — the
/// payload still carries correct Rust-level type information via [`TypeId`],
/// but no bijective external name has been registered for it (see the
/// serialization/inspection contract).
pub type TypeTag = u16;

static TYPE_TAGS: OnceLock<RwLock<HashMap<TypeId, TypeTag>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<TypeId, TypeTag>> {
    TYPE_TAGS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers an external type tag for `T`.
///
/// This is consumed by the (out-of-scope) serialization/inspection layer: it
/// lets an external registration table assign stable 16-bit tags to the
/// concrete Rust types carried in payload fields. Types that are never
/// registered still work fully inside the runtime — they simply report a
/// tag of zero from [`Payload::type_tag`].
pub fn register_type<T: 'static>(tag: TypeTag) {
    registry().write().insert(TypeId::of::<T>(), tag);
}

fn tag_for(type_id: TypeId) -> TypeTag {
    registry().read().get(&type_id).copied().unwrap_or(0)
}

/// Errors raised by payload field access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The field at `index` does not hold a value of the requested type.
    #[error("type mismatch at field {index}: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Field index that was accessed.
        index: usize,
        /// Type name of the requested accessor.
        expected: &'static str,
        /// Type name actually stored at that index.
        actual: &'static str,
    },
    /// `index` is not a valid field position.
    #[error("field index {index} out of bounds (payload has {len} fields)")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of fields the payload actually has.
        len: usize,
    },
}

/// Trait bound satisfied by any value that can live in a payload field:
/// owned, thread-safe, debug-printable, and cheaply cloneable on
/// copy-on-write.
pub trait FieldValue: Any + Send + Sync + fmt::Debug + Clone {}
impl<T: Any + Send + Sync + fmt::Debug + Clone> FieldValue for T {}

/// Object-safe facade over a concrete [`FieldValue`] that dispatches clone
/// and debug-print straight to `T`'s own impls — no downcast involved, so
/// there is nothing for those two operations to fail on. Only reading a
/// field back out (`as_any`/`as_any_mut`) downcasts, and that path already
/// reports a mismatch as [`PayloadError::TypeMismatch`] rather than panicking.
trait ErasedField: Any + Send + Sync {
    fn clone_erased(&self) -> Box<dyn ErasedField>;
    fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: FieldValue> ErasedField for T {
    fn clone_erased(&self) -> Box<dyn ErasedField> {
        Box::new(self.clone())
    }

    fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Field {
    type_id: TypeId,
    type_name: &'static str,
    tag: TypeTag,
    value: Box<dyn ErasedField>,
}

impl Field {
    fn new<T: FieldValue>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            tag: tag_for(TypeId::of::<T>()),
            value: Box::new(value),
        }
    }
}

impl Clone for Field {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            tag: self.tag,
            value: self.value.clone_erased(),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_erased(f)
    }
}

/// A reference-counted, copy-on-write tuple of typed fields.
///
/// # Examples
///
/// ```rust
/// use airssys_rt::payload::Payload;
///
/// let p1 = Payload::new((3i32, 4i32));
/// let mut p2 = p1.clone();
///
/// *p2.field_mut::<i32>(0).unwrap() = 10;
/// assert_eq!(*p1.get::<i32>(0).unwrap(), 3); // p1 unaffected by the mutation through p2
/// assert_eq!(*p2.get::<i32>(0).unwrap(), 10);
/// ```
#[derive(Clone)]
pub struct Payload(Arc<Vec<Field>>);

impl Payload {
    /// Builds a payload from any [`IntoPayload`] source — typically a tuple
    /// literal such as `(3i32, 4i32)`.
    pub fn new<T: IntoPayload>(values: T) -> Self {
        values.into_payload()
    }

    /// Builds a payload directly from a vector of boxed fields. Used by
    /// [`IntoPayload`] impls and by callers assembling a payload whose arity
    /// is only known at runtime.
    fn from_fields(fields: Vec<Field>) -> Self {
        Self(Arc::new(fields))
    }

    /// Number of fields in the tuple.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The external type tag at `index`, or `None` if `index` is out of
    /// bounds. Zero means the field's type was never registered with
    /// [`register_type`].
    pub fn type_tag(&self, index: usize) -> Option<TypeTag> {
        self.0.get(index).map(|f| f.tag)
    }

    /// The Rust [`TypeId`] at `index`, used by [`crate::behavior::Behavior`]
    /// to match callback signatures against a payload's shape.
    pub(crate) fn type_id_at(&self, index: usize) -> Option<TypeId> {
        self.0.get(index).map(|f| f.type_id)
    }

    /// `true` if `types` is element-wise assignable from this payload's
    /// field types — same arity, same `TypeId` at every position.
    pub(crate) fn matches_signature(&self, types: &[TypeId]) -> bool {
        self.0.len() == types.len()
            && self.0.iter().zip(types).all(|(f, t)| f.type_id == *t)
    }

    /// Reads field `index` as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::IndexOutOfBounds`] if `index` is out of range,
    /// or [`PayloadError::TypeMismatch`] if the field does not hold a `T`.
    pub fn get<T: Any>(&self, index: usize) -> Result<&T, PayloadError> {
        let field = self
            .0
            .get(index)
            .ok_or(PayloadError::IndexOutOfBounds { index, len: self.0.len() })?;
        field
            .value
            .as_any()
            .downcast_ref::<T>()
            .ok_or(PayloadError::TypeMismatch {
                index,
                expected: std::any::type_name::<T>(),
                actual: field.type_name,
            })
    }

    /// Returns a mutable reference to field `index`, copy-on-write: if this
    /// payload's storage is shared with another handle, the entire tuple is
    /// deep-cloned first so the mutation is observed only through `self`.
    ///
    /// # Errors
    ///
    /// Same as [`Payload::get`].
    pub fn field_mut<T: FieldValue>(&mut self, index: usize) -> Result<&mut T, PayloadError> {
        let len = self.0.len();
        let field_ty = self
            .0
            .get(index)
            .ok_or(PayloadError::IndexOutOfBounds { index, len })?;
        if field_ty.type_id != TypeId::of::<T>() {
            return Err(PayloadError::TypeMismatch {
                index,
                expected: std::any::type_name::<T>(),
                actual: field_ty.type_name,
            });
        }
        let expected = std::any::type_name::<T>();
        let fields = Arc::make_mut(&mut self.0);
        let actual = fields[index].type_name;
        fields[index]
            .value
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(PayloadError::TypeMismatch { index, expected, actual })
    }

    /// `true` if this payload and `other` share the same backing storage
    /// (no deep clone would be needed to mutate either one right now).
    pub fn is_shared_with(&self, other: &Payload) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").field(&self.0.as_slice()).finish()
    }
}

/// Converts an owned Rust value (typically a tuple) into a [`Payload`].
///
/// Implemented for tuples of arity 0 through 8 of [`FieldValue`]s; build a
/// payload of unknown/runtime arity by assembling `Vec<Field>` directly is
/// intentionally not exposed as public API — the tuple constructors cover
/// every case this runtime's behaviors actually match against (§4.3).
pub trait IntoPayload {
    /// Performs the conversion.
    fn into_payload(self) -> Payload;
}

macro_rules! impl_into_payload_for_tuple {
    ($($t:ident : $idx:tt),*) => {
        impl<$($t: FieldValue),*> IntoPayload for ($($t,)*) {
            #[allow(non_snake_case, unused_variables)]
            fn into_payload(self) -> Payload {
                let ($($t,)*) = self;
                let fields = vec![$(Field::new($t)),*];
                Payload::from_fields(fields)
            }
        }
    };
}

impl_into_payload_for_tuple!();
impl_into_payload_for_tuple!(A:0);
impl_into_payload_for_tuple!(A:0, B:1);
impl_into_payload_for_tuple!(A:0, B:1, C:2);
impl_into_payload_for_tuple!(A:0, B:1, C:2, D:3);
impl_into_payload_for_tuple!(A:0, B:1, C:2, D:3, E:4);
impl_into_payload_for_tuple!(A:0, B:1, C:2, D:3, E:4, F:5);
impl_into_payload_for_tuple!(A:0, B:1, C:2, D:3, E:4, F:5, G:6);
impl_into_payload_for_tuple!(A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7);
