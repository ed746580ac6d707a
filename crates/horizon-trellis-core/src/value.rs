//! Value conversion between core and UI-model representations.
//!
//! The bridge runtime moves three families of values across the boundary:
//!
//! - **Primitive scalars and strings**: mapped by identity.
//! - **Opaque value types**: carried in a single-ownership [`Opaque<T>`]
//!   handle on the core side and unwrapped at the boundary.
//! - **Generic containers**: the UI model's [`Variant`] type, which holds
//!   any of the above without static typing.
//!
//! Every conversion here is pure and lossless. `f32` and `f64` are distinct
//! variant kinds; nothing is silently widened or truncated. A typed
//! extraction that meets the wrong kind returns [`ValueError::TypeMismatch`];
//! that situation is a defect in the generated glue (the generator is
//! responsible for matching declared property types), not a runtime state a
//! correct program can reach.

use std::fmt;

/// Discriminant for [`Variant`] contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Null,
    Bool,
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
    Str,
    Bytes,
    List,
}

/// The UI model's generic value container.
///
/// A `Variant` is how the UI layer passes values whose type is not known
/// statically, such as arguments to dynamically-resolved invokables.
/// Conversions into and out of concrete types go through [`From`] and
/// [`TryFrom`].
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Variant>),
}

impl Variant {
    /// The kind of value currently held.
    pub fn kind(&self) -> VariantKind {
        match self {
            Self::Null => VariantKind::Null,
            Self::Bool(_) => VariantKind::Bool,
            Self::I8(_) => VariantKind::I8,
            Self::I16(_) => VariantKind::I16,
            Self::I32(_) => VariantKind::I32,
            Self::I64(_) => VariantKind::I64,
            Self::U8(_) => VariantKind::U8,
            Self::U16(_) => VariantKind::U16,
            Self::U32(_) => VariantKind::U32,
            Self::U64(_) => VariantKind::U64,
            Self::F32(_) => VariantKind::F32,
            Self::F64(_) => VariantKind::F64,
            Self::Str(_) => VariantKind::Str,
            Self::Bytes(_) => VariantKind::Bytes,
            Self::List(_) => VariantKind::List,
        }
    }

    /// Check for the null variant.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::Null
    }
}

/// Error produced when extracting a typed value from a [`Variant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The variant held a different kind than the extraction expected.
    ///
    /// Generated glue only extracts the kinds it stored, so reaching this
    /// at runtime means the generator produced mismatched declarations.
    TypeMismatch {
        /// The kind the caller asked for.
        expected: VariantKind,
        /// The kind the variant actually held.
        got: VariantKind,
    },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, got } => {
                write!(f, "Variant type mismatch: expected {expected:?}, got {got:?}")
            }
        }
    }
}

impl std::error::Error for ValueError {}

/// A total, pure, bidirectional mapping between a core-side representation
/// and its UI-model representation.
///
/// Primitive scalars and strings map by identity; [`Opaque<T>`] unwraps its
/// single-ownership handle. Both directions must be lossless; a pairing
/// that cannot guarantee that belongs to the generator to reject, not to
/// this layer to approximate.
pub trait UiValue: Sized {
    /// The UI-model representation of this type.
    type Ui;

    /// Convert the core-side value into its UI representation.
    fn into_ui(self) -> Self::Ui;

    /// Convert a UI-side value back into the core representation.
    fn from_ui(ui: Self::Ui) -> Self;
}

macro_rules! identity_ui_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl UiValue for $ty {
                type Ui = $ty;

                #[inline]
                fn into_ui(self) -> $ty {
                    self
                }

                #[inline]
                fn from_ui(ui: $ty) -> $ty {
                    ui
                }
            }

            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::$variant(value)
                }
            }

            impl TryFrom<Variant> for $ty {
                type Error = ValueError;

                fn try_from(variant: Variant) -> Result<Self, ValueError> {
                    match variant {
                        Variant::$variant(value) => Ok(value),
                        other => Err(ValueError::TypeMismatch {
                            expected: VariantKind::$variant,
                            got: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

identity_ui_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Str,
    Vec<u8> => Bytes,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::Str(value.to_owned())
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(value: Vec<Variant>) -> Self {
        Variant::List(value)
    }
}

/// A single-ownership handle for an opaque value type.
///
/// The UI model treats the inner value as opaque: it is carried across the
/// boundary whole and only ever owned by one side at a time. Crossing the
/// boundary unwraps the handle ([`UiValue::into_ui`]) or re-wraps the value
/// ([`UiValue::from_ui`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Opaque<T>(Box<T>);

impl<T> Opaque<T> {
    /// Wrap a value in an owning handle.
    pub fn new(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Consume the handle and take back the value.
    pub fn into_inner(self) -> T {
        *self.0
    }
}

impl<T> From<T> for Opaque<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> std::ops::Deref for Opaque<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Opaque<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> UiValue for Opaque<T> {
    type Ui = T;

    fn into_ui(self) -> T {
        self.into_inner()
    }

    fn from_ui(ui: T) -> Self {
        Self::new(ui)
    }
}
