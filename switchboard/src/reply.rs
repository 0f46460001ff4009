//! Return-type normalization for requests.
//!
//! Every [`Request`](crate::Request) declares a reply type, and the request channel never hands
//! that type back as-is. It hands back the reply's [`Reply::Output`], a shape that can also
//! express "nobody handled this". The [`Reply`] implementation picks the shape, so callers read
//! the same wrapper whether the handler ran or the request went unclaimed.
//!
//! | Declared reply              | [`ReplyKind`] | Dispatch produces | Absent handler          |
//! |-----------------------------|---------------|-------------------|-------------------------|
//! | `()`                        | `Unit`        | `()`              | `()`                    |
//! | plain value `V`             | `Value`       | `Option<V>`       | `None`                  |
//! | `Option<V>`                 | `Optional`    | `Option<V>`       | `None`                  |
//! | `Box<T>`, `Rc<T>`, `Arc<T>` | `Pointer`     | `Option<Box<T>>`… | `None`                  |
//! | `NonNull<T>`                | `Pointer`     | `Option<NonNull>` | `None`                  |
//! | `*const T`, `*mut T`        | `Pointer`     | same pointer      | null                    |
//! | `Result<V, E>`              | `Fallible`    | `Result<V, E>`    | `Err(E::no_subscriber())` |
//!
//! # Value types
//!
//! Primitives, `String`, `&'static str`, tuples, arrays and the standard collections are values
//! out of the box.
//! Your own types opt in with `#[derive(Reply)]`:
//!
//! ```rust
//! use switchboard::{Reply, ReplyKind};
//!
//! #[derive(Reply, Debug, PartialEq)]
//! struct Profile {
//!     name: String,
//! }
//!
//! assert_eq!(<Profile as Reply>::KIND, ReplyKind::Value);
//! assert_eq!(<Profile as Reply>::absent(), None);
//! ```
//!
//! # Fallible replies
//!
//! A `Result` reply turns "no handler" into a real error value. The error type names that value by
//! implementing [`NoSubscriber`], usually through the derive:
//!
//! ```rust
//! use switchboard::{NoSubscriber, Reply};
//!
//! #[derive(NoSubscriber, Debug, PartialEq)]
//! enum LookupError {
//!     NotFound,
//!     #[no_subscriber]
//!     Unhandled,
//! }
//!
//! assert_eq!(<Result<u32, LookupError> as Reply>::absent(), Err(LookupError::Unhandled));
//! ```

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque},
    path::PathBuf,
    ptr::{self, NonNull},
    rc::Rc,
    sync::Arc,
    time::Duration,
};

use crate::all_tuples;

/// The normalization category of a declared reply type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    /// No value; dispatch returns `()`.
    Unit,
    /// A plain value, wrapped in `Option`.
    Value,
    /// Already optional; passed through.
    Optional,
    /// An owning or raw pointer; the nullable form of the same pointer.
    Pointer,
    /// A `Result`; absence becomes the error type's no-subscriber value.
    Fallible,
}

/// A request's declared reply type and how it normalizes.
pub trait Reply: Sized {
    /// What `RequestChannel::dispatch` returns for this reply.
    type Output;

    /// The normalization category.
    const KIND: ReplyKind;

    /// Wraps a handler's return value.
    fn into_output(self) -> Self::Output;

    /// The value dispatch produces when no subscriber owns the request.
    fn absent() -> Self::Output;
}

/// Error types that can stand for "no subscriber handled this request".
pub trait NoSubscriber {
    fn no_subscriber() -> Self;
}

impl Reply for () {
    type Output = ();
    const KIND: ReplyKind = ReplyKind::Unit;

    #[inline]
    fn into_output(self) {}

    #[inline]
    fn absent() {}
}

impl<V> Reply for Option<V> {
    type Output = Option<V>;
    const KIND: ReplyKind = ReplyKind::Optional;

    #[inline]
    fn into_output(self) -> Option<V> {
        self
    }

    #[inline]
    fn absent() -> Option<V> {
        None
    }
}

impl<V, E: NoSubscriber> Reply for Result<V, E> {
    type Output = Result<V, E>;
    const KIND: ReplyKind = ReplyKind::Fallible;

    #[inline]
    fn into_output(self) -> Result<V, E> {
        self
    }

    #[inline]
    fn absent() -> Result<V, E> {
        Err(E::no_subscriber())
    }
}

/// Owning pointers normalize to `Option<Self>`, which costs nothing thanks to the null niche.
macro_rules! owner_reply {
    ($($owner: ident),*) => {
        $(
            impl<T: ?Sized> Reply for $owner<T> {
                type Output = Option<$owner<T>>;
                const KIND: ReplyKind = ReplyKind::Pointer;

                #[inline]
                fn into_output(self) -> Option<$owner<T>> {
                    Some(self)
                }

                #[inline]
                fn absent() -> Option<$owner<T>> {
                    None
                }
            }
        )*
    };
}

owner_reply!(Box, Rc, Arc, NonNull);

impl<T> Reply for *const T {
    type Output = *const T;
    const KIND: ReplyKind = ReplyKind::Pointer;

    #[inline]
    fn into_output(self) -> *const T {
        self
    }

    #[inline]
    fn absent() -> *const T {
        ptr::null()
    }
}

impl<T> Reply for *mut T {
    type Output = *mut T;
    const KIND: ReplyKind = ReplyKind::Pointer;

    #[inline]
    fn into_output(self) -> *mut T {
        self
    }

    #[inline]
    fn absent() -> *mut T {
        ptr::null_mut()
    }
}

macro_rules! value_reply {
    ($($ty: ty),* $(,)?) => {
        $(
            impl Reply for $ty {
                type Output = Option<$ty>;
                const KIND: ReplyKind = ReplyKind::Value;

                #[inline]
                fn into_output(self) -> Option<$ty> {
                    Some(self)
                }

                #[inline]
                fn absent() -> Option<$ty> {
                    None
                }
            }
        )*
    };
}

value_reply!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    String, &'static str, Cow<'static, str>, PathBuf, Duration,
);

macro_rules! collection_reply {
    ($($ty: ident<$($param: ident),*>),* $(,)?) => {
        $(
            impl<$($param),*> Reply for $ty<$($param),*> {
                type Output = Option<$ty<$($param),*>>;
                const KIND: ReplyKind = ReplyKind::Value;

                #[inline]
                fn into_output(self) -> Option<Self> {
                    Some(self)
                }

                #[inline]
                fn absent() -> Option<Self> {
                    None
                }
            }
        )*
    };
}

collection_reply!(
    Vec<T>,
    VecDeque<T>,
    LinkedList<T>,
    BinaryHeap<T>,
    BTreeSet<T>,
    BTreeMap<K, V>,
    HashSet<T, H>,
    HashMap<K, V, H>,
);

macro_rules! tuple_reply {
    ($($name: ident),*) => {
        impl<$($name),*> Reply for ($($name,)*) {
            type Output = Option<Self>;
            const KIND: ReplyKind = ReplyKind::Value;

            #[inline]
            fn into_output(self) -> Option<Self> {
                Some(self)
            }

            #[inline]
            fn absent() -> Option<Self> {
                None
            }
        }
    }
}

all_tuples!(tuple_reply);

impl<T, const N: usize> Reply for [T; N] {
    type Output = Option<Self>;
    const KIND: ReplyKind = ReplyKind::Value;

    #[inline]
    fn into_output(self) -> Option<Self> {
        Some(self)
    }

    #[inline]
    fn absent() -> Option<Self> {
        None
    }
}

impl NoSubscriber for () {
    fn no_subscriber() {}
}

impl NoSubscriber for String {
    fn no_subscriber() -> Self {
        crate::Error::NoSubscriber.to_string()
    }
}

impl NoSubscriber for crate::Error {
    fn no_subscriber() -> Self {
        crate::Error::NoSubscriber
    }
}

impl NoSubscriber for Box<dyn std::error::Error> {
    fn no_subscriber() -> Self {
        Box::new(crate::Error::NoSubscriber)
    }
}

impl NoSubscriber for Box<dyn std::error::Error + Send + Sync> {
    fn no_subscriber() -> Self {
        Box::new(crate::Error::NoSubscriber)
    }
}
