//! Deep structural equality.
//!
//! [`DeepEq`] compares values by content, recursing through containers,
//! references and shared pointers. References and shared pointers (`&T`,
//! `Rc`, `Arc` and their `Weak` counterparts) are tracked in a [`Visited`]
//! set of typed address pairs: a pair that is already being compared is
//! assumed equal. Cyclic graphs therefore compare equal when no finite walk
//! through them can tell them apart, and the comparison always terminates.
//!
//! Records implement the trait with [`deep_eq_fields!`](crate::deep_eq_fields);
//! leaf types whose `PartialEq` is already structural use
//! [`deep_eq_by_partial_eq!`](crate::deep_eq_by_partial_eq).

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::any;
use std::hash::{BuildHasher, Hash};
use std::path::{Path, PathBuf};
use std::ptr;
use std::rc::{self, Rc};
use std::sync::{self, Arc};
use std::time::Duration;

/// Structural equality over a value graph.
pub trait DeepEq {
    /// Compares `self` with `other`, recording shared pointer pairs in `visited`.
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool;
}

/// Returns whether `a` and `b` are structurally equal.
pub fn deep_equal<T: DeepEq + ?Sized>(a: &T, b: &T) -> bool {
    a.deep_eq(b, &mut Visited::new())
}

/// Address pairs already under comparison, keyed by pointee type so a
/// struct and its first field never share an entry
#[derive(Debug, Default)]
pub struct Visited {
    pairs: HashSet<(usize, usize, &'static str)>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pair, returning `false` if it was already recorded.
    pub fn enter<T: ?Sized>(&mut self, a: *const T, b: *const T) -> bool {
        self.pairs.insert((
            a as *const () as usize,
            b as *const () as usize,
            any::type_name::<T>(),
        ))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Implements [`DeepEq`] through `PartialEq` for types without shared pointers.
#[macro_export]
macro_rules! deep_eq_by_partial_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::DeepEq for $ty {
                fn deep_eq(&self, other: &Self, _visited: &mut $crate::Visited) -> bool {
                    self == other
                }
            }
        )+
    };
}

/// Implements [`DeepEq`] for a struct by comparing the listed fields in order.
///
/// ```
/// use assay::{deep_eq_fields, deep_equal};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// deep_eq_fields!(Point { x, y });
///
/// assert!(deep_equal(&Point { x: 1, y: 2 }, &Point { x: 1, y: 2 }));
/// assert!(!deep_equal(&Point { x: 1, y: 2 }, &Point { x: 2, y: 1 }));
/// ```
#[macro_export]
macro_rules! deep_eq_fields {
    ($ty:ty { $($field:tt),* $(,)? }) => {
        impl $crate::DeepEq for $ty {
            #[allow(unused_variables)]
            fn deep_eq(&self, other: &Self, visited: &mut $crate::Visited) -> bool {
                true $(&& $crate::DeepEq::deep_eq(&self.$field, &other.$field, visited))*
            }
        }
    };
}

deep_eq_by_partial_eq!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    str,
    String,
    Path,
    PathBuf,
    Duration,
);

impl<T: DeepEq + ?Sized> DeepEq for &T {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        let (a, b): (&T, &T) = (*self, *other);
        if ptr::eq(a, b) || !visited.enter(a as *const T, b as *const T) {
            return true;
        }
        a.deep_eq(b, visited)
    }
}

impl<T: DeepEq + ?Sized> DeepEq for &mut T {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        let (a, b): (&T, &T) = (&**self, &**other);
        if ptr::eq(a, b) || !visited.enter(a as *const T, b as *const T) {
            return true;
        }
        a.deep_eq(b, visited)
    }
}

impl<T: DeepEq + ?Sized> DeepEq for Box<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        (**self).deep_eq(&**other, visited)
    }
}

impl<T: DeepEq + ?Sized> DeepEq for Rc<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        if Rc::ptr_eq(self, other) || !visited.enter(Rc::as_ptr(self), Rc::as_ptr(other)) {
            return true;
        }
        (**self).deep_eq(&**other, visited)
    }
}

impl<T: DeepEq + ?Sized> DeepEq for Arc<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        if Arc::ptr_eq(self, other) || !visited.enter(Arc::as_ptr(self), Arc::as_ptr(other)) {
            return true;
        }
        (**self).deep_eq(&**other, visited)
    }
}

impl<T: DeepEq + ?Sized> DeepEq for rc::Weak<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        match (self.upgrade(), other.upgrade()) {
            (Some(a), Some(b)) => a.deep_eq(&b, visited),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: DeepEq + ?Sized> DeepEq for sync::Weak<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        match (self.upgrade(), other.upgrade()) {
            (Some(a), Some(b)) => a.deep_eq(&b, visited),
            (None, None) => true,
            _ => false,
        }
    }
}

// A cell that is mutably borrowed elsewhere cannot be inspected and compares unequal
impl<T: DeepEq + ?Sized> DeepEq for RefCell<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        match (self.try_borrow(), other.try_borrow()) {
            (Ok(a), Ok(b)) => (*a).deep_eq(&*b, visited),
            _ => false,
        }
    }
}

impl<T: DeepEq + Copy> DeepEq for Cell<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        self.get().deep_eq(&other.get(), visited)
    }
}

impl<T: DeepEq> DeepEq for Option<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.deep_eq(b, visited),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: DeepEq, E: DeepEq> DeepEq for Result<T, E> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        match (self, other) {
            (Ok(a), Ok(b)) => a.deep_eq(b, visited),
            (Err(a), Err(b)) => a.deep_eq(b, visited),
            _ => false,
        }
    }
}

impl<T: DeepEq> DeepEq for [T] {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.deep_eq(b, visited))
    }
}

impl<T: DeepEq, const N: usize> DeepEq for [T; N] {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        self.as_slice().deep_eq(other.as_slice(), visited)
    }
}

impl<T: DeepEq> DeepEq for Vec<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        self.as_slice().deep_eq(other.as_slice(), visited)
    }
}

impl<T: DeepEq> DeepEq for VecDeque<T> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.deep_eq(b, visited))
    }
}

impl<K, V, S> DeepEq for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: DeepEq,
    S: BuildHasher,
{
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| match other.get(key) {
                Some(other_value) => value.deep_eq(other_value, visited),
                None => false,
            })
    }
}

impl<K: Ord, V: DeepEq> DeepEq for BTreeMap<K, V> {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| match other.get(key) {
                Some(other_value) => value.deep_eq(other_value, visited),
                None => false,
            })
    }
}

impl<T: Eq + Hash, S: BuildHasher> DeepEq for HashSet<T, S> {
    fn deep_eq(&self, other: &Self, _visited: &mut Visited) -> bool {
        self == other
    }
}

impl<T: Ord> DeepEq for BTreeSet<T> {
    fn deep_eq(&self, other: &Self, _visited: &mut Visited) -> bool {
        self == other
    }
}

macro_rules! deep_eq_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: DeepEq),+> DeepEq for ($($name,)+) {
            fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
                $(self.$idx.deep_eq(&other.$idx, visited))&&+
            }
        }
    };
}

deep_eq_tuple!(A: 0);
deep_eq_tuple!(A: 0, B: 1);
deep_eq_tuple!(A: 0, B: 1, C: 2);
deep_eq_tuple!(A: 0, B: 1, C: 2, D: 3);
deep_eq_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
deep_eq_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
deep_eq_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
deep_eq_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

// Values of different JSON types are never equal, `1` and `1.0` included
impl DeepEq for Value {
    fn deep_eq(&self, other: &Self, visited: &mut Visited) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.deep_eq(b, visited),
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| match b.get(key) {
                        Some(other_value) => value.deep_eq(other_value, visited),
                        None => false,
                    })
            }
            _ => false,
        }
    }
}
