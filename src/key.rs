//! Key contract for `ChainedHashMap`, including the distinguished null key.
//!
//! Keys are `Hash + Eq` as usual. In addition a key type may carry a
//! *null* variant: `MapKey::is_null_key` returning `true` sends the key to
//! bucket 0 without consulting the hasher. This is a deliberate special
//! case and not a general null-safe design; only `Option<T>` (`None`)
//! reports null among the provided implementations.
//!
//! A borrowed lookup form `Q` (with `K: Borrow<Q>`) must agree with `K`
//! on null-ness, exactly as it must agree on `Hash` and `Eq`.

use core::hash::Hash;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

pub trait MapKey: Hash + Eq {
    /// Whether this key is the null key, which always lives in bucket 0.
    #[inline]
    fn is_null_key(&self) -> bool {
        false
    }
}

macro_rules! impl_non_null {
    ($($t:ty),* $(,)?) => {
        $(impl MapKey for $t {})*
    };
}

impl_non_null!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    str,
    String,
    std::path::Path,
    std::path::PathBuf,
    std::ffi::OsStr,
    std::ffi::OsString,
);

impl<T: MapKey> MapKey for Option<T> {
    #[inline]
    fn is_null_key(&self) -> bool {
        self.is_none()
    }
}

impl<T: MapKey + ?Sized> MapKey for &T {
    #[inline]
    fn is_null_key(&self) -> bool {
        (**self).is_null_key()
    }
}

impl<T: MapKey + ?Sized> MapKey for Box<T> {
    #[inline]
    fn is_null_key(&self) -> bool {
        (**self).is_null_key()
    }
}

impl<T: MapKey + ?Sized> MapKey for Rc<T> {
    #[inline]
    fn is_null_key(&self) -> bool {
        (**self).is_null_key()
    }
}

impl<T: MapKey + ?Sized> MapKey for Arc<T> {
    #[inline]
    fn is_null_key(&self) -> bool {
        (**self).is_null_key()
    }
}

impl<B> MapKey for Cow<'_, B>
where
    B: MapKey + ToOwned + ?Sized,
{
    #[inline]
    fn is_null_key(&self) -> bool {
        (**self).is_null_key()
    }
}

impl<T: MapKey> MapKey for [T] {}
impl<T: MapKey, const N: usize> MapKey for [T; N] {}
impl<T: MapKey> MapKey for Vec<T> {}

macro_rules! impl_tuple {
    ($($name:ident),+) => {
        impl<$($name: MapKey),+> MapKey for ($($name,)+) {}
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
