//! Caching for parameterized codec factories.

use crate::codec::Codec;
use std::{collections::HashMap, hash::Hash, sync::Mutex};

/// Cache a parameterized codec factory so equal parameters share one codec.
///
/// The returned closure runs `factory` at most once per distinct parameter
/// and hands out clones of the cached codec afterwards, so codecs obtained
/// for equal parameters compare identical under [Codec::ptr_eq]. The cache
/// lock is not held while the factory runs; if two threads race on the same
/// parameter, the first insertion wins and the loser's codec is discarded.
pub fn memoize<P, T, F>(factory: F) -> impl Fn(P) -> Codec<T> + Send + Sync
where
    P: Clone + Eq + Hash + Send + 'static,
    T: 'static,
    F: Fn(P) -> Codec<T> + Send + Sync + 'static,
{
    let cache: Mutex<HashMap<P, Codec<T>>> = Mutex::new(HashMap::new());
    move |param: P| {
        if let Some(cached) = cache.lock().unwrap().get(&param) {
            return cached.clone();
        }
        let produced = factory(param.clone());
        cache
            .lock()
            .unwrap()
            .entry(param)
            .or_insert(produced)
            .clone()
    }
}
