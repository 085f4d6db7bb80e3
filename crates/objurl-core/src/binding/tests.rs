use super::Binding;
use crate::{
    mock::{blob, RecordingUrls},
    CacheConfig, Identity, ObjectUrlCache,
};
use std::{collections::HashMap, sync::Arc};

fn cache() -> (ObjectUrlCache<RecordingUrls>, RecordingUrls) {
    let urls = RecordingUrls::new();
    (ObjectUrlCache::new(urls.clone(), CacheConfig::default()), urls)
}

#[test]
fn three_bindings_share_one_url() {
    let (cache, urls) = cache();
    let x = blob(b"test");
    let mut bindings = (0..3).map(|_| Binding::new(cache.clone())).collect::<Vec<_>>();
    let url = bindings[0].bind(&x).unwrap();
    for b in &mut bindings[1..] {
        assert_eq!(b.bind(&x).unwrap(), url);
    }
    assert_eq!(urls.create_count(), 1);

    bindings.pop();
    bindings.pop();
    assert_eq!(urls.revoke_count(), 0);

    bindings.pop();
    assert_eq!(urls.revoked(), vec![url.to_string()]);
}

#[test]
fn rebind_releases_old_then_acquires_new() {
    let (cache, urls) = cache();
    urls.script(["blob:url-1", "blob:url-2"]);
    let a = blob(b"test1");
    let b = blob(b"test2");

    let mut binding = Binding::new(cache.clone());
    assert_eq!(binding.bind(&a).unwrap(), "blob:url-1");
    assert_eq!(binding.bind(&b).unwrap(), "blob:url-2");

    assert_eq!(urls.revoked(), vec![String::from("blob:url-1")]);
    assert_eq!(urls.create_count(), 2);
    assert_eq!(binding.current().unwrap(), "blob:url-2");
    assert_eq!(binding.object().unwrap().identity(), b.identity());
    assert_eq!(cache.references(a.identity()), None);
    assert_eq!(cache.references(b.identity()), Some(1));
}

#[test]
fn rebind_keeps_url_shared_with_other_consumers() {
    let (cache, urls) = cache();
    let a = blob(b"test1");
    let b = blob(b"test2");
    let mut first = Binding::new(cache.clone());
    let mut second = Binding::new(cache.clone());
    let url_a = first.bind(&a).unwrap();
    second.bind(&a).unwrap();

    first.bind(&b).unwrap();
    assert_eq!(urls.revoke_count(), 0);
    assert_eq!(second.current(), Some(&url_a));
    assert_eq!(cache.references(a.identity()), Some(1));
}

#[test]
fn rebinding_same_object_is_free() {
    let (cache, urls) = cache();
    let x = blob(b"test");
    let mut binding = Binding::new(cache.clone());
    let url = binding.bind(&x).unwrap();
    for _ in 0..10 {
        assert_eq!(binding.bind(&x.clone()).unwrap(), url);
    }
    assert_eq!(urls.create_count(), 1);
    assert_eq!(cache.references(x.identity()), Some(1));
}

#[test]
fn unbind_releases_exactly_once() {
    let (cache, urls) = cache();
    let x = blob(b"test");
    let mut binding = Binding::new(cache);
    binding.bind(&x).unwrap();
    binding.unbind();
    binding.unbind();
    assert!(!binding.is_bound());
    drop(binding);
    assert_eq!(urls.revoke_count(), 1);
}

#[test]
fn failed_acquire_on_rebind_leaves_binding_unbound() {
    let (cache, urls) = cache();
    let a = blob(b"test1");
    let b = blob(b"test2");
    let mut binding = Binding::new(cache.clone());
    binding.bind(&a).unwrap();
    urls.fail_next_creates(1);
    assert!(binding.bind(&b).is_err());
    assert!(!binding.is_bound());
    assert_eq!(urls.revoke_count(), 1);
    assert_eq!(cache.len(), 0);

    drop(binding);
    assert_eq!(urls.revoke_count(), 1);
}

#[test]
fn failed_revoke_on_teardown_is_reported_not_propagated() {
    let (cache, urls) = cache();
    let x = blob(b"test");
    let mut binding = Binding::new(cache.clone());
    binding.bind(&x).unwrap();
    urls.fail_next_revokes(1);
    drop(binding);
    assert_eq!(urls.revoke_count(), 1);
    assert_eq!(cache.len(), 0);
}

#[test]
fn panic_unwind_releases() {
    let (cache, urls) = cache();
    let x = blob(b"test");
    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut binding = Binding::new(cache.clone());
        binding.bind(&x).unwrap();
        panic!("consumer failed");
    }));
    assert!(res.is_err());
    assert_eq!(urls.revoke_count(), 1);
    assert_eq!(cache.len(), 0);
}

#[derive(Debug, bolero::generator::TypeGenerator)]
enum Op {
    Bind { binding: u8, object: u8 },
    Unbind { binding: u8 },
    Discard { binding: u8 },
    Acquire { object: u8 },
    Release { object: u8 },
}

const BINDINGS: usize = 4;
const OBJECTS: usize = 3;

fn cache_matches_model_impl(ops: &Vec<Op>) {
    let (cache, urls) = cache();
    let objects = (0..OBJECTS)
        .map(|i| blob(&[i as u8]))
        .collect::<Vec<Arc<[u8]>>>();
    let mut bindings = (0..BINDINGS)
        .map(|_| Some(Binding::new(cache.clone())))
        .collect::<Vec<_>>();

    // Reference model: which object each binding holds, and raw acquires not yet released
    let mut bound = [None::<usize>; BINDINGS];
    let mut raw = [0usize; OBJECTS];

    for (i, op) in ops.iter().enumerate() {
        match *op {
            Op::Bind { binding, object } => {
                let (b, o) = (binding as usize % BINDINGS, object as usize % OBJECTS);
                let binding = bindings[b].get_or_insert_with(|| Binding::new(cache.clone()));
                binding.bind(&objects[o]).unwrap();
                bound[b] = Some(o);
            }
            Op::Unbind { binding } => {
                let b = binding as usize % BINDINGS;
                if let Some(binding) = &mut bindings[b] {
                    binding.unbind();
                }
                bound[b] = None;
            }
            Op::Discard { binding } => {
                let b = binding as usize % BINDINGS;
                bindings[b] = None;
                bound[b] = None;
            }
            Op::Acquire { object } => {
                let o = object as usize % OBJECTS;
                cache.acquire(&objects[o]).unwrap();
                raw[o] += 1;
            }
            Op::Release { object } => {
                // Releasing more than was acquired would steal a binding's reference
                let o = object as usize % OBJECTS;
                if raw[o] > 0 {
                    cache.release(&objects[o]).unwrap();
                    raw[o] -= 1;
                }
            }
        }

        let context = || format!("after processing op {i}: {op:?}");
        cache.assert_invariants(context);
        let mut live = 0;
        for (o, object) in objects.iter().enumerate() {
            let expected = raw[o] + bound.iter().filter(|b| **b == Some(o)).count();
            let actual = cache.references(object.identity()).unwrap_or(0);
            assert_eq!(expected, actual, "{}: reference count of object {o}", context());
            live += (expected > 0) as usize;
        }
        assert_eq!(
            urls.create_count() - urls.revoke_count(),
            live,
            "{}: every created URL but the live ones must be revoked",
            context()
        );

        let mut url_of = HashMap::new();
        for (b, binding) in bindings.iter().enumerate() {
            if let (Some(binding), Some(o)) = (binding, bound[b]) {
                let url = binding.current().unwrap().clone();
                let previous = url_of.insert(o, url.clone());
                assert!(
                    previous.map_or(true, |p| p == url),
                    "{}: two bindings of object {o} hold different URLs",
                    context()
                );
            }
        }
    }

    drop(bindings);
    for (o, object) in objects.iter().enumerate() {
        for _ in 0..raw[o] {
            cache.release(object).unwrap();
        }
    }
    assert_eq!(cache.len(), 0);
    assert_eq!(urls.create_count(), urls.revoke_count());
    let mut revoked = urls.revoked();
    let mut created = urls.created_urls();
    revoked.sort();
    created.sort();
    assert_eq!(revoked, created, "every created URL must be revoked exactly once");
}

#[test]
fn cache_matches_model() {
    bolero::check!()
        .with_type()
        .for_each(cache_matches_model_impl);
}
