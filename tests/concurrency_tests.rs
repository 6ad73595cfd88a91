use serde::{Deserialize, Serialize};
use serde_fluent::{
    ConverterRegistry, ConverterResolver, Error, Fluent, Lazy, Mode, NullPolicy, ScopedSlot,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    index: i64,
    name: String,
}

#[test]
fn test_threads_see_only_their_own_values() {
    let fluent = Arc::new(Fluent::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let fluent = Arc::clone(&fluent);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let text = fluent
                    .text(format!("{{\"index\":{},\"name\":\"t{}\"}}", i, i))
                    .unwrap();
                // Every thread has seeded the shared accessor before any reads it.
                barrier.wait();
                let record = text.as_type::<Record>().unwrap().get().unwrap();
                (i, record, text)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, record, _) in &results {
        assert_eq!(record.index, *i as i64);
        assert_eq!(record.name, format!("t{}", i));
    }

    let (_, _, first) = &results[0];
    for (_, _, text) in &results[1..] {
        assert!(Arc::ptr_eq(first, text));
    }
}

#[test]
fn test_round_trips_in_parallel() {
    let fluent = Arc::new(Fluent::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let fluent = Arc::clone(&fluent);
            thread::spawn(move || {
                for round in 0..50 {
                    let original = Record {
                        index: (i * 1000 + round) as i64,
                        name: format!("thread-{}", i),
                    };
                    let mode = if round % 2 == 0 { Mode::Json } else { Mode::Yaml };
                    let back = fluent
                        .object(original.clone())
                        .unwrap()
                        .as_text_in(mode)
                        .unwrap()
                        .as_type_from::<Record>(mode)
                        .unwrap()
                        .get()
                        .unwrap();
                    assert_eq!(back, original);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_resolve_shares_one_converter() {
    let registry = Arc::new(ConverterRegistry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.resolve_for(Mode::Yaml)
            })
        })
        .collect();

    let converters: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for converter in &converters[1..] {
        assert!(Arc::ptr_eq(&converters[0], converter));
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_lazy_constructs_once_under_contention() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let lazy = Arc::new(Lazy::named("counted", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::yield_now();
        Some(vec![1, 2, 3])
    }));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let lazy = Arc::clone(&lazy);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                lazy.get().unwrap()
            })
        })
        .collect();

    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[test]
fn test_lazy_empty_factory_fails_everywhere() {
    let lazy: Arc<Lazy<String>> = Arc::new(Lazy::named("nothing", || None));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lazy = Arc::clone(&lazy);
            thread::spawn(move || lazy.get())
        })
        .collect();

    for handle in handles {
        assert!(matches!(
            handle.join().unwrap(),
            Err(Error::EmptyFactoryResult("nothing"))
        ));
    }
    assert!(!lazy.is_initialized());
}

#[test]
fn test_scoped_slot_is_per_thread() {
    let slot = Arc::new(ScopedSlot::<String>::new());
    slot.initialize("main".to_string(), NullPolicy::Throw).unwrap();

    let other = Arc::clone(&slot);
    let seen = thread::spawn(move || {
        let before = other.is_set();
        other.set("worker".to_string());
        (before, other.take())
    })
    .join()
    .unwrap();

    assert_eq!(seen, (false, Some("worker".to_string())));
    assert_eq!(slot.take(), Some("main".to_string()));
    assert_eq!(slot.take(), None);
}
