use serde_fluent::{
    AccessorFactory, Converter, ConverterBuilder, ConverterRegistry, ConverterResolver,
    DecimalFormat, Error, Fluent, Mode, TEMPORAL_MODULE,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_modes_get_distinct_stable_converters() {
    let fluent = Fluent::new();
    let json = fluent.converter(Mode::Json);
    let yaml = fluent.converter(Mode::Yaml);

    assert!(!Arc::ptr_eq(&json, &yaml));
    assert_eq!(json.mode(), Mode::Json);
    assert_eq!(yaml.mode(), Mode::Yaml);
    assert!(Arc::ptr_eq(&json, &fluent.converter(Mode::Json)));
    assert!(Arc::ptr_eq(&json, &fluent.factory().converter(Mode::Json)));
}

#[test]
fn test_default_converter_configuration() {
    let converter = ConverterRegistry::new().resolve_for(Mode::Json);
    let options = converter.config().options();

    assert!(!options.fail_on_empty_objects);
    assert_eq!(options.decimal, DecimalFormat::String);
    assert!(converter.config().has_module(TEMPORAL_MODULE));
    assert_eq!(converter.encode(&serde_json::json!({})).unwrap(), "{}");
}

#[test]
fn test_registered_converter_is_used_by_pipeline() {
    let registry = Arc::new(ConverterRegistry::new());
    registry
        .register(
            Mode::Json,
            ConverterBuilder::for_mode(Mode::Json)
                .configured(|options| options.decimal = DecimalFormat::Number)
                .build(),
        )
        .unwrap();
    let fluent = Fluent::with_registry(Arc::clone(&registry));

    let decimal: serde_fluent::Decimal = "2.50".parse().unwrap();
    let text = fluent.object(decimal).unwrap().as_text().unwrap().get().unwrap();
    assert_eq!(text, "2.5");
    assert!(!registry.contains(Mode::Yaml));
}

#[test]
fn test_register_after_resolve_is_rejected() {
    let registry = ConverterRegistry::new();
    registry.resolve_for(Mode::Json);

    let err = registry
        .register(Mode::Json, ConverterBuilder::for_mode(Mode::Json).build())
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("already registered"));
}

struct CountingResolver {
    inner: ConverterRegistry,
    lookups: AtomicUsize,
}

impl ConverterResolver for CountingResolver {
    fn resolve_for(&self, mode: Mode) -> Arc<Converter> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_for(mode)
    }
}

#[test]
fn test_factory_over_custom_resolver() {
    let resolver = Arc::new(CountingResolver {
        inner: ConverterRegistry::new(),
        lookups: AtomicUsize::new(0),
    });
    let factory = AccessorFactory::new(Arc::clone(&resolver) as Arc<dyn ConverterResolver>);

    let yaml = factory
        .text("[1, 2]")
        .unwrap()
        .as_tree()
        .unwrap()
        .as_text_in(Mode::Yaml)
        .unwrap()
        .get()
        .unwrap();

    assert_eq!(yaml, "- 1\n- 2\n");
    assert_eq!(resolver.lookups.load(Ordering::SeqCst), 2);
}
