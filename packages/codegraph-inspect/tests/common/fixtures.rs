//! Fixture inspectors

use codegraph_inspect::{Inspector, InspectorDescriptor, Node, NodeDecorator, Result};
use parking_lot::Mutex;
use std::sync::{Arc, Once};

type InspectFn = Box<dyn Fn(&mut NodeDecorator<'_>) -> Result<()> + Send + Sync>;
type SupportsFn = Box<dyn Fn(&Node) -> bool + Send + Sync>;

/// Closure-backed inspector
pub struct FnInspector {
    descriptor: InspectorDescriptor,
    inspect: InspectFn,
    supports: Option<SupportsFn>,
}

impl FnInspector {
    pub fn new(
        descriptor: InspectorDescriptor,
        inspect: impl Fn(&mut NodeDecorator<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            inspect: Box::new(inspect),
            supports: None,
        }
    }

    /// Enables every produced tag
    pub fn tagger(descriptor: InspectorDescriptor) -> Self {
        let tags: Vec<String> = descriptor.produced_tags().iter().cloned().collect();
        Self::new(descriptor, move |decorator| {
            for tag in &tags {
                decorator.enable_tag(tag.clone());
            }
            Ok(())
        })
    }

    pub fn with_supports(mut self, supports: impl Fn(&Node) -> bool + Send + Sync + 'static) -> Self {
        self.supports = Some(Box::new(supports));
        self
    }
}

impl Inspector for FnInspector {
    fn descriptor(&self) -> &InspectorDescriptor {
        &self.descriptor
    }

    fn supports(&self, node: &Node) -> bool {
        self.supports.as_ref().map_or(true, |f| f(node))
    }

    fn inspect(&self, decorator: &mut NodeDecorator<'_>) -> Result<()> {
        (self.inspect)(decorator)
    }
}

/// Shared log of (inspector, node, tags seen at invocation)
#[derive(Clone, Default)]
pub struct InvocationLog {
    entries: Arc<Mutex<Vec<(String, String, Vec<String>)>>>,
}

impl InvocationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a tagger so every invocation is logged before it writes
    pub fn tagger(&self, descriptor: InspectorDescriptor) -> FnInspector {
        let log = self.clone();
        let tags: Vec<String> = descriptor.produced_tags().iter().cloned().collect();
        FnInspector::new(descriptor, move |decorator| {
            log.entries.lock().push((
                decorator.inspector().to_string(),
                decorator.id().to_string(),
                decorator.tags().iter().cloned().collect(),
            ));
            for tag in &tags {
                decorator.enable_tag(tag.clone());
            }
            Ok(())
        })
    }

    pub fn entries(&self) -> Vec<(String, String, Vec<String>)> {
        self.entries.lock().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _, _)| name).collect()
    }

    /// Position of the first invocation of `inspector`
    pub fn first_index(&self, inspector: &str) -> Option<usize> {
        self.entries().iter().position(|(name, _, _)| name == inspector)
    }
}

/// Install a tracing subscriber once per test binary (RUST_LOG controls output)
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
