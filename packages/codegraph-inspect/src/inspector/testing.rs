//! Closure-backed inspector for unit tests

use super::decorator::NodeDecorator;
use super::descriptor::InspectorDescriptor;
use crate::domain::ports::Inspector;
use crate::errors::Result;

type InspectFn = Box<dyn Fn(&mut NodeDecorator<'_>) -> Result<()> + Send + Sync>;

pub(crate) struct TestInspector {
    descriptor: InspectorDescriptor,
    inspect: InspectFn,
}

impl TestInspector {
    pub(crate) fn new(
        descriptor: InspectorDescriptor,
        inspect: impl Fn(&mut NodeDecorator<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            inspect: Box::new(inspect),
        }
    }

    pub(crate) fn noop(descriptor: InspectorDescriptor) -> Self {
        Self::new(descriptor, |_| Ok(()))
    }

    /// Enables every produced tag
    pub(crate) fn producer(descriptor: InspectorDescriptor) -> Self {
        let tags: Vec<String> = descriptor.produced_tags().iter().cloned().collect();
        Self::new(descriptor, move |decorator| {
            for tag in &tags {
                decorator.enable_tag(tag.clone());
            }
            Ok(())
        })
    }
}

impl Inspector for TestInspector {
    fn descriptor(&self) -> &InspectorDescriptor {
        &self.descriptor
    }

    fn inspect(&self, decorator: &mut NodeDecorator<'_>) -> Result<()> {
        (self.inspect)(decorator)
    }
}
