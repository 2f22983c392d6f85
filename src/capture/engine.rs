use crate::{
    capture::{ChangeHandler, capture_value},
    dom::{FieldElement, Page},
    error::{CaptureError, Result},
    mapping::{Mapping, MappingId, TriggerEvent},
    reporter::Reporter,
};
use std::rc::Rc;

/// A mapping that could not be processed during initialization
#[derive(Debug)]
pub struct MappingFailure {
    pub id: MappingId,
    pub selector: String,
    pub error: CaptureError,
}

/// Outcome of [`CaptureEngine::initialize`]
#[derive(Debug, Default)]
pub struct InitSummary {
    /// Values sent by load-triggered mappings
    pub sent: usize,

    /// Change listeners attached by change-triggered mappings
    pub listeners: usize,

    /// Mappings that failed, in list order
    pub failures: Vec<MappingFailure>,
}

impl InitSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reads page fields according to mappings and reports valid values
pub struct CaptureEngine<P: Page> {
    page: P,
    reporter: Rc<dyn Reporter>,
}

impl<P: Page> CaptureEngine<P> {
    pub fn new(page: P, reporter: Rc<dyn Reporter>) -> Self {
        Self { page, reporter }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Process every mapping in order: load-triggered mappings report now,
    /// the rest get change listeners.
    ///
    /// A failing mapping is recorded in the summary and logged; the remaining
    /// mappings are still processed. Work already done is never rolled back.
    pub fn initialize(&self, mappings: &[Mapping]) -> InitSummary {
        let mut summary = InitSummary::default();

        for mapping in mappings {
            let result = match mapping.event {
                TriggerEvent::OnLoad => self.fire_on_load(mapping).map(|sent| summary.sent += sent),
                TriggerEvent::OnChange => self
                    .attach_on_change(mapping)
                    .map(|attached| summary.listeners += attached),
            };

            if let Err(error) = result {
                log::warn!("Mapping {} ({}) failed: {}", mapping.id, mapping.selector, error);
                summary.failures.push(MappingFailure {
                    id: mapping.id.clone(),
                    selector: mapping.selector.clone(),
                    error,
                });
            }
        }

        log::debug!(
            "Initialized {} mappings: {} values sent, {} listeners, {} failures",
            mappings.len(),
            summary.sent,
            summary.listeners,
            summary.failures.len()
        );

        summary
    }

    /// Report the current value of every element the mapping matches.
    ///
    /// Returns the number of values sent. An error on one element stops the
    /// rest of this mapping's elements.
    pub fn fire_on_load(&self, mapping: &Mapping) -> Result<usize> {
        let elements = self.page.query_selector_all(&mapping.selector)?;
        log::debug!("Mapping {}: {} elements for '{}'", mapping.id, elements.len(), mapping.selector);

        let mut sent = 0;
        for element in &elements {
            if let Some(value) = capture_value(mapping, element)? {
                self.reporter.send(&mapping.id, &value);
                sent += 1;
            }
        }

        Ok(sent)
    }

    /// Attach a change listener to every element the mapping matches now.
    ///
    /// Returns the number of listeners attached.
    pub fn attach_on_change(&self, mapping: &Mapping) -> Result<usize> {
        let elements = self.page.query_selector_all(&mapping.selector)?;
        let mapping = Rc::new(mapping.clone());

        for element in &elements {
            let handler = ChangeHandler::new(mapping.clone(), element.clone(), self.reporter.clone());
            element.add_change_listener(Rc::new(handler))?;
        }

        log::debug!(
            "Mapping {}: watching {} elements for '{}'",
            mapping.id,
            elements.len(),
            mapping.selector
        );

        Ok(elements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dom::{ElementNode, FormElement, SelectorMap},
        reporter::MemoryReporter,
    };

    fn input(value: &str) -> FormElement {
        FormElement::new(ElementNode::new("input").with_value(value))
    }

    fn engine(page: SelectorMap) -> (CaptureEngine<SelectorMap>, Rc<MemoryReporter>) {
        let reporter = Rc::new(MemoryReporter::new());
        (CaptureEngine::new(page, reporter.clone()), reporter)
    }

    #[test]
    fn test_fire_on_load_sends_per_element() {
        let element = input("testValue");
        let (engine, reporter) = engine(SelectorMap::new().with(".email", vec![element.clone(), element]));

        let sent = engine.fire_on_load(&Mapping::new(5, ".email", "value")).unwrap();

        assert_eq!(sent, 2);
        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.id == MappingId::Number(5) && e.value == "testValue"));
    }

    #[test]
    fn test_fire_on_load_skips_invalid() {
        let (engine, reporter) = engine(SelectorMap::new().with(".email", vec![input("testValue")]));

        let sent = engine.fire_on_load(&Mapping::new(5, ".email", "value").email()).unwrap();

        assert_eq!(sent, 0);
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_fire_on_load_no_match() {
        let (engine, reporter) = engine(SelectorMap::new());
        assert_eq!(engine.fire_on_load(&Mapping::new(1, "#nothing", "value")).unwrap(), 0);
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_fire_on_load_unknown_attribute() {
        let (engine, reporter) = engine(SelectorMap::new().with("#a", vec![input("x"), input("y")]));

        let err = engine.fire_on_load(&Mapping::new(1, "#a", "bogus")).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_attach_on_change() {
        let element = input("");
        let (engine, reporter) = engine(SelectorMap::new().with(".email", vec![element.clone()]));

        let attached = engine.attach_on_change(&Mapping::new(5, ".email", "value")).unwrap();
        assert_eq!(attached, 1);
        assert!(reporter.is_empty());

        element.dispatch_change().unwrap();
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_attach_on_change_invalid_value() {
        let element = input("");
        let (engine, reporter) = engine(SelectorMap::new().with(".email", vec![element.clone()]));

        engine.attach_on_change(&Mapping::new(5, ".email", "value").email()).unwrap();
        element.set_value("not a valid email");
        element.dispatch_change().unwrap();

        assert!(reporter.is_empty());
    }

    #[test]
    fn test_unknown_attribute_deferred_to_change() {
        let element = input("x");
        let (engine, reporter) = engine(SelectorMap::new().with("#a", vec![element.clone()]));

        assert_eq!(engine.attach_on_change(&Mapping::new(1, "#a", "bogus")).unwrap(), 1);
        assert!(element.dispatch_change().unwrap_err().is_configuration_error());
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_initialize_sends_and_listens() {
        let email = input("testValue");
        let phone = FormElement::new(ElementNode::new("div").with_value("testText"));
        let page = SelectorMap::new()
            .with(".email", vec![email.clone()])
            .with("phoneNumber", vec![phone.clone()]);
        let (engine, reporter) = engine(page);

        let summary = engine.initialize(&[
            Mapping::new(5, ".email", "value").on_load(),
            Mapping::new(10, "phoneNumber", "text").on_change(),
        ]);

        assert!(summary.is_clean());
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.listeners, 1);
        assert_eq!(reporter.len(), 1);

        phone.dispatch_change().unwrap();
        // the load-triggered element has no listener
        email.dispatch_change().unwrap();

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].id, MappingId::Number(10));
        assert_eq!(events[1].value, "");
    }

    #[test]
    fn test_initialize_isolates_failures() {
        let page = SelectorMap::new()
            .with("#bad", vec![input("x")])
            .with("#good", vec![input("y")]);
        let (engine, reporter) = engine(page);

        let summary = engine.initialize(&[
            Mapping::new(1, "#bad", "bogus").on_load(),
            Mapping::new(2, "#good", "value").on_load(),
        ]);

        assert!(!summary.is_clean());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].id, MappingId::Number(1));
        assert_eq!(summary.failures[0].selector, "#bad");
        assert_eq!(summary.sent, 1);
        assert_eq!(reporter.latest(&MappingId::Number(2)), Some("y".to_string()));
    }

    #[test]
    fn test_handlers_keep_their_own_mapping() {
        let first = input("one");
        let second = input("two");
        let page = SelectorMap::new()
            .with("#first", vec![first.clone()])
            .with("#second", vec![second.clone()]);
        let (engine, reporter) = engine(page);

        engine.initialize(&[
            Mapping::new("first", "#first", "value"),
            Mapping::new("second", "#second", "value"),
        ]);

        second.dispatch_change().unwrap();
        first.dispatch_change().unwrap();
        second.dispatch_change().unwrap();

        let pairs: Vec<_> = reporter
            .events()
            .into_iter()
            .map(|e| (e.id.to_string(), e.value))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("second".to_string(), "two".to_string()),
                ("first".to_string(), "one".to_string()),
                ("second".to_string(), "two".to_string()),
            ]
        );
    }
}
