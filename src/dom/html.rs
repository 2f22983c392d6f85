use crate::{
    dom::{ElementNode, FormElement, Page},
    error::{CaptureError, Result},
};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Value a checkbox or radio reports when it has no `value` attribute
const DEFAULT_CHECKABLE_VALUE: &str = "on";

/// Page built from a static HTML document
///
/// Selectors are matched with a full CSS selector engine against the parsed
/// document. Every element gets one stateful [`FormElement`] at parse time,
/// so values changed through a handle (and the listeners attached to it)
/// persist across queries.
pub struct HtmlPage {
    document: Html,
    elements: HashMap<NodeId, FormElement>,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| CaptureError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl HtmlPage {
    /// Parse a full HTML document
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let all = parse_selector("*")?;
        let option = parse_selector("option")?;

        let elements = document
            .select(&all)
            .map(|el| (el.id(), FormElement::new(node_from(el, &option))))
            .collect::<HashMap<_, _>>();

        log::debug!("Parsed HTML page with {} elements", elements.len());

        Ok(Self { document, elements })
    }

    /// Read and parse an HTML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Self::parse(&html)
    }

    /// Count total elements in the document
    pub fn count_elements(&self) -> usize {
        self.elements.len()
    }
}

/// Initial element state as a browser would present it
fn node_from(el: ElementRef<'_>, option: &Selector) -> ElementNode {
    let data = el.value();
    let tag_name = data.name().to_ascii_lowercase();

    let value = match tag_name.as_str() {
        "textarea" => el.text().collect::<String>(),
        "select" => {
            let options: Vec<_> = el.select(option).collect();
            options
                .iter()
                .find(|o| o.value().attr("selected").is_some())
                .or_else(|| options.first())
                .map(|o| match o.value().attr("value") {
                    Some(v) => v.to_string(),
                    None => o.text().collect::<String>().trim().to_string(),
                })
                .unwrap_or_default()
        }
        "input" if is_checkable(data.attr("type")) => {
            data.attr("value").unwrap_or(DEFAULT_CHECKABLE_VALUE).to_string()
        }
        _ => data.attr("value").unwrap_or_default().to_string(),
    };

    ElementNode::new(tag_name)
        .with_inner_html(el.inner_html())
        .with_value(value)
        .with_checked(data.attr("checked").is_some())
}

fn is_checkable(input_type: Option<&str>) -> bool {
    input_type.is_some_and(|t| t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio"))
}

impl Page for HtmlPage {
    type Element = FormElement;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<FormElement>> {
        let parsed = parse_selector(selector)?;

        Ok(self
            .document
            .select(&parsed)
            .filter_map(|el| self.elements.get(&el.id()).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dom::FieldElement, mapping::Mapping};

    const FORM: &str = r#"
        <html><body>
            <form id="signup">
                <input class="email" id="primary" value="first@example.com">
                <input class="email" value="second@example.com">
                <input type="checkbox" id="optin" checked>
                <input type="radio" name="plan" value="basic">
                <input type="radio" name="plan" value="pro" checked>
                <textarea id="notes">Hello there</textarea>
                <select id="country">
                    <option value="fr">France</option>
                    <option value="uk" selected>United Kingdom</option>
                </select>
                <div id="summary"><b>Total</b></div>
            </form>
        </body></html>
    "#;

    #[test]
    fn test_class_selector_matches_all() {
        let page = HtmlPage::parse(FORM).unwrap();
        let emails = page.query_selector_all(".email").unwrap();

        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].value().unwrap(), "first@example.com");
        assert_eq!(emails[1].value().unwrap(), "second@example.com");
    }

    #[test]
    fn test_checked_state() {
        let page = HtmlPage::parse(FORM).unwrap();
        assert!(page.query_selector_all("#optin").unwrap()[0].checked().unwrap());

        let radios = page.query_selector_all("input[name=plan]").unwrap();
        assert_eq!(radios.len(), 2);
        assert!(!radios[0].checked().unwrap());
        assert!(radios[1].checked().unwrap());
    }

    #[test]
    fn test_textarea_and_select_values() {
        let page = HtmlPage::parse(FORM).unwrap();
        assert_eq!(page.query_selector_all("#notes").unwrap()[0].value().unwrap(), "Hello there");
        assert_eq!(page.query_selector_all("#country").unwrap()[0].value().unwrap(), "uk");
    }

    #[test]
    fn test_inner_html() {
        let page = HtmlPage::parse(FORM).unwrap();
        let summary = &page.query_selector_all("#summary").unwrap()[0];
        assert_eq!(summary.inner_html().unwrap(), "<b>Total</b>");
        assert!(summary.value().unwrap().is_empty());
    }

    #[test]
    fn test_state_persists_across_queries() {
        let page = HtmlPage::parse(FORM).unwrap();
        page.query_selector_all("#primary").unwrap()[0].set_value("changed@example.com");

        let again = page.query_selector_all(".email").unwrap();
        assert_eq!(again[0].value().unwrap(), "changed@example.com");
    }

    #[test]
    fn test_checkable_without_value_reads_on() {
        let page = HtmlPage::parse(concat!(
            "<html><body>",
            "<input type='radio' name='r' checked>",
            "<input type='CHECKBOX' id='agree'>",
            "<input type='checkbox' id='empty' value=''>",
            "<input type='text' id='plain'>",
            "</body></html>"
        ))
        .unwrap();

        let radio = &page.query_selector_all("input[name=r]").unwrap()[0];
        assert_eq!(radio.value().unwrap(), "on");
        assert_eq!(
            crate::capture::extract(&Mapping::new(1, "input[name=r]", "radio"), radio).unwrap(),
            "on"
        );

        assert_eq!(page.query_selector_all("#agree").unwrap()[0].value().unwrap(), "on");
        assert_eq!(page.query_selector_all("#empty").unwrap()[0].value().unwrap(), "");
        assert_eq!(page.query_selector_all("#plain").unwrap()[0].value().unwrap(), "");
    }

    #[test]
    fn test_query_returns_document_order() {
        let page = HtmlPage::parse(FORM).unwrap();
        let inputs = page.query_selector_all("form input").unwrap();

        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs[0].value().unwrap(), "first@example.com");
        assert_eq!(inputs[4].value().unwrap(), "pro");
        assert!(inputs[0].same_element(&page.query_selector_all("#primary").unwrap()[0]));
    }

    #[test]
    fn test_no_match() {
        let page = HtmlPage::parse(FORM).unwrap();
        assert!(page.query_selector_all("#missing").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let page = HtmlPage::parse(FORM).unwrap();
        let err = page.query_selector_all("input[").unwrap_err();
        assert!(matches!(err, CaptureError::InvalidSelector { .. }));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_count_elements() {
        let page = HtmlPage::parse("<html><head></head><body><p>a</p></body></html>").unwrap();
        // html, head, body, p
        assert_eq!(page.count_elements(), 4);
    }
}
