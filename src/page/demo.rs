//! The homework page layout the handlers expect.

use super::document::{DisplayStyle, Document, ElementId};
use super::handlers::{
    AGE_INPUT, CLICK_TARGET, CONVERSION_FROM, CONVERSION_INPUT, CONVERSION_OUTPUT, CONVERSION_TO,
    DYNAMIC_SECTION, EMAIL_INPUT, LINKS_SECTION, PASSWORD_INPUT, USERNAME_INPUT,
};

/// Creates an element, sets its attributes and attaches it to `parent`
fn add(
    doc: &mut Document,
    parent: ElementId,
    tag: &str,
    id: Option<&str>,
    classes: &[&str],
    text: &str,
) -> ElementId {
    let node = doc.create_element(tag);
    if let Some(element) = doc.get_mut(node) {
        element.id = id.map(str::to_owned);
        element.classes = classes.iter().map(|c| c.to_string()).collect();
        element.text = text.to_owned();
    }
    doc.append_child(parent, node);
    node
}

fn add_input(doc: &mut Document, parent: ElementId, tag: &str, id: &str, value: &str) -> ElementId {
    let node = add(doc, parent, tag, Some(id), &[], "");
    doc.set_value(node, value);
    node
}

/// Builds the page: the link section, the dynamic section, the click target,
/// the unit converter and the sign-up form
pub fn sample_document() -> Document {
    let mut doc = Document::new();
    let body = doc.body();

    let links = add(&mut doc, body, "div", Some(LINKS_SECTION), &[], "");
    add(&mut doc, links, "a", None, &[], "Home");
    // Hidden by the stylesheet until the handler reveals it
    let hidden = add(&mut doc, links, "div", None, &["hidden"], "");
    doc.set_display(hidden, DisplayStyle::None);
    add(&mut doc, hidden, "a", None, &["malicious"], "Free prize");
    add(&mut doc, hidden, "a", None, &[], "Documentation");
    add(&mut doc, hidden, "a", None, &["malicious", "external"], "Login here");

    add(&mut doc, body, "div", Some(DYNAMIC_SECTION), &[], "");
    add(&mut doc, body, "div", Some(CLICK_TARGET), &[], "Click me");

    let converter = add(&mut doc, body, "div", Some("converter"), &[], "");
    add_input(&mut doc, converter, "input", CONVERSION_INPUT, "100");
    add_input(&mut doc, converter, "select", CONVERSION_FROM, "cm");
    add_input(&mut doc, converter, "select", CONVERSION_TO, "meter");
    add_input(&mut doc, converter, "input", CONVERSION_OUTPUT, "");

    let form = add(&mut doc, body, "form", Some("signup"), &[], "");
    add_input(&mut doc, form, "input", USERNAME_INPUT, "");
    add_input(&mut doc, form, "input", EMAIL_INPUT, "");
    add_input(&mut doc, form, "input", PASSWORD_INPUT, "");
    add_input(&mut doc, form, "input", AGE_INPUT, "");

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::handlers::{hide_malicious_links, run_unit_converter};
    use crate::page::RecordingHost;

    #[test]
    fn test_sample_document_has_every_field() {
        let doc = sample_document();
        for id in [
            LINKS_SECTION,
            DYNAMIC_SECTION,
            CLICK_TARGET,
            CONVERSION_INPUT,
            CONVERSION_FROM,
            CONVERSION_TO,
            CONVERSION_OUTPUT,
            USERNAME_INPUT,
            EMAIL_INPUT,
            PASSWORD_INPUT,
            AGE_INPUT,
        ] {
            assert!(doc.get_element_by_id(id).is_some(), "Missing element {}", id);
        }
    }

    #[test]
    fn test_sample_document_defaults() {
        let mut doc = sample_document();
        let mut host = RecordingHost::default();

        assert_eq!(run_unit_converter(&mut doc, &mut host), Ok(Some(1.0)));
        assert_eq!(doc.value_of(CONVERSION_OUTPUT), Some("1.0000"));

        assert_eq!(doc.hidden_elements().len(), 1);
        hide_malicious_links(&mut doc);
        assert_eq!(doc.hidden_elements().len(), 2);
    }
}
