//! Handlers wired to the homework page.
//!
//! Each handler receives the document and the host explicitly, nothing is global.

use std::collections::BTreeSet;

use log::debug;

use super::document::{DisplayStyle, Document, ElementId, EventKind, Host};
use super::PageError;
use crate::models::{FormFields, FormReport};
use crate::utils::conversion::{convert_raw, format_fixed4, ConversionError};
use crate::utils::input_validation::validate_form;

pub const LINKS_SECTION: &str = "q5";
pub const DYNAMIC_SECTION: &str = "q6";
pub const CLICK_TARGET: &str = "div_btn";

pub const CONVERSION_INPUT: &str = "convertion_input";
pub const CONVERSION_OUTPUT: &str = "convertion_output";
pub const CONVERSION_FROM: &str = "convert_from_unit";
pub const CONVERSION_TO: &str = "convert_to_unit";

pub const USERNAME_INPUT: &str = "username";
pub const EMAIL_INPUT: &str = "email";
pub const PASSWORD_INPUT: &str = "password";
pub const AGE_INPUT: &str = "age";

pub const DYNAMIC_HEADING: &str = "Dynamic Heading";
pub const DYNAMIC_PARAGRAPH: &str = "This is a dynamically added paragraph.";

fn notify(host: &mut dyn Host, message: &str) {
    debug!("alert: {message}");
    host.alert(message);
}

fn require(doc: &Document, id: &str) -> Result<ElementId, PageError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| PageError::MissingElement(id.to_owned()))
}

fn require_value(doc: &Document, id: &str) -> Result<String, PageError> {
    doc.value_of(id)
        .map(str::to_owned)
        .ok_or_else(|| PageError::MissingElement(id.to_owned()))
}

/// Hides the malicious links of the hidden block in `#q5`, then reveals that block.
/// Returns the number of links hidden.
pub fn hide_malicious_links(doc: &mut Document) -> usize {
    let Some(section) = doc.get_element_by_id(LINKS_SECTION) else {
        return 0;
    };

    let hidden_blocks = doc.find_descendants(section, |e| e.has_class("hidden"));
    let links: BTreeSet<ElementId> = hidden_blocks
        .iter()
        .flat_map(|&block| doc.find_descendants(block, |e| e.tag == "a" && e.has_class("malicious")))
        .collect();

    for &link in &links {
        doc.set_display(link, DisplayStyle::None);
    }
    if let Some(&block) = hidden_blocks.first() {
        doc.set_display(block, DisplayStyle::Block);
    }

    debug!("{} malicious link(s) hidden", links.len());
    links.len()
}

/// Appends a block with a heading and a paragraph to `#q6`
pub fn append_dynamic_section(doc: &mut Document) -> Result<ElementId, PageError> {
    let section = require(doc, DYNAMIC_SECTION)?;

    let block = doc.create_element("div");
    let heading = doc.create_element("h2");
    doc.set_text(heading, DYNAMIC_HEADING);
    let paragraph = doc.create_element("p");
    doc.set_text(paragraph, DYNAMIC_PARAGRAPH);

    doc.append_child(block, heading);
    doc.append_child(block, paragraph);
    doc.append_child(section, block);
    Ok(block)
}

/// Alerts on clicks on `#div_btn` and on every key pressed in the page
pub fn register_event_listeners(doc: &mut Document) {
    if let Some(button) = doc.get_element_by_id(CLICK_TARGET) {
        doc.add_event_listener(button, EventKind::Click, |_, host| notify(host, "click"));
    }

    let body = doc.body();
    doc.add_event_listener(body, EventKind::KeyDown, |event, host| {
        let key = event.key.as_deref().unwrap_or_default();
        notify(host, &format!("The key '{key}' was pressed"));
    });
}

/// Converts the value of the converter input and writes the result in the output field.
/// Bad input is reported to the user, and leaves the output untouched.
pub fn run_unit_converter(doc: &mut Document, host: &mut dyn Host) -> Result<Option<f64>, PageError> {
    let value = require_value(doc, CONVERSION_INPUT)?;
    let output = require(doc, CONVERSION_OUTPUT)?;
    let from = require_value(doc, CONVERSION_FROM)?;
    let to = require_value(doc, CONVERSION_TO)?;

    match convert_raw(&value, &from, &to) {
        Ok(converted) => {
            doc.set_value(output, &format_fixed4(converted));
            Ok(Some(converted))
        }
        Err(ConversionError::InvalidNumber(_)) => {
            notify(host, "Please enter a valid number");
            Ok(None)
        }
        Err(ConversionError::InvalidUnit(_)) => {
            notify(host, "Invalid unit conversion");
            Ok(None)
        }
    }
}

/// Reads the sign-up form fields from the page
pub fn read_form(doc: &Document) -> Result<FormFields, PageError> {
    Ok(FormFields {
        username: require_value(doc, USERNAME_INPUT)?,
        password: require_value(doc, PASSWORD_INPUT)?,
        email: require_value(doc, EMAIL_INPUT)?,
        age: require_value(doc, AGE_INPUT)?,
    })
}

/// Validates the sign-up form and tells the user whether it is valid
pub fn submit_form(doc: &Document, host: &mut dyn Host) -> Result<FormReport, PageError> {
    let report = validate_form(&read_form(doc)?);

    if report.is_valid() {
        notify(host, "The form is valid");
    } else {
        notify(host, "The form is invalid");
    }
    Ok(report)
}
