//! Single entry point used by the terminal front-end.
//!
use std::{fs::File, io::BufReader, path::Path};

use log::{info, warn};
use thiserror::Error;

use crate::models::{FormFields, FormReport};
use crate::page::demo::sample_document;
use crate::page::document::{Document, Event, Host};
use crate::page::handlers::{
    append_dynamic_section, hide_malicious_links, register_event_listeners, run_unit_converter,
    submit_form, AGE_INPUT, CLICK_TARGET, EMAIL_INPUT, PASSWORD_INPUT, USERNAME_INPUT,
};
use crate::page::PageError;
use crate::utils::conversion::{convert, format_fixed4, ConversionError, Unit};
use crate::utils::input_validation::validate_form;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Cannot read submission: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed submission: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct FormService;

impl FormService {
    pub fn new() -> Self {
        Self
    }

    /// Validates a submission and logs the outcome
    pub fn submit(&self, fields: &FormFields) -> FormReport {
        let report = validate_form(fields);

        if report.is_valid() {
            info!("Form accepted for user {}", fields.username);
        } else {
            let rules: Vec<String> = report.failures().map(|rule| format!("{rule:?}")).collect();
            warn!("Form rejected for user {:?}: {}", fields.username, rules.join(", "));
        }
        report
    }

    /// Reads a JSON submission from disk and validates it
    pub fn submit_file(&self, path: &Path) -> Result<FormReport, ServiceError> {
        let reader = BufReader::new(File::open(path)?);
        let fields: FormFields = serde_json::from_reader(reader)?;
        info!("Loaded submission from {}", path.display());
        Ok(self.submit(&fields))
    }

    pub fn convert(&self, value: f64, from: Unit, to: Unit) -> Result<f64, ServiceError> {
        let converted = convert(value, from, to).inspect_err(|e| warn!("Conversion failed: {e}"))?;
        info!("{value} {from} = {} {to}", format_fixed4(converted));
        Ok(converted)
    }

    /// Builds the sample page and runs every handler on it, as the browser would.
    /// Messages for the user go to `host`.
    pub fn run_page(&self, fields: &FormFields, host: &mut dyn Host) -> Result<Document, ServiceError> {
        let mut doc = sample_document();

        let hidden = hide_malicious_links(&mut doc);
        info!("{hidden} malicious link(s) hidden");
        append_dynamic_section(&mut doc)?;
        register_event_listeners(&mut doc);
        run_unit_converter(&mut doc, host)?;

        for (id, value) in [
            (USERNAME_INPUT, &fields.username),
            (PASSWORD_INPUT, &fields.password),
            (EMAIL_INPUT, &fields.email),
            (AGE_INPUT, &fields.age),
        ] {
            if let Some(node) = doc.get_element_by_id(id) {
                doc.set_value(node, value);
            }
        }
        let report = submit_form(&doc, host)?;
        info!("Page form valid: {}", report.is_valid());

        if let Some(button) = doc.get_element_by_id(CLICK_TARGET) {
            doc.dispatch(button, &Event::click(), host);
        }
        let body = doc.body();
        doc.dispatch(body, &Event::key_down("Enter"), host);

        Ok(doc)
    }
}
