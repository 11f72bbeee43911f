//! PDF export for prescriptions and inventory reports.
//!
//! Documents are rendered in memory with `printpdf` and returned as the
//! byte stream offered for download. Rendering is line-oriented: a title,
//! optional metadata lines, then one line per list entry, with fresh A4
//! pages appended whenever the cursor passes the bottom margin.
//!
//! Export is refused (validation error, no document produced) when required
//! patient metadata is blank or the session list is empty.

use crate::{Error, Patient, Result, Session};
use chrono::Local;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use std::io::BufWriter;

/// Fixed download filename for the prescription variant
pub const PRESCRIPTION_FILENAME: &str = "prescription.pdf";

/// Fixed download filename for the inventory variant
pub const INVENTORY_FILENAME: &str = "pharmacy_inventory.pdf";

/// Line-oriented writer over an A4 document, breaking pages as needed.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: Mm,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(210.0), Mm(297.0), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::Pdf(format!("font error: {}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::Pdf(format!("font error: {}", e)))?;

        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: Mm(280.0),
        })
    }

    fn break_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = Mm(280.0);
    }

    fn heading(&mut self, text: &str) {
        if self.y.0 < 20.0 {
            self.break_page();
        }
        self.layer.use_text(text, 14.0, Mm(20.0), self.y, &self.bold);
        self.y -= Mm(8.0);
    }

    fn line(&mut self, text: &str) {
        if self.y.0 < 20.0 {
            self.break_page();
        }
        self.layer.use_text(text, 11.0, Mm(20.0), self.y, &self.font);
        self.y -= Mm(6.0);
    }

    fn gap(&mut self) {
        self.y -= Mm(4.0);
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| Error::Pdf(format!("save error: {}", e)))?;
        buf.into_inner()
            .map_err(|e| Error::Pdf(format!("buffer error: {}", e)))
    }
}

/// Body lines of the prescription document, in render order.
fn prescription_lines(patient: &Patient, session: &Session) -> Vec<String> {
    let mut lines = vec![
        format!("Patient Name: {}", patient.full_name),
        format!("Email: {}", patient.email),
        format!("Telephone: {}", patient.telephone),
        "Medicines:".to_string(),
    ];
    lines.extend(session.entries().iter().map(|drug| format!("- {}", drug)));
    lines
}

/// Body lines of the inventory report, in render order.
fn inventory_lines(session: &Session) -> Vec<String> {
    let mut lines = vec!["Current Inventory:".to_string()];
    lines.extend(session.entries().iter().map(|drug| format!("- {}", drug)));
    lines
}

/// Render the prescription document for a confirmed session.
///
/// Refused when any patient field is blank or the list is empty.
pub fn prescription_pdf(patient: &Patient, session: &Session) -> Result<Vec<u8>> {
    patient.validate()?;
    if session.is_empty() {
        return Err(Error::Validation(
            "please add at least one medicine before confirming".into(),
        ));
    }

    let mut writer = PageWriter::new("Prescription")?;
    writer.heading("Prescription");
    writer.line(&format!("Generated: {}", Local::now().format("%Y-%m-%d")));
    writer.gap();
    for line in prescription_lines(patient, session) {
        writer.line(&line);
    }

    tracing::info!(session = %session.id(), "Rendered prescription document");
    writer.finish()
}

/// Render the inventory report. Refused when the list is empty.
pub fn inventory_pdf(session: &Session) -> Result<Vec<u8>> {
    if session.is_empty() {
        return Err(Error::Validation(
            "inventory is empty; add drugs to generate a report".into(),
        ));
    }

    let mut writer = PageWriter::new("Pharmacy Inventory Report")?;
    writer.heading("Pharmacy Inventory Report");
    writer.line(&format!("Generated: {}", Local::now().format("%Y-%m-%d")));
    writer.gap();
    for line in inventory_lines(session) {
        writer.line(&line);
    }

    tracing::info!(session = %session.id(), "Rendered inventory document");
    writer.finish()
}
