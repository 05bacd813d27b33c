//! Certificate PDF rendering.
//!
//! A single A4 portrait page: title, the completion statement, the
//! certificate code, a signature line and a QR code pointing at the
//! verification URL. `printpdf` documents are not `Send`, so callers on the
//! async runtime should render inside `spawn_blocking`.

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};
use qrcode::{Color as QrColor, QrCode};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const PT_TO_MM: f32 = 0.3528;
/// Rough average glyph width of Helvetica, in ems.
const AVG_GLYPH_EM: f32 = 0.5;
const BODY_WRAP: usize = 60;
const QR_SIZE: f32 = 40.0;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to encode QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] printpdf::Error),
}

#[derive(Debug, Clone)]
pub struct CertificateDocument {
    pub student_name: String,
    pub course_title: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub verify_url: String,
}

impl CertificateDocument {
    pub fn statement(&self) -> String {
        format!(
            "This is to certify that {} has successfully completed the course \"{}\" on {}.",
            self.student_name,
            self.course_title,
            self.issued_at.format("%d %b %Y")
        )
    }

    pub fn file_name(&self) -> String {
        format!("certificate_{}.pdf", self.code)
    }
}

/// Greedy word wrap on character count.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn centered_x(text: &str, font_size: f32) -> Mm {
    let width = text.chars().count() as f32 * font_size * AVG_GLYPH_EM * PT_TO_MM;
    Mm(((PAGE_WIDTH - width) / 2.0).max(10.0))
}

fn draw_centered(layer: &PdfLayerReference, text: &str, size: f32, y: f32, font: &IndirectFontRef) {
    layer.use_text(text, size, centered_x(text, size), Mm(y), font);
}

fn draw_qr(layer: &PdfLayerReference, data: &str, left: f32, bottom: f32) -> Result<(), RenderError> {
    let code = QrCode::new(data.as_bytes())?;
    let width = code.width();
    let module = QR_SIZE / width as f32;

    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    for (index, color) in code.to_colors().into_iter().enumerate() {
        if color != QrColor::Dark {
            continue;
        }
        let (col, row) = ((index % width) as f32, (index / width) as f32);
        let x = left + col * module;
        let top = bottom + QR_SIZE - row * module;
        layer.add_rect(Rect::new(Mm(x), Mm(top - module), Mm(x + module), Mm(top)));
    }
    Ok(())
}

pub fn render_certificate(doc: &CertificateDocument) -> Result<Vec<u8>, RenderError> {
    let (pdf, page, layer) = PdfDocument::new(
        format!("Certificate {}", doc.code),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Certificate",
    );
    let layer = pdf.get_page(page).get_layer(layer);

    let title_font = pdf.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let body_font = pdf.add_builtin_font(BuiltinFont::Helvetica)?;
    let sign_font = pdf.add_builtin_font(BuiltinFont::HelveticaOblique)?;

    draw_centered(&layer, "Certificate of Completion", 24.0, PAGE_HEIGHT - 40.0, &title_font);

    let mut y = PAGE_HEIGHT - 80.0;
    for line in wrap_words(&doc.statement(), BODY_WRAP) {
        draw_centered(&layer, &line, 14.0, y, &body_font);
        y -= 10.0;
    }

    y -= 10.0;
    draw_centered(&layer, &format!("Certificate Code: {}", doc.code), 14.0, y, &body_font);

    let signature_x = Mm(PAGE_WIDTH - 85.0);
    layer.use_text("______________________", 12.0, signature_x, Mm(y - 30.0), &sign_font);
    layer.use_text("Instructor / Admin Signature", 12.0, signature_x, Mm(y - 38.0), &sign_font);

    draw_qr(&layer, &doc.verify_url, 150.0, 20.0)?;

    Ok(pdf.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn document() -> CertificateDocument {
        CertificateDocument {
            student_name: "Ada Lovelace".to_string(),
            course_title: "Analytical Engines".to_string(),
            code: "CERT-2025-000042".to_string(),
            issued_at: Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap(),
            verify_url: "https://yourdomain.com/verify/CERT-2025-000042".to_string(),
        }
    }

    #[test]
    fn test_statement_wording() {
        assert_eq!(
            document().statement(),
            "This is to certify that Ada Lovelace has successfully completed the course \"Analytical Engines\" on 07 Mar 2025."
        );
        assert_eq!(document().file_name(), "certificate_CERT-2025-000042.pdf");
    }

    #[test]
    fn test_wrap_words_respects_width() {
        let lines = wrap_words(&document().statement(), 30);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 30));
        assert_eq!(lines.join(" "), document().statement());
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = render_certificate(&document()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }
}
