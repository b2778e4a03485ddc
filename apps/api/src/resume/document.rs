//! Downloadable résumé document: a one-page PDF carrying the owner's name and
//! title, cached on disk per file name.

use std::io;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

/// `Alex Chen` → `Alex_Chen_Resume.pdf`. Whitespace runs become one underscore.
pub fn resume_filename(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("{stem}_Resume.pdf")
}

/// Restricts a client-supplied file name to characters safe in a
/// `Content-Disposition` header. `None` if nothing usable remains.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.trim_matches('_').is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}

fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Renders a single US-letter page with `heading` in 24pt Helvetica.
pub fn render_pdf(heading: &str) -> Bytes {
    let stream = format!(
        "BT\n/F1 24 Tf\n72 700 Td\n({}) Tj\nET\n",
        escape_pdf_text(heading)
    );
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 4 0 R >> >> \
         /MediaBox [0 0 612 792] /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /Name /F1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}endstream", stream.len(), stream),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));

    Bytes::from(pdf)
}

/// Returns the cached document for `filename` under `dir`, rendering and
/// writing it first if absent.
pub async fn cached_pdf(dir: &Path, filename: &str, heading: &str) -> io::Result<Bytes> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);

    if !tokio::fs::try_exists(&path).await? {
        debug!("Rendering resume document to {}", path.display());
        tokio::fs::write(&path, render_pdf(heading)).await?;
    }

    Ok(Bytes::from(tokio::fs::read(&path).await?))
}
