use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Writes order PDFs fetched from the backend into a local directory
pub struct PdfExporter {
    output_dir: PathBuf,
}

impl PdfExporter {
    pub fn new(output_dir: &str) -> Self {
        Self {
            output_dir: PathBuf::from(output_dir),
        }
    }

    /// `siparis-<invoice_no>.pdf`, with path separators in the number replaced
    pub fn file_name(invoice_no: &str) -> String {
        let safe: String = invoice_no
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
                c => c,
            })
            .collect();
        let safe = if safe.is_empty() { "order".to_string() } else { safe };
        format!("siparis-{}.pdf", safe)
    }

    /// Save the PDF, creating the output directory on first use. Returns the written path.
    pub fn save(&self, invoice_no: &str, bytes: &[u8]) -> Result<PathBuf> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).with_context(|| {
                format!("could not create {}", self.output_dir.display())
            })?;
        }

        let path = self.output_dir.join(Self::file_name(invoice_no));
        fs::write(&path, bytes).with_context(|| format!("could not write {}", path.display()))?;

        tracing::info!(path = %path.display(), size = bytes.len(), "saved order pdf");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_order_number() {
        assert_eq!(PdfExporter::file_name("PRF-2024-001"), "siparis-PRF-2024-001.pdf");
        assert_eq!(PdfExporter::file_name("2024/15"), "siparis-2024-15.pdf");
        assert_eq!(PdfExporter::file_name("  "), "siparis-order.pdf");
    }

    #[test]
    fn save_creates_directory_and_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pdfs").join("orders");
        let exporter = PdfExporter::new(nested.to_str().unwrap());

        let path = exporter.save("PRF-7", b"%PDF-1.4").unwrap();

        assert_eq!(path, nested.join("siparis-PRF-7.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4");
    }
}
