// src/services/markup.rs

use crate::models::preview::PreviewDocument;

const PRINT_STYLES: &str = r#"
@page { size: A4; margin: 12mm; }
body { font-family: "DejaVu Sans", Arial, sans-serif; color: #111827; margin: 0; }
#invoice-preview { max-width: 560px; margin: 0 auto; padding: 16px; }
.org { text-align: center; margin-bottom: 16px; }
.org img { height: 64px; width: 64px; object-fit: contain; }
.org h1 { font-size: 22px; margin: 4px 0; }
.muted { color: #6b7280; font-size: 12px; }
.title { display: flex; justify-content: space-between; align-items: flex-start; }
.title h2 { font-size: 18px; margin: 0; }
.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; margin-top: 16px; font-size: 14px; }
.value { font-weight: 600; white-space: pre-wrap; }
.notes { margin-top: 16px; font-size: 14px; }
.signatures { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-top: 24px; align-items: end; }
.signature-box { margin-top: 24px; height: 56px; border: 1px solid #e5e7eb; border-radius: 6px;
  display: flex; align-items: center; justify-content: center; font-size: 12px; color: #9ca3af; }
.right { text-align: right; font-size: 14px; }
.footer { margin-top: 12px; font-size: 11px; color: #9ca3af; }
"#;

/// Full print page for the preview. Only the preview is in it; the form and
/// its buttons never reach the printer.
pub fn render_print_page(doc: &PreviewDocument) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{} - {}</title>\n",
        html_escape(doc.title),
        html_escape(&doc.signatures.receiver)
    ));
    html.push_str("<style>");
    html.push_str(PRINT_STYLES);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&render_preview(doc));
    html.push_str("</body>\n</html>\n");

    html
}

/// The preview fragment itself.
pub fn render_preview(doc: &PreviewDocument) -> String {
    let mut html = String::new();
    html.push_str("<main id=\"invoice-preview\">\n");

    // --- HEADER ---
    html.push_str("<header class=\"org\">\n");
    if let Some(logo) = &doc.header.logo_path {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Company Logo\">\n",
            html_escape(&logo.display().to_string())
        ));
    }
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&doc.header.name)));
    html.push_str(&format!("<div class=\"muted\">{}</div>\n", html_escape(&doc.header.address)));
    html.push_str(&format!("<div class=\"muted\">{}</div>\n", html_escape(&doc.header.contact)));
    html.push_str("</header>\n");

    // --- TITLE + DATE ---
    html.push_str(&format!(
        "<section class=\"title\"><div><h2>{}</h2><div class=\"muted\">{}</div></div>\
         <div class=\"right\"><div class=\"value\">Date</div><div>{}</div></div></section>\n",
        html_escape(doc.title),
        html_escape(doc.subtitle),
        html_escape(&doc.date)
    ));

    // --- GRID ---
    html.push_str("<section class=\"grid\">\n");
    for cell in &doc.grid {
        html.push_str(&format!(
            "<div><div class=\"muted\">{}</div><div class=\"value\">{}</div></div>\n",
            html_escape(cell.label),
            html_escape(&cell.value)
        ));
    }
    html.push_str("</section>\n");

    html.push_str(&format!(
        "<section class=\"notes\"><div class=\"muted\">Notes</div><div class=\"value\">{}</div></section>\n",
        html_escape(&doc.notes)
    ));

    // --- SIGNATURES ---
    let sig = &doc.signatures;
    html.push_str(&format!(
        "<section class=\"signatures\">\n\
         <div><div class=\"muted\">{}</div><div class=\"signature-box\">{}</div></div>\n\
         <div class=\"right\"><div class=\"muted\">{}</div><div>{}</div>\
         <div class=\"value\">{}</div><div class=\"muted\">{}</div></div>\n\
         </section>\n",
        html_escape(sig.receiver_label),
        html_escape(&sig.receiver),
        html_escape(&sig.signatory_heading),
        html_escape(&sig.signatory),
        html_escape(sig.signatory_caption),
        html_escape(&sig.signed_by)
    ));

    html.push_str(&format!("<footer class=\"footer\">{}</footer>\n", html_escape(doc.footer)));
    html.push_str("</main>\n");

    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
