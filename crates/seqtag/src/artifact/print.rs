use crate::{Error, Result, SymbolOptions, SymbolRenderer, TagRecord};
use std::fmt::Write;

/// Script source embedded in the print document for client-side rendering.
const SYMBOLOGY_SRC: &str = "https://cdn.jsdelivr.net/npm/jsbarcode@3.11.5/dist/JsBarcode.all.min.js";

/// Policy and layout options for the print document.
#[derive(Clone, Debug)]
pub struct PrintOptions {
    /// Only print records that carry a non-empty label.
    ///
    /// Defaults to `true`, the stricter reading; identifier-only symbols
    /// are still printable by lowering the flag.
    pub require_label: bool,
    /// Symbol rendering options applied to every record.
    pub symbol: SymbolOptions,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            require_label: true,
            symbol: SymbolOptions::default(),
        }
    }
}

/// Builds the standalone printable document for a batch.
///
/// Filters to selected records, then — under `require_label` — to records
/// with a non-empty label. Each surviving record becomes one block: label
/// (if present), symbol placeholder, identifier text, primary-value text,
/// top to bottom. The symbol encodes the identifier. Rendering instructions
/// are deferred to document load; a record whose symbol fails to render
/// keeps its block, minus the symbol.
///
/// # Errors
///
/// - [`Error::NothingSelected`] when no record is selected.
/// - [`Error::NothingLabeled`] when records are selected but the label
///   filter leaves none — a distinct message, so the user knows selection
///   was not the problem.
pub fn build_print_artifact<R: SymbolRenderer>(
    records: &[TagRecord],
    options: &PrintOptions,
    renderer: &R,
) -> Result<String> {
    let selected: Vec<&TagRecord> = records.iter().filter(|r| r.selected).collect();
    if selected.is_empty() {
        return Err(Error::NothingSelected);
    }

    let printable: Vec<&TagRecord> = if options.require_label {
        selected
            .into_iter()
            .filter(|r| r.label_text().is_some())
            .collect()
    } else {
        selected
    };
    if printable.is_empty() {
        return Err(Error::NothingLabeled);
    }

    let mut body = String::new();
    let mut script = String::new();
    for (index, record) in printable.iter().enumerate() {
        let target = format!("symbol-{index}");
        body.push_str("      <div class=\"tag-item\">\n");
        if let Some(label) = record.label_text() {
            let _ = writeln!(
                body,
                "        <div class=\"tag-label\">{}</div>",
                escape_html(label)
            );
        }
        let _ = writeln!(body, "        <svg id=\"{target}\" class=\"tag-symbol\"></svg>");
        let _ = writeln!(
            body,
            "        <div class=\"tag-identifier\">{}</div>",
            escape_html(&record.identifier)
        );
        let _ = writeln!(
            body,
            "        <div class=\"tag-value\">{}</div>",
            escape_html(&record.value)
        );
        body.push_str("      </div>\n");

        match renderer.render(&target, &record.identifier, &options.symbol) {
            Ok(call) => {
                let _ = writeln!(script, "        {call}");
            }
            Err(_e) => {
                // Per-symbol failures never abort the batch.
                #[cfg(feature = "tracing")]
                tracing::warn!("skipping symbol for record {}: {_e}", record.id);
            }
        }
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Tags</title>
    <style>
      @media print {{
        @page {{ size: auto; margin: 10mm; }}
        body {{ margin: 0; padding: 20px; font-family: Arial, sans-serif; }}
      }}
      .tag-container {{ display: flex; flex-wrap: wrap; gap: 20px; justify-content: center; }}
      .tag-item {{
        display: flex; flex-direction: column; align-items: center;
        padding: 15px; border: 1px solid #eee; border-radius: 8px;
        margin-bottom: 20px; page-break-inside: avoid;
      }}
      .tag-label {{ margin-bottom: 3px; font-size: 12px; text-align: center; font-weight: 600; }}
      .tag-identifier {{ margin-top: 3px; font-size: 10px; text-align: center; font-weight: 500; }}
      .tag-value {{ margin-top: 2px; font-size: 8px; text-align: center; font-weight: 600; }}
    </style>
  </head>
  <body>
    <div class="tag-container">
{body}    </div>
    <script src="{src}"></script>
    <script>
      document.addEventListener('DOMContentLoaded', function() {{
{script}        setTimeout(function() {{ window.print(); }}, 500);
      }});
    </script>
  </body>
</html>
"#,
        body = body,
        script = script,
        src = SYMBOLOGY_SRC,
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
