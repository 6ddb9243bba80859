use crate::{Error, Result};

/// Rendering options for one scannable symbol.
///
/// Mirrors the knobs the symbology library exposes; defaults match the
/// layout the print document was designed around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolOptions {
    /// Render the encoded value as text beneath the bars.
    pub show_text: bool,
    /// Font size for the value text, in points.
    pub font_size: u32,
    /// Quiet-zone margin around the bars, in pixels.
    pub margin: u32,
    /// Width of a single bar module, in pixels.
    pub bar_width: u32,
    /// Bar height, in pixels.
    pub height: u32,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        Self {
            show_text: false,
            font_size: 10,
            margin: 5,
            bar_width: 1,
            height: 40,
        }
    }
}

/// Renders a scannable symbol for a value, bound to a target area.
///
/// `target` names the document element the symbol attaches to; `value` is
/// the string the symbol encodes (the allocated identifier, never the raw
/// primary value). Errors are per-symbol: a failed render must not abort
/// the batch, so callers log and continue.
pub trait SymbolRenderer {
    /// Returns a rendering instruction bound to `target`.
    fn render(&self, target: &str, value: &str, options: &SymbolOptions) -> Result<String>;
}

/// Code 128 renderer emitting a deferred script call per symbol.
///
/// The print document is self-contained: each symbol is an empty `<svg>`
/// placeholder plus one generated `JsBarcode` call executed when the
/// document loads. Code 128 encodes the full ASCII range; anything outside
/// it is a per-symbol error.
#[derive(Clone, Copy, Debug, Default)]
pub struct Code128ScriptRenderer;

impl SymbolRenderer for Code128ScriptRenderer {
    fn render(&self, target: &str, value: &str, options: &SymbolOptions) -> Result<String> {
        if value.is_empty() {
            return Err(Error::Render {
                context: format!("empty value for symbol `{target}`"),
            });
        }
        if !value.is_ascii() {
            return Err(Error::Render {
                context: format!("value for symbol `{target}` is not Code 128 encodable"),
            });
        }
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        Ok(format!(
            concat!(
                "JsBarcode(\"#{target}\", \"{value}\", {{ format: \"CODE128\", ",
                "displayValue: {show}, fontSize: {font}, margin: {margin}, ",
                "width: {width}, height: {height}, lineColor: \"#000\" }});"
            ),
            target = target,
            value = escaped,
            show = options.show_text,
            font = options.font_size,
            margin = options.margin,
            width = options.bar_width,
            height = options.height,
        ))
    }
}
