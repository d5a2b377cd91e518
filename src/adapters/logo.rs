//! Local HTML/CSS wordmark renderer.

use super::{LogoRenderer, LogoSpec};
use crate::brand::HtmlCssLogo;
use crate::contrast::Rgb;
use crate::error::AdapterError;

#[derive(Debug, Clone, Default)]
pub struct HtmlCssLogoRenderer;

impl HtmlCssLogoRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Font names land inside a quoted CSS string.
fn css_font_name(font: &str) -> String {
    font.chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '{' | '}' | '\\'))
        .collect()
}

/// Colors are re-emitted from the parsed value, never copied through.
fn css_color(role: &str, color: &str) -> Result<String, AdapterError> {
    Rgb::parse(color)
        .map(|rgb| rgb.to_hex())
        .map_err(|e| AdapterError::MalformedOutput(format!("logo {} color: {}", role, e)))
}

impl LogoRenderer for HtmlCssLogoRenderer {
    fn render(&self, spec: &LogoSpec) -> Result<HtmlCssLogo, AdapterError> {
        let primary = css_color("primary", &spec.primary_color)?;
        let secondary = css_color("secondary", &spec.secondary_color)?;
        let html = format!(
            "<div class=\"logo-container\">\n  <div class=\"logo-text\">{}</div>\n</div>\n",
            escape_html(&spec.brand_name)
        );

        let css = format!(
            r#".logo-container {{
  display: inline-flex;
  align-items: center;
  justify-content: center;
  padding: 20px 40px;
  background: linear-gradient(135deg, {primary}, {secondary});
  border-radius: 12px;
}}

.logo-text {{
  font-family: '{font}', sans-serif;
  font-size: 48px;
  font-weight: 900;
  color: white;
  letter-spacing: -0.05em;
  text-transform: uppercase;
}}
"#,
            primary = primary,
            secondary = secondary,
            font = css_font_name(&spec.font_family),
        );

        Ok(HtmlCssLogo { html, css })
    }
}
