//! Report rendering with handlebars.
//!
//! Custom helpers:
//! - won: format an amount as currency (200000 -> "₩200,000")
//! - eq: block equality check with an optional `{{else}}`

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, Renderable,
};
use serde::Serialize;
use tracing::debug;

use crate::report::TripReport;
use crate::templates::TemplateSet;
use crate::ItineraryError;

pub const REPORT_TEMPLATE: &str = "trip_report";

/// Handlebars registry with every template of a set compiled
pub struct ReportRenderer<'a> {
    handlebars: Handlebars<'a>,
    templates: TemplateSet,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(templates: TemplateSet) -> Result<Self, ItineraryError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("won", Box::new(WonHelper));
        handlebars.register_helper("eq", Box::new(EqHelper));

        for (name, def) in &templates.templates {
            handlebars
                .register_template_string(name, &def.template)
                .map_err(|e| ItineraryError::Template(format!("{}: {}", name, e)))?;
        }
        debug!(templates = templates.templates.len(), "report templates compiled");

        Ok(Self {
            handlebars,
            templates,
        })
    }

    /// Renderer over the built-in template set
    pub fn embedded() -> Result<Self, ItineraryError> {
        Self::new(TemplateSet::embedded()?)
    }

    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String, ItineraryError> {
        if self.templates.get(template_name).is_none() {
            return Err(ItineraryError::UnknownTemplate(template_name.to_string()));
        }
        self.handlebars
            .render(template_name, data)
            .map_err(|e| ItineraryError::Render(e.to_string()))
    }

    /// Markdown rendering of a full report
    pub fn render_report(&self, report: &TripReport) -> Result<String, ItineraryError> {
        self.render(REPORT_TEMPLATE, report)
    }

    pub fn template_names(&self) -> Vec<&str> {
        self.templates.names()
    }
}

/// "₩" plus the amount with thousands separators
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₩{}", grouped)
}

// ============================================================================
// Custom Helpers
// ============================================================================

struct WonHelper;

impl HelperDef for WonHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let amount = h
            .param(0)
            .map(|p| p.value())
            .and_then(|v| {
                v.as_u64()
                    .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
                    .or_else(|| v.as_str().and_then(|s| s.replace(',', "").trim().parse().ok()))
            })
            .unwrap_or(0);

        out.write(&format_won(amount))?;
        Ok(())
    }
}

/// Equality comparison helper for conditionals
struct EqHelper;

impl HelperDef for EqHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let equal = match (h.param(0), h.param(1)) {
            (Some(l), Some(r)) => l.value() == r.value(),
            _ => false,
        };

        let branch = if equal { h.template() } else { h.inverse() };
        if let Some(template) = branch {
            template.render(r, ctx, rc, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer(yaml: &str) -> ReportRenderer<'static> {
        ReportRenderer::new(TemplateSet::from_yaml(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(0), "₩0");
        assert_eq!(format_won(999), "₩999");
        assert_eq!(format_won(1_000), "₩1,000");
        assert_eq!(format_won(200_000), "₩200,000");
        assert_eq!(format_won(12_345_678), "₩12,345,678");
    }

    #[test]
    fn test_won_helper() {
        let r = renderer(
            r#"
version: "1.0"
templates:
  t:
    template: "{{won a}} {{won b}} {{won c}}"
"#,
        );
        let out = r.render("t", &json!({"a": 200000, "b": 1500.4, "c": "50,000"})).unwrap();
        assert_eq!(out, "₩200,000 ₩1,500 ₩50,000");
    }

    #[test]
    fn test_eq_helper() {
        let r = renderer(
            r#"
version: "1.0"
templates:
  t:
    template: "{{#eq kind \"dining\"}}meal{{else}}other{{/eq}}"
"#,
        );
        assert_eq!(r.render("t", &json!({"kind": "dining"})).unwrap(), "meal");
        assert_eq!(r.render("t", &json!({"kind": "lodging"})).unwrap(), "other");
    }

    #[test]
    fn test_unknown_template() {
        let r = ReportRenderer::embedded().unwrap();
        assert!(matches!(
            r.render("missing", &json!({})),
            Err(ItineraryError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_budget_line() {
        let r = ReportRenderer::embedded().unwrap();
        let out = r
            .render("budget_line", &json!({"usedBudget": 80000, "totalBudget": 200000}))
            .unwrap();
        assert_eq!(out, "₩80,000 of ₩200,000 planned");
    }
}
