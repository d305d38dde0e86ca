//! Embedded templates for new budget files and printable quotes

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::core::identity::BudgetId;
use crate::core::number::{js_number, to_fixed};
use crate::entities::budget::{Budget, DEFAULT_MARGIN_PERCENT};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const BUDGET_TEMPLATE: &str = "budget.yaml.tera";
const QUOTE_TEMPLATE: &str = "quote.md.tera";

/// Values for a new budget file
#[derive(Debug, Clone)]
pub struct BudgetTemplateContext {
    pub id: BudgetId,
    pub author: String,
    pub created: DateTime<Utc>,
    pub title: String,
    pub client: String,
    pub base_daily_rate: Option<f64>,
    pub labor_days: f64,
    pub margin_percent: f64,
    pub tax_percent: f64,
}

impl BudgetTemplateContext {
    pub fn new(title: impl Into<String>, client: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: BudgetId::new(),
            author: author.into(),
            created: Utc::now(),
            title: title.into(),
            client: client.into(),
            base_daily_rate: None,
            labor_days: 0.0,
            margin_percent: DEFAULT_MARGIN_PERCENT,
            tax_percent: 0.0,
        }
    }

    pub fn with_daily_rate(mut self, rate: f64) -> Self {
        self.base_daily_rate = Some(rate);
        self
    }

    pub fn with_labor_days(mut self, days: f64) -> Self {
        self.labor_days = days;
        self
    }

    pub fn with_margin(mut self, margin_percent: f64) -> Self {
        self.margin_percent = margin_percent;
        self
    }

    pub fn with_tax(mut self, tax_percent: f64) -> Self {
        self.tax_percent = tax_percent;
        self
    }
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    #[diagnostic(code(orca::template::not_found))]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    #[diagnostic(code(orca::template::render))]
    RenderError(String),
}

#[derive(Serialize)]
struct QuoteLine {
    name: String,
    item_type: String,
    days: String,
    value: String,
    cost: String,
}

/// Double-quoted scalar safe to paste into YAML.
///
/// A JSON string literal is a valid YAML double-quoted scalar, escapes
/// included.
fn yaml_quoted(text: &str) -> Result<String, TemplateError> {
    serde_json::to_string(text).map_err(|e| TemplateError::RenderError(e.to_string()))
}

fn add_template(tera: &mut Tera, name: &str, data: &[u8]) -> Result<(), TemplateError> {
    let source = std::str::from_utf8(data)
        .map_err(|e| TemplateError::RenderError(format!("{} is not UTF-8: {}", name, e)))?;
    tera.add_raw_template(name, source)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        // Quotes are markdown, not HTML
        tera.autoescape_on(vec![]);

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                add_template(&mut tera, filename, &content.data)?;
            }
        }

        Ok(Self { tera })
    }

    fn render(&self, name: &str, context: &tera::Context) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }

    /// Generate the YAML for a new budget
    pub fn generate_budget(&self, ctx: &BudgetTemplateContext) -> Result<String, TemplateError> {
        let mut context = tera::Context::new();
        context.insert("id", &ctx.id.to_string());
        context.insert("date", &ctx.created.to_rfc3339());
        context.insert("title_line", &ctx.title.replace(['\r', '\n'], " "));
        context.insert("title_quoted", &yaml_quoted(&ctx.title)?);
        context.insert("client_quoted", &yaml_quoted(&ctx.client)?);
        context.insert("author_quoted", &yaml_quoted(&ctx.author)?);
        context.insert("base_daily_rate", &ctx.base_daily_rate.map(|r| format!("{:?}", r)));
        context.insert("labor_days", &format!("{:?}", ctx.labor_days));
        context.insert("margin_percent", &format!("{:?}", ctx.margin_percent));
        context.insert("tax_percent", &format!("{:?}", ctx.tax_percent));

        self.render(BUDGET_TEMPLATE, &context)
    }

    /// Render the client-facing quote as markdown
    pub fn render_quote(
        &self,
        budget: &Budget,
        fallback_daily_rate: f64,
        company: &str,
    ) -> Result<String, TemplateError> {
        let inputs = budget.cost_inputs(fallback_daily_rate);
        let output = budget.price(fallback_daily_rate);

        let lines: Vec<QuoteLine> = budget
            .items
            .iter()
            .map(|item| QuoteLine {
                name: item.name.clone(),
                item_type: item.item_type.to_string(),
                days: js_number(item.days),
                value: to_fixed(item.value, 2),
                cost: to_fixed(item.cost(), 2),
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("company", company);
        context.insert("id", &budget.id.to_string());
        context.insert("date", &budget.date.format("%Y-%m-%d").to_string());
        context.insert("title", &budget.title);
        context.insert("client_name", &budget.client.name);
        context.insert("client_cnpj", &budget.client.cnpj);
        context.insert("client_phone", &budget.client.phone);
        context.insert("client_address", &budget.client.address);
        context.insert("description", &budget.description);
        context.insert("labor_days", &js_number(inputs.labor_days));
        context.insert("daily_rate", &to_fixed(inputs.base_daily_rate, 2));
        context.insert("labor_cost", &to_fixed(inputs.labor_cost(), 2));
        context.insert("extra_cost", &to_fixed(inputs.extra_cost, 2));
        context.insert("items", &lines);
        context.insert("final_price", &to_fixed(output.final_price, 2));
        context.insert("alert", &output.alert_message);

        self.render(QUOTE_TEMPLATE, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::budget::{BudgetItem, ItemType};

    #[test]
    fn test_generated_budget_parses() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = BudgetTemplateContext::new("Product shoot", "Loja Azul", "Author")
            .with_daily_rate(350.0)
            .with_labor_days(2.0)
            .with_tax(6.0);

        let yaml = generator.generate_budget(&ctx).unwrap();
        let budget = Budget::from_yaml(&yaml, "new.budget.yaml").unwrap();

        assert_eq!(budget.id, ctx.id);
        assert_eq!(budget.title, "Product shoot");
        assert_eq!(budget.client.name, "Loja Azul");
        assert_eq!(budget.base_daily_rate, Some(350.0));
        assert_eq!(budget.labor_days, 2.0);
        assert_eq!(budget.margin_percent, DEFAULT_MARGIN_PERCENT);
        assert_eq!(budget.tax_percent, 6.0);
        assert!(budget.items.is_empty());
    }

    #[test]
    fn test_generated_budget_escapes_text() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = BudgetTemplateContext::new(
            "The \"Big\" Shoot: C:\\video\nday 2",
            "Loja 'Azul' #1",
            "Ana \"Ed\" Souza",
        );

        let yaml = generator.generate_budget(&ctx).unwrap();
        let budget = Budget::from_yaml(&yaml, "new.budget.yaml").unwrap();

        assert_eq!(budget.title, "The \"Big\" Shoot: C:\\video\nday 2");
        assert_eq!(budget.client.name, "Loja 'Azul' #1");
        assert_eq!(budget.author, "Ana \"Ed\" Souza");
    }

    #[test]
    fn test_add_template_rejects_invalid_utf8() {
        let mut tera = Tera::default();
        let err = add_template(&mut tera, "quote.md.tera", b"Total: \xff\xfe").unwrap_err();
        assert!(matches!(err, TemplateError::RenderError(ref msg) if msg.contains("quote.md.tera")));
        assert_eq!(tera.get_template_names().count(), 0);

        add_template(&mut tera, "ok.tera", b"{{ x }}").unwrap();
        assert_eq!(tera.get_template_names().count(), 1);
    }

    #[test]
    fn test_generated_budget_without_rate() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = BudgetTemplateContext::new("Podcast", "Studio", "Author");
        let yaml = generator.generate_budget(&ctx).unwrap();
        let budget = Budget::from_yaml(&yaml, "new.budget.yaml").unwrap();
        assert_eq!(budget.base_daily_rate, None);
    }

    #[test]
    fn test_quote_shows_lines_and_total() {
        let generator = TemplateGenerator::new().unwrap();
        let mut budget = Budget::new("Wedding video", "Ana & Bruno", "Author");
        budget.base_daily_rate = Some(100.0);
        budget.labor_days = 5.0;
        budget.extra_cost = 50.0;
        budget.margin_percent = 20.0;
        budget.tax_percent = 10.0;
        budget.items = vec![BudgetItem::new("Gimbal", ItemType::Gear, 25.0, 2.0)];

        let quote = generator.render_quote(&budget, 0.0, "Orca Filmes").unwrap();

        assert!(quote.contains("# Orca Filmes"));
        assert!(quote.contains("Ana & Bruno"));
        assert!(quote.contains("| Gimbal | gear | 2 | 25.00 | 50.00 |"));
        assert!(quote.contains("| Labor | labor | 5 | 100.00 | 500.00 |"));
        assert!(quote.contains("**Total: 857.14**"));
        assert!(!quote.contains("Impossível"));
    }

    #[test]
    fn test_quote_carries_alert() {
        let generator = TemplateGenerator::new().unwrap();
        let mut budget = Budget::new("Ad", "Agency", "Author");
        budget.margin_percent = 80.0;
        budget.tax_percent = 20.0;

        let quote = generator.render_quote(&budget, 0.0, "Orca").unwrap();
        assert!(quote.contains("**Total: 0.00**"));
        assert!(quote.contains("Impossível"));
    }
}
