//! Adapter between form state and the pricing calculator
//!
//! The calculator never touches fields directly. A [`FormSource`] hands over
//! raw field text, [`read_inputs`] turns it into [`CostInputs`] and
//! [`Percentages`], and a [`FormUpdate`] carries the results back through a
//! [`FormSink`].

use serde::{Deserialize, Serialize};

use crate::core::number::{js_number, number_or_zero, parse_float, to_fixed};
use crate::core::pricing::{calculate, CostInputs, Percentages, PricingOutput};
use crate::form::fields::FieldId;

/// Read access to the current form state
pub trait FormSource {
    /// Raw text of an input field, `None` when the field is absent
    fn value(&self, field: FieldId) -> Option<&str>;

    /// Raw value attribute of each gear line, in page order
    fn gear_values(&self) -> Vec<Option<&str>>;
}

/// Write access for calculation results
pub trait FormSink {
    /// Replace the text of a display field or the value of a hidden field
    fn set_field(&mut self, field: FieldId, text: String);
}

/// Map form state to calculator inputs.
///
/// Cost and percentage fields fall back to zero when missing or not
/// numeric. Gear values get no fallback: a malformed one becomes NaN and
/// poisons the total.
pub fn read_inputs<S: FormSource + ?Sized>(form: &S) -> (CostInputs, Percentages) {
    let gear_items: Vec<f64> = form
        .gear_values()
        .into_iter()
        .map(|raw| raw.map(parse_float).unwrap_or(f64::NAN))
        .collect();

    if gear_items.iter().any(|v| v.is_nan()) {
        tracing::warn!("gear item without a numeric value, total will be NaN");
    }

    let costs = CostInputs {
        base_daily_rate: number_or_zero(form.value(FieldId::BaseDailyRate)),
        labor_days: number_or_zero(form.value(FieldId::LaborDays)),
        extra_cost: number_or_zero(form.value(FieldId::ExtraCost)),
        gear_items,
    };
    let percentages = Percentages {
        margin_percent: number_or_zero(form.value(FieldId::MarginRange)),
        tax_percent: number_or_zero(form.value(FieldId::TaxInput)),
    };

    (costs, percentages)
}

/// Text written to every output field after a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormUpdate {
    /// Total cost, two decimals
    pub display_cost: String,
    /// Margin as entered
    pub margin_display: String,
    /// Final price, two decimals
    pub final_price_display: String,
    pub alert_msg: String,
    /// Raw total cost for submission
    pub total_cost_input: String,
    /// Raw final price for submission
    pub final_price_input: String,
}

impl FormUpdate {
    pub fn new(percentages: &Percentages, output: &PricingOutput) -> Self {
        Self {
            display_cost: to_fixed(output.total_cost, 2),
            margin_display: js_number(percentages.margin_percent),
            final_price_display: to_fixed(output.final_price, 2),
            alert_msg: output.alert_message.clone(),
            total_cost_input: js_number(output.total_cost),
            final_price_input: js_number(output.final_price),
        }
    }

    /// Field/text pairs in page order
    pub fn entries(&self) -> [(FieldId, &str); 6] {
        [
            (FieldId::DisplayCost, self.display_cost.as_str()),
            (FieldId::MarginDisplay, self.margin_display.as_str()),
            (FieldId::FinalPriceDisplay, self.final_price_display.as_str()),
            (FieldId::AlertMsg, self.alert_msg.as_str()),
            (FieldId::TotalCostInput, self.total_cost_input.as_str()),
            (FieldId::FinalPriceInput, self.final_price_input.as_str()),
        ]
    }

    /// Write every output field
    pub fn apply<K: FormSink + ?Sized>(&self, sink: &mut K) {
        for (field, text) in self.entries() {
            sink.set_field(field, text.to_string());
        }
    }
}

/// Mirror a pricing result into the output fields
pub fn write_outputs<K: FormSink + ?Sized>(
    sink: &mut K,
    percentages: &Percentages,
    output: &PricingOutput,
) -> FormUpdate {
    let update = FormUpdate::new(percentages, output);
    update.apply(sink);
    update
}

/// Full read-calculate-write cycle, run on load and on every input change.
///
/// Each run overwrites all outputs, so repeated runs on the same state
/// leave the form unchanged.
pub fn recalculate<F: FormSource + FormSink + ?Sized>(form: &mut F) -> PricingOutput {
    let (costs, percentages) = read_inputs(form);
    let output = calculate(&costs, &percentages);
    write_outputs(form, &percentages, &output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pricing::IMPOSSIBLE_MARKUP_ALERT;
    use std::collections::HashMap;

    #[derive(Default)]
    struct TestForm {
        fields: HashMap<FieldId, String>,
        gear: Vec<Option<String>>,
        writes: usize,
    }

    impl TestForm {
        fn with(mut self, field: FieldId, value: &str) -> Self {
            self.fields.insert(field, value.to_string());
            self
        }

        fn gear(mut self, value: Option<&str>) -> Self {
            self.gear.push(value.map(str::to_string));
            self
        }

        fn get(&self, field: FieldId) -> &str {
            self.fields.get(&field).map(String::as_str).unwrap_or("")
        }
    }

    impl FormSource for TestForm {
        fn value(&self, field: FieldId) -> Option<&str> {
            self.fields.get(&field).map(String::as_str)
        }

        fn gear_values(&self) -> Vec<Option<&str>> {
            self.gear.iter().map(|g| g.as_deref()).collect()
        }
    }

    impl FormSink for TestForm {
        fn set_field(&mut self, field: FieldId, text: String) {
            self.writes += 1;
            self.fields.insert(field, text);
        }
    }

    fn reference_form() -> TestForm {
        TestForm::default()
            .with(FieldId::BaseDailyRate, "100")
            .with(FieldId::LaborDays, "5")
            .with(FieldId::ExtraCost, "50")
            .with(FieldId::MarginRange, "20")
            .with(FieldId::TaxInput, "10")
            .gear(Some("20"))
            .gear(Some("30"))
    }

    #[test]
    fn test_read_inputs_parses_fields() {
        let (costs, pct) = read_inputs(&reference_form());
        assert_eq!(costs.base_daily_rate, 100.0);
        assert_eq!(costs.labor_days, 5.0);
        assert_eq!(costs.extra_cost, 50.0);
        assert_eq!(costs.gear_items, vec![20.0, 30.0]);
        assert_eq!(pct, Percentages::new(20.0, 10.0));
    }

    #[test]
    fn test_read_inputs_defaults_bad_fields_to_zero() {
        let form = TestForm::default()
            .with(FieldId::BaseDailyRate, "")
            .with(FieldId::LaborDays, "three")
            .with(FieldId::TaxInput, "   ");
        let (costs, pct) = read_inputs(&form);
        assert_eq!(costs, CostInputs::default());
        assert_eq!(pct, Percentages::default());
    }

    #[test]
    fn test_read_inputs_keeps_malformed_gear_as_nan() {
        let form = TestForm::default().gear(Some("15")).gear(Some("n/a")).gear(None);
        let (costs, _) = read_inputs(&form);
        assert_eq!(costs.gear_items[0], 15.0);
        assert!(costs.gear_items[1].is_nan());
        assert!(costs.gear_items[2].is_nan());
    }

    #[test]
    fn test_recalculate_reference_form() {
        let mut form = reference_form();
        let output = recalculate(&mut form);

        assert_eq!(output.total_cost, 600.0);
        assert_eq!(form.get(FieldId::DisplayCost), "600.00");
        assert_eq!(form.get(FieldId::MarginDisplay), "20");
        assert_eq!(form.get(FieldId::FinalPriceDisplay), "857.14");
        assert_eq!(form.get(FieldId::AlertMsg), "");
        assert_eq!(form.get(FieldId::TotalCostInput), "600");
        assert!(form.get(FieldId::FinalPriceInput).starts_with("857.142857"));
    }

    #[test]
    fn test_recalculate_impossible_markup() {
        let mut form = TestForm::default()
            .with(FieldId::BaseDailyRate, "100")
            .with(FieldId::LaborDays, "1")
            .with(FieldId::MarginRange, "70")
            .with(FieldId::TaxInput, "40");
        recalculate(&mut form);

        assert_eq!(form.get(FieldId::DisplayCost), "100.00");
        assert_eq!(form.get(FieldId::FinalPriceDisplay), "0.00");
        assert_eq!(form.get(FieldId::FinalPriceInput), "0");
        assert_eq!(form.get(FieldId::AlertMsg), IMPOSSIBLE_MARKUP_ALERT);
    }

    #[test]
    fn test_recalculate_empty_form() {
        let mut form = TestForm::default();
        let output = recalculate(&mut form);

        assert_eq!(output, PricingOutput::default());
        assert_eq!(form.get(FieldId::DisplayCost), "0.00");
        assert_eq!(form.get(FieldId::MarginDisplay), "0");
        assert_eq!(form.get(FieldId::FinalPriceDisplay), "0.00");
        assert_eq!(form.get(FieldId::TotalCostInput), "0");
        assert_eq!(form.writes, 6);
    }

    #[test]
    fn test_malformed_gear_shows_nan_everywhere() {
        let mut form = reference_form().gear(Some("oops"));
        recalculate(&mut form);

        assert_eq!(form.get(FieldId::DisplayCost), "NaN");
        assert_eq!(form.get(FieldId::FinalPriceDisplay), "NaN");
        assert_eq!(form.get(FieldId::TotalCostInput), "NaN");
        assert_eq!(form.get(FieldId::AlertMsg), "");
    }

    #[test]
    fn test_recalculate_twice_is_stable() {
        let mut form = reference_form();
        recalculate(&mut form);
        let first: Vec<String> = FieldId::OUTPUTS.iter().map(|f| form.get(*f).to_string()).collect();
        recalculate(&mut form);
        let second: Vec<String> = FieldId::OUTPUTS.iter().map(|f| form.get(*f).to_string()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_alert_clears_after_fix() {
        let mut form = reference_form().with(FieldId::MarginRange, "95");
        recalculate(&mut form);
        assert!(!form.get(FieldId::AlertMsg).is_empty());

        form.fields.insert(FieldId::MarginRange, "20".to_string());
        recalculate(&mut form);
        assert_eq!(form.get(FieldId::AlertMsg), "");
    }
}
