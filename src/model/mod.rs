//! Compound-interest projection
//!
//! One `YearProjection` per year between the current age and `MAX_AGE`.

use serde::Serialize;

/// Ages are projected up to (but not including) this age
pub const MAX_AGE: u32 = 80;

/// Upper end of the value domain mapped onto bar heights
pub const VALUE_CEILING: f64 = 800_000.0;

pub const DEFAULT_CURRENT_AGE: u32 = 37;
pub const DEFAULT_YEARLY_CONTRIBUTION: f64 = 3650.0;
pub const DEFAULT_INITIAL_PRINCIPAL: f64 = 3000.0;
pub const DEFAULT_RATE: f64 = 0.04;

/// Inputs that drive the projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartInputs {
    pub current_age: u32,
    pub yearly_contribution: f64,
    pub initial_principal: f64,
    pub rate: f64,
}

impl Default for ChartInputs {
    fn default() -> Self {
        Self {
            current_age: DEFAULT_CURRENT_AGE,
            yearly_contribution: DEFAULT_YEARLY_CONTRIBUTION,
            initial_principal: DEFAULT_INITIAL_PRINCIPAL,
            rate: DEFAULT_RATE,
        }
    }
}

impl ChartInputs {
    /// Clamp inputs into a range that renders sensibly.
    /// Negative amounts become 0, non-finite ones fall back to the defaults.
    pub fn sanitized(self) -> Self {
        fn non_negative(value: f64, fallback: f64) -> f64 {
            if value.is_finite() {
                value.max(0.0)
            } else {
                fallback
            }
        }

        Self {
            current_age: self.current_age.min(MAX_AGE),
            yearly_contribution: non_negative(self.yearly_contribution, DEFAULT_YEARLY_CONTRIBUTION),
            initial_principal: non_negative(self.initial_principal, DEFAULT_INITIAL_PRINCIPAL),
            rate: non_negative(self.rate, DEFAULT_RATE),
        }
    }

    pub fn year_count(&self) -> usize {
        year_count(self.current_age)
    }
}

/// Projected values for a single year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProjection {
    pub age_offset: u32,
    pub age: u32,
    pub interest_value: f64,
    pub cash_contributed: f64,
}

/// Interest earned on `principal` after `periods` compounding periods, principal excluded
pub fn calculate_interest(principal: f64, rate: f64, periods: u32) -> f64 {
    principal * (1.0 + rate).powi(periods as i32) - principal
}

/// Cash put in after `years`: the principal plus one contribution per year, no growth
pub fn calculate_cash(principal: f64, yearly_contribution: f64, years: u32) -> f64 {
    principal + years as f64 * yearly_contribution
}

pub fn year_count(current_age: u32) -> usize {
    MAX_AGE.saturating_sub(current_age) as usize
}

/// Build the per-year projection.
///
/// Every year's contributions are compounded as if they were invested at the
/// start, so year `i` grows `P + i*C` for `i` periods.
pub fn project_years(inputs: &ChartInputs) -> Vec<YearProjection> {
    let inputs = inputs.sanitized();

    (0..inputs.year_count() as u32)
        .map(|i| {
            let invested = inputs.initial_principal + i as f64 * inputs.yearly_contribution;
            YearProjection {
                age_offset: i,
                age: inputs.current_age + i,
                interest_value: calculate_interest(invested, inputs.rate, i),
                cash_contributed: calculate_cash(inputs.initial_principal, inputs.yearly_contribution, i),
            }
        })
        .collect()
}

/// Map `value` from `[domain_min, domain_max]` onto `[0, max_height]`, clamped
pub fn scale_to_height(value: f64, domain_min: f64, domain_max: f64, max_height: f64) -> f64 {
    if !(domain_max > domain_min) || !value.is_finite() {
        return 0.0;
    }
    let ratio = ((value - domain_min) / (domain_max - domain_min)).clamp(0.0, 1.0);
    ratio * max_height.max(0.0)
}

/// Format a dollar amount, floored, with thousands separators (`$123,456`)
pub fn format_dollars(value: f64) -> String {
    let floored = if value.is_finite() { value.floor() } else { 0.0 };
    let negative = floored < 0.0;
    let digits = format!("{}", floored.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
