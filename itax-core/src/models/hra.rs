use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One month of salary, HRA and rent figures as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HraMonthInput {
    pub month: String,
    /// Basic salary plus dearness allowance for the month.
    pub salary: Decimal,
    pub hra_received: Decimal,
    pub rent_paid: Decimal,
    pub is_metro: bool,
}

/// A month's input together with its derived exemption.
///
/// Built only by [`calculate_monthly_exemption`](crate::calculations::hra::calculate_monthly_exemption);
/// the derived amounts have no setters, so `exemption + taxable` always equals
/// `hra_received`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HraMonthResult {
    pub(crate) input: HraMonthInput,
    pub(crate) rent_minus_ten_percent: Decimal,
    pub(crate) salary_percentage_cap: Decimal,
    pub(crate) exemption: Decimal,
    pub(crate) taxable: Decimal,
}

impl HraMonthResult {
    /// The input after negative amounts were clamped to zero.
    pub fn input(&self) -> &HraMonthInput {
        &self.input
    }

    pub fn month(&self) -> &str {
        &self.input.month
    }

    pub fn salary(&self) -> Decimal {
        self.input.salary
    }

    pub fn hra_received(&self) -> Decimal {
        self.input.hra_received
    }

    pub fn rent_paid(&self) -> Decimal {
        self.input.rent_paid
    }

    pub fn is_metro(&self) -> bool {
        self.input.is_metro
    }

    /// Rent paid in excess of 10% of salary (never negative).
    pub fn rent_minus_ten_percent(&self) -> Decimal {
        self.rent_minus_ten_percent
    }

    /// 50% of salary in a metro city, 40% elsewhere.
    pub fn salary_percentage_cap(&self) -> Decimal {
        self.salary_percentage_cap
    }

    pub fn exemption(&self) -> Decimal {
        self.exemption
    }

    pub fn taxable(&self) -> Decimal {
        self.taxable
    }
}

/// Totals across every month of one employee's year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HraAnnualSummary {
    pub months: usize,
    pub total_salary: Decimal,
    pub total_hra_received: Decimal,
    pub total_rent_paid: Decimal,
    pub total_exemption: Decimal,
    pub total_taxable: Decimal,
}
