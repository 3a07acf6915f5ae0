//! Per-ticker data component definitions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One of the fixed categories of financial document fetched per ticker.
///
/// A ticker is considered fully retrieved once a cache artifact exists for
/// every kind listed in [`ComponentKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// Balance sheet statements.
    BalanceSheet,
    /// Income statements.
    IncomeStatement,
    /// Company overview and key ratios.
    CompanyOverview,
    /// Reported and estimated earnings.
    Earnings,
    /// Cash flow statements.
    CashFlow,
    /// Monthly price time series.
    MonthlyTimeSeries,
}

impl ComponentKind {
    /// All component kinds, in canonical retrieval order.
    pub const ALL: [Self; 6] = [
        Self::BalanceSheet,
        Self::IncomeStatement,
        Self::CompanyOverview,
        Self::Earnings,
        Self::CashFlow,
        Self::MonthlyTimeSeries,
    ];

    /// Returns the component kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet",
            Self::IncomeStatement => "income-statement",
            Self::CompanyOverview => "company-overview",
            Self::Earnings => "earnings",
            Self::CashFlow => "cash-flow",
            Self::MonthlyTimeSeries => "monthly-time-series",
        }
    }

    /// Returns the provider query function name for this component.
    #[must_use]
    pub const fn query_function(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "BALANCE_SHEET",
            Self::IncomeStatement => "INCOME_STATEMENT",
            Self::CompanyOverview => "OVERVIEW",
            Self::Earnings => "EARNINGS",
            Self::CashFlow => "CASH_FLOW",
            Self::MonthlyTimeSeries => "TIME_SERIES_MONTHLY",
        }
    }

    /// Returns the cache artifact file name for the given ticker.
    ///
    /// # Example
    ///
    /// ```
    /// use stockpile_types::ComponentKind;
    ///
    /// let name = ComponentKind::BalanceSheet.artifact_name("aapl");
    /// assert_eq!(name, "AAPL.balance-sheet.json");
    /// ```
    #[must_use]
    pub fn artifact_name(&self, ticker: &str) -> String {
        format!("{}.{}.json", ticker.to_uppercase(), self.as_str())
    }

    /// Returns the full cache artifact path under the given data directory.
    #[must_use]
    pub fn artifact_path(&self, data_dir: &Path, ticker: &str) -> PathBuf {
        data_dir.join(self.artifact_name(ticker))
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = ComponentKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balance-sheet" | "balance_sheet" | "balancesheet" => Ok(Self::BalanceSheet),
            "income-statement" | "income_statement" | "incomestatement" => {
                Ok(Self::IncomeStatement)
            }
            "company-overview" | "company_overview" | "overview" => Ok(Self::CompanyOverview),
            "earnings" => Ok(Self::Earnings),
            "cash-flow" | "cash_flow" | "cashflow" => Ok(Self::CashFlow),
            "monthly-time-series" | "monthly_time_series" | "monthly" => {
                Ok(Self::MonthlyTimeSeries)
            }
            _ => Err(ComponentKindParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid component kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentKindParseError(String);

impl std::fmt::Display for ComponentKindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid component kind '{}', expected one of: balance-sheet, income-statement, \
             company-overview, earnings, cash-flow, monthly-time-series",
            self.0
        )
    }
}

impl std::error::Error for ComponentKindParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_six_kinds() {
        assert_eq!(ComponentKind::ALL.len(), 6);
    }

    #[test]
    fn test_query_function() {
        assert_eq!(ComponentKind::CompanyOverview.query_function(), "OVERVIEW");
        assert_eq!(
            ComponentKind::MonthlyTimeSeries.query_function(),
            "TIME_SERIES_MONTHLY"
        );
    }

    #[test]
    fn test_artifact_name_uppercases_ticker() {
        assert_eq!(
            ComponentKind::CashFlow.artifact_name("msft"),
            "MSFT.cash-flow.json"
        );
    }

    #[test]
    fn test_artifact_path() {
        let path = ComponentKind::Earnings.artifact_path(Path::new("/cache/data"), "IBM");
        assert_eq!(path, PathBuf::from("/cache/data/IBM.earnings.json"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "balance-sheet".parse::<ComponentKind>().unwrap(),
            ComponentKind::BalanceSheet
        );
        assert_eq!(
            "OVERVIEW".parse::<ComponentKind>().unwrap(),
            ComponentKind::CompanyOverview
        );
        assert_eq!(
            "monthly".parse::<ComponentKind>().unwrap(),
            ComponentKind::MonthlyTimeSeries
        );
        assert!("quarterly".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.to_string().parse::<ComponentKind>().unwrap(), kind);
        }
    }
}
