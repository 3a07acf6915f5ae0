//! Provider query URL construction.

use stockpile_types::ComponentKind;

/// Base URL for the Alpha Vantage query endpoint.
pub const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Builds the query URL for a (ticker, component) pair.
///
/// The API key is appended separately by the client so that URLs logged
/// or asserted on in tests carry no credentials.
///
/// # Example
///
/// ```
/// use stockpile_fetch::url::query_url;
/// use stockpile_types::ComponentKind;
///
/// let url = query_url("aapl", ComponentKind::BalanceSheet);
/// assert_eq!(
///     url,
///     "https://www.alphavantage.co/query?function=BALANCE_SHEET&symbol=AAPL"
/// );
/// ```
#[must_use]
pub fn query_url(ticker: &str, kind: ComponentKind) -> String {
    format!(
        "{}?function={}&symbol={}",
        BASE_URL,
        kind.query_function(),
        ticker.to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_monthly_series() {
        let url = query_url("msft", ComponentKind::MonthlyTimeSeries);
        assert_eq!(
            url,
            "https://www.alphavantage.co/query?function=TIME_SERIES_MONTHLY&symbol=MSFT"
        );
    }

    #[test]
    fn test_query_url_uppercases_ticker() {
        let url = query_url("brk.b", ComponentKind::CompanyOverview);
        assert!(url.contains("symbol=BRK.B"));
    }

    #[test]
    fn test_query_url_has_no_api_key() {
        let url = query_url("IBM", ComponentKind::Earnings);
        assert!(!url.contains("apikey"));
    }
}
