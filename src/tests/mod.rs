#[cfg(test)]
pub mod test {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use once_cell::sync::Lazy;
    use rust_decimal::Decimal;
    use secrecy::Secret;
    use serde_json::json;

    use crate::configuration::{
        ApplicationSettings, OauthCredentials, PipelineSettings, Settings, TinkSettings,
    };
    use crate::model::transaction::TransactionRecord;
    use crate::telemetry::{get_subscriber, init_subscriber};

    // Ensure that the `tracing` stack is only initialised once using `once_cell`
    static TRACING: Lazy<()> = Lazy::new(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();
        // The sink is part of the subscriber's type, hence the two branches.
        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
            init_subscriber(subscriber).expect("Failed to init tracing");
        } else {
            let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
            init_subscriber(subscriber).expect("Failed to init tracing");
        };
    });

    pub fn init_tracing() {
        Lazy::force(&TRACING);
    }

    /// A one pound debit on `date`
    pub fn record(date: &str, description: &str) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: description.to_string(),
            amount: Decimal::from_str("-1.00").unwrap(),
            currency: "GBP".to_string(),
        }
    }

    /// An upstream transaction as Tink serialises it
    pub fn upstream_transaction(
        booked: &str,
        description: &str,
        unscaled_value: &str,
    ) -> serde_json::Value {
        json!({
            "id": format!("{booked}-{description}"),
            "accountId": "4a2945d1481c4f4b98ab1b135afd96c0",
            "amount": {
                "currencyCode": "GBP",
                "value": { "scale": "2", "unscaledValue": unscaled_value }
            },
            "dates": { "booked": booked },
            "descriptions": { "display": description, "original": description },
            "status": "BOOKED"
        })
    }

    /// Settings pointing every upstream call at `api_base_url`
    pub fn test_settings(api_base_url: &str) -> Settings {
        Settings {
            application: ApplicationSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            oauth: OauthCredentials {
                client_id: "client-123".to_string(),
                client_secret: Secret::new("shh".to_string()),
                redirect_uri: "http://localhost:3000/callback".to_string(),
            },
            tink: TinkSettings {
                link_url: "https://link.tink.com/1.0/transactions/connect-accounts/".to_string(),
                api_base_url: api_base_url.to_string(),
                market: "GB".to_string(),
                locale: "en_US".to_string(),
                test: true,
            },
            pipeline: PipelineSettings {
                page_size: 100,
                record_threshold: 500,
                window_months: 3,
                max_pages: 50,
                request_timeout_secs: 5,
            },
        }
    }
}
