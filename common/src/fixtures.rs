use std::{env, fs, path::Path, sync::LazyLock};

use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::Value;
use strum_macros::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::{deserialize_non_blank_string::non_blank_string, errors::FixtureError};

pub const DEFAULT_TEST_DATA_PATH: &str = "data/testData.json";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex is valid"));

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestData {
    pub users: Users,
    pub test_products: TestProducts,
    pub addresses: Addresses,
    #[serde(default)]
    pub payment: PaymentFixtures,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Users {
    pub new_user: UserData,
    #[serde(default)]
    pub existing_user: Option<Credentials>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub gender: Option<Gender>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Both fields present and not just whitespace
    pub fn is_usable(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestProducts {
    pub simple_products: Vec<ProductFixture>,
    pub multiple_products: Vec<ProductFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductFixture {
    #[serde(deserialize_with = "non_blank_string")]
    pub name: String,
    #[serde(deserialize_with = "non_blank_string")]
    pub url: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Addresses {
    pub billing: Address,
    #[serde(default)]
    pub shipping: Option<Address>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub city: String,
    pub address1: String,
    pub zip: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFixtures {
    #[serde(default)]
    pub credit_card: Option<CreditCard>,
    #[serde(default)]
    pub purchase_order: Option<PurchaseOrder>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    #[serde(rename = "type")]
    pub card_type: String,
    pub name: String,
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvv: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub po_number: String,
}

/// Replaces every `${NAME}` inside every string of `value`, recursing through
/// arrays and objects. Names `lookup` cannot resolve become empty strings.
pub fn resolve_placeholders(value: Value, lookup: &dyn Fn(&str) -> Option<String>) -> Value {
    match value {
        Value::String(text) => {
            let resolved = PLACEHOLDER.replace_all(&text, |captures: &Captures| {
                let name = &captures[1];

                lookup(name).unwrap_or_else(|| {
                    debug!("{name} is not set, substituting empty string");
                    String::new()
                })
            });

            Value::String(resolved.into_owned())
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| resolve_placeholders(item, lookup))
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, item)| (key, resolve_placeholders(item, lookup)))
                .collect(),
        ),
        other => other,
    }
}

/// `${NAME}` substitution from the process environment
pub fn replace_env_variables(value: Value) -> Value {
    resolve_placeholders(value, &|name| env::var(name).ok())
}

/// Loads a `.env` file into the process environment. A missing file is not
/// an error since CI usually provides the variables directly.
pub fn load_env_file(path: &Path) -> Result<bool, FixtureError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            info!("Loaded environment from {}", path.display());
            Ok(true)
        }
        Err(err) if err.not_found() => {
            warn!("{} not found, using the current environment", path.display());
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

pub fn parse_test_data(
    raw: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<TestData, FixtureError> {
    let data: Value = serde_json::from_str(raw)?;

    Ok(serde_json::from_value(resolve_placeholders(data, lookup))?)
}

pub fn load_test_data(path: &Path) -> Result<TestData, FixtureError> {
    let raw = fs::read_to_string(path)
        .map_err(|err| FixtureError::ReadFailed(path.display().to_string(), err))?;

    debug!("Read {} bytes of test data from {}", raw.len(), path.display());

    let data: Value = serde_json::from_str(&raw)?;

    Ok(serde_json::from_value(replace_env_variables(data))?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        move |name| vars.get(name).cloned()
    }

    #[test]
    fn placeholders_resolve_recursively() {
        let lookup = lookup_from(&[("TEST_USER_EMAIL", "a@b.c"), ("PASS", "hunter2")]);

        let value = json!({
            "users": [{ "email": "${TEST_USER_EMAIL}", "password": "pw-${PASS}-${PASS}" }],
            "price": 10.5,
        });

        let resolved = resolve_placeholders(value, &lookup);

        assert_eq!(resolved["users"][0]["email"], "a@b.c");
        assert_eq!(resolved["users"][0]["password"], "pw-hunter2-hunter2");
        assert_eq!(resolved["price"], 10.5);
    }

    #[test]
    fn missing_variables_become_empty_strings() {
        let lookup = lookup_from(&[]);

        let resolved = resolve_placeholders(json!("user ${NOPE}!"), &lookup);

        assert_eq!(resolved, json!("user !"));
    }

    #[test]
    fn unset_environment_variables_resolve_to_empty() {
        let resolved = replace_env_variables(json!({
            "users": { "email": "${CARTCHECK_UNSET_FIXTURE_VARIABLE}@example.com" },
            "quantity": 2,
        }));

        assert_eq!(resolved["users"]["email"], "@example.com");
        assert_eq!(resolved["quantity"], 2);
    }

    #[test]
    fn test_data_parses_with_optional_sections() {
        let raw = r#"{
            "users": { "newUser": { "gender": "female", "firstName": "Ada", "lastName": "L", "password": "${NEW_PASSWORD}" } },
            "testProducts": {
                "simpleProducts": [{ "name": "Fiction", "url": "/fiction", "price": 24.0, "quantity": 1 }],
                "multipleProducts": []
            },
            "addresses": { "billing": {
                "firstName": "Ada", "lastName": "L", "country": "United States", "state": "New York",
                "city": "NYC", "address1": "1 Main St", "zip": "10001", "phone": "5551234"
            } }
        }"#;

        let data = parse_test_data(raw, &lookup_from(&[("NEW_PASSWORD", "s3cret")])).unwrap();

        assert_eq!(data.users.new_user.password, "s3cret");
        assert_eq!(data.users.new_user.gender, Some(Gender::Female));
        assert!(data.users.existing_user.is_none());
        assert_eq!(data.test_products.simple_products[0].url, "/fiction");
        assert!(data.payment.credit_card.is_none());
        assert!(data.addresses.billing.email.is_none());
    }

    #[test]
    fn blank_product_url_is_rejected() {
        let raw = r#"{
            "users": { "newUser": { "firstName": "A", "lastName": "B", "password": "p" } },
            "testProducts": {
                "simpleProducts": [{ "name": "Fiction", "url": "${UNSET_URL}", "price": 24.0, "quantity": 1 }],
                "multipleProducts": []
            },
            "addresses": { "billing": {
                "firstName": "A", "lastName": "B", "country": "US", "city": "C",
                "address1": "D", "zip": "E", "phone": "F"
            } }
        }"#;

        assert!(matches!(
            parse_test_data(raw, &lookup_from(&[])),
            Err(FixtureError::InvalidTestData(_))
        ));
    }

    #[test]
    fn credentials_need_both_fields() {
        let blank = Credentials {
            email: "  ".into(),
            password: "x".into(),
        };
        let usable = Credentials {
            email: "a@b.c".into(),
            password: "x".into(),
        };

        assert!(!blank.is_usable());
        assert!(usable.is_usable());
    }
}
