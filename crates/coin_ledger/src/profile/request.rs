//! Coin update request body and its validation.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{Outcome, ProfileError};

/// Raw `POST /profile/coins` body.
///
/// Fields are kept untyped so that a missing field or a value of the wrong
/// JSON type is reported by [`CoinUpdateRequest::validate`] as a bad request
/// rather than rejected by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinUpdateRequest {
    /// Game name.
    #[serde(default)]
    pub game: Option<Value>,
    /// Reported result; `"win"` credits, anything else debits.
    #[serde(default)]
    pub result: Option<Value>,
    /// Amount won or lost, as a JSON number.
    #[serde(default)]
    pub amount: Option<Value>,
}

/// A validated coin update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinUpdate {
    /// Game name, non-empty.
    pub game: String,
    /// Raw result string as reported, non-empty.
    pub result: String,
    /// Classification of `result`.
    pub outcome: Outcome,
    /// Exact input amount, before rounding.
    pub amount: Decimal,
}

impl CoinUpdateRequest {
    /// Checks field presence and types.
    ///
    /// Negative amounts pass: only the JSON type is checked.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::BadRequest`] naming the first invalid field.
    #[instrument(skip(self))]
    pub fn validate(self) -> Result<CoinUpdate, ProfileError> {
        let game = non_empty_string("game", self.game)?;
        let result = non_empty_string("result", self.result)?;
        let amount = number("amount", self.amount)?;
        let outcome = Outcome::classify(&result);

        debug!(game = %game, result = %result, amount = %amount, "Request validated");
        Ok(CoinUpdate {
            game,
            result,
            outcome,
            amount,
        })
    }
}

fn non_empty_string(field: &str, value: Option<Value>) -> Result<String, ProfileError> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(Value::String(_)) => Err(ProfileError::BadRequest(format!("'{}' is empty", field))),
        Some(_) => Err(ProfileError::BadRequest(format!("'{}' must be a string", field))),
        None => Err(ProfileError::BadRequest(format!("'{}' is missing", field))),
    }
}

/// Reads a JSON number as an exact decimal.
///
/// Goes through the number's shortest text form, so `0.1` becomes exactly
/// `0.1` rather than the nearest binary fraction. Magnitudes finer than
/// [`Decimal::MAX_SCALE`] digits read as zero, which is what they round to
/// at two fraction digits anyway.
fn number(field: &str, value: Option<Value>) -> Result<Decimal, ProfileError> {
    let n = match value {
        Some(Value::Number(n)) => n,
        Some(_) => return Err(ProfileError::BadRequest(format!("'{}' must be a number", field))),
        None => return Err(ProfileError::BadRequest(format!("'{}' is missing", field))),
    };
    let text = n.to_string();
    if let Ok(amount) = Decimal::from_str_exact(&text).or_else(|_| Decimal::from_scientific(&text)) {
        return Ok(amount);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.abs() < 1.0 => {
            debug!(field = %field, text = %text, "Sub-scale amount read as zero");
            Ok(Decimal::ZERO)
        }
        _ => Err(ProfileError::BadRequest(format!("'{}' is not representable: {}", field, text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> CoinUpdateRequest {
        serde_json::from_value(body).expect("body deserializes")
    }

    fn is_bad_request(result: Result<CoinUpdate, ProfileError>) -> bool {
        matches!(result, Err(ProfileError::BadRequest(_)))
    }

    #[test]
    fn test_valid_win() {
        let update = request(json!({"game": "slots", "result": "win", "amount": 50}))
            .validate()
            .unwrap();
        assert_eq!(update.game, "slots");
        assert_eq!(update.result, "win");
        assert_eq!(update.outcome, Outcome::Win);
        assert_eq!(update.amount, Decimal::new(50, 0));
    }

    #[test]
    fn test_fractional_amount_is_exact() {
        let update = request(json!({"game": "dice", "result": "loss", "amount": 0.1}))
            .validate()
            .unwrap();
        assert_eq!(update.amount, Decimal::new(1, 1));
        assert_eq!(update.outcome, Outcome::Loss);
    }

    #[test]
    fn test_exponent_amount() {
        let update = request(json!({"game": "dice", "result": "win", "amount": 1e20}))
            .validate()
            .unwrap();
        assert_eq!(update.amount, Decimal::from_scientific("1e20").unwrap());
    }

    #[test]
    fn test_sub_scale_amount_reads_as_zero() {
        for amount in [json!(1e-30), json!(-1e-30), json!(5e-324)] {
            let body = json!({"game": "dice", "result": "win", "amount": amount});
            let update = request(body).validate().unwrap();
            assert_eq!(update.amount, Decimal::ZERO);
        }
    }

    #[test]
    fn test_zero_and_negative_amounts_pass() {
        for amount in [json!(0), json!(-5), json!(-0.25)] {
            let body = json!({"game": "dice", "result": "win", "amount": amount});
            assert!(request(body).validate().is_ok());
        }
    }

    #[test]
    fn test_string_amount_rejected() {
        let body = json!({"game": "slots", "result": "win", "amount": "fifty"});
        assert!(is_bad_request(request(body).validate()));
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(is_bad_request(request(json!({})).validate()));
        assert!(is_bad_request(request(json!({"result": "win", "amount": 1})).validate()));
        assert!(is_bad_request(request(json!({"game": "slots", "amount": 1})).validate()));
        assert!(is_bad_request(request(json!({"game": "slots", "result": "win"})).validate()));
    }

    #[test]
    fn test_empty_or_mistyped_strings_rejected() {
        let empty = json!({"game": "", "result": "win", "amount": 1});
        assert!(is_bad_request(request(empty).validate()));
        let mistyped = json!({"game": "slots", "result": true, "amount": 1});
        assert!(is_bad_request(request(mistyped).validate()));
        let null = json!({"game": null, "result": "win", "amount": 1});
        assert!(is_bad_request(request(null).validate()));
    }
}
