//! Declarative request validation and the middleware that enforces it.
//!
//! A route carries a `&'static [Rule]` table. [`check_request`] evaluates every
//! rule against the path parameters and JSON body, and either rejects the
//! request with the full error list or forwards it with the parsed body
//! attached as a [`ValidatedBody`] extension.

mod checks;

pub use checks::{coerce_number, flag, parse_id, text, Check};

use crate::error::AppError;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Path, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    RequestPartsExt,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Where a rule reads its field from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Params,
    Body,
}

/// One field-level predicate with the message reported when it fails.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub field: &'static str,
    pub location: Location,
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn param(field: &'static str, check: Check, message: &'static str) -> Self {
        Rule { field, location: Location::Params, check, message }
    }

    pub const fn body(field: &'static str, check: Check, message: &'static str) -> Self {
        Rule { field, location: Location::Body, check, message }
    }
}

pub type RuleSet = &'static [Rule];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: &'static str,
    pub path: &'static str,
    pub location: Location,
}

/// Accumulated failures, serialised as `{"errors": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages grouped by field, in rule order.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<&'static str>> {
        let mut grouped: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for e in &self.errors {
            grouped.entry(e.path).or_default().push(e.msg);
        }
        grouped
    }
}

/// Request input as the rules see it.
#[derive(Debug, Default)]
pub struct Input {
    pub params: HashMap<String, String>,
    pub body: Map<String, Value>,
}

impl Input {
    fn get(&self, rule: &Rule) -> Option<Value> {
        match rule.location {
            Location::Params => self.params.get(rule.field).map(|s| Value::String(s.clone())),
            Location::Body => self.body.get(rule.field).cloned(),
        }
    }
}

/// Run every rule independently; nothing short-circuits.
pub fn evaluate(rules: &[Rule], input: &Input) -> ValidationErrors {
    let errors = rules
        .iter()
        .filter_map(|rule| {
            let value = input.get(rule);
            if rule.check.passes(value.as_ref()) {
                None
            } else {
                Some(FieldError {
                    kind: "field",
                    value,
                    msg: rule.message,
                    path: rule.field,
                    location: rule.location,
                })
            }
        })
        .collect();
    ValidationErrors { errors }
}

/// JSON object body that passed its route's rules.
#[derive(Clone, Debug, Default)]
pub struct ValidatedBody(pub Map<String, Value>);

/// Validation middleware: `from_fn_with_state(RULES, check_request)`.
pub async fn check_request(State(rules): State<RuleSet>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let params = parts
        .extract::<Path<HashMap<String, String>>>()
        .await
        .map(|Path(p)| p)
        .unwrap_or_default();

    let reads_body = rules.iter().any(|r| r.location == Location::Body);
    let (body, fields) = if reads_body {
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(b) => b,
            Err(_) => return AppError::PayloadTooLarge.into_response(),
        };
        match parse_body(&parts.headers, &bytes) {
            Ok(map) => (Body::from(bytes), map),
            Err(e) => return e.into_response(),
        }
    } else {
        (body, Map::new())
    };

    let input = Input { params, body: fields };
    let errors = evaluate(rules, &input);
    if !errors.is_empty() {
        return AppError::Validation(errors).into_response();
    }

    if reads_body {
        parts.extensions.insert(ValidatedBody(input.body));
    }
    next.run(Request::from_parts(parts, body)).await
}

/// Empty bodies and requests without a JSON content type read as `{}`; anything else must be a JSON object.
fn parse_body(headers: &HeaderMap, bytes: &Bytes) -> Result<Map<String, Value>, AppError> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);
    if bytes.is_empty() || !is_json {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::MalformedBody("body must be a JSON object".into())),
        Err(e) => Err(AppError::MalformedBody(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[Rule] = &[
        Rule::param("id", Check::IsInt, "bad id"),
        Rule::body("price", Check::IsNumeric, "not numeric"),
        Rule::body("price", Check::Positive, "not positive"),
    ];

    fn input(params: &[(&str, &str)], body: Value) -> Input {
        Input {
            params: params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: body.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn every_rule_runs() {
        let errors = evaluate(RULES, &input(&[("id", "x")], json!({})));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.by_field()["price"], vec!["not numeric", "not positive"]);
    }

    #[test]
    fn error_shape() {
        let errors = evaluate(RULES, &input(&[("id", "abc")], json!({ "price": 5 })));
        let body = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            body,
            json!({
                "errors": [{
                    "type": "field",
                    "value": "abc",
                    "msg": "bad id",
                    "path": "id",
                    "location": "params"
                }]
            })
        );
    }

    #[test]
    fn absent_values_are_omitted() {
        let errors = evaluate(RULES, &input(&[("id", "1")], json!({})));
        let body = serde_json::to_value(&errors).unwrap();
        assert!(body["errors"][0].get("value").is_none());
        assert_eq!(body["errors"][0]["location"], "body");
    }

    #[test]
    fn body_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(parse_body(&headers, &Bytes::new()).unwrap().is_empty());
        assert!(parse_body(&headers, &Bytes::from_static(b"{\"a\":1}")).unwrap().contains_key("a"));
        assert!(parse_body(&headers, &Bytes::from_static(b"[1]")).is_err());
        assert!(parse_body(&headers, &Bytes::from_static(b"{oops")).is_err());
    }

    #[test]
    fn body_without_json_content_type_is_ignored() {
        let none = HeaderMap::new();
        assert!(parse_body(&none, &Bytes::from_static(b"{\"a\":1}")).unwrap().is_empty());
        let mut text = HeaderMap::new();
        text.insert(CONTENT_TYPE, "text/plain".parse().unwrap());
        assert!(parse_body(&text, &Bytes::from_static(b"{oops")).unwrap().is_empty());
    }
}
