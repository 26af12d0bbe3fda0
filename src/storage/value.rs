//! Host values and their coercion into storage strings.
//!
//! Storage only ever keeps strings. Whatever a caller hands to
//! [`Storage::set_item`](crate::storage::Storage::set_item) is first turned into a
//! [`StorageValue`] and then encoded with [`StorageValue::to_storage_string`]:
//!
//! | variant                | stored string                                       |
//! |------------------------|-----------------------------------------------------|
//! | `String`               | unchanged                                           |
//! | `Bool`                 | `"true"` / `"false"`                                |
//! | `Number`               | `"1"`, `"0.5"`, `"NaN"`, `"Infinity"`, `"-Infinity"`|
//! | `BigInt`               | decimal digits                                      |
//! | `Null`                 | `"null"`                                            |
//! | `Undefined`            | `"undefined"`                                       |
//! | `Symbol(desc)`         | `"Symbol(desc)"`                                    |
//! | `Array`                | elements joined by `,` (null/undefined are empty)   |
//! | `Object`               | `"[object Object]"`                                 |
//!
//! Numbers print like JavaScript's `String(n)`: the shortest digits that
//! round-trip, plain notation for magnitudes in `[1e-6, 1e21)` and exponent
//! form (`"1e+21"`, `"1.5e-7"`) outside it. `-0` prints as `"0"`.
//!
//! Integers of 64 bits or wider become `BigInt` so their digits stay exact;
//! smaller integers and floats become `Number`.

use std::fmt;

/// A dynamically typed value as a script host would pass it to the Storage API.
#[derive(Clone, Debug, PartialEq)]
pub enum StorageValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    /// Unique-identity token, carrying its optional description.
    Symbol(Option<String>),
    Array(Vec<StorageValue>),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl StorageValue {
    /// Encodes the value into the string that is written to storage.
    pub fn to_storage_string(&self) -> String {
        match self {
            StorageValue::Undefined => "undefined".to_string(),
            StorageValue::Null => "null".to_string(),
            StorageValue::Bool(b) => b.to_string(),
            StorageValue::Number(n) => format_number(*n),
            StorageValue::BigInt(i) => i.to_string(),
            StorageValue::String(s) => s.clone(),
            StorageValue::Symbol(desc) => format!("Symbol({})", desc.as_deref().unwrap_or("")),
            StorageValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    StorageValue::Null | StorageValue::Undefined => String::new(),
                    other => other.to_storage_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            StorageValue::Object(_) => "[object Object]".to_string(),
        }
    }

    /// Same as [`to_storage_string`](Self::to_storage_string) but reuses an owned string.
    pub fn into_storage_string(self) -> String {
        match self {
            StorageValue::String(s) => s,
            other => other.to_storage_string(),
        }
    }

    /// Numeric view of the value, used for index arguments.
    ///
    /// Strings are trimmed and parsed as decimal literals or as unsigned `0x`,
    /// `0o` and `0b` literals; an empty string is `0` and anything unparsable is `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            StorageValue::Undefined | StorageValue::Symbol(_) | StorageValue::Object(_) => f64::NAN,
            StorageValue::Null => 0.0,
            StorageValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            StorageValue::Number(n) => *n,
            StorageValue::BigInt(i) => *i as f64,
            StorageValue::String(s) => parse_number(s),
            StorageValue::Array(items) => match items.as_slice() {
                [] => 0.0,
                [single] => parse_number(&single.to_storage_string()),
                _ => f64::NAN,
            },
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` gives the shortest round-tripping digits as `d.ddde<exp>`.
    let sci = format!("{:e}", n.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits = mantissa.replace('.', "");
    let k = digits.len() as i32;
    let point = exp.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        format!("{}.{}", &digits[..point as usize], &digits[point as usize..])
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat(-point as usize), digits)
    } else {
        let e = point - 1;
        let sign = if e < 0 { '-' } else { '+' };
        match digits.split_at(1) {
            (lead, "") => format!("{}e{}{}", lead, sign, e.abs()),
            (lead, rest) => format!("{}.{}e{}{}", lead, rest, sign, e.abs()),
        }
    };

    if n < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.starts_with('+') {
                return f64::NAN;
            }
            return u128::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64);
        }
    }

    // Rust accepts "inf" and "nan" spellings that are not numeric literals here.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

impl fmt::Display for StorageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage_string())
    }
}

impl From<&str> for StorageValue {
    fn from(s: &str) -> Self {
        StorageValue::String(s.to_string())
    }
}

impl From<String> for StorageValue {
    fn from(s: String) -> Self {
        StorageValue::String(s)
    }
}

impl From<&String> for StorageValue {
    fn from(s: &String) -> Self {
        StorageValue::String(s.clone())
    }
}

impl From<bool> for StorageValue {
    fn from(b: bool) -> Self {
        StorageValue::Bool(b)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for StorageValue {
                fn from(n: $t) -> Self {
                    StorageValue::Number(n.into())
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, u8, u16, u32, f64);

// Wider integers can exceed 2^53, so they keep their exact digits.
macro_rules! bigint_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for StorageValue {
                fn from(n: $t) -> Self {
                    StorageValue::BigInt(n as i128)
                }
            }
        )*
    };
}

bigint_from!(i64, isize, u64, usize, i128);

impl From<u128> for StorageValue {
    fn from(n: u128) -> Self {
        i128::try_from(n).map_or_else(|_| StorageValue::String(n.to_string()), StorageValue::BigInt)
    }
}

impl From<f32> for StorageValue {
    /// Keeps the shortest `f32` text, so `0.1f32` stores as `"0.1"`.
    fn from(n: f32) -> Self {
        StorageValue::Number(format!("{:e}", n).parse().unwrap_or(f64::NAN))
    }
}

impl<T: Into<StorageValue>> From<Option<T>> for StorageValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(StorageValue::Null, Into::into)
    }
}

impl From<Vec<StorageValue>> for StorageValue {
    fn from(items: Vec<StorageValue>) -> Self {
        StorageValue::Array(items)
    }
}

impl From<serde_json::Value> for StorageValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;

        match v {
            Value::Null => StorageValue::Null,
            Value::Bool(b) => StorageValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => StorageValue::from(i),
                (None, Some(u)) => StorageValue::from(u),
                _ => StorageValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => StorageValue::String(s),
            Value::Array(items) => StorageValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => StorageValue::Object(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enc(v: impl Into<StorageValue>) -> String {
        v.into().to_storage_string()
    }

    #[test]
    fn primitives_use_canonical_text() {
        assert_eq!(enc("Hello, world!"), "Hello, world!");
        assert_eq!(enc(1), "1");
        assert_eq!(enc(true), "true");
        assert_eq!(enc(false), "false");
        assert_eq!(enc(1.5), "1.5");
        assert_eq!(enc(-0.0), "0");
        assert_eq!(enc(1e20), "100000000000000000000");
        assert_eq!(enc(f64::NAN), "NaN");
        assert_eq!(enc(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(enc(1_i128), "1");
        assert_eq!(enc(-1.5), "-1.5");
    }

    #[test]
    fn numbers_switch_to_exponent_form_like_javascript() {
        assert_eq!(enc(1e21), "1e+21");
        assert_eq!(enc(1.5e21), "1.5e+21");
        assert_eq!(enc(-1e21), "-1e+21");
        assert_eq!(enc(1e-7), "1e-7");
        assert_eq!(enc(1.25e-7), "1.25e-7");
        assert_eq!(enc(0.000001), "0.000001");
        assert_eq!(enc(0.1), "0.1");
        assert_eq!(enc(123.456), "123.456");
        assert_eq!(enc(f64::MAX), "1.7976931348623157e+308");
        assert_eq!(enc(5e-324), "5e-324");
        assert_eq!(enc(0.1_f32), "0.1");
        assert_eq!(enc(16_777_217_f32), "16777216");
    }

    #[test]
    fn wide_integers_keep_exact_digits() {
        assert_eq!(enc(u64::MAX), "18446744073709551615");
        assert_eq!(enc(i64::MIN), "-9223372036854775808");
        assert_eq!(enc(9_007_199_254_740_993_i64), "9007199254740993");
        assert_eq!(enc(usize::MAX), usize::MAX.to_string());
        assert_eq!(enc(u128::MAX), "340282366920938463463374607431768211455");
        assert_eq!(enc(json!(u64::MAX)), "18446744073709551615");
        assert_eq!(enc(json!(2.5)), "2.5");
    }

    #[test]
    fn non_primitives_have_documented_forms() {
        assert_eq!(StorageValue::Null.to_storage_string(), "null");
        assert_eq!(StorageValue::Undefined.to_storage_string(), "undefined");
        assert_eq!(StorageValue::Symbol(Some("foo".into())).to_storage_string(), "Symbol(foo)");
        assert_eq!(StorageValue::Symbol(None).to_storage_string(), "Symbol()");
        assert_eq!(enc(json!({})), "[object Object]");
        assert_eq!(enc(json!([1, null, "a", [2, 3]])), "1,,a,2,3");
        assert_eq!(enc(None::<&str>), "null");
    }

    #[test]
    fn numeric_view_for_indices() {
        assert_eq!(StorageValue::from("  2 ").to_number(), 2.0);
        assert_eq!(StorageValue::from("").to_number(), 0.0);
        assert_eq!(StorageValue::from("0x10").to_number(), 16.0);
        assert_eq!(StorageValue::from("0b101").to_number(), 5.0);
        assert_eq!(StorageValue::from("0o17").to_number(), 15.0);
        assert!(StorageValue::from("0b102").to_number().is_nan());
        assert!(StorageValue::from("0x").to_number().is_nan());
        assert!(StorageValue::from("nan").to_number().is_nan());
        assert!(StorageValue::from("abc").to_number().is_nan());
        assert_eq!(StorageValue::from("1e2").to_number(), 100.0);
        assert_eq!(StorageValue::Null.to_number(), 0.0);
        assert!(StorageValue::Undefined.to_number().is_nan());
        assert_eq!(StorageValue::Bool(true).to_number(), 1.0);
        assert_eq!(StorageValue::Array(vec![StorageValue::from(3)]).to_number(), 3.0);
    }
}
