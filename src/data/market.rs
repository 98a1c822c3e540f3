use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A scalar field value as the endpoint sends it
///
/// The endpoint is outside our control, so numbers may arrive as strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

/// One element of the market-data array. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    #[serde(rename = "Sira_No", default, skip_serializing_if = "Option::is_none")]
    pub sira_no: Option<FieldValue>,
    #[serde(rename = "Tarih", default, skip_serializing_if = "Option::is_none")]
    pub tarih: Option<FieldValue>,
    #[serde(rename = "Saat", default, skip_serializing_if = "Option::is_none")]
    pub saat: Option<FieldValue>,
    #[serde(rename = "Kod", default, skip_serializing_if = "Option::is_none")]
    pub kod: Option<FieldValue>,
    #[serde(rename = "Aciklama", default, skip_serializing_if = "Option::is_none")]
    pub aciklama: Option<FieldValue>,
    #[serde(rename = "Son_Fiyat", default, skip_serializing_if = "Option::is_none")]
    pub son_fiyat: Option<FieldValue>,
    #[serde(rename = "Yuzde_Degisim", default, skip_serializing_if = "Option::is_none")]
    pub yuzde_degisim: Option<FieldValue>,
}

impl MarketRecord {
    /// The record used for the example block of the prompt
    pub fn sample() -> Self {
        Self {
            sira_no: Some(1.into()),
            tarih: Some("2025-09-03".into()),
            saat: Some("12:19:36".into()),
            kod: Some("VIX".into()),
            aciklama: Some("INDEX VIX INDEX".into()),
            son_fiyat: Some(17.06.into()),
            yuzde_degisim: Some((-0.64).into()),
        }
    }

    /// Present fields in display order
    pub fn fields(&self) -> Vec<(&'static str, &FieldValue)> {
        [
            ("Sira_No", &self.sira_no),
            ("Tarih", &self.tarih),
            ("Saat", &self.saat),
            ("Kod", &self.kod),
            ("Aciklama", &self.aciklama),
            ("Son_Fiyat", &self.son_fiyat),
            ("Yuzde_Degisim", &self.yuzde_degisim),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
        .collect()
    }

    pub fn header_line(&self) -> String {
        let show = |v: &Option<FieldValue>| v.as_ref().map(|v| v.to_string()).unwrap_or_default();
        format!(
            "İstediğiniz {} > {} verisinin bilgileri:",
            show(&self.kod),
            show(&self.aciklama)
        )
    }

    /// Header, blank line, then one `Field: value` line per present field
    pub fn render(&self) -> String {
        let mut out = self.header_line();
        out.push_str("\n\n");
        let lines: Vec<String> = self
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        out.push_str(&lines.join("\n"));
        out
    }
}

/// One complete read of the market-data endpoint
///
/// The body is kept exactly as received; nothing here mutates it.
#[derive(Clone, Debug)]
pub struct MarketSnapshot {
    body: Value,
    fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn new(body: Value, fetched_at: DateTime<Utc>) -> Self {
        Self { body, fetched_at }
    }

    pub fn as_value(&self) -> &Value {
        &self.body
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn is_array(&self) -> bool {
        self.body.is_array()
    }

    pub fn len(&self) -> usize {
        self.body.as_array().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed view of the array elements; elements that are not records are skipped.
    #[cfg(test)]
    pub(crate) fn records(&self) -> Vec<MarketRecord> {
        self.body
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| MarketRecord::deserialize(item).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Two-space indented JSON, as embedded in the prompt
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}
