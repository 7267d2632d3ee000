use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PayType {
    Monthly,
    Hourly,
}

impl PayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayType::Monthly => "Monthly",
            PayType::Hourly => "Hourly",
        }
    }
}

impl fmt::Display for PayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PayType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Monthly" => Ok(PayType::Monthly),
            "Hourly" => Ok(PayType::Hourly),
            other => Err(format!("unsupported pay type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStructure {
    /// Unknown pay types deserialize to `None` and pay nothing per minute.
    #[serde(default, deserialize_with = "deserialize_pay_type")]
    pub pay_type: Option<PayType>,
    #[serde(default)]
    pub monthly_rate: Option<f64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub overtime_rate: Option<f64>,
    #[serde(default)]
    pub allowances: Option<f64>,
    #[serde(default)]
    pub deductions: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub salary_structure: Option<SalaryStructure>,
}

impl Employee {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: None,
            role: None,
            salary_structure: None,
        }
    }

    pub fn with_salary(mut self, salary: SalaryStructure) -> Self {
        self.salary_structure = Some(salary);
        self
    }
}

fn deserialize_pay_type<'de, D>(deserializer: D) -> Result<Option<PayType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| PayType::try_from(value.as_str()).ok()))
}
