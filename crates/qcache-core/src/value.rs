//! 欄位值模型

use serde::{Deserialize, Serialize};

/// 單一欄位值（列式儲存中的一格）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// 缺值
    Null,
    /// 布林
    Bool(bool),
    /// 整數（時間欄位使用毫秒整數）
    Int(i64),
    /// 浮點數
    Float(f64),
    /// 字串
    String(String),
}

impl Value {
    /// 讀取為毫秒時間戳
    ///
    /// 接受整數，或沒有小數部分的浮點數；其他型別返回 `None`
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// 讀取為浮點數
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// 是否為缺值
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_timestamp() {
        assert_eq!(Value::Int(60_000).as_timestamp(), Some(60_000));
        assert_eq!(Value::Float(60_000.0).as_timestamp(), Some(60_000));
        assert_eq!(Value::Float(1.5).as_timestamp(), None);
        assert_eq!(Value::Float(f64::NAN).as_timestamp(), None);
        assert_eq!(Value::Null.as_timestamp(), None);
        assert_eq!(Value::from("x").as_timestamp(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert!(Value::from(None::<i64>).is_null());
    }

    #[test]
    fn test_untagged_json() {
        let values = vec![Value::Int(1), Value::Float(2.5), Value::Null, Value::from("a")];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,2.5,null,"a"]"#);
    }
}
